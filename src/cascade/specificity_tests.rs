//! Tests for selector specificity

use super::specificity::*;

#[test]
fn test_compound_with_descendant() {
    assert_eq!(calculate_specificity("#a.b.c div"), Specificity::new(1, 2, 1));
}

#[test]
fn test_not_counts_its_argument() {
    assert_eq!(calculate_specificity(":not(.x)"), Specificity::new(0, 1, 0));
    assert_eq!(calculate_specificity(":not(.x)"), calculate_specificity(".x"));
}

#[test]
fn test_is_and_has_use_most_specific_argument() {
    assert_eq!(calculate_specificity(":is(#a, .b) p"), Specificity::new(1, 0, 1));
    assert_eq!(calculate_specificity("a:has(> img.icon)"), Specificity::new(0, 1, 2));
}

#[test]
fn test_where_contributes_nothing() {
    assert_eq!(calculate_specificity("a:where(#nav .item)"), Specificity::new(0, 0, 1));
}

#[test]
fn test_nested_functional_pseudo_classes() {
    assert_eq!(
        calculate_specificity("li:not(:nth-child(2n+1))"),
        Specificity::new(0, 1, 1)
    );
    assert_eq!(
        calculate_specificity(":not(:is(.a, #b))"),
        Specificity::new(1, 0, 0)
    );
}

#[test]
fn test_pseudo_elements_are_stripped() {
    assert_eq!(calculate_specificity("p::before"), Specificity::new(0, 0, 1));
    assert_eq!(calculate_specificity("p:first-line"), Specificity::new(0, 0, 1));
    assert_eq!(
        calculate_specificity("ul li:nth-child(2n+1)::marker"),
        Specificity::new(0, 1, 2)
    );
}

#[test]
fn test_attributes_count_as_classes() {
    assert_eq!(
        calculate_specificity("a[href=\"https://x.y/#top\"]"),
        Specificity::new(0, 1, 1)
    );
    assert_eq!(
        calculate_specificity("input[type=checkbox]:checked"),
        Specificity::new(0, 2, 1)
    );
}

#[test]
fn test_universal_and_combinators() {
    assert_eq!(calculate_specificity("*"), Specificity::ZERO);
    assert_eq!(calculate_specificity("div > p + span ~ em"), Specificity::new(0, 0, 4));
}

#[test]
fn test_malformed_selectors_degrade() {
    assert_eq!(calculate_specificity(""), Specificity::ZERO);
    assert_eq!(calculate_specificity("## .. [[ (("), Specificity::ZERO);
    // an unclosed :not( is left in place and counted as a plain pseudo-class
    assert_eq!(calculate_specificity("#a:not(.b"), Specificity::new(1, 2, 0));
}

#[test]
fn test_ordering_is_lexicographic() {
    assert!(Specificity::new(1, 0, 0) > Specificity::new(0, 10, 10));
    assert!(Specificity::new(0, 2, 0) > Specificity::new(0, 1, 9));
    assert!(Specificity::new(0, 0, 2) > Specificity::new(0, 0, 1));
    assert!(Specificity::INLINE > Specificity::new(100, 100, 100));
}

#[test]
fn test_display() {
    assert_eq!(Specificity::new(1, 2, 1).to_string(), "1,2,1");
    assert_eq!(Specificity::INLINE.to_string(), "inline");
}

#[test]
fn test_split_selector_list() {
    assert_eq!(split_selector_list("a, .b ,#c"), vec!["a", ".b", "#c"]);
    assert_eq!(split_selector_list(":is(a, b), c"), vec![":is(a, b)", "c"]);
    assert_eq!(
        split_selector_list("[data-x=\"1,2\"], p"),
        vec!["[data-x=\"1,2\"]", "p"]
    );
    assert!(split_selector_list(" , ").is_empty());
}

#[test]
fn test_max_specificity_of_list() {
    assert_eq!(max_specificity("a, #b, .c"), Specificity::new(1, 0, 0));
    assert_eq!(max_specificity(""), Specificity::ZERO);
}
