//! Tests for the precedence sorter

use super::declaration::Declaration;
use super::precedence::*;
use super::specificity::{calculate_specificity, Specificity};
use super::stylesheet::RawDeclaration;

fn raw(value: &str, important: bool) -> RawDeclaration {
    RawDeclaration {
        property: "color".to_string(),
        value: value.to_string(),
        important,
    }
}

fn sheet_rule(selector: &str, value: &str, important: bool, order: u32) -> Declaration {
    Declaration::from_rule(
        &raw(value, important),
        selector,
        calculate_specificity(selector),
        "site.css",
        order,
    )
}

fn inline(value: &str, important: bool, order: u32) -> Declaration {
    Declaration::inline(&raw(value, important), order)
}

fn sorted_values(mut declarations: Vec<Declaration>) -> Vec<String> {
    sort_by_precedence(&mut declarations);
    declarations.into_iter().map(|d| d.value).collect()
}

#[test]
fn test_higher_specificity_wins_regardless_of_order() {
    let specific_first = vec![
        sheet_rule("#a", "blue", false, 0),
        sheet_rule(".a", "red", false, 1),
    ];
    assert_eq!(sorted_values(specific_first), vec!["blue", "red"]);

    let specific_last = vec![
        sheet_rule(".a", "red", false, 0),
        sheet_rule("#a", "blue", false, 1),
    ];
    assert_eq!(sorted_values(specific_last), vec!["blue", "red"]);
}

#[test]
fn test_later_declaration_wins_on_equal_specificity() {
    let declarations = vec![
        sheet_rule(".a", "red", false, 0),
        sheet_rule(".b", "green", false, 1),
        sheet_rule(".c", "blue", false, 2),
    ];
    assert_eq!(sorted_values(declarations), vec!["blue", "green", "red"]);
}

#[test]
fn test_important_sheet_beats_normal_inline() {
    let declarations = vec![
        sheet_rule("p", "red", true, 0),
        inline("blue", false, 1),
    ];
    assert_eq!(sorted_values(declarations), vec!["red", "blue"]);
}

#[test]
fn test_important_inline_beats_everything() {
    let declarations = vec![
        sheet_rule("#a.b", "red", true, 0),
        sheet_rule("#a", "green", false, 1),
        inline("blue", true, 2),
    ];
    assert_eq!(sorted_values(declarations), vec!["blue", "red", "green"]);
}

#[test]
fn test_normal_inline_beats_normal_sheet() {
    let declarations = vec![
        inline("blue", false, 0),
        sheet_rule("#a#b#c", "red", false, 1),
    ];
    assert_eq!(sorted_values(declarations), vec!["blue", "red"]);
}

#[test]
fn test_importance_beats_specificity() {
    let declarations = vec![
        sheet_rule(".btn", "red", true, 0),
        sheet_rule("#btn", "blue", false, 1),
    ];
    assert_eq!(sorted_values(declarations), vec!["red", "blue"]);
}

#[test]
fn test_inherited_declarations_rank_below_own() {
    let declarations = vec![
        sheet_rule("#parent", "navy", true, 0).inherited("div#parent", 1),
        sheet_rule("body", "gray", false, 1).inherited("body", 2),
        sheet_rule("p", "black", false, 2),
        sheet_rule(".x", "teal", false, 3).inherited("div#parent", 1),
    ];
    assert_eq!(
        sorted_values(declarations),
        vec!["black", "navy", "teal", "gray"]
    );
}

#[test]
fn test_winner_matches_sorted_head() {
    let declarations = vec![
        sheet_rule(".a", "red", false, 0),
        inline("blue", false, 1),
        sheet_rule("#a", "green", true, 2),
    ];
    let winner = winning_declaration(&declarations).unwrap().value.clone();
    assert_eq!(winner, sorted_values(declarations)[0]);
}

#[test]
fn test_sort_is_total() {
    // identical in everything but order
    let a = sheet_rule(".a", "red", false, 4);
    let b = sheet_rule(".a", "red", false, 5);
    assert!(compare_precedence(&b, &a).is_gt());
    assert!(compare_precedence(&a, &b).is_lt());
    assert!(compare_precedence(&a, &a).is_eq());
}

#[test]
fn test_statuses() {
    let cascade = PropertyCascade {
        property: "color".to_string(),
        declarations: vec![inline("blue", false, 1), sheet_rule("a", "red", false, 0)],
        computed: Some("blue".to_string()),
    };
    let statuses: Vec<Status> = cascade.statuses().map(|(status, _)| status).collect();
    assert_eq!(statuses, vec![Status::Applied, Status::Overridden]);
    assert!(cascade.has_overrides());
    assert_eq!(cascade.winner().unwrap().specificity, Specificity::INLINE);
}
