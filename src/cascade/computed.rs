//! Computed values
//!
//! The cross-check value shown next to each cascade. A browser would ask its
//! computed-style API; here the value is derived from the cascades of the
//! element and its ancestors, following `inherit` and inherited properties.

use scraper::ElementRef;
use std::collections::HashMap;
use std::iter;

use super::collector::DeclarationCollector;
use super::constants::{is_inherited_property, KEYWORD_INHERIT};
use super::declaration::Declaration;
use super::document::element_ancestors;
use super::parser::CssParser;
use super::precedence::compare_precedence;

/// Source of computed values for one element
pub trait ComputedStyleSource {
    fn computed_value(&self, property: &str) -> Option<String>;
}

/// Computed style derived from cascade winners of an element and its ancestors
#[derive(Debug, Clone, Default)]
pub struct CascadeComputedStyle {
    /// Winning value per property; the element first, then its ancestors nearest first
    layers: Vec<HashMap<String, String>>,
}

impl CascadeComputedStyle {
    pub fn from_layers(layers: Vec<HashMap<String, String>>) -> Self {
        Self { layers }
    }

    /// Resolve the winners of `element` and every ancestor
    pub fn for_element(
        collector: &DeclarationCollector,
        element: ElementRef,
        parser: &mut CssParser,
    ) -> Self {
        let layers = iter::once(element)
            .chain(element_ancestors(element))
            .map(|el| {
                let mut order = 0;
                winners(collector.collect_own(el, parser, &mut order))
            })
            .collect();
        Self { layers }
    }
}

impl ComputedStyleSource for CascadeComputedStyle {
    fn computed_value(&self, property: &str) -> Option<String> {
        let inherits = is_inherited_property(property);
        for layer in &self.layers {
            match layer.get(property) {
                Some(value) if !value.eq_ignore_ascii_case(KEYWORD_INHERIT) => {
                    return Some(value.clone());
                }
                Some(_) => continue,
                None if inherits => continue,
                None => return None,
            }
        }
        None
    }
}

fn winners(declarations: Vec<Declaration>) -> HashMap<String, String> {
    let mut best: HashMap<String, Declaration> = HashMap::new();
    for declaration in declarations {
        let replace = match best.get(&declaration.property) {
            Some(current) => compare_precedence(&declaration, current).is_gt(),
            None => true,
        };
        if replace {
            best.insert(declaration.property.clone(), declaration);
        }
    }
    best.into_iter()
        .map(|(property, declaration)| (property, declaration.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_own_value_wins() {
        let style = CascadeComputedStyle::from_layers(vec![
            layer(&[("color", "red")]),
            layer(&[("color", "blue")]),
        ]);
        assert_eq!(style.computed_value("color").as_deref(), Some("red"));
    }

    #[test]
    fn test_inherited_property_falls_back_to_ancestor() {
        let style = CascadeComputedStyle::from_layers(vec![
            layer(&[]),
            layer(&[]),
            layer(&[("font-size", "18px"), ("margin", "4px")]),
        ]);
        assert_eq!(style.computed_value("font-size").as_deref(), Some("18px"));
        // margin does not inherit
        assert_eq!(style.computed_value("margin"), None);
    }

    #[test]
    fn test_explicit_inherit_keyword() {
        let style = CascadeComputedStyle::from_layers(vec![
            layer(&[("border", "inherit")]),
            layer(&[("border", "1px solid")]),
        ]);
        assert_eq!(style.computed_value("border").as_deref(), Some("1px solid"));
    }

    #[test]
    fn test_custom_properties_inherit() {
        let style = CascadeComputedStyle::from_layers(vec![
            layer(&[]),
            layer(&[("--accent", "#fff")]),
        ]);
        assert_eq!(style.computed_value("--accent").as_deref(), Some("#fff"));
    }
}
