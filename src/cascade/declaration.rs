//! Cascade declarations
//!
//! A [`Declaration`] is one property/value pair that applies to the inspected
//! element, together with everything the precedence sorter needs to rank it.

use serde::Serialize;
use std::collections::HashMap;

use super::constants::{SELECTOR_INLINE, SOURCE_INLINE_ATTRIBUTE};
use super::specificity::Specificity;
use super::stylesheet::RawDeclaration;

/// A declaration that matched the inspected element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
    /// The selector that matched, or `style=""` for inline declarations
    pub selector: String,
    pub specificity: Specificity,
    pub is_inline: bool,
    /// Sheet URL, `<style>#n`, or `inline`
    pub source: String,
    /// Global collection counter, later declarations have higher numbers
    pub order: u32,
    /// Label of the ancestor this declaration is inherited from
    pub inherited_from: Option<String>,
    /// Distance to that ancestor, 0 for the element's own declarations
    pub depth: u32,
}

impl Declaration {
    /// A declaration coming from a style sheet rule
    pub fn from_rule(
        raw: &RawDeclaration,
        selector: &str,
        specificity: Specificity,
        source: &str,
        order: u32,
    ) -> Self {
        Self {
            property: raw.property.clone(),
            value: raw.value.clone(),
            important: raw.important,
            selector: selector.to_string(),
            specificity,
            is_inline: false,
            source: source.to_string(),
            order,
            inherited_from: None,
            depth: 0,
        }
    }

    /// A declaration coming from the element's `style` attribute
    pub fn inline(raw: &RawDeclaration, order: u32) -> Self {
        Self {
            property: raw.property.clone(),
            value: raw.value.clone(),
            important: raw.important,
            selector: SELECTOR_INLINE.to_string(),
            specificity: Specificity::INLINE,
            is_inline: true,
            source: SOURCE_INLINE_ATTRIBUTE.to_string(),
            order,
            inherited_from: None,
            depth: 0,
        }
    }

    /// Mark this declaration as inherited from an ancestor `depth` levels up
    pub fn inherited(mut self, ancestor: &str, depth: u32) -> Self {
        self.inherited_from = Some(ancestor.to_string());
        self.depth = depth;
        self
    }

    pub fn is_inherited(&self) -> bool {
        self.inherited_from.is_some()
    }
}

/// Declarations grouped per property, properties kept in encounter order
#[derive(Debug, Clone, Default)]
pub struct DeclarationMap {
    properties: Vec<String>,
    entries: HashMap<String, Vec<Declaration>>,
}

impl DeclarationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration to its property's list
    pub fn push(&mut self, declaration: Declaration) {
        match self.entries.get_mut(&declaration.property) {
            Some(list) => list.push(declaration),
            None => {
                self.properties.push(declaration.property.clone());
                self.entries
                    .insert(declaration.property.clone(), vec![declaration]);
            }
        }
    }

    pub fn get(&self, property: &str) -> Option<&[Declaration]> {
        self.entries.get(property).map(Vec::as_slice)
    }

    /// Property names in the order they were first seen
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Number of declarations across all properties
    pub fn total_declarations(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Keep only the properties accepted by `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let entries = &mut self.entries;
        self.properties.retain(|property| {
            let kept = keep(property);
            if !kept {
                entries.remove(property);
            }
            kept
        });
    }

    /// Consume the map, yielding each property with its declarations in encounter order
    pub fn into_entries(mut self) -> Vec<(String, Vec<Declaration>)> {
        self.properties
            .into_iter()
            .map(|property| {
                let declarations = self.entries.remove(&property).unwrap_or_default();
                (property, declarations)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(property: &str, value: &str) -> RawDeclaration {
        RawDeclaration {
            property: property.to_string(),
            value: value.to_string(),
            important: false,
        }
    }

    #[test]
    fn test_encounter_order_is_kept() {
        let mut map = DeclarationMap::new();
        map.push(Declaration::from_rule(&raw("margin", "0"), "p", Specificity::new(0, 0, 1), "a.css", 0));
        map.push(Declaration::from_rule(&raw("color", "red"), "p", Specificity::new(0, 0, 1), "a.css", 1));
        map.push(Declaration::inline(&raw("margin", "4px"), 2));

        assert_eq!(map.properties(), &["margin".to_string(), "color".to_string()]);
        assert_eq!(map.get("margin").unwrap().len(), 2);
        assert_eq!(map.total_declarations(), 3);

        let entries = map.into_entries();
        assert_eq!(entries[0].0, "margin");
        assert_eq!(entries[0].1[1].value, "4px");
        assert!(entries[0].1[1].is_inline);
    }

    #[test]
    fn test_retain() {
        let mut map = DeclarationMap::new();
        map.push(Declaration::inline(&raw("color", "red"), 0));
        map.push(Declaration::inline(&raw("margin", "0"), 1));
        map.retain(|property| property == "color");
        assert_eq!(map.len(), 1);
        assert!(map.get("margin").is_none());
        assert_eq!(map.total_declarations(), 1);
    }
}
