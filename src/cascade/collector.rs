//! Declaration Collector
//!
//! Walks every style rule of every loaded sheet in document order, keeps the
//! rules whose selector matches the target element and records their
//! declarations. The element's `style` attribute is collected last.
//!
//! Shorthands are expanded into their longhands before they are recorded.
//!
//! A single counter numbers declarations across all sheets so that source
//! order can break ties between otherwise equal declarations.

use log::debug;
use scraper::{ElementRef, Selector};

use super::constants::is_inherited_property;
use super::declaration::{Declaration, DeclarationMap};
use super::document::{element_ancestors, element_label};
use super::parser::CssParser;
use super::shorthand::expand_declaration;
use super::specificity::{calculate_specificity, split_selector_list, Specificity};
use super::stylesheet::{parse_inline_style, StyleRule, StyleSheet};

/// One entry of a selector list, compiled for matching
struct CompiledSelector {
    text: String,
    selector: Selector,
    specificity: Specificity,
}

struct CompiledRule<'s> {
    rule: &'s StyleRule,
    source: &'s str,
    selectors: Vec<CompiledSelector>,
}

/// Matches the rules of a set of style sheets against elements
pub struct DeclarationCollector<'s> {
    rules: Vec<CompiledRule<'s>>,
}

impl<'s> DeclarationCollector<'s> {
    /// Compile the selectors of every rule once
    pub fn new(sheets: &'s [StyleSheet]) -> Self {
        let mut rules = Vec::new();
        for sheet in sheets {
            for rule in &sheet.rules {
                let selectors = compile_selector_list(&rule.selector_text, &sheet.source);
                if selectors.is_empty() {
                    continue;
                }
                rules.push(CompiledRule {
                    rule,
                    source: &sheet.source,
                    selectors,
                });
            }
        }
        Self { rules }
    }

    /// Number of rules the selector engine could compile
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Collect every declaration affecting `element`.
    ///
    /// With `include_inherited`, declarations of inherited properties found on
    /// ancestors are added too, tagged with the ancestor and its distance.
    pub fn collect(
        &self,
        element: ElementRef,
        parser: &mut CssParser,
        include_inherited: bool,
    ) -> DeclarationMap {
        let mut map = DeclarationMap::new();
        let mut order = 0;

        for declaration in self.collect_own(element, parser, &mut order) {
            map.push(declaration);
        }

        if include_inherited {
            for (index, ancestor) in element_ancestors(element).enumerate() {
                let label = element_label(ancestor);
                let depth = index as u32 + 1;
                for declaration in self.collect_own(ancestor, parser, &mut order) {
                    if is_inherited_property(&declaration.property) {
                        map.push(declaration.inherited(&label, depth));
                    }
                }
            }
        }

        map
    }

    /// Declarations of `element` itself: matching sheet rules, then its `style` attribute
    pub fn collect_own(
        &self,
        element: ElementRef,
        parser: &mut CssParser,
        order: &mut u32,
    ) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        for compiled in &self.rules {
            let Some(matched) = best_matching_selector(&compiled.selectors, element) else {
                continue;
            };
            debug!(
                "{} matches {} ({})",
                compiled.rule.selector_text, matched.text, compiled.source
            );
            for raw in compiled.rule.declarations.iter().flat_map(expand_declaration) {
                declarations.push(Declaration::from_rule(
                    &raw,
                    &matched.text,
                    matched.specificity,
                    compiled.source,
                    *order,
                ));
                *order += 1;
            }
        }

        if let Some(style) = element.value().attr("style") {
            let inline = parse_inline_style(style, parser);
            for raw in inline.iter().flat_map(expand_declaration) {
                declarations.push(Declaration::inline(&raw, *order));
                *order += 1;
            }
        }

        declarations
    }
}

fn compile_selector_list(selector_text: &str, source: &str) -> Vec<CompiledSelector> {
    split_selector_list(selector_text)
        .into_iter()
        .filter_map(|text| match Selector::parse(text) {
            Ok(selector) => Some(CompiledSelector {
                text: text.to_string(),
                selector,
                specificity: calculate_specificity(text),
            }),
            Err(e) => {
                debug!("Selector engine cannot match '{}' from {}: {}", text, source, e);
                None
            }
        })
        .collect()
}

/// The most specific entry of a selector list that matches, first one on ties
fn best_matching_selector<'c>(
    selectors: &'c [CompiledSelector],
    element: ElementRef,
) -> Option<&'c CompiledSelector> {
    selectors
        .iter()
        .filter(|compiled| compiled.selector.matches(&element))
        .fold(None, |best: Option<&CompiledSelector>, candidate| match best {
            Some(current) if current.specificity >= candidate.specificity => Some(current),
            _ => Some(candidate),
        })
}
