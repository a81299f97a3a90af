//! Style sheet model
//!
//! Flattens a tree-sitter CSS tree into the style rules the collector walks.
//! Only top-level style rules are kept; at-rules (`@media`, `@import`,
//! `@keyframes`) carry no selector of their own and are skipped.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::Node;

use super::constants::*;
use super::error::{InspectError, InspectResult};
use super::parser::CssParser;

/// A declaration as written in a rule block, before any cascade information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    /// Lowercased property name (custom properties keep their case)
    pub property: String,
    /// Value with `!important` removed and whitespace collapsed
    pub value: String,
    pub important: bool,
}

/// A style rule: selector list text and its declarations in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector_text: String,
    pub declarations: Vec<RawDeclaration>,
}

/// A parsed style sheet
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Sheet URL, or `<style>#n` for embedded sheets
    pub source: String,
    pub rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Parse style sheet text
    pub fn parse(source: &str, content: &str, parser: &mut CssParser) -> InspectResult<Self> {
        let tree = parser.parse(content).ok_or_else(|| InspectError::Parse {
            source_name: source.to_string(),
            message: "tree-sitter returned no tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            debug!("Style sheet {} has syntax errors, keeping the rules that parsed", source);
        }

        let mut rules = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                NODE_RULE_SET => {
                    if let Some(rule) = extract_rule(child, content) {
                        rules.push(rule);
                    }
                }
                NODE_COMMENT => {}
                other => debug!("Skipping {} in style sheet {}", other, source),
            }
        }

        Ok(Self {
            source: source.to_string(),
            rules,
        })
    }
}

/// Parse the content of a `style` attribute into declarations
pub fn parse_inline_style(style: &str, parser: &mut CssParser) -> Vec<RawDeclaration> {
    // wrap in a rule so the grammar sees a declaration block
    let wrapped = format!("x{{{}}}", style);
    let Some(tree) = parser.parse(&wrapped) else {
        debug!("Could not parse style attribute: {}", style);
        return Vec::new();
    };

    let root = tree.root_node();
    let mut cursor = root.walk();
    let declarations = root
        .children(&mut cursor)
        .find(|node| node.kind() == NODE_RULE_SET)
        .and_then(|rule| extract_rule(rule, &wrapped))
        .map(|rule| rule.declarations)
        .unwrap_or_default();
    declarations
}

fn extract_rule(rule: Node, content: &str) -> Option<StyleRule> {
    let mut selector_text = None;
    let mut declarations = Vec::new();

    let mut cursor = rule.walk();
    for child in rule.children(&mut cursor) {
        match child.kind() {
            NODE_SELECTORS => selector_text = Some(normalize_whitespace(node_text(child, content))),
            NODE_BLOCK => {
                let mut block_cursor = child.walk();
                for item in child.children(&mut block_cursor) {
                    if item.kind() == NODE_DECLARATION {
                        if let Some(declaration) = extract_declaration(item, content) {
                            declarations.push(declaration);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    selector_text.map(|selector_text| StyleRule {
        selector_text,
        declarations,
    })
}

fn extract_declaration(node: Node, content: &str) -> Option<RawDeclaration> {
    let property_node = node.child(0).filter(|n| n.kind() == NODE_PROPERTY_NAME)?;
    let property = node_text(property_node, content).trim();

    let mut cursor = node.walk();
    let colon = node.children(&mut cursor).find(|n| n.kind() == ":")?;
    let raw_value = content
        .get(colon.end_byte()..node.end_byte())
        .unwrap_or("")
        .trim()
        .trim_end_matches(';');

    let important_pattern = important_regex();
    let important = important_pattern.is_match(raw_value);
    let value = normalize_whitespace(&important_pattern.replace(raw_value, ""));
    if value.is_empty() {
        return None;
    }

    let property = if property.starts_with("--") {
        property.to_string()
    } else {
        property.to_ascii_lowercase()
    };

    Some(RawDeclaration {
        property,
        value,
        important,
    })
}

fn important_regex() -> &'static Regex {
    static IMPORTANT: OnceLock<Regex> = OnceLock::new();
    IMPORTANT.get_or_init(|| {
        Regex::new(r"(?i)!\s*important\s*$").expect("Failed to compile !important regex")
    })
}

fn node_text<'a>(node: Node, content: &'a str) -> &'a str {
    node.utf8_text(content.as_bytes()).unwrap_or("")
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
