//! CSS Cascade Inspector
//!
//! Explains which declaration wins for every property of one element and why:
//! - scraper (html5ever + selectors) for the document and selector matching
//! - tree-sitter-css for style sheets and `style` attributes
//! - regex passes for selector specificity

pub mod clipboard;
pub mod collector;
pub mod color;
pub mod computed;
pub mod constants;
pub mod declaration;
pub mod document;
pub mod error;
pub mod inspector;
pub mod options;
pub mod parser;
pub mod precedence;
pub mod report;
pub mod shorthand;
pub mod specificity;
pub mod stylesheet;

#[cfg(test)]
mod specificity_tests;
#[cfg(test)]
mod precedence_tests;
#[cfg(test)]
mod inspector_tests;
