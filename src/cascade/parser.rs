//! CSS Parser using tree-sitter-css
//!
//! Style sheets and `style` attributes are both parsed with the tree-sitter
//! CSS grammar. Parsing is error tolerant: broken rules come back as `ERROR`
//! nodes and the rest of the sheet is still usable.

use tree_sitter::{Parser, Tree};

use super::error::{InspectError, InspectResult};

/// CSS parser wrapper around tree-sitter-css
pub struct CssParser {
    parser: Parser,
}

impl CssParser {
    /// Create a new CSS parser
    pub fn new() -> InspectResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_css::LANGUAGE.into())
            .map_err(|e| InspectError::TreeSitterLanguage {
                message: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse CSS content and return the syntax tree
    pub fn parse(&mut self, content: &str) -> Option<Tree> {
        self.parser.parse(content, None)
    }
}
