//! Cascade Constants
//!
//! Tree-sitter node kinds, source labels and property tables used by the
//! cascade inspector. Centralizing these keeps the collector, the computed
//! style lookup and the report renderer in agreement.

// Tree-sitter node kinds
/// Root node of a CSS syntax tree
pub const NODE_STYLESHEET: &str = "stylesheet";
/// A CSS rule containing selectors and a declaration block
pub const NODE_RULE_SET: &str = "rule_set";
/// A block of declarations enclosed in curly braces
pub const NODE_BLOCK: &str = "block";
/// A single property-value pair (e.g., `color: red;`)
pub const NODE_DECLARATION: &str = "declaration";
/// Container for one or more selectors
pub const NODE_SELECTORS: &str = "selectors";
/// CSS property name (e.g., `color`, `--accent`)
pub const NODE_PROPERTY_NAME: &str = "property_name";
/// CSS comment block (e.g., `/* comment */`)
pub const NODE_COMMENT: &str = "comment";

// Source labels
/// Source label of declarations coming from an element's `style` attribute
pub const SOURCE_INLINE_ATTRIBUTE: &str = "inline";
/// Selector label used for `style` attribute declarations
pub const SELECTOR_INLINE: &str = "style=\"\"";
/// Prefix of the source label of embedded `<style>` elements
pub const SOURCE_EMBEDDED_PREFIX: &str = "<style>";

/// File URI scheme, the only scheme whose sheets are readable
pub const FILE_SCHEME: &str = "file";

/// CSS-wide keyword asking for the parent's value
pub const KEYWORD_INHERIT: &str = "inherit";

/// Properties that inherit by default.
///
/// Custom properties (`--*`) also inherit and are handled by [`is_inherited_property`].
pub const INHERITED_PROPERTIES: &[&str] = &[
    "border-collapse",
    "border-spacing",
    "caption-side",
    "color",
    "cursor",
    "direction",
    "empty-cells",
    "font",
    "font-family",
    "font-feature-settings",
    "font-kerning",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "hyphens",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-image",
    "list-style-position",
    "list-style-type",
    "orphans",
    "overflow-wrap",
    "quotes",
    "tab-size",
    "text-align",
    "text-align-last",
    "text-indent",
    "text-rendering",
    "text-shadow",
    "text-transform",
    "visibility",
    "white-space",
    "widows",
    "word-break",
    "word-spacing",
    "word-wrap",
    "writing-mode",
];

/// Whether a property inherits from the parent element when not declared
pub fn is_inherited_property(property: &str) -> bool {
    property.starts_with("--") || INHERITED_PROPERTIES.contains(&property)
}
