//! Inspection options
//!
//! The single options object accepted by an inspection. Keys are camelCase so
//! the same JSON works as the object literal users passed in the browser.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::{InspectResult, IoContext, JsonContext};
use super::shorthand::longhands_of;

/// Options controlling what is collected and how the report is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectOptions {
    /// Report every property, not only the ones with overridden declarations
    pub show_all_props: bool,
    /// Group console output per property instead of a flat rule listing
    pub group_by_property: bool,
    /// Also collect ancestor declarations for inherited properties
    pub include_inherited: bool,
    /// Restrict the report to these properties
    pub filter_props: Option<Vec<String>>,
    /// Debug logging and source order numbers in the console output
    pub verbose: bool,
    /// Render the Markdown report
    pub output_markdown: bool,
    /// Copy the Markdown report to the clipboard
    pub auto_copy: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            show_all_props: false,
            group_by_property: true,
            include_inherited: false,
            filter_props: None,
            verbose: false,
            output_markdown: true,
            auto_copy: true,
        }
    }
}

impl InspectOptions {
    /// Parse options from a JSON object, missing keys take their defaults
    pub fn from_json(json: &str) -> InspectResult<Self> {
        serde_json::from_str(json).with_json_context("Invalid inspection options")
    }

    /// Load options from a JSON file
    pub fn from_file(path: &Path) -> InspectResult<Self> {
        let content = fs::read_to_string(path)
            .with_io_context(&format!("Failed to read options file {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Whether a property passes `filter_props`. A shorthand in the filter
    /// accepts its longhands.
    pub fn accepts_property(&self, property: &str) -> bool {
        let Some(filter) = &self.filter_props else {
            return true;
        };
        filter.iter().any(|entry| {
            let entry = entry.to_ascii_lowercase();
            entry.eq_ignore_ascii_case(property)
                || longhands_of(&entry)
                    .is_some_and(|longhands| longhands.iter().any(|l| l.eq_ignore_ascii_case(property)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let options = InspectOptions::from_json("{}").unwrap();
        assert_eq!(options, InspectOptions::default());
        assert!(options.group_by_property);
        assert!(options.output_markdown);
        assert!(options.auto_copy);
        assert!(!options.show_all_props);
    }

    #[test]
    fn test_camel_case_keys() {
        let options = InspectOptions::from_json(
            r#"{"showAllProps": true, "filterProps": ["color", "Margin"], "autoCopy": false}"#,
        )
        .unwrap();
        assert!(options.show_all_props);
        assert!(!options.auto_copy);
        assert!(options.accepts_property("color"));
        assert!(options.accepts_property("margin"));
        assert!(!options.accepts_property("padding"));
    }

    #[test]
    fn test_shorthand_filter_accepts_longhands() {
        let options = InspectOptions::from_json(r#"{"filterProps": ["Border-Top"]}"#).unwrap();
        assert!(options.accepts_property("border-top-color"));
        assert!(options.accepts_property("border-top"));
        assert!(!options.accepts_property("border-left-color"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let result = InspectOptions::from_json("{ showAllProps: }");
        assert!(result.is_err());
    }
}
