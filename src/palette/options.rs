//! Palette options

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cascade::error::{InspectResult, IoContext, JsonContext};

/// Options controlling which colors are counted and how they are grouped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaletteOptions {
    /// Count colors with an alpha below 0.1
    pub include_transparent: bool,
    /// Minimum number of uses for a color to be kept
    pub min_occurrence: usize,
    /// Merge colors closer than `similarity_threshold` into the most used one
    pub group_similar: bool,
    /// Euclidean RGB distance under which two colors are similar
    pub similarity_threshold: f64,
    pub max_colors: usize,
    /// Scan gradient backgrounds for colors
    pub include_gradients: bool,
    /// Copy the Markdown report to the clipboard
    pub auto_copy: bool,
    pub verbose: bool,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            include_transparent: false,
            min_occurrence: 3,
            group_similar: true,
            similarity_threshold: 15.0,
            max_colors: 20,
            include_gradients: true,
            auto_copy: true,
            verbose: false,
        }
    }
}

impl PaletteOptions {
    pub fn from_json(json: &str) -> InspectResult<Self> {
        serde_json::from_str(json).with_json_context("Invalid palette options")
    }

    pub fn from_file(path: &Path) -> InspectResult<Self> {
        let content = fs::read_to_string(path)
            .with_io_context(&format!("Failed to read options file {}", path.display()))?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        assert_eq!(PaletteOptions::from_json("{}").unwrap(), PaletteOptions::default());

        // scanDepth has no meaning without a viewport and is ignored
        let options = PaletteOptions::from_json(
            r#"{"minOccurrence": 1, "similarityThreshold": 30, "scanDepth": "viewport"}"#,
        )
        .unwrap();
        assert_eq!(options.min_occurrence, 1);
        assert_eq!(options.similarity_threshold, 30.0);
        assert!(options.group_similar);
    }
}
