//! Color Palette
//!
//! Extracts the main colors of a page from the computed style of every
//! element and reports them as a palette table with category sections and
//! suggested CSS variables.

pub mod extractor;
pub mod options;
pub mod report;
