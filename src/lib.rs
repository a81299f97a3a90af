//! Cascade Probe Library
//!
//! Page inspection tools that work on HTML snapshots: a CSS cascade inspector
//! explaining which declaration wins for each property of an element, a
//! color palette extractor, a product-ID scraper for embedded JSON payloads,
//! and a bounded state machine for "keep expanding until stable" page loops.

pub mod cascade;
pub mod expander;
pub mod logging;
pub mod palette;
pub mod scrape;
#[cfg(test)]
pub mod test_utils;
