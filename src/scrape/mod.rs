//! Page scrapers
//!
//! Extracts data from the JSON payloads pages embed for their own scripts.
//! Results are merged into an explicit accumulator that callers pass in and
//! get back, so repeated runs over the same page never double count.

pub mod accumulator;
pub mod product_ids;
