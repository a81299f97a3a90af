//! Offer accumulator
//!
//! Keeps scraped offers in first-seen order and drops repeats by their
//! composite [`OfferKey`]. The accumulator serializes as a plain JSON array so
//! it can be stored between runs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::cascade::error::{InspectResult, IoContext, JsonContext};

/// Identity of an offer: the product plus the variant when the page has one
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OfferKey {
    pub product_id: String,
    pub sku_id: Option<String>,
}

/// A product found in a page payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOffer {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Payload section the offer was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl ProductOffer {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            sku_id: None,
            title: None,
            section: None,
        }
    }

    pub fn key(&self) -> OfferKey {
        OfferKey {
            product_id: self.product_id.clone(),
            sku_id: self.sku_id.clone(),
        }
    }
}

/// Offers collected so far, deduplicated by [`OfferKey`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductOffer>", into = "Vec<ProductOffer>")]
pub struct OfferAccumulator {
    offers: Vec<ProductOffer>,
    seen: HashSet<OfferKey>,
}

impl From<Vec<ProductOffer>> for OfferAccumulator {
    fn from(offers: Vec<ProductOffer>) -> Self {
        let mut accumulator = Self::default();
        accumulator.extend(offers);
        accumulator
    }
}

impl From<OfferAccumulator> for Vec<ProductOffer> {
    fn from(accumulator: OfferAccumulator) -> Self {
        accumulator.offers
    }
}

impl OfferAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offer, returns false when its key was already present
    pub fn insert(&mut self, offer: ProductOffer) -> bool {
        if self.seen.insert(offer.key()) {
            self.offers.push(offer);
            true
        } else {
            false
        }
    }

    /// Add several offers, returns how many were new
    pub fn extend(&mut self, offers: impl IntoIterator<Item = ProductOffer>) -> usize {
        offers
            .into_iter()
            .filter(|offer| self.insert(offer.clone()))
            .count()
    }

    pub fn offers(&self) -> &[ProductOffer] {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Distinct product ids in first-seen order
    pub fn product_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.offers
            .iter()
            .map(|offer| offer.product_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Load a stored accumulator; a missing file is an empty accumulator
    pub fn load(path: &Path) -> InspectResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_io_context(&format!("Failed to read state file {}", path.display()))?;
        serde_json::from_str(&content).with_json_context("Invalid state file")
    }

    pub fn save(&self, path: &Path) -> InspectResult<()> {
        let content =
            serde_json::to_string_pretty(self).with_json_context("Failed to serialize offers")?;
        fs::write(path, content)
            .with_io_context(&format!("Failed to write state file {}", path.display()))
    }
}

/// Merge `offers` into `accumulator` and hand it back with the number of new offers
pub fn accumulate(
    mut accumulator: OfferAccumulator,
    offers: impl IntoIterator<Item = ProductOffer>,
) -> (OfferAccumulator, usize) {
    let added = accumulator.extend(offers);
    (accumulator, added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: &str, sku: Option<&str>) -> ProductOffer {
        ProductOffer {
            sku_id: sku.map(str::to_string),
            ..ProductOffer::new(id)
        }
    }

    #[test]
    fn test_dedup_by_composite_key() {
        let (accumulator, added) = accumulate(
            OfferAccumulator::new(),
            vec![
                offer("1005001234567890", None),
                offer("1005001234567890", Some("12000001")),
                offer("1005001234567890", None),
            ],
        );
        assert_eq!(added, 2);
        assert_eq!(accumulator.len(), 2);
        assert_eq!(accumulator.product_ids(), vec!["1005001234567890"]);
    }

    #[test]
    fn test_repeated_runs_do_not_double_count() {
        let first = vec![offer("1005000000000001", None), offer("1005000000000002", None)];
        let second = vec![offer("1005000000000002", None), offer("1005000000000003", None)];

        let (accumulator, added_first) = accumulate(OfferAccumulator::new(), first);
        let (accumulator, added_second) = accumulate(accumulator, second);

        assert_eq!(added_first, 2);
        assert_eq!(added_second, 1);
        assert_eq!(
            accumulator.product_ids(),
            vec!["1005000000000001", "1005000000000002", "1005000000000003"]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offers.json");

        let missing = OfferAccumulator::load(&path).unwrap();
        assert!(missing.is_empty());

        let (accumulator, _) = accumulate(
            OfferAccumulator::new(),
            vec![offer("1005000000000001", Some("7")), offer("1005000000000002", None)],
        );
        accumulator.save(&path).unwrap();

        let mut loaded = OfferAccumulator::load(&path).unwrap();
        assert_eq!(loaded, accumulator);
        // the dedup index is rebuilt on load
        assert!(!loaded.insert(offer("1005000000000001", Some("7"))));
    }
}
