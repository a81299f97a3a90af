//! Product ID extraction
//!
//! Pages built on client-side frameworks ship their data as JSON: either a
//! `window.__STREAMING_DATA__ = {...}` assignment or a
//! `<script type="application/json">` block. Product ids are read from those
//! payloads only. The framework's internal component tree is not walked; it
//! is version-coupled and holds nothing the payload lacks.

use log::{debug, warn};
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::accumulator::ProductOffer;

/// Marker of the streaming data assignment
const STREAMING_DATA_MARKER: &str = "__STREAMING_DATA__";

/// Keys that hold a product id
const ID_KEYS: &[&str] = &["id", "productId"];
/// Keys that hold a variant id
const SKU_KEYS: &[&str] = &["skuId", "sku"];
/// Keys that hold a product title
const TITLE_KEYS: &[&str] = &["title", "name", "subject"];

/// Nested payloads encoded as JSON strings are followed this many levels deep
const MAX_ENCODED_DEPTH: usize = 4;

fn product_id_regex() -> &'static Regex {
    static PRODUCT_ID: OnceLock<Regex> = OnceLock::new();
    PRODUCT_ID.get_or_init(|| Regex::new(r"^\d{13,}$").expect("Failed to compile product id regex"))
}

fn assignment_regex() -> &'static Regex {
    static ASSIGNMENT: OnceLock<Regex> = OnceLock::new();
    ASSIGNMENT.get_or_init(|| {
        Regex::new(r"__STREAMING_DATA__\s*=\s*").expect("Failed to compile assignment regex")
    })
}

/// Product ids are long numeric strings (13 digits or more)
pub fn is_product_id(candidate: &str) -> bool {
    product_id_regex().is_match(candidate)
}

/// JSON payloads embedded in the page's scripts, in document order
pub fn extract_payloads(html: &str) -> Vec<Value> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("script") else {
        return Vec::new();
    };

    let mut payloads = Vec::new();
    for script in document.select(&selector) {
        let text: String = script.text().collect();
        let script_type = script.value().attr("type").unwrap_or("").to_ascii_lowercase();

        if script_type == "application/json" || script_type == "application/ld+json" {
            match serde_json::from_str::<Value>(text.trim()) {
                Ok(value) => payloads.push(value),
                Err(e) => debug!("Skipping unparsable JSON script: {}", e),
            }
            continue;
        }

        if text.contains(STREAMING_DATA_MARKER) {
            for found in assignment_regex().find_iter(&text) {
                match parse_leading_json(&text[found.end()..]) {
                    Some(value) => payloads.push(value),
                    None => warn!("Found {} but could not parse its value", STREAMING_DATA_MARKER),
                }
            }
        }
    }
    payloads
}

/// Parse the JSON value at the start of `text`, ignoring whatever follows it
fn parse_leading_json(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
}

/// All product offers in a page, in payload order (duplicates included)
pub fn extract_product_ids(html: &str) -> Vec<ProductOffer> {
    let mut offers = Vec::new();
    for payload in extract_payloads(html) {
        collect_offers(&payload, &mut offers);
    }
    offers
}

/// Walk a payload and collect every object carrying a product id.
///
/// Top-level keys name the section an offer was found in.
pub fn collect_offers(payload: &Value, offers: &mut Vec<ProductOffer>) {
    match payload {
        Value::Object(sections) => {
            for (section, value) in sections {
                walk(value, Some(section), 0, offers);
            }
            // the root itself can be a product
            if let Some(offer) = offer_from_object(sections, None) {
                offers.push(offer);
            }
        }
        other => walk(other, None, 0, offers),
    }
}

fn walk(value: &Value, section: Option<&str>, encoded_depth: usize, offers: &mut Vec<ProductOffer>) {
    match value {
        Value::Object(object) => {
            if let Some(offer) = offer_from_object(object, section) {
                offers.push(offer);
            }
            for child in object.values() {
                walk(child, section, encoded_depth, offers);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, section, encoded_depth, offers);
            }
        }
        Value::String(text) if encoded_depth < MAX_ENCODED_DEPTH => {
            let trimmed = text.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                if let Ok(nested) = serde_json::from_str::<Value>(text) {
                    walk(&nested, section, encoded_depth + 1, offers);
                }
            }
        }
        _ => {}
    }
}

fn offer_from_object(object: &Map<String, Value>, section: Option<&str>) -> Option<ProductOffer> {
    let product_id = ID_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(scalar_text))
        .find(|candidate| is_product_id(candidate))?;

    Some(ProductOffer {
        product_id,
        sku_id: SKU_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(scalar_text)),
        title: TITLE_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        section: section.map(str::to_string),
    })
}

/// Text of a string or number value
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::accumulator::{accumulate, OfferAccumulator};

    const PAGE: &str = r#"<html><head>
        <script>
            window.__STREAMING_DATA__ = {
                "2198215910": { "data": [
                    { "id": "1005006000000001", "title": "Lamp" },
                    { "id": 1005006000000002 },
                    { "id": "42" }
                ] },
                "6795818760": { "data": [
                    { "products": [
                        { "id": "1005006000000003", "skuId": "12000033" },
                        { "productId": "1005006000000001" }
                    ] }
                ] }
            };
            window.other = 1;
        </script>
        <script type="application/json">{"state": "{\"id\":\"1005006000000004\"}"}</script>
        <script>console.log("no payload here")</script>
    </head><body></body></html>"#;

    #[test]
    fn test_streaming_data_and_json_scripts() {
        let offers = extract_product_ids(PAGE);
        let ids: Vec<&str> = offers.iter().map(|o| o.product_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "1005006000000001",
                "1005006000000002",
                "1005006000000003",
                "1005006000000001",
                "1005006000000004",
            ]
        );

        assert_eq!(offers[0].title.as_deref(), Some("Lamp"));
        assert_eq!(offers[0].section.as_deref(), Some("2198215910"));
        assert_eq!(offers[2].sku_id.as_deref(), Some("12000033"));
        assert_eq!(offers[2].section.as_deref(), Some("6795818760"));
        assert_eq!(offers[4].section.as_deref(), Some("state"));
    }

    #[test]
    fn test_accumulated_ids_are_unique() {
        let (accumulator, added) = accumulate(OfferAccumulator::new(), extract_product_ids(PAGE));
        assert_eq!(added, 4);
        assert_eq!(accumulator.product_ids().len(), 4);

        let (accumulator, added_again) = accumulate(accumulator, extract_product_ids(PAGE));
        assert_eq!(added_again, 0);
        assert_eq!(accumulator.len(), 4);
    }

    #[test]
    fn test_short_ids_are_ignored() {
        assert!(is_product_id("1005006000000001"));
        assert!(!is_product_id("42"));
        assert!(!is_product_id("10050060000000a1"));
    }

    #[test]
    fn test_page_without_payload() {
        assert!(extract_product_ids("<html><body><p>nothing</p></body></html>").is_empty());
    }
}
