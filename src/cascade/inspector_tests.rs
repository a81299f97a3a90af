//! End-to-end tests for the cascade inspector

use super::document::HtmlDocument;
use super::error::InspectError;
use super::inspector::{inspect, CascadeInspector};
use super::options::InspectOptions;
use super::precedence::Status;
use super::specificity::Specificity;
use crate::test_utils::write_fixture;

fn resolve(html: &str, selector: &str, options: &InspectOptions) -> super::inspector::Inspection {
    let document = HtmlDocument::parse(html, None);
    let mut inspector = CascadeInspector::new(&document).unwrap();
    inspector.resolve(&document, selector, options).unwrap()
}

#[test]
fn test_inline_beats_sheet_rule() {
    let html = r#"<html><head><style>a { color: red; }</style></head>
        <body><a href="/" style="color:blue">x</a></body></html>"#;
    let inspection = resolve(html, "a", &InspectOptions::default());

    let color = inspection.property("color").unwrap();
    let statuses: Vec<(Status, &str)> = color
        .statuses()
        .map(|(status, d)| (status, d.value.as_str()))
        .collect();
    assert_eq!(
        statuses,
        vec![(Status::Applied, "blue"), (Status::Overridden, "red")]
    );
    assert_eq!(color.declarations[1].order, 0);
    assert!(color.winner().unwrap().is_inline);
    assert_eq!(color.computed.as_deref(), Some("blue"));
}

#[test]
fn test_importance_beats_specificity() {
    let html = r#"<html><head><style>
        .btn { color: red !important; }
        #btn { color: blue; }
    </style></head><body><button id="btn" class="btn">x</button></body></html>"#;
    let inspection = resolve(html, "button", &InspectOptions::default());

    let color = inspection.property("color").unwrap();
    let winner = color.winner().unwrap();
    assert_eq!(winner.value, "red");
    assert_eq!(winner.order, 0);
    assert_eq!(color.declarations[1].selector, "#btn");
    assert_eq!(color.declarations[1].order, 1);
}

#[test]
fn test_order_is_global_across_sheets() {
    let html = r#"<html><head>
        <style>p { width: 1px; color: red; }</style>
        <style>p { width: 2px; }</style>
    </head><body><p style="height: 0">x</p></body></html>"#;
    let inspection = resolve(html, "p", &InspectOptions::default());

    let width = inspection.property("width").unwrap();
    assert_eq!(width.winner().unwrap().value, "2px");
    assert_eq!(width.winner().unwrap().order, 2);
    assert_eq!(width.winner().unwrap().source, "<style>#1");

    let height = inspection.property("height").unwrap();
    assert_eq!(height.winner().unwrap().order, 3);

    assert_eq!(inspection.total_declarations, 4);
    let properties: Vec<&str> = inspection.properties.iter().map(|p| p.property.as_str()).collect();
    assert_eq!(properties, vec!["width", "color", "height"]);
}

#[test]
fn test_selector_list_records_best_matching_entry() {
    let html = r#"<html><head><style>
        div, #main.card, .card { color: red; }
    </style></head><body><section id="main" class="card">x</section></body></html>"#;
    let inspection = resolve(html, "section", &InspectOptions::default());

    let winner = inspection.property("color").unwrap().winner().unwrap().clone();
    assert_eq!(winner.selector, "#main.card");
    assert_eq!(winner.specificity, Specificity::new(1, 1, 0));
}

#[test]
fn test_non_matching_and_unsupported_rules_are_ignored() {
    let html = r#"<html><head><style>
        span { color: red; }
        p::before { content: "x"; }
        p:hover { color: green; }
        p { color: blue; }
    </style></head><body><p>x</p></body></html>"#;
    let inspection = resolve(html, "p", &InspectOptions::default());

    assert!(inspection.property("content").is_none());
    let color = inspection.property("color").unwrap();
    assert_eq!(color.declarations.len(), 1);
    assert_eq!(color.winner().unwrap().value, "blue");
}

#[test]
fn test_include_inherited() {
    let html = r#"<html><head><style>
        body { color: gray; margin: 0; }
        .wrap { color: navy; font-size: 18px; }
        em { font-style: normal; }
    </style></head><body><div class="wrap"><em>x</em></div></body></html>"#;

    let options = InspectOptions {
        include_inherited: true,
        ..InspectOptions::default()
    };
    let inspection = resolve(html, "em", &options);

    let color = inspection.property("color").unwrap();
    let values: Vec<&str> = color.declarations.iter().map(|d| d.value.as_str()).collect();
    assert_eq!(values, vec!["navy", "gray"]);
    assert_eq!(color.winner().unwrap().inherited_from.as_deref(), Some("div.wrap"));
    assert_eq!(color.winner().unwrap().depth, 1);

    // margin does not inherit
    assert!(inspection.property("margin").is_none());
    assert_eq!(
        inspection.property("font-size").unwrap().computed.as_deref(),
        Some("18px")
    );

    let without = resolve(html, "em", &InspectOptions::default());
    assert!(without.property("color").is_none());
    assert_eq!(without.properties.len(), 1);
}

#[test]
fn test_filter_props() {
    let html = r#"<html><head><style>p { color: red; margin: 0; }</style></head>
        <body><p>x</p></body></html>"#;
    let options = InspectOptions {
        filter_props: Some(vec!["margin".to_string()]),
        ..InspectOptions::default()
    };
    let inspection = resolve(html, "p", &options);
    let properties: Vec<&str> = inspection.properties.iter().map(|p| p.property.as_str()).collect();
    assert_eq!(
        properties,
        vec!["margin-top", "margin-right", "margin-bottom", "margin-left"]
    );
    assert_eq!(inspection.total_declarations, 4);
}

#[test]
fn test_shorthand_overrides_earlier_longhand() {
    let html = r#"<html><head><style>
        p { margin-top: 5px; }
        p.x { margin: 0; }
    </style></head><body><p class="x">x</p></body></html>"#;
    let inspection = resolve(html, "p", &InspectOptions::default());

    assert!(inspection.property("margin").is_none());
    let top = inspection.property("margin-top").unwrap();
    assert_eq!(top.declarations.len(), 2);
    assert_eq!(top.winner().unwrap().value, "0");
    assert_eq!(top.winner().unwrap().selector, "p.x");
    assert_eq!(top.computed.as_deref(), Some("0"));
    assert_eq!(top.declarations[1].value, "5px");

    let left = inspection.property("margin-left").unwrap();
    assert_eq!(left.declarations.len(), 1);
    assert_eq!(inspection.total_declarations, 5);
}

#[test]
fn test_inline_shorthand_expands() {
    let html = r#"<html><head><style>div { border-top-color: red; }</style></head>
        <body><div style="border: 1px solid blue">x</div></body></html>"#;
    let inspection = resolve(html, "div", &InspectOptions::default());

    let color = inspection.property("border-top-color").unwrap();
    assert_eq!(color.winner().unwrap().value, "blue");
    assert!(color.winner().unwrap().is_inline);
    assert_eq!(
        inspection.property("border-left-style").unwrap().computed.as_deref(),
        Some("solid")
    );
}

#[test]
fn test_element_not_found_yields_none() {
    let document = HtmlDocument::parse("<html><body><p>x</p></body></html>", None);
    let result = inspect(&document, "#missing", &InspectOptions::default()).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_invalid_selector_is_an_error() {
    let document = HtmlDocument::parse("<html><body><p>x</p></body></html>", None);
    let result = inspect(&document, "p[", &InspectOptions::default());
    assert!(matches!(result, Err(InspectError::InvalidSelector { .. })));
}

#[test]
fn test_linked_sheets_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "base.css", "h1 { color: red; }");
    write_fixture(dir.path(), "theme/override.css", "h1.title { color: green; }");
    let page = write_fixture(
        dir.path(),
        "page.html",
        r#"<html><head>
            <link rel="stylesheet" href="base.css">
            <link rel="stylesheet" href="http://example.com/cdn.css">
            <link rel="stylesheet" href="theme/override.css">
        </head><body><h1 class="title">x</h1></body></html>"#,
    );

    let document = HtmlDocument::load(&page).unwrap();
    let inspection = inspect(&document, "h1", &InspectOptions::default())
        .unwrap()
        .unwrap();

    let color = inspection.property("color").unwrap();
    assert_eq!(color.winner().unwrap().value, "green");
    assert!(color.winner().unwrap().source.ends_with("theme/override.css"));
    assert!(color.declarations[1].source.ends_with("base.css"));
}
