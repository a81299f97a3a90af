//! Cascade Inspector
//!
//! Entry point tying the pieces together: load sheets, find the target,
//! collect, sort and attach computed values.

use log::{debug, info, warn};
use serde::Serialize;

use super::collector::DeclarationCollector;
use super::computed::CascadeComputedStyle;
use super::document::{element_label, HtmlDocument};
use super::error::{InspectError, InspectResult};
use super::options::InspectOptions;
use super::parser::CssParser;
use super::precedence::{resolve_cascade, PropertyCascade};
use super::stylesheet::StyleSheet;

/// Result of inspecting one element
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    /// Selector the element was looked up with
    pub selector: String,
    /// Label of the element that was found
    pub element: String,
    /// One cascade per property, in the order properties were first seen
    pub properties: Vec<PropertyCascade>,
    pub total_declarations: usize,
}

impl Inspection {
    pub fn property(&self, name: &str) -> Option<&PropertyCascade> {
        self.properties.iter().find(|cascade| cascade.property == name)
    }

    /// Properties where more than one declaration competed
    pub fn overridden_properties(&self) -> impl Iterator<Item = &PropertyCascade> {
        self.properties.iter().filter(|cascade| cascade.has_overrides())
    }
}

/// Holds the parsed sheets of a document so several elements can be inspected
pub struct CascadeInspector {
    parser: CssParser,
    sheets: Vec<StyleSheet>,
}

impl CascadeInspector {
    /// Load every reachable style sheet of `document`
    pub fn new(document: &HtmlDocument) -> InspectResult<Self> {
        let mut parser = CssParser::new()?;
        let sheets = document.load_stylesheets(&mut parser);
        info!("Loaded {} style sheets", sheets.len());
        Ok(Self { parser, sheets })
    }

    /// Use already parsed sheets instead of the document's own
    pub fn with_sheets(sheets: Vec<StyleSheet>) -> InspectResult<Self> {
        Ok(Self {
            parser: CssParser::new()?,
            sheets,
        })
    }

    pub fn sheets(&self) -> &[StyleSheet] {
        &self.sheets
    }

    /// Resolve the cascade of the first element matching `selector`
    pub fn resolve(
        &mut self,
        document: &HtmlDocument,
        selector: &str,
        options: &InspectOptions,
    ) -> InspectResult<Inspection> {
        let element = document.find_element(selector)?;
        let collector = DeclarationCollector::new(&self.sheets);
        debug!("{} rules can be matched", collector.rule_count());

        let mut map = collector.collect(element, &mut self.parser, options.include_inherited);
        map.retain(|property| options.accepts_property(property));
        let total_declarations = map.total_declarations();

        let computed = CascadeComputedStyle::for_element(&collector, element, &mut self.parser);
        let properties = resolve_cascade(map, &computed);

        Ok(Inspection {
            selector: selector.to_string(),
            element: element_label(element),
            properties,
            total_declarations,
        })
    }
}

/// Inspect one element of a document.
///
/// A selector that matches nothing is reported in the log and yields `Ok(None)`.
pub fn inspect(
    document: &HtmlDocument,
    selector: &str,
    options: &InspectOptions,
) -> InspectResult<Option<Inspection>> {
    let mut inspector = CascadeInspector::new(document)?;
    match inspector.resolve(document, selector, options) {
        Ok(inspection) => Ok(Some(inspection)),
        Err(InspectError::ElementNotFound { selector }) => {
            warn!("Element not found: {}", selector);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
