//! HTML document snapshot
//!
//! Wraps a parsed HTML document and gives the inspector the two things a
//! browser would: the list of style sheets in document order and native
//! selector matching (both from `scraper`).

use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use url::Url;

use super::constants::{FILE_SCHEME, SOURCE_EMBEDDED_PREFIX};
use super::error::{InspectError, InspectResult, IoContext};
use super::parser::CssParser;
use super::stylesheet::StyleSheet;

/// A parsed HTML document and the URL its relative links resolve against
pub struct HtmlDocument {
    html: Html,
    base_url: Option<Url>,
}

/// Where a style sheet of the document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// Text of the n-th `<style>` element
    Embedded { index: usize, text: String },
    /// `href` of a `<link rel="stylesheet">` element
    Linked { href: String },
}

impl HtmlDocument {
    /// Read and parse an HTML file, relative links resolve against its location
    pub fn load(path: &Path) -> InspectResult<Self> {
        let content = fs::read_to_string(path)
            .with_io_context(&format!("Failed to read document {}", path.display()))?;
        let absolute = fs::canonicalize(path)
            .with_io_context(&format!("Failed to resolve document path {}", path.display()))?;
        let base_url = Url::from_file_path(&absolute).map_err(|_| InspectError::DocumentUrl {
            path: absolute.clone(),
        })?;

        Ok(Self::parse(&content, Some(base_url)))
    }

    /// Parse HTML text; without a base URL only absolute links can be followed
    pub fn parse(content: &str, base_url: Option<Url>) -> Self {
        Self {
            html: Html::parse_document(content),
            base_url,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// First element matching `selector`, like `document.querySelector`
    pub fn find_element(&self, selector: &str) -> InspectResult<ElementRef<'_>> {
        let parsed = Selector::parse(selector).map_err(|e| InspectError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;

        self.html
            .select(&parsed)
            .next()
            .ok_or_else(|| InspectError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    /// Style sheet sources in document order
    pub fn sheet_sources(&self) -> Vec<SheetSource> {
        let Ok(selector) = Selector::parse("style, link") else {
            return Vec::new();
        };

        let mut sources = Vec::new();
        let mut embedded = 0;
        for element in self.html.select(&selector) {
            let node = element.value();
            match node.name() {
                "style" => {
                    sources.push(SheetSource::Embedded {
                        index: embedded,
                        text: element.text().collect(),
                    });
                    embedded += 1;
                }
                "link" if is_stylesheet_link(node.attr("rel")) => match node.attr("href") {
                    Some(href) if !href.trim().is_empty() => sources.push(SheetSource::Linked {
                        href: href.trim().to_string(),
                    }),
                    _ => debug!("Ignoring stylesheet link without href"),
                },
                _ => {}
            }
        }
        sources
    }

    /// Load and parse every reachable style sheet.
    ///
    /// Sheets outside the local file system play the part of cross-origin
    /// sheets: they are skipped with a warning and collection continues.
    pub fn load_stylesheets(&self, parser: &mut CssParser) -> Vec<StyleSheet> {
        let mut sheets = Vec::new();

        for source in self.sheet_sources() {
            let loaded = match source {
                SheetSource::Embedded { index, text } => {
                    let name = format!("{}#{}", SOURCE_EMBEDDED_PREFIX, index);
                    StyleSheet::parse(&name, &text, parser)
                }
                SheetSource::Linked { href } => match self.read_linked_sheet(&href) {
                    Some((url, text)) => StyleSheet::parse(url.as_str(), &text, parser),
                    None => continue,
                },
            };

            match loaded {
                Ok(sheet) => {
                    debug!("Loaded style sheet {} with {} rules", sheet.source, sheet.rules.len());
                    sheets.push(sheet);
                }
                Err(e) => warn!("Skipping style sheet: {}", e),
            }
        }

        sheets
    }

    fn read_linked_sheet(&self, href: &str) -> Option<(Url, String)> {
        let resolved = match &self.base_url {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        let url = match resolved {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping style sheet with unresolvable href {}: {}", href, e);
                return None;
            }
        };

        if url.scheme() != FILE_SCHEME {
            warn!("Cannot access rules of cross-origin style sheet {}, skipping", url);
            return None;
        }

        let path = match url.to_file_path() {
            Ok(path) => path,
            Err(()) => {
                warn!("Skipping style sheet {}: not a local path", url);
                return None;
            }
        };

        match fs::read_to_string(&path) {
            Ok(text) => Some((url, text)),
            Err(e) => {
                warn!("Skipping unreadable style sheet {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn is_stylesheet_link(rel: Option<&str>) -> bool {
    rel.map(|rel| {
        rel.split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
    .unwrap_or(false)
}

/// Short human label for an element: `tag#id.class1.class2`
pub fn element_label(element: ElementRef) -> String {
    let node = element.value();
    let mut label = node.name().to_string();
    if let Some(id) = node.id() {
        label.push('#');
        label.push_str(id);
    }
    for class in node.classes().take(2) {
        label.push('.');
        label.push_str(class);
    }
    label
}

/// Ancestor elements, nearest first
pub fn element_ancestors(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.ancestors().filter_map(ElementRef::wrap)
}
