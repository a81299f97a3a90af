//! Palette Extractor
//!
//! Tallies the colors every element of a page ends up with, then filters,
//! merges near-duplicates and sorts what is left into categories.
//!
//! Values come from the cascade's computed style of each element, so an
//! inherited `color` is counted on every element that inherits it.

use log::{debug, info};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use scraper::ElementRef;

use crate::cascade::collector::DeclarationCollector;
use crate::cascade::color::Color;
use crate::cascade::computed::{CascadeComputedStyle, ComputedStyleSource};
use crate::cascade::document::HtmlDocument;
use crate::cascade::error::InspectResult;
use crate::cascade::parser::CssParser;
use crate::cascade::stylesheet::StyleSheet;

use super::options::PaletteOptions;

pub const SOURCE_COLOR: &str = "color";
pub const SOURCE_BACKGROUND: &str = "background-color";
pub const SOURCE_BORDER: &str = "border-color";
pub const SOURCE_OUTLINE: &str = "outline-color";
/// Colors found inside shadows and gradients
pub const SOURCE_GRADIENT: &str = "gradient";

/// Longhands read directly, with the source they are counted under
const COLOR_PROPERTIES: &[(&str, &str)] = &[
    ("color", SOURCE_COLOR),
    ("background-color", SOURCE_BACKGROUND),
    ("border-top-color", SOURCE_BORDER),
    ("border-right-color", SOURCE_BORDER),
    ("border-bottom-color", SOURCE_BORDER),
    ("border-left-color", SOURCE_BORDER),
    ("outline-color", SOURCE_OUTLINE),
];
const SHADOW_PROPERTIES: &[&str] = &["box-shadow", "text-shadow"];

/// Alpha under which a color counts as transparent
const TRANSPARENT_ALPHA: f32 = 0.1;
/// Uses above which an uncategorized color is a primary color
const PRIMARY_MIN_COUNT: usize = 10;

/// Role of a color in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCategory {
    Primary,
    Text,
    Background,
    Accent,
    Neutral,
}

impl PaletteCategory {
    /// Report order
    pub const ALL: [PaletteCategory; 5] = [
        PaletteCategory::Primary,
        PaletteCategory::Text,
        PaletteCategory::Background,
        PaletteCategory::Accent,
        PaletteCategory::Neutral,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PaletteCategory::Primary => "Primary",
            PaletteCategory::Text => "Text",
            PaletteCategory::Background => "Background",
            PaletteCategory::Accent => "Accent",
            PaletteCategory::Neutral => "Neutral",
        }
    }
}

/// One distinct color (by hex) and where it was used
#[derive(Debug, Clone)]
pub struct ColorUsage {
    pub hex: String,
    /// First parsed value with this hex, alpha included
    pub color: Color,
    pub count: usize,
    /// Sources in the order they were first seen
    pub sources: Vec<String>,
    pub luminance: f64,
    pub name: &'static str,
}

impl ColorUsage {
    fn new(color: Color) -> Self {
        Self {
            hex: color.to_hex(),
            color,
            count: 0,
            sources: Vec::new(),
            luminance: color.luminance(),
            name: color_name(color.r, color.g, color.b),
        }
    }

    pub fn category(&self) -> PaletteCategory {
        let has_source = |source: &str| self.sources.iter().any(|s| s == source);
        if ["Gray", "White", "Black"].iter().any(|n| self.name.contains(n)) {
            PaletteCategory::Neutral
        } else if has_source(SOURCE_COLOR) {
            PaletteCategory::Text
        } else if has_source(SOURCE_BACKGROUND) {
            PaletteCategory::Background
        } else if self.count > PRIMARY_MIN_COUNT {
            PaletteCategory::Primary
        } else {
            PaletteCategory::Accent
        }
    }
}

/// The extracted palette
#[derive(Debug, Clone)]
pub struct Palette {
    /// Distinct colors seen before filtering
    pub total_colors: usize,
    /// Kept colors, most used first
    pub colors: Vec<ColorUsage>,
}

impl Palette {
    pub fn total_occurrences(&self) -> usize {
        self.colors.iter().map(|c| c.count).sum()
    }

    pub fn in_category(&self, category: PaletteCategory) -> impl Iterator<Item = &ColorUsage> {
        self.colors.iter().filter(move |c| c.category() == category)
    }
}

/// Counts colors by hex in first-seen order
#[derive(Debug, Default)]
pub struct ColorTally {
    entries: Vec<ColorUsage>,
    index: HashMap<String, usize>,
    include_transparent: bool,
}

impl ColorTally {
    pub fn new(include_transparent: bool) -> Self {
        Self {
            include_transparent,
            ..Self::default()
        }
    }

    /// Count one use of `value`. Returns false when it is not a countable color.
    pub fn add(&mut self, value: &str, source: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return false;
        }
        let Some(color) = Color::parse(value) else {
            debug!("Not a color value: {}", value);
            return false;
        };
        if !self.include_transparent && color.a < TRANSPARENT_ALPHA {
            return false;
        }

        let hex = color.to_hex();
        let slot = match self.index.get(&hex) {
            Some(&slot) => slot,
            None => {
                self.entries.push(ColorUsage::new(color));
                self.index.insert(hex, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[slot];
        entry.count += 1;
        if !entry.sources.iter().any(|s| s == source) {
            entry.sources.push(source.to_string());
        }
        true
    }

    /// Count every color embedded in a shadow or gradient value
    pub fn add_embedded(&mut self, value: &str) {
        for found in embedded_color_pattern().find_iter(value) {
            self.add(found.as_str(), SOURCE_GRADIENT);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filter, group and cap the tally
    pub fn into_palette(self, options: &PaletteOptions) -> Palette {
        let total_colors = self.entries.len();
        let mut colors: Vec<ColorUsage> = self
            .entries
            .into_iter()
            .filter(|c| c.count >= options.min_occurrence)
            .collect();
        colors.sort_by(|a, b| b.count.cmp(&a.count));

        let colors = if options.group_similar {
            group_similar(colors, options.similarity_threshold, options.max_colors)
        } else {
            colors.truncate(options.max_colors);
            colors
        };
        Palette {
            total_colors,
            colors,
        }
    }
}

fn embedded_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(#[0-9a-f]{3,6}|rgba?\([^)]+\)|hsla?\([^)]+\))")
            .expect("Failed to compile embedded color regex")
    })
}

/// Merge each color with the unclaimed colors within `threshold` of it.
///
/// Colors are visited most used first. Groups are ranked by their combined
/// count and represented by the color that started them.
fn group_similar(colors: Vec<ColorUsage>, threshold: f64, max_colors: usize) -> Vec<ColorUsage> {
    let mut used = vec![false; colors.len()];
    let mut groups: Vec<(usize, usize)> = Vec::new();

    for primary in 0..colors.len() {
        if used[primary] {
            continue;
        }
        let mut total = colors[primary].count;
        for other in 0..colors.len() {
            if other == primary || used[other] {
                continue;
            }
            if colors[primary].color.distance(&colors[other].color) <= threshold {
                debug!("Grouping {} with {}", colors[other].hex, colors[primary].hex);
                total += colors[other].count;
                used[other] = true;
            }
        }
        used[primary] = true;
        groups.push((primary, total));
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups.truncate(max_colors);

    let mut slots: Vec<Option<ColorUsage>> = colors.into_iter().map(Some).collect();
    groups
        .into_iter()
        .filter_map(|(primary, _)| slots[primary].take())
        .collect()
}

/// Descriptive name from the dominant channel and luminance
pub fn color_name(r: u8, g: u8, b: u8) -> &'static str {
    let luminance = Color::new_rgb(r, g, b).luminance();
    let (ri, gi, bi) = (r as i16, g as i16, b as i16);

    if (ri - gi).abs() < 10 && (gi - bi).abs() < 10 && (ri - bi).abs() < 10 {
        return match luminance {
            l if l > 0.9 => "White",
            l if l < 0.1 => "Black",
            l if l > 0.7 => "Light Gray",
            l if l < 0.3 => "Dark Gray",
            _ => "Gray",
        };
    }

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let saturation = (max - min) as f64 / max.max(1) as f64;
    let light = luminance > 0.5;
    if saturation < 0.2 {
        return if light { "Light Gray" } else { "Dark Gray" };
    }

    let pick = |light_name: &'static str, name: &'static str| if light { light_name } else { name };
    if r == max {
        if g > b {
            pick("Light Orange", "Orange")
        } else if b > g {
            pick("Light Pink", "Red")
        } else {
            pick("Light Red", "Red")
        }
    } else if g == max {
        if r > b {
            pick("Light Yellow", "Yellow")
        } else {
            pick("Light Green", "Green")
        }
    } else if r > g {
        pick("Light Purple", "Purple")
    } else {
        pick("Light Blue", "Blue")
    }
}

/// Count the colors of one element's computed style
pub fn tally_element(style: &impl ComputedStyleSource, tally: &mut ColorTally, options: &PaletteOptions) {
    let text_color = style.computed_value("color");

    for (property, source) in COLOR_PROPERTIES {
        let Some(value) = style.computed_value(property) else {
            continue;
        };
        if value.eq_ignore_ascii_case("currentcolor") {
            if let Some(text_color) = &text_color {
                tally.add(text_color, source);
            }
        } else {
            tally.add(&value, source);
        }
    }

    for property in SHADOW_PROPERTIES {
        if let Some(value) = style.computed_value(property) {
            if !value.eq_ignore_ascii_case("none") {
                tally.add_embedded(&value);
            }
        }
    }

    if options.include_gradients {
        if let Some(image) = style.computed_value("background-image") {
            if image.to_ascii_lowercase().contains("gradient") {
                tally.add_embedded(&image);
            }
        }
    }
}

/// Holds the parsed sheets of a document and extracts its palette
pub struct PaletteExtractor {
    parser: CssParser,
    sheets: Vec<StyleSheet>,
}

impl PaletteExtractor {
    pub fn new(document: &HtmlDocument) -> InspectResult<Self> {
        let mut parser = CssParser::new()?;
        let sheets = document.load_stylesheets(&mut parser);
        info!("Loaded {} style sheets", sheets.len());
        Ok(Self { parser, sheets })
    }

    pub fn with_sheets(sheets: Vec<StyleSheet>) -> InspectResult<Self> {
        Ok(Self {
            parser: CssParser::new()?,
            sheets,
        })
    }

    /// Tally every element of the document and build the palette
    pub fn extract(&mut self, document: &HtmlDocument, options: &PaletteOptions) -> Palette {
        let collector = DeclarationCollector::new(&self.sheets);
        let mut tally = ColorTally::new(options.include_transparent);

        let mut scanned = 0;
        for element in document
            .html()
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
        {
            let style = CascadeComputedStyle::for_element(&collector, element, &mut self.parser);
            tally_element(&style, &mut tally, options);
            scanned += 1;
        }
        info!("Scanned {} elements, {} distinct colors", scanned, tally.len());

        tally.into_palette(options)
    }
}
