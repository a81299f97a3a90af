//! Palette Report
//!
//! Console listing and Markdown report of a [`Palette`].

use std::fmt::Write;

use crate::cascade::report::code_span;

use super::extractor::{ColorUsage, Palette, PaletteCategory};

/// Number of colors given a suggested CSS variable
const CSS_VARIABLE_COUNT: usize = 10;
const PREVIEW_URL: &str = "https://via.placeholder.com/30x30";

const TABLE_HEADER: &str = "| Preview | Hex | RGB | Name | Usage | Sources |";
const TABLE_SEPARATOR: &str = "| --- | --- | --- | --- | --- | --- |";

/// `--color-light-blue` for "Light Blue"
pub fn css_variable_name(color: &ColorUsage) -> String {
    let words: Vec<String> = color
        .name
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    format!("--color-{}", words.join("-"))
}

fn rgb_label(color: &ColorUsage) -> String {
    let (r, g, b) = color.color.rgb();
    format!("rgb({}, {}, {})", r, g, b)
}

pub fn render_console(palette: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Color scheme: {} colors found, {} after filtering",
        palette.total_colors,
        palette.colors.len()
    );
    for color in &palette.colors {
        let _ = writeln!(out, "  {}  {:<13} {}x", color.hex, color.name, color.count);
    }
    for category in PaletteCategory::ALL {
        let mut colors = palette.in_category(category).peekable();
        if colors.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "{}:", category.title());
        for color in colors {
            let _ = writeln!(out, "  {} ({}x)", color.hex, color.count);
        }
    }
    out
}

/// Render the Markdown report. `page` names the analyzed page in the header.
pub fn render_markdown(palette: &Palette, page: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Color Scheme Analysis");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Page:** {}", code_span(page));
    let _ = writeln!(out);
    let _ = writeln!(out, "**Stats:**");
    let _ = writeln!(out, "- Total unique colors found: {}", palette.total_colors);
    let _ = writeln!(out, "- Colors after filtering: {}", palette.colors.len());
    let _ = writeln!(out, "- Total color occurrences: {}", palette.total_occurrences());
    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out);

    let _ = writeln!(out, "## Main Color Palette");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", TABLE_HEADER);
    let _ = writeln!(out, "{}", TABLE_SEPARATOR);
    for color in &palette.colors {
        let digits = color.hex.trim_start_matches('#');
        let _ = writeln!(
            out,
            "| ![]({PREVIEW_URL}/{digits}/{digits}.png) | `{}` | `{}` | {} | {}x | {} |",
            color.hex,
            rgb_label(color),
            color.name,
            color.count,
            color.sources.join(", "),
        );
    }
    let _ = writeln!(out);

    for category in PaletteCategory::ALL {
        let mut colors = palette.in_category(category).peekable();
        if colors.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "## {} Colors", category.title());
        let _ = writeln!(out);
        for color in colors {
            let _ = writeln!(
                out,
                "- **{}** `{}` - Used {} times",
                color.name, color.hex, color.count
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## CSS Variables Suggestion");
    let _ = writeln!(out);
    let _ = writeln!(out, "```css");
    let _ = writeln!(out, ":root {{");
    for color in palette.colors.iter().take(CSS_VARIABLE_COUNT) {
        let _ = writeln!(out, "  {}: {};", css_variable_name(color), color.hex);
    }
    let _ = writeln!(out, "}}");
    let _ = writeln!(out, "```");
    out
}
