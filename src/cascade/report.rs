//! Report Renderer
//!
//! Pure presentation over an [`Inspection`]: an indented console listing and a
//! Markdown report. [`parse_markdown_table`] reads a property's table back so a
//! saved report can be checked against a fresh resolution.

use std::fmt::Write;

use super::declaration::Declaration;
use super::inspector::Inspection;
use super::options::InspectOptions;
use super::precedence::{PropertyCascade, Status};

const TABLE_HEADER: &str = "| Status | Selector | Specificity | Value | Important | Source | Order |";
const TABLE_SEPARATOR: &str = "| --- | --- | --- | --- | --- | --- | --- |";

/// One row of a property table in the Markdown report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub status: Status,
    pub selector: String,
    pub specificity: String,
    pub value: String,
    pub important: bool,
    pub source: String,
    pub order: u32,
}

/// Properties the options ask to see
fn reported_properties<'a>(
    inspection: &'a Inspection,
    options: &'a InspectOptions,
) -> impl Iterator<Item = &'a PropertyCascade> {
    inspection.properties.iter().filter(move |cascade| {
        (options.show_all_props || cascade.has_overrides())
            && options.accepts_property(&cascade.property)
    })
}

fn source_label(declaration: &Declaration) -> String {
    match &declaration.inherited_from {
        Some(ancestor) => format!("{} (inherited from {})", declaration.source, ancestor),
        None => declaration.source.clone(),
    }
}

fn summary_counts(inspection: &Inspection) -> (usize, usize) {
    (
        inspection.overridden_properties().count(),
        inspection.total_declarations,
    )
}

/// Render the console report
pub fn render_console(inspection: &Inspection, options: &InspectOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Style overrides for {} ({})",
        inspection.selector, inspection.element
    );

    if options.group_by_property {
        for cascade in reported_properties(inspection, options) {
            let computed = cascade.computed.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  {} -> {}", cascade.property, computed);
            for (status, declaration) in cascade.statuses() {
                let _ = write!(
                    out,
                    "    {:<10}  {}{}  {}  [{}]  {}",
                    status,
                    declaration.value,
                    if declaration.important { " !important" } else { "" },
                    declaration.selector,
                    declaration.specificity,
                    source_label(declaration),
                );
                if options.verbose {
                    let _ = write!(out, "  order {}", declaration.order);
                }
                out.push('\n');
            }
        }
    } else {
        for cascade in reported_properties(inspection, options) {
            for (status, declaration) in cascade.statuses() {
                let _ = write!(
                    out,
                    "  [{}] {}: {}{} from {} [{}] in {}",
                    status,
                    cascade.property,
                    declaration.value,
                    if declaration.important { " !important" } else { "" },
                    declaration.selector,
                    declaration.specificity,
                    source_label(declaration),
                );
                if options.verbose {
                    let _ = write!(out, " (order {})", declaration.order);
                }
                out.push('\n');
            }
        }
    }

    let (overridden, total) = summary_counts(inspection);
    let _ = writeln!(
        out,
        "Summary: {} properties with overrides, {} declarations seen",
        overridden, total
    );
    out
}

/// Render the Markdown report
pub fn render_markdown(inspection: &Inspection, options: &InspectOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Cascade report for {}", code_span(&inspection.selector));
    let _ = writeln!(out);
    let _ = writeln!(out, "Element: {}", code_span(&inspection.element));

    for cascade in reported_properties(inspection, options) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", property_heading(&cascade.property));
        let _ = writeln!(out);
        match &cascade.computed {
            Some(value) => {
                let _ = writeln!(out, "Computed: {}", code_span(value));
            }
            None => {
                let _ = writeln!(out, "Computed: _none_");
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", TABLE_HEADER);
        let _ = writeln!(out, "{}", TABLE_SEPARATOR);
        for (status, declaration) in cascade.statuses() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} |",
                status,
                escape_cell(&declaration.selector),
                declaration.specificity,
                escape_cell(&declaration.value),
                if declaration.important { "yes" } else { "no" },
                escape_cell(&source_label(declaration)),
                declaration.order,
            );
        }
    }

    let (overridden, total) = summary_counts(inspection);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Properties with overrides: {}", overridden);
    let _ = writeln!(out, "- Declarations seen: {}", total);
    out
}

/// Read back the table of `property` from a Markdown report.
///
/// Returns `None` when the report has no section for the property or the
/// section has no well-formed table.
pub fn parse_markdown_table(markdown: &str, property: &str) -> Option<Vec<ReportRow>> {
    let heading = property_heading(property);
    let mut lines = markdown
        .lines()
        .map(str::trim)
        .skip_while(|line| *line != heading)
        .skip(1);

    // find the header inside this section only
    loop {
        let line = lines.next()?;
        if line == TABLE_HEADER {
            break;
        }
        if line.starts_with("## ") {
            return None;
        }
    }
    if lines.next()? != TABLE_SEPARATOR {
        return None;
    }

    let mut rows = Vec::new();
    for line in lines {
        if !line.starts_with('|') {
            break;
        }
        rows.push(parse_row(line)?);
    }
    Some(rows)
}

fn parse_row(line: &str) -> Option<ReportRow> {
    let cells = split_cells(line);
    if cells.len() != 7 {
        return None;
    }
    Some(ReportRow {
        status: Status::parse(&cells[0])?,
        selector: cells[1].clone(),
        specificity: cells[2].clone(),
        value: cells[3].clone(),
        important: cells[4] == "yes",
        source: cells[5].clone(),
        order: cells[6].parse().ok()?,
    })
}

fn property_heading(property: &str) -> String {
    format!("## {}", code_span(property))
}

/// Inline code span that survives backticks in `text`
pub fn code_span(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for ch in text.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat(longest + 1);
    let pad = if text.starts_with('`') || text.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{text}{pad}{fence}")
}

fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\").replace('|', "\\|")
}

/// Split a table row into unescaped, trimmed cells
fn split_cells(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    // text after the closing pipe is not a cell
    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }
    cells
}
