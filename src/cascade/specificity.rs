//! Selector Specificity
//!
//! Computes the `(ids, classes, types)` weight of a selector with independent
//! regex passes instead of a full selector grammar.
//!
//! ## Known approximations
//!
//! - Combinators are not parsed, so namespace prefixes (`svg|rect`) count as an
//!   extra type and escaped characters (`.a\.b`) split into two tokens.
//! - Malformed selectors never fail. Whatever the passes can recognise is
//!   counted and the rest is ignored, which can yield `(0,0,0)`.
//!
//! The selector engine still decides whether a rule matches; this weight is
//! only used to rank rules that already matched.

use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Specificity triple, compared lexicographically (ids, then classes, then types)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Specificity {
    /// `#id` selectors
    pub ids: u32,
    /// `.class`, `[attr]` and `:pseudo-class` selectors
    pub classes: u32,
    /// Type selectors (`div`, `a`)
    pub types: u32,
}

impl Specificity {
    /// Weight of a selector that contributes nothing (`*`, `:where(...)`)
    pub const ZERO: Specificity = Specificity::new(0, 0, 0);

    /// Weight given to `style` attribute declarations, above any selector
    pub const INLINE: Specificity = Specificity::new(u32::MAX, u32::MAX, u32::MAX);

    pub const fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self { ids, classes, types }
    }

    pub fn is_inline(&self) -> bool {
        *self == Self::INLINE
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inline() {
            write!(f, "inline")
        } else {
            write!(f, "{},{},{}", self.ids, self.classes, self.types)
        }
    }
}

struct SpecificityPatterns {
    /// Innermost `:where(...)`, contributes zero
    where_fn: Regex,
    /// Innermost `:not(...)`, `:is(...)`, `:has(...)`
    logical_fn: Regex,
    /// Any other innermost functional pseudo-class such as `:nth-child(2n)`
    functional: Regex,
    pseudo_element: Regex,
    legacy_pseudo_element: Regex,
    attribute: Regex,
    id: Regex,
    class: Regex,
    pseudo_class: Regex,
    type_name: Regex,
}

fn patterns() -> &'static SpecificityPatterns {
    static PATTERNS: OnceLock<SpecificityPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SpecificityPatterns {
        where_fn: Regex::new(r"(?i):where\([^()]*\)").expect("Failed to compile :where regex"),
        logical_fn: Regex::new(r"(?i):(not|is|has|matches|-webkit-any|-moz-any)\(([^()]*)\)")
            .expect("Failed to compile logical pseudo-class regex"),
        functional: Regex::new(r":([\w-]+)\([^()]*\)")
            .expect("Failed to compile functional pseudo-class regex"),
        pseudo_element: Regex::new(r"::[\w-]+").expect("Failed to compile pseudo-element regex"),
        legacy_pseudo_element: Regex::new(r"(?i):(before|after|first-line|first-letter)\b")
            .expect("Failed to compile legacy pseudo-element regex"),
        attribute: Regex::new(r"\[[^\]]*\]").expect("Failed to compile attribute regex"),
        id: Regex::new(r"#[\w-]+").expect("Failed to compile id regex"),
        class: Regex::new(r"\.[\w-]+").expect("Failed to compile class regex"),
        pseudo_class: Regex::new(r":[\w-]+").expect("Failed to compile pseudo-class regex"),
        type_name: Regex::new(r"[A-Za-z_][\w-]*").expect("Failed to compile type regex"),
    })
}

/// Calculate the specificity of a single (comma-free) selector.
///
/// Pseudo-elements are stripped, `:not()`, `:is()` and `:has()` count as their
/// most specific argument and `:where()` counts as nothing.
///
/// # Examples
/// ```
/// use cascade_probe::cascade::specificity::{calculate_specificity, Specificity};
///
/// assert_eq!(calculate_specificity("#a.b.c div"), Specificity::new(1, 2, 1));
/// assert_eq!(calculate_specificity(":not(.x)"), Specificity::new(0, 1, 0));
/// ```
pub fn calculate_specificity(selector: &str) -> Specificity {
    let p = patterns();
    let mut remaining = unwrap_functional_pseudo_classes(selector);

    remaining = p.pseudo_element.replace_all(&remaining, " ").into_owned();
    remaining = p.legacy_pseudo_element.replace_all(&remaining, " ").into_owned();

    // attributes go first so dots and hashes inside their values are not counted
    let (attributes, rest) = count_and_remove(&p.attribute, &remaining);
    let (ids, rest) = count_and_remove(&p.id, &rest);
    let (classes, rest) = count_and_remove(&p.class, &rest);
    let (pseudo_classes, rest) = count_and_remove(&p.pseudo_class, &rest);
    let types = p.type_name.find_iter(&rest).count() as u32;

    Specificity::new(ids, classes + attributes + pseudo_classes, types)
}

/// Specificity of a selector list: the most specific entry wins
pub fn max_specificity(selector_list: &str) -> Specificity {
    split_selector_list(selector_list)
        .into_iter()
        .map(calculate_specificity)
        .max()
        .unwrap_or(Specificity::ZERO)
}

/// Split a selector list at top-level commas.
///
/// Commas inside parentheses, attribute brackets and quoted strings are kept.
/// Empty entries are dropped.
pub fn split_selector_list(selector_list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, ch) in selector_list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&selector_list[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector_list[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Repeatedly rewrite the innermost functional pseudo-classes until none are left
fn unwrap_functional_pseudo_classes(selector: &str) -> String {
    let p = patterns();
    let mut current = selector.to_string();

    loop {
        let mut next = p.where_fn.replace_all(&current, " ").into_owned();
        next = p
            .logical_fn
            .replace_all(&next, |caps: &Captures| {
                let strongest = split_selector_list(&caps[2])
                    .into_iter()
                    .max_by_key(|argument| calculate_specificity(argument))
                    .unwrap_or("");
                format!(" {} ", strongest)
            })
            .into_owned();
        next = p
            .functional
            .replace_all(&next, |caps: &Captures| {
                let name = caps[1].to_ascii_lowercase();
                if is_selector_taking_function(&name) {
                    // handled by the passes above once its argument is flat
                    caps[0].to_string()
                } else {
                    format!(":{}", &caps[1])
                }
            })
            .into_owned();

        if next == current {
            return next;
        }
        current = next;
    }
}

fn is_selector_taking_function(name: &str) -> bool {
    matches!(name, "not" | "is" | "has" | "where" | "matches" | "-webkit-any" | "-moz-any")
}

fn count_and_remove(pattern: &Regex, input: &str) -> (u32, String) {
    let count = pattern.find_iter(input).count() as u32;
    (count, pattern.replace_all(input, " ").into_owned())
}
