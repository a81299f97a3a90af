//! Precedence Sorter
//!
//! Orders the declarations of one property the way the cascade does:
//! own declarations before inherited ones (nearest ancestor first), then
//! importance, then origin (inline before sheets), then specificity, then
//! source order. An important sheet declaration therefore beats a normal
//! inline one, while an important inline declaration beats everything.

use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::fmt;

use super::computed::ComputedStyleSource;
use super::declaration::{Declaration, DeclarationMap};
use super::specificity::Specificity;

/// Sort key of a declaration, larger wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CascadePriority {
    proximity: Reverse<u32>,
    important: bool,
    inline: bool,
    specificity: Specificity,
    order: u32,
}

impl CascadePriority {
    pub fn of(declaration: &Declaration) -> Self {
        Self {
            proximity: Reverse(declaration.depth),
            important: declaration.important,
            inline: declaration.is_inline,
            specificity: declaration.specificity,
            order: declaration.order,
        }
    }
}

/// `Greater` when `a` takes precedence over `b`
pub fn compare_precedence(a: &Declaration, b: &Declaration) -> Ordering {
    CascadePriority::of(a).cmp(&CascadePriority::of(b))
}

/// Sort so the winning declaration comes first
pub fn sort_by_precedence(declarations: &mut [Declaration]) {
    declarations.sort_by(|a, b| compare_precedence(b, a));
}

/// The winning declaration of an unsorted list
pub fn winning_declaration(declarations: &[Declaration]) -> Option<&Declaration> {
    declarations.iter().max_by(|a, b| compare_precedence(a, b))
}

/// Whether a declaration won or lost the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Applied,
    Overridden,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Applied => "APPLIED",
            Status::Overridden => "OVERRIDDEN",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "APPLIED" => Some(Status::Applied),
            "OVERRIDDEN" => Some(Status::Overridden),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Resolved cascade of a single property
#[derive(Debug, Clone, Serialize)]
pub struct PropertyCascade {
    pub property: String,
    /// All matching declarations, winner first
    pub declarations: Vec<Declaration>,
    /// Computed value for cross-checking the winner
    pub computed: Option<String>,
}

impl PropertyCascade {
    pub fn winner(&self) -> Option<&Declaration> {
        self.declarations.first()
    }

    /// More than one declaration competed for this property
    pub fn has_overrides(&self) -> bool {
        self.declarations.len() > 1
    }

    /// Declarations paired with their status, winner first
    pub fn statuses(&self) -> impl Iterator<Item = (Status, &Declaration)> {
        self.declarations.iter().enumerate().map(|(index, declaration)| {
            let status = if index == 0 {
                Status::Applied
            } else {
                Status::Overridden
            };
            (status, declaration)
        })
    }
}

/// Sort every property's declarations and attach computed values
pub fn resolve_cascade(
    map: DeclarationMap,
    computed: &dyn ComputedStyleSource,
) -> Vec<PropertyCascade> {
    map.into_entries()
        .into_iter()
        .map(|(property, mut declarations)| {
            sort_by_precedence(&mut declarations);
            let computed = computed.computed_value(&property);
            PropertyCascade {
                property,
                declarations,
                computed,
            }
        })
        .collect()
}
