//! Error types for the cascade module
//!
//! This module defines custom error types using thiserror for the cascade
//! inspector and the page scrapers built on top of it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cascade inspection
#[derive(Error, Debug)]
pub enum InspectError {
    /// IO errors (reading documents, style sheets, state files)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing/serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The target selector matched no element in the document
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    /// The target selector could not be parsed by the selector engine
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// A document path could not be turned into a base URL
    #[error("Cannot build a document URL for {path:?}")]
    DocumentUrl { path: PathBuf },

    /// Tree-sitter language setup errors
    #[error("Failed to set up tree-sitter language: {message}")]
    TreeSitterLanguage { message: String },

    /// Style sheet text that tree-sitter refused to parse
    #[error("Parse error in style sheet {source_name}: {message}")]
    Parse { source_name: String, message: String },

    /// Invalid command line usage
    #[error("Usage error: {message}")]
    Usage { message: String },
}

/// Result type alias for cascade operations
pub type InspectResult<T> = Result<T, InspectError>;

impl From<std::io::Error> for InspectError {
    fn from(err: std::io::Error) -> Self {
        InspectError::Io {
            source: err,
            message: "IO operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for InspectError {
    fn from(err: serde_json::Error) -> Self {
        InspectError::Json {
            source: err,
            message: "JSON operation failed".to_string(),
        }
    }
}

/// Helper trait for converting IO errors with context
pub trait IoContext<T> {
    fn with_io_context(self, message: &str) -> InspectResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_io_context(self, message: &str) -> InspectResult<T> {
        self.map_err(|e| InspectError::Io {
            message: message.to_string(),
            source: e,
        })
    }
}

/// Helper trait for converting JSON errors with context
pub trait JsonContext<T> {
    fn with_json_context(self, message: &str) -> InspectResult<T>;
}

impl<T> JsonContext<T> for Result<T, serde_json::Error> {
    fn with_json_context(self, message: &str) -> InspectResult<T> {
        self.map_err(|e| InspectError::Json {
            message: message.to_string(),
            source: e,
        })
    }
}
