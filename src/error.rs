//! Error and result types
//!
//! Template problems are real errors and surface at registration time.
//! Navigation outcomes are not errors: a request made while a dispatch pass is
//! running is dropped and reported through [`NavigationResult::Rejected`].

use thiserror::Error;

// ============================================================================
// Template Errors
// ============================================================================

/// A path template that cannot be compiled into a matcher
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `:` that is not followed by a parameter name
    #[error("template `{template}` has an unnamed parameter at byte {position}")]
    EmptyParamName { template: String, position: usize },

    /// The generated expression was rejected by the regex engine
    #[error("template `{template}` could not be compiled")]
    InvalidPattern {
        template: String,
        #[source]
        source: regex::Error,
    },
}

impl TemplateError {
    /// The template that failed to compile
    pub fn template(&self) -> &str {
        match self {
            TemplateError::EmptyParamName { template, .. }
            | TemplateError::InvalidPattern { template, .. } => template,
        }
    }
}

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Result of a `go` or `redirect` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// History was updated and a dispatch pass ran
    Navigated { path: String },
    /// The normalized target equals the current path; nothing happened
    Unchanged { path: String },
    /// A dispatch pass was in progress; the request was dropped
    Rejected { requested: String },
}

impl NavigationResult {
    /// Check if history changed
    pub fn is_navigated(&self) -> bool {
        matches!(self, NavigationResult::Navigated { .. })
    }

    /// Check if the target was already current
    pub fn is_unchanged(&self) -> bool {
        matches!(self, NavigationResult::Unchanged { .. })
    }

    /// Check if the request was dropped
    pub fn is_rejected(&self) -> bool {
        matches!(self, NavigationResult::Rejected { .. })
    }

    /// The path the router ended up on, if the request was processed
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Navigated { path } | NavigationResult::Unchanged { path } => {
                Some(path)
            }
            NavigationResult::Rejected { .. } => None,
        }
    }
}
