//! Common types shared across the Presence crates.
//!
//! This crate holds the pipeline error type, the [`Stage`] tag used to
//! attribute upstream failures, and the [`observability`] helpers. It stays
//! dependency-light so every crate in the workspace can depend on it.
//!
//! # Overview
//!
//! - [`Stage`]: one step of the answer pipeline (search, extract, summarize)
//! - [`PresenceError`] and [`Result`]: stage-tagged error handling
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use presence_common::{PresenceError, Stage};
//!
//! let err = PresenceError::upstream(Stage::Search, "quota exceeded");
//! assert_eq!(err.stage(), Some(Stage::Search));
//! assert_eq!(err.to_string(), "search failed: quota exceeded");
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod observability;

/// One discrete step of the answer pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Search,
    Extract,
    Summarize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Search => "search",
            Stage::Extract => "extract",
            Stage::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types produced by the answer pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PresenceError {
    /// A required input was missing or blank.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An external collaborator (search oracle, page fetch, generation
    /// oracle) failed or was misconfigured.
    #[error("{stage} failed: {message}")]
    Upstream { stage: Stage, message: String },

    /// An upstream step succeeded but produced nothing usable.
    #[error("{stage} found nothing: {message}")]
    NotFound { stage: Stage, message: String },

    /// A stage exceeded its time budget.
    #[error("{stage} timed out after {after_ms} ms")]
    Timeout { stage: Stage, after_ms: u64 },
}

impl PresenceError {
    pub fn upstream(stage: Stage, message: impl Into<String>) -> Self {
        Self::Upstream {
            stage,
            message: message.into(),
        }
    }

    pub fn not_found(stage: Stage, message: impl Into<String>) -> Self {
        Self::NotFound {
            stage,
            message: message.into(),
        }
    }

    /// The pipeline stage the error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Validation(_) => None,
            Self::Upstream { stage, .. }
            | Self::NotFound { stage, .. }
            | Self::Timeout { stage, .. } => Some(*stage),
        }
    }

    /// Short reason without the stage prefix, suitable for client messages.
    pub fn reason(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Upstream { message, .. } | Self::NotFound { message, .. } => message.clone(),
            Self::Timeout { after_ms, .. } => format!("timed out after {after_ms} ms"),
        }
    }
}

/// Convenient alias for results that use [`PresenceError`].
pub type Result<T> = std::result::Result<T, PresenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_lowercase() {
        let json = serde_json::to_string(&Stage::Summarize).unwrap();
        assert_eq!(json, "\"summarize\"");
    }

    #[test]
    fn validation_has_no_stage() {
        let err = PresenceError::Validation("question is empty".into());
        assert_eq!(err.stage(), None);
        assert_eq!(err.reason(), "question is empty");
    }

    #[test]
    fn timeout_reason_mentions_budget() {
        let err = PresenceError::Timeout {
            stage: Stage::Extract,
            after_ms: 250,
        };
        assert_eq!(err.stage(), Some(Stage::Extract));
        assert_eq!(err.to_string(), "extract timed out after 250 ms");
        assert_eq!(err.reason(), "timed out after 250 ms");
    }
}
