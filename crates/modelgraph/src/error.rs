//! Error types for modelgraph operations.
//!
//! This module provides the main error type [`ModelGraphError`] which wraps
//! the error conditions that can occur while loading a model, walking it, and
//! building or rendering its dependency graph.

use std::io;

use thiserror::Error;

use crate::{graph::GraphError, visitor::DispatchError};

/// The main error type for modelgraph operations.
///
/// # Diagnostic Variants
///
/// The `Load` variant keeps the offending source text so that callers can
/// point at the line and column reported by the JSON parser.
#[derive(Debug, Error)]
pub enum ModelGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to load model `{path}`: {err}")]
    Load {
        err: serde_json::Error,
        src: String,
        path: String,
    },

    #[error("Failed to serialize model: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModelGraphError {
    /// Create a new `Load` error with the associated source text.
    pub fn new_load_error(
        err: serde_json::Error,
        src: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::Load {
            err,
            src: src.into(),
            path: path.into(),
        }
    }
}
