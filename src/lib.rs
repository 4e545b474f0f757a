//! # Promptdeck
//!
//! Variable-templating and similarity-graph engine for a local,
//! single-user prompt library.
//!
//! Prompts are text snippets containing `{{variable}}` placeholders,
//! organized with categories, tags, and favorites. This crate provides the
//! two algorithmic cores behind such a library:
//!
//! - **Variable engine** — extracts `{{name}}` tokens from prompt content,
//!   reconciles them with stored variable definitions, substitutes values,
//!   and reports which variables are still unfilled (live preview).
//! - **Galaxy builder** — scores pairwise prompt similarity from weighted
//!   category/tag/title signals, builds an undirected weighted graph,
//!   partitions it into clusters, and computes a 3D spring layout plus
//!   summary statistics for visualization.
//!
//! Both components are pure and stateless: they perform no I/O, hold
//! nothing between calls, and are deterministic given their inputs (the
//! layout additionally requires a fixed seed). Storage and rendering are
//! collaborator concerns behind the [`PromptStore`] seam.
//!
//! ## Example
//!
//! ```rust
//! use promptdeck::models::prompt::render_preview;
//! use std::collections::HashMap;
//!
//! let mut values = HashMap::new();
//! values.insert("name".to_string(), "Ana".to_string());
//!
//! let preview = render_preview("Hello {{name}}, you are {{age}} years old", &values);
//! assert_eq!(preview.text, "Hello Ana, you are {{age}} years old");
//! assert_eq!(preview.missing, vec!["age"]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{GalaxyConfig, NodeStyle};
pub use models::{
    GalaxyGraph, GalaxyNode, GalaxyStats, Position, Prompt, PromptId, SimilarityEdge, Variable,
    VariableType,
};
pub use services::{
    GalaxyBuilder, GalaxyFilter, LayoutEngine, LibraryFilter, SimilarityWeights, SpringLayout,
};
pub use storage::{InMemoryPromptStore, PromptStore};

/// Error type for promptdeck operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed JSON on import, empty titles, invalid variable names |
/// | `InvalidConfig` | Threshold outside \[0,1\], weights not summing to 1.0 |
/// | `OperationFailed` | Storage collaborator failures (lock poisoning, backend errors) |
///
/// Malformed `{{...}}` tokens in prompt content are deliberately NOT errors:
/// extraction and substitution treat them as literal text so prompts can
/// contain brace sequences unrelated to variables.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Import JSON fails to deserialize
    /// - An imported prompt has an empty title or an invalid variable name
    /// - Prompt field limits are violated (title/content/category length)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration was provided.
    ///
    /// Raised at construction time, before any scoring happens:
    /// - Similarity weights do not sum to 1.0, or fall outside \[0,1\]
    /// - Edge threshold falls outside \[0,1\]
    /// - Node style or layout constants are non-finite or non-positive
    /// - The prompt set exceeds the configured `max_prompts` cap
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation failed.
    ///
    /// Raised when a [`PromptStore`] implementation fails, e.g. a poisoned
    /// lock in the in-memory store or a backend error in a host-provided one.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for promptdeck operations.
pub type Result<T> = std::result::Result<T, Error>;
