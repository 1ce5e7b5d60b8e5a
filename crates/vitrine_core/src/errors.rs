//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! [`VitrineError`] only covers failures that abort a whole operation,
//! typically a load. Partial data defects (a single malformed track, an
//! unresolvable node id) are never errors: they are dropped and logged
//! by the component that encountered them.
//!
//! ```rust,ignore
//! use vitrine_core::errors::{VitrineError, Result};
//!
//! fn load_asset() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for Vitrine.
#[derive(Error, Debug)]
pub enum VitrineError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// A document was readable but its top-level shape is unusable.
    #[error("Invalid document '{uri}': {reason}")]
    InvalidDocument {
        /// Where the document came from
        uri: String,
        /// What was wrong with it
        reason: String,
    },

    /// The whole load pipeline failed; the session will not render.
    #[error("Load failed: {0}")]
    LoadFailed(String),

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// A node lookup by handle, name or tag failed.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// An operation needs a loaded session.
    #[error("Session is not ready")]
    NotReady,

    // ========================================================================
    // I/O & Parsing Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, VitrineError>`.
pub type Result<T> = std::result::Result<T, VitrineError>;
