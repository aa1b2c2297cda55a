//! Foundational error type, shared by every crate in the workspace.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant (via `#[from]`) rather than flattening everything into this one.

use thiserror::Error;

/// The base error type for `route-core` and a common building block for
/// sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid format: {fragment}")]
    InvalidFormat { fragment: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `route-core`.
pub type CoreResult<T> = Result<T, CoreError>;
