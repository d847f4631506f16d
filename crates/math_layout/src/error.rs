//! Error types for the layout crate

use thiserror::Error;

/// Errors raised while typesetting a formula
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Font(#[from] math_font::FontError),

    #[error(transparent)]
    Model(#[from] math_model::ModelError),

    #[error("node {0} has no cached layout result")]
    MissingCache(u32),
}

/// Result type alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
