//! Error types for the math model crate

use crate::node::ComponentSlot;
use thiserror::Error;

/// Errors raised by arena lookups and edits
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown node id: {0}")]
    UnknownNode(u32),

    #[error("node has no {0:?} component")]
    InvalidSlot(ComponentSlot),

    #[error("node is not a run of text")]
    NotARun,

    #[error("cell ({row}, {col}) is out of bounds for a {rows}x{cols} array")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
