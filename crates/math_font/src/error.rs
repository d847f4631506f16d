//! Error types for the math_font crate

use thiserror::Error;

/// Errors that can occur when assembling or querying a font chain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// A font chain must contain at least one font
    #[error("font chain must contain at least one font")]
    EmptyChain,

    /// The character has no glyph in any font of the chain
    #[error("no glyph for {0:?} in any font of the chain")]
    MissingGlyph(char),
}

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;
