//! Math Node Kinds - Tagged union of formula constructs
//!
//! Nodes do not own their children directly; the arena stores per-node
//! component lists keyed by `ComponentSlot`, so structural edits and dirty
//! tracking stay in one place.

use crate::array::{ArraySubtype, DelimiterPair};
use serde::{Deserialize, Serialize};

// =============================================================================
// Node Kind - Tagged Union
// =============================================================================

/// The construct a node represents. Child expressions live in the arena's
/// component lists, not in this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathNodeKind {
    /// A run of plain characters laid out as individual glyphs
    Run(String),
    /// Numerator over denominator, with an optional rule and optional
    /// surrounding delimiters (no rule + parens = binomial coefficient)
    Fraction(FractionSubtype),
    /// Radical sign over a radicand, with an optional raised index
    Radical {
        has_index: bool,
    },
    /// A nucleus with up to four attached scripts
    Attach,
    /// An accent character positioned over a nucleus
    Accent {
        accent: char,
        /// Whether the accent should stretch to the nucleus width
        stretchable: bool,
    },
    /// A line or spreader above or below a nucleus
    UnderOver(UnderOverSubtype),
    /// A rectangular grid of cells
    Array {
        subtype: ArraySubtype,
        rows: usize,
        cols: usize,
    },
}

/// Fraction variants: rule visibility and delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionSubtype {
    pub ruler: bool,
    pub delimiters: DelimiterPair,
}

impl FractionSubtype {
    /// An ordinary fraction: visible rule, no delimiters
    pub const FRACTION: Self = Self {
        ruler: true,
        delimiters: DelimiterPair::NONE,
    };

    /// A binomial coefficient: no rule, parentheses
    pub const BINOMIAL: Self = Self {
        ruler: false,
        delimiters: DelimiterPair::PAREN,
    };
}

/// Under/over variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderOverSubtype {
    /// A rule above the nucleus
    Overline,
    /// A rule below the nucleus
    Underline,
    /// A character (brace, arrow, ...) stretched over the nucleus
    Overspreader(char),
    /// A character stretched under the nucleus
    Underspreader(char),
}

impl UnderOverSubtype {
    /// Whether the decoration sits above the nucleus
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Overline | Self::Overspreader(_))
    }

    /// The spreader character, if this variant stretches one
    pub fn spreader(&self) -> Option<char> {
        match self {
            Self::Overspreader(ch) | Self::Underspreader(ch) => Some(*ch),
            Self::Overline | Self::Underline => None,
        }
    }
}

// =============================================================================
// Component Slots
// =============================================================================

/// Names a child expression position within a construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentSlot {
    /// The main expression of scripts, accents, and under/over constructs
    Nucleus,
    /// Post-subscript
    Sub,
    /// Post-superscript
    Sup,
    /// Pre-subscript
    LSub,
    /// Pre-superscript
    LSup,
    Numerator,
    Denominator,
    /// The raised degree of a radical
    Index,
    Radicand,
    /// A grid cell, row-major
    Cell { row: usize, col: usize },
}

impl MathNodeKind {
    /// The slots this construct can carry, in reading order. Array cells are
    /// enumerated from the stored dimensions.
    pub fn slots(&self) -> Vec<ComponentSlot> {
        match self {
            Self::Run(_) => Vec::new(),
            Self::Fraction(_) => vec![ComponentSlot::Numerator, ComponentSlot::Denominator],
            Self::Radical { has_index } => {
                let mut slots = Vec::new();
                if *has_index {
                    slots.push(ComponentSlot::Index);
                }
                slots.push(ComponentSlot::Radicand);
                slots
            }
            Self::Attach => vec![
                ComponentSlot::LSub,
                ComponentSlot::LSup,
                ComponentSlot::Nucleus,
                ComponentSlot::Sub,
                ComponentSlot::Sup,
            ],
            Self::Accent { .. } | Self::UnderOver(_) => vec![ComponentSlot::Nucleus],
            Self::Array { rows, cols, .. } => {
                let mut slots = Vec::with_capacity(rows * cols);
                for row in 0..*rows {
                    for col in 0..*cols {
                        slots.push(ComponentSlot::Cell { row, col });
                    }
                }
                slots
            }
        }
    }
}
