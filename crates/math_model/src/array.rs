//! Array Subtypes - Grid environments and their layout policies
//!
//! Each environment fixes its delimiters, row/column gaps, and per-cell
//! alignment. The layout crate queries these policies instead of matching on
//! environment names.

use math_font::Em;
use serde::{Deserialize, Serialize};

// =============================================================================
// Delimiters
// =============================================================================

/// An optional pair of stretched delimiters around an array or fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair {
    pub open: Option<char>,
    pub close: Option<char>,
}

impl DelimiterPair {
    pub const NONE: Self = Self { open: None, close: None };
    pub const PAREN: Self = Self { open: Some('('), close: Some(')') };
    pub const BRACKET: Self = Self { open: Some('['), close: Some(']') };
    pub const BRACE: Self = Self { open: Some('{'), close: Some('}') };
    pub const VERT: Self = Self { open: Some('|'), close: Some('|') };
    pub const DOUBLE_VERT: Self = Self {
        open: Some('\u{2016}'),
        close: Some('\u{2016}'),
    };
    /// Left brace only, used by `cases`
    pub const LBRACE: Self = Self { open: Some('{'), close: None };

    pub fn is_none(&self) -> bool {
        self.open.is_none() && self.close.is_none()
    }
}

// =============================================================================
// Environments
// =============================================================================

/// How a cell's content sits within its column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellAlignment {
    Start,
    Center,
    End,
}

impl CellAlignment {
    /// Horizontal offset of the cell content given the free width of the
    /// column after subtracting the content width
    pub fn position(&self, free: f32) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Center => free / 2.0,
            Self::End => free,
        }
    }
}

/// The grid environments the layout engine knows how to typeset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArraySubtype {
    /// `aligned`: alternating right/left columns, spacing-aware gaps
    Aligned,
    /// `align`: display-level variant of `aligned`
    Align,
    /// `cases`: left brace, start-aligned cells
    Cases,
    /// `gathered`: centered rows, no delimiters
    Gathered,
    /// `gather`: display-level variant of `gathered`
    Gather,
    /// Matrix family, parameterized by its delimiter pair
    Matrix(DelimiterPair),
    /// `multline`: first row left, last row right, middle centered
    Multline,
    /// `substack`: tightly stacked rows in script style
    Substack,
}

impl ArraySubtype {
    /// Vertical gap inserted between consecutive rows
    pub fn row_gap(&self) -> Em {
        match self {
            Self::Aligned | Self::Align | Self::Gathered | Self::Gather | Self::Multline => {
                Em::new(0.5)
            }
            Self::Cases | Self::Matrix(_) => Em::new(0.3),
            Self::Substack => Em::ZERO,
        }
    }

    /// Delimiters stretched around the whole grid
    pub fn delimiters(&self) -> DelimiterPair {
        match self {
            Self::Cases => DelimiterPair::LBRACE,
            Self::Matrix(pair) => *pair,
            _ => DelimiterPair::NONE,
        }
    }

    /// Alignment of the cell at `(row, col)` in a grid of `row_count` rows
    pub fn cell_alignment(&self, row: usize, col: usize, row_count: usize) -> CellAlignment {
        match self {
            // Alternating columns: equation ends, then continuations start
            Self::Aligned | Self::Align => {
                if col % 2 == 0 {
                    CellAlignment::End
                } else {
                    CellAlignment::Start
                }
            }
            Self::Multline => {
                if row == 0 {
                    CellAlignment::Start
                } else if row + 1 == row_count {
                    CellAlignment::End
                } else {
                    CellAlignment::Center
                }
            }
            Self::Cases => CellAlignment::Start,
            _ => CellAlignment::Center,
        }
    }

    /// Whether column gaps are derived from atom spacing across the column
    /// boundary rather than a fixed width
    pub fn uses_spacing_column_gap(&self) -> bool {
        matches!(self, Self::Aligned | Self::Align)
    }

    /// Fixed column gap, used when spacing-derived gaps do not apply or no
    /// adjacent atoms exist to derive one from
    pub fn column_gap(&self) -> Em {
        match self {
            Self::Aligned | Self::Align => Em::new(1.0),
            Self::Substack => Em::ZERO,
            _ => Em::new(0.5),
        }
    }

    /// Whether rows are typeset in script style regardless of the outer style
    pub fn is_substack(&self) -> bool {
        matches!(self, Self::Substack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cases_gets_a_lone_left_brace() {
        let pair = ArraySubtype::Cases.delimiters();
        assert_eq!(pair.open, Some('{'));
        assert_eq!(pair.close, None);
        assert!(!pair.is_none());
    }

    #[test]
    fn matrix_keeps_its_own_delimiters() {
        let sub = ArraySubtype::Matrix(DelimiterPair::BRACKET);
        assert_eq!(sub.delimiters(), DelimiterPair::BRACKET);
        assert!(ArraySubtype::Gathered.delimiters().is_none());
    }

    #[test]
    fn aligned_alternates_column_alignment() {
        let sub = ArraySubtype::Aligned;
        assert_eq!(sub.cell_alignment(0, 0, 3), CellAlignment::End);
        assert_eq!(sub.cell_alignment(0, 1, 3), CellAlignment::Start);
        assert_eq!(sub.cell_alignment(2, 2, 3), CellAlignment::End);
    }

    #[test]
    fn multline_staggers_by_row() {
        let sub = ArraySubtype::Multline;
        assert_eq!(sub.cell_alignment(0, 0, 3), CellAlignment::Start);
        assert_eq!(sub.cell_alignment(1, 0, 3), CellAlignment::Center);
        assert_eq!(sub.cell_alignment(2, 0, 3), CellAlignment::End);
        // A single row is both first and last; first wins
        assert_eq!(sub.cell_alignment(0, 0, 1), CellAlignment::Start);
    }

    #[test]
    fn row_gaps_by_environment() {
        assert_eq!(ArraySubtype::Align.row_gap(), Em::new(0.5));
        assert_eq!(
            ArraySubtype::Matrix(DelimiterPair::NONE).row_gap(),
            Em::new(0.3)
        );
        assert_eq!(ArraySubtype::Substack.row_gap(), Em::ZERO);
    }

    #[test]
    fn alignment_positioning() {
        assert_eq!(CellAlignment::Start.position(10.0), 0.0);
        assert_eq!(CellAlignment::Center.position(10.0), 5.0);
        assert_eq!(CellAlignment::End.position(10.0), 10.0);
    }
}
