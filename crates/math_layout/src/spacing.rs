//! Inter-atom Spacing - Class-pair spacing in the TeX tradition
//!
//! The gap between two adjacent atoms depends only on their classes and the
//! current style. Quantities are fixed fractions of an em; the medium and
//! thick gaps (and a few discretionary thin ones) vanish at script sizes.
//! `Vary` atoms must be resolved to `Binary` or `Normal` before spacing is
//! computed.

use crate::class::MathClass;
use crate::style::MathStyle;
use math_font::Em;
use serde::{Deserialize, Serialize};

/// Amount of space between two atoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spacing {
    None,
    Thin,
    Medium,
    Thick,
}

impl Spacing {
    /// Width of this space in ems
    pub fn em(&self) -> Em {
        match self {
            Spacing::None => Em::ZERO,
            Spacing::Thin => Em::new(3.0 / 18.0),
            Spacing::Medium => Em::new(4.0 / 18.0),
            Spacing::Thick => Em::new(5.0 / 18.0),
        }
    }
}

/// Space between a `left` atom and a `right` atom at the given style.
/// Total over all class pairs; unlisted pairs get no space.
pub fn spacing_between(left: MathClass, right: MathClass, style: MathStyle) -> Spacing {
    use MathClass::*;
    // Discretionary gaps disappear at script sizes
    let full = !style.is_script();
    let thin_if_full = if full { Spacing::Thin } else { Spacing::None };
    match (left, right) {
        (Space, _) | (_, Space) => Spacing::None,

        // No space before punctuation; a thin one after it
        (_, Punctuation) => Spacing::None,
        (Punctuation, _) => thin_if_full,

        // Delimiters hug their content
        (Opening, _) | (_, Closing) => Spacing::None,

        // Chained relations run together; otherwise relations get a thick gap
        (Relation, Relation) => Spacing::None,
        (Relation, _) | (_, Relation) => {
            if full {
                Spacing::Thick
            } else {
                Spacing::None
            }
        }

        (Binary, _) | (_, Binary) => {
            if full {
                Spacing::Medium
            } else {
                Spacing::None
            }
        }

        // Large operators hug an opening delimiter, otherwise keep a thin
        // gap at every size
        (Large, Opening) | (Large, Fence) => Spacing::None,
        (Large, _) | (_, Large) => Spacing::Thin,

        (Special, _) | (_, Special) => thin_if_full,

        _ => Spacing::None,
    }
}
