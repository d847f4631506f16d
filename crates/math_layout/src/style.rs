//! Math Styles - The four TeX size levels
//!
//! Styles cascade downward through constructs: scripts and radical indices
//! demote toward script sizes, fractions demote one level, and spacing is
//! suppressed at script sizes. The cramped flag travels separately in the
//! layout context.

use math_font::MathConstants;
use serde::{Deserialize, Serialize};

/// TeX math style, from largest to smallest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MathStyle {
    Display,
    Text,
    Script,
    ScriptScript,
}

impl MathStyle {
    /// Whether operators take display-sized treatment (limits, larger
    /// variants, display fraction shifts)
    pub fn is_display(&self) -> bool {
        matches!(self, Self::Display)
    }

    /// Whether this is one of the two script sizes
    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script | Self::ScriptScript)
    }

    /// The style used inside superscripts, subscripts, and radical indices
    pub fn script_style(&self) -> Self {
        match self {
            Self::Display | Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// The style used inside a fraction's numerator and denominator
    pub fn fraction_style(&self) -> Self {
        match self {
            Self::Display => Self::Text,
            Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// The style used inside array cells. Display arrays demote to text so
    /// tall constructs do not blow up row heights; substacks force script.
    pub fn array_cell_style(&self, substack: bool) -> Self {
        if substack {
            self.script_style()
        } else {
            match self {
                Self::Display => Self::Text,
                other => *other,
            }
        }
    }

    /// Glyph scale for this style as a fraction of the base font size
    pub fn scale(&self, constants: &MathConstants) -> f32 {
        match self {
            Self::Display | Self::Text => 1.0,
            Self::Script => constants.script_percent_scale_down / 100.0,
            Self::ScriptScript => constants.script_script_percent_scale_down / 100.0,
        }
    }
}
