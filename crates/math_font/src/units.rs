//! Font-size-relative lengths

use serde::{Deserialize, Serialize};

/// A length measured in ems of the current font size.
///
/// Layout tunables (delimiter shortfalls, spreader gaps, array gaps) are
/// declared in ems and resolved against the font size active at the point of
/// use, so the same constant scales correctly through script styles.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Em(pub f32);

impl Em {
    pub const ZERO: Em = Em(0.0);

    pub fn new(value: f32) -> Self {
        Self(value)
    }

    /// Resolve to points at the given font size.
    pub fn resolve(self, font_size: f32) -> f32 {
        self.0 * font_size
    }
}

impl std::ops::Mul<f32> for Em {
    type Output = Em;

    fn mul(self, rhs: f32) -> Em {
        Em(self.0 * rhs)
    }
}
