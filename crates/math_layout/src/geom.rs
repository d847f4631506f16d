//! Geometry primitives for fragment positioning
//!
//! The coordinate convention follows the font baseline: x grows rightward,
//! y grows downward, and y = 0 is the baseline of the surrounding line.
//! Ascents are therefore negative y offsets.

use serde::{Deserialize, Serialize};

/// A position in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_add() {
        let p = Point::new(1.0, 2.0).offset(3.0, -1.0);
        assert_eq!(p, Point::new(4.0, 1.0));
        assert_eq!(p + Point::new(1.0, 1.0), Point::new(5.0, 2.0));
    }
}
