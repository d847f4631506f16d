//! Canvas - Output surface for laid-out fragments
//!
//! Fragments draw themselves onto a `Canvas`. The trait is deliberately
//! small: positioned glyphs and filled rules are the only primitives the
//! engine emits. `RecordingCanvas` captures the draw stream for tests and
//! for hosts that serialize display lists.

use crate::geom::Point;
use math_font::GlyphId;
use serde::{Deserialize, Serialize};

/// An sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Used to flag recovery output, like rules standing in for glyphs a
    /// font could not stretch
    pub const RED: Color = Color::rgb(220, 38, 38);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Receives the draw primitives of a laid-out formula
pub trait Canvas {
    /// Draw a glyph with its origin at the baseline-left `at`
    fn glyph(&mut self, at: Point, glyph: GlyphId, font_index: usize, size: f32, color: Color);

    /// Fill a rectangle whose top-left corner is `at`
    fn rule(&mut self, at: Point, width: f32, height: f32, color: Color);
}

/// One captured draw primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Glyph {
        at: Point,
        glyph: GlyphId,
        font_index: usize,
        size: f32,
        color: Color,
    },
    Rule {
        at: Point,
        width: f32,
        height: f32,
        color: Color,
    },
}

/// A canvas that records the draw stream
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands that painted in the given color
    pub fn in_color(&self, color: Color) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| match cmd {
                DrawCommand::Glyph { color: c, .. } | DrawCommand::Rule { color: c, .. } => {
                    *c == color
                }
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn glyph(&mut self, at: Point, glyph: GlyphId, font_index: usize, size: f32, color: Color) {
        self.commands.push(DrawCommand::Glyph {
            at,
            glyph,
            font_index,
            size,
            color,
        });
    }

    fn rule(&mut self, at: Point, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::Rule {
            at,
            width,
            height,
            color,
        });
    }
}
