//! The `MathFont` trait and the metric value types it speaks

use serde::{Deserialize, Serialize};

use crate::constants::MathConstants;

/// Identifier of a glyph within a font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphId(pub u16);

/// Axis along which a glyph may be stretched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StretchAxis {
    Horizontal,
    Vertical,
}

/// Ink box of a glyph, in points, relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl BoxMetrics {
    pub fn new(width: f32, ascent: f32, descent: f32) -> Self {
        Self {
            width,
            ascent,
            descent,
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Component-wise comparison within a tolerance.
    ///
    /// Incremental layout compares boxes before and after a rebuild to decide
    /// whether the change must propagate upward; an exact float compare would
    /// make that decision unstable.
    pub fn nearly_equal(&self, other: &BoxMetrics, tolerance: f32) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.ascent - other.ascent).abs() <= tolerance
            && (self.descent - other.descent).abs() <= tolerance
    }
}

/// A pre-built size variant of a glyph, from the font's MATH variants table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub glyph: GlyphId,
    /// Extent along the stretch axis, in points
    pub advance: f32,
}

/// One part of a glyph assembly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphPart {
    pub glyph: GlyphId,
    /// Length of the connector at the start (left/bottom) edge, in points
    pub start_connector: f32,
    /// Length of the connector at the end (right/top) edge, in points
    pub end_connector: f32,
    /// Full advance of the part along the stretch axis, in points
    pub full_advance: f32,
    /// Extender parts may be repeated to reach the target extent
    pub is_extender: bool,
}

/// Recipe for synthesizing an arbitrarily large glyph from parts
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assembly {
    /// Parts in visual order: start cap, extenders, optional middle, end cap
    pub parts: Vec<GlyphPart>,
    pub italics_correction: f32,
}

/// Metric queries the layout engine makes against a font.
///
/// All values are in points at the font's base size; style-dependent scaling
/// is applied by the caller. Implementations are opaque to the engine: a real
/// backend reads an OpenType MATH table, `StaticMathFont` serves fixed data.
pub trait MathFont {
    /// Family name, for diagnostics only
    fn name(&self) -> &str {
        "unnamed"
    }

    /// Base size of the font, in points
    fn font_size(&self) -> f32;

    /// Look up the glyph for a character. `None` means the character is
    /// absent from this font and the caller should consult the fallback
    /// chain.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    fn advance_width(&self, glyph: GlyphId) -> f32;

    fn box_metrics(&self, glyph: GlyphId) -> BoxMetrics;

    /// Per-glyph italics correction. `None` is not an error: the documented
    /// default of zero applies.
    fn italics_correction(&self, glyph: GlyphId) -> Option<f32>;

    /// Per-glyph top accent attachment point. `None` is not an error: the
    /// documented default of half the advance (plus italics correction)
    /// applies.
    fn top_accent_attachment(&self, glyph: GlyphId) -> Option<f32>;

    fn is_extended_shape(&self, glyph: GlyphId) -> bool;

    /// Pre-built size variants for the glyph along the axis, in increasing
    /// size order. Empty when the font declares none.
    fn size_variants(&self, glyph: GlyphId, axis: StretchAxis) -> Vec<SizeVariant>;

    /// Assembly recipe for the glyph along the axis, if the font declares
    /// one.
    fn assembly(&self, glyph: GlyphId, axis: StretchAxis) -> Option<Assembly>;

    /// Minimum connector overlap between adjacent assembly parts, in points
    fn min_connector_overlap(&self) -> f32;

    /// The MATH constants block of this font
    fn constants(&self) -> &MathConstants;
}
