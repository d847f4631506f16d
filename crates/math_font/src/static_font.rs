//! An in-memory `MathFont` backend
//!
//! `StaticMathFont` serves fixed metric data: proportional defaults per
//! registered character, with per-glyph overrides for boxes, corrections,
//! attachments, stretch variants, and assemblies. Every test in the engine
//! runs against it, and embedding hosts can use it for deterministic layout
//! without touching system fonts.

use std::collections::{HashMap, HashSet};

use crate::constants::MathConstants;
use crate::font::{
    Assembly, BoxMetrics, GlyphId, GlyphPart, MathFont, SizeVariant, StretchAxis,
};

/// Part description accepted by [`StaticMathFont::with_assembly`]; the
/// builder allocates the part glyphs itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPart {
    pub full_advance: f32,
    pub start_connector: f32,
    pub end_connector: f32,
    pub is_extender: bool,
}

/// Deterministic in-memory math font
#[derive(Debug, Clone)]
pub struct StaticMathFont {
    name: String,
    font_size: f32,
    glyphs: HashMap<char, GlyphId>,
    next_glyph: u16,
    boxes: HashMap<GlyphId, BoxMetrics>,
    advances: HashMap<GlyphId, f32>,
    italics: HashMap<GlyphId, f32>,
    attachments: HashMap<GlyphId, f32>,
    extended: HashSet<GlyphId>,
    variants: HashMap<(GlyphId, StretchAxis), Vec<SizeVariant>>,
    assemblies: HashMap<(GlyphId, StretchAxis), Assembly>,
    min_connector_overlap: f32,
    constants: MathConstants,
}

impl StaticMathFont {
    pub fn new(font_size: f32) -> Self {
        Self {
            name: "static".to_string(),
            font_size,
            glyphs: HashMap::new(),
            next_glyph: 1,
            boxes: HashMap::new(),
            advances: HashMap::new(),
            italics: HashMap::new(),
            attachments: HashMap::new(),
            extended: HashSet::new(),
            variants: HashMap::new(),
            assemblies: HashMap::new(),
            min_connector_overlap: font_size * 0.02,
            constants: MathConstants::fallback(font_size),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a character with proportional default metrics.
    pub fn with_glyph(mut self, ch: char) -> Self {
        self.register(ch);
        self
    }

    /// Register every character of the string with default metrics.
    pub fn with_coverage(mut self, chars: &str) -> Self {
        for ch in chars.chars() {
            self.register(ch);
        }
        self
    }

    /// Override the ink box (and advance) of a character.
    pub fn with_box(mut self, ch: char, width: f32, ascent: f32, descent: f32) -> Self {
        let glyph = self.register(ch);
        self.boxes
            .insert(glyph, BoxMetrics::new(width, ascent, descent));
        self.advances.insert(glyph, width);
        self
    }

    pub fn with_italics_correction(mut self, ch: char, value: f32) -> Self {
        let glyph = self.register(ch);
        self.italics.insert(glyph, value);
        self
    }

    pub fn with_accent_attachment(mut self, ch: char, value: f32) -> Self {
        let glyph = self.register(ch);
        self.attachments.insert(glyph, value);
        self
    }

    pub fn with_extended_shape(mut self, ch: char) -> Self {
        let glyph = self.register(ch);
        self.extended.insert(glyph);
        self
    }

    /// Declare pre-built size variants for a character, given their extents
    /// along the axis in increasing order. Variant glyphs are allocated by
    /// the builder.
    pub fn with_size_variants(mut self, ch: char, axis: StretchAxis, extents: &[f32]) -> Self {
        let glyph = self.register(ch);
        let base = self.boxes[&glyph];
        let mut list = Vec::with_capacity(extents.len());
        for &extent in extents {
            let variant = self.allocate();
            let metrics = match axis {
                StretchAxis::Vertical => {
                    BoxMetrics::new(base.width, extent * 0.8, extent * 0.2)
                }
                StretchAxis::Horizontal => BoxMetrics::new(extent, base.ascent, base.descent),
            };
            self.boxes.insert(variant, metrics);
            self.advances.insert(variant, metrics.width);
            self.extended.insert(variant);
            list.push(SizeVariant {
                glyph: variant,
                advance: extent,
            });
        }
        self.variants.insert((glyph, axis), list);
        self
    }

    /// Declare an assembly for a character. Part glyphs are allocated by the
    /// builder; part boxes follow the axis (vertical parts stack, horizontal
    /// parts run along the baseline).
    pub fn with_assembly(mut self, ch: char, axis: StretchAxis, parts: &[StaticPart]) -> Self {
        let glyph = self.register(ch);
        let base = self.boxes[&glyph];
        let mut records = Vec::with_capacity(parts.len());
        for part in parts {
            let part_glyph = self.allocate();
            let metrics = match axis {
                StretchAxis::Vertical => BoxMetrics::new(base.width, part.full_advance, 0.0),
                StretchAxis::Horizontal => {
                    BoxMetrics::new(part.full_advance, base.ascent, base.descent)
                }
            };
            self.boxes.insert(part_glyph, metrics);
            self.advances.insert(part_glyph, metrics.width);
            records.push(GlyphPart {
                glyph: part_glyph,
                start_connector: part.start_connector,
                end_connector: part.end_connector,
                full_advance: part.full_advance,
                is_extender: part.is_extender,
            });
        }
        self.assemblies.insert(
            (glyph, axis),
            Assembly {
                parts: records,
                italics_correction: 0.0,
            },
        );
        // an assembleable glyph is an extended shape by definition
        self.extended.insert(glyph);
        self
    }

    pub fn with_min_connector_overlap(mut self, value: f32) -> Self {
        self.min_connector_overlap = value;
        self
    }

    pub fn with_constants(mut self, constants: MathConstants) -> Self {
        self.constants = constants;
        self
    }

    fn allocate(&mut self) -> GlyphId {
        let glyph = GlyphId(self.next_glyph);
        self.next_glyph += 1;
        glyph
    }

    fn register(&mut self, ch: char) -> GlyphId {
        if let Some(&glyph) = self.glyphs.get(&ch) {
            return glyph;
        }
        let glyph = self.allocate();
        let metrics = self.default_box(ch);
        self.glyphs.insert(ch, glyph);
        self.boxes.insert(glyph, metrics);
        self.advances.insert(glyph, metrics.width);
        glyph
    }

    /// Proportional default box, loosely shaped by character category.
    fn default_box(&self, ch: char) -> BoxMetrics {
        let em = self.font_size;
        match ch {
            '(' | ')' | '[' | ']' | '{' | '}' | '|' | '⌈' | '⌉' | '⌊' | '⌋' | '√' => {
                BoxMetrics::new(em * 0.4, em * 0.75, em * 0.25)
            }
            '∑' | '∏' | '∫' | '⋀' | '⋁' | '⋂' | '⋃' | '⨁' | '⨂' => {
                BoxMetrics::new(em * 0.9, em * 0.8, em * 0.3)
            }
            _ => BoxMetrics::new(em * 0.5, em * 0.7, em * 0.2),
        }
    }
}

impl MathFont for StaticMathFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.glyphs.get(&ch).copied()
    }

    fn advance_width(&self, glyph: GlyphId) -> f32 {
        self.advances.get(&glyph).copied().unwrap_or(0.0)
    }

    fn box_metrics(&self, glyph: GlyphId) -> BoxMetrics {
        self.boxes.get(&glyph).copied().unwrap_or_default()
    }

    fn italics_correction(&self, glyph: GlyphId) -> Option<f32> {
        self.italics.get(&glyph).copied()
    }

    fn top_accent_attachment(&self, glyph: GlyphId) -> Option<f32> {
        self.attachments.get(&glyph).copied()
    }

    fn is_extended_shape(&self, glyph: GlyphId) -> bool {
        self.extended.contains(&glyph)
    }

    fn size_variants(&self, glyph: GlyphId, axis: StretchAxis) -> Vec<SizeVariant> {
        self.variants
            .get(&(glyph, axis))
            .cloned()
            .unwrap_or_default()
    }

    fn assembly(&self, glyph: GlyphId, axis: StretchAxis) -> Option<Assembly> {
        self.assemblies.get(&(glyph, axis)).cloned()
    }

    fn min_connector_overlap(&self) -> f32 {
        self.min_connector_overlap
    }

    fn constants(&self) -> &MathConstants {
        &self.constants
    }
}
