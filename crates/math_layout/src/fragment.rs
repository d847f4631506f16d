//! Math Fragments - Immutable units of laid-out output
//!
//! A fragment is a positioned, measurable piece of typeset math: a single
//! glyph, a stretched variant built from glyph parts, a filled rule, a frame
//! composing child fragments at fixed offsets, or a color wrapper. Fragments
//! are immutable and shared by reference, so a reconciling pass can rebuild
//! a parent frame while reusing the unchanged children.

use crate::canvas::{Canvas, Color};
use crate::class::{class_of, Limits, MathClass};
use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::geom::Point;
use math_font::{BoxMetrics, GlyphId, StretchAxis};
use std::rc::Rc;

/// Shared handle to an immutable fragment
pub type FragmentRef = Rc<MathFragment>;

// =============================================================================
// Fragment Union
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MathFragment {
    Glyph(GlyphFragment),
    Variant(VariantFragment),
    Rule(RuleFragment),
    Frame(FrameFragment),
    Colored(ColoredFragment),
}

impl MathFragment {
    pub fn width(&self) -> f32 {
        match self {
            Self::Glyph(g) => g.width,
            Self::Variant(v) => v.width,
            Self::Rule(r) => r.width,
            Self::Frame(f) => f.width,
            Self::Colored(c) => c.inner.width(),
        }
    }

    pub fn ascent(&self) -> f32 {
        match self {
            Self::Glyph(g) => g.ascent,
            Self::Variant(v) => v.ascent,
            Self::Rule(r) => r.height / 2.0,
            Self::Frame(f) => f.ascent,
            Self::Colored(c) => c.inner.ascent(),
        }
    }

    pub fn descent(&self) -> f32 {
        match self {
            Self::Glyph(g) => g.descent,
            Self::Variant(v) => v.descent,
            Self::Rule(r) => r.height / 2.0,
            Self::Frame(f) => f.descent,
            Self::Colored(c) => c.inner.descent(),
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent() + self.descent()
    }

    pub fn box_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            width: self.width(),
            ascent: self.ascent(),
            descent: self.descent(),
        }
    }

    pub fn italics_correction(&self) -> f32 {
        match self {
            Self::Glyph(g) => g.italics_correction,
            Self::Variant(v) => v.italics_correction,
            Self::Frame(f) => f.italics_correction,
            Self::Colored(c) => c.inner.italics_correction(),
            Self::Rule(_) => 0.0,
        }
    }

    /// Horizontal position where an accent over this fragment attaches
    pub fn accent_attachment(&self) -> f32 {
        match self {
            Self::Glyph(g) => g.accent_attachment,
            Self::Variant(v) => v.accent_attachment,
            Self::Frame(f) => f.accent_attachment,
            Self::Colored(c) => c.inner.accent_attachment(),
            Self::Rule(r) => r.width / 2.0,
        }
    }

    pub fn class(&self) -> MathClass {
        match self {
            Self::Glyph(g) => g.class,
            Self::Variant(v) => v.class,
            Self::Frame(f) => f.class,
            Self::Colored(c) => c.inner.class(),
            Self::Rule(_) => MathClass::Normal,
        }
    }

    pub fn limits(&self) -> Limits {
        match self {
            Self::Glyph(g) => g.limits,
            Self::Variant(v) => v.limits,
            Self::Frame(f) => f.limits,
            Self::Colored(c) => c.inner.limits(),
            Self::Rule(_) => Limits::Never,
        }
    }

    /// Whether the fragment behaves like ordinary text for script shift
    /// purposes. Large operators and non-extended variants take the
    /// baseline-drop terms instead.
    pub fn is_text_like(&self) -> bool {
        match self {
            Self::Glyph(g) => g.class != MathClass::Large,
            Self::Variant(v) => v.is_extended_shape,
            Self::Frame(f) => f.is_text_like,
            Self::Colored(c) => c.inner.is_text_like(),
            Self::Rule(_) => false,
        }
    }

    /// Whether the atom carries its own surrounding space (fences)
    pub fn is_spaced(&self) -> bool {
        match self {
            Self::Glyph(g) => g.class == MathClass::Fence,
            Self::Variant(v) => v.class == MathClass::Fence,
            Self::Colored(c) => c.inner.is_spaced(),
            Self::Frame(_) | Self::Rule(_) => false,
        }
    }

    /// Number of model characters this fragment represents
    pub fn layout_length(&self) -> usize {
        match self {
            Self::Frame(f) => f.length,
            Self::Colored(c) => c.inner.layout_length(),
            _ => 1,
        }
    }

    /// Paint the fragment with its baseline-left origin at `at`
    pub fn draw(&self, canvas: &mut dyn Canvas, at: Point, color: Color) {
        match self {
            Self::Glyph(g) => canvas.glyph(at, g.glyph, g.font_index, g.font_size, color),
            Self::Variant(v) => {
                for part in &v.parts {
                    canvas.glyph(at + part.position, part.glyph, v.font_index, v.font_size, color);
                }
            }
            Self::Rule(r) => {
                canvas.rule(at.offset(0.0, -r.height / 2.0), r.width, r.height, color)
            }
            Self::Frame(f) => {
                for (position, item) in &f.items {
                    item.draw(canvas, at + *position, color);
                }
            }
            Self::Colored(c) => c.inner.draw(canvas, at, c.color),
        }
    }
}

// =============================================================================
// Glyph Fragment
// =============================================================================

/// A single glyph with its resolved metrics
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphFragment {
    pub ch: char,
    pub glyph: GlyphId,
    /// Position of the supplying font in the chain
    pub font_index: usize,
    /// Effective size the glyph renders at, after style scaling
    pub font_size: f32,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub italics_correction: f32,
    pub accent_attachment: f32,
    pub class: MathClass,
    pub limits: Limits,
    pub is_extended_shape: bool,
}

impl GlyphFragment {
    /// Resolve a character through the font chain and style-scale its
    /// metrics. Fails when no font covers the character.
    pub fn resolve(ch: char, ctx: &MathCtx) -> LayoutResult<Self> {
        let (font_index, font, glyph) = ctx.chain.resolve_required(ch)?;
        let scale = ctx.scale();
        let metrics = font.box_metrics(glyph);
        let advance = font.advance_width(glyph) * scale;
        let italics_correction = font.italics_correction(glyph).unwrap_or(0.0) * scale;
        let is_extended_shape = font.is_extended_shape(glyph);
        // Extended shapes center on the axis; their advance already covers
        // the ink, so the correction applies only to script placement
        let width = if is_extended_shape {
            advance
        } else {
            advance + italics_correction
        };
        let accent_attachment = font
            .top_accent_attachment(glyph)
            .map(|value| value * scale)
            .unwrap_or((advance + italics_correction) / 2.0);
        let class = class_of(ch);
        Ok(Self {
            ch,
            glyph,
            font_index,
            font_size: font.font_size() * scale,
            width,
            ascent: metrics.ascent * scale,
            descent: metrics.descent * scale,
            italics_correction,
            accent_attachment,
            class,
            limits: Limits::default_for(class, ch),
            is_extended_shape,
        })
    }

    pub fn into_fragment(self) -> MathFragment {
        MathFragment::Glyph(self)
    }
}

// =============================================================================
// Variant Fragment
// =============================================================================

/// One glyph of an assembled variant, positioned within the fragment
#[derive(Debug, Clone, PartialEq)]
pub struct PartGlyph {
    pub glyph: GlyphId,
    pub position: Point,
}

/// A glyph stretched to a target extent, either a pre-built size variant or
/// an assembly of tiled parts
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFragment {
    pub ch: char,
    pub axis: StretchAxis,
    pub font_index: usize,
    pub font_size: f32,
    pub parts: Vec<PartGlyph>,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub italics_correction: f32,
    pub accent_attachment: f32,
    pub class: MathClass,
    pub limits: Limits,
    pub is_extended_shape: bool,
    /// Whether the middle non-extender part ended up centered, which lets a
    /// stretched brace carry an annotation at its cusp
    pub is_middle_stretched: Option<bool>,
}

impl VariantFragment {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn into_fragment(self) -> MathFragment {
        MathFragment::Variant(self)
    }
}

// =============================================================================
// Rule Fragment
// =============================================================================

/// A filled rectangle centered on its midline (ascent = descent = height/2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleFragment {
    pub width: f32,
    pub height: f32,
}

impl RuleFragment {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn into_fragment(self) -> MathFragment {
        MathFragment::Rule(self)
    }
}

// =============================================================================
// Frame Fragment
// =============================================================================

/// Child fragments composed at fixed offsets, with explicit aggregate
/// metrics supplied by the construct that built the frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFragment {
    pub items: Vec<(Point, FragmentRef)>,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub italics_correction: f32,
    pub accent_attachment: f32,
    pub class: MathClass,
    pub limits: Limits,
    pub is_text_like: bool,
    pub length: usize,
}

impl FrameFragment {
    pub fn new(width: f32, ascent: f32, descent: f32, items: Vec<(Point, FragmentRef)>) -> Self {
        Self {
            items,
            width,
            ascent,
            descent,
            italics_correction: 0.0,
            accent_attachment: width / 2.0,
            class: MathClass::Normal,
            limits: Limits::Never,
            is_text_like: false,
            length: 1,
        }
    }

    pub fn with_italics_correction(mut self, value: f32) -> Self {
        self.italics_correction = value;
        self
    }

    pub fn with_accent_attachment(mut self, value: f32) -> Self {
        self.accent_attachment = value;
        self
    }

    pub fn with_class(mut self, class: MathClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_text_like(mut self, value: bool) -> Self {
        self.is_text_like = value;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn box_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            width: self.width,
            ascent: self.ascent,
            descent: self.descent,
        }
    }

    pub fn into_fragment(self) -> MathFragment {
        MathFragment::Frame(self)
    }
}

// =============================================================================
// Colored Fragment
// =============================================================================

/// Wraps a fragment so it paints in a fixed color, regardless of the color
/// the parent passes down
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredFragment {
    pub color: Color,
    pub inner: FragmentRef,
}

impl ColoredFragment {
    pub fn new(color: Color, inner: MathFragment) -> Self {
        Self {
            color,
            inner: Rc::new(inner),
        }
    }

    pub fn into_fragment(self) -> MathFragment {
        MathFragment::Colored(self)
    }
}
