//! Glyph Stretching - Size variants and part assemblies
//!
//! Delimiters, radicals, accents, and spreaders grow to match their content.
//! Resolution order follows the MATH table: the base glyph if it is already
//! tall (or wide) enough, then the smallest sufficient pre-built variant,
//! then an assembly of tiled parts whose connector overlaps are relaxed
//! between the font's minimum and maximum to hit the target exactly.

use crate::canvas::Color;
use crate::class::Limits;
use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{
    ColoredFragment, GlyphFragment, MathFragment, PartGlyph, RuleFragment, VariantFragment,
};
use crate::geom::Point;
use math_font::{Assembly, GlyphPart, MathFont, StretchAxis};

/// Resolve `ch` and stretch it along `axis` to `target` points, tolerating
/// `shortfall` points of undershoot.
pub fn stretch_char(
    ch: char,
    target: f32,
    shortfall: f32,
    axis: StretchAxis,
    ctx: &MathCtx,
) -> LayoutResult<MathFragment> {
    let base = GlyphFragment::resolve(ch, ctx)?;
    Ok(stretch_glyph(base, target, shortfall, axis, ctx))
}

/// Stretch a delimiter vertically, degrading to a red rule of the target
/// height when no font in the chain covers the character
pub fn stretch_delimiter(ch: char, target: f32, shortfall: f32, ctx: &MathCtx) -> MathFragment {
    match GlyphFragment::resolve(ch, ctx) {
        Ok(glyph) => stretch_glyph(glyph, target, shortfall, StretchAxis::Vertical, ctx),
        Err(_) => ColoredFragment::new(
            Color::RED,
            RuleFragment::new(1.0, target).into_fragment(),
        )
        .into_fragment(),
    }
}

/// Stretch a resolved glyph along `axis` to at least `target - shortfall`
/// points. Falls back to the largest available form when the font cannot
/// reach the target.
pub fn stretch_glyph(
    base: GlyphFragment,
    target: f32,
    shortfall: f32,
    axis: StretchAxis,
    ctx: &MathCtx,
) -> MathFragment {
    let min_extent = target - shortfall;
    if extent_of(&base, axis) >= min_extent {
        return base.into_fragment();
    }
    let Some(font) = ctx.chain.font_at(base.font_index) else {
        return base.into_fragment();
    };
    let scale = ctx.scale();

    // Smallest pre-built variant that reaches the minimum extent
    let variants = font.size_variants(base.glyph, axis);
    for variant in &variants {
        if variant.advance * scale >= min_extent {
            return prebuilt_variant(&base, variant.glyph, font, axis, ctx);
        }
    }

    if let Some(assembly) = font.assembly(base.glyph, axis) {
        return assemble(&base, &assembly, target, font, axis, ctx);
    }

    // No assembly: the largest variant is the best the font can do
    if let Some(largest) = variants.last() {
        return prebuilt_variant(&base, largest.glyph, font, axis, ctx);
    }
    base.into_fragment()
}

fn extent_of(glyph: &GlyphFragment, axis: StretchAxis) -> f32 {
    match axis {
        StretchAxis::Vertical => glyph.ascent + glyph.descent,
        StretchAxis::Horizontal => glyph.width,
    }
}

fn prebuilt_variant(
    base: &GlyphFragment,
    glyph: math_font::GlyphId,
    font: &dyn MathFont,
    axis: StretchAxis,
    ctx: &MathCtx,
) -> MathFragment {
    let scale = ctx.scale();
    let metrics = font.box_metrics(glyph);
    let ascent = metrics.ascent * scale;
    let descent = metrics.descent * scale;
    let width = font.advance_width(glyph) * scale;
    match axis {
        StretchAxis::Vertical => {
            // Recenter the variant on the math axis
            let total = ascent + descent;
            let axis_height = ctx.metric(|c| c.axis_height);
            let new_ascent = total / 2.0 + axis_height;
            let part = PartGlyph {
                glyph,
                position: Point::new(0.0, ascent - new_ascent),
            };
            VariantFragment {
                ch: base.ch,
                axis,
                font_index: base.font_index,
                font_size: base.font_size,
                parts: vec![part],
                width,
                ascent: new_ascent,
                descent: total - new_ascent,
                italics_correction: base.italics_correction,
                accent_attachment: base.accent_attachment,
                class: base.class,
                limits: base.limits,
                is_extended_shape: font.is_extended_shape(glyph),
                is_middle_stretched: None,
            }
            .into_fragment()
        }
        StretchAxis::Horizontal => VariantFragment {
            ch: base.ch,
            axis,
            font_index: base.font_index,
            font_size: base.font_size,
            parts: vec![PartGlyph {
                glyph,
                position: Point::origin(),
            }],
            width,
            ascent,
            descent,
            italics_correction: base.italics_correction,
            accent_attachment: width / 2.0,
            class: base.class,
            limits: base.limits,
            is_extended_shape: font.is_extended_shape(glyph),
            is_middle_stretched: None,
        }
        .into_fragment(),
    }
}

/// Tile assembly parts, repeating extenders until the reachable range
/// covers the target, then spread the overlap slack by ratio.
fn assemble(
    base: &GlyphFragment,
    assembly: &Assembly,
    target: f32,
    font: &dyn MathFont,
    axis: StretchAxis,
    ctx: &MathCtx,
) -> MathFragment {
    let scale = ctx.scale();
    let min_overlap = font.min_connector_overlap() * scale;

    let mut parts: Vec<GlyphPart> = Vec::new();
    let mut ratio = 0.0;
    for repetitions in 0.. {
        parts = expand_parts(&assembly.parts, repetitions);
        let (shortest, stretch) = reachable_range(&parts, min_overlap, scale, font.name());
        if shortest >= target {
            ratio = 0.0;
            break;
        }
        if shortest + stretch >= target || repetitions >= MAX_EXTENDER_REPETITIONS {
            ratio = if stretch > 0.0 {
                ((target - shortest) / stretch).min(1.0)
            } else {
                1.0
            };
            break;
        }
    }

    // Advance of each part after overlap with its successor
    let mut advances = Vec::with_capacity(parts.len());
    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let mut advance = part.full_advance * scale;
        if let Some(next) = parts.get(i + 1) {
            let max_overlap = max_overlap(part, next, min_overlap, scale);
            advance -= max_overlap - ratio * (max_overlap - min_overlap);
        }
        total += advance;
        advances.push(advance);
    }

    let italics_correction = assembly.italics_correction * scale;
    match axis {
        StretchAxis::Vertical => {
            let axis_height = ctx.metric(|c| c.axis_height);
            let ascent = total / 2.0 + axis_height;
            let descent = total - ascent;
            let mut width: f32 = 0.0;
            let mut placed = Vec::with_capacity(parts.len());
            let mut offset = 0.0;
            // Vertical assemblies run bottom to top
            for (part, advance) in parts.iter().zip(&advances) {
                let metrics = font.box_metrics(part.glyph);
                width = width.max(font.advance_width(part.glyph) * scale);
                placed.push(PartGlyph {
                    glyph: part.glyph,
                    position: Point::new(0.0, descent - offset - metrics.descent * scale),
                });
                offset += advance;
            }
            VariantFragment {
                ch: base.ch,
                axis,
                font_index: base.font_index,
                font_size: base.font_size,
                parts: placed,
                width,
                ascent,
                descent,
                italics_correction,
                accent_attachment: base.accent_attachment,
                class: base.class,
                limits: base.limits,
                is_extended_shape: base.is_extended_shape,
                is_middle_stretched: Some(has_stretched_middle(&parts)),
            }
            .into_fragment()
        }
        StretchAxis::Horizontal => {
            let mut placed = Vec::with_capacity(parts.len());
            let mut offset = 0.0;
            for (part, advance) in parts.iter().zip(&advances) {
                placed.push(PartGlyph {
                    glyph: part.glyph,
                    position: Point::new(offset, 0.0),
                });
                offset += advance;
            }
            VariantFragment {
                ch: base.ch,
                axis,
                font_index: base.font_index,
                font_size: base.font_size,
                parts: placed,
                width: total,
                ascent: base.ascent,
                descent: base.descent,
                italics_correction,
                accent_attachment: total / 2.0,
                class: base.class,
                limits: Limits::Never,
                is_extended_shape: base.is_extended_shape,
                is_middle_stretched: None,
            }
            .into_fragment()
        }
    }
}

const MAX_EXTENDER_REPETITIONS: usize = 64;

fn expand_parts(parts: &[GlyphPart], repetitions: usize) -> Vec<GlyphPart> {
    let mut expanded = Vec::new();
    for part in parts {
        if part.is_extender {
            for _ in 0..repetitions {
                expanded.push(part.clone());
            }
        } else {
            expanded.push(part.clone());
        }
    }
    expanded
}

/// Shortest reachable extent (maximum overlaps everywhere) and how much the
/// assembly can grow past it (relaxing every overlap to the minimum)
fn reachable_range(
    parts: &[GlyphPart],
    min_overlap: f32,
    scale: f32,
    font_name: &str,
) -> (f32, f32) {
    let mut shortest = 0.0;
    let mut stretch = 0.0;
    for (i, part) in parts.iter().enumerate() {
        shortest += part.full_advance * scale;
        if let Some(next) = parts.get(i + 1) {
            let connector = (part.end_connector * scale).min(next.start_connector * scale);
            if connector < min_overlap {
                tracing::warn!(
                    font = font_name,
                    "assembly connectors are shorter than the minimum overlap"
                );
            }
            let max = connector.max(min_overlap);
            shortest -= max;
            stretch += max - min_overlap;
        }
    }
    (shortest, stretch)
}

fn max_overlap(part: &GlyphPart, next: &GlyphPart, min_overlap: f32, scale: f32) -> f32 {
    let connector = (part.end_connector * scale).min(next.start_connector * scale);
    connector.max(min_overlap)
}

/// A vertical assembly has a stretched middle when a non-extender sits
/// strictly between extenders, like the cusp of a brace.
fn has_stretched_middle(parts: &[GlyphPart]) -> bool {
    let interior = parts
        .iter()
        .enumerate()
        .skip(1)
        .take(parts.len().saturating_sub(2));
    for (i, part) in interior {
        if !part.is_extender && parts[i - 1].is_extender && parts[i + 1].is_extender {
            return true;
        }
    }
    false
}
