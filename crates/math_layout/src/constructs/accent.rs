//! Accents
//!
//! The accent glyph rides the nucleus at its attachment point. Fonts design
//! accents to sit over x-height letters, so only the ascent beyond
//! `accent_base_height` shifts the accent upward. Stretchable accents grow
//! horizontally toward the nucleus width.

use crate::canvas::Color;
use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{
    ColoredFragment, FrameFragment, FragmentRef, GlyphFragment, MathFragment, RuleFragment,
};
use crate::geom::Point;
use crate::stretch::stretch_glyph;
use math_font::{Em, StretchAxis};
use std::rc::Rc;

const ACCENT_SHORTFALL: Em = Em(0.5);
const REPLACEMENT: char = '\u{FFFD}';

pub fn layout_accent(
    nucleus: FragmentRef,
    accent: char,
    stretchable: bool,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    // An accent the fonts cannot supply renders as the replacement
    // character, and when even that is uncovered, as a red rule riding the
    // nucleus, rather than failing the whole construct
    let accent_fragment: MathFragment = match GlyphFragment::resolve(accent, ctx)
        .or_else(|_| GlyphFragment::resolve(REPLACEMENT, ctx))
    {
        Ok(glyph) if stretchable => stretch_glyph(
            glyph,
            nucleus.width(),
            ctx.resolve(ACCENT_SHORTFALL),
            StretchAxis::Horizontal,
            ctx,
        ),
        Ok(glyph) => glyph.into_fragment(),
        Err(_) => ColoredFragment::new(
            Color::RED,
            RuleFragment::new(nucleus.width(), 1.0).into_fragment(),
        )
        .into_fragment(),
    };

    let base_height = ctx.metric(|c| c.accent_base_height);
    let shift = (nucleus.ascent() - base_height).max(0.0);
    let accent_x = nucleus.accent_attachment() - accent_fragment.accent_attachment();

    let width = nucleus.width();
    let ascent = nucleus.ascent().max(shift + accent_fragment.ascent());
    let descent = nucleus.descent();
    let ic = nucleus.italics_correction();
    let attach = nucleus.accent_attachment();
    let class = nucleus.class();
    let text_like = nucleus.is_text_like();

    let items = vec![
        (Point::new(accent_x, -shift), Rc::new(accent_fragment)),
        (Point::origin(), nucleus),
    ];
    Ok(FrameFragment::new(width, ascent, descent, items)
        .with_italics_correction(ic)
        .with_accent_attachment(attach)
        .with_class(class)
        .with_text_like(text_like))
}
