//! Under/over decorations: lines and stretched spreaders

use crate::canvas::Color;
use crate::class::Limits;
use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{
    ColoredFragment, FrameFragment, FragmentRef, GlyphFragment, MathFragment, RuleFragment,
};
use crate::geom::Point;
use crate::stretch::stretch_glyph;
use math_font::{Em, StretchAxis};
use math_model::UnderOverSubtype;
use std::rc::Rc;

const SPREADER_GAP: Em = Em(0.1);
const SPREADER_SHORTFALL: Em = Em(0.25);

pub fn layout_under_over(
    nucleus: FragmentRef,
    subtype: UnderOverSubtype,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    match subtype.spreader() {
        Some(ch) => layout_spreader(nucleus, ch, subtype.is_over(), ctx),
        None => Ok(layout_line(nucleus, subtype.is_over(), ctx)),
    }
}

/// A rule over or under the nucleus, using the overbar/underbar constants
fn layout_line(nucleus: FragmentRef, over: bool, ctx: &MathCtx) -> FrameFragment {
    let class = nucleus.class();
    let limits = nucleus.limits();
    let ic = nucleus.italics_correction();
    let width = nucleus.width();
    if over {
        let gap = ctx.metric(|c| c.overbar_vertical_gap);
        let bar = ctx.metric(|c| c.overbar_rule_thickness);
        let extra = ctx.metric(|c| c.overbar_extra_ascender);
        let line_y = -(nucleus.ascent() + gap + bar / 2.0);
        let ascent = nucleus.ascent() + gap + bar + extra;
        let descent = nucleus.descent();
        let rule = RuleFragment::new(width, bar).into_fragment();
        let items = vec![
            (Point::new(0.0, line_y), Rc::new(rule)),
            (Point::origin(), nucleus),
        ];
        FrameFragment::new(width, ascent, descent, items)
            .with_class(class)
            .with_limits(limits)
            .with_italics_correction(ic)
    } else {
        let gap = ctx.metric(|c| c.underbar_vertical_gap);
        let bar = ctx.metric(|c| c.underbar_rule_thickness);
        let extra = ctx.metric(|c| c.underbar_extra_descender);
        let line_y = nucleus.descent() + gap + bar / 2.0;
        let ascent = nucleus.ascent();
        let descent = nucleus.descent() + gap + bar + extra;
        // Slanted nuclei pull the underline in by the italics correction
        let rule = RuleFragment::new((width - ic).max(0.0), bar).into_fragment();
        let items = vec![
            (Point::new(0.0, line_y), Rc::new(rule)),
            (Point::origin(), nucleus),
        ];
        FrameFragment::new(width, ascent, descent, items)
            .with_class(class)
            .with_limits(limits)
            .with_italics_correction(ic)
    }
}

/// A character stretched to the nucleus width, above or below it
fn layout_spreader(
    nucleus: FragmentRef,
    ch: char,
    over: bool,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let target = nucleus.width();
    let spreader: FragmentRef = match GlyphFragment::resolve(ch, ctx) {
        Ok(glyph) => Rc::new(stretch_glyph(
            glyph,
            target,
            ctx.resolve(SPREADER_SHORTFALL),
            StretchAxis::Horizontal,
            ctx,
        )),
        // A spreader no font covers degrades to a red rule of the right
        // width, keeping the construct visible
        Err(_) => Rc::new(
            ColoredFragment::new(Color::RED, RuleFragment::new(target, 2.0).into_fragment())
                .into_fragment(),
        ),
    };
    Ok(compose_spreader(nucleus, spreader, over, ctx))
}

/// Position an already-stretched spreader around a nucleus. Split out so a
/// reconciling pass can keep the stretched glyph when the nucleus box did
/// not change.
pub fn compose_spreader(
    nucleus: FragmentRef,
    spreader: FragmentRef,
    over: bool,
    ctx: &MathCtx,
) -> FrameFragment {
    let gap = ctx.resolve(SPREADER_GAP);
    let class = nucleus.class();
    let width = nucleus.width().max(spreader.width());
    let nucleus_x = (width - nucleus.width()) / 2.0;
    let spreader_x = (width - spreader.width()) / 2.0;

    let (spreader_y, ascent, descent) = if over {
        let y = -(nucleus.ascent() + gap + spreader.descent());
        (
            y,
            nucleus.ascent() + gap + spreader.height(),
            nucleus.descent(),
        )
    } else {
        let y = nucleus.descent() + gap + spreader.ascent();
        (
            y,
            nucleus.ascent(),
            nucleus.descent() + gap + spreader.height(),
        )
    };

    let items = vec![
        (Point::new(spreader_x, spreader_y), spreader),
        (Point::new(nucleus_x, 0.0), nucleus),
    ];
    // Scripts on a spread construct stack as limits
    FrameFragment::new(width, ascent, descent, items)
        .with_class(class)
        .with_limits(Limits::Always)
}
