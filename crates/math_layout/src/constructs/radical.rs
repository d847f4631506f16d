//! Radicals
//!
//! The surd stretches vertically to cover the radicand plus the rule gap,
//! the rule runs from the surd over the radicand, and an optional degree is
//! raised beside the surd by the font's bottom-raise percentage.

use crate::canvas::Color;
use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{
    ColoredFragment, FrameFragment, FragmentRef, GlyphFragment, RuleFragment,
};
use crate::geom::Point;
use crate::stretch::stretch_glyph;
use math_font::StretchAxis;
use std::rc::Rc;

const SURD: char = '\u{221A}';

pub fn layout_radical(
    radicand: FragmentRef,
    index: Option<FragmentRef>,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let thickness = ctx.metric(|c| c.radical_rule_thickness);
    let gap = if ctx.style.is_display() {
        ctx.metric(|c| c.radical_display_style_vertical_gap)
    } else {
        ctx.metric(|c| c.radical_vertical_gap)
    };
    let extra_ascender = ctx.metric(|c| c.radical_extra_ascender);
    let target = radicand.height() + thickness + gap;

    let surd: FragmentRef = match GlyphFragment::resolve(SURD, ctx) {
        Ok(glyph) => Rc::new(stretch_glyph(glyph, target, 0.0, StretchAxis::Vertical, ctx)),
        // No radical sign in any font: draw a bare red rule of the right
        // height so the formula stays readable
        Err(_) => Rc::new(
            ColoredFragment::new(Color::RED, RuleFragment::new(1.0, target).into_fragment())
                .into_fragment(),
        ),
    };

    // A tall surd re-centers the gap so the rule does not hug the radicand
    let gap = gap.max((surd.height() - thickness - radicand.height() + gap) / 2.0);
    let inner_ascent = radicand.ascent() + gap + thickness;
    let descent = radicand.descent().max(surd.height() - inner_ascent);
    let mut ascent = inner_ascent + extra_ascender;

    // Degree offset and raise
    let index_offset = match &index {
        Some(index) => {
            ctx.metric(|c| c.radical_kern_before_degree)
                + index.width()
                + ctx.metric(|c| c.radical_kern_after_degree)
        }
        None => 0.0,
    };

    let surd_width = surd.width();
    let width = index_offset + surd_width + radicand.width();
    let mut items = Vec::new();

    if let Some(index) = index {
        let raise = ctx.constants().radical_degree_bottom_raise_percent / 100.0;
        let shift_up = raise * (inner_ascent + descent) + index.descent();
        let baseline = descent - shift_up;
        ascent = ascent.max(shift_up + index.ascent() - descent);
        let x = ctx.metric(|c| c.radical_kern_before_degree);
        items.push((Point::new(x, baseline), index));
    }

    let surd_baseline = surd.ascent() - inner_ascent;
    items.push((Point::new(index_offset, surd_baseline), surd));

    let rule = RuleFragment::new(radicand.width(), thickness).into_fragment();
    let rule_y = -radicand.ascent() - gap - thickness / 2.0;
    items.push((Point::new(index_offset + surd_width, rule_y), Rc::new(rule)));
    items.push((Point::new(index_offset + surd_width, 0.0), radicand));

    Ok(FrameFragment::new(width, ascent, descent, items))
}
