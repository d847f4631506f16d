//! Scripts and limits
//!
//! A nucleus can carry post-scripts, pre-scripts, and (for large operators
//! in display style) limits above and below. Script shifts follow the MATH
//! constants: preferred shifts, minimum clearances from the baseline, and a
//! collision fix that keeps the superscript's bottom clear of the
//! subscript's top.

use crate::class::Limits;
use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{FrameFragment, FragmentRef, MathFragment};
use crate::geom::Point;

/// Optional attachments around a nucleus
#[derive(Default, Clone)]
pub struct Scripts {
    pub sub: Option<FragmentRef>,
    pub sup: Option<FragmentRef>,
    pub lsub: Option<FragmentRef>,
    pub lsup: Option<FragmentRef>,
}

impl Scripts {
    pub fn is_empty(&self) -> bool {
        self.sub.is_none() && self.sup.is_none() && self.lsub.is_none() && self.lsup.is_none()
    }
}

/// Attach scripts to a nucleus. When the nucleus wants limits at the
/// current style, the post-scripts move above and below it; pre-scripts
/// always stay at the side.
pub fn layout_attach(
    nucleus: FragmentRef,
    scripts: Scripts,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let limits_active = nucleus.limits().is_active(ctx.style);
    let (top, bottom, sup, sub) = if limits_active {
        (scripts.sup, scripts.sub, None, None)
    } else {
        (None, None, scripts.sup, scripts.sub)
    };

    let core = if top.is_some() || bottom.is_some() {
        let frame = layout_limits(nucleus, top, bottom, ctx)?;
        std::rc::Rc::new(frame.into_fragment())
    } else {
        nucleus
    };

    if sup.is_none() && sub.is_none() && scripts.lsub.is_none() && scripts.lsup.is_none() {
        if let MathFragment::Frame(frame) = core.as_ref() {
            return Ok(frame.clone());
        }
        // Bare nucleus: wrap transparently
        let class = core.class();
        let text_like = core.is_text_like();
        let ic = core.italics_correction();
        let attach = core.accent_attachment();
        let metrics = core.box_metrics();
        return Ok(FrameFragment::new(
            metrics.width,
            metrics.ascent,
            metrics.descent,
            vec![(Point::origin(), core)],
        )
        .with_class(class)
        .with_text_like(text_like)
        .with_italics_correction(ic)
        .with_accent_attachment(attach));
    }

    layout_side_scripts(core, sup, sub, scripts.lsup, scripts.lsub, ctx)
}

/// Preferred and minimum shifts for superscript and subscript, with the
/// collision fix applied when both are present
fn script_shifts(
    nucleus: &MathFragment,
    sup: Option<&FragmentRef>,
    sub: Option<&FragmentRef>,
    ctx: &MathCtx,
) -> (f32, f32) {
    let text_like = nucleus.is_text_like();
    let mut shift_up = 0.0f32;
    let mut shift_down = 0.0f32;

    if let Some(sup) = sup {
        let preferred = if ctx.cramped {
            ctx.metric(|c| c.superscript_shift_up_cramped)
        } else {
            ctx.metric(|c| c.superscript_shift_up)
        };
        shift_up = preferred.max(ctx.metric(|c| c.superscript_bottom_min) + sup.descent());
        if !text_like {
            shift_up = shift_up
                .max(nucleus.ascent() - ctx.metric(|c| c.superscript_baseline_drop_max));
        }
    }
    if let Some(sub) = sub {
        shift_down = ctx
            .metric(|c| c.subscript_shift_down)
            .max(sub.ascent() - ctx.metric(|c| c.subscript_top_max));
        if !text_like {
            shift_down = shift_down
                .max(nucleus.descent() + ctx.metric(|c| c.subscript_baseline_drop_min));
        }
    }

    if let (Some(sup), Some(sub)) = (sup, sub) {
        let sup_bottom = shift_up - sup.descent();
        let sub_top = sub.ascent() - shift_down;
        let gap = sup_bottom - sub_top;
        let gap_min = ctx.metric(|c| c.sub_superscript_gap_min);
        if gap < gap_min {
            let increase = gap_min - gap;
            let sup_only = (ctx.metric(|c| c.superscript_bottom_max_with_subscript)
                - sup_bottom)
                .clamp(0.0, increase);
            let rest = (increase - sup_only) / 2.0;
            shift_up += sup_only + rest;
            shift_down += rest;
        }
    }
    (shift_up, shift_down)
}

fn layout_side_scripts(
    nucleus: FragmentRef,
    sup: Option<FragmentRef>,
    sub: Option<FragmentRef>,
    lsup: Option<FragmentRef>,
    lsub: Option<FragmentRef>,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let (shift_up, shift_down) = script_shifts(&nucleus, sup.as_ref(), sub.as_ref(), ctx);
    // Pre-scripts share the shift computation of their post counterparts
    let (pre_up, pre_down) = script_shifts(&nucleus, lsup.as_ref(), lsub.as_ref(), ctx);
    let space_after = ctx.metric(|c| c.space_after_script);

    let script_width = |f: &Option<FragmentRef>| f.as_ref().map(|f| f.width()).unwrap_or(0.0);
    let pre_width = if lsup.is_some() || lsub.is_some() {
        script_width(&lsup).max(script_width(&lsub)) + space_after
    } else {
        0.0
    };
    let post_width = if sup.is_some() || sub.is_some() {
        script_width(&sup).max(script_width(&sub)) + space_after
    } else {
        0.0
    };

    let mut ascent = nucleus.ascent();
    let mut descent = nucleus.descent();
    for (fragment, shift) in [(&sup, shift_up), (&lsup, pre_up)] {
        if let Some(f) = fragment {
            ascent = ascent.max(shift + f.ascent());
        }
    }
    for (fragment, shift) in [(&sub, shift_down), (&lsub, pre_down)] {
        if let Some(f) = fragment {
            descent = descent.max(shift + f.descent());
        }
    }

    let class = nucleus.class();
    let text_like = nucleus.is_text_like();
    let nucleus_width = nucleus.width();
    let width = pre_width + nucleus_width + post_width;

    let mut items = Vec::new();
    // Pre-scripts are right-aligned against the nucleus
    if let Some(f) = lsup {
        let x = pre_width - space_after - f.width();
        items.push((Point::new(x, -pre_up), f));
    }
    if let Some(f) = lsub {
        let x = pre_width - space_after - f.width();
        items.push((Point::new(x, pre_down), f));
    }
    items.push((Point::new(pre_width, 0.0), nucleus));
    let post_x = pre_width + nucleus_width;
    if let Some(f) = sup {
        items.push((Point::new(post_x, -shift_up), f));
    }
    if let Some(f) = sub {
        items.push((Point::new(post_x, shift_down), f));
    }

    Ok(FrameFragment::new(width, ascent, descent, items)
        .with_class(class)
        .with_text_like(text_like))
}

/// Place limits above and below a large operator
fn layout_limits(
    nucleus: FragmentRef,
    top: Option<FragmentRef>,
    bottom: Option<FragmentRef>,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let ic = nucleus.italics_correction();
    let nucleus_width = nucleus.width();
    let mut width = nucleus_width;
    for f in top.iter().chain(bottom.iter()) {
        width = width.max(f.width());
    }

    let mut ascent = nucleus.ascent();
    let mut descent = nucleus.descent();
    let mut items = Vec::new();

    if let Some(f) = &top {
        let rise = ctx.metric(|c| c.upper_limit_baseline_rise_min);
        let gap = ctx.metric(|c| c.upper_limit_gap_min);
        let shift = nucleus.ascent() + rise.max(gap + f.descent());
        ascent = ascent.max(shift + f.ascent());
        // The upper limit leans into the operator's italic slant
        let x = (width - f.width()) / 2.0 + ic / 2.0;
        items.push((Point::new(x, -shift), f.clone()));
    }
    if let Some(f) = &bottom {
        let drop = ctx.metric(|c| c.lower_limit_baseline_drop_min);
        let gap = ctx.metric(|c| c.lower_limit_gap_min);
        let shift = nucleus.descent() + drop.max(gap + f.ascent());
        descent = descent.max(shift + f.descent());
        let x = (width - f.width()) / 2.0 - ic / 2.0;
        items.push((Point::new(x, shift), f.clone()));
    }

    let class = nucleus.class();
    items.push((Point::new((width - nucleus_width) / 2.0, 0.0), nucleus));

    Ok(FrameFragment::new(width, ascent, descent, items)
        .with_class(class)
        .with_limits(Limits::Never))
}
