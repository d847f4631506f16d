//! Horizontal lists with class-pair spacing

use crate::class::{resolve_running_classes, MathClass};
use crate::context::MathCtx;
use crate::fragment::{FrameFragment, FragmentRef};
use crate::geom::Point;
use crate::spacing::spacing_between;

/// Lay out fragments left to right, inserting class-pair spacing between
/// neighbors. A single-element list is transparent: it reports the metrics,
/// class, and limit policy of its only element.
pub fn layout_list(fragments: Vec<FragmentRef>, ctx: &MathCtx) -> FrameFragment {
    let classes: Vec<MathClass> = fragments.iter().map(|f| f.class()).collect();
    let resolved = resolve_running_classes(&classes);

    let mut items = Vec::with_capacity(fragments.len());
    let mut x = 0.0;
    let mut ascent: f32 = 0.0;
    let mut descent: f32 = 0.0;
    let mut length = 0;
    for (i, fragment) in fragments.into_iter().enumerate() {
        if i > 0 {
            let space = spacing_between(resolved[i - 1], resolved[i], ctx.style);
            x += ctx.resolve(space.em());
        }
        ascent = ascent.max(fragment.ascent());
        descent = descent.max(fragment.descent());
        length += fragment.layout_length();
        let advance = fragment.width();
        items.push((Point::new(x, 0.0), fragment));
        x += advance;
    }

    let frame = FrameFragment::new(x, ascent, descent, items).with_length(length);
    if frame.items.len() == 1 {
        let only = frame.items[0].1.clone();
        frame
            .with_italics_correction(only.italics_correction())
            .with_accent_attachment(only.accent_attachment())
            .with_class(only.class())
            .with_limits(only.limits())
            .with_text_like(only.is_text_like())
    } else {
        let text_like =
            !frame.items.is_empty() && frame.items.iter().all(|(_, f)| f.is_text_like());
        frame.with_text_like(text_like)
    }
}
