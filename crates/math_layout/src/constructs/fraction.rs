//! Fractions and binomials

use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{FrameFragment, FragmentRef, MathFragment, RuleFragment};
use crate::geom::Point;
use crate::stretch::stretch_delimiter;
use math_font::Em;
use math_model::FractionSubtype;
use std::rc::Rc;

const DELIMITER_SHORTFALL: Em = Em(0.1);
const FRACTION_SPACING: Em = Em(0.1);
const MIN_RULE_WIDTH: Em = Em(0.3);

/// Stack a numerator over a denominator, with an optional rule and optional
/// stretched delimiters. The numerator clears the rule by at least the
/// font's minimum gap; preferred shifts win when they are larger.
pub fn layout_fraction(
    numerator: FragmentRef,
    denominator: FragmentRef,
    subtype: FractionSubtype,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let display = ctx.style.is_display();
    let axis = ctx.metric(|c| c.axis_height);
    let thickness = if subtype.ruler {
        ctx.metric(|c| c.fraction_rule_thickness)
    } else {
        0.0
    };
    let (shift_up, num_gap_min) = if display {
        (
            ctx.metric(|c| c.fraction_numerator_display_style_shift_up),
            ctx.metric(|c| c.fraction_num_display_style_gap_min),
        )
    } else {
        (
            ctx.metric(|c| c.fraction_numerator_shift_up),
            ctx.metric(|c| c.fraction_numerator_gap_min),
        )
    };
    let (shift_down, denom_gap_min) = if display {
        (
            ctx.metric(|c| c.fraction_denominator_display_style_shift_down),
            ctx.metric(|c| c.fraction_denom_display_style_gap_min),
        )
    } else {
        (
            ctx.metric(|c| c.fraction_denominator_shift_down),
            ctx.metric(|c| c.fraction_denominator_gap_min),
        )
    };

    let num_gap = (shift_up - (axis + thickness / 2.0) - numerator.descent()).max(num_gap_min);
    let denom_gap =
        (shift_down + (axis - thickness / 2.0) - denominator.ascent()).max(denom_gap_min);

    let spacing = ctx.resolve(FRACTION_SPACING);
    let rule_width = numerator
        .width()
        .max(denominator.width())
        .max(ctx.resolve(MIN_RULE_WIDTH));
    let width = rule_width + 2.0 * spacing;
    let ascent = numerator.height() + num_gap + thickness / 2.0 + axis;
    let total =
        numerator.height() + num_gap + thickness + denom_gap + denominator.height();
    let descent = total - ascent;

    let num_x = (width - numerator.width()) / 2.0;
    let den_x = (width - denominator.width()) / 2.0;
    let num_baseline = -ascent + numerator.ascent();
    let den_baseline = descent - denominator.descent();

    let mut items = vec![
        (Point::new(num_x, num_baseline), numerator),
        (Point::new(den_x, den_baseline), denominator),
    ];
    if subtype.ruler {
        let rule = RuleFragment::new(rule_width, thickness).into_fragment();
        items.push((Point::new(spacing, -axis), Rc::new(rule)));
    }

    if subtype.delimiters.is_none() {
        return Ok(FrameFragment::new(width, ascent, descent, items));
    }

    // Stretch delimiters to the body height and widen the frame around them
    let shortfall = ctx.resolve(DELIMITER_SHORTFALL);
    let target = ascent + descent;
    let open = subtype
        .delimiters
        .open
        .map(|ch| stretch_delimiter(ch, target, shortfall, ctx));
    let close = subtype
        .delimiters
        .close
        .map(|ch| stretch_delimiter(ch, target, shortfall, ctx));

    let open_width = open.as_ref().map(MathFragment::width).unwrap_or(0.0);
    let close_width = close.as_ref().map(MathFragment::width).unwrap_or(0.0);
    let mut ascent = ascent;
    let mut descent = descent;
    for delim in open.iter().chain(close.iter()) {
        ascent = ascent.max(delim.ascent());
        descent = descent.max(delim.descent());
    }

    for (position, _) in &mut items {
        position.x += open_width;
    }
    if let Some(open) = open {
        items.insert(0, (Point::origin(), Rc::new(open)));
    }
    if let Some(close) = close {
        items.push((Point::new(open_width + width, 0.0), Rc::new(close)));
    }
    Ok(FrameFragment::new(
        open_width + width + close_width,
        ascent,
        descent,
        items,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructs::list::layout_list;
    use crate::fragment::GlyphFragment;
    use crate::style::MathStyle;
    use math_font::{FontChain, StaticMathFont};

    fn chain() -> FontChain {
        let font = StaticMathFont::new(10.0).with_coverage("abxy12()");
        FontChain::new(vec![Box::new(font)]).unwrap()
    }

    fn run(text: &str, ctx: &MathCtx) -> FragmentRef {
        let frags = text
            .chars()
            .map(|ch| Rc::new(GlyphFragment::resolve(ch, ctx).unwrap().into_fragment()))
            .collect();
        Rc::new(layout_list(frags, ctx).into_fragment())
    }

    fn fraction(style: MathStyle, subtype: FractionSubtype) -> FrameFragment {
        let chain = chain();
        let ctx = MathCtx::new(&chain, style);
        let inner = ctx.numerator();
        let num = run("a", &inner);
        let den = run("b", &ctx.denominator());
        layout_fraction(num, den, subtype, &ctx).unwrap()
    }

    #[test]
    fn numerator_sits_above_the_axis() {
        let frame = fraction(MathStyle::Text, FractionSubtype::FRACTION);
        // The rule sits on the axis; everything above it belongs to the
        // numerator side
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let axis = ctx.metric(|c| c.axis_height);
        assert!(frame.ascent > axis);
        assert!(frame.descent > 0.0);
    }

    #[test]
    fn display_style_is_taller_than_text_style() {
        let display = fraction(MathStyle::Display, FractionSubtype::FRACTION);
        let text = fraction(MathStyle::Text, FractionSubtype::FRACTION);
        assert!(display.ascent + display.descent > text.ascent + text.descent);
    }

    #[test]
    fn rule_spans_the_wider_component() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let num = run("xy12", &ctx.numerator());
        let num_width = num.width();
        let den = run("b", &ctx.denominator());
        let frame = layout_fraction(num, den, FractionSubtype::FRACTION, &ctx).unwrap();
        let rule = frame
            .items
            .iter()
            .find_map(|(_, f)| match f.as_ref() {
                MathFragment::Rule(r) => Some(*r),
                _ => None,
            })
            .unwrap();
        assert!((rule.width - num_width).abs() < 1e-4);
    }

    #[test]
    fn narrow_content_keeps_the_minimum_rule_width() {
        let frame = fraction(MathStyle::Text, FractionSubtype::FRACTION);
        let rule = frame
            .items
            .iter()
            .find_map(|(_, f)| match f.as_ref() {
                MathFragment::Rule(r) => Some(*r),
                _ => None,
            })
            .unwrap();
        assert!(rule.width >= 3.0 - 1e-4); // 0.3em at 10pt
    }

    #[test]
    fn binomials_drop_the_rule_and_add_parens() {
        let frame = fraction(MathStyle::Text, FractionSubtype::BINOMIAL);
        let has_rule = frame
            .items
            .iter()
            .any(|(_, f)| matches!(f.as_ref(), MathFragment::Rule(_)));
        assert!(!has_rule);
        let plain = fraction(MathStyle::Text, FractionSubtype::FRACTION);
        assert!(frame.width > plain.width);
        assert_eq!(frame.items.len(), 4); // open, num, den, close
    }

    #[test]
    fn missing_delimiters_degrade_to_red_rules() {
        let font = StaticMathFont::new(10.0).with_coverage("nk");
        let chain = FontChain::new(vec![Box::new(font)]).unwrap();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let num = run("n", &ctx.numerator());
        let den = run("k", &ctx.denominator());
        let frame = layout_fraction(num, den, FractionSubtype::BINOMIAL, &ctx).unwrap();
        let colored = frame
            .items
            .iter()
            .filter(|(_, f)| matches!(f.as_ref(), MathFragment::Colored(_)))
            .count();
        assert_eq!(colored, 2);
    }
}
