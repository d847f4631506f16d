//! Arrays, matrices, and alignment environments
//!
//! Rows are padded to the height of a parenthesis so single-line rows do
//! not jitter, columns take the width of their widest cell, and the whole
//! grid is centered on the math axis. Alignment environments derive their
//! column gaps from the atom classes meeting at the column boundary, which
//! is what makes `x =` and `y` abut correctly around the relation.

use crate::context::MathCtx;
use crate::error::LayoutResult;
use crate::fragment::{FrameFragment, FragmentRef, GlyphFragment, MathFragment};
use crate::geom::Point;
use crate::spacing::spacing_between;
use crate::stretch::stretch_delimiter;
use math_font::Em;
use math_model::ArraySubtype;
use std::rc::Rc;

const DELIMITER_SHORTFALL: Em = Em(0.1);

pub fn layout_array(
    cells: Vec<Vec<FragmentRef>>,
    subtype: ArraySubtype,
    ctx: &MathCtx,
) -> LayoutResult<FrameFragment> {
    let row_count = cells.len();
    let col_count = cells.iter().map(Vec::len).max().unwrap_or(0);
    if row_count == 0 || col_count == 0 {
        return Ok(FrameFragment::new(0.0, 0.0, 0.0, Vec::new()));
    }

    // Pad every row to at least a parenthesis's extent
    let (pad_ascent, pad_descent) = match GlyphFragment::resolve('(', ctx) {
        Ok(paren) => (paren.ascent, paren.descent),
        Err(_) => (0.0, 0.0),
    };
    let mut row_ascents = vec![pad_ascent; row_count];
    let mut row_descents = vec![pad_descent; row_count];
    let mut col_widths = vec![0.0f32; col_count];
    for (r, row) in cells.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            row_ascents[r] = row_ascents[r].max(cell.ascent());
            row_descents[r] = row_descents[r].max(cell.descent());
            col_widths[c] = col_widths[c].max(cell.width());
        }
    }

    let row_gap = ctx.resolve(subtype.row_gap());
    let col_gaps = column_gaps(&cells, col_count, subtype, ctx);

    let height: f32 = row_ascents
        .iter()
        .zip(&row_descents)
        .map(|(a, d)| a + d)
        .sum::<f32>()
        + row_gap * (row_count - 1) as f32;
    let axis = ctx.metric(|c| c.axis_height);
    let total_ascent = height / 2.0 + axis;

    let body_width: f32 = col_widths.iter().sum::<f32>() + col_gaps.iter().sum::<f32>();

    let mut items = Vec::new();
    let mut y = -total_ascent;
    for (r, row) in cells.into_iter().enumerate() {
        let baseline = y + row_ascents[r];
        let mut x = 0.0;
        for (c, cell) in row.into_iter().enumerate() {
            let alignment = subtype.cell_alignment(r, c, row_count);
            let cell_x = x + alignment.position(col_widths[c] - cell.width());
            items.push((Point::new(cell_x, baseline), cell));
            x += col_widths[c] + col_gaps.get(c).copied().unwrap_or(0.0);
        }
        y = baseline + row_descents[r] + row_gap;
    }

    let ascent = total_ascent;
    let descent = height - total_ascent;
    let delimiters = subtype.delimiters();
    if delimiters.is_none() {
        return Ok(FrameFragment::new(body_width, ascent, descent, items));
    }

    // Stretch delimiters around the grid
    let shortfall = ctx.resolve(DELIMITER_SHORTFALL);
    let open = delimiters
        .open
        .map(|ch| stretch_delimiter(ch, height, shortfall, ctx));
    let close = delimiters
        .close
        .map(|ch| stretch_delimiter(ch, height, shortfall, ctx));
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
        items.push((Point::new(open_width + body_width, 0.0), Rc::new(close)));
    }
    Ok(FrameFragment::new(
        open_width + body_width + close_width,
        ascent,
        descent,
        items,
    ))
}

/// Gap after each column (the last entry is unused)
fn column_gaps(
    cells: &[Vec<FragmentRef>],
    col_count: usize,
    subtype: ArraySubtype,
    ctx: &MathCtx,
) -> Vec<f32> {
    let fixed = ctx.resolve(subtype.column_gap());
    if !subtype.uses_spacing_column_gap() {
        return vec![fixed; col_count.saturating_sub(1)];
    }
    // Alignment environments: the gap at a boundary is the widest atom
    // spacing any row produces across it
    let mut gaps = Vec::with_capacity(col_count.saturating_sub(1));
    for c in 0..col_count.saturating_sub(1) {
        let mut gap: Option<f32> = None;
        for row in cells {
            let (Some(left), Some(right)) = (row.get(c), row.get(c + 1)) else {
                continue;
            };
            if left.layout_length() == 0 || right.layout_length() == 0 {
                continue;
            }
            let spacing =
                spacing_between(trailing_class(left), leading_class(right), ctx.style);
            let width = ctx.resolve(spacing.em());
            gap = Some(gap.map_or(width, |g: f32| g.max(width)));
        }
        gaps.push(gap.unwrap_or(fixed));
    }
    gaps
}

fn trailing_class(fragment: &FragmentRef) -> crate::class::MathClass {
    match fragment.as_ref() {
        MathFragment::Frame(frame) => match frame.items.last() {
            Some((_, last)) => last.class(),
            None => fragment.class(),
        },
        _ => fragment.class(),
    }
}

fn leading_class(fragment: &FragmentRef) -> crate::class::MathClass {
    match fragment.as_ref() {
        MathFragment::Frame(frame) => match frame.items.first() {
            Some((_, first)) => first.class(),
            None => fragment.class(),
        },
        _ => fragment.class(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructs::list::layout_list;
    use crate::style::MathStyle;
    use math_font::{FontChain, StaticMathFont, StretchAxis};
    use math_model::DelimiterPair;

    fn chain() -> FontChain {
        let font = StaticMathFont::new(10.0)
            .with_coverage("abcdxy=01()[]{")
            .with_size_variants('(', StretchAxis::Vertical, &[20.0, 30.0, 45.0])
            .with_size_variants('[', StretchAxis::Vertical, &[20.0, 30.0, 45.0]);
        FontChain::new(vec![Box::new(font)]).unwrap()
    }

    fn cell(text: &str, ctx: &MathCtx) -> FragmentRef {
        let frags = text
            .chars()
            .map(|ch| Rc::new(GlyphFragment::resolve(ch, ctx).unwrap().into_fragment()))
            .collect();
        Rc::new(layout_list(frags, ctx).into_fragment())
    }

    #[test]
    fn matrix_is_centered_on_the_axis() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let cells = vec![
            vec![cell("a", &ctx), cell("b", &ctx)],
            vec![cell("c", &ctx), cell("d", &ctx)],
        ];
        let frame =
            layout_array(cells, ArraySubtype::Matrix(DelimiterPair::NONE), &ctx).unwrap();
        let axis = ctx.metric(|c| c.axis_height);
        let height = frame.ascent + frame.descent;
        assert!((frame.ascent - (height / 2.0 + axis)).abs() < 1e-4);
    }

    #[test]
    fn columns_take_the_widest_cell() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let wide = cell("abcd", &ctx);
        let wide_width = wide.width();
        let cells = vec![vec![wide], vec![cell("x", &ctx)]];
        let frame = layout_array(cells, ArraySubtype::Gathered, &ctx).unwrap();
        assert!((frame.width - wide_width).abs() < 1e-4);
        // The narrow row is centered in gathered environments
        let narrow = &frame.items[1];
        assert!(narrow.0.x > 0.0);
    }

    #[test]
    fn pmatrix_gets_stretched_parens() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let cells = vec![
            vec![cell("a", &ctx), cell("b", &ctx)],
            vec![cell("c", &ctx), cell("d", &ctx)],
        ];
        let plain = layout_array(
            cells.clone(),
            ArraySubtype::Matrix(DelimiterPair::NONE),
            &ctx,
        )
        .unwrap();
        let frame =
            layout_array(cells, ArraySubtype::Matrix(DelimiterPair::PAREN), &ctx).unwrap();
        assert!(frame.width > plain.width);
        assert!(matches!(
            frame.items.first().unwrap().1.as_ref(),
            MathFragment::Variant(_) | MathFragment::Glyph(_)
        ));
    }

    #[test]
    fn aligned_columns_meet_at_the_relation() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        // "x=" then "y": the boundary spacing is the relation's thick space
        let cells = vec![vec![cell("x=", &ctx), cell("y", &ctx)]];
        let frame = layout_array(cells, ArraySubtype::Aligned, &ctx).unwrap();
        let left_end = frame.items[0].0.x + frame.items[0].1.width();
        let right_start = frame.items[1].0.x;
        let thick = ctx.resolve(crate::spacing::Spacing::Thick.em());
        assert!((right_start - left_end - thick).abs() < 1e-4);
    }

    #[test]
    fn substack_rows_are_tight() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let make = |subtype| {
            let cells = vec![vec![cell("a", &ctx)], vec![cell("b", &ctx)]];
            layout_array(cells, subtype, &ctx).unwrap()
        };
        let stack = make(ArraySubtype::Substack);
        let gathered = make(ArraySubtype::Gathered);
        assert!(stack.ascent + stack.descent < gathered.ascent + gathered.descent);
    }

    #[test]
    fn missing_delimiters_degrade_to_red_rules() {
        let font = StaticMathFont::new(10.0).with_coverage("ab");
        let chain = FontChain::new(vec![Box::new(font)]).unwrap();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let cells = vec![vec![cell("a", &ctx)], vec![cell("b", &ctx)]];
        // Cases opens with a brace the font does not cover
        let frame = layout_array(cells, ArraySubtype::Cases, &ctx).unwrap();
        assert!(matches!(
            frame.items.first().unwrap().1.as_ref(),
            MathFragment::Colored(_)
        ));
    }

    #[test]
    fn empty_grid_is_zero_sized() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let frame = layout_array(Vec::new(), ArraySubtype::Gathered, &ctx).unwrap();
        assert_eq!(frame.width, 0.0);
    }
}
