//! Math Layout Crate - Typesetting engine for formula trees
//!
//! Turns a `math_model` arena into immutable fragment trees ready to draw:
//! - `fragment`: glyphs, stretched variants, rules, frames, color wrappers
//! - `class` / `spacing`: atom classification and class-pair spacing
//! - `stretch`: size variants and part assemblies for growable glyphs
//! - `constructs`: fractions, radicals, scripts, accents, under/over
//!   decorations, and array environments
//! - `reconcile`: the incremental engine that rebuilds only dirty paths and
//!   stops early when box metrics are unchanged

pub mod canvas;
pub mod class;
pub mod constructs;
pub mod context;
pub mod error;
pub mod fragment;
pub mod geom;
pub mod reconcile;
pub mod spacing;
pub mod stretch;
pub mod style;

pub use canvas::{Canvas, Color, DrawCommand, RecordingCanvas};
pub use class::{class_of, resolve_running_classes, Limits, MathClass};
pub use context::MathCtx;
pub use error::{LayoutError, LayoutResult};
pub use fragment::{
    ColoredFragment, FragmentRef, FrameFragment, GlyphFragment, MathFragment, PartGlyph,
    RuleFragment, VariantFragment,
};
pub use geom::Point;
pub use reconcile::{LayoutEngine, Outcome};
pub use spacing::{spacing_between, Spacing};
pub use stretch::{stretch_char, stretch_delimiter, stretch_glyph};
pub use style::MathStyle;

#[cfg(test)]
mod tests {
    use super::*;
    use math_font::{FontChain, StaticMathFont, StaticPart, StretchAxis};
    use math_model::{
        ArraySubtype, ComponentSlot, DelimiterPair, FractionSubtype, MathNodeKind, NodeArena,
    };

    fn chain() -> FontChain {
        let font = StaticMathFont::new(10.0)
            .with_coverage("abcdefghinxyz0124+=(),√∑\u{FFFD}")
            .with_size_variants('(', StretchAxis::Vertical, &[18.0, 26.0, 40.0])
            .with_size_variants(')', StretchAxis::Vertical, &[18.0, 26.0, 40.0])
            .with_size_variants('√', StretchAxis::Vertical, &[20.0, 30.0, 50.0])
            .with_assembly(
                '{',
                StretchAxis::Vertical,
                &[
                    StaticPart {
                        full_advance: 6.0,
                        start_connector: 0.0,
                        end_connector: 1.0,
                        is_extender: false,
                    },
                    StaticPart {
                        full_advance: 5.0,
                        start_connector: 1.0,
                        end_connector: 1.0,
                        is_extender: true,
                    },
                    StaticPart {
                        full_advance: 4.0,
                        start_connector: 1.0,
                        end_connector: 1.0,
                        is_extender: false,
                    },
                    StaticPart {
                        full_advance: 5.0,
                        start_connector: 1.0,
                        end_connector: 1.0,
                        is_extender: true,
                    },
                    StaticPart {
                        full_advance: 6.0,
                        start_connector: 1.0,
                        end_connector: 0.0,
                        is_extender: false,
                    },
                ],
            );
        FontChain::new(vec![Box::new(font)]).unwrap()
    }

    #[test]
    fn quadratic_formula_pipeline() {
        // x = (-b ± √(b² - 4ac)) / 2a, condensed to the interesting parts:
        // a fraction whose numerator holds a radical with a scripted run
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Display);
        let mut arena = NodeArena::new();

        let b = arena.push_run("b");
        let two = arena.push_run("2");
        let b_squared = arena.push(MathNodeKind::Attach);
        arena
            .set_component(b_squared, ComponentSlot::Nucleus, vec![b])
            .unwrap();
        arena
            .set_component(b_squared, ComponentSlot::Sup, vec![two])
            .unwrap();
        let rest = arena.push_run("+4ac");
        let radical = arena.push(MathNodeKind::Radical { has_index: false });
        arena
            .set_component(radical, ComponentSlot::Radicand, vec![b_squared, rest])
            .unwrap();
        let den = arena.push_run("2a");
        let frac = arena.push(MathNodeKind::Fraction(FractionSubtype::FRACTION));
        arena
            .set_component(frac, ComponentSlot::Numerator, vec![radical])
            .unwrap();
        arena
            .set_component(frac, ComponentSlot::Denominator, vec![den])
            .unwrap();

        let mut engine = LayoutEngine::new();
        let fragment = engine.layout(&mut arena, frac, &ctx).unwrap();
        assert!(fragment.height() > 20.0);

        // The whole tree draws without panicking and in one color
        let mut canvas = RecordingCanvas::new();
        fragment.draw(&mut canvas, Point::origin(), Color::BLACK);
        assert!(canvas.commands.len() > 8);
        assert!(canvas.in_color(Color::RED).is_empty());
    }

    #[test]
    fn fraction_shrinks_from_display_to_script() {
        let chain = chain();
        let mut sizes = Vec::new();
        for style in [MathStyle::Display, MathStyle::Text, MathStyle::Script] {
            let ctx = MathCtx::new(&chain, style);
            let mut arena = NodeArena::new();
            let num = arena.push_run("a");
            let den = arena.push_run("b");
            let frac = arena.push(MathNodeKind::Fraction(FractionSubtype::FRACTION));
            arena
                .set_component(frac, ComponentSlot::Numerator, vec![num])
                .unwrap();
            arena
                .set_component(frac, ComponentSlot::Denominator, vec![den])
                .unwrap();
            let mut engine = LayoutEngine::new();
            let fragment = engine.layout(&mut arena, frac, &ctx).unwrap();
            sizes.push(fragment.height());
        }
        assert!(sizes[0] > sizes[1]);
        assert!(sizes[1] > sizes[2]);
    }

    #[test]
    fn brace_stretches_to_a_tall_cases_body() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Display);
        let mut arena = NodeArena::new();
        let rows = 4;
        let array = arena.push(MathNodeKind::Array {
            subtype: ArraySubtype::Cases,
            rows,
            cols: 1,
        });
        for row in 0..rows {
            let cell = arena.push_run("x=0");
            arena
                .set_component(array, ComponentSlot::Cell { row, col: 0 }, vec![cell])
                .unwrap();
        }
        let mut engine = LayoutEngine::new();
        let fragment = engine.layout(&mut arena, array, &ctx).unwrap();

        // Four paren-padded rows stand well above a single glyph, so the
        // brace must assemble from parts rather than stay at base size
        let brace = match fragment.as_ref() {
            MathFragment::Frame(frame) => frame.items.first().unwrap().1.clone(),
            other => panic!("expected frame, got {other:?}"),
        };
        match brace.as_ref() {
            MathFragment::Variant(v) => {
                assert!(v.parts.len() > 5);
                assert!(brace.height() >= fragment.height() - 2.0);
            }
            other => panic!("expected assembled brace, got {other:?}"),
        }
    }

    #[test]
    fn matrix_round_trip_with_incremental_edit() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let array = arena.push(MathNodeKind::Array {
            subtype: ArraySubtype::Matrix(DelimiterPair::PAREN),
            rows: 2,
            cols: 2,
        });
        let mut cells = Vec::new();
        for row in 0..2 {
            for col in 0..2 {
                let cell = arena.push_run("a");
                arena
                    .set_component(array, ComponentSlot::Cell { row, col }, vec![cell])
                    .unwrap();
                cells.push(cell);
            }
        }
        let mut engine = LayoutEngine::new();
        let before = engine.layout(&mut arena, array, &ctx).unwrap();

        // Make one cell wider; the matrix must widen, and so must the
        // column the cell sits in
        arena.set_run_text(cells[0], "abcd").unwrap();
        let after = engine.layout(&mut arena, array, &ctx).unwrap();
        assert!(after.width() > before.width());
    }

    #[test]
    fn binomial_and_fraction_share_the_pipeline() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let mut arena = NodeArena::new();
        let n = arena.push_run("n");
        let k = arena.push_run("k");
        let binomial = arena.push(MathNodeKind::Fraction(FractionSubtype::BINOMIAL));
        arena
            .set_component(binomial, ComponentSlot::Numerator, vec![n])
            .unwrap();
        arena
            .set_component(binomial, ComponentSlot::Denominator, vec![k])
            .unwrap();
        let mut engine = LayoutEngine::new();
        let fragment = engine.layout(&mut arena, binomial, &ctx).unwrap();

        let mut canvas = RecordingCanvas::new();
        fragment.draw(&mut canvas, Point::origin(), Color::BLACK);
        // Two paren delimiters, two letters, and no rule
        let rules = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rule { .. }))
            .count();
        assert_eq!(rules, 0);
        assert!(canvas.commands.len() >= 4);
    }
}
