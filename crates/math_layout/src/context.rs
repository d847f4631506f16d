//! Layout Context - Style, cramping, and metric resolution
//!
//! A `MathCtx` bundles the font chain with the current style and cramped
//! flag. Script styles do not switch fonts; instead every metric read
//! through the context is multiplied by the style's scale factor, which is
//! exact because font metrics are linear in size.

use crate::style::MathStyle;
use math_font::{Em, FontChain, MathConstants};

/// Immutable layout context threaded through construct layout
#[derive(Clone, Copy)]
pub struct MathCtx<'a> {
    pub chain: &'a FontChain,
    pub style: MathStyle,
    pub cramped: bool,
}

impl<'a> MathCtx<'a> {
    pub fn new(chain: &'a FontChain, style: MathStyle) -> Self {
        Self {
            chain,
            style,
            cramped: false,
        }
    }

    pub fn with_style(self, style: MathStyle) -> Self {
        Self { style, ..self }
    }

    pub fn with_cramped(self, cramped: bool) -> Self {
        Self { cramped, ..self }
    }

    /// Context for a superscript: script style, cramping preserved
    pub fn superscript(self) -> Self {
        self.with_style(self.style.script_style())
    }

    /// Context for a subscript: script style, always cramped
    pub fn subscript(self) -> Self {
        self.with_style(self.style.script_style()).with_cramped(true)
    }

    /// Context for a numerator: fraction style, cramping preserved
    pub fn numerator(self) -> Self {
        self.with_style(self.style.fraction_style())
    }

    /// Context for a denominator: fraction style, always cramped
    pub fn denominator(self) -> Self {
        self.with_style(self.style.fraction_style()).with_cramped(true)
    }

    /// Layout constants from the primary font
    pub fn constants(&self) -> &MathConstants {
        self.chain.primary().constants()
    }

    /// Glyph scale for the current style
    pub fn scale(&self) -> f32 {
        self.style.scale(self.constants())
    }

    /// Effective font size after style scaling
    pub fn font_size(&self) -> f32 {
        self.chain.primary().font_size() * self.scale()
    }

    /// Read a constant scaled to the current style
    pub fn metric(&self, read: impl Fn(&MathConstants) -> f32) -> f32 {
        read(self.constants()) * self.scale()
    }

    /// Resolve an em length at the effective font size
    pub fn resolve(&self, length: Em) -> f32 {
        length.resolve(self.font_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_font::StaticMathFont;

    fn chain() -> FontChain {
        let font = StaticMathFont::new(10.0).with_coverage("x");
        FontChain::new(vec![Box::new(font)]).unwrap()
    }

    #[test]
    fn script_contexts_scale_metrics() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        let script = ctx.superscript();
        assert_eq!(script.style, MathStyle::Script);
        assert!(script.font_size() < ctx.font_size());
        assert!(
            script.metric(|c| c.axis_height) < ctx.metric(|c| c.axis_height)
        );
    }

    #[test]
    fn cramping_rules() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Display);
        assert!(!ctx.superscript().cramped);
        assert!(ctx.subscript().cramped);
        assert!(!ctx.numerator().cramped);
        assert!(ctx.denominator().cramped);
        // Cramping is sticky once set
        assert!(ctx.with_cramped(true).superscript().cramped);
    }

    #[test]
    fn em_lengths_track_the_effective_size() {
        let chain = chain();
        let ctx = MathCtx::new(&chain, MathStyle::Text);
        assert_eq!(ctx.resolve(Em::new(0.5)), 5.0);
        let script = ctx.subscript();
        assert!(script.resolve(Em::new(0.5)) < 5.0);
    }
}
