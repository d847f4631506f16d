//! Font Fallback Chain Module
//!
//! An ordered chain of math fonts. Character lookups walk the chain
//! front to back and stop at the first font whose cmap covers the
//! character, so a symbol-heavy secondary font can backstop a primary
//! text font with sparse math coverage.

use crate::error::{FontError, FontResult};
use crate::font::{GlyphId, MathFont};

/// An ordered list of fonts consulted in priority order.
pub struct FontChain {
    fonts: Vec<Box<dyn MathFont>>,
}

impl FontChain {
    /// Build a chain from one or more fonts. The first font is the
    /// primary font and supplies the layout constants.
    pub fn new(fonts: Vec<Box<dyn MathFont>>) -> FontResult<Self> {
        if fonts.is_empty() {
            return Err(FontError::EmptyChain);
        }
        Ok(Self { fonts })
    }

    /// The primary font of the chain.
    pub fn primary(&self) -> &dyn MathFont {
        self.fonts[0].as_ref()
    }

    /// Number of fonts in the chain.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The font at a previously resolved chain index.
    pub fn font_at(&self, index: usize) -> Option<&dyn MathFont> {
        self.fonts.get(index).map(|f| f.as_ref())
    }

    /// Find the first font in the chain that covers `ch`.
    pub fn resolve(&self, ch: char) -> Option<(usize, &dyn MathFont, GlyphId)> {
        for (index, font) in self.fonts.iter().enumerate() {
            if let Some(glyph) = font.glyph_id(ch) {
                return Some((index, font.as_ref(), glyph));
            }
        }
        None
    }

    /// Like [`resolve`](Self::resolve), but fails with the missing
    /// character when no font covers it.
    pub fn resolve_required(&self, ch: char) -> FontResult<(usize, &dyn MathFont, GlyphId)> {
        self.resolve(ch).ok_or(FontError::MissingGlyph(ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_font::StaticMathFont;

    fn chain() -> FontChain {
        let primary = StaticMathFont::new(10.0)
            .with_name("primary")
            .with_coverage("abc");
        let backstop = StaticMathFont::new(10.0)
            .with_name("backstop")
            .with_coverage("abcxyz");
        FontChain::new(vec![Box::new(primary), Box::new(backstop)]).unwrap()
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert!(matches!(FontChain::new(Vec::new()), Err(FontError::EmptyChain)));
    }

    #[test]
    fn primary_font_wins_when_it_covers() {
        let chain = chain();
        let (index, font, _) = chain.resolve('a').unwrap();
        assert_eq!(index, 0);
        assert_eq!(font.name(), "primary");
    }

    #[test]
    fn lookup_falls_through_to_later_fonts() {
        let chain = chain();
        let (index, font, _) = chain.resolve('x').unwrap();
        assert_eq!(index, 1);
        assert_eq!(font.name(), "backstop");
    }

    #[test]
    fn missing_character_reports_the_character() {
        let chain = chain();
        assert!(chain.resolve('Ω').is_none());
        assert!(matches!(
            chain.resolve_required('Ω'),
            Err(FontError::MissingGlyph('Ω'))
        ));
    }
}
