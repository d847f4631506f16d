//! Math Classes - Atom categories and limit placement
//!
//! Every fragment carries a class drawn from the Unicode math classification,
//! which drives inter-atom spacing and `Vary` sign resolution (binary minus
//! vs. unary minus). Large operators additionally carry a limit-placement
//! policy.

use crate::style::MathStyle;
use serde::{Deserialize, Serialize};

// =============================================================================
// Math Class
// =============================================================================

/// Atom category of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathClass {
    Normal,
    /// Letters and digits; spaced like Normal but eligible for text-like
    /// treatment
    Alphabetic,
    Binary,
    Relation,
    Opening,
    Closing,
    Punctuation,
    /// Delimiters that may stretch: parens, brackets, vertical bars
    Fence,
    /// Large operators: sums, products, integrals
    Large,
    /// Signs that are binary or unary depending on context (+, -, ±)
    Vary,
    Space,
    /// Characters with bespoke spacing (ellipses, differential d)
    Special,
}

/// Glyphs whose Unicode class is overridden for typesetting purposes
const CLASS_OVERRIDES: &[(char, MathClass)] = &[
    // The colon is a relation in math context, not punctuation
    (':', MathClass::Relation),
    ('\u{22EF}', MathClass::Special), // midline ellipsis
    ('\u{2026}', MathClass::Special), // horizontal ellipsis
];

/// Classify a character, falling back to `Normal` when the Unicode tables
/// have no entry
pub fn class_of(ch: char) -> MathClass {
    if let Some((_, class)) = CLASS_OVERRIDES.iter().find(|(c, _)| *c == ch) {
        return *class;
    }
    match unicode_math_class::class(ch) {
        Some(unicode_math_class::MathClass::Alphabetic) => MathClass::Alphabetic,
        Some(unicode_math_class::MathClass::Binary) => MathClass::Binary,
        Some(unicode_math_class::MathClass::Closing) => MathClass::Closing,
        Some(unicode_math_class::MathClass::Fence) => MathClass::Fence,
        Some(unicode_math_class::MathClass::Large) => MathClass::Large,
        Some(unicode_math_class::MathClass::Opening) => MathClass::Opening,
        Some(unicode_math_class::MathClass::Punctuation) => MathClass::Punctuation,
        Some(unicode_math_class::MathClass::Relation) => MathClass::Relation,
        Some(unicode_math_class::MathClass::Space) => MathClass::Space,
        Some(unicode_math_class::MathClass::Special) => MathClass::Special,
        Some(unicode_math_class::MathClass::Vary) => MathClass::Vary,
        Some(unicode_math_class::MathClass::Normal)
        | Some(unicode_math_class::MathClass::Diacritic)
        | Some(unicode_math_class::MathClass::GlyphPart)
        | Some(unicode_math_class::MathClass::Unary)
        | None => MathClass::Normal,
    }
}

/// Resolve `Vary` atoms against their neighbors: a sign is binary between
/// two operands and ordinary (unary) elsewhere. Other classes pass through.
pub fn resolve_running_classes(classes: &[MathClass]) -> Vec<MathClass> {
    let mut resolved = Vec::with_capacity(classes.len());
    for (i, &class) in classes.iter().enumerate() {
        if class != MathClass::Vary {
            resolved.push(class);
            continue;
        }
        let unary_before = match resolved.last() {
            None => true,
            Some(prev) => matches!(
                prev,
                MathClass::Binary
                    | MathClass::Large
                    | MathClass::Relation
                    | MathClass::Opening
                    | MathClass::Punctuation
                    | MathClass::Space
            ),
        };
        let unary_after = match classes.get(i + 1) {
            None => true,
            Some(next) => matches!(
                next,
                MathClass::Relation | MathClass::Closing | MathClass::Punctuation
            ),
        };
        resolved.push(if unary_before || unary_after {
            MathClass::Normal
        } else {
            MathClass::Binary
        });
    }
    resolved
}

// =============================================================================
// Limits
// =============================================================================

/// When attached scripts render as limits (above/below) rather than to the
/// side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limits {
    Never,
    /// Limits in display style only (sums, products)
    Display,
    Always,
}

impl Limits {
    /// Convention default for a glyph of the given class
    pub fn default_for(class: MathClass, ch: char) -> Self {
        match class {
            // Integrals keep side scripts even in display style
            MathClass::Large => {
                if ('\u{222B}'..='\u{2233}').contains(&ch) {
                    Limits::Never
                } else {
                    Limits::Display
                }
            }
            _ => Limits::Never,
        }
    }

    pub fn is_active(&self, style: MathStyle) -> bool {
        match self {
            Limits::Never => false,
            Limits::Display => style.is_display(),
            Limits::Always => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_basics() {
        assert_eq!(class_of('a'), MathClass::Alphabetic);
        assert_eq!(class_of('+'), MathClass::Vary);
        assert_eq!(class_of('='), MathClass::Relation);
        assert_eq!(class_of('('), MathClass::Opening);
        assert_eq!(class_of(')'), MathClass::Closing);
        assert_eq!(class_of(','), MathClass::Punctuation);
        assert_eq!(class_of('\u{2211}'), MathClass::Large);
        assert_eq!(class_of(':'), MathClass::Relation);
    }

    #[test]
    fn unknown_characters_are_normal() {
        assert_eq!(class_of('\u{E000}'), MathClass::Normal);
    }

    #[test]
    fn vary_between_operands_is_binary() {
        use MathClass::*;
        let classes = [Alphabetic, Vary, Alphabetic];
        assert_eq!(resolve_running_classes(&classes), vec![Alphabetic, Binary, Alphabetic]);
    }

    #[test]
    fn leading_and_trailing_vary_are_unary() {
        use MathClass::*;
        assert_eq!(
            resolve_running_classes(&[Vary, Alphabetic]),
            vec![Normal, Alphabetic]
        );
        assert_eq!(
            resolve_running_classes(&[Alphabetic, Vary]),
            vec![Alphabetic, Normal]
        );
    }

    #[test]
    fn vary_after_relation_is_unary() {
        use MathClass::*;
        // x = -y
        let classes = [Alphabetic, Relation, Vary, Alphabetic];
        assert_eq!(
            resolve_running_classes(&classes),
            vec![Alphabetic, Relation, Normal, Alphabetic]
        );
    }

    #[test]
    fn vary_after_space_is_unary() {
        use MathClass::*;
        let classes = [Alphabetic, Space, Vary, Alphabetic];
        assert_eq!(
            resolve_running_classes(&classes),
            vec![Alphabetic, Space, Normal, Alphabetic]
        );
    }

    #[test]
    fn limit_defaults() {
        assert_eq!(
            Limits::default_for(MathClass::Large, '\u{2211}'),
            Limits::Display
        );
        assert_eq!(
            Limits::default_for(MathClass::Large, '\u{222B}'),
            Limits::Never
        );
        assert_eq!(
            Limits::default_for(MathClass::Alphabetic, 'x'),
            Limits::Never
        );
    }

    #[test]
    fn limit_activation_by_style() {
        assert!(Limits::Display.is_active(MathStyle::Display));
        assert!(!Limits::Display.is_active(MathStyle::Text));
        assert!(Limits::Always.is_active(MathStyle::ScriptScript));
        assert!(!Limits::Never.is_active(MathStyle::Display));
    }
}
