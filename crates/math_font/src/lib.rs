//! Math Font Crate - Font metrics boundary for math layout
//!
//! This crate defines the capability the layout engine queries for glyph
//! metrics, without owning any font machinery itself:
//! - The `MathFont` trait: per-glyph box metrics, italics correction, accent
//!   attachment, extended-shape flag, pre-built size variants, and assembly
//!   parts for glyph stretching
//! - The OpenType MATH constants block (`MathConstants`), with point-based
//!   defaults for fonts that carry no MATH table
//! - `StaticMathFont`, a deterministic in-memory backend used by tests and
//!   embeddable hosts
//! - `FontChain`, the ordered fallback chain consulted when a character is
//!   missing from the active font

pub mod constants;
pub mod error;
pub mod fallback;
pub mod font;
pub mod static_font;
pub mod units;

pub use constants::MathConstants;
pub use error::{FontError, FontResult};
pub use fallback::FontChain;
pub use font::{Assembly, BoxMetrics, GlyphId, GlyphPart, MathFont, SizeVariant, StretchAxis};
pub use static_font::{StaticMathFont, StaticPart};
pub use units::Em;
