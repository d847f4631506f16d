//! Math Model Crate - Arena-based formula trees
//!
//! Formulas are stored as flat arenas of tagged nodes. Each construct (run,
//! fraction, radical, scripts, accent, under/over, array) names its children
//! through component slots rather than owning them, which keeps structural
//! edits, dirty propagation, and layout caching in one place:
//! - `NodeArena` / `NodeId`: flat storage with parent links and dirty flags
//! - `MathNodeKind`: the tagged union of constructs
//! - `ComponentSlot`: names for child positions (numerator, radicand, ...)
//! - `ArraySubtype` / `DelimiterPair`: grid environments and their policies

pub mod arena;
pub mod array;
pub mod error;
pub mod node;

pub use arena::{NodeArena, NodeId};
pub use array::{ArraySubtype, CellAlignment, DelimiterPair};
pub use error::{ModelError, ModelResult};
pub use node::{ComponentSlot, FractionSubtype, MathNodeKind, UnderOverSubtype};
