//! Construct Layout - Per-construct typesetting rules
//!
//! Each module turns already-laid-out component fragments into the frame of
//! one construct. The rules come from the OpenType MATH constants carried by
//! the primary font, with em-based tunables for the gaps the table does not
//! cover.

pub mod accent;
pub mod array;
pub mod attach;
pub mod fraction;
pub mod list;
pub mod radical;
pub mod under_over;
