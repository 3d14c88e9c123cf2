#![forbid(unsafe_code)]

//! Geometry and sizing primitives for the weft render tree.
//!
//! This crate holds the pure value types shared by layout and rendering:
//!
//! - [`Rect`], [`Size`], [`Sides`] - cell-grid geometry
//! - [`Constraints`] - the min/max envelope passed down during measurement
//! - [`SizeHint`] - per-slot sizing policy (Fixed / Content / Fill)
//! - [`resolve_axis`] - the one-dimensional slot resolver shared by stacks
//!   and the grid
//!
//! Nothing here depends on the render tree or the terminal; everything is
//! plain data with structural equality.

pub mod geometry;
pub mod hint;

pub use geometry::{Constraints, Rect, Sides, Size};
pub use hint::{Alignment, SizeHint, offsets, resolve_axis};
