//! Brush morphology for fabrication-constrained discretization.
//!
//! A [`Brush`] is the structuring element that encodes the minimum feature
//! size. [`dilate()`] is the single primitive every higher algorithm is built
//! from; [`BrushSolver`] runs the brush-constraint fixed point that turns a
//! continuous 2D slice into a solid/void mask in which every solid and
//! every void pixel is covered by a whole brush placement.
//!
//! All operations use zero padding: positions outside the slice never
//! contribute to a dilation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod brush;
pub mod dilate;
pub mod solver;

pub use brush::Brush;
pub use dilate::{dilate, erode, touching};
pub use solver::{BrushSolver, SolveStats, Solution};
