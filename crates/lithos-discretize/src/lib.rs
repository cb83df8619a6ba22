//! Discretization of continuous device designs into material indices.
//!
//! A design is optimized as a continuous tensor; before every simulation
//! step it is mapped to an integer material-index tensor by one of three
//! [`Discretization`] variants:
//!
//! - [`ClosestIndex`]: per-voxel nearest allowed value.
//! - [`BrushConstraint2D`]: a 2D slice solved by the brush-constraint fixed
//!   point, guaranteeing a minimum feature size.
//! - [`PillarDiscretization`]: per-column nearest fabrication-valid layer
//!   sequence.
//!
//! Variants are configured, then bound to a run with
//! [`Discretization::init_module`], which returns the only type that can
//! [`discretize`](DiscretizationModule::discretize). Every output carries a
//! [`StraightThroughEstimator`] whose vector-Jacobian product is the
//! identity, so outer gradient-based optimizers see the discretization as
//! a pass-through.
//!
//! [`LatentTransform`]s and the [`ParameterPipeline`] reproduce the
//! parameter chain in front of the discretization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod brush2d;
pub mod closest;
pub mod discretization;
pub mod gradient;
pub mod input;
pub mod latent;
pub mod pipeline;
pub mod pillar;
pub mod shape;

pub use brush2d::{BrushConstraint2D, BrushConstraint2DBuilder, BrushConstraint2DModule};
pub use closest::{ClosestIndex, ClosestIndexModule};
pub use discretization::{Discretization, DiscretizationModule};
pub use gradient::{straight_through_estimator, BackwardRule, Bridged, StraightThroughEstimator};
pub use input::DesignInput;
pub use latent::{LatentModule, LatentTransform};
pub use pillar::{PillarDiscretization, PillarDiscretizationBuilder, PillarModule};
pub use pipeline::ParameterPipeline;
pub use shape::{check_shape_dtype, CheckMethod, ExpectedShapes};
