//! Column-wise fabrication rules for pillar-style designs.
//!
//! Along a structural axis a design is a stack of layers. [`enumerate`]
//! lists every layer sequence that is fabrication-valid (no trapped air,
//! optionally a single run per polymer), and [`nearest`] picks, for every
//! position, the allowed index or sequence closest to the continuous
//! design under a [`DistanceMetric`]. [`layout`] holds the axis
//! permutations that move the constrained axis last and back.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod enumerate;
pub mod layout;
pub mod nearest;

pub use enumerate::{compute_allowed_indices, AllowedIndexTable};
pub use layout::{move_axis_last, restore_axis_order};
pub use nearest::{
    gather_columns, nearest_index, nearest_voxel_index, DistanceMetric, MetricWeights, Nearest,
};
