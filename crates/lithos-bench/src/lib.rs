//! Benchmark profiles and utilities for the Lithos discretization engine.
//!
//! Provides pre-built modules and deterministic designs for benchmarks and
//! examples:
//!
//! - [`brush_profile`]: 64x64 two-material slice with a circular brush
//! - [`pillar_profile`]: 32x32x6 three-material pillar device along z
//! - [`closest_profile`]: 64x64x8 three-material per-voxel device
//! - [`reference_design`]: seeded design in the inverse-permittivity range

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lithos::prelude::*;
use lithos_test_utils::{random_design, three_material_catalog, two_material_catalog};
use ndarray::Array3;

/// Output descriptor with integer indices.
fn int_output(shape: [usize; 3]) -> ShapeDtype {
    ShapeDtype::new(shape, Dtype::Int32)
}

/// Bound brush-constraint module: 64x64 slice, flat along z, circular
/// brush of diameter 5.
pub fn brush_profile() -> Result<DiscretizationModule, DiscretizeError> {
    let variant = BrushConstraint2D::builder()
        .brush(Brush::circular(5.0, None)?)
        .axis(2)
        .build()?;
    Discretization::from(variant).init_module(
        &SimulationConfig::default(),
        &two_material_catalog(),
        int_output([64, 64, 1]),
    )
}

/// Bound pillar module: 32x32 columns of 6 layers along z, three
/// materials, single polymer runs.
pub fn pillar_profile() -> Result<DiscretizationModule, DiscretizeError> {
    let variant = PillarDiscretization::builder()
        .axis(2)
        .single_polymer_columns(true)
        .build()?;
    Discretization::from(variant).init_module(
        &SimulationConfig::default(),
        &three_material_catalog(),
        int_output([32, 32, 6]),
    )
}

/// Bound per-voxel module: 64x64x8, three materials.
pub fn closest_profile() -> Result<DiscretizationModule, DiscretizeError> {
    Discretization::from(ClosestIndex).init_module(
        &SimulationConfig::default(),
        &three_material_catalog(),
        int_output([64, 64, 8]),
    )
}

/// Deterministic design spanning the inverse permittivities of the
/// fixture catalogs (polymer B at 0.25 up to air at 1.0).
pub fn reference_design(shape: [usize; 3], seed: u64) -> Array3<f32> {
    random_design(shape, 0.25, 1.0, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_bind() {
        assert_eq!(brush_profile().unwrap().name(), "BrushConstraint2D");
        assert_eq!(pillar_profile().unwrap().output_shape_dtype().shape, [32, 32, 6]);
        assert_eq!(closest_profile().unwrap().allowed_values().len(), 3);
    }

    #[test]
    fn reference_design_is_deterministic() {
        assert_eq!(reference_design([4, 4, 2], 1), reference_design([4, 4, 2], 1));
    }
}
