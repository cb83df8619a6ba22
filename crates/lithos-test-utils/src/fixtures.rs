//! Standard material catalogs.
//!
//! - [`two_material_catalog`]: air and one polymer, the brush case.
//! - [`three_material_catalog`]: air and two polymers, the pillar case.
//! - [`continuous_catalog`]: a start/end pair, rejected by every variant.

use lithos_core::{Material, MaterialCatalog};
use ndarray::Array3;

/// Permittivity of the first test polymer.
pub const POLYMER_A_PERMITTIVITY: f64 = 2.25;

/// Permittivity of the second test polymer.
pub const POLYMER_B_PERMITTIVITY: f64 = 4.0;

pub fn air() -> Material {
    Material::air()
}

pub fn polymer(permittivity: f64) -> Material {
    Material::new(permittivity)
}

/// Air at index 0, polymer (ε = 2.25) at index 1.
pub fn two_material_catalog() -> MaterialCatalog {
    // Inserted out of order on purpose: the catalog must sort itself.
    MaterialCatalog::discrete([
        ("polymer", polymer(POLYMER_A_PERMITTIVITY)),
        ("air", air()),
    ])
}

/// Air (0), polymer_a (1, ε = 2.25), polymer_b (2, ε = 4).
pub fn three_material_catalog() -> MaterialCatalog {
    MaterialCatalog::discrete([
        ("polymer_b", polymer(POLYMER_B_PERMITTIVITY)),
        ("air", air()),
        ("polymer_a", polymer(POLYMER_A_PERMITTIVITY)),
    ])
}

pub fn continuous_catalog() -> MaterialCatalog {
    MaterialCatalog::continuous(air(), polymer(POLYMER_A_PERMITTIVITY))
}

/// A `shape` design filled with `value`.
pub fn uniform_design(shape: [usize; 3], value: f32) -> Array3<f32> {
    Array3::from_elem(shape, value)
}
