//! Test fixtures for Lithos development.
//!
//! [`fixtures`] builds the standard material catalogs used across the
//! crate tests; [`random`] produces seeded design fields so property and
//! benchmark inputs are reproducible.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod random;

pub use fixtures::{
    air, continuous_catalog, polymer, three_material_catalog, two_material_catalog,
    uniform_design, POLYMER_A_PERMITTIVITY, POLYMER_B_PERMITTIVITY,
};
pub use random::{random_design, random_field, random_named_design};
