//! Core types for the Lithos discretization engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! error taxonomy shared by every Lithos crate, the dtype/shape descriptors
//! exchanged with the optimization driver, the simulation configuration,
//! and the material catalog adapter that turns named materials into the
//! ordered table of allowed inverse permittivities.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dtype;
pub mod error;
pub mod material;

pub use config::{SimulationConfig, SolverConfig};
pub use dtype::{Dtype, ShapeDtype};
pub use error::{ConfigError, DiscretizeError, ShapeError, SolverError, UsageError};
pub use material::{Material, MaterialCatalog};
