//! Lithos: fabrication-constrained discretization of continuous device
//! designs.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Lithos sub-crates. For most users, adding `lithos` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lithos::prelude::*;
//! use lithos::ndarray::Array3;
//!
//! let catalog = MaterialCatalog::discrete([
//!     ("air", Material::air()),
//!     ("polymer", Material::new(2.25)),
//! ]);
//!
//! // Pillars along z: three layers, no trapped air, one polymer run.
//! let variant: Discretization = PillarDiscretization::builder()
//!     .axis(2)
//!     .single_polymer_columns(true)
//!     .build()?
//!     .into();
//! let module = variant.init_module(
//!     &SimulationConfig::default(),
//!     &catalog,
//!     ShapeDtype::new([4, 4, 3], Dtype::Int32),
//! )?;
//!
//! let design = Array3::<f32>::from_elem((4, 4, 3), 0.5);
//! let result = module.discretize(&design.into())?;
//! assert_eq!(result.value.dim(), (4, 4, 3));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lithos-core` | Errors, dtypes, configuration, materials |
//! | [`morph`] | `lithos-morph` | Brushes, dilation, the brush-constraint solver |
//! | [`columns`] | `lithos-columns` | Allowed-column enumeration, nearest-value search |
//! | [`discretize`] | `lithos-discretize` | Variants, gradient bridge, latent transforms |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`lithos-core`).
///
/// Contains the error taxonomy, [`types::ShapeDtype`],
/// [`types::SimulationConfig`] and the [`types::MaterialCatalog`].
pub use lithos_core as types;

/// Brush morphology (`lithos-morph`).
///
/// [`morph::Brush`], [`morph::dilate()`] and the [`morph::BrushSolver`].
pub use lithos_morph as morph;

/// Column rules for pillar designs (`lithos-columns`).
///
/// [`columns::compute_allowed_indices`] and [`columns::nearest_index`].
pub use lithos_columns as columns;

/// Discretization variants and the gradient bridge (`lithos-discretize`).
pub use lithos_discretize as discretize;

/// The n-dimensional array crate used for every tensor.
pub use ndarray;

/// Common imports for typical Lithos usage.
///
/// ```rust
/// use lithos::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use lithos_core::{Dtype, Material, MaterialCatalog, ShapeDtype, SimulationConfig, SolverConfig};

    // Errors
    pub use lithos_core::{ConfigError, DiscretizeError, ShapeError, SolverError, UsageError};

    // Morphology
    pub use lithos_morph::{Brush, BrushSolver};

    // Columns
    pub use lithos_columns::{DistanceMetric, MetricWeights};

    // Discretization
    pub use lithos_discretize::{
        BackwardRule, Bridged, BrushConstraint2D, ClosestIndex, DesignInput, Discretization,
        DiscretizationModule, LatentTransform, ParameterPipeline, PillarDiscretization,
    };
}
