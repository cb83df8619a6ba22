//! Error types for the Lithos discretization engine.
//!
//! Organized by concern: configuration (catalog and parameter problems),
//! shape (rank and size violations), usage (wrong input structure for a
//! variant), and solver (internal-invariant violations of the brush fixed
//! point). [`DiscretizeError`] wraps all four and is what the public
//! discretization entry points return.

use std::error::Error;
use std::fmt;

use crate::dtype::Dtype;

/// Invalid or unsupported configuration, detected at initialization or
/// at the point a variant first needs the offending property.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The material catalog contains no materials.
    EmptyCatalog,
    /// No material in the catalog qualifies as air.
    NoAirMaterial,
    /// A material has non-physical properties.
    InvalidMaterial {
        /// Catalog name of the material.
        name: String,
        /// Which property is invalid.
        reason: String,
    },
    /// A discretization variant does not support this many materials.
    UnsupportedMaterialCount {
        /// Name of the variant.
        variant: &'static str,
        /// Human-readable description of the supported count.
        expected: &'static str,
        /// Number of materials in the catalog.
        got: usize,
    },
    /// A discretization variant was given a continuous material range.
    ContinuousCatalog {
        /// Name of the variant.
        variant: &'static str,
    },
    /// The brush (structuring element) is unusable.
    InvalidBrush {
        /// Why the brush was rejected.
        reason: String,
    },
    /// The constrained axis is not one of 0, 1, 2.
    InvalidAxis {
        /// The offending axis.
        axis: usize,
    },
    /// The output descriptor names a non-integer dtype.
    InvalidOutputDtype {
        /// The offending dtype.
        dtype: Dtype,
    },
    /// Any other out-of-range parameter.
    InvalidParameter {
        /// Description of the violated constraint.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "material catalog is empty"),
            Self::NoAirMaterial => write!(f, "no air material in catalog"),
            Self::InvalidMaterial { name, reason } => {
                write!(f, "invalid material '{name}': {reason}")
            }
            Self::UnsupportedMaterialCount {
                variant,
                expected,
                got,
            } => write!(f, "{variant} supports {expected} materials, got {got}"),
            Self::ContinuousCatalog { variant } => {
                write!(f, "{variant} requires a discrete material catalog")
            }
            Self::InvalidBrush { reason } => write!(f, "invalid brush: {reason}"),
            Self::InvalidAxis { axis } => write!(f, "axis must be 0, 1 or 2, got {axis}"),
            Self::InvalidOutputDtype { dtype } => {
                write!(f, "output dtype must be an integer type, got {dtype}")
            }
            Self::InvalidParameter { reason } => write!(f, "invalid parameter: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Rank, size, or dtype violations of a tensor argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// The tensor has the wrong number of dimensions.
    WrongRank {
        /// Required rank.
        expected: usize,
        /// Actual rank.
        got: usize,
    },
    /// A single axis has the wrong extent.
    AxisSize {
        /// The axis being checked.
        axis: usize,
        /// Required extent.
        expected: usize,
        /// Actual extent.
        got: usize,
    },
    /// The full shape differs from the declared shape.
    Mismatch {
        /// Which tensor was checked (`"input"`, `"cotangent"`, a latent key, ...).
        name: String,
        /// Declared shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },
    /// Two arguments cannot be combined (e.g. a value column and an
    /// allowed-index table of a different length).
    Incompatible {
        /// Description of the incompatibility.
        reason: String,
    },
    /// The tensor dtype differs from the declared dtype.
    DtypeMismatch {
        /// Declared dtype.
        expected: Dtype,
        /// Actual dtype.
        got: Dtype,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongRank { expected, got } => {
                write!(f, "expected rank {expected}, got rank {got}")
            }
            Self::AxisSize {
                axis,
                expected,
                got,
            } => write!(f, "axis {axis} must have size {expected}, got {got}"),
            Self::Mismatch {
                name,
                expected,
                got,
            } => write!(f, "{name} shape mismatch: expected {expected:?}, got {got:?}"),
            Self::Incompatible { reason } => write!(f, "incompatible shapes: {reason}"),
            Self::DtypeMismatch { expected, got } => {
                write!(f, "dtype mismatch: expected {expected}, got {got}")
            }
        }
    }
}

impl Error for ShapeError {}

/// The caller passed an input structure the variant cannot interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageError {
    /// A single-tensor variant received a name-keyed set of tensors.
    MultipleInputs {
        /// Name of the variant.
        variant: &'static str,
        /// Number of named tensors supplied.
        count: usize,
    },
    /// Single tensor supplied where named tensors were declared, or the
    /// reverse, or the key sets differ in size.
    StructureMismatch {
        /// Description of the mismatch.
        reason: String,
    },
    /// A named tensor has no declared counterpart.
    MissingInput {
        /// The unknown key.
        name: String,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleInputs { variant, count } => write!(
                f,
                "{variant} cannot be used with latent parameters that contain multiple entries ({count} given)"
            ),
            Self::StructureMismatch { reason } => write!(f, "input structure mismatch: {reason}"),
            Self::MissingInput { name } => write!(f, "no declared shape for input '{name}'"),
        }
    }
}

impl Error for UsageError {}

/// Fatal violations of the brush-constraint fixed point.
///
/// Neither is recoverable: they indicate a malformed brush or a
/// floating-point degenerate input that broke the termination argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// The fixed point did not terminate within the iteration bound.
    IterationLimit {
        /// The bound that was exceeded.
        limit: usize,
    },
    /// Unresolved pixels remain but no candidate touch is valid.
    Stalled {
        /// Iteration at which progress stopped.
        iteration: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IterationLimit { limit } => {
                write!(f, "brush solver did not converge within {limit} iterations")
            }
            Self::Stalled { iteration } => write!(
                f,
                "brush solver stalled at iteration {iteration}: unresolved pixels but no valid touch"
            ),
        }
    }
}

impl Error for SolverError {}

/// Any failure of a discretization call.
#[derive(Clone, Debug, PartialEq)]
pub enum DiscretizeError {
    /// Invalid configuration.
    Config(ConfigError),
    /// Invalid tensor shape.
    Shape(ShapeError),
    /// Invalid input structure.
    Usage(UsageError),
    /// Brush solver invariant violation.
    Solver(SolverError),
}

impl fmt::Display for DiscretizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration: {e}"),
            Self::Shape(e) => write!(f, "shape: {e}"),
            Self::Usage(e) => write!(f, "usage: {e}"),
            Self::Solver(e) => write!(f, "solver: {e}"),
        }
    }
}

impl Error for DiscretizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Shape(e) => Some(e),
            Self::Usage(e) => Some(e),
            Self::Solver(e) => Some(e),
        }
    }
}

impl From<ConfigError> for DiscretizeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ShapeError> for DiscretizeError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<UsageError> for DiscretizeError {
    fn from(e: UsageError) -> Self {
        Self::Usage(e)
    }
}

impl From<SolverError> for DiscretizeError {
    fn from(e: SolverError) -> Self {
        Self::Solver(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_inputs_display_names_variant() {
        let err = UsageError::MultipleInputs {
            variant: "ClosestIndex",
            count: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ClosestIndex"));
        assert!(msg.contains("multiple entries"));
    }

    #[test]
    fn discretize_error_exposes_source() {
        let err = DiscretizeError::from(SolverError::IterationLimit { limit: 10 });
        let source = err.source().expect("wrapped error has a source");
        assert!(format!("{source}").contains("10 iterations"));
    }

    #[test]
    fn shape_mismatch_display_lists_both_shapes() {
        let err = ShapeError::Mismatch {
            name: "input".to_string(),
            expected: vec![4, 4, 1],
            got: vec![4, 4, 2],
        };
        assert_eq!(
            format!("{err}"),
            "input shape mismatch: expected [4, 4, 1], got [4, 4, 2]"
        );
    }

    #[test]
    fn config_error_converts_into_umbrella() {
        let err: DiscretizeError = ConfigError::NoAirMaterial.into();
        assert_eq!(err, DiscretizeError::Config(ConfigError::NoAirMaterial));
    }
}
