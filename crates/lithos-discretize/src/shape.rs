//! Structural, shape and dtype checks of a design input.

use indexmap::IndexMap;
use lithos_core::{DiscretizeError, Dtype, ShapeDtype, ShapeError, UsageError};

use crate::input::DesignInput;

/// Declared shapes a design input is checked against.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpectedShapes {
    /// One tensor.
    Single(ShapeDtype),
    /// Named tensors.
    Named(IndexMap<String, ShapeDtype>),
}

/// How strictly named inputs are compared with named declarations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckMethod {
    /// Same number of entries, every entry declared.
    #[default]
    Exact,
    /// Only the supplied entries are checked; missing ones are allowed.
    ArraysOnly,
}

fn check_one(
    name: &str,
    shape: &[usize],
    dtype: Dtype,
    expected: &ShapeDtype,
) -> Result<(), ShapeError> {
    if shape != expected.shape {
        return Err(ShapeError::Mismatch {
            name: name.to_string(),
            expected: expected.shape.to_vec(),
            got: shape.to_vec(),
        });
    }
    if dtype != expected.dtype {
        return Err(ShapeError::DtypeMismatch {
            expected: expected.dtype,
            got: dtype,
        });
    }
    Ok(())
}

/// Check `input`, whose tensors hold values of precision `dtype`, against
/// `expected`.
///
/// # Errors
///
/// [`UsageError`] when the structures disagree (single against named, a
/// differing entry count under [`CheckMethod::Exact`], an undeclared name),
/// [`ShapeError`] when a shape or the dtype differs.
pub fn check_shape_dtype(
    input: &DesignInput,
    dtype: Dtype,
    expected: &ExpectedShapes,
    method: CheckMethod,
) -> Result<(), DiscretizeError> {
    match (input, expected) {
        (DesignInput::Single(a), ExpectedShapes::Single(sd)) => {
            check_one("input", a.shape(), dtype, sd)?;
        }
        (DesignInput::Named(map), ExpectedShapes::Named(declared)) => {
            if method == CheckMethod::Exact && map.len() != declared.len() {
                return Err(UsageError::StructureMismatch {
                    reason: format!(
                        "expected {} named inputs, got {}",
                        declared.len(),
                        map.len()
                    ),
                }
                .into());
            }
            for (name, a) in map {
                let sd = declared
                    .get(name)
                    .ok_or_else(|| UsageError::MissingInput { name: name.clone() })?;
                check_one(name, a.shape(), dtype, sd)?;
            }
        }
        (DesignInput::Single(_), ExpectedShapes::Named(_)) => {
            return Err(UsageError::StructureMismatch {
                reason: "single tensor given where named tensors are declared".to_string(),
            }
            .into());
        }
        (DesignInput::Named(_), ExpectedShapes::Single(_)) => {
            return Err(UsageError::StructureMismatch {
                reason: "named tensors given where a single tensor is declared".to_string(),
            }
            .into());
        }
    }
    Ok(())
}
