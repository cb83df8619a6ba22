//! Dtype and shape descriptors exchanged with the optimization driver.

use std::fmt;

use crate::error::{ConfigError, ShapeError};

/// Element type of a tensor crossing the engine boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dtype {
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
}

impl Dtype {
    /// Whether this is a floating-point dtype.
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether this is an integer dtype.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }

    /// Round `value` to the precision of this dtype.
    ///
    /// `Float32` rounds through `f32`; every other dtype returns the value
    /// unchanged (integer dtypes never hold material values).
    pub fn round(self, value: f64) -> f64 {
        match self {
            Self::Float32 => value as f32 as f64,
            Self::Float64 | Self::Int32 | Self::Int64 => value,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
        };
        f.write_str(name)
    }
}

/// Shape and dtype of a 3D voxel tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeDtype {
    /// Extent along x, y, z.
    pub shape: [usize; 3],
    /// Element type.
    pub dtype: Dtype,
}

impl ShapeDtype {
    /// Create a descriptor.
    pub fn new(shape: [usize; 3], dtype: Dtype) -> Self {
        Self { shape, dtype }
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether any extent is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate this descriptor as a discretization *output*.
    ///
    /// Outputs are material-index tensors: the dtype must be an integer
    /// type and every extent must be non-zero.
    pub fn validate_output(&self) -> Result<(), ConfigError> {
        if !self.dtype.is_integer() {
            return Err(ConfigError::InvalidOutputDtype { dtype: self.dtype });
        }
        if self.is_empty() {
            return Err(ConfigError::InvalidParameter {
                reason: format!("output shape {:?} has a zero extent", self.shape),
            });
        }
        Ok(())
    }

    /// Check that `shape` equals the declared shape.
    pub fn check_shape(&self, name: &str, shape: &[usize]) -> Result<(), ShapeError> {
        if shape.len() != 3 {
            return Err(ShapeError::WrongRank {
                expected: 3,
                got: shape.len(),
            });
        }
        if shape != self.shape {
            return Err(ShapeError::Mismatch {
                name: name.to_string(),
                expected: self.shape.to_vec(),
                got: shape.to_vec(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float32_round_loses_precision() {
        let v = 1.0 / 2.4;
        assert_ne!(Dtype::Float32.round(v), v);
        assert_eq!(Dtype::Float64.round(v), v);
        assert_eq!(Dtype::Float32.round(v), (v as f32) as f64);
    }

    #[test]
    fn validate_output_rejects_float_dtype() {
        let sd = ShapeDtype::new([2, 2, 2], Dtype::Float32);
        match sd.validate_output() {
            Err(ConfigError::InvalidOutputDtype { dtype }) => assert_eq!(dtype, Dtype::Float32),
            other => panic!("expected InvalidOutputDtype, got {other:?}"),
        }
    }

    #[test]
    fn validate_output_rejects_zero_extent() {
        let sd = ShapeDtype::new([2, 0, 2], Dtype::Int32);
        assert!(matches!(
            sd.validate_output(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn check_shape_reports_rank_before_mismatch() {
        let sd = ShapeDtype::new([2, 3, 4], Dtype::Float32);
        assert_eq!(
            sd.check_shape("input", &[2, 3]),
            Err(ShapeError::WrongRank {
                expected: 3,
                got: 2
            })
        );
        assert!(matches!(
            sd.check_shape("input", &[2, 3, 5]),
            Err(ShapeError::Mismatch { .. })
        ));
        assert!(sd.check_shape("input", &[2, 3, 4]).is_ok());
    }
}
