//! Straight-through gradient bridge.
//!
//! Discretization is piecewise constant, so its true derivative is zero
//! almost everywhere. The straight-through estimator instead reports the
//! identity: the forward value is the discrete result and the
//! vector-Jacobian product returns the cotangent unchanged. The identity
//! is exact; no smoothing or scaling is applied.
//!
//! [`BackwardRule`] is the seam through which a host automatic
//! differentiation system registers the rule for a discretization output.

use lithos_core::ShapeError;
use ndarray::{Array3, ArrayD, ArrayView3, ArrayViewD};

/// A custom vector-Jacobian product attached to a forward result.
pub trait BackwardRule {
    /// Human-readable rule name for logs and graph dumps.
    fn name(&self) -> &'static str;

    /// Shape of the forward input the rule differentiates with respect to.
    fn input_shape(&self) -> &[usize];

    /// Map a cotangent of the output to a cotangent of the input.
    fn vjp(&self, cotangent: ArrayViewD<'_, f32>) -> Result<ArrayD<f32>, ShapeError>;
}

/// Identity vector-Jacobian product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StraightThroughEstimator {
    input_shape: Vec<usize>,
}

impl StraightThroughEstimator {
    /// Rule for a forward input of `input_shape`.
    pub fn new(input_shape: &[usize]) -> Self {
        Self {
            input_shape: input_shape.to_vec(),
        }
    }
}

impl BackwardRule for StraightThroughEstimator {
    fn name(&self) -> &'static str {
        "straight_through_estimator"
    }

    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn vjp(&self, cotangent: ArrayViewD<'_, f32>) -> Result<ArrayD<f32>, ShapeError> {
        if cotangent.shape() != self.input_shape.as_slice() {
            return Err(ShapeError::Mismatch {
                name: "cotangent".to_string(),
                expected: self.input_shape.clone(),
                got: cotangent.shape().to_vec(),
            });
        }
        Ok(cotangent.to_owned())
    }
}

/// A forward value with its backward rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Bridged<T> {
    /// The discrete forward result.
    pub value: T,
    /// The rule reporting its derivative.
    pub rule: StraightThroughEstimator,
}

impl<T> Bridged<T> {
    /// Drop the rule and keep the forward value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Cotangent of the input for a cotangent of the output.
    pub fn backward(&self, cotangent: ArrayViewD<'_, f32>) -> Result<ArrayD<f32>, ShapeError> {
        self.rule.vjp(cotangent)
    }
}

/// Attach the identity backward rule of `input` to `discrete`.
///
/// # Errors
///
/// [`ShapeError::Mismatch`] if the two shapes differ.
pub fn straight_through_estimator(
    input: ArrayView3<'_, f32>,
    discrete: Array3<u32>,
) -> Result<Bridged<Array3<u32>>, ShapeError> {
    if input.shape() != discrete.shape() {
        return Err(ShapeError::Mismatch {
            name: "discrete output".to_string(),
            expected: input.shape().to_vec(),
            got: discrete.shape().to_vec(),
        });
    }
    Ok(Bridged {
        value: discrete,
        rule: StraightThroughEstimator::new(input.shape()),
    })
}
