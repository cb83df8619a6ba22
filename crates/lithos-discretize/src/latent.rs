//! Affine latent transforms in front of a discretization.
//!
//! Optimizers work on parameters in a standard `[0, 1]` range; these
//! transforms map them to the range a discretization expects. Every
//! transform is `x * scale + offset` and keeps shapes, so its backward pass
//! is a multiplication by `scale`.

use lithos_core::{DiscretizeError, MaterialCatalog, SimulationConfig};
use ndarray::{ArrayD, ArrayViewD};

use crate::input::DesignInput;
use crate::shape::{check_shape_dtype, CheckMethod, ExpectedShapes};

/// A same-shape affine latent transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LatentTransform {
    /// `[0, 1]` onto `[min 1/ε, max 1/ε]` of the catalog. Continuous
    /// catalogs use their two endpoints.
    StandardToInversePermittivityRange,
    /// `[0, 1]` onto `[min_value, max_value]`.
    StandardToCustomRange {
        /// Image of 0.
        min_value: f32,
        /// Image of 1.
        max_value: f32,
    },
    /// `[0, 1]` onto `[-1, 1]`.
    StandardToPlusOneMinusOneRange,
}

impl LatentTransform {
    /// [`LatentTransform::StandardToCustomRange`] with the default `[0, 1]`.
    pub fn custom_range_default() -> Self {
        Self::StandardToCustomRange {
            min_value: 0.0,
            max_value: 1.0,
        }
    }

    /// Transform name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StandardToInversePermittivityRange => "StandardToInversePermittivityRange",
            Self::StandardToCustomRange { .. } => "StandardToCustomRange",
            Self::StandardToPlusOneMinusOneRange => "StandardToPlusOneMinusOneRange",
        }
    }

    /// Bind to a run. Input shapes equal `output`.
    pub fn init_module(
        &self,
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ExpectedShapes,
    ) -> Result<LatentModule, DiscretizeError> {
        config.validate()?;
        let (lo, hi) = match *self {
            Self::StandardToInversePermittivityRange => {
                let (lo, hi) = catalog.inverse_permittivity_bounds()?;
                (lo as f32, hi as f32)
            }
            Self::StandardToCustomRange {
                min_value,
                max_value,
            } => (min_value, max_value),
            Self::StandardToPlusOneMinusOneRange => (-1.0, 1.0),
        };
        Ok(LatentModule {
            transform: *self,
            scale: hi - lo,
            offset: lo,
            shapes: output,
        })
    }
}

/// A bound [`LatentTransform`].
#[derive(Clone, Debug, PartialEq)]
pub struct LatentModule {
    transform: LatentTransform,
    scale: f32,
    offset: f32,
    shapes: ExpectedShapes,
}

impl LatentModule {
    /// The unbound transform.
    pub fn transform(&self) -> &LatentTransform {
        &self.transform
    }

    /// Multiplicative factor, also the derivative.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Additive offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Declared input shapes, identical to the output shapes.
    pub fn input_shapes(&self) -> &ExpectedShapes {
        &self.shapes
    }

    /// Map every tensor of `input`.
    pub fn apply(&self, input: DesignInput) -> Result<DesignInput, DiscretizeError> {
        check_shape_dtype(&input, input.dtype(), &self.shapes, CheckMethod::Exact)?;
        let (scale, offset) = (self.scale, self.offset);
        Ok(input.map(|a| a.mapv_into(|v| v * scale + offset)))
    }

    /// Cotangent of the input for a cotangent of the output.
    pub fn backward(&self, cotangent: ArrayViewD<'_, f32>) -> ArrayD<f32> {
        let scale = self.scale;
        cotangent.mapv(|g| g * scale)
    }
}
