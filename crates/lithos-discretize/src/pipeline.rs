//! Latent transforms followed by one discretization.

use lithos_core::{DiscretizeError, MaterialCatalog, ShapeDtype, SimulationConfig};
use ndarray::{Array3, ArrayD, ArrayView3};
use tracing::debug;

use crate::discretization::{Discretization, DiscretizationModule};
use crate::gradient::Bridged;
use crate::input::DesignInput;
use crate::latent::{LatentModule, LatentTransform};
use crate::shape::ExpectedShapes;

/// The full parameter chain of one device.
#[derive(Clone, Debug)]
pub struct ParameterPipeline {
    latents: Vec<LatentModule>,
    discretization: DiscretizationModule,
}

impl ParameterPipeline {
    /// Bind `latents` (applied in order) and `discretization` to a run.
    ///
    /// Latent transforms keep shapes, so every stage sees the
    /// discretization's input descriptor.
    pub fn new(
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ShapeDtype,
        latents: &[LatentTransform],
        discretization: &Discretization,
    ) -> Result<Self, DiscretizeError> {
        let discretization = discretization.init_module(config, catalog, output)?;
        let shapes = ExpectedShapes::Single(discretization.input_shape_dtype());
        let latents = latents
            .iter()
            .map(|t| t.init_module(config, catalog, shapes.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            latents = latents.len(),
            discretization = discretization.name(),
            "built parameter pipeline"
        );
        Ok(Self {
            latents,
            discretization,
        })
    }

    /// The bound latent transforms, in application order.
    pub fn latents(&self) -> &[LatentModule] {
        &self.latents
    }

    /// The bound discretization.
    pub fn discretization(&self) -> &DiscretizationModule {
        &self.discretization
    }

    /// Map standard-range parameters to material indices.
    pub fn forward(&self, input: DesignInput) -> Result<Bridged<Array3<u32>>, DiscretizeError> {
        let mut params = input;
        for latent in &self.latents {
            params = latent.apply(params)?;
        }
        self.discretization.discretize(&params)
    }

    /// Cotangent of the standard-range parameters for a cotangent of
    /// `output`.
    ///
    /// The discretization contributes the identity; each latent transform
    /// contributes its scale.
    pub fn backward(
        &self,
        output: &Bridged<Array3<u32>>,
        cotangent: ArrayView3<'_, f32>,
    ) -> Result<ArrayD<f32>, DiscretizeError> {
        let mut grad = output.backward(cotangent.into_dyn())?;
        for latent in self.latents.iter().rev() {
            grad = latent.backward(grad.view());
        }
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closest::ClosestIndex;
    use lithos_core::{Dtype, ShapeError};
    use lithos_test_utils::{random_design, two_material_catalog};

    fn pipeline(latents: &[LatentTransform]) -> ParameterPipeline {
        ParameterPipeline::new(
            &SimulationConfig::default(),
            &two_material_catalog(),
            ShapeDtype::new([2, 3, 1], Dtype::Int32),
            latents,
            &ClosestIndex.into(),
        )
        .unwrap()
    }

    #[test]
    fn forward_applies_latents_in_order() {
        let p = pipeline(&[LatentTransform::StandardToInversePermittivityRange]);
        // 0 maps to the polymer's 1/ε, 1 to air's.
        let mut input = Array3::<f32>::zeros((2, 3, 1));
        input[[1, 2, 0]] = 1.0;
        let out = p.forward(input.into()).unwrap().into_value();
        assert_eq!(out[[0, 0, 0]], 1);
        assert_eq!(out[[1, 2, 0]], 0);
    }

    #[test]
    fn backward_chains_scales() {
        let p = pipeline(&[
            LatentTransform::StandardToPlusOneMinusOneRange,
            LatentTransform::StandardToCustomRange {
                min_value: 0.0,
                max_value: 3.0,
            },
        ]);
        let out = p.forward(random_design([2, 3, 1], 0.0, 1.0, 1).into()).unwrap();
        let ct = Array3::<f32>::from_elem((2, 3, 1), 0.5);
        let grad = p.backward(&out, ct.view()).unwrap();
        assert!(grad.iter().all(|&g| (g - 0.5 * 2.0 * 3.0).abs() < 1e-6));
    }

    #[test]
    fn no_latents_is_pure_straight_through() {
        let p = pipeline(&[]);
        let out = p.forward(random_design([2, 3, 1], 0.0, 1.0, 2).into()).unwrap();
        let ct = random_design([2, 3, 1], -1.0, 1.0, 3);
        assert_eq!(p.backward(&out, ct.view()).unwrap(), ct.into_dyn());
    }

    #[test]
    fn backward_rejects_wrong_cotangent_shape() {
        let p = pipeline(&[]);
        let out = p.forward(random_design([2, 3, 1], 0.0, 1.0, 2).into()).unwrap();
        let ct = Array3::<f32>::zeros((3, 2, 1));
        assert!(matches!(
            p.backward(&out, ct.view()),
            Err(DiscretizeError::Shape(ShapeError::Mismatch { .. }))
        ));
    }

    #[test]
    fn double_precision_config_runs_end_to_end() {
        let config = SimulationConfig {
            dtype: Dtype::Float64,
            ..SimulationConfig::default()
        };
        let p = ParameterPipeline::new(
            &config,
            &two_material_catalog(),
            ShapeDtype::new([2, 3, 1], Dtype::Int32),
            &[LatentTransform::StandardToInversePermittivityRange],
            &ClosestIndex.into(),
        )
        .unwrap();
        let out = p.forward(Array3::<f32>::ones((2, 3, 1)).into()).unwrap().into_value();
        assert!(out.iter().all(|&k| k == 0));
    }

    #[test]
    fn forward_checks_latent_shapes_first() {
        let p = pipeline(&[LatentTransform::StandardToPlusOneMinusOneRange]);
        let wrong = Array3::<f32>::zeros((2, 2, 1));
        assert!(matches!(
            p.forward(wrong.into()),
            Err(DiscretizeError::Shape(ShapeError::Mismatch { .. }))
        ));
        assert_eq!(p.latents().len(), 1);
        assert_eq!(p.discretization().name(), "ClosestIndex");
    }
}
