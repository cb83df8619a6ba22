//! Per-voxel nearest allowed inverse permittivity.

use lithos_core::{DiscretizeError, MaterialCatalog, ShapeDtype, SimulationConfig};
use ndarray::Array3;

use crate::discretization::ModuleContext;
use crate::gradient::{straight_through_estimator, Bridged};
use crate::input::{as_volume, DesignInput};

/// Map every voxel to the material whose 1/ε is closest to its value.
///
/// No spatial constraint is applied. Ties resolve to the lower index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClosestIndex;

impl ClosestIndex {
    /// Variant name used in errors and logs.
    pub const NAME: &'static str = "ClosestIndex";

    /// Bind to a run. Any number of discrete materials is supported.
    pub fn init_module(
        &self,
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ShapeDtype,
    ) -> Result<ClosestIndexModule, DiscretizeError> {
        Ok(ClosestIndexModule {
            context: ModuleContext::new(Self::NAME, config, catalog, output)?,
        })
    }
}

/// A bound [`ClosestIndex`].
#[derive(Clone, Debug)]
pub struct ClosestIndexModule {
    context: ModuleContext,
}

impl ClosestIndexModule {
    pub(crate) fn context(&self) -> &ModuleContext {
        &self.context
    }

    /// Discretize a single tensor of the declared output shape.
    pub fn discretize(&self, input: &DesignInput) -> Result<Bridged<Array3<u32>>, DiscretizeError> {
        let arr = input.as_single(ClosestIndex::NAME)?;
        let volume = as_volume(arr)?;
        self.context.output.check_shape("input", arr.shape())?;
        let values = &self.context.values;
        let discrete = volume.mapv(|v| closest(f64::from(v), values));
        Ok(straight_through_estimator(volume, discrete)?)
    }
}

/// Index of the allowed value nearest to `v` by absolute difference,
/// lowest index on ties.
fn closest(v: f64, allowed: &[f64]) -> u32 {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (k, &a) in allowed.iter().enumerate() {
        let d = (v - a).abs();
        if d < best_d {
            best = k;
            best_d = d;
        }
    }
    best as u32
}
