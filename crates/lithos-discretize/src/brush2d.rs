//! Minimum-feature-size discretization of a 2D slice.
//!
//! The design must be flat along `axis` (extent 1). The remaining 2D
//! slice is solved by the brush-constraint fixed point; positive values
//! favour the solver's solid side, which in inverse-permittivity
//! orientation is air. With air at index 0 the output is `1 - solid`;
//! otherwise the labels are inverted so the solid side is still air. The
//! solved plane is re-expanded to extent 1 along `axis`.
//!
//! Constructed via the builder pattern: [`BrushConstraint2D::builder`].

use lithos_core::{
    ConfigError, DiscretizeError, MaterialCatalog, ShapeDtype, ShapeError, SimulationConfig,
};
use lithos_morph::{Brush, BrushSolver};
use ndarray::{Array3, Axis};

use crate::discretization::ModuleContext;
use crate::gradient::{straight_through_estimator, Bridged};
use crate::input::{as_volume, DesignInput};

/// Brush-constrained two-material discretization.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushConstraint2D {
    brush: Brush,
    axis: usize,
}

/// Builder for [`BrushConstraint2D`].
///
/// Required fields: `brush` and `axis`.
#[derive(Clone, Debug, Default)]
pub struct BrushConstraint2DBuilder {
    brush: Option<Brush>,
    axis: Option<usize>,
}

impl BrushConstraint2D {
    /// Variant name used in errors and logs.
    pub const NAME: &'static str = "BrushConstraint2D";

    /// Create a new builder.
    pub fn builder() -> BrushConstraint2DBuilder {
        BrushConstraint2DBuilder::default()
    }

    /// The structuring element.
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// The flat axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Bind to a run.
    ///
    /// # Errors
    ///
    /// Besides the checks shared by every variant, the catalog must hold
    /// exactly two materials and `output.shape[axis]` must be 1.
    pub fn init_module(
        &self,
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ShapeDtype,
    ) -> Result<BrushConstraint2DModule, DiscretizeError> {
        let context = ModuleContext::new(Self::NAME, config, catalog, output)?;
        if context.values.len() != 2 {
            return Err(ConfigError::UnsupportedMaterialCount {
                variant: Self::NAME,
                expected: "exactly 2",
                got: context.values.len(),
            }
            .into());
        }
        if output.shape[self.axis] != 1 {
            return Err(ShapeError::AxisSize {
                axis: self.axis,
                expected: 1,
                got: output.shape[self.axis],
            }
            .into());
        }
        let air = context.air_index as u32;
        Ok(BrushConstraint2DModule {
            solver: BrushSolver::new(self.brush.clone(), config.solver.clone()),
            axis: self.axis,
            solid_index: air,
            void_index: 1 - air,
            context,
        })
    }
}

impl BrushConstraint2DBuilder {
    /// Set the structuring element.
    pub fn brush(mut self, brush: Brush) -> Self {
        self.brush = Some(brush);
        self
    }

    /// Set the flat axis (0, 1 or 2).
    pub fn axis(mut self, axis: usize) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Build the variant, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `brush` is not set
    /// - `axis` is not set or greater than 2
    pub fn build(self) -> Result<BrushConstraint2D, ConfigError> {
        let brush = self.brush.ok_or_else(|| ConfigError::InvalidBrush {
            reason: "brush is required".to_string(),
        })?;
        let axis = self.axis.ok_or_else(|| ConfigError::InvalidParameter {
            reason: "axis is required".to_string(),
        })?;
        if axis > 2 {
            return Err(ConfigError::InvalidAxis { axis });
        }
        Ok(BrushConstraint2D { brush, axis })
    }
}

/// A bound [`BrushConstraint2D`].
#[derive(Clone, Debug)]
pub struct BrushConstraint2DModule {
    solver: BrushSolver,
    axis: usize,
    solid_index: u32,
    void_index: u32,
    context: ModuleContext,
}

impl BrushConstraint2DModule {
    pub(crate) fn context(&self) -> &ModuleContext {
        &self.context
    }

    /// The solver bound to this module.
    pub fn solver(&self) -> &BrushSolver {
        &self.solver
    }

    /// Discretize a single tensor of the declared output shape.
    ///
    /// Checks rank, then the extent along `axis`, then the full shape.
    pub fn discretize(&self, input: &DesignInput) -> Result<Bridged<Array3<u32>>, DiscretizeError> {
        let arr = input.as_single(BrushConstraint2D::NAME)?;
        let volume = as_volume(arr)?;
        if volume.shape()[self.axis] != 1 {
            return Err(ShapeError::AxisSize {
                axis: self.axis,
                expected: 1,
                got: volume.shape()[self.axis],
            }
            .into());
        }
        self.context.output.check_shape("input", arr.shape())?;

        let solution = self.solver.solve(volume.index_axis(Axis(self.axis), 0))?;
        let plane = solution
            .solid
            .mapv(|s| if s { self.solid_index } else { self.void_index });
        let discrete = plane.insert_axis(Axis(self.axis));
        Ok(straight_through_estimator(volume, discrete)?)
    }
}
