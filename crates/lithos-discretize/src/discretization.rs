//! The closed set of discretization variants and their bound modules.
//!
//! A [`Discretization`] holds only variant parameters. Binding it to a run
//! with [`init_module`](Discretization::init_module) validates the
//! configuration, the catalog and the output descriptor once and derives
//! the read-only tables; the returned [`DiscretizationModule`] is then a
//! pure function of its input and may be shared across threads.

use lithos_core::{
    ConfigError, DiscretizeError, MaterialCatalog, ShapeDtype, SimulationConfig,
};
use ndarray::Array3;
use rayon::prelude::*;
use tracing::debug;

use crate::brush2d::{BrushConstraint2D, BrushConstraint2DModule};
use crate::closest::{ClosestIndex, ClosestIndexModule};
use crate::gradient::Bridged;
use crate::input::DesignInput;
use crate::pillar::{PillarDiscretization, PillarModule};

// ── Shared module state ────────────────────────────────────────────

/// State every bound module derives from `(config, catalog, output)`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ModuleContext {
    pub(crate) output: ShapeDtype,
    /// 1/ε per material in canonical order.
    pub(crate) values: Vec<f64>,
    pub(crate) air_index: usize,
}

impl ModuleContext {
    pub(crate) fn new(
        variant: &'static str,
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ShapeDtype,
    ) -> Result<Self, DiscretizeError> {
        config.validate()?;
        output.validate_output()?;
        if catalog.is_continuous() {
            return Err(ConfigError::ContinuousCatalog { variant }.into());
        }
        let values = catalog.ordered_values(config.dtype)?;
        let air_index = catalog.air_index()?;
        debug!(
            variant,
            materials = values.len(),
            air_index,
            shape = ?output.shape,
            "initialized discretization module"
        );
        Ok(Self {
            output,
            values,
            air_index,
        })
    }

    pub(crate) fn input_shape_dtype(&self) -> ShapeDtype {
        ShapeDtype::new(self.output.shape, DesignInput::DTYPE)
    }
}

// ── Discretization ─────────────────────────────────────────────────

/// An unbound discretization variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Discretization {
    /// Per-voxel nearest allowed value.
    ClosestIndex(ClosestIndex),
    /// Minimum-feature-size constraint on a 2D slice.
    BrushConstraint2D(BrushConstraint2D),
    /// Fabrication-valid layer sequences per column.
    Pillar(PillarDiscretization),
}

impl Discretization {
    /// Variant name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClosestIndex(_) => ClosestIndex::NAME,
            Self::BrushConstraint2D(_) => BrushConstraint2D::NAME,
            Self::Pillar(_) => PillarDiscretization::NAME,
        }
    }

    /// Bind the variant to a run.
    ///
    /// # Errors
    ///
    /// [`DiscretizeError::Config`] for an invalid configuration, a
    /// continuous or air-less catalog, or a material count the variant
    /// does not support; [`DiscretizeError::Shape`] for an output
    /// descriptor the variant cannot produce.
    pub fn init_module(
        &self,
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ShapeDtype,
    ) -> Result<DiscretizationModule, DiscretizeError> {
        Ok(match self {
            Self::ClosestIndex(v) => {
                DiscretizationModule::ClosestIndex(v.init_module(config, catalog, output)?)
            }
            Self::BrushConstraint2D(v) => {
                DiscretizationModule::BrushConstraint2D(v.init_module(config, catalog, output)?)
            }
            Self::Pillar(v) => DiscretizationModule::Pillar(v.init_module(config, catalog, output)?),
        })
    }
}

impl From<ClosestIndex> for Discretization {
    fn from(v: ClosestIndex) -> Self {
        Self::ClosestIndex(v)
    }
}

impl From<BrushConstraint2D> for Discretization {
    fn from(v: BrushConstraint2D) -> Self {
        Self::BrushConstraint2D(v)
    }
}

impl From<PillarDiscretization> for Discretization {
    fn from(v: PillarDiscretization) -> Self {
        Self::Pillar(v)
    }
}

// ── DiscretizationModule ───────────────────────────────────────────

/// A discretization variant bound to a configuration, catalog and output.
#[derive(Clone, Debug)]
pub enum DiscretizationModule {
    /// See [`ClosestIndexModule`].
    ClosestIndex(ClosestIndexModule),
    /// See [`BrushConstraint2DModule`].
    BrushConstraint2D(BrushConstraint2DModule),
    /// See [`PillarModule`].
    Pillar(PillarModule),
}

impl DiscretizationModule {
    fn context(&self) -> &ModuleContext {
        match self {
            Self::ClosestIndex(m) => m.context(),
            Self::BrushConstraint2D(m) => m.context(),
            Self::Pillar(m) => m.context(),
        }
    }

    /// Variant name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClosestIndex(_) => ClosestIndex::NAME,
            Self::BrushConstraint2D(_) => BrushConstraint2D::NAME,
            Self::Pillar(_) => PillarDiscretization::NAME,
        }
    }

    /// Declared shape and dtype of the discrete output.
    pub fn output_shape_dtype(&self) -> ShapeDtype {
        self.context().output
    }

    /// Declared shape and dtype of the continuous input: the output shape
    /// at [`DesignInput::DTYPE`]. The simulation dtype only sets the
    /// precision of [`allowed_values`](Self::allowed_values).
    pub fn input_shape_dtype(&self) -> ShapeDtype {
        self.context().input_shape_dtype()
    }

    /// 1/ε of every material, indexed by material index.
    pub fn allowed_values(&self) -> &[f64] {
        &self.context().values
    }

    /// Index of the air material.
    pub fn air_index(&self) -> usize {
        self.context().air_index
    }

    /// Map a continuous design to material indices.
    ///
    /// # Errors
    ///
    /// [`DiscretizeError::Usage`] for a multi-tensor input,
    /// [`DiscretizeError::Shape`] for a tensor of the wrong shape, and
    /// [`DiscretizeError::Solver`] if the brush solver fails.
    pub fn discretize(&self, input: &DesignInput) -> Result<Bridged<Array3<u32>>, DiscretizeError> {
        match self {
            Self::ClosestIndex(m) => m.discretize(input),
            Self::BrushConstraint2D(m) => m.discretize(input),
            Self::Pillar(m) => m.discretize(input),
        }
    }

    /// Discretize independent inputs in parallel.
    pub fn discretize_batch(
        &self,
        inputs: &[DesignInput],
    ) -> Vec<Result<Bridged<Array3<u32>>, DiscretizeError>> {
        inputs.par_iter().map(|input| self.discretize(input)).collect()
    }
}
