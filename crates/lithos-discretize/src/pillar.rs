//! Pillar discretization: every column along `axis` becomes the closest
//! fabrication-valid layer sequence.
//!
//! The allowed sequences are enumerated once at initialization with one
//! layer per voxel along `axis`, every material index as a candidate and
//! air as the hole fill. Matching runs in column layout (constrained axis
//! last); the result is transposed back so the output has the input's
//! axis order.
//!
//! Constructed via the builder pattern: [`PillarDiscretization::builder`].

use lithos_columns::{
    compute_allowed_indices, gather_columns, nearest_index, restore_axis_order,
    AllowedIndexTable, DistanceMetric, Nearest,
};
use lithos_core::{
    ConfigError, DiscretizeError, MaterialCatalog, ShapeDtype, ShapeError, SimulationConfig,
};
use ndarray::Array3;

use crate::discretization::ModuleContext;
use crate::gradient::{straight_through_estimator, Bridged};
use crate::input::{as_volume, DesignInput};

/// Column-constrained discretization.
#[derive(Clone, Debug, PartialEq)]
pub struct PillarDiscretization {
    axis: usize,
    single_polymer_columns: bool,
    distance_metric: DistanceMetric,
}

/// Builder for [`PillarDiscretization`].
///
/// Required fields: `axis` and `single_polymer_columns`.
#[derive(Clone, Debug, Default)]
pub struct PillarDiscretizationBuilder {
    axis: Option<usize>,
    single_polymer_columns: Option<bool>,
    distance_metric: DistanceMetric,
}

impl PillarDiscretization {
    /// Variant name used in errors and logs.
    pub const NAME: &'static str = "PillarDiscretization";

    /// Create a new builder.
    pub fn builder() -> PillarDiscretizationBuilder {
        PillarDiscretizationBuilder::default()
    }

    /// The constrained axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Whether every polymer may occupy only one run per column.
    pub fn single_polymer_columns(&self) -> bool {
        self.single_polymer_columns
    }

    /// Column comparison metric.
    pub fn distance_metric(&self) -> &DistanceMetric {
        &self.distance_metric
    }

    /// Bind to a run and enumerate the allowed columns.
    pub fn init_module(
        &self,
        config: &SimulationConfig,
        catalog: &MaterialCatalog,
        output: ShapeDtype,
    ) -> Result<PillarModule, DiscretizeError> {
        let context = ModuleContext::new(Self::NAME, config, catalog, output)?;
        let n = u32::try_from(context.values.len()).map_err(|_| ConfigError::InvalidParameter {
            reason: format!("{} materials exceed the index range", context.values.len()),
        })?;
        let indices: Vec<u32> = (0..n).collect();
        let table = compute_allowed_indices(
            output.shape[self.axis],
            &indices,
            &[context.air_index as u32],
            self.single_polymer_columns,
        )?;
        Ok(PillarModule {
            axis: self.axis,
            distance_metric: self.distance_metric,
            table,
            context,
        })
    }
}

impl PillarDiscretizationBuilder {
    /// Set the constrained axis (0, 1 or 2).
    pub fn axis(mut self, axis: usize) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Restrict every polymer to a single contiguous run per column.
    pub fn single_polymer_columns(mut self, single: bool) -> Self {
        self.single_polymer_columns = Some(single);
        self
    }

    /// Set the column metric (default: permittivity differences plus
    /// average permittivity, unit weights).
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    /// Build the variant, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `axis` is not set or greater than 2
    /// - `single_polymer_columns` is not set
    /// - the metric weights are invalid
    pub fn build(self) -> Result<PillarDiscretization, ConfigError> {
        let axis = self.axis.ok_or_else(|| ConfigError::InvalidParameter {
            reason: "axis is required".to_string(),
        })?;
        if axis > 2 {
            return Err(ConfigError::InvalidAxis { axis });
        }
        let single_polymer_columns = self.single_polymer_columns.ok_or_else(|| {
            ConfigError::InvalidParameter {
                reason: "single_polymer_columns is required".to_string(),
            }
        })?;
        self.distance_metric.validate()?;
        Ok(PillarDiscretization {
            axis,
            single_polymer_columns,
            distance_metric: self.distance_metric,
        })
    }
}

/// A bound [`PillarDiscretization`].
#[derive(Clone, Debug)]
pub struct PillarModule {
    axis: usize,
    distance_metric: DistanceMetric,
    table: AllowedIndexTable,
    context: ModuleContext,
}

impl PillarModule {
    pub(crate) fn context(&self) -> &ModuleContext {
        &self.context
    }

    /// The allowed layer sequences.
    pub fn allowed_indices(&self) -> &AllowedIndexTable {
        &self.table
    }

    /// Discretize a single tensor of the declared output shape.
    pub fn discretize(&self, input: &DesignInput) -> Result<Bridged<Array3<u32>>, DiscretizeError> {
        let arr = input.as_single(PillarDiscretization::NAME)?;
        let volume = as_volume(arr)?;
        self.context.output.check_shape("input", arr.shape())?;

        let selection = match nearest_index(
            volume,
            &self.context.values,
            self.axis,
            &self.distance_metric,
            Some(&self.table),
        )? {
            Nearest::PerColumn(selection) => selection,
            Nearest::PerVoxel(_) => {
                return Err(ShapeError::Incompatible {
                    reason: "column search returned per-voxel indices".to_string(),
                }
                .into())
            }
        };
        let columns = gather_columns(&selection, &self.table);
        let discrete = columns
            .permuted_axes(restore_axis_order(self.axis)?)
            .as_standard_layout()
            .into_owned();
        Ok(straight_through_estimator(volume, discrete)?)
    }
}
