//! Nearest-allowed-value search.
//!
//! Without a table every voxel independently picks the allowed value
//! closest to it. With an [`AllowedIndexTable`] every column along the
//! constrained axis picks the valid sequence whose value profile is
//! closest to the column's profile. Ties resolve to the lowest index.

use lithos_core::{ConfigError, DiscretizeError, ShapeError};
use ndarray::{Array2, Array3, ArrayView1, ArrayView3, Axis};
use tracing::debug;

use crate::enumerate::AllowedIndexTable;
use crate::layout::move_axis_last;

/// Weights of the two terms of
/// [`DistanceMetric::PermittivityDifferencesPlusAveragePermittivity`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricWeights {
    /// Weight on the summed mismatch of consecutive layer differences.
    pub difference_weight: f64,
    /// Weight on the mismatch of the column means.
    pub average_weight: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            difference_weight: 1.0,
            average_weight: 1.0,
        }
    }
}

/// How a continuous column is compared with a candidate column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DistanceMetric {
    /// Sum of squared per-layer differences.
    Euclidean,
    /// `w_d * Σ |Δv - Δa| + w_a * |mean(v) - mean(a)|`, where `Δ` is the
    /// difference between consecutive layers.
    PermittivityDifferencesPlusAveragePermittivity(MetricWeights),
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self::PermittivityDifferencesPlusAveragePermittivity(MetricWeights::default())
    }
}

impl DistanceMetric {
    /// Check that the weights are finite, non-negative and not both zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Self::PermittivityDifferencesPlusAveragePermittivity(w) = self {
            let ok = |x: f64| x.is_finite() && x >= 0.0;
            if !ok(w.difference_weight) || !ok(w.average_weight) {
                return Err(ConfigError::InvalidParameter {
                    reason: format!("metric weights must be finite and non-negative, got {w:?}"),
                });
            }
            if w.difference_weight == 0.0 && w.average_weight == 0.0 {
                return Err(ConfigError::InvalidParameter {
                    reason: "metric weights must not both be zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Distance between a continuous column and a candidate column of the
    /// same length.
    pub fn column_distance(&self, values: ArrayView1<'_, f64>, candidate: &[f64]) -> f64 {
        debug_assert_eq!(values.len(), candidate.len());
        match self {
            Self::Euclidean => values
                .iter()
                .zip(candidate)
                .map(|(v, a)| (v - a) * (v - a))
                .sum(),
            Self::PermittivityDifferencesPlusAveragePermittivity(w) => {
                let n = candidate.len() as f64;
                let diff: f64 = values
                    .windows(2)
                    .into_iter()
                    .zip(candidate.windows(2))
                    .map(|(v, a)| ((v[1] - v[0]) - (a[1] - a[0])).abs())
                    .sum();
                let mean_v = values.sum() / n;
                let mean_a = candidate.iter().sum::<f64>() / n;
                w.difference_weight * diff + w.average_weight * (mean_v - mean_a).abs()
            }
        }
    }

    /// Distance between a single voxel value and an allowed value.
    ///
    /// A one-layer column has no differences, so the second metric
    /// reduces to its weighted absolute mean mismatch.
    pub fn voxel_distance(&self, value: f64, allowed: f64) -> f64 {
        match self {
            Self::Euclidean => (value - allowed) * (value - allowed),
            Self::PermittivityDifferencesPlusAveragePermittivity(w) => {
                w.average_weight * (value - allowed).abs()
            }
        }
    }
}

/// Result of [`nearest_index`].
#[derive(Clone, Debug, PartialEq)]
pub enum Nearest {
    /// Index into the allowed values for every voxel, in the input layout.
    PerVoxel(Array3<u32>),
    /// Index of the chosen table sequence for every column, over the two
    /// free axes in their original order.
    PerColumn(Array2<usize>),
}

fn argmin(distances: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (k, d) in distances.enumerate() {
        // Strict comparison keeps the lowest index on ties; NaN never wins.
        if d < best_d {
            best = k;
            best_d = d;
        }
    }
    best
}

fn check_allowed(allowed_values: &[f64]) -> Result<(), ShapeError> {
    if allowed_values.is_empty() {
        return Err(ShapeError::Incompatible {
            reason: "no allowed values".to_string(),
        });
    }
    Ok(())
}

/// Index of the closest allowed value for every voxel, in the input layout.
///
/// # Errors
///
/// An invalid metric or an empty `allowed_values`.
pub fn nearest_voxel_index(
    values: ArrayView3<'_, f32>,
    allowed_values: &[f64],
    metric: &DistanceMetric,
) -> Result<Array3<u32>, DiscretizeError> {
    metric.validate()?;
    check_allowed(allowed_values)?;
    Ok(values.mapv(|v| {
        let v = f64::from(v);
        argmin(allowed_values.iter().map(|&a| metric.voxel_distance(v, a))) as u32
    }))
}

/// Select, per voxel or per column, the closest allowed value or sequence.
///
/// `allowed_values[k]` is the value of material index `k`. With a table,
/// `values.shape()[axis]` must equal the table's layer count and every
/// table entry must index into `allowed_values`.
///
/// # Errors
///
/// [`ConfigError::InvalidAxis`] for `axis > 2`, an invalid metric, and
/// [`ShapeError`] for an empty `allowed_values` or a table that does not
/// fit the input.
pub fn nearest_index(
    values: ArrayView3<'_, f32>,
    allowed_values: &[f64],
    axis: usize,
    metric: &DistanceMetric,
    allowed_indices: Option<&AllowedIndexTable>,
) -> Result<Nearest, DiscretizeError> {
    let order = move_axis_last(axis)?;
    let Some(table) = allowed_indices else {
        return Ok(Nearest::PerVoxel(nearest_voxel_index(
            values,
            allowed_values,
            metric,
        )?));
    };
    metric.validate()?;
    check_allowed(allowed_values)?;

    if values.shape()[axis] != table.num_layers() {
        return Err(ShapeError::AxisSize {
            axis,
            expected: table.num_layers(),
            got: values.shape()[axis],
        }
        .into());
    }
    if let Some(max) = table.max_index() {
        if max as usize >= allowed_values.len() {
            return Err(ShapeError::Incompatible {
                reason: format!(
                    "table references index {max} but only {} allowed values exist",
                    allowed_values.len()
                ),
            }
            .into());
        }
    }

    let candidates: Vec<Vec<f64>> = (0..table.len())
        .map(|j| {
            table
                .sequence(j)
                .iter()
                .map(|&m| allowed_values[m as usize])
                .collect()
        })
        .collect();
    let columns = values.permuted_axes(order).mapv(f64::from);
    let (a, b, _) = columns.dim();
    let selection = Array2::from_shape_fn((a, b), |(i, j)| {
        let lane = columns.index_axis(Axis(0), i).index_axis_move(Axis(0), j);
        argmin(candidates.iter().map(|c| metric.column_distance(lane, c)))
    });
    debug!(
        axis,
        columns = a * b,
        sequences = candidates.len(),
        "matched columns to allowed sequences"
    );
    Ok(Nearest::PerColumn(selection))
}

/// Expand per-column sequence choices into material indices, in column
/// layout `(A, B, num_layers)`.
///
/// # Panics
///
/// Panics if a selection is out of range for `table`.
pub fn gather_columns(selection: &Array2<usize>, table: &AllowedIndexTable) -> Array3<u32> {
    let (a, b) = selection.dim();
    Array3::from_shape_fn((a, b, table.num_layers()), |(i, j, l)| {
        table.sequence(selection[[i, j]])[l]
    })
}
