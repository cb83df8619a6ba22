//! Simulation configuration consumed by the discretization engine.
//!
//! [`SimulationConfig`] is the narrow slice of the driver's configuration
//! the engine needs: the precision of allowed material values and the
//! brush-solver guard. [`validate()`](SimulationConfig::validate) checks
//! structural invariants once at module initialization.

use crate::dtype::Dtype;
use crate::error::ConfigError;

// ── SolverConfig ───────────────────────────────────────────────────

/// Guard configuration for the brush-constraint fixed point.
///
/// Each iteration of the fixed point commits at least one new touch, so
/// for a slice of `n` pixels it terminates within `2n` iterations. The
/// guard turns a violation of that argument into an error instead of a
/// hang.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum iterations per slice. `None` = `2 * rows * cols + 1`.
    pub max_iterations: Option<usize>,
}

impl SolverConfig {
    /// Resolve the iteration bound for a slice with `pixel_count` pixels.
    pub fn resolved_max_iterations(&self, pixel_count: usize) -> usize {
        match self.max_iterations {
            Some(n) => n,
            None => pixel_count.saturating_mul(2).saturating_add(1),
        }
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Configuration shared by every discretization module of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Precision at which allowed 1/ε values are materialized. Design
    /// tensors stay `f32` either way. Default: `Float32`.
    pub dtype: Dtype,
    /// Brush-solver guard.
    pub solver: SolverConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dtype: Dtype::Float32,
            solver: SolverConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Design tensors are continuous.
        if !self.dtype.is_float() {
            return Err(ConfigError::InvalidParameter {
                reason: format!("simulation dtype must be a float type, got {}", self.dtype),
            });
        }
        // 2. An explicit guard of zero would reject every slice.
        if self.solver.max_iterations == Some(0) {
            return Err(ConfigError::InvalidParameter {
                reason: "solver max_iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
