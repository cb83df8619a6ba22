//! The brush-constraint fixed point.
//!
//! Given a continuous 2D slice `arr` and a [`Brush`], the solver grows two
//! disjoint sets of committed brush placements ("touches"): solid touches,
//! favoured where `arr` is high, and void touches, favoured where `arr` is
//! low. It stops once every pixel is covered by the footprint of some
//! committed touch. The returned mask is the footprint of the solid
//! touches, so every solid pixel and every void pixel belongs to a whole
//! brush placement of its own kind (minimum feature size for both phases).
//!
//! Each iteration derives, purely by dilation of the current commitments
//! ([`dilate()`](crate::dilate()) from touches to pixels,
//! [`touching`](crate::touching) from pixels back to touches):
//!
//! | Set | Meaning |
//! |-----|---------|
//! | existing | pixels already covered by committed touches |
//! | impossible | touches whose footprint would hit the other phase |
//! | valid | touches neither committed nor impossible |
//! | possible | pixels reachable if every valid touch were accepted |
//! | required | pixels only one phase can still reach |
//! | resolving | valid touches covering a required pixel |
//! | free | valid touches that cannot conflict with any future choice |
//!
//! and then takes the first applicable decision:
//!
//! 1. commit **all** free touches of both phases;
//! 2. otherwise commit the single best resolving touch;
//! 3. otherwise commit the single best valid touch.
//!
//! "Best" compares the maximum of `arr` over solid candidates against the
//! maximum of `-arr` over void candidates; solid wins ties, and within a
//! phase the first position in row-major order wins.
//!
//! Every iteration commits at least one touch that was not committed
//! before, so a slice with `n` pixels terminates within `2n` iterations.
//! [`SolverConfig`] turns a violation of that bound into an error.

use lithos_core::{SolverConfig, SolverError};
use ndarray::{Array2, ArrayView2, Zip};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::brush::Brush;
use crate::dilate::{dilate, touching};

/// Counters describing one solver run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Fixed-point iterations executed.
    pub iterations: usize,
    /// Iterations that committed all free touches (case 1).
    pub free_rounds: usize,
    /// Iterations that committed the best resolving touch (case 2).
    pub resolving_rounds: usize,
    /// Iterations that committed the best valid touch (case 3).
    pub valid_rounds: usize,
}

/// Result of solving one slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// `true` where the slice is solid (the high-`arr` phase).
    pub solid: Array2<bool>,
    /// Run counters.
    pub stats: SolveStats,
}

/// Committed touches of both phases. Bits only ever flip false → true.
struct Commitments {
    solid: Array2<bool>,
    void: Array2<bool>,
}

/// All touch sets derived from one commitment state.
struct Touches {
    valid_solid: Array2<bool>,
    valid_void: Array2<bool>,
    resolving_solid: Array2<bool>,
    resolving_void: Array2<bool>,
    free_solid: Array2<bool>,
    free_void: Array2<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Solid,
    Void,
}

fn and_not(a: &Array2<bool>, b: &Array2<bool>) -> Array2<bool> {
    Zip::from(a).and(b).map_collect(|&x, &y| x && !y)
}

fn neither(a: &Array2<bool>, b: &Array2<bool>) -> Array2<bool> {
    Zip::from(a).and(b).map_collect(|&x, &y| !x && !y)
}

fn union(a: &Array2<bool>, b: &Array2<bool>) -> Array2<bool> {
    Zip::from(a).and(b).map_collect(|&x, &y| x || y)
}

fn any(a: &Array2<bool>) -> bool {
    a.iter().any(|&v| v)
}

impl Commitments {
    fn empty(dim: (usize, usize)) -> Self {
        Self {
            solid: Array2::from_elem(dim, false),
            void: Array2::from_elem(dim, false),
        }
    }

    /// Commit every free touch of both phases.
    fn commit_all(mut self, free_solid: &Array2<bool>, free_void: &Array2<bool>) -> Self {
        Zip::from(&mut self.solid)
            .and(free_solid)
            .for_each(|s, &f| *s |= f);
        Zip::from(&mut self.void)
            .and(free_void)
            .for_each(|v, &f| *v |= f);
        self
    }

    /// Commit a single touch.
    fn commit_one(mut self, phase: Phase, at: (usize, usize)) -> Self {
        match phase {
            Phase::Solid => self.solid[at] = true,
            Phase::Void => self.void[at] = true,
        }
        self
    }
}

impl Touches {
    fn derive(
        state: &Commitments,
        existing_solid: &Array2<bool>,
        existing_void: &Array2<bool>,
        brush: &Brush,
    ) -> Self {
        let impossible_solid = touching(existing_void.view(), brush);
        let impossible_void = touching(existing_solid.view(), brush);
        let valid_solid = neither(&impossible_solid, &state.solid);
        let valid_void = neither(&impossible_void, &state.void);

        let possible_solid = dilate(union(&state.solid, &valid_solid).view(), brush);
        let possible_void = dilate(union(&state.void, &valid_void).view(), brush);

        let required_solid = neither(existing_solid, &possible_void);
        let required_void = neither(existing_void, &possible_solid);

        let resolving_solid = Zip::from(&touching(required_solid.view(), brush))
            .and(&valid_solid)
            .map_collect(|&r, &v| r && v);
        let resolving_void = Zip::from(&touching(required_void.view(), brush))
            .and(&valid_void)
            .map_collect(|&r, &v| r && v);

        let blocked_solid = touching(union(&possible_void, existing_void).view(), brush);
        let blocked_void = touching(union(&possible_solid, existing_solid).view(), brush);
        let free_solid = and_not(&valid_solid, &blocked_solid);
        let free_void = and_not(&valid_void, &blocked_void);

        Self {
            valid_solid,
            valid_void,
            resolving_solid,
            resolving_void,
            free_solid,
            free_void,
        }
    }
}

/// Highest score among `candidates`, first position in row-major order on
/// ties. NaN scores as negative infinity.
fn best_candidate(
    arr: ArrayView2<'_, f32>,
    candidates: &Array2<bool>,
    sign: f32,
) -> Option<((usize, usize), f32)> {
    let mut best: Option<((usize, usize), f32)> = None;
    for (idx, &on) in candidates.indexed_iter() {
        if !on {
            continue;
        }
        let raw = sign * arr[idx];
        let score = if raw.is_nan() { f32::NEG_INFINITY } else { raw };
        match best {
            Some((_, b)) if score <= b => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

/// Pick the phase and position of the best single touch.
fn select_best(
    arr: ArrayView2<'_, f32>,
    solid: &Array2<bool>,
    void: &Array2<bool>,
) -> Option<(Phase, (usize, usize))> {
    let s = best_candidate(arr, solid, 1.0);
    let v = best_candidate(arr, void, -1.0);
    match (s, v) {
        (Some((at_s, score_s)), Some((at_v, score_v))) => {
            if score_s >= score_v {
                Some((Phase::Solid, at_s))
            } else {
                Some((Phase::Void, at_v))
            }
        }
        (Some((at, _)), None) => Some((Phase::Solid, at)),
        (None, Some((at, _))) => Some((Phase::Void, at)),
        (None, None) => None,
    }
}

/// Runs the brush-constraint fixed point on 2D slices.
#[derive(Clone, Debug)]
pub struct BrushSolver {
    brush: Brush,
    config: SolverConfig,
}

impl BrushSolver {
    /// Create a solver for `brush` with the given iteration guard.
    pub fn new(brush: Brush, config: SolverConfig) -> Self {
        Self { brush, config }
    }

    /// The structuring element.
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Solve one slice.
    ///
    /// # Errors
    ///
    /// [`SolverError::IterationLimit`] if the guard is exceeded and
    /// [`SolverError::Stalled`] if unresolved pixels remain with no valid
    /// touch. Neither occurs for finite input.
    pub fn solve(&self, arr: ArrayView2<'_, f32>) -> Result<Solution, SolverError> {
        let limit = self.config.resolved_max_iterations(arr.len());
        let mut state = Commitments::empty(arr.dim());
        let mut stats = SolveStats::default();

        loop {
            let existing_solid = dilate(state.solid.view(), &self.brush);
            let existing_void = dilate(state.void.view(), &self.brush);
            let resolved = Zip::from(&existing_solid)
                .and(&existing_void)
                .all(|&s, &v| s || v);
            if resolved {
                break;
            }
            if stats.iterations >= limit {
                return Err(SolverError::IterationLimit { limit });
            }

            let touches = Touches::derive(&state, &existing_solid, &existing_void, &self.brush);
            state = if any(&touches.free_solid) || any(&touches.free_void) {
                trace!(iteration = stats.iterations, "committing free touches");
                stats.free_rounds += 1;
                state.commit_all(&touches.free_solid, &touches.free_void)
            } else {
                let resolving = any(&touches.resolving_solid) || any(&touches.resolving_void);
                let pick = if resolving {
                    stats.resolving_rounds += 1;
                    select_best(arr, &touches.resolving_solid, &touches.resolving_void)
                } else {
                    stats.valid_rounds += 1;
                    select_best(arr, &touches.valid_solid, &touches.valid_void)
                };
                let (phase, at) = pick.ok_or(SolverError::Stalled {
                    iteration: stats.iterations,
                })?;
                trace!(iteration = stats.iterations, ?phase, ?at, resolving, "committing touch");
                state.commit_one(phase, at)
            };
            stats.iterations += 1;
        }

        debug!(
            rows = arr.nrows(),
            cols = arr.ncols(),
            iterations = stats.iterations,
            free = stats.free_rounds,
            resolving = stats.resolving_rounds,
            valid = stats.valid_rounds,
            "brush solver converged"
        );
        Ok(Solution {
            solid: dilate(state.solid.view(), &self.brush),
            stats,
        })
    }

    /// Solve independent slices in parallel.
    ///
    /// Results are returned in input order.
    pub fn solve_many(&self, slices: &[ArrayView2<'_, f32>]) -> Vec<Result<Solution, SolverError>> {
        slices.par_iter().map(|s| self.solve(s.view())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dilate::erode;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    fn solver(brush: Brush) -> BrushSolver {
        BrushSolver::new(brush, SolverConfig::default())
    }

    fn void_of(solid: &Array2<bool>) -> Array2<bool> {
        solid.mapv(|s| !s)
    }

    fn is_open(mask: &Array2<bool>, brush: &Brush) -> bool {
        dilate(erode(mask.view(), brush).view(), brush) == *mask
    }

    // ── Scenarios ───────────────────────────────────────────────

    #[test]
    fn center_peak_commits_solid_footprint() {
        let mut arr = Array2::<f32>::zeros((5, 5));
        arr[[2, 2]] = 10.0;
        let brush = Brush::square(3).unwrap();
        let sol = solver(brush.clone()).solve(arr.view()).unwrap();

        for r in 1..=3 {
            for c in 1..=3 {
                assert!(sol.solid[[r, c]], "pixel ({r}, {c}) must be solid");
            }
        }
        assert!(is_open(&sol.solid, &brush));
        assert!(is_open(&void_of(&sol.solid), &brush));
        // First pick is the peak; the rest is free.
        assert_eq!(sol.stats.valid_rounds, 1);
        assert!(sol.stats.free_rounds >= 1);
    }

    #[test]
    fn uniform_zero_ties_to_solid() {
        let arr = Array2::<f32>::zeros((4, 4));
        let sol = solver(Brush::square(3).unwrap()).solve(arr.view()).unwrap();
        assert!(sol.solid.iter().all(|&s| s));
    }

    #[test]
    fn negative_slice_is_all_void() {
        let arr = Array2::<f32>::from_elem((4, 6), -1.0);
        let sol = solver(Brush::square(3).unwrap()).solve(arr.view()).unwrap();
        assert!(sol.solid.iter().all(|&s| !s));
    }

    #[test]
    fn single_pixel_brush_thresholds_at_zero() {
        let arr = array![[0.5f32, -0.25, 0.0], [-2.0, 3.0, -0.1]];
        let sol = solver(Brush::square(1).unwrap()).solve(arr.view()).unwrap();
        assert_eq!(
            sol.solid,
            array![[true, false, true], [false, true, false]]
        );
    }

    #[test]
    fn two_blobs_keep_minimum_feature_size() {
        let mut arr = Array2::<f32>::from_elem((9, 9), -1.0);
        arr[[1, 1]] = 5.0;
        arr[[7, 7]] = 5.0;
        let brush = Brush::square(3).unwrap();
        let sol = solver(brush.clone()).solve(arr.view()).unwrap();
        assert!(sol.solid[[1, 1]]);
        assert!(sol.solid[[7, 7]]);
        assert!(!sol.solid[[4, 4]]);
        assert!(is_open(&sol.solid, &brush));
        assert!(is_open(&void_of(&sol.solid), &brush));
    }

    #[test]
    fn even_brush_splits_half_plane() {
        let arr = Array2::from_shape_fn((6, 6), |(_, c)| if c < 3 { 1.0f32 } else { -1.0 });
        let brush = Brush::square(2).unwrap();
        let sol = solver(brush.clone()).solve(arr.view()).unwrap();
        let expected = Array2::from_shape_fn((6, 6), |(_, c)| c < 3);
        assert_eq!(sol.solid, expected);
        assert!(is_open(&void_of(&sol.solid), &brush));
    }

    #[test]
    fn nan_input_still_terminates() {
        let mut arr = Array2::<f32>::zeros((4, 4));
        arr[[0, 0]] = f32::NAN;
        arr[[3, 3]] = 2.0;
        let sol = solver(Brush::square(3).unwrap()).solve(arr.view());
        assert!(sol.is_ok());
    }

    #[test]
    fn empty_slice_resolves_immediately() {
        let arr = Array2::<f32>::zeros((0, 3));
        let sol = solver(Brush::square(3).unwrap()).solve(arr.view()).unwrap();
        assert_eq!(sol.stats.iterations, 0);
        assert_eq!(sol.solid.dim(), (0, 3));
    }

    // ── Guard ───────────────────────────────────────────────────

    #[test]
    fn iteration_guard_trips() {
        let mut arr = Array2::<f32>::zeros((5, 5));
        arr[[2, 2]] = 10.0;
        let guarded = BrushSolver::new(
            Brush::square(3).unwrap(),
            SolverConfig {
                max_iterations: Some(1),
            },
        );
        assert_eq!(
            guarded.solve(arr.view()),
            Err(SolverError::IterationLimit { limit: 1 })
        );
    }

    // ── Batching ────────────────────────────────────────────────

    #[test]
    fn solve_many_matches_sequential() {
        let a = array![[1.0f32, -1.0, 1.0], [0.5, -0.5, 2.0], [-3.0, 1.0, 0.0]];
        let b = a.mapv(|v| -v);
        let s = solver(Brush::circular(2.0, None).unwrap());
        let batch = s.solve_many(&[a.view(), b.view()]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], s.solve(a.view()));
        assert_eq!(batch[1], s.solve(b.view()));
    }

    // ── Properties ──────────────────────────────────────────────

    fn arb_brush() -> impl Strategy<Value = Brush> {
        prop_oneof![
            Just(Brush::square(1).unwrap()),
            Just(Brush::square(3).unwrap()),
            Just(Brush::circular(3.5, None).unwrap()),
            Just(Brush::square(2).unwrap()),
            Just(Brush::square(4).unwrap()),
            Just(Brush::circular(4.0, Some(4)).unwrap()),
            Just(Brush::new(array![[true, true], [true, false]]).unwrap()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn output_is_brush_closed(
            brush in arb_brush(),
            rows in 1usize..8,
            cols in 1usize..8,
            seed in proptest::collection::vec(-1.0f32..1.0, 64),
        ) {
            let arr = Array2::from_shape_fn((rows, cols), |(r, c)| seed[r * 8 + c]);
            let sol = solver(brush.clone()).solve(arr.view()).unwrap();
            prop_assert!(is_open(&sol.solid, &brush));
            prop_assert!(is_open(&void_of(&sol.solid), &brush));
            prop_assert!(sol.stats.iterations <= 2 * rows * cols);
        }
    }
}
