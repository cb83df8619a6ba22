//! Exhaustive enumeration of fabrication-valid layer sequences.
//!
//! A column of `num_layers` layers is valid when:
//!
//! - **no trapped hole**: no layer holding a fill index (air) lies between
//!   two layers holding non-fill indices, i.e. every air run touches an
//!   open end of the column;
//! - **single polymer column** (optional): every non-fill index occupies
//!   at most one contiguous run.
//!
//! Enumeration walks all `indices.len() ^ num_layers` sequences in
//! lexicographic order. It runs once per module at initialization and the
//! exponential cost in `num_layers` is accepted; [`MAX_CANDIDATES`] only
//! stops requests that could not finish.

use lithos_core::ConfigError;
use ndarray::{Array2, ArrayView1, ArrayView2};
use smallvec::SmallVec;
use tracing::info;

/// Largest candidate space (`indices.len() ^ num_layers`) enumerated.
pub const MAX_CANDIDATES: usize = 1 << 26;

/// Valid layer sequences, one per column of a `(num_layers, len)` array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowedIndexTable {
    table: Array2<u32>,
}

impl AllowedIndexTable {
    /// Number of layers per sequence.
    pub fn num_layers(&self) -> usize {
        self.table.nrows()
    }

    /// Number of valid sequences.
    pub fn len(&self) -> usize {
        self.table.ncols()
    }

    /// Whether no sequence is valid.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `j`-th valid sequence.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.len()`.
    pub fn sequence(&self, j: usize) -> ArrayView1<'_, u32> {
        self.table.column(j)
    }

    /// The raw `(num_layers, len)` table.
    pub fn as_array(&self) -> ArrayView2<'_, u32> {
        self.table.view()
    }

    /// Whether `seq` is one of the valid sequences.
    pub fn contains(&self, seq: &[u32]) -> bool {
        seq.len() == self.num_layers()
            && self
                .table
                .columns()
                .into_iter()
                .any(|col| col.iter().eq(seq.iter()))
    }

    /// Largest material index referenced by the table.
    pub fn max_index(&self) -> Option<u32> {
        self.table.iter().copied().max()
    }
}

fn has_trapped_hole(seq: &[u32], fill: &[u32]) -> bool {
    let solid = |v: &u32| !fill.contains(v);
    match (seq.iter().position(solid), seq.iter().rposition(solid)) {
        (Some(first), Some(last)) => seq[first..=last].iter().any(|v| fill.contains(v)),
        _ => false,
    }
}

fn is_single_polymer(seq: &[u32], fill: &[u32]) -> bool {
    let mut seen: SmallVec<[u32; 8]> = SmallVec::new();
    let mut prev = None;
    for &v in seq {
        if prev != Some(v) && !fill.contains(&v) {
            if seen.contains(&v) {
                return false;
            }
            seen.push(v);
        }
        prev = Some(v);
    }
    true
}

/// Enumerate all valid sequences of `num_layers` entries drawn from `indices`.
///
/// `fill_holes_with_index` lists the void indices (normally just the air
/// index); an empty list disables the hole rule.
///
/// # Errors
///
/// [`ConfigError::InvalidParameter`] if `num_layers` is zero, `indices` is
/// empty or has duplicates, a fill index is not in `indices`, the
/// candidate space exceeds [`MAX_CANDIDATES`], or no sequence survives.
pub fn compute_allowed_indices(
    num_layers: usize,
    indices: &[u32],
    fill_holes_with_index: &[u32],
    single_polymer_columns: bool,
) -> Result<AllowedIndexTable, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidParameter { reason };
    if num_layers == 0 {
        return Err(invalid("num_layers must be at least 1".to_string()));
    }
    if indices.is_empty() {
        return Err(invalid("indices must not be empty".to_string()));
    }
    for (i, v) in indices.iter().enumerate() {
        if indices[..i].contains(v) {
            return Err(invalid(format!("duplicate index {v} in indices")));
        }
    }
    if let Some(f) = fill_holes_with_index.iter().find(|f| !indices.contains(f)) {
        return Err(invalid(format!("fill index {f} is not in indices")));
    }
    let total = u32::try_from(num_layers)
        .ok()
        .and_then(|n| indices.len().checked_pow(n))
        .filter(|&t| t <= MAX_CANDIDATES)
        .ok_or_else(|| {
            invalid(format!(
                "{} indices over {num_layers} layers exceeds {MAX_CANDIDATES} candidates",
                indices.len()
            ))
        })?;

    let mut digits = vec![0usize; num_layers];
    let mut seq = vec![0u32; num_layers];
    let mut flat: Vec<u32> = Vec::new();
    for _ in 0..total {
        for (s, &d) in seq.iter_mut().zip(&digits) {
            *s = indices[d];
        }
        let valid = !has_trapped_hole(&seq, fill_holes_with_index)
            && (!single_polymer_columns || is_single_polymer(&seq, fill_holes_with_index));
        if valid {
            flat.extend_from_slice(&seq);
        }
        // Odometer increment, last layer fastest.
        for d in digits.iter_mut().rev() {
            *d += 1;
            if *d < indices.len() {
                break;
            }
            *d = 0;
        }
    }

    let count = flat.len() / num_layers;
    if count == 0 {
        return Err(invalid("no valid layer sequence".to_string()));
    }
    let table = Array2::from_shape_fn((num_layers, count), |(l, j)| flat[j * num_layers + l]);
    info!(
        num_layers,
        candidates = total,
        sequences = count,
        single_polymer_columns,
        "computed allowed column indices"
    );
    Ok(AllowedIndexTable { table })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sequences(t: &AllowedIndexTable) -> Vec<Vec<u32>> {
        (0..t.len()).map(|j| t.sequence(j).to_vec()).collect()
    }

    // ── Rules ───────────────────────────────────────────────────

    #[test]
    fn trapped_hole_detection() {
        assert!(has_trapped_hole(&[1, 0, 1], &[0]));
        assert!(has_trapped_hole(&[2, 0, 0, 1], &[0]));
        assert!(!has_trapped_hole(&[0, 1, 0], &[0]));
        assert!(!has_trapped_hole(&[0, 0, 0], &[0]));
        assert!(!has_trapped_hole(&[1, 2, 1], &[0]));
        assert!(!has_trapped_hole(&[1, 0, 1], &[]));
    }

    #[test]
    fn single_polymer_detection() {
        assert!(is_single_polymer(&[0, 1, 1, 0], &[0]));
        assert!(is_single_polymer(&[1, 2, 0], &[0]));
        assert!(!is_single_polymer(&[1, 2, 1], &[0]));
        assert!(!is_single_polymer(&[1, 0, 1], &[0]));
        // Air runs are never limited.
        assert!(is_single_polymer(&[0, 1, 0], &[0]));
    }

    // ── Enumeration ─────────────────────────────────────────────

    #[test]
    fn three_layers_two_materials() {
        let t = compute_allowed_indices(3, &[0, 1], &[0], true).unwrap();
        assert_eq!(t.num_layers(), 3);
        assert!(!t.contains(&[1, 0, 1]));
        assert!(t.contains(&[0, 1, 0]));
        assert!(t.contains(&[1, 1, 1]));
        assert_eq!(
            sequences(&t),
            vec![
                vec![0, 0, 0],
                vec![0, 0, 1],
                vec![0, 1, 0],
                vec![0, 1, 1],
                vec![1, 0, 0],
                vec![1, 1, 0],
                vec![1, 1, 1],
            ]
        );
    }

    #[test]
    fn single_polymer_flag_prunes_repeated_runs() {
        let free = compute_allowed_indices(3, &[0, 1, 2], &[0], false).unwrap();
        let single = compute_allowed_indices(3, &[0, 1, 2], &[0], true).unwrap();
        assert!(free.contains(&[1, 2, 1]));
        assert!(!single.contains(&[1, 2, 1]));
        assert!(single.contains(&[1, 2, 2]));
        assert!(single.len() < free.len());
    }

    #[test]
    fn no_fill_index_allows_everything() {
        let t = compute_allowed_indices(3, &[0, 1], &[], false).unwrap();
        assert_eq!(t.len(), 8);
    }

    #[test]
    fn indices_need_not_start_at_zero() {
        let t = compute_allowed_indices(2, &[3, 5], &[5], false).unwrap();
        assert_eq!(sequences(&t), vec![vec![3, 3], vec![3, 5], vec![5, 3], vec![5, 5]]);
        assert_eq!(t.max_index(), Some(5));
    }

    #[test]
    fn contains_rejects_wrong_length() {
        let t = compute_allowed_indices(2, &[0, 1], &[0], true).unwrap();
        assert!(!t.contains(&[0, 1, 0]));
    }

    // ── Validation ──────────────────────────────────────────────

    #[test]
    fn rejects_zero_layers() {
        assert!(compute_allowed_indices(0, &[0, 1], &[0], true).is_err());
    }

    #[test]
    fn rejects_unknown_fill_index() {
        match compute_allowed_indices(2, &[0, 1], &[7], true) {
            Err(ConfigError::InvalidParameter { reason }) => assert!(reason.contains("fill index 7")),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_indices() {
        assert!(compute_allowed_indices(2, &[0, 1, 1], &[0], true).is_err());
    }

    #[test]
    fn rejects_oversized_enumeration() {
        match compute_allowed_indices(64, &[0, 1, 2], &[0], true) {
            Err(ConfigError::InvalidParameter { reason }) => assert!(reason.contains("exceeds")),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn every_sequence_obeys_rules(
            num_layers in 1usize..6,
            n_materials in 1u32..4,
            single in any::<bool>(),
        ) {
            let indices: Vec<u32> = (0..n_materials).collect();
            let t = compute_allowed_indices(num_layers, &indices, &[0], single).unwrap();
            for j in 0..t.len() {
                let seq = t.sequence(j).to_vec();
                prop_assert!(!has_trapped_hole(&seq, &[0]));
                if single {
                    prop_assert!(is_single_polymer(&seq, &[0]));
                }
            }
            // Uniform columns are always fabricable.
            for &v in &indices {
                prop_assert!(t.contains(&vec![v; num_layers]));
            }
        }
    }
}
