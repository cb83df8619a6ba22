//! Binary dilation, its reflection and its adjoint erosion.
//!
//! `dilate(f)[p]` is true iff `f[p + d]` is true for some brush offset
//! `d`. Equivalently, a true pixel `q` of `f` stamps the brush footprint
//! `{q - d}` into the output. Positions outside the slice are false and
//! nothing is stamped outside it.
//!
//! [`dilate()`] maps touches to the pixels they cover. [`touching`] goes the
//! other way, from pixels to the touches whose footprint meets them; the
//! two coincide only for point-symmetric brushes.
//!
//! This is the hot path of the brush solver (around a dozen calls per
//! fixed-point iteration), so it scatters from the true pixels only.

use ndarray::{Array2, ArrayView2};

use crate::brush::Brush;

#[inline]
fn shifted(p: usize, d: isize, len: usize) -> Option<usize> {
    let v = p as isize - d;
    if v >= 0 && (v as usize) < len {
        Some(v as usize)
    } else {
        None
    }
}

/// Dilate `field` by `brush` with zero padding.
pub fn dilate(field: ArrayView2<'_, bool>, brush: &Brush) -> Array2<bool> {
    let (rows, cols) = field.dim();
    let mut out = Array2::from_elem((rows, cols), false);
    for ((r, c), &on) in field.indexed_iter() {
        if !on {
            continue;
        }
        for &(dr, dc) in brush.offsets() {
            if let (Some(i), Some(j)) = (shifted(r, dr, rows), shifted(c, dc, cols)) {
                out[[i, j]] = true;
            }
        }
    }
    out
}

/// Touches whose footprint meets `field`: dilation by the reflected brush.
///
/// `touching(f)[t]` is true iff `f[t - d]` is true for some offset `d`.
pub fn touching(field: ArrayView2<'_, bool>, brush: &Brush) -> Array2<bool> {
    let (rows, cols) = field.dim();
    let mut out = Array2::from_elem((rows, cols), false);
    for ((r, c), &on) in field.indexed_iter() {
        if !on {
            continue;
        }
        for &(dr, dc) in brush.offsets() {
            if let (Some(i), Some(j)) = (shifted(r, -dr, rows), shifted(c, -dc, cols)) {
                out[[i, j]] = true;
            }
        }
    }
    out
}

/// Erode `field` by `brush`, the adjoint of [`dilate`].
///
/// `erode(f)[q]` is true iff every in-bounds pixel of the footprint
/// stamped by `q` is true in `f`; out-of-bounds footprint cells are
/// ignored. `dilate(erode(f)) == f` holds exactly when `f` is a union of
/// brush placements.
pub fn erode(field: ArrayView2<'_, bool>, brush: &Brush) -> Array2<bool> {
    let (rows, cols) = field.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        brush.offsets().iter().all(|&(dr, dc)| {
            match (shifted(r, dr, rows), shifted(c, dc, cols)) {
                (Some(i), Some(j)) => field[[i, j]],
                _ => true,
            }
        })
    })
}
