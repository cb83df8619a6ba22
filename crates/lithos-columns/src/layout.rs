//! Axis permutations between the spatial layout and the column layout.
//!
//! The column layout keeps the two free axes in their original order and
//! puts the constrained axis last, so every `(i, j)` lane is one column.

use lithos_core::ConfigError;

fn check_axis(axis: usize) -> Result<(), ConfigError> {
    if axis > 2 {
        return Err(ConfigError::InvalidAxis { axis });
    }
    Ok(())
}

/// Permutation taking spatial axes to column layout.
///
/// Pass to `permuted_axes` on a spatial array.
pub fn move_axis_last(axis: usize) -> Result<[usize; 3], ConfigError> {
    check_axis(axis)?;
    Ok(match axis {
        0 => [1, 2, 0],
        1 => [0, 2, 1],
        _ => [0, 1, 2],
    })
}

/// Inverse of [`move_axis_last`].
///
/// Pass to `permuted_axes` on a column-layout array to recover the
/// spatial layout.
pub fn restore_axis_order(axis: usize) -> Result<[usize; 3], ConfigError> {
    check_axis(axis)?;
    Ok(match axis {
        0 => [2, 0, 1],
        1 => [0, 2, 1],
        _ => [0, 1, 2],
    })
}
