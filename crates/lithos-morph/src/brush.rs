//! Structuring elements ("brushes").
//!
//! A brush is a boolean mask of shape `(h, w)`. Brush cell `(a, b)` maps
//! to the footprint offset `(a - (h-1)/2, b - (w-1)/2)`, i.e. the mask is
//! aligned the way a same-size correlation aligns its kernel. For odd
//! sizes this puts the mask centre at offset `(0, 0)`.

use lithos_core::ConfigError;
use ndarray::{Array2, ArrayView2};
use smallvec::SmallVec;

/// Footprint offsets of a brush, inline for brushes up to 5×5.
pub type Offsets = SmallVec<[(isize, isize); 25]>;

/// A fixed boolean structuring element defining the minimum feature size.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    mask: Array2<bool>,
    offsets: Offsets,
}

impl Brush {
    /// Wrap a boolean mask.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBrush`] if the mask has a zero extent
    /// or contains no `true` cell.
    pub fn new(mask: Array2<bool>) -> Result<Self, ConfigError> {
        let (h, w) = mask.dim();
        if h == 0 || w == 0 {
            return Err(ConfigError::InvalidBrush {
                reason: format!("brush shape ({h}, {w}) has a zero extent"),
            });
        }
        let (ch, cw) = (((h - 1) / 2) as isize, ((w - 1) / 2) as isize);
        let offsets: Offsets = mask
            .indexed_iter()
            .filter(|(_, on)| **on)
            .map(|((a, b), _)| (a as isize - ch, b as isize - cw))
            .collect();
        if offsets.is_empty() {
            return Err(ConfigError::InvalidBrush {
                reason: "brush has no true cell".to_string(),
            });
        }
        Ok(Self { mask, offsets })
    }

    /// A `side × side` all-true square.
    pub fn square(side: usize) -> Result<Self, ConfigError> {
        Self::new(Array2::from_elem((side, side), true))
    }

    /// A circular brush of the given diameter in grid units.
    ///
    /// `size` defaults to `ceil(diameter)` rounded up to the next odd
    /// number. A cell belongs to the brush when the distance from its
    /// centre to the array centre is `<= diameter / 2`; the inclusive
    /// comparison keeps designs feasible under discretization error.
    pub fn circular(diameter: f64, size: Option<usize>) -> Result<Self, ConfigError> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(ConfigError::InvalidBrush {
                reason: format!("diameter must be finite and positive, got {diameter}"),
            });
        }
        let size = match size {
            Some(s) => s,
            None => {
                let s = diameter.ceil() as usize;
                if s % 2 == 0 {
                    s + 1
                } else {
                    s
                }
            }
        };
        let centre = size as f64 / 2.0 - 0.5;
        let radius = diameter / 2.0;
        let mask = Array2::from_shape_fn((size, size), |(r, c)| {
            let dy = r as f64 - centre;
            let dx = c as f64 - centre;
            (dx * dx + dy * dy).sqrt() <= radius
        });
        Self::new(mask)
    }

    /// The boolean mask.
    pub fn mask(&self) -> ArrayView2<'_, bool> {
        self.mask.view()
    }

    /// Footprint offsets of the `true` cells, in row-major mask order.
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// `(h, w)` of the mask.
    pub fn dim(&self) -> (usize, usize) {
        self.mask.dim()
    }

    /// Whether the footprint is invariant under point reflection.
    ///
    /// Odd squares and odd-size circles are symmetric; even sizes are
    /// not. For symmetric brushes [`touching`](crate::touching) equals
    /// [`dilate`](crate::dilate()).
    pub fn is_symmetric(&self) -> bool {
        self.offsets
            .iter()
            .all(|&(dr, dc)| self.offsets.contains(&(-dr, -dc)))
    }
}
