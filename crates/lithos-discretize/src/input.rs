//! Continuous design input: one tensor or a name-keyed set.

use indexmap::IndexMap;
use lithos_core::{Dtype, ShapeError, UsageError};
use ndarray::{Array, ArrayD, ArrayView3, Dimension, Ix3};

/// Continuous parameters handed to a discretization or latent module.
///
/// Tensors are always [`DesignInput::DTYPE`], whatever the simulation dtype.
#[derive(Clone, Debug, PartialEq)]
pub enum DesignInput {
    /// A single tensor.
    Single(ArrayD<f32>),
    /// Named tensors, in insertion order.
    Named(IndexMap<String, ArrayD<f32>>),
}

impl DesignInput {
    /// Precision of every tensor a design input carries.
    pub const DTYPE: Dtype = Dtype::Float32;

    /// Precision of this input's tensors.
    pub fn dtype(&self) -> Dtype {
        Self::DTYPE
    }

    /// Wrap a single array of any rank.
    pub fn single<D: Dimension>(array: Array<f32, D>) -> Self {
        Self::Single(array.into_dyn())
    }

    /// Build a named input from `(name, array)` pairs.
    pub fn named<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ArrayD<f32>)>,
        S: Into<String>,
    {
        Self::Named(
            entries
                .into_iter()
                .map(|(name, a)| (name.into(), a))
                .collect(),
        )
    }

    /// Number of tensors (1 for [`DesignInput::Single`]).
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Named(map) => map.len(),
        }
    }

    /// Whether a named input has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tensors with their names (`None` for a single tensor).
    pub fn entries(&self) -> Vec<(Option<&str>, &ArrayD<f32>)> {
        match self {
            Self::Single(a) => vec![(None, a)],
            Self::Named(map) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        }
    }

    /// The one tensor of this input.
    ///
    /// A named input with exactly one entry is accepted, matching the way
    /// latent chains wrap a single parameter.
    ///
    /// # Errors
    ///
    /// [`UsageError::MultipleInputs`] for more than one named entry,
    /// [`UsageError::StructureMismatch`] for none.
    pub fn as_single(&self, variant: &'static str) -> Result<&ArrayD<f32>, UsageError> {
        match self {
            Self::Single(a) => Ok(a),
            Self::Named(map) => match map.len() {
                1 => Ok(&map[0]),
                0 => Err(UsageError::StructureMismatch {
                    reason: format!("{variant} received an empty named input"),
                }),
                count => Err(UsageError::MultipleInputs { variant, count }),
            },
        }
    }

    /// Apply `f` to every tensor, keeping the structure and names.
    pub fn map(self, mut f: impl FnMut(ArrayD<f32>) -> ArrayD<f32>) -> Self {
        match self {
            Self::Single(a) => Self::Single(f(a)),
            Self::Named(map) => Self::Named(map.into_iter().map(|(k, v)| (k, f(v))).collect()),
        }
    }
}

impl From<ArrayD<f32>> for DesignInput {
    fn from(array: ArrayD<f32>) -> Self {
        Self::Single(array)
    }
}

impl From<ndarray::Array3<f32>> for DesignInput {
    fn from(array: ndarray::Array3<f32>) -> Self {
        Self::single(array)
    }
}

/// View a dynamic-rank tensor as a volume.
pub(crate) fn as_volume(array: &ArrayD<f32>) -> Result<ArrayView3<'_, f32>, ShapeError> {
    let got = array.ndim();
    array
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|_| ShapeError::WrongRank { expected: 3, got })
}
