//! Materials and the material catalog adapter.
//!
//! A [`MaterialCatalog`] is either a discrete, name-keyed set of
//! [`Material`]s or a continuous range between two endpoint materials.
//! Every index-producing part of the engine refers to materials by their
//! position in the *canonical ordering* defined here, so the ordering is a
//! pure function of the material properties and names, never of insertion
//! order.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::dtype::Dtype;
use crate::error::ConfigError;

/// A physical material with scalar electromagnetic properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Relative permittivity ε.
    pub permittivity: f64,
    /// Relative permeability μ.
    pub permeability: f64,
    /// Electric conductivity σₑ.
    pub electric_conductivity: f64,
    /// Magnetic conductivity σₘ.
    pub magnetic_conductivity: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self::air()
    }
}

impl Material {
    /// A non-magnetic, non-conductive material with the given permittivity.
    pub fn new(permittivity: f64) -> Self {
        Self {
            permittivity,
            permeability: 1.0,
            electric_conductivity: 0.0,
            magnetic_conductivity: 0.0,
        }
    }

    /// Vacuum / air: ε = μ = 1, no conductivity.
    pub fn air() -> Self {
        Self::new(1.0)
    }

    /// Set the relative permeability.
    pub fn with_permeability(mut self, permeability: f64) -> Self {
        self.permeability = permeability;
        self
    }

    /// Set the electric conductivity.
    pub fn with_electric_conductivity(mut self, sigma: f64) -> Self {
        self.electric_conductivity = sigma;
        self
    }

    /// Set the magnetic conductivity.
    pub fn with_magnetic_conductivity(mut self, sigma: f64) -> Self {
        self.magnetic_conductivity = sigma;
        self
    }

    /// μ ≠ 1.
    pub fn is_magnetic(&self) -> bool {
        self.permeability != 1.0
    }

    /// σₑ ≠ 0.
    pub fn is_electrically_conductive(&self) -> bool {
        self.electric_conductivity != 0.0
    }

    /// σₘ ≠ 0.
    pub fn is_magnetically_conductive(&self) -> bool {
        self.magnetic_conductivity != 0.0
    }

    /// Whether this material is air (ε = μ = 1, non-conductive).
    pub fn is_air(&self) -> bool {
        self.permittivity == 1.0
            && !self.is_magnetic()
            && !self.is_electrically_conductive()
            && !self.is_magnetically_conductive()
    }

    /// 1/ε, the value design tensors are expressed in.
    pub fn inverse_permittivity(&self) -> f64 {
        1.0 / self.permittivity
    }

    /// Check that the properties are physical.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidMaterial {
            name: name.to_string(),
            reason,
        };
        if !self.permittivity.is_finite() || self.permittivity <= 0.0 {
            return Err(invalid(format!(
                "permittivity must be finite and positive, got {}",
                self.permittivity
            )));
        }
        if !self.permeability.is_finite() || self.permeability <= 0.0 {
            return Err(invalid(format!(
                "permeability must be finite and positive, got {}",
                self.permeability
            )));
        }
        if !self.electric_conductivity.is_finite() || !self.magnetic_conductivity.is_finite() {
            return Err(invalid("conductivities must be finite".to_string()));
        }
        Ok(())
    }

    /// Canonical comparison: ε, then μ, then σₑ, then σₘ.
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.permittivity
            .total_cmp(&other.permittivity)
            .then(self.permeability.total_cmp(&other.permeability))
            .then(
                self.electric_conductivity
                    .total_cmp(&other.electric_conductivity),
            )
            .then(
                self.magnetic_conductivity
                    .total_cmp(&other.magnetic_conductivity),
            )
    }
}

/// The set of materials a design region may be built from.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialCatalog {
    /// A finite set of named materials.
    Discrete(IndexMap<String, Material>),
    /// A continuous range, linearly interpolated between two endpoints.
    Continuous {
        /// Material at the low end of the range.
        start: Material,
        /// Material at the high end of the range.
        end: Material,
    },
}

impl MaterialCatalog {
    /// Build a discrete catalog from `(name, material)` pairs.
    pub fn discrete<I, S>(materials: I) -> Self
    where
        I: IntoIterator<Item = (S, Material)>,
        S: Into<String>,
    {
        Self::Discrete(
            materials
                .into_iter()
                .map(|(name, m)| (name.into(), m))
                .collect(),
        )
    }

    /// Build a continuous range catalog.
    pub fn continuous(start: Material, end: Material) -> Self {
        Self::Continuous { start, end }
    }

    /// Number of entries (2 for a continuous range).
    pub fn len(&self) -> usize {
        match self {
            Self::Discrete(map) => map.len(),
            Self::Continuous { .. } => 2,
        }
    }

    /// Whether the catalog holds no materials.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is a continuous range.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous { .. })
    }

    /// Check that the catalog is non-empty and every material is physical.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (name, material) in self.ordered_materials() {
            material.validate(name)?;
        }
        Ok(())
    }

    /// Materials in canonical order.
    ///
    /// Discrete catalogs are sorted by ascending permittivity, then
    /// permeability, then conductivities, then name. A continuous range
    /// is always `[start, end]`.
    pub fn ordered_materials(&self) -> Vec<(&str, &Material)> {
        match self {
            Self::Discrete(map) => {
                let mut entries: Vec<(&str, &Material)> =
                    map.iter().map(|(k, v)| (k.as_str(), v)).collect();
                entries.sort_by(|a, b| a.1.canonical_cmp(b.1).then_with(|| a.0.cmp(b.0)));
                entries
            }
            Self::Continuous { start, end } => vec![("start", start), ("end", end)],
        }
    }

    /// Material names in canonical order.
    pub fn ordered_names(&self) -> Vec<&str> {
        self.ordered_materials()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// Allowed values (1/ε) in canonical order, rounded to `dtype`.
    pub fn ordered_values(&self, dtype: Dtype) -> Result<Vec<f64>, ConfigError> {
        self.validate()?;
        Ok(self
            .ordered_materials()
            .into_iter()
            .map(|(_, m)| dtype.round(m.inverse_permittivity()))
            .collect())
    }

    /// Canonical index of the air material.
    ///
    /// If several materials qualify, the first in canonical order wins.
    pub fn air_index(&self) -> Result<usize, ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        self.ordered_materials()
            .iter()
            .position(|(_, m)| m.is_air())
            .ok_or(ConfigError::NoAirMaterial)
    }

    /// Name of the air material.
    pub fn air_name(&self) -> Result<&str, ConfigError> {
        let idx = self.air_index()?;
        Ok(self.ordered_names()[idx])
    }

    /// `(min, max)` of 1/ε over the catalog.
    pub fn inverse_permittivity_bounds(&self) -> Result<(f64, f64), ConfigError> {
        self.validate()?;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (_, m) in self.ordered_materials() {
            let p = m.inverse_permittivity();
            lo = lo.min(p);
            hi = hi.max(p);
        }
        Ok((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn polymer() -> Material {
        Material::new(2.4)
    }

    fn catalog() -> MaterialCatalog {
        MaterialCatalog::discrete([("polymer", polymer()), ("air", Material::air())])
    }

    // ── Material ────────────────────────────────────────────────

    #[test]
    fn air_flags() {
        let air = Material::air();
        assert!(air.is_air());
        assert!(!air.is_magnetic());
        assert!(!air.is_electrically_conductive());
        assert!(!air.is_magnetically_conductive());
    }

    #[test]
    fn magnetic_material_is_not_air() {
        let m = Material::air().with_permeability(2.0);
        assert!(m.is_magnetic());
        assert!(!m.is_air());
    }

    #[test]
    fn conductive_material_is_not_air() {
        let m = Material::air().with_electric_conductivity(1e3);
        assert!(m.is_electrically_conductive());
        assert!(!m.is_air());
        let m = Material::air().with_magnetic_conductivity(1.0);
        assert!(m.is_magnetically_conductive());
        assert!(!m.is_air());
    }

    #[test]
    fn validate_rejects_zero_permittivity() {
        match Material::new(0.0).validate("bad") {
            Err(ConfigError::InvalidMaterial { name, reason }) => {
                assert_eq!(name, "bad");
                assert!(reason.contains("permittivity"));
            }
            other => panic!("expected InvalidMaterial, got {other:?}"),
        }
    }

    // ── Catalog ─────────────────────────────────────────────────

    #[test]
    fn ordered_names_sorted_by_permittivity() {
        assert_eq!(catalog().ordered_names(), vec!["air", "polymer"]);
    }

    #[test]
    fn ordered_values_are_inverse_permittivities() {
        let values = catalog().ordered_values(Dtype::Float64).unwrap();
        assert_eq!(values, vec![1.0, 1.0 / 2.4]);
    }

    #[test]
    fn air_index_found() {
        assert_eq!(catalog().air_index().unwrap(), 0);
        assert_eq!(catalog().air_name().unwrap(), "air");
    }

    #[test]
    fn air_index_after_low_permittivity_material() {
        let cat = MaterialCatalog::discrete([
            ("metamaterial", Material::new(0.5)),
            ("air", Material::air()),
        ]);
        assert_eq!(cat.air_index().unwrap(), 1);
    }

    #[test]
    fn missing_air_is_config_error() {
        let cat = MaterialCatalog::discrete([("a", Material::new(2.0)), ("b", Material::new(3.0))]);
        assert_eq!(cat.air_index(), Err(ConfigError::NoAirMaterial));
    }

    #[test]
    fn duplicate_air_first_canonical_wins() {
        let cat = MaterialCatalog::discrete([
            ("vacuum", Material::air()),
            ("air", Material::air()),
            ("polymer", polymer()),
        ]);
        // Equal properties fall back to name order.
        assert_eq!(cat.air_name().unwrap(), "air");
        assert_eq!(cat.air_index().unwrap(), 0);
    }

    #[test]
    fn empty_catalog_rejected() {
        let cat = MaterialCatalog::Discrete(IndexMap::new());
        assert_eq!(cat.validate(), Err(ConfigError::EmptyCatalog));
        assert_eq!(cat.air_index(), Err(ConfigError::EmptyCatalog));
    }

    #[test]
    fn continuous_range_keeps_endpoint_order() {
        let cat = MaterialCatalog::continuous(polymer(), Material::air());
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.ordered_names(), vec!["start", "end"]);
        assert_eq!(cat.air_index().unwrap(), 1);
        let (lo, hi) = cat.inverse_permittivity_bounds().unwrap();
        assert!((lo - 1.0 / 2.4).abs() < 1e-12);
        assert_eq!(hi, 1.0);
    }

    proptest! {
        #[test]
        fn ordering_independent_of_insertion(
            perms in proptest::collection::vec(1.0f64..10.0, 1..6),
            rotate in 0usize..6,
        ) {
            let named: Vec<(String, Material)> = perms
                .iter()
                .enumerate()
                .map(|(i, &p)| (format!("m{i}"), Material::new(p)))
                .collect();
            let mut rotated = named.clone();
            let k = rotate % rotated.len();
            rotated.rotate_left(k);

            let a = MaterialCatalog::discrete(named);
            let b = MaterialCatalog::discrete(rotated);
            prop_assert_eq!(a.ordered_names(), b.ordered_names());

            let values = a.ordered_values(Dtype::Float64).unwrap();
            prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
