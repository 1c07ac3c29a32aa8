//! # Specific heat
//! The closures need the mixture specific heat at constant pressure
//! at every face to turn the subgrid temperature flux into an energy
//! flux. This module defines the interface and two implementations:
//! a constant cp and an ideal gas mixture described by NASA
//! 7-coefficient polynomials. [`Eos`] dispatches between them and is
//! what the configuration file selects.
//!
//! Units follow the input data: with `R_UNIVERSAL` in J/(mol K) and
//! molar masses in kg/mol, cp is returned in J/(kg K).
use serde::{Deserialize, Serialize};

/// Universal gas constant J/(mol K)
pub const R_UNIVERSAL: f64 = 8.314_462_618;

/// Map (temperature, mass fractions) to cp
#[enum_dispatch]
pub trait SpecificHeat {
    /// Mixture specific heat at constant pressure
    fn cp(&self, temperature: f64, massfrac: &[f64]) -> f64;
}

/// Equation of state selected at runtime
#[enum_dispatch(SpecificHeat)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eos {
    /// Constant cp
    ConstantCp,
    /// NASA polynomial mixture
    NasaMixture,
}

impl Default for Eos {
    /// Air at room temperature
    fn default() -> Self {
        Eos::ConstantCp(ConstantCp(1004.5))
    }
}

/// Composition and temperature independent specific heat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantCp(pub f64);

impl SpecificHeat for ConstantCp {
    fn cp(&self, _temperature: f64, _massfrac: &[f64]) -> f64 {
        self.0
    }
}

/// NASA 7-coefficient polynomial data of one species
///
/// cp / R = a1 + a2 T + a3 T^2 + a4 T^3 + a5 T^4
///
/// `low` is used below `t_mid`, `high` above. The last two
/// coefficients (enthalpy and entropy constants) are kept for
/// completeness of the record but do not enter cp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasaSpecies {
    /// Species name
    pub name: String,
    /// Molar mass kg/mol
    pub molar_mass: f64,
    /// Switch temperature between the two ranges
    pub t_mid: f64,
    /// Coefficients below `t_mid`
    pub low: [f64; 7],
    /// Coefficients above `t_mid`
    pub high: [f64; 7],
}

impl NasaSpecies {
    /// Dimensionless molar heat capacity cp/R
    pub fn cp_over_r(&self, t: f64) -> f64 {
        let a = if t < self.t_mid {
            &self.low
        } else {
            &self.high
        };
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Specific heat per unit mass
    pub fn cp_mass(&self, t: f64) -> f64 {
        self.cp_over_r(t) * R_UNIVERSAL / self.molar_mass
    }
}

/// Ideal gas mixture, cp = sum_k Y_k cp_k(T)
///
/// Mass fractions are matched to species by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NasaMixture {
    /// Species in the order of the mass fraction block
    pub species: Vec<NasaSpecies>,
}

impl NasaMixture {
    /// Mixture from species data
    pub fn new(species: Vec<NasaSpecies>) -> Self {
        Self { species }
    }

    /// Number of species
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// True if the mixture has no species
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl SpecificHeat for NasaMixture {
    /// # Panics
    /// `massfrac` does not hold one entry per species
    fn cp(&self, temperature: f64, massfrac: &[f64]) -> f64 {
        assert_eq!(
            massfrac.len(),
            self.species.len(),
            "one mass fraction per species"
        );
        self.species
            .iter()
            .zip(massfrac.iter())
            .map(|(sp, y)| y * sp.cp_mass(temperature))
            .sum()
    }
}

/// Nitrogen, GRI-Mech 3.0 data
pub fn nitrogen() -> NasaSpecies {
    NasaSpecies {
        name: "N2".to_owned(),
        molar_mass: 28.0134e-3,
        t_mid: 1000.,
        low: [
            3.298677, 1.4082404e-3, -3.963222e-6, 5.641515e-9, -2.444854e-12, -1020.8999, 3.950372,
        ],
        high: [
            2.92664, 1.4879768e-3, -5.68476e-7, 1.0097038e-10, -6.753351e-15, -922.7977, 5.980528,
        ],
    }
}

/// Oxygen, GRI-Mech 3.0 data
pub fn oxygen() -> NasaSpecies {
    NasaSpecies {
        name: "O2".to_owned(),
        molar_mass: 31.9988e-3,
        t_mid: 1000.,
        low: [
            3.78245636,
            -2.99673416e-3,
            9.84730201e-6,
            -9.68129509e-9,
            3.24372837e-12,
            -1063.94356,
            3.65767573,
        ],
        high: [
            3.28253784,
            1.48308754e-3,
            -7.57966669e-7,
            2.09470555e-10,
            -2.16717794e-14,
            -1088.45772,
            5.45323129,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nitrogen_cp_at_300k() {
        let n2 = nitrogen();
        let a = n2.low;
        let t: f64 = 300.;
        let expected = (a[0] + a[1] * t + a[2] * t.powi(2) + a[3] * t.powi(3) + a[4] * t.powi(4))
            * R_UNIVERSAL
            / n2.molar_mass;
        assert_relative_eq!(n2.cp_mass(t), expected, max_relative = 1e-12);
        // tabulated value ~1040 J/(kg K)
        assert!(expected > 1030. && expected < 1045.);
    }

    #[test]
    fn test_high_range_is_used_above_t_mid() {
        let n2 = nitrogen();
        let a = n2.high;
        let t: f64 = 1500.;
        let expected = a[0] + a[1] * t + a[2] * t.powi(2) + a[3] * t.powi(3) + a[4] * t.powi(4);
        assert_relative_eq!(n2.cp_over_r(t), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_mixture_is_mass_weighted() {
        let mix = NasaMixture::new(vec![nitrogen(), oxygen()]);
        let t = 800.;
        let y = [0.77, 0.23];
        let expected = 0.77 * nitrogen().cp_mass(t) + 0.23 * oxygen().cp_mass(t);
        assert_relative_eq!(mix.cp(t, &y), expected, max_relative = 1e-12);
        assert_eq!(mix.len(), 2);
    }

    #[test]
    fn test_constant_cp() {
        assert_eq!(ConstantCp(1004.5).cp(250., &[0.5, 0.5]), 1004.5);
    }

    #[test]
    fn test_eos_dispatch() {
        let eos = Eos::from(NasaMixture::new(vec![nitrogen()]));
        assert_relative_eq!(eos.cp(500., &[1.]), nitrogen().cp_mass(500.));
        assert_eq!(Eos::default().cp(500., &[1.]), 1004.5);
    }

    #[test]
    #[should_panic(expected = "one mass fraction per species")]
    fn test_mixture_rejects_missing_mass_fractions() {
        let mix = NasaMixture::new(vec![nitrogen(), oxygen()]);
        mix.cp(300., &[1.]);
    }
}
