//! Homogeneous media and the excitation driving them.
//!
//! A [`Medium`] couples the relative material parameters with an explicitly
//! selected [`Regime`]. The regime decides which propagation formulas apply; it
//! is never inferred from the loss tangent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{angular_frequency, VACUUM_PERMITTIVITY};
use crate::error::{require_non_negative, require_positive, ValidationError};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rejects_non_positive_permittivity() {
        let err = Medium::new(0.0, 1.0, 0.0, Regime::LosslessDielectric).unwrap_err();
        assert_eq!(err.parameter, "eps_r");
        assert!(Medium::new(-2.0, 1.0, 0.0, Regime::LosslessDielectric).is_err());
    }

    #[test]
    fn rejects_non_positive_permeability() {
        let err = Medium::new(2.0, 0.0, 0.0, Regime::LosslessDielectric).unwrap_err();
        assert_eq!(err.parameter, "mu_r");
    }

    #[test]
    fn rejects_negative_conductivity() {
        let err = Medium::new(1.0, 1.0, -5.0, Regime::GoodConductor).unwrap_err();
        assert_eq!(err.parameter, "sigma");
    }

    #[test]
    fn conductor_needs_conductivity() {
        assert!(Medium::good_conductor(0.0, 1.0).is_err());
        assert!(Medium::good_conductor(5.8e7, 1.0).is_ok());
    }

    #[test]
    fn free_space_has_unit_parameters() {
        let m = Medium::free_space();
        assert_eq!(m.eps_r(), 1.0);
        assert_eq!(m.mu_r(), 1.0);
        assert_eq!(m.sigma(), 0.0);
        assert_eq!(m.regime(), Regime::FreeSpace);
    }

    #[test]
    fn excitation_validation() {
        assert!(Excitation::new(0.0, 1.0).is_err());
        assert!(Excitation::new(1e9, 0.0).is_err());
        assert!(Excitation::new(f64::NAN, 1.0).is_err());
        let ex = Excitation::new(1e9, 2.0).unwrap();
        assert_relative_eq!(ex.angular_frequency(), 2.0 * std::f64::consts::PI * 1e9);
    }

    #[test]
    fn loss_tangent_of_copper_is_large() {
        let cu = Medium::good_conductor(5.8e7, 1.0).unwrap();
        let ex = Excitation::new(1e9, 1.0).unwrap();
        assert!(cu.loss_tangent(&ex) > 1e6);
        assert_eq!(Medium::free_space().loss_tangent(&ex), 0.0);
    }

    #[test]
    fn regime_parses_from_snake_case() {
        let regime: Regime = serde_json::from_str("\"lossless_dielectric\"").unwrap();
        assert_eq!(regime, Regime::LosslessDielectric);
        assert_eq!("good-conductor".parse::<Regime>(), Ok(Regime::GoodConductor));
        assert!("plasma".parse::<Regime>().is_err());
    }
}

/// Propagation regime selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    FreeSpace,
    LosslessDielectric,
    GoodConductor,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::FreeSpace => "free space",
            Regime::LosslessDielectric => "lossless dielectric",
            Regime::GoodConductor => "good conductor",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Regime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "free_space" | "vacuum" => Ok(Regime::FreeSpace),
            "lossless_dielectric" | "dielectric" => Ok(Regime::LosslessDielectric),
            "good_conductor" | "conductor" => Ok(Regime::GoodConductor),
            _ => Err(format!(
                "unknown regime '{}', expected free_space, lossless_dielectric or good_conductor",
                s
            )),
        }
    }
}

/// Electrical parameters of a homogeneous, isotropic medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Medium {
    eps_r: f64,
    mu_r: f64,
    sigma: f64,
    regime: Regime,
}

impl Medium {
    /// Creates a medium from relative permittivity, relative permeability and
    /// conductivity (S/m) under the given regime.
    pub fn new(eps_r: f64, mu_r: f64, sigma: f64, regime: Regime) -> Result<Self, ValidationError> {
        let eps_r = require_positive("eps_r", eps_r)?;
        let mu_r = require_positive("mu_r", mu_r)?;
        let sigma = require_non_negative("sigma", sigma)?;

        if regime == Regime::GoodConductor && sigma == 0.0 {
            return Err(ValidationError::new(
                "sigma",
                sigma,
                "a good conductor needs a conductivity greater than 0",
            ));
        }

        Ok(Self {
            eps_r,
            mu_r,
            sigma,
            regime,
        })
    }

    /// Vacuum.
    pub fn free_space() -> Self {
        Self {
            eps_r: 1.0,
            mu_r: 1.0,
            sigma: 0.0,
            regime: Regime::FreeSpace,
        }
    }

    pub fn lossless_dielectric(eps_r: f64, mu_r: f64) -> Result<Self, ValidationError> {
        Self::new(eps_r, mu_r, 0.0, Regime::LosslessDielectric)
    }

    /// A good conductor with conductivity `sigma` (S/m). The permittivity is
    /// irrelevant in this regime and set to 1.
    pub fn good_conductor(sigma: f64, mu_r: f64) -> Result<Self, ValidationError> {
        Self::new(1.0, mu_r, sigma, Regime::GoodConductor)
    }

    /// Relative permittivity εr.
    pub fn eps_r(&self) -> f64 {
        self.eps_r
    }

    /// Relative permeability μr.
    pub fn mu_r(&self) -> f64 {
        self.mu_r
    }

    /// Conductivity σ in S/m.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Loss tangent `σ/(ωε)` at the given excitation. Informational only: the
    /// regime is never derived from it.
    pub fn loss_tangent(&self, excitation: &Excitation) -> f64 {
        self.sigma / (excitation.angular_frequency() * VACUUM_PERMITTIVITY * self.eps_r)
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (eps_r = {}, mu_r = {}, sigma = {} S/m)",
            self.regime, self.eps_r, self.mu_r, self.sigma
        )
    }
}

/// Time-harmonic source: frequency in Hz and reference field amplitude in V/m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Excitation {
    frequency: f64,
    amplitude: f64,
}

impl Excitation {
    /// Both the frequency (Hz) and the amplitude (V/m) must be finite and positive.
    pub fn new(frequency: f64, amplitude: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            frequency: require_positive("frequency", frequency)?,
            amplitude: require_positive("amplitude", amplitude)?,
        })
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// ω = 2πf in rad/s.
    pub fn angular_frequency(&self) -> f64 {
        angular_frequency(self.frequency)
    }
}
