//! Plane-wave propagation constants for a single medium.
//!
//! Each [`Regime`] has its own closed-form set of constants:
//!
//! - **Free space**: lossless, `β = ω/c`, `η = √(μ₀/ε₀)`.
//! - **Lossless dielectric**: lossless, `β = ω√(με)`, `η = √(μ/ε)`.
//! - **Good conductor**: `α = β = √(πfμσ/2)`, `η = √(ωμ/2σ) ∠45°`, with skin
//!   depth `δ = 1/α` and no reported phase velocity.
//!
//! The constants are a pure function of `(Medium, Excitation)`; any input
//! change means computing a new [`PropagationConstants`].

use std::f64::consts::PI;
use std::fmt;

use num_complex::Complex;
use serde::Serialize;

use crate::constants::{free_space_impedance, speed_of_light, VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use crate::medium::{Excitation, Medium, Regime};


/// Wave constants of one medium at one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropagationConstants {
    regime: Regime,
    /// Relative permittivity the constants were derived with (1 in free space).
    eps_r: f64,
    /// Relative permeability the constants were derived with (1 in free space).
    mu_r: f64,
    /// Angular frequency ω in rad/s.
    omega: f64,
    /// Attenuation constant α in Np/m.
    alpha: f64,
    /// Phase constant β in rad/m.
    beta: f64,
    /// Intrinsic impedance magnitude |η| in Ω.
    eta_magnitude: f64,
    /// Intrinsic impedance phase θη in degrees.
    eta_phase_deg: f64,
    /// Phase velocity in m/s. Not reported for good conductors.
    phase_velocity: Option<f64>,
    /// Wavelength 2π/β in m, absent when β = 0.
    wavelength: Option<f64>,
    /// Skin depth 1/α in m, good conductors only.
    skin_depth: Option<f64>,
}

impl PropagationConstants {
    /// Derives the propagation constants of `medium` driven by `excitation`.
    ///
    /// **Context**: Every downstream quantity, from Fresnel ratios to sampled
    /// fields, is expressed through α, β and the intrinsic impedance of each
    /// medium. These depend only on the medium and the excitation frequency.
    ///
    /// **How it Works**: Dispatches on the medium's [`Regime`]. Free space uses
    /// the vacuum constants and ignores any supplied relative parameters. A
    /// lossless dielectric scales them by `√(εr·μr)` and `√(μr/εr)`. A good
    /// conductor uses the high-loss approximation, where `α = β` and the
    /// impedance phase is fixed at 45°.
    ///
    /// # Example
    /// ```rust
    /// use planewave::medium::{Excitation, Medium};
    /// use planewave::propagation::PropagationConstants;
    ///
    /// let glass = Medium::lossless_dielectric(2.25, 1.0).unwrap();
    /// let pc = PropagationConstants::solve(&glass, &Excitation::new(1e9, 1.0).unwrap());
    /// assert_eq!(pc.alpha(), 0.0);
    /// assert!((pc.eta_magnitude() - 251.15).abs() < 0.01);
    /// ```
    pub fn solve(medium: &Medium, excitation: &Excitation) -> Self {
        let omega = excitation.angular_frequency();
        match medium.regime() {
            Regime::FreeSpace => {
                if medium.eps_r() != 1.0 || medium.mu_r() != 1.0 {
                    log::warn!(
                        "free-space regime ignores eps_r = {} and mu_r = {}",
                        medium.eps_r(),
                        medium.mu_r()
                    );
                }
                let c = speed_of_light();
                let beta = omega / c;
                Self {
                    regime: Regime::FreeSpace,
                    eps_r: 1.0,
                    mu_r: 1.0,
                    omega,
                    alpha: 0.0,
                    beta,
                    eta_magnitude: free_space_impedance(),
                    eta_phase_deg: 0.0,
                    phase_velocity: Some(c),
                    wavelength: wavelength_of(beta),
                    skin_depth: None,
                }
            }
            Regime::LosslessDielectric => {
                let eps = VACUUM_PERMITTIVITY * medium.eps_r();
                let mu = VACUUM_PERMEABILITY * medium.mu_r();
                let beta = omega * (mu * eps).sqrt();
                Self {
                    regime: Regime::LosslessDielectric,
                    eps_r: medium.eps_r(),
                    mu_r: medium.mu_r(),
                    omega,
                    alpha: 0.0,
                    beta,
                    eta_magnitude: (mu / eps).sqrt(),
                    eta_phase_deg: 0.0,
                    phase_velocity: Some(omega / beta),
                    wavelength: wavelength_of(beta),
                    skin_depth: None,
                }
            }
            Regime::GoodConductor => {
                let mu = VACUUM_PERMEABILITY * medium.mu_r();
                let sigma = medium.sigma();
                let alpha = (PI * excitation.frequency() * mu * sigma / 2.0).sqrt();
                Self {
                    regime: Regime::GoodConductor,
                    eps_r: medium.eps_r(),
                    mu_r: medium.mu_r(),
                    omega,
                    alpha,
                    beta: alpha,
                    eta_magnitude: (omega * mu / (2.0 * sigma)).sqrt(),
                    eta_phase_deg: 45.0,
                    phase_velocity: None,
                    wavelength: wavelength_of(alpha),
                    skin_depth: (alpha > 0.0).then(|| 1.0 / alpha),
                }
            }
        }
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Relative permittivity the constants were derived with (1 in free space).
    pub fn eps_r(&self) -> f64 {
        self.eps_r
    }

    /// Relative permeability the constants were derived with (1 in free space).
    pub fn mu_r(&self) -> f64 {
        self.mu_r
    }

    /// Angular frequency ω in rad/s.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Attenuation constant α in Np/m.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Phase constant β in rad/m.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Intrinsic impedance magnitude |η| in Ω.
    pub fn eta_magnitude(&self) -> f64 {
        self.eta_magnitude
    }

    /// Intrinsic impedance phase θη in degrees.
    pub fn eta_phase_deg(&self) -> f64 {
        self.eta_phase_deg
    }

    pub fn phase_velocity(&self) -> Option<f64> {
        self.phase_velocity
    }

    pub fn wavelength(&self) -> Option<f64> {
        self.wavelength
    }

    pub fn skin_depth(&self) -> Option<f64> {
        self.skin_depth
    }

    /// Copy with the impedance magnitude replaced, for exercising degenerate interfaces.
    #[cfg(test)]
    pub(crate) fn with_eta_magnitude(mut self, eta_magnitude: f64) -> Self {
        self.eta_magnitude = eta_magnitude;
        self
    }

    /// Refractive proxy `n = √(εr·μr)` used by Snell's law.
    pub fn refractive_index(&self) -> f64 {
        (self.eps_r * self.mu_r).sqrt()
    }

    /// Complex intrinsic impedance `|η|∠θη`.
    pub fn impedance(&self) -> Complex<f64> {
        Complex::from_polar(self.eta_magnitude, self.eta_phase_deg.to_radians())
    }

    /// Phase constant β, the wavenumber of the travelling wave.
    pub fn wavenumber(&self) -> f64 {
        self.beta
    }
}

/// `2π/β`, or `None` in the DC limit.
fn wavelength_of(beta: f64) -> Option<f64> {
    (beta > 0.0).then(|| 2.0 * PI / beta)
}

fn fmt_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.6e} {}", v, unit),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for PropagationConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Propagation ({}):", self.regime)?;
        writeln!(f, "  Attenuation:      {:.6e} Np/m", self.alpha)?;
        writeln!(f, "  Phase constant:   {:.6e} rad/m", self.beta)?;
        writeln!(
            f,
            "  Impedance:        {:.6} Ω ∠{:.1}°",
            self.eta_magnitude, self.eta_phase_deg
        )?;
        writeln!(f, "  Phase velocity:   {}", fmt_optional(self.phase_velocity, "m/s"))?;
        writeln!(f, "  Wavelength:       {}", fmt_optional(self.wavelength, "m"))?;
        writeln!(f, "  Skin depth:       {}", fmt_optional(self.skin_depth, "m"))
    }
}
