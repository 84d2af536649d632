//! Reflection and transmission of a plane wave at a planar interface.
//!
//! [`InterfaceSolver`] combines Snell's law with the Fresnel equations for a
//! pair of media (1 = incidence side, 2 = far side) and classifies the outcome:
//!
//! - **Total internal reflection**: `(n1/n2)·sinθi > 1`. No transmitted angle,
//!   `R = 1`, `T = 0`.
//! - **PEC termination**: the far side behaves as a perfect electric conductor
//!   (`η2 = 0`), either by explicit override or because it is a good conductor.
//!   `Γ = −1`, `R = 1`, `T = 0`.
//! - Otherwise the Fresnel coefficients apply and `R + T = 1`.
//!
//! Neither TIR nor PEC termination is an error. The only failure besides input
//! validation is [`SolverError::DegenerateMedium`], when both impedances vanish.

use std::fmt;

use nalgebra::Matrix2;
use serde::Serialize;

use crate::config::{
    DEGENERATE_EPSILON, MAX_INCIDENCE_DEG, NEAR_BREWSTER_THRESHOLD, POWER_BALANCE_TOLERANCE,
};
use crate::error::{Result, SolverError, ValidationError};
use crate::fresnel;
pub use crate::fresnel::Polarization;
use crate::medium::{Excitation, Medium, Regime};
use crate::propagation::PropagationConstants;
use crate::snell;


/// Outcome of a single interface evaluation. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterfaceResult {
    pub theta_i: f64,
    pub polarization: Polarization,
    /// Refraction angle, absent under TIR and PEC termination.
    pub theta_t: Option<f64>,
    /// Field reflection coefficient Γ.
    pub reflection: f64,
    /// Field transmission coefficient t.
    pub transmission: f64,
    /// Power reflectance R.
    pub reflectance: f64,
    /// Power transmittance T.
    pub transmittance: f64,
    pub is_tir: bool,
    pub is_pec: bool,
    /// Present only when `n1 > n2`.
    pub critical_angle: Option<f64>,
    /// Exact Brewster angle, P polarization with matched permeabilities only.
    pub brewster_angle: Option<f64>,
    /// `|Γ∥|` at the evaluated angle is below the highlighting threshold.
    pub near_brewster: bool,
}

impl InterfaceResult {
    /// Incidence angle in degrees.
    pub fn theta_i_deg(&self) -> f64 {
        self.theta_i.to_degrees()
    }

    pub fn theta_t_deg(&self) -> Option<f64> {
        self.theta_t.map(f64::to_degrees)
    }

    pub fn critical_angle_deg(&self) -> Option<f64> {
        self.critical_angle.map(f64::to_degrees)
    }

    pub fn brewster_angle_deg(&self) -> Option<f64> {
        self.brewster_angle.map(f64::to_degrees)
    }
}

impl fmt::Display for InterfaceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deg = |v: Option<f64>| match v {
            Some(v) => format!("{:.4}°", v),
            None => "n/a".to_string(),
        };
        writeln!(f, "Interface ({} polarization):", self.polarization)?;
        writeln!(f, "  Incidence:        {:.4}°", self.theta_i_deg())?;
        writeln!(f, "  Transmission:     {}", deg(self.theta_t_deg()))?;
        writeln!(f, "  Gamma:            {:.6}", self.reflection)?;
        writeln!(f, "  t:                {:.6}", self.transmission)?;
        writeln!(f, "  R:                {:.6}", self.reflectance)?;
        writeln!(f, "  T:                {:.6}", self.transmittance)?;
        writeln!(f, "  TIR:              {}", self.is_tir)?;
        writeln!(f, "  PEC:              {}", self.is_pec)?;
        writeln!(f, "  Critical angle:   {}", deg(self.critical_angle_deg()))?;
        writeln!(f, "  Brewster angle:   {}", deg(self.brewster_angle_deg()))?;
        writeln!(f, "  Near Brewster:    {}", self.near_brewster)
    }
}

/// Power split for unpolarized incidence, the mean of the S and P results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnpolarizedResult {
    pub reflectance: f64,
    pub transmittance: f64,
    pub is_tir: bool,
    pub is_pec: bool,
}

/// Diagonal Jones matrices `diag(S, P)` for reflection and transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JonesMatrices {
    pub reflection: Matrix2<f64>,
    pub transmission: Matrix2<f64>,
}

/// Evaluates a planar interface between two media.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceSolver {
    incident: PropagationConstants,
    transmitted: PropagationConstants,
    pec_override: bool,
}

impl InterfaceSolver {
    /// Creates a solver for a wave travelling from `incident` into `transmitted`.
    ///
    /// The incidence side must support a propagating, unattenuated wave, so a
    /// good conductor there is rejected.
    pub fn new(incident: PropagationConstants, transmitted: PropagationConstants) -> Result<Self> {
        if incident.regime() == Regime::GoodConductor {
            return Err(ValidationError::new(
                "incident attenuation",
                incident.alpha(),
                "the incidence side must be free space or a lossless dielectric",
            )
            .into());
        }
        Ok(Self {
            incident,
            transmitted,
            pec_override: false,
        })
    }

    /// Solves both media at `excitation` and builds the interface.
    pub fn from_media(incident: &Medium, transmitted: &Medium, excitation: &Excitation) -> Result<Self> {
        Self::new(
            PropagationConstants::solve(incident, excitation),
            PropagationConstants::solve(transmitted, excitation),
        )
    }

    /// Forces the far side to behave as a perfect electric conductor.
    pub fn with_pec(mut self, is_pec: bool) -> Self {
        self.pec_override = is_pec;
        self
    }

    pub fn incident(&self) -> &PropagationConstants {
        &self.incident
    }

    pub fn transmitted(&self) -> &PropagationConstants {
        &self.transmitted
    }

    /// True when the far side terminates the wave as a perfect conductor.
    pub fn is_pec(&self) -> bool {
        let eta1 = self.incident.eta_magnitude();
        let eta2 = self.transmitted.eta_magnitude();
        self.pec_override
            || self.transmitted.regime() == Regime::GoodConductor
            || (eta2 < DEGENERATE_EPSILON && eta1 >= DEGENERATE_EPSILON)
    }

    /// Critical angle in radians, present only when `n1 > n2`. A PEC
    /// termination transmits nothing, so it has no critical angle.
    pub fn critical_angle(&self) -> Option<f64> {
        if self.is_pec() {
            return None;
        }
        snell::critical_angle(
            self.incident.refractive_index(),
            self.transmitted.refractive_index(),
        )
    }

    /// Exact Brewster angle in radians, present only for matched permeabilities
    /// and a penetrable far side.
    pub fn brewster_angle(&self) -> Option<f64> {
        if self.is_pec() {
            return None;
        }
        snell::brewster_angle(
            self.incident.eps_r(),
            self.incident.mu_r(),
            self.transmitted.eps_r(),
            self.transmitted.mu_r(),
        )
    }

    /// Evaluates the interface at incidence angle `theta_i_deg` (degrees, `[0, 90)`).
    ///
    /// **Context**: The reflected and transmitted amplitudes at a planar
    /// boundary depend on polarization, incidence angle and the impedance
    /// contrast. Some configurations transmit nothing at all, and the result
    /// records why.
    ///
    /// **How it Works**: Validates the angle, then checks for a PEC far side,
    /// which reflects everything with `Γ = −1`. Otherwise Snell's law gives
    /// `sinθt`. When it exceeds 1 the wave is totally internally reflected.
    /// Else the impedance form of the Fresnel equations gives `Γ` and `t`, and
    /// the power split follows from them with `R + T = 1`.
    ///
    /// # Example
    /// ```rust
    /// use planewave::interface::{InterfaceSolver, Polarization};
    /// use planewave::medium::{Excitation, Medium};
    ///
    /// let solver = InterfaceSolver::from_media(
    ///     &Medium::free_space(),
    ///     &Medium::lossless_dielectric(2.25, 1.0).unwrap(),
    ///     &Excitation::new(1e9, 1.0).unwrap(),
    /// )
    /// .unwrap();
    /// let result = solver.solve(30.0, Polarization::P).unwrap();
    /// assert!((result.reflectance + result.transmittance - 1.0).abs() < 1e-9);
    /// ```
    pub fn solve(&self, theta_i_deg: f64, pol: Polarization) -> Result<InterfaceResult> {
        let theta_i = validate_incidence(theta_i_deg)?.to_radians();
        let critical_angle = self.critical_angle();
        let brewster_angle = match pol {
            Polarization::P => self.brewster_angle(),
            Polarization::S => None,
        };

        let mut result = InterfaceResult {
            theta_i,
            polarization: pol,
            theta_t: None,
            reflection: 1.0,
            transmission: 0.0,
            reflectance: 1.0,
            transmittance: 0.0,
            is_tir: false,
            is_pec: false,
            critical_angle,
            brewster_angle,
            near_brewster: false,
        };

        if self.is_pec() {
            log::debug!("PEC termination at θi = {:.3}°", theta_i_deg);
            result.reflection = -1.0;
            result.is_pec = true;
            return Ok(result);
        }

        let n1 = self.incident.refractive_index();
        let n2 = self.transmitted.refractive_index();
        let sin_t = snell::sin_theta_t(theta_i, n1, n2);
        if sin_t > 1.0 {
            log::debug!(
                "total internal reflection at θi = {:.3}° (sinθt = {:.6})",
                theta_i_deg,
                sin_t
            );
            result.is_tir = true;
            return Ok(result);
        }

        let theta_t = sin_t.asin();
        let cos_t = (1.0 - sin_t * sin_t).sqrt();
        let cos_i = theta_i.cos();
        let eta1 = self.incident.eta_magnitude();
        let eta2 = self.transmitted.eta_magnitude();

        let coeffs = fresnel::coefficients(pol, eta1, eta2, cos_i, cos_t).ok_or(
            SolverError::DegenerateMedium {
                polarization: pol,
                theta_i_deg,
                eta1,
                eta2,
            },
        )?;

        let reflectance = (coeffs.reflection * coeffs.reflection).clamp(0.0, 1.0);
        let transmittance =
            fresnel::transmittance(eta1, eta2, cos_i, cos_t, coeffs.transmission).clamp(0.0, 1.0);
        debug_assert!(
            (reflectance + transmittance - 1.0).abs() < POWER_BALANCE_TOLERANCE,
            "power not conserved: R = {}, T = {}",
            reflectance,
            transmittance
        );

        result.theta_t = Some(theta_t);
        result.reflection = coeffs.reflection;
        result.transmission = coeffs.transmission;
        result.reflectance = reflectance;
        result.transmittance = transmittance;
        result.near_brewster =
            pol == Polarization::P && coeffs.reflection.abs() < NEAR_BREWSTER_THRESHOLD;
        Ok(result)
    }

    /// Reflectance and transmittance for unpolarized incidence.
    pub fn unpolarized(&self, theta_i_deg: f64) -> Result<UnpolarizedResult> {
        let s = self.solve(theta_i_deg, Polarization::S)?;
        let p = self.solve(theta_i_deg, Polarization::P)?;
        Ok(UnpolarizedResult {
            reflectance: 0.5 * (s.reflectance + p.reflectance),
            transmittance: 0.5 * (s.transmittance + p.transmittance),
            is_tir: s.is_tir,
            is_pec: s.is_pec,
        })
    }

    /// Jones matrices at `theta_i_deg`, for propagating polarization states
    /// through the interface in one step.
    pub fn jones(&self, theta_i_deg: f64) -> Result<JonesMatrices> {
        let s = self.solve(theta_i_deg, Polarization::S)?;
        let p = self.solve(theta_i_deg, Polarization::P)?;
        if s.is_pec || s.is_tir {
            return Ok(JonesMatrices {
                reflection: Matrix2::identity() * s.reflection,
                transmission: Matrix2::zeros(),
            });
        }

        let theta_i = s.theta_i;
        let theta_t = s.theta_t.unwrap_or(theta_i);
        let eta1 = self.incident.eta_magnitude();
        let eta2 = self.transmitted.eta_magnitude();
        let (reflection, transmission) = fresnel::jones(eta1, eta2, theta_i.cos(), theta_t.cos())
            .ok_or(SolverError::DegenerateMedium {
                polarization: Polarization::S,
                theta_i_deg,
                eta1,
                eta2,
            })?;
        Ok(JonesMatrices {
            reflection,
            transmission,
        })
    }
}

/// Checks that an incidence angle lies in `[0°, 90°)`.
pub fn validate_incidence(theta_i_deg: f64) -> std::result::Result<f64, ValidationError> {
    if !theta_i_deg.is_finite() {
        return Err(ValidationError::new("theta_i", theta_i_deg, "must be finite"));
    }
    if !(0.0..MAX_INCIDENCE_DEG).contains(&theta_i_deg) {
        return Err(ValidationError::new(
            "theta_i",
            theta_i_deg,
            "must lie in [0, 90) degrees",
        ));
    }
    Ok(theta_i_deg)
}
