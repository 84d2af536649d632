//! Fresnel equations for lossless media, written in terms of intrinsic impedances.
//!
//! With `η1` the impedance on the incidence side and `η2` on the far side:
//!
//! - S (perpendicular, TE):
//!   `Γ⊥ = (η2·cosθi − η1·cosθt) / (η2·cosθi + η1·cosθt)`,
//!   `t⊥ = 2η2·cosθi / (η2·cosθi + η1·cosθt)`
//! - P (parallel, TM):
//!   `Γ∥ = (η2·cosθt − η1·cosθi) / (η2·cosθt + η1·cosθi)`,
//!   `t∥ = 2η2·cosθi / (η2·cosθt + η1·cosθi)`
//!
//! The transmitted power fraction is the field ratio weighted by the
//! impedance ratio and the beam cross-section change:
//!
//! `T = (η1·cosθt)/(η2·cosθi) · t²`
//!
//! which is `(n2·cosθt)/(n1·cosθi) · t²` for non-magnetic media.

use std::fmt;

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::DEGENERATE_EPSILON;

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn normal_incidence_polarizations_agree() {
        let (eta1, eta2) = (376.73, 251.15);
        let s = coefficients(Polarization::S, eta1, eta2, 1.0, 1.0).unwrap();
        let p = coefficients(Polarization::P, eta1, eta2, 1.0, 1.0).unwrap();
        let expected = (eta2 - eta1) / (eta2 + eta1);
        assert_relative_eq!(s.reflection, expected, epsilon = 1e-12);
        assert_relative_eq!(p.reflection, expected, epsilon = 1e-12);
        assert_relative_eq!(s.transmission, p.transmission, epsilon = 1e-12);
    }

    #[test]
    fn matched_media_transmit_everything() {
        let c = coefficients(Polarization::P, 100.0, 100.0, 0.8, 0.8).unwrap();
        assert_relative_eq!(c.reflection, 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.transmission, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn vanishing_impedances_are_degenerate() {
        assert!(coefficients(Polarization::S, 0.0, 0.0, 1.0, 1.0).is_none());
        assert!(coefficients(Polarization::P, 0.0, 0.0, 0.5, 0.7).is_none());
    }

    #[test]
    fn power_balances_at_oblique_incidence() {
        let (eta1, eta2) = (376.73, 376.73 / 1.5);
        let cos_i = 40f64.to_radians().cos();
        let sin_t = 40f64.to_radians().sin() / 1.5;
        let cos_t = (1.0 - sin_t * sin_t).sqrt();
        for pol in [Polarization::S, Polarization::P] {
            let c = coefficients(pol, eta1, eta2, cos_i, cos_t).unwrap();
            let t = transmittance(eta1, eta2, cos_i, cos_t, c.transmission);
            assert_relative_eq!(c.reflection.powi(2) + t, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn jones_matrices_are_diagonal() {
        let (r, t) = jones(376.73, 251.15, 0.9, 0.95).unwrap();
        assert_eq!(r[(0, 1)], 0.0);
        assert_eq!(t[(1, 0)], 0.0);
        let s = coefficients(Polarization::S, 376.73, 251.15, 0.9, 0.95).unwrap();
        assert_eq!(r[(0, 0)], s.reflection);
    }

    #[test]
    fn polarization_parses_case_insensitively() {
        assert_eq!("p".parse::<Polarization>(), Ok(Polarization::P));
        assert_eq!("TE".parse::<Polarization>(), Ok(Polarization::S));
        assert!("x".parse::<Polarization>().is_err());
    }
}

/// Polarization of the incident electric field relative to the plane of incidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    /// Perpendicular (TE).
    #[serde(alias = "s", alias = "TE", alias = "te")]
    S,
    /// Parallel (TM).
    #[serde(alias = "p", alias = "TM", alias = "tm")]
    P,
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarization::S => f.write_str("S"),
            Polarization::P => f.write_str("P"),
        }
    }
}

impl std::str::FromStr for Polarization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "te" | "perpendicular" => Ok(Polarization::S),
            "p" | "tm" | "parallel" => Ok(Polarization::P),
            _ => Err(format!("unknown polarization '{}', expected S or P", s)),
        }
    }
}

/// Field reflection and transmission coefficients for one polarization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub reflection: f64,
    pub transmission: f64,
}

/// Fresnel coefficients for `pol`, or `None` when the denominator vanishes.
pub fn coefficients(
    pol: Polarization,
    eta1: f64,
    eta2: f64,
    cos_i: f64,
    cos_t: f64,
) -> Option<Coefficients> {
    let (num, den) = match pol {
        Polarization::S => (eta2 * cos_i - eta1 * cos_t, eta2 * cos_i + eta1 * cos_t),
        Polarization::P => (eta2 * cos_t - eta1 * cos_i, eta2 * cos_t + eta1 * cos_i),
    };
    if den.abs() < DEGENERATE_EPSILON {
        return None;
    }
    Some(Coefficients {
        reflection: num / den,
        transmission: 2.0 * eta2 * cos_i / den,
    })
}

/// Power transmittance carried by a field transmission coefficient `t`.
pub fn transmittance(eta1: f64, eta2: f64, cos_i: f64, cos_t: f64, t: f64) -> f64 {
    (eta1 * cos_t) / (eta2 * cos_i) * t * t
}

/// Diagonal reflection and transmission Jones matrices `diag(S, P)`.
///
/// Multiplying an incident `(E⊥, E∥)` amplitude vector by these gives the
/// reflected and transmitted amplitudes.
pub fn jones(eta1: f64, eta2: f64, cos_i: f64, cos_t: f64) -> Option<(Matrix2<f64>, Matrix2<f64>)> {
    let s = coefficients(Polarization::S, eta1, eta2, cos_i, cos_t)?;
    let p = coefficients(Polarization::P, eta1, eta2, cos_i, cos_t)?;
    let refl = Matrix2::from_diagonal(&Vector2::new(s.reflection, p.reflection));
    let refr = Matrix2::from_diagonal(&Vector2::new(s.transmission, p.transmission));
    Some((refl, refr))
}
