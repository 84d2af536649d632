//! Reflectance and transmittance as a function of incidence angle.
//!
//! Evaluates an [`InterfaceSolver`] for both polarizations over an evenly
//! spaced grid of incidence angles. Each angle is independent, so the grid is
//! evaluated in parallel with rayon and gathered back in angle order.

use ndarray::Array1;
use rayon::prelude::*;

use crate::config::SWEEP_MAX_INCIDENCE_DEG;
use crate::error::{Result, ValidationError};
use crate::interface::{InterfaceSolver, Polarization};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::medium::{Excitation, Medium};

    fn solver(eps_r1: f64, eps_r2: f64) -> InterfaceSolver {
        let ex = Excitation::new(1e9, 1.0).unwrap();
        InterfaceSolver::from_media(
            &Medium::lossless_dielectric(eps_r1, 1.0).unwrap(),
            &Medium::lossless_dielectric(eps_r2, 1.0).unwrap(),
            &ex,
        )
        .unwrap()
    }

    #[test]
    fn grid_spans_zero_to_max() {
        let sweep = AngularSweep::compute(&solver(1.0, 2.25), 91).unwrap();
        assert_eq!(sweep.len(), 91);
        assert_eq!(sweep.theta_deg[0], 0.0);
        assert_relative_eq!(sweep.theta_deg[90], SWEEP_MAX_INCIDENCE_DEG, epsilon = 1e-9);
    }

    #[test]
    fn power_is_conserved_across_the_sweep() {
        let sweep = AngularSweep::compute(&solver(1.0, 4.0), 60).unwrap();
        for i in 0..sweep.len() {
            assert_relative_eq!(sweep.r_s[i] + sweep.t_s[i], 1.0, epsilon = 1e-9);
            assert_relative_eq!(sweep.r_p[i] + sweep.t_p[i], 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn sampled_minimum_sits_near_brewster() {
        let sweep = AngularSweep::compute(&solver(1.0, 2.25), 900).unwrap();
        let theta_min = sweep.brewster_minimum().unwrap();
        assert!((theta_min - 56.31).abs() < 0.2, "minimum at {}", theta_min);
    }

    #[test]
    fn tir_flags_follow_critical_angle() {
        let solver = solver(2.25, 1.0);
        let critical = solver.critical_angle().unwrap().to_degrees();
        let sweep = AngularSweep::compute(&solver, 181).unwrap();
        for (theta, tir) in sweep.theta_deg.iter().zip(sweep.tir.iter()) {
            assert_eq!(*tir, *theta > critical, "theta = {}", theta);
        }
        assert!(sweep.tir.iter().any(|&t| t));
    }

    #[test]
    fn needs_two_angles() {
        assert!(AngularSweep::compute(&solver(1.0, 2.25), 1).is_err());
    }
}

/// S and P power coefficients over a grid of incidence angles.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularSweep {
    pub theta_deg: Array1<f64>,
    pub r_s: Array1<f64>,
    pub t_s: Array1<f64>,
    pub r_p: Array1<f64>,
    pub t_p: Array1<f64>,
    /// Total internal reflection at each angle.
    pub tir: Vec<bool>,
}

impl AngularSweep {
    /// Evaluates `solver` at `num_angles` angles evenly spaced over `[0°, 89.9°]`.
    ///
    /// **Context**: Reflectance curves against incidence angle show the
    /// Brewster dip and the onset of total internal reflection at a glance.
    ///
    /// **How it Works**: Builds a `linspace` grid of angles and solves both
    /// polarizations at each one in parallel. Results are gathered back in angle
    /// order, and the first failing angle aborts the sweep.
    pub fn compute(solver: &InterfaceSolver, num_angles: usize) -> Result<Self> {
        if num_angles < 2 {
            return Err(ValidationError::new(
                "num_angles",
                num_angles as f64,
                "a sweep needs at least 2 angles",
            )
            .into());
        }

        let thetas = Array1::linspace(0.0, SWEEP_MAX_INCIDENCE_DEG, num_angles).to_vec();
        let rows = thetas
            .par_iter()
            .map(|&theta| -> Result<(f64, f64, f64, f64, bool)> {
                let s = solver.solve(theta, Polarization::S)?;
                let p = solver.solve(theta, Polarization::P)?;
                Ok((s.reflectance, s.transmittance, p.reflectance, p.transmittance, s.is_tir))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("angular sweep evaluated at {} angles", rows.len());

        Ok(Self {
            r_s: rows.iter().map(|row| row.0).collect(),
            t_s: rows.iter().map(|row| row.1).collect(),
            r_p: rows.iter().map(|row| row.2).collect(),
            t_p: rows.iter().map(|row| row.3).collect(),
            tir: rows.iter().map(|row| row.4).collect(),
            theta_deg: Array1::from(thetas),
        })
    }

    pub fn len(&self) -> usize {
        self.theta_deg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta_deg.is_empty()
    }

    /// Sampled angle (degrees) of minimum P reflectance, outside TIR.
    pub fn brewster_minimum(&self) -> Option<f64> {
        self.theta_deg
            .iter()
            .zip(self.r_p.iter())
            .zip(self.tir.iter())
            .filter(|(_, tir)| !**tir)
            .min_by(|((_, a), _), ((_, b), _)| a.total_cmp(b))
            .map(|((theta, _), _)| *theta)
    }
}
