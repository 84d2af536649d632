//! Snell's law and the special angles of a planar interface.
//!
//! The media handled here are lossless on the incidence side, so Snell's law
//! is evaluated with the real refractive proxies `n = √(εr·μr)`:
//!
//! `n1·sinθi = n2·sinθt`
//!
//! When `n1 > n2` the transmitted sine exceeds 1 beyond the critical angle and
//! no transmitted wave exists (total internal reflection). All angles are in
//! radians.


/// Sine of the transmitted angle, `(n1/n2)·sinθi`. May exceed 1.
pub fn sin_theta_t(theta_i: f64, n1: f64, n2: f64) -> f64 {
    n1 / n2 * theta_i.sin()
}

/// Transmitted angle for incidence angle `theta_i`, or `None` under total
/// internal reflection.
pub fn theta_t(theta_i: f64, n1: f64, n2: f64) -> Option<f64> {
    if n1 == n2 {
        return Some(theta_i);
    }

    let sin_t = sin_theta_t(theta_i, n1, n2);
    if sin_t > 1.0 {
        None
    } else {
        Some(sin_t.asin())
    }
}

/// Critical angle `asin(n2/n1)`, defined only when `n1 > n2`.
pub fn critical_angle(n1: f64, n2: f64) -> Option<f64> {
    (n1 > n2).then(|| (n2 / n1).asin())
}

/// Closed-form Brewster angle `atan(√((εr2·μr2)/(εr1·μr1)))`.
///
/// Only meaningful for non-magnetic contrast, so `None` is returned when the
/// two permeabilities differ.
pub fn brewster_angle(eps_r1: f64, mu_r1: f64, eps_r2: f64, mu_r2: f64) -> Option<f64> {
    if !permeabilities_match(mu_r1, mu_r2) {
        return None;
    }
    Some(((eps_r2 * mu_r2) / (eps_r1 * mu_r1)).sqrt().atan())
}

fn permeabilities_match(mu_r1: f64, mu_r2: f64) -> bool {
    (mu_r1 - mu_r2).abs() <= crate::config::PERMEABILITY_MATCH_TOLERANCE * mu_r1.max(mu_r2)
}
