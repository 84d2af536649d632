//! Physical constants in SI units.
//!
//! ε₀ is the CODATA 2018 value; μ₀ uses the pre-2019 exact definition `4π × 10⁻⁷ H/m`,
//! which differs from the measured value only in the tenth significant figure.

use std::f64::consts::PI;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;
/// Vacuum permeability μ₀ in henries per meter (H/m).
pub const VACUUM_PERMEABILITY: f64 = 4.0 * PI * 1e-7;

/// Speed of light `1/√(μ₀ε₀)` in m/s, derived from the constants above.
#[inline]
#[must_use]
pub fn speed_of_light() -> f64 {
    1.0 / (VACUUM_PERMEABILITY * VACUUM_PERMITTIVITY).sqrt()
}

/// Intrinsic impedance of free space `√(μ₀/ε₀)` in ohms.
#[inline]
#[must_use]
pub fn free_space_impedance() -> f64 {
    (VACUUM_PERMEABILITY / VACUUM_PERMITTIVITY).sqrt()
}

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn speed_of_light_matches_reference() {
        assert_relative_eq!(speed_of_light(), 299_792_458.0, max_relative = 1e-8);
    }

    #[test]
    fn free_space_impedance_matches_reference() {
        assert_relative_eq!(free_space_impedance(), 376.730_313_668, max_relative = 1e-8);
    }
}
