//! Error types returned by the solvers.
//!
//! Total internal reflection and perfect-conductor termination are not errors;
//! they are reported through flags on [`InterfaceResult`](crate::interface::InterfaceResult).

use thiserror::Error;

use crate::interface::Polarization;

/// Result alias used by every fallible solver operation.
pub type Result<T> = std::result::Result<T, SolverError>;

/// A non-physical input, rejected where it was supplied.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {parameter} = {value}: {reason}")]
pub struct ValidationError {
    /// Name of the offending parameter.
    pub parameter: &'static str,
    /// The value that was rejected.
    pub value: f64,
    /// Human-readable constraint that was violated.
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self {
            parameter,
            value,
            reason,
        }
    }
}

/// Top-level error type for the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Both impedances vanish, so the Fresnel ratios are undefined.
    #[error(
        "degenerate interface for {polarization} polarization at θi = {theta_i_deg:.3}°: \
         eta1 = {eta1}, eta2 = {eta2}"
    )]
    DegenerateMedium {
        polarization: Polarization,
        theta_i_deg: f64,
        eta1: f64,
        eta2: f64,
    },
}

impl SolverError {
    /// True for input errors the caller can fix by correcting a parameter.
    pub fn is_validation(&self) -> bool {
        matches!(self, SolverError::Validation(_))
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn require_positive(parameter: &'static str, value: f64) -> std::result::Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(parameter, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(ValidationError::new(parameter, value, "must be greater than 0"));
    }
    Ok(value)
}

/// Checks that `value` is finite and not negative.
pub(crate) fn require_non_negative(
    parameter: &'static str,
    value: f64,
) -> std::result::Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(parameter, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(parameter, value, "must not be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_and_nan() {
        assert!(require_positive("eps_r", 0.0).is_err());
        assert!(require_positive("eps_r", -1.0).is_err());
        assert!(require_positive("eps_r", f64::NAN).is_err());
        assert_eq!(require_positive("eps_r", 2.25), Ok(2.25));
    }

    #[test]
    fn non_negative_check_accepts_zero() {
        assert_eq!(require_non_negative("sigma", 0.0), Ok(0.0));
        assert!(require_non_negative("sigma", -1e-3).is_err());
        assert!(require_non_negative("sigma", f64::INFINITY).is_err());
    }

    #[test]
    fn validation_converts_into_solver_error() {
        let err: SolverError = ValidationError::new("frequency", -1.0, "must be greater than 0").into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "invalid frequency = -1: must be greater than 0");
    }
}
