//! Numerical thresholds shared by the solvers.

/// Minimum magnitude of a Fresnel denominator before the configuration is considered degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-12;
/// Tolerance on `R + T = 1` checked in debug builds.
pub const POWER_BALANCE_TOLERANCE: f64 = 1e-6;
/// `|Γ∥|` below which the evaluated angle is flagged as near-Brewster.
pub const NEAR_BREWSTER_THRESHOLD: f64 = 0.05;
/// Relative tolerance for treating two permeabilities as equal.
pub const PERMEABILITY_MATCH_TOLERANCE: f64 = 1e-9;
/// Upper bound (exclusive) of the incidence angle in degrees.
pub const MAX_INCIDENCE_DEG: f64 = 90.0;
/// Largest incidence angle used by the angular sweep, in degrees.
pub const SWEEP_MAX_INCIDENCE_DEG: f64 = 89.9;
/// Default sampler density.
pub const SAMPLES_PER_CYCLE: f64 = 32.0;
/// Minimum sampler density. Fewer samples than this alias the waveform.
pub const MIN_SAMPLES_PER_CYCLE: f64 = 2.0;
/// Absolute minimum number of samples in a sweep, regardless of the number of cycles.
pub const MIN_SAMPLES: usize = 16;
/// Absolute maximum number of samples in a sweep.
pub const MAX_SAMPLES: usize = 1_000_000;
