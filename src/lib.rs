//! Plane-wave propagation in homogeneous media and reflection/transmission at
//! planar interfaces between them.
//!
//! [`propagation`] derives attenuation, phase constant and intrinsic impedance
//! for a [`medium::Medium`] under an explicit regime. [`interface`] evaluates the
//! Fresnel coefficients, total internal reflection and perfect-conductor
//! termination for a pair of media. [`field`] samples the instantaneous E and H
//! fields over space or time, and [`sweep`] tabulates the power coefficients
//! over incidence angle.

pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod fresnel;
pub mod interface;
pub mod medium;
pub mod output;
pub mod problem;
pub mod propagation;
pub mod settings;
pub mod snell;
pub mod sweep;
