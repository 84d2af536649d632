//! Instantaneous field samples of a travelling plane wave.
//!
//! For a wave with constants `(α, β, |η|, θη)` and excitation `(ω, E0)`:
//!
//! `E(z, t) = E0·e^(−αz)·cos(ωt − βz)`
//! `H(z, t) = (E0/|η|)·e^(−αz)·cos(ωt − βz − θη)`
//!
//! A [`FieldSampler`] holds one coordinate fixed and sweeps the other over a
//! finite domain. It owns no clock: callers animate by building a new sampler
//! with an advanced time. Iterating the same sampler twice, or two samplers
//! built from identical arguments, yields bit-identical samples.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_SAMPLES, MIN_SAMPLES, MIN_SAMPLES_PER_CYCLE, SAMPLES_PER_CYCLE};
use crate::error::{Result, ValidationError};
use crate::medium::Excitation;
use crate::propagation::PropagationConstants;


/// Which coordinate is swept, and where the other one is held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    /// Sweep `z ∈ [start, end]` (m) at fixed time `t` (s).
    Space { t: f64, start: f64, end: f64 },
    /// Sweep `t ∈ [start, end]` (s) at fixed position `z` (m).
    Time { z: f64, start: f64, end: f64 },
}

impl Domain {
    fn bounds(&self) -> (f64, f64) {
        match *self {
            Domain::Space { start, end, .. } | Domain::Time { start, end, .. } => (start, end),
        }
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        let (fixed_name, fixed) = match *self {
            Domain::Space { t, .. } => ("t", t),
            Domain::Time { z, .. } => ("z", z),
        };
        if !fixed.is_finite() {
            return Err(ValidationError::new(fixed_name, fixed, "must be finite"));
        }
        let (start, end) = self.bounds();
        if !start.is_finite() {
            return Err(ValidationError::new("domain start", start, "must be finite"));
        }
        if !end.is_finite() {
            return Err(ValidationError::new("domain end", end, "must be finite"));
        }
        if end <= start {
            return Err(ValidationError::new(
                "domain end",
                end,
                "must be greater than the domain start",
            ));
        }
        Ok(())
    }
}

/// One point of a sweep: the swept coordinate and the instantaneous fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSample {
    pub coordinate: f64,
    /// Electric field in V/m.
    pub e: f64,
    /// Magnetic field in A/m.
    pub h: f64,
}

/// Evaluates `E` and `H` at position `z` and time `t`.
pub fn field_at(constants: &PropagationConstants, excitation: &Excitation, z: f64, t: f64) -> FieldSample {
    let e0 = excitation.amplitude();
    let envelope = (-constants.alpha() * z).exp();
    let phase = constants.omega() * t - constants.beta() * z;
    FieldSample {
        coordinate: z,
        e: e0 * envelope * phase.cos(),
        h: e0 / constants.eta_magnitude() * envelope * (phase - constants.eta_phase_deg().to_radians()).cos(),
    }
}

/// Sampled sweep collected into columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTrace {
    pub coordinate: Array1<f64>,
    pub e: Array1<f64>,
    pub h: Array1<f64>,
}

/// Lazily samples the fields of one medium over a [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSampler {
    constants: PropagationConstants,
    excitation: Excitation,
    domain: Domain,
    num_samples: usize,
}

impl FieldSampler {
    /// Creates a sampler whose density follows the number of wave cycles in the domain.
    ///
    /// **Context**: A sampled sinusoid needs at least two points per cycle to
    /// be represented without aliasing, and a smooth plot needs many more.
    ///
    /// **How it Works**: Counts the cycles spanned by the domain, using `β` for
    /// a space sweep and `f` for a time sweep, and takes 32 samples per cycle
    /// with a floor of 16 samples. Domains too long to honour 2 samples per
    /// cycle within the sample cap are rejected rather than undersampled.
    ///
    /// # Example
    /// ```rust
    /// use planewave::field::{Domain, FieldSampler};
    /// use planewave::medium::{Excitation, Medium};
    /// use planewave::propagation::PropagationConstants;
    ///
    /// let ex = Excitation::new(1e9, 1.0).unwrap();
    /// let pc = PropagationConstants::solve(&Medium::free_space(), &ex);
    /// let domain = Domain::Space { t: 0.0, start: 0.0, end: 1.0 };
    /// let sampler = FieldSampler::new(pc, ex, domain).unwrap();
    /// assert_eq!(sampler.iter().count(), sampler.num_samples());
    /// ```
    pub fn new(constants: PropagationConstants, excitation: Excitation, domain: Domain) -> Result<Self> {
        domain.validate()?;
        let mut sampler = Self {
            constants,
            excitation,
            domain,
            num_samples: 0,
        };
        if sampler.cycles() * MIN_SAMPLES_PER_CYCLE > MAX_SAMPLES as f64 {
            let (_, end) = domain.bounds();
            return Err(ValidationError::new(
                "domain end",
                end,
                "domain spans too many cycles to sample at 2 samples per cycle",
            )
            .into());
        }
        let density = (sampler.cycles() * SAMPLES_PER_CYCLE).ceil() as usize;
        sampler.num_samples = density.clamp(MIN_SAMPLES, MAX_SAMPLES);
        Ok(sampler)
    }

    /// Requests an explicit sample count. Counts below the aliasing floor are raised to it.
    pub fn with_samples(mut self, num_samples: usize) -> Self {
        let floor = self.min_samples();
        if num_samples < floor {
            log::debug!(
                "raising sample count from {} to {} for {:.3} cycles",
                num_samples,
                floor,
                self.cycles()
            );
        }
        self.num_samples = num_samples.max(floor).min(MAX_SAMPLES);
        self
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Number of wave cycles spanned by the domain.
    pub fn cycles(&self) -> f64 {
        let (start, end) = self.domain.bounds();
        let span = end - start;
        match self.domain {
            Domain::Space { .. } => self.constants.beta() * span / std::f64::consts::TAU,
            Domain::Time { .. } => self.excitation.frequency() * span,
        }
    }

    fn min_samples(&self) -> usize {
        ((self.cycles() * MIN_SAMPLES_PER_CYCLE).ceil() as usize).max(MIN_SAMPLES)
    }

    /// Sample `index` of the sweep. The final index lands exactly on the domain end.
    pub fn sample(&self, index: usize) -> FieldSample {
        let (start, end) = self.domain.bounds();
        let last = self.num_samples - 1;
        let coordinate = if index >= last {
            end
        } else {
            start + (end - start) / last as f64 * index as f64
        };
        match self.domain {
            Domain::Space { t, .. } => field_at(&self.constants, &self.excitation, coordinate, t),
            Domain::Time { z, .. } => FieldSample {
                coordinate,
                ..field_at(&self.constants, &self.excitation, z, coordinate)
            },
        }
    }

    /// Iterates the sweep from the start of the domain. Each call restarts.
    pub fn iter(&self) -> Samples<'_> {
        Samples {
            sampler: self,
            next: 0,
        }
    }

    /// Collects the sweep into `ndarray` columns.
    pub fn trace(&self) -> FieldTrace {
        let n = self.num_samples;
        let mut coordinate = Array1::zeros(n);
        let mut e = Array1::zeros(n);
        let mut h = Array1::zeros(n);
        for (i, sample) in self.iter().enumerate() {
            coordinate[i] = sample.coordinate;
            e[i] = sample.e;
            h[i] = sample.h;
        }
        FieldTrace { coordinate, e, h }
    }
}

/// Iterator over the samples of a [`FieldSampler`].
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    sampler: &'a FieldSampler,
    next: usize,
}

impl Iterator for Samples<'_> {
    type Item = FieldSample;

    fn next(&mut self) -> Option<FieldSample> {
        if self.next >= self.sampler.num_samples {
            return None;
        }
        let sample = self.sampler.sample(self.next);
        self.next += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sampler.num_samples - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples<'_> {}

impl<'a> IntoIterator for &'a FieldSampler {
    type Item = FieldSample;
    type IntoIter = Samples<'a>;

    fn into_iter(self) -> Samples<'a> {
        self.iter()
    }
}
