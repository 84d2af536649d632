use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::field::{Domain, FieldSampler};
use crate::interface::{InterfaceSolver, Polarization};
use crate::medium::{Excitation, Medium, Regime};
use crate::propagation::PropagationConstants;


/// Parameters of one medium as they appear in configuration files.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MediumSettings {
    pub regime: Regime,
    #[serde(default = "default_unity")]
    pub eps_r: f64,
    #[serde(default = "default_unity")]
    pub mu_r: f64,
    #[serde(default)]
    pub sigma: f64,
}

impl MediumSettings {
    pub fn medium(&self) -> Result<Medium> {
        Ok(Medium::new(self.eps_r, self.mu_r, self.sigma, self.regime)?)
    }
}

/// Which side of the interface the field sampler looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SampledMedium {
    #[default]
    Incident,
    Transmitted,
}

/// Field sampling configuration. `samples` overrides the automatic density.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SamplerSettings {
    #[serde(default)]
    pub medium: SampledMedium,
    pub domain: Domain,
    #[serde(default)]
    pub samples: Option<usize>,
}

/// Runtime configuration for one scenario.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    /// Excitation frequency in Hz.
    pub frequency: f64,
    /// Reference field amplitude in V/m.
    #[serde(default = "default_unity")]
    pub amplitude: f64,
    /// Incidence angle in degrees.
    pub theta_i: f64,
    pub polarization: Polarization,
    #[serde(default)]
    pub is_pec: bool,
    pub incident: MediumSettings,
    pub transmitted: MediumSettings,
    pub sampler: SamplerSettings,
    /// Number of angles in the reflectance sweep.
    pub sweep_angles: usize,
    /// Directory that output files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_unity() -> f64 {
    1.0
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Settings {
    pub fn excitation(&self) -> Result<Excitation> {
        Ok(Excitation::new(self.frequency, self.amplitude)?)
    }

    pub fn interface(&self) -> Result<InterfaceSolver> {
        let excitation = self.excitation()?;
        let incident = self.incident.medium().context("incident medium")?;
        let transmitted = self.transmitted.medium().context("transmitted medium")?;
        Ok(InterfaceSolver::from_media(&incident, &transmitted, &excitation)?.with_pec(self.is_pec))
    }

    /// Field sampler for the medium selected by `sampler.medium`.
    pub fn sampler(&self) -> Result<FieldSampler> {
        let excitation = self.excitation()?;
        let medium = match self.sampler.medium {
            SampledMedium::Incident => self.incident.medium().context("incident medium")?,
            SampledMedium::Transmitted => {
                self.transmitted.medium().context("transmitted medium")?
            }
        };
        let constants = PropagationConstants::solve(&medium, &excitation);
        let sampler = FieldSampler::new(constants, excitation, self.sampler.domain)?;
        Ok(match self.sampler.samples {
            Some(n) => sampler.with_samples(n),
            None => sampler,
        })
    }
}

/// Loads `config/default.toml` only, without environment or command-line overrides.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let default_config_file = root.join("config/default.toml");

    let settings = Config::builder()
        .add_source(File::from(default_config_file).required(true))
        .build()
        .context("loading default configuration")?;

    let config: Settings = settings
        .try_deserialize()
        .context("deserializing default configuration")?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the layered configuration: config file, `PLANEWAVE_*` environment
/// variables, then command-line arguments.
pub fn load_config() -> Result<Settings> {
    load_config_with(CliArgs::parse())
}

pub fn load_config_with(args: CliArgs) -> Result<Settings> {
    let config_file = match &args.config {
        Some(path) => PathBuf::from(path),
        None => {
            let root = retrieve_project_root()?;
            let local_config = root.join("config/local.toml");
            if local_config.exists() {
                local_config
            } else {
                root.join("config/default.toml")
            }
        }
    };
    log::info!("using configuration: {:?}", config_file);

    let settings = Config::builder()
        .add_source(File::from(config_file.as_path()).required(true))
        .add_source(
            Environment::with_prefix("PLANEWAVE")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("loading configuration from {:?}", config_file))?;

    let mut config: Settings = settings
        .try_deserialize()
        .context("deserializing configuration")?;

    args.apply(&mut config);

    validate_config(&config)?;

    log::debug!("{:#?}", config);

    Ok(config)
}

/// Retrieve the project root directory.
///
/// Tried in order: `CARGO_MANIFEST_DIR`, `PLANEWAVE_ROOT_DIR`, then the nearest
/// ancestor of the executable that contains a `config` subdirectory.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("PLANEWAVE_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("locating the current executable")?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("could not find a project root containing a config directory"))
}

/// Checks that every configured quantity is physical by building the library types.
pub fn validate_config(config: &Settings) -> Result<()> {
    let interface = config.interface()?;
    interface
        .solve(config.theta_i, config.polarization)
        .map(|_| ())
        .or_else(|err| if err.is_validation() { Err(err) } else { Ok(()) })
        .context("incidence angle")?;
    config.sampler().context("field sampler")?;
    if config.sweep_angles < 2 {
        return Err(anyhow!(
            "sweep_angles must be at least 2, got {}",
            config.sweep_angles
        ));
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about = "Plane-wave propagation and interface analysis")]
pub struct CliArgs {
    /// Path to a TOML configuration file. Defaults to config/local.toml or config/default.toml.
    #[arg(short, long)]
    config: Option<String>,

    /// Excitation frequency in Hz.
    #[arg(short, long)]
    frequency: Option<f64>,

    /// Reference electric field amplitude in V/m.
    #[arg(short, long)]
    amplitude: Option<f64>,

    /// Incidence angle in degrees, in [0, 90).
    #[arg(short, long)]
    theta: Option<f64>,

    /// Polarization of the incident wave: S (TE) or P (TM).
    #[arg(short, long)]
    pol: Option<Polarization>,

    /// Terminate the far side with a perfect electric conductor.
    #[arg(long)]
    pec: bool,

    /// Regime of the incidence-side medium.
    #[arg(long)]
    regime1: Option<Regime>,

    /// Relative permittivity of the incidence-side medium.
    #[arg(long)]
    er1: Option<f64>,

    /// Relative permeability of the incidence-side medium.
    #[arg(long)]
    mur1: Option<f64>,

    /// Conductivity of the incidence-side medium in S/m.
    #[arg(long)]
    sigma1: Option<f64>,

    /// Regime of the far-side medium.
    #[arg(long)]
    regime2: Option<Regime>,

    /// Relative permittivity of the far-side medium.
    #[arg(long)]
    er2: Option<f64>,

    /// Relative permeability of the far-side medium.
    #[arg(long)]
    mur2: Option<f64>,

    /// Conductivity of the far-side medium in S/m.
    #[arg(long)]
    sigma2: Option<f64>,

    /// Number of incidence angles in the reflectance sweep.
    #[arg(long)]
    sweep: Option<usize>,

    /// Medium whose fields are sampled.
    #[arg(long, value_enum)]
    sample_medium: Option<SampledMedium>,

    /// Explicit number of field samples. Raised to the aliasing floor if too small.
    #[arg(long)]
    samples: Option<usize>,

    /// Output directory.
    #[arg(short, long)]
    output: Option<String>,
}

impl CliArgs {
    /// Overrides the loaded settings with any values given on the command line.
    pub fn apply(&self, config: &mut Settings) {
        if let Some(frequency) = self.frequency {
            config.frequency = frequency;
        }
        if let Some(amplitude) = self.amplitude {
            config.amplitude = amplitude;
        }
        if let Some(theta) = self.theta {
            config.theta_i = theta;
        }
        if let Some(pol) = self.pol {
            config.polarization = pol;
        }
        if self.pec {
            config.is_pec = true;
        }
        override_medium(
            &mut config.incident,
            self.regime1,
            self.er1,
            self.mur1,
            self.sigma1,
        );
        override_medium(
            &mut config.transmitted,
            self.regime2,
            self.er2,
            self.mur2,
            self.sigma2,
        );
        if let Some(sweep) = self.sweep {
            config.sweep_angles = sweep;
        }
        if let Some(medium) = self.sample_medium {
            config.sampler.medium = medium;
        }
        if let Some(samples) = self.samples {
            config.sampler.samples = Some(samples);
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
    }
}

fn override_medium(
    medium: &mut MediumSettings,
    regime: Option<Regime>,
    eps_r: Option<f64>,
    mu_r: Option<f64>,
    sigma: Option<f64>,
) {
    if let Some(regime) = regime {
        medium.regime = regime;
    }
    if let Some(eps_r) = eps_r {
        medium.eps_r = eps_r;
    }
    if let Some(mu_r) = mu_r {
        medium.mu_r = mu_r;
    }
    if let Some(sigma) = sigma {
        medium.sigma = sigma;
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Frequency: {:.6e} Hz
  - Amplitude: {:.6} V/m
  - Incidence: {:.4}° ({} polarization)
  - PEC termination: {}
  - Incident medium: {} (eps_r = {}, mu_r = {}, sigma = {})
  - Transmitted medium: {} (eps_r = {}, mu_r = {}, sigma = {})
  - Sweep angles: {}
",
            self.frequency,
            self.amplitude,
            self.theta_i,
            self.polarization,
            self.is_pec,
            self.incident.regime,
            self.incident.eps_r,
            self.incident.mu_r,
            self.incident.sigma,
            self.transmitted.regime,
            self.transmitted.eps_r,
            self.transmitted.mu_r,
            self.transmitted.sigma,
            self.sweep_angles,
        )
    }
}
