use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::error::SolverError;
use crate::field::{FieldSampler, FieldTrace};
use crate::interface::{InterfaceResult, InterfaceSolver, UnpolarizedResult};
use crate::output;
use crate::propagation::PropagationConstants;
use crate::settings::Settings;
use crate::sweep::AngularSweep;

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::settings::load_default_config;

    #[test]
    fn default_scenario_solves() {
        let mut problem = Problem::new(load_default_config().unwrap()).unwrap();
        problem.solve().unwrap();
        let solution = problem.solution().unwrap();

        let InterfaceState::Solved { result, unpolarized } = &solution.interface else {
            panic!("interface should be solved, got {:?}", solution.interface);
        };
        assert_relative_eq!(result.theta_t_deg().unwrap(), 19.4712, epsilon = 1e-3);
        assert_relative_eq!(result.reflectance + result.transmittance, 1.0, epsilon = 1e-9);
        assert_relative_eq!(unpolarized.reflectance + unpolarized.transmittance, 1.0, epsilon = 1e-9);

        let sweep = solution.sweep.as_ref().unwrap();
        assert_eq!(sweep.len(), problem.settings().sweep_angles);
        assert!(solution.field.coordinate.len() >= 16);
    }

    #[test]
    fn writeup_produces_all_files() {
        let mut settings = load_default_config().unwrap();
        let dir = std::env::temp_dir().join(format!("planewave-writeup-{}", std::process::id()));
        settings.output_dir = dir.to_string_lossy().into_owned();

        let mut problem = Problem::new(settings).unwrap();
        problem.solve().unwrap();
        problem.writeup().unwrap();

        for file in [
            output::REPORT_FILE,
            output::SETTINGS_FILE,
            output::SWEEP_FILE,
            output::FIELD_FILE,
        ] {
            assert!(dir.join(file).is_file(), "missing {}", file);
        }

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join(output::REPORT_FILE)).unwrap())
                .unwrap();
        assert_eq!(report["interface"]["status"], "solved");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn writeup_before_solve_fails() {
        let problem = Problem::new(load_default_config().unwrap()).unwrap();
        assert!(problem.writeup().is_err());
    }

    #[test]
    fn degenerate_interface_is_disabled() {
        let err = SolverError::DegenerateMedium {
            polarization: crate::interface::Polarization::P,
            theta_i_deg: 0.0,
            eta1: 0.0,
            eta2: 0.0,
        };
        let state = InterfaceState::disabled(&err);
        assert!(!state.is_solved());
        assert!(matches!(state, InterfaceState::Disabled { ref reason } if reason.contains("degenerate")));
    }
}

/// Outcome of the interface analysis. A degenerate interface disables the
/// analysis rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InterfaceState {
    Solved {
        result: InterfaceResult,
        unpolarized: UnpolarizedResult,
    },
    Disabled {
        reason: String,
    },
}

impl InterfaceState {
    fn disabled(err: &SolverError) -> Self {
        log::warn!("interface analysis disabled: {}", err);
        InterfaceState::Disabled {
            reason: err.to_string(),
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, InterfaceState::Solved { .. })
    }
}

/// Everything computed for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub incident: PropagationConstants,
    pub transmitted: PropagationConstants,
    pub interface: InterfaceState,
    pub sweep: Option<AngularSweep>,
    /// Fields of the sampled medium over the configured domain.
    pub field: FieldTrace,
}

/// A single scenario: two media, an excitation and an incidence condition.
#[derive(Debug, Clone)]
pub struct Problem {
    settings: Settings,
    interface: InterfaceSolver,
    sampler: FieldSampler,
    solution: Option<Solution>,
}

impl Problem {
    pub fn new(settings: Settings) -> Result<Self> {
        let interface = settings.interface()?;
        let sampler = settings.sampler()?;
        Ok(Self {
            settings,
            interface,
            sampler,
            solution: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Runs the interface analysis, the angular sweep and the field sampling.
    pub fn solve(&mut self) -> Result<&Solution> {
        let theta_i = self.settings.theta_i;
        let polarization = self.settings.polarization;

        let interface = match self
            .interface
            .solve(theta_i, polarization)
            .and_then(|result| Ok((result, self.interface.unpolarized(theta_i)?)))
        {
            Ok((result, unpolarized)) => InterfaceState::Solved {
                result,
                unpolarized,
            },
            Err(err) if err.is_validation() => return Err(err.into()),
            Err(err) => InterfaceState::disabled(&err),
        };

        let sweep = if interface.is_solved() {
            match AngularSweep::compute(&self.interface, self.settings.sweep_angles) {
                Ok(sweep) => Some(sweep),
                Err(err) if err.is_validation() => return Err(err.into()),
                Err(err) => {
                    log::warn!("angular sweep skipped: {}", err);
                    None
                }
            }
        } else {
            None
        };

        let field = self.sampler.trace();
        log::debug!("sampled {} field points", field.coordinate.len());

        let solution: &Solution = self.solution.insert(Solution {
            incident: *self.interface.incident(),
            transmitted: *self.interface.transmitted(),
            interface,
            sweep,
            field,
        });
        Ok(solution)
    }

    /// Writes the solution to the configured output directory.
    pub fn writeup(&self) -> Result<()> {
        let solution = self
            .solution
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("problem has not been solved"))?;
        output::write_all(&self.settings, solution, Path::new(&self.settings.output_dir))
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.settings)?;
        let Some(solution) = &self.solution else {
            return writeln!(f, "(not solved)");
        };
        writeln!(f, "Incident medium:\n{}", solution.incident)?;
        writeln!(f, "Transmitted medium:\n{}", solution.transmitted)?;
        match &solution.interface {
            InterfaceState::Solved {
                result,
                unpolarized,
            } => {
                write!(f, "{}", result)?;
                writeln!(
                    f,
                    "  Unpolarized R/T:  {:.6} / {:.6}",
                    unpolarized.reflectance, unpolarized.transmittance
                )?;
            }
            InterfaceState::Disabled { reason } => {
                writeln!(f, "Interface disabled: {}", reason)?;
            }
        }
        if let Some(theta) = solution.sweep.as_ref().and_then(AngularSweep::brewster_minimum) {
            writeln!(f, "Sweep minimum of R_p: {:.2}°", theta)?;
        }
        writeln!(f, "Field samples: {}", solution.field.coordinate.len())
    }
}
