use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use itertools::Itertools;
use serde::Serialize;

use crate::field::FieldTrace;
use crate::problem::{InterfaceState, Solution};
use crate::propagation::PropagationConstants;
use crate::settings::Settings;
use crate::sweep::AngularSweep;


pub const REPORT_FILE: &str = "report.json";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const SWEEP_FILE: &str = "sweep.dat";
pub const FIELD_FILE: &str = "field.dat";

/// JSON summary of one solved scenario.
#[derive(Debug, Serialize)]
struct Report<'a> {
    timestamp: String,
    settings: &'a Settings,
    incident: &'a PropagationConstants,
    transmitted: &'a PropagationConstants,
    interface: &'a InterfaceState,
    /// Sampled angle of minimum P reflectance in the sweep, in degrees.
    sweep_minimum_deg: Option<f64>,
    field_samples: usize,
}

/// Writes every output file for `solution` into `directory`, creating it if needed.
pub fn write_all(settings: &Settings, solution: &Solution, directory: &Path) -> Result<()> {
    fs::create_dir_all(directory)
        .with_context(|| format!("creating output directory {:?}", directory))?;

    write_report(settings, solution, directory)?;
    write_settings(settings, directory)?;
    if let Some(sweep) = &solution.sweep {
        write_sweep(sweep, directory)?;
    }
    write_field(&solution.field, directory)?;

    log::info!("results written to {:?}", directory);
    Ok(())
}

/// Write the JSON report with the propagation constants and interface outcome.
pub fn write_report(settings: &Settings, solution: &Solution, directory: &Path) -> Result<()> {
    let report = Report {
        timestamp: Local::now().to_rfc3339(),
        settings,
        incident: &solution.incident,
        transmitted: &solution.transmitted,
        interface: &solution.interface,
        sweep_minimum_deg: solution.sweep.as_ref().and_then(AngularSweep::brewster_minimum),
        field_samples: solution.field.coordinate.len(),
    };

    let path = directory.join(REPORT_FILE);
    let file = File::create(&path).with_context(|| format!("creating {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write a TOML snapshot of the settings the run used, loadable with `--config`.
pub fn write_settings(settings: &Settings, directory: &Path) -> Result<()> {
    let path = directory.join(SETTINGS_FILE);
    let text = toml::to_string(settings).context("serializing settings")?;
    fs::write(&path, text).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}

/// Write the angular sweep as columns: theta R_s T_s R_p T_p tir
pub fn write_sweep(sweep: &AngularSweep, directory: &Path) -> Result<()> {
    let path = directory.join(SWEEP_FILE);
    let file = File::create(&path).with_context(|| format!("creating {:?}", path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# theta_deg R_s T_s R_p T_p tir")?;
    for i in 0..sweep.len() {
        let row = [
            sweep.theta_deg[i],
            sweep.r_s[i],
            sweep.t_s[i],
            sweep.r_p[i],
            sweep.t_p[i],
            flag(sweep.tir[i]),
        ];
        writeln!(writer, "{}", format_row(&row))?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the sampled field trace as columns: coordinate E H
pub fn write_field(trace: &FieldTrace, directory: &Path) -> Result<()> {
    let path = directory.join(FIELD_FILE);
    let file = File::create(&path).with_context(|| format!("creating {:?}", path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# coordinate E H")?;
    for ((coordinate, e), h) in trace.coordinate.iter().zip(trace.e.iter()).zip(trace.h.iter()) {
        writeln!(writer, "{}", format_row(&[*coordinate, *e, *h]))?;
    }
    writer.flush()?;

    Ok(())
}

fn format_row(values: &[f64]) -> String {
    values.iter().map(|v| format!("{:.10e}", v)).join(" ")
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
