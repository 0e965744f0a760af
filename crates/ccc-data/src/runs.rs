//! Grouping of a day's export files into runs and run eligibility.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ccc_core::errors::{CccError, ErrorInfo};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::filename::parse_filename;
use crate::records::{bvd_labels, DriveConfig, FieldSource};

/// Files belonging to one run number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run number token shared by the files.
    pub run_number: String,
    /// Name of the bvd export, when present.
    pub bvd_file: Option<String>,
    /// Name of the drive config export, when present.
    pub cfg_file: Option<String>,
}

impl RunRecord {
    /// True when both exports are present.
    pub fn is_complete(&self) -> bool {
        self.bvd_file.is_some() && self.cfg_file.is_some()
    }
}

/// Runs keyed by run-number token, ordered by run number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTable {
    runs: BTreeMap<String, RunRecord>,
}

impl RunTable {
    /// Groups a flat list of filenames by run number.
    ///
    /// Non-conforming names are skipped; names with an unrecognised type
    /// still register their run but fill neither slot.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut runs: BTreeMap<String, RunRecord> = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let Some(parsed) = parse_filename(name) else {
                debug!("skipping non-run file {name}");
                continue;
            };
            let record = runs
                .entry(parsed.run_number.clone())
                .or_insert_with(|| RunRecord {
                    run_number: parsed.run_number.clone(),
                    ..RunRecord::default()
                });
            if parsed.is_bvd() {
                record.bvd_file = Some(name.to_string());
            } else if parsed.is_drive_config() {
                record.cfg_file = Some(name.to_string());
            }
        }
        Self { runs }
    }

    /// Lists the regular files directly inside `dir` and groups them.
    pub fn from_dir(dir: &Path) -> Result<Self, CccError> {
        let mut names = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| CccError::io("ccc_data.list_dir", dir, err))?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(Self::from_names(names))
    }

    /// Looks up a run by its number token.
    pub fn get(&self, run_number: &str) -> Option<&RunRecord> {
        self.runs.get(run_number)
    }

    /// Runs in run-number order.
    pub fn iter(&self) -> impl Iterator<Item = &RunRecord> {
        self.runs.values()
    }

    /// Number of runs, complete or not.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// True when no run-like file was found.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// A complete run that passed the calibration-mode checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleRun {
    /// Run number token.
    pub run_number: String,
    /// Full path of the bvd export.
    pub bvd_path: PathBuf,
    /// Full path of the drive config export.
    pub cfg_path: PathBuf,
    /// Calibration mode flag as read.
    pub cal_mode: Option<bool>,
    /// Number of bvd readings averaged.
    pub averages: u32,
}

impl EligibleRun {
    /// One-line reason the run was accepted.
    pub fn describe(&self) -> String {
        let cal_mode = match self.cal_mode {
            Some(true) => "TRUE",
            Some(false) => "FALSE",
            None => "unset",
        };
        format!(
            "calmode = {cal_mode}, CN mode is ON, n_bvd is non-zero ({}).",
            self.averages
        )
    }
}

/// Resolves the bvd and config paths of `run_number` inside `dir`.
pub fn resolve_run(
    dir: &Path,
    table: &RunTable,
    run_number: &str,
) -> Result<(PathBuf, PathBuf), CccError> {
    let record = table.get(run_number).ok_or_else(|| {
        CccError::Data(
            ErrorInfo::new("ccc_data.unknown_run", format!("run {run_number} not found"))
                .with_context("dir", dir.display().to_string()),
        )
    })?;
    match (&record.bvd_file, &record.cfg_file) {
        (Some(bvd), Some(cfg)) => Ok((dir.join(bvd), dir.join(cfg))),
        _ => Err(CccError::Data(
            ErrorInfo::new(
                "ccc_data.incomplete_run",
                format!("run {run_number} lacks a bvd or config file"),
            )
            .with_context("dir", dir.display().to_string()),
        )),
    }
}

/// Checks every complete run in `table` and keeps those recorded in CN
/// calibration mode with at least one bvd average.
///
/// A run whose flags or averages cannot be read is logged and skipped; I/O
/// failures still abort the scan.
pub fn scan_eligible(dir: &Path, table: &RunTable) -> Result<Vec<EligibleRun>, CccError> {
    let mut eligible = Vec::new();
    for record in table.iter() {
        let (Some(bvd), Some(cfg)) = (&record.bvd_file, &record.cfg_file) else {
            warn!("run {} is missing its bvd or config file", record.run_number);
            continue;
        };
        let bvd_path = dir.join(bvd);
        let cfg_path = dir.join(cfg);
        let checked = DriveConfig::load(&cfg_path).and_then(|drive| {
            let averages: u32 = FieldSource::open(&bvd_path, ":")?.parse(bvd_labels::AVERAGES)?;
            Ok((drive, averages))
        });
        let (drive, averages) = match checked {
            Ok(fields) => fields,
            Err(err @ (CccError::Parse(_) | CccError::Data(_))) => {
                warn!("run {} skipped: {err}", record.run_number);
                continue;
            }
            Err(err) => return Err(err),
        };
        if !drive.is_cn_calibration() || averages == 0 {
            debug!(
                "run {} skipped: calmode={:?} cn_short={:?} averages={averages}",
                record.run_number, drive.cal_mode, drive.cn_short
            );
            continue;
        }
        eligible.push(EligibleRun {
            run_number: record.run_number.clone(),
            bvd_path,
            cfg_path,
            cal_mode: drive.cal_mode,
            averages,
        });
    }
    Ok(eligible)
}

/// Fails when no run is eligible for processing.
pub fn require_eligible(dir: &Path, runs: &[EligibleRun]) -> Result<(), CccError> {
    if runs.is_empty() {
        return Err(CccError::Data(
            ErrorInfo::new("ccc_data.no_eligible_runs", "no suitable runs available")
                .with_context("dir", dir.display().to_string())
                .with_hint("runs need cn_calmode TRUE, cn_short FALSE and bvd averages > 0"),
        ));
    }
    Ok(())
}

/// Names of the dated data directories directly under `root`.
///
/// Entries containing a `.` are treated as files and left out.
pub fn list_data_dirs(root: &Path) -> Result<Vec<String>, CccError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| CccError::io("ccc_data.list_dir", root, err))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() && !name.contains('.') {
            dirs.push(name);
        }
    }
    dirs.sort();
    Ok(dirs)
}
