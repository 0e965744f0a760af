//! Assembling a ratio calculation from parsed exports into a report.

use std::path::Path;

use ccc_core::errors::{CccError, ErrorInfo};
use ccc_core::{UReal, UncertainReal};
use ccc_data::records::drive_labels;
use ccc_data::{file_sha256, BvdFile, DriveConfig};
use log::info;
use serde::{Deserialize, Serialize};

use crate::ratio::{compute_ratio, deviation_from_nominal, RatioInputs};
use crate::turns::{resolve_k_mturns, turns_correction};

/// Optional modelling choices for a ratio calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioOptions {
    /// Standard uncertainty of I2*R2; exact when `None`.
    pub i2r2_uncertainty: Option<f64>,
}

/// Value, standard uncertainty and effective degrees of freedom.
///
/// `dof` is `None` when the degrees of freedom are infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySummary {
    /// Best estimate.
    pub value: f64,
    /// Standard uncertainty.
    pub uncertainty: f64,
    /// Effective degrees of freedom.
    pub dof: Option<f64>,
}

impl QuantitySummary {
    /// Snapshot of an uncertain number.
    pub fn of(quantity: &UReal) -> Self {
        let dof = quantity.df();
        Self {
            value: quantity.x(),
            uncertainty: quantity.u(),
            dof: dof.is_finite().then_some(dof),
        }
    }
}

/// Contribution of one input to the ratio uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Input label, e.g. `bvd` or `k`.
    pub label: String,
    /// Signed uncertainty component of the ratio.
    pub component: f64,
}

/// Serialisable record of one ratio calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    /// Identifier of R1.
    pub r1_name: String,
    /// Identifier of R2.
    pub r2_name: String,
    /// Name of the bvd export.
    pub bvd_file: String,
    /// Name of the drive config export.
    pub cfg_file: String,
    /// Hex SHA-256 of the bvd export.
    pub bvd_sha256: String,
    /// Hex SHA-256 of the drive config export.
    pub cfg_sha256: String,
    /// Date the run finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
    /// Time the run finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_time: Option<String>,
    /// Primary winding turns.
    pub n1: u32,
    /// Secondary winding turns.
    pub n2: u32,
    /// Auxiliary winding turns.
    pub na: u32,
    /// Turns correction used, in milliturns.
    pub k_mturns: f64,
    /// True when the correction was entered by hand.
    pub k_manual: bool,
    /// Raw `cn_rangeshunt` code.
    pub range_shunt_code: String,
    /// Averaged bridge voltage difference.
    pub bvd: QuantitySummary,
    /// Turns-ratio correction.
    pub k: QuantitySummary,
    /// Measured R1/R2.
    pub ratio: QuantitySummary,
    /// Nominal R1/R2.
    pub nominal_ratio: f64,
    /// Relative deviation of the ratio from nominal.
    pub deviation: QuantitySummary,
    /// Uncertainty budget of the ratio, largest first.
    pub budget: Vec<BudgetEntry>,
}

/// Uncertain intermediates alongside the report built from them.
#[derive(Debug, Clone)]
pub struct RatioCalculation {
    /// Averaged bridge voltage difference.
    pub bvd: UReal,
    /// Turns-ratio correction.
    pub k: UReal,
    /// Measured R1/R2.
    pub ratio: UReal,
    /// Relative deviation from nominal.
    pub deviation: UReal,
    /// Serialisable summary.
    pub report: RatioReport,
}

/// Runs the full ratio pipeline for one bvd export and its drive config.
///
/// `recover` supplies a milliturn value when the exported turns correction
/// is exactly zero.
pub fn calculate<F>(
    bvd_file: &BvdFile,
    drive: &DriveConfig,
    options: &RatioOptions,
    recover: F,
) -> Result<RatioCalculation, CccError>
where
    F: FnOnce() -> Result<f64, CccError>,
{
    let range_code = drive.range_shunt.as_deref().ok_or_else(|| {
        CccError::Data(
            ErrorInfo::new("ccc_data.missing_field", "range shunt code not found")
                .with_context("label", drive_labels::RANGE_SHUNT)
                .with_context("path", drive.path.display().to_string()),
        )
    })?;
    let (k_mturns, k_manual) = resolve_k_mturns(bvd_file.k_mturns, recover)?;

    let bvd_dof = f64::from(bvd_file.averages.saturating_sub(1));
    let bvd = UReal::new(
        bvd_file.summary.value,
        bvd_file.summary.std_dev,
        bvd_dof,
        "bvd",
    )
    .map_err(|err| err.with_context("path", bvd_file.path.display().to_string()))?;
    let k = turns_correction(k_mturns, range_code)?;
    let i2r2 = match options.i2r2_uncertainty {
        Some(u) if u > 0.0 => UReal::new(bvd_file.i2r2, u, f64::INFINITY, "I2R2")?,
        _ => UReal::constant(bvd_file.i2r2).labelled("I2R2"),
    };

    let ratio = compute_ratio(&RatioInputs {
        n1: bvd_file.n1,
        n2: bvd_file.n2,
        na: bvd_file.na,
        k: k.clone(),
        bvd: bvd.clone(),
        i2r2: i2r2.clone(),
    })?;
    let deviation = deviation_from_nominal(&ratio, bvd_file.r1_nominal, bvd_file.r2_nominal)?;
    info!(
        "ratio {}/{} = {:.12} +/- {:e}",
        bvd_file.r1_name,
        bvd_file.r2_name,
        ratio.x(),
        ratio.u()
    );

    let budget = [&bvd, &k, &i2r2]
        .into_iter()
        .filter(|input| !input.is_exact())
        .map(|input| BudgetEntry {
            label: input.label().unwrap_or("input").to_string(),
            component: ratio.component_of(input),
        })
        .collect();

    let report = RatioReport {
        r1_name: bvd_file.r1_name.clone(),
        r2_name: bvd_file.r2_name.clone(),
        bvd_file: file_name(&bvd_file.path),
        cfg_file: file_name(&drive.path),
        bvd_sha256: file_sha256(&bvd_file.path)?,
        cfg_sha256: file_sha256(&drive.path)?,
        stop_date: bvd_file.stop_date.clone(),
        stop_time: bvd_file.stop_time.clone(),
        n1: bvd_file.n1,
        n2: bvd_file.n2,
        na: bvd_file.na,
        k_mturns,
        k_manual,
        range_shunt_code: range_code.to_string(),
        bvd: QuantitySummary::of(&bvd),
        k: QuantitySummary::of(&k),
        ratio: QuantitySummary::of(&ratio),
        nominal_ratio: bvd_file.r1_nominal / bvd_file.r2_nominal,
        deviation: QuantitySummary::of(&deviation),
        budget,
    };
    Ok(RatioCalculation {
        bvd,
        k,
        ratio,
        deviation,
        report,
    })
}

/// Loads both exports of a run and calculates its ratio.
pub fn calculate_files<F>(
    bvd_path: &Path,
    cfg_path: &Path,
    options: &RatioOptions,
    recover: F,
) -> Result<RatioCalculation, CccError>
where
    F: FnOnce() -> Result<f64, CccError>,
{
    let bvd_file = BvdFile::load(bvd_path)?;
    let drive = DriveConfig::load(cfg_path)?;
    calculate(&bvd_file, &drive, options, recover)
}

/// Pretty-printed JSON rendering of a report.
pub fn report_to_json(report: &RatioReport) -> Result<String, CccError> {
    serde_json::to_string_pretty(report)
        .map_err(|err| CccError::Io(ErrorInfo::new("ccc_ratio.report_json", err.to_string())))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
