//! Typed views over bvd data exports and drive configuration exports.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ccc_core::errors::{CccError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::extract::{extract_from_str, read_text, summary_from_str, with_path, BvdSummary};

/// Labels read from a bvd export (all `:`-delimited).
pub mod bvd_labels {
    /// Number of bvd readings averaged; also the header at line index 8.
    pub const AVERAGES: &str = "bvd averages";
    /// Identifier of resistor R1.
    pub const R1_INFO: &str = "R1 Info";
    /// Identifier of resistor R2.
    pub const R2_INFO: &str = "R2 Info";
    /// Turns-ratio correction in milliturns.
    pub const TURNS_CORRECTION: &str = "delta N1/NA (mTurns)";
    /// Reference voltage I2*R2.
    pub const I2R2: &str = "delta (I2*R2) (V)";
    /// Primary winding turns.
    pub const N1: &str = "N1 (Turns)";
    /// Secondary winding turns.
    pub const N2: &str = "N2 (Turns)";
    /// Auxiliary winding turns.
    pub const NA: &str = "NA (Turns)";
    /// Nominal value of R1.
    pub const R1_NOMINAL: &str = "R1 (Ohm)";
    /// Nominal value of R2.
    pub const R2_NOMINAL: &str = "R2 (Ohm)";
    /// Date the run finished.
    pub const STOP_DATE: &str = "stop date";
    /// Time the run finished.
    pub const STOP_TIME: &str = "stop time";
}

/// Labels read from a `cccdrive.cfg` export (all `=`-delimited).
pub mod drive_labels {
    /// Calibration mode flag.
    pub const CAL_MODE: &str = "cn_calmode 3";
    /// CN input short flag; TRUE means not a CN run.
    pub const CN_SHORT: &str = "cn_short 3";
    /// Range shunt code, decoded by the ratio crate.
    pub const RANGE_SHUNT: &str = "cn_rangeshunt 3";
}

/// Loaded export text with label lookups that report the file on failure.
#[derive(Debug, Clone)]
pub struct FieldSource {
    path: PathBuf,
    text: String,
    sep: &'static str,
}

impl FieldSource {
    /// Reads `path` for lookups delimited by `sep`.
    pub fn open(path: &Path, sep: &'static str) -> Result<Self, CccError> {
        Ok(Self::from_text(path, read_text(path)?, sep))
    }

    /// Wraps already-loaded text; `path` is only used in diagnostics.
    pub fn from_text(path: &Path, text: impl Into<String>, sep: &'static str) -> Self {
        Self {
            path: path.to_path_buf(),
            text: text.into(),
            sep,
        }
    }

    /// File the text came from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Value of `label`, or `None` when no line carries it.
    pub fn optional(&self, label: &str) -> Result<Option<String>, CccError> {
        extract_from_str(&self.text, label, self.sep).map_err(|err| with_path(err, &self.path))
    }

    /// Value of `label`; a missing label is a `Data` error.
    pub fn required(&self, label: &str) -> Result<String, CccError> {
        self.optional(label)?.ok_or_else(|| {
            CccError::Data(
                ErrorInfo::new("ccc_data.missing_field", format!("'{label}' not found"))
                    .with_context("label", label)
                    .with_context("path", self.path.display().to_string()),
            )
        })
    }

    /// Value of `label` converted with [`FromStr`].
    pub fn parse<T>(&self, label: &str) -> Result<T, CccError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.required(label)?;
        raw.parse().map_err(|err: T::Err| {
            CccError::Parse(
                ErrorInfo::new("ccc_data.field_value", format!("'{label}': {err}"))
                    .with_context("label", label)
                    .with_context("value", raw.as_str())
                    .with_context("path", self.path.display().to_string()),
            )
        })
    }

    /// Reads a `TRUE`/`FALSE` flag; `None` when the label is absent.
    pub fn flag(&self, label: &str) -> Result<Option<bool>, CccError> {
        match self.optional(label)? {
            None => Ok(None),
            Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(raw) => Err(CccError::Parse(
                ErrorInfo::new("ccc_data.flag", format!("'{label}' is not TRUE/FALSE"))
                    .with_context("value", raw)
                    .with_context("path", self.path.display().to_string()),
            )),
        }
    }
}

/// Everything the ratio calculation needs from one bvd export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BvdFile {
    /// Source file.
    pub path: PathBuf,
    /// Number of bvd readings averaged.
    pub averages: u32,
    /// Identifier of R1.
    pub r1_name: String,
    /// Identifier of R2.
    pub r2_name: String,
    /// Turns-ratio correction as exported, in milliturns.
    pub k_mturns: f64,
    /// Reference voltage I2*R2, in volts.
    pub i2r2: f64,
    /// Primary winding turns.
    pub n1: u32,
    /// Secondary winding turns.
    pub n2: u32,
    /// Auxiliary winding turns.
    pub na: u32,
    /// Nominal R1, in ohms.
    pub r1_nominal: f64,
    /// Nominal R2, in ohms.
    pub r2_nominal: f64,
    /// Date the run finished, when exported.
    pub stop_date: Option<String>,
    /// Time the run finished, when exported.
    pub stop_time: Option<String>,
    /// Trailing average row.
    pub summary: BvdSummary,
}

impl BvdFile {
    /// Reads and parses a bvd export.
    pub fn load(path: &Path) -> Result<Self, CccError> {
        Self::from_source(&FieldSource::open(path, ":")?)
    }

    /// Builds the record from `:`-delimited text.
    pub fn from_source(source: &FieldSource) -> Result<Self, CccError> {
        let summary =
            summary_from_str(source.text()).map_err(|err| with_path(err, source.path()))?;
        Ok(Self {
            path: source.path().to_path_buf(),
            averages: source.parse(bvd_labels::AVERAGES)?,
            r1_name: source.required(bvd_labels::R1_INFO)?,
            r2_name: source.required(bvd_labels::R2_INFO)?,
            k_mturns: source.parse(bvd_labels::TURNS_CORRECTION)?,
            i2r2: source.parse(bvd_labels::I2R2)?,
            n1: source.parse(bvd_labels::N1)?,
            n2: source.parse(bvd_labels::N2)?,
            na: source.parse(bvd_labels::NA)?,
            r1_nominal: source.parse(bvd_labels::R1_NOMINAL)?,
            r2_nominal: source.parse(bvd_labels::R2_NOMINAL)?,
            stop_date: source.optional(bvd_labels::STOP_DATE)?,
            stop_time: source.optional(bvd_labels::STOP_TIME)?,
            summary,
        })
    }
}

/// Bridge drive settings relevant to run selection and the ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Source file.
    pub path: PathBuf,
    /// `cn_calmode`, when present.
    pub cal_mode: Option<bool>,
    /// `cn_short`, when present.
    pub cn_short: Option<bool>,
    /// Single-character range shunt code.
    pub range_shunt: Option<String>,
}

impl DriveConfig {
    /// Reads and parses a `cccdrive.cfg` export.
    pub fn load(path: &Path) -> Result<Self, CccError> {
        Self::from_source(&FieldSource::open(path, "=")?)
    }

    /// Builds the record from `=`-delimited text.
    pub fn from_source(source: &FieldSource) -> Result<Self, CccError> {
        Ok(Self {
            path: source.path().to_path_buf(),
            cal_mode: source.flag(drive_labels::CAL_MODE)?,
            cn_short: source.flag(drive_labels::CN_SHORT)?,
            range_shunt: source.optional(drive_labels::RANGE_SHUNT)?,
        })
    }

    /// True unless calibration mode is explicitly off or the CN input is shorted.
    pub fn is_cn_calibration(&self) -> bool {
        self.cal_mode != Some(false) && self.cn_short != Some(true)
    }
}
