//! Export filename conventions of the bridge software.

use serde::{Deserialize, Serialize};

/// Type suffix of a bridge data export.
pub const BVD_SUFFIX: &str = "bvd.txt";
/// Type suffix of a bridge drive configuration export.
pub const DRIVE_CONFIG_SUFFIX: &str = "cccdrive.cfg";

/// Tokens embedded in an export filename such as `260203_001_1127_bvd.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFileName {
    /// Measurement date, `YYMMDD`.
    pub date: String,
    /// Zero-padded run number, e.g. `001`.
    pub run_number: String,
    /// Start time of the run, `HHMM`.
    pub time: String,
    /// Everything after the third underscore, empty when absent.
    pub kind: String,
}

impl RunFileName {
    /// True for a bvd data export.
    pub fn is_bvd(&self) -> bool {
        self.kind == BVD_SUFFIX
    }

    /// True for a drive configuration export.
    pub fn is_drive_config(&self) -> bool {
        self.kind == DRIVE_CONFIG_SUFFIX
    }
}

/// Splits an export filename into its date, run, time and type tokens.
///
/// Only `.txt` and `.cfg` names are considered; anything with fewer than
/// three underscore-separated parts or an empty run token yields `None`.
pub fn parse_filename(name: &str) -> Option<RunFileName> {
    if !(name.ends_with(".txt") || name.ends_with(".cfg")) {
        return None;
    }
    let mut parts = name.splitn(4, '_');
    let date = parts.next()?;
    let run_number = parts.next()?;
    let time = parts.next()?;
    let kind = parts.next().unwrap_or("");
    if run_number.is_empty() {
        return None;
    }
    Some(RunFileName {
        date: date.to_string(),
        run_number: run_number.to_string(),
        time: time.to_string(),
        kind: kind.to_string(),
    })
}
