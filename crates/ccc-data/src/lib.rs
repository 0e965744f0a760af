#![deny(missing_docs)]
//! Run grouping and field extraction for CCC bridge export files.

pub mod extract;
pub mod filename;
pub mod records;
pub mod runs;

pub use extract::{
    extract_bvd_summary, extract_from_str, extract_parameter, file_sha256, read_text,
    summary_from_str, BvdSummary, AVERAGES_LINE,
};
pub use filename::{parse_filename, RunFileName, BVD_SUFFIX, DRIVE_CONFIG_SUFFIX};
pub use records::{BvdFile, DriveConfig, FieldSource};
pub use runs::{
    list_data_dirs, require_eligible, resolve_run, scan_eligible, EligibleRun, RunRecord,
    RunTable,
};
