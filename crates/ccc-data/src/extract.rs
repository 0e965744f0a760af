//! Label lookup and fixed-layout summary extraction for bridge export files.

use std::fs;
use std::path::Path;

use ccc_core::errors::{CccError, ErrorInfo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Zero-based line index holding the `bvd averages: <n>` header entry.
pub const AVERAGES_LINE: usize = 8;

/// Averaged bridge voltage difference read from the tail of a bvd file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BvdSummary {
    /// Number of averaged bvd readings (always positive).
    pub averages: u32,
    /// Averaged differential voltage.
    pub value: f64,
    /// Standard deviation of the averaged differential voltage.
    pub std_dev: f64,
}

/// Reads a text file, replacing invalid UTF-8 sequences.
pub fn read_text(path: &Path) -> Result<String, CccError> {
    let bytes = fs::read(path).map_err(|err| CccError::io("ccc_data.read", path, err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Hex-encoded SHA-256 digest of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String, CccError> {
    let bytes = fs::read(path).map_err(|err| CccError::io("ccc_data.read", path, err))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Returns the trimmed text to the right of `sep` on the first line of
/// `text` containing `label`, or `None` when no line contains it.
pub fn extract_from_str(text: &str, label: &str, sep: &str) -> Result<Option<String>, CccError> {
    let Some(line) = text.lines().find(|line| line.contains(label)) else {
        return Ok(None);
    };
    match line.split_once(sep) {
        Some((_, value)) => Ok(Some(value.trim().to_string())),
        None => Err(CccError::Parse(
            ErrorInfo::new(
                "ccc_data.separator",
                format!("line matching '{label}' has no '{sep}' separator"),
            )
            .with_context("label", label)
            .with_context("line", line.trim()),
        )),
    }
}

/// File-backed variant of [`extract_from_str`].
pub fn extract_parameter(path: &Path, label: &str, sep: &str) -> Result<Option<String>, CccError> {
    let text = read_text(path)?;
    extract_from_str(&text, label, sep).map_err(|err| with_path(err, path))
}

/// Parses the averages count and the trailing summary row of a bvd export.
///
/// Fails on a non-positive averages count before the trailing row is read.
pub fn summary_from_str(text: &str) -> Result<BvdSummary, CccError> {
    let lines: Vec<&str> = text.lines().collect();
    let header = lines.get(AVERAGES_LINE).ok_or_else(|| {
        CccError::Data(
            ErrorInfo::new("ccc_data.bvd_header", "file too short for bvd header")
                .with_context("lines", lines.len().to_string()),
        )
    })?;
    let raw_count = header
        .split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| {
            CccError::Parse(
                ErrorInfo::new("ccc_data.bvd_header", "averages line has no ':' separator")
                    .with_context("line", header.trim()),
            )
        })?;
    let count: i64 = raw_count.parse().map_err(|err| {
        CccError::Parse(
            ErrorInfo::new("ccc_data.bvd_averages", format!("invalid averages count: {err}"))
                .with_context("value", raw_count),
        )
    })?;
    if count <= 0 {
        return Err(CccError::Data(
            ErrorInfo::new("ccc_data.bvd_averages", "no bvd data available")
                .with_context("averages", count.to_string()),
        ));
    }

    let last = lines
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .copied()
        .unwrap_or_default();
    let fields: Vec<&str> = last.split_whitespace().collect();
    let value = summary_field(&fields, 2, last)?;
    let std_dev = summary_field(&fields, 3, last)?;
    Ok(BvdSummary {
        averages: u32::try_from(count).map_err(|err| {
            CccError::Parse(
                ErrorInfo::new("ccc_data.bvd_averages", err.to_string())
                    .with_context("value", raw_count),
            )
        })?,
        value,
        std_dev,
    })
}

/// File-backed variant of [`summary_from_str`].
pub fn extract_bvd_summary(path: &Path) -> Result<BvdSummary, CccError> {
    let text = read_text(path)?;
    summary_from_str(&text).map_err(|err| with_path(err, path))
}

fn summary_field(fields: &[&str], index: usize, line: &str) -> Result<f64, CccError> {
    let raw = fields.get(index).ok_or_else(|| {
        CccError::Data(
            ErrorInfo::new(
                "ccc_data.bvd_row",
                format!("summary row has no field {}", index + 1),
            )
            .with_context("line", line.trim()),
        )
    })?;
    raw.parse().map_err(|err| {
        CccError::Parse(
            ErrorInfo::new("ccc_data.bvd_row", format!("invalid summary value: {err}"))
                .with_context("value", *raw),
        )
    })
}

pub(crate) fn with_path(err: CccError, path: &Path) -> CccError {
    err.with_context("path", path.display().to_string())
}
