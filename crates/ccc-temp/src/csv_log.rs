//! CSV output of the temperature logger.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use ccc_core::errors::{CccError, ErrorInfo};
use csv::WriterBuilder;
use log::debug;

use crate::poll::CycleReading;

/// Timestamp layout of the `Time` column.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row for the given channel order: `Time,A(K),B(K),...`.
/// Cells are joined with a bare comma, no trailing space.
pub fn header(channels: &[String]) -> Vec<String> {
    std::iter::once("Time".to_string())
        .chain(channels.iter().map(|ch| format!("{ch}(K)")))
        .collect()
}

fn wrap_csv(code: &str, err: csv::Error) -> CccError {
    CccError::Io(ErrorInfo::new(code, "CSV log failure").with_hint(err.to_string()))
}

/// Row-at-a-time CSV sink for temperature readings.
pub struct CsvLog<W: Write> {
    writer: csv::Writer<W>,
    channels: Vec<String>,
}

impl CsvLog<BufWriter<File>> {
    /// Opens `path` for appending; the header is written only when the file
    /// is new or empty.
    pub fn append_to(path: &Path, channels: &[String]) -> Result<Self, CccError> {
        let needs_header = fs::metadata(path).map(|meta| meta.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| CccError::io("ccc_temp.csv_open", path, err))?;
        debug!("appending to {} (header: {needs_header})", path.display());
        Self::from_writer(BufWriter::new(file), channels, needs_header)
    }
}

impl<W: Write> CsvLog<W> {
    /// Wraps `inner`, writing the header row first when asked.
    pub fn from_writer(inner: W, channels: &[String], write_header: bool) -> Result<Self, CccError> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        if write_header {
            writer
                .write_record(header(channels))
                .map_err(|err| wrap_csv("ccc_temp.csv_header", err))?;
            writer
                .flush()
                .map_err(|err| CccError::Io(ErrorInfo::new("ccc_temp.csv_flush", err.to_string())))?;
        }
        Ok(Self {
            writer,
            channels: channels.to_vec(),
        })
    }

    /// Writes one cycle and flushes it so partial runs keep their rows.
    pub fn append(&mut self, cycle: &CycleReading) -> Result<(), CccError> {
        if cycle.readings.len() != self.channels.len() {
            return Err(CccError::Data(
                ErrorInfo::new("ccc_temp.csv_row", "reading count does not match header")
                    .with_context("expected", self.channels.len().to_string())
                    .with_context("found", cycle.readings.len().to_string()),
            ));
        }
        let record = std::iter::once(cycle.timestamp.format(TIME_FORMAT).to_string())
            .chain(cycle.readings.iter().map(|reading| reading.kelvin.to_string()));
        self.writer
            .write_record(record)
            .map_err(|err| wrap_csv("ccc_temp.csv_row", err))?;
        self.writer
            .flush()
            .map_err(|err| CccError::Io(ErrorInfo::new("ccc_temp.csv_flush", err.to_string())))
    }

    /// Column order of the readings.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, CccError> {
        self.writer
            .into_inner()
            .map_err(|err| CccError::Io(ErrorInfo::new("ccc_temp.csv_flush", err.error().to_string())))
    }
}
