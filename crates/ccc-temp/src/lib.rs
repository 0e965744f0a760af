#![deny(missing_docs)]
//! Polling of a temperature controller into an appended CSV log.
//!
//! Readings are taken with `KRDG? <channel>` over any [`Instrument`]
//! transport. Time and pauses come from a [`Clock`] so that runs can be
//! replayed without waiting.

pub mod clock;
pub mod config;
pub mod csv_log;
pub mod instrument;
pub mod poll;
#[cfg(feature = "visa")]
pub mod visa;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LoggerConfig;
pub use csv_log::{header, CsvLog, TIME_FORMAT};
pub use instrument::{parse_socket_address, Instrument, ScriptedInstrument, TcpInstrument};
pub use poll::{
    query_command, read_channel, read_channels, run_logger, ChannelReading, CycleReading,
    LogSummary,
};
#[cfg(feature = "visa")]
pub use visa::{list_resources, VisaInstrument};
