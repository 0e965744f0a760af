//! The polling loop.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use ccc_core::errors::{CccError, ErrorInfo};
use chrono::{DateTime, Local};
use log::{debug, info};

use crate::clock::Clock;
use crate::config::LoggerConfig;
use crate::csv_log::CsvLog;
use crate::instrument::Instrument;

/// Kelvin reading query understood by Lakeshore controllers.
pub fn query_command(channel: &str) -> String {
    format!("KRDG? {channel}")
}

/// One channel's temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReading {
    /// Controller input, e.g. `C1`.
    pub channel: String,
    /// Temperature in kelvin.
    pub kelvin: f64,
}

impl fmt::Display for ChannelReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} K", self.channel, self.kelvin)
    }
}

/// All channel readings taken in one cycle, sharing a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReading {
    /// Taken before the first query of the cycle.
    pub timestamp: DateTime<Local>,
    /// One per channel, in configured order.
    pub readings: Vec<ChannelReading>,
}

/// Outcome of a completed logging run.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSummary {
    /// Cycles written.
    pub cycles: u32,
    /// Timestamp of the first cycle.
    pub first: Option<DateTime<Local>>,
    /// Timestamp of the last cycle.
    pub last: Option<DateTime<Local>>,
}

/// Queries a single channel and parses the response as kelvin.
pub fn read_channel<I>(instrument: &mut I, channel: &str) -> Result<ChannelReading, CccError>
where
    I: Instrument + ?Sized,
{
    let response = instrument
        .query(&query_command(channel))
        .map_err(|err| err.with_context("channel", channel))?;
    let kelvin = response.trim().parse::<f64>().map_err(|err| {
        CccError::Instrument(
            ErrorInfo::new("ccc_temp.response", err.to_string())
                .with_context("channel", channel)
                .with_context("response", response.as_str())
                .with_context("resource", instrument.resource()),
        )
    })?;
    Ok(ChannelReading {
        channel: channel.to_string(),
        kelvin,
    })
}

/// Reads every channel in order, pausing `query_delay` after each query.
///
/// Used on its own for the test pass printed before logging starts.
pub fn read_channels<I, C>(
    instrument: &mut I,
    clock: &mut C,
    channels: &[String],
    query_delay: Duration,
) -> Result<Vec<ChannelReading>, CccError>
where
    I: Instrument + ?Sized,
    C: Clock + ?Sized,
{
    let mut readings = Vec::with_capacity(channels.len());
    for channel in channels {
        let reading = read_channel(instrument, channel)?;
        debug!("{reading}");
        readings.push(reading);
        clock.sleep(query_delay);
    }
    Ok(readings)
}

/// Runs `config.iterations` cycles, appending one CSV row per cycle.
///
/// `on_cycle` sees each row after it has been written. The cycle interval is
/// slept between cycles only, so a run of `n` cycles sleeps `n - 1` times.
pub fn run_logger<I, C, W, F>(
    instrument: &mut I,
    clock: &mut C,
    log: &mut CsvLog<W>,
    config: &LoggerConfig,
    mut on_cycle: F,
) -> Result<LogSummary, CccError>
where
    I: Instrument + ?Sized,
    C: Clock + ?Sized,
    W: Write,
    F: FnMut(u32, &CycleReading),
{
    config.validate()?;
    let interval = config.interval()?;
    if log.channels() != config.channels.as_slice() {
        return Err(CccError::Config(
            ErrorInfo::new("ccc_temp.channels", "CSV columns do not match configured channels")
                .with_context("columns", log.channels().join(","))
                .with_context("channels", config.channels.join(",")),
        ));
    }
    info!(
        "logging {} cycles of {} from {}",
        config.iterations,
        config.channels.join(","),
        instrument.resource()
    );

    let mut summary = LogSummary {
        cycles: 0,
        first: None,
        last: None,
    };
    for cycle in 1..=config.iterations {
        let timestamp = clock.now();
        let readings = read_channels(instrument, clock, &config.channels, config.query_delay())?;
        let row = CycleReading {
            timestamp,
            readings,
        };
        log.append(&row)?;
        on_cycle(cycle, &row);

        summary.cycles = cycle;
        summary.first.get_or_insert(timestamp);
        summary.last = Some(timestamp);
        if cycle < config.iterations {
            clock.sleep(interval);
        }
    }
    info!("logged {} cycles", summary.cycles);
    Ok(summary)
}
