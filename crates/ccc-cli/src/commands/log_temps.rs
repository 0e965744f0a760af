use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use ccc_core::CccError;
use ccc_temp::{
    read_channels, run_logger, CsvLog, Instrument, LoggerConfig, SystemClock, TcpInstrument,
    TIME_FORMAT,
};
use clap::Args;
use log::info;

use super::prompt;

#[derive(Args, Debug)]
pub struct LogTempsArgs {
    /// YAML logger configuration; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Instrument address (host:port or TCPIP0::host::port::SOCKET).
    #[arg(long)]
    pub address: Option<String>,
    /// Comma separated channel list, e.g. A,B,C1,C2.
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,
    /// Number of logging cycles.
    #[arg(long)]
    pub iterations: Option<u32>,
    /// Seconds between cycles.
    #[arg(long)]
    pub interval_secs: Option<f64>,
    /// Milliseconds to wait after each channel query.
    #[arg(long)]
    pub query_delay_ms: Option<u64>,
    /// CSV file to append readings to.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// I/O timeout for each instrument exchange, in seconds.
    #[arg(long, default_value_t = 5.0)]
    pub timeout_secs: f64,
}

impl LogTempsArgs {
    /// File configuration (or defaults) with command-line overrides applied.
    pub fn logger_config(&self) -> Result<LoggerConfig, CccError> {
        let mut config = match &self.config {
            Some(path) => LoggerConfig::load(path)?,
            None => LoggerConfig::default(),
        };
        if let Some(address) = &self.address {
            config.address = Some(address.clone());
        }
        if let Some(channels) = &self.channels {
            config.channels = channels.iter().map(|ch| ch.trim().to_string()).collect();
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(interval) = self.interval_secs {
            config.interval_secs = interval;
        }
        if let Some(delay) = self.query_delay_ms {
            config.query_delay_ms = delay;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(not(feature = "visa"))]
fn prompt_address() -> Result<String, CccError> {
    prompt::stdin_line("Enter instrument address (host:port or TCPIP0::host::port::SOCKET): ")
}

#[cfg(feature = "visa")]
fn prompt_address() -> Result<String, CccError> {
    let resources = ccc_temp::list_resources()?;
    println!("Available GPIB devices:\n{resources:?}");
    prompt::stdin_line("select GPIB device: ")
}

#[cfg(not(feature = "visa"))]
fn open_instrument(address: &str, timeout: Duration) -> Result<Box<dyn Instrument>, CccError> {
    Ok(Box::new(TcpInstrument::connect(address, timeout)?))
}

#[cfg(feature = "visa")]
fn open_instrument(address: &str, timeout: Duration) -> Result<Box<dyn Instrument>, CccError> {
    if ccc_temp::parse_socket_address(address).is_ok() {
        return Ok(Box::new(TcpInstrument::connect(address, timeout)?));
    }
    Ok(Box::new(ccc_temp::VisaInstrument::open(address, timeout)?))
}

pub fn run(args: &LogTempsArgs) -> Result<(), Box<dyn Error>> {
    let config = args.logger_config()?;
    let address = match &config.address {
        Some(address) => address.clone(),
        None => prompt_address()?,
    };
    let timeout = Duration::try_from_secs_f64(args.timeout_secs)?;
    let mut instrument = open_instrument(&address, timeout)?;
    let mut clock = SystemClock;

    println!("\nInitial test readings:\n");
    let readings = read_channels(
        instrument.as_mut(),
        &mut clock,
        &config.channels,
        config.query_delay(),
    )?;
    for reading in &readings {
        println!("{reading}");
    }

    let mut log = CsvLog::append_to(&config.output, &config.channels)?;
    println!("\nLogging to {}", config.output.display());
    let total = config.iterations;
    let summary = run_logger(
        instrument.as_mut(),
        &mut clock,
        &mut log,
        &config,
        |cycle, row| {
            let values: Vec<String> = row.readings.iter().map(|r| r.kelvin.to_string()).collect();
            println!(
                "[{cycle}/{total}] {}  {}",
                row.timestamp.format(TIME_FORMAT),
                values.join("  ")
            );
        },
    )?;
    info!("finished after {} cycles", summary.cycles);
    Ok(())
}
