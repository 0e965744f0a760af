use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{ArgAction, Parser, Subcommand};
use commands::{
    dirs::{self, DirsArgs},
    log_temps::{self, LogTempsArgs},
    ratio::{self, RatioArgs},
    runs::{self, RunsArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ccc", about = "CCC bridge data processing and laboratory logging")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the day directories under the data root.
    Dirs(DirsArgs),
    /// List the runs in a day directory that are fit for processing.
    Runs(RunsArgs),
    /// Calculate the resistance ratio and its uncertainty for one run.
    Ratio(RatioArgs),
    /// Poll temperature controller channels into a CSV log.
    LogTemps(LogTempsArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Dirs(args) => dirs::run(&args),
        Command::Runs(args) => runs::run(&args),
        Command::Ratio(args) => ratio::run(&args),
        Command::LogTemps(args) => log_temps::run(&args),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

fn write_json<P: AsRef<Path>, T: serde::Serialize + ?Sized>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
