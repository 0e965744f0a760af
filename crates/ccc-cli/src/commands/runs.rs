use std::error::Error;
use std::path::{Path, PathBuf};

use ccc_core::CccError;
use ccc_data::{require_eligible, scan_eligible, EligibleRun, RunTable};
use clap::Args;

use super::data::DataDirArgs;
use crate::write_json;

#[derive(Args, Debug)]
pub struct RunsArgs {
    #[command(flatten)]
    pub data: DataDirArgs,
    /// Also write the eligible runs as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Groups the exports in `dir`, prints the runs fit for processing and
/// fails when there are none.
pub fn list_eligible(dir: &Path) -> Result<(RunTable, Vec<EligibleRun>), CccError> {
    let table = RunTable::from_dir(dir)?;
    let eligible = scan_eligible(dir, &table)?;
    println!("\nAvailable runs:");
    for run in &eligible {
        println!("Run number {}:\t\t{}", run.run_number, run.describe());
    }
    require_eligible(dir, &eligible)?;
    Ok((table, eligible))
}

pub fn run(args: &RunsArgs) -> Result<(), Box<dyn Error>> {
    let dir = args.data.resolve()?;
    let (_, eligible) = list_eligible(&dir)?;
    if let Some(path) = &args.json {
        write_json(path, &eligible)?;
    }
    Ok(())
}
