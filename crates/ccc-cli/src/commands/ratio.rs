use std::error::Error;
use std::path::PathBuf;

use ccc_core::{format_general, UncertainReal};
use ccc_data::resolve_run;
use ccc_ratio::{calculate_files, RatioOptions};
use clap::Args;
use log::info;

use super::data::DataDirArgs;
use super::prompt;
use super::runs::list_eligible;
use crate::write_json;

#[derive(Args, Debug)]
pub struct RatioArgs {
    #[command(flatten)]
    pub data: DataDirArgs,
    /// Run number (e.g. 001); prompted for when omitted.
    #[arg(long)]
    pub run: Option<String>,
    /// Turns correction in milliturns, used when the export holds zero.
    #[arg(long)]
    pub k_mturns: Option<f64>,
    /// Standard uncertainty of I2*R2 in volts; exact when omitted.
    #[arg(long)]
    pub i2r2_unc: Option<f64>,
    /// Write the full ratio report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

pub fn run(args: &RatioArgs) -> Result<(), Box<dyn Error>> {
    let dir = args.data.resolve()?;
    let (table, _) = list_eligible(&dir)?;
    let run_number = match &args.run {
        Some(run) => run.clone(),
        None => prompt::stdin_line("Enter run number (xxx): ")?,
    };
    let (bvd_path, cfg_path) = resolve_run(&dir, &table, &run_number)?;
    println!("\nSelected bvd file: \t\t{}", display_name(&bvd_path));
    println!("Selected config file: \t{}", display_name(&cfg_path));
    info!("processing run {run_number} in {}", dir.display());

    let options = RatioOptions {
        i2r2_uncertainty: args.i2r2_unc,
    };
    let manual_k = args.k_mturns;
    let calc = calculate_files(&bvd_path, &cfg_path, &options, || match manual_k {
        Some(value) => Ok(value),
        None => prompt::stdin_f64("Missing k value! Enter mturns value manually: "),
    })?;

    let report = &calc.report;
    println!("bvd(CN run) = {:.2}", calc.bvd);
    println!("k = {}", calc.k);
    println!(
        "\nCalculated ratio {}/{} = {:.12} +/- {}, dof {:.1}",
        report.r1_name,
        report.r2_name,
        calc.ratio.x(),
        format_general(calc.ratio.u(), 2),
        calc.ratio.df()
    );
    println!(
        "Ratio deviation from nominal: {:.2e} +/- {:.2e}",
        calc.deviation.x(),
        calc.deviation.u()
    );
    for entry in &report.budget {
        println!("  u({}) contribution: {:.3e}", entry.label, entry.component);
    }

    if let Some(path) = &args.json {
        write_json(path, report)?;
        info!("wrote ratio report to {}", path.display());
    }
    Ok(())
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
