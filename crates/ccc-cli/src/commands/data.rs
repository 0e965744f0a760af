use std::path::{Path, PathBuf};

use ccc_core::errors::{CccError, ErrorInfo};
use ccc_data::list_data_dirs;
use clap::Args;

use super::prompt;

/// Location of the bridge export tree.
#[derive(Args, Debug, Clone)]
pub struct RootArgs {
    /// Root directory holding one sub-directory per measurement day.
    #[arg(long, env = "CCC_DATA_ROOT")]
    pub root: Option<PathBuf>,
}

impl RootArgs {
    pub fn require_root(&self) -> Result<&Path, CccError> {
        let root = self.root.as_deref().ok_or_else(|| {
            CccError::Config(
                ErrorInfo::new("ccc_cli.root", "no data root given")
                    .with_hint("pass --root or set CCC_DATA_ROOT"),
            )
        })?;
        if !root.is_dir() {
            return Err(CccError::Config(
                ErrorInfo::new("ccc_cli.root", "data root is not a directory")
                    .with_context("path", root.display().to_string()),
            ));
        }
        Ok(root)
    }
}

/// A data root plus an optional day directory inside it.
#[derive(Args, Debug, Clone)]
pub struct DataDirArgs {
    #[command(flatten)]
    pub root: RootArgs,
    /// Day directory under the root; prompted for when omitted.
    #[arg(long)]
    pub dir: Option<String>,
}

impl DataDirArgs {
    /// Returns the selected day directory, listing the candidates and
    /// prompting when `--dir` was not given.
    pub fn resolve(&self) -> Result<PathBuf, CccError> {
        let root = self.root.require_root()?;
        let name = match &self.dir {
            Some(dir) => dir.clone(),
            None => {
                print_data_dirs(&list_data_dirs(root)?);
                prompt::stdin_line("Enter directory: ")?
            }
        };
        let path = root.join(&name);
        if !path.is_dir() {
            return Err(CccError::Config(
                ErrorInfo::new("ccc_cli.dir", format!("data directory {name} not found"))
                    .with_context("root", root.display().to_string()),
            ));
        }
        Ok(path)
    }
}

pub fn print_data_dirs(dirs: &[String]) {
    println!("\nAvailable data directories:");
    for dir in dirs {
        println!("{dir}");
    }
}
