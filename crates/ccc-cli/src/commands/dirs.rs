use std::error::Error;

use ccc_data::list_data_dirs;
use clap::Args;

use super::data::{print_data_dirs, RootArgs};

#[derive(Args, Debug)]
pub struct DirsArgs {
    #[command(flatten)]
    pub root: RootArgs,
}

pub fn run(args: &DirsArgs) -> Result<(), Box<dyn Error>> {
    let root = args.root.require_root()?;
    print_data_dirs(&list_data_dirs(root)?);
    Ok(())
}
