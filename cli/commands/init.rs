use crate::cli_args::InitArgs;
use crate::output::display_path;
use anyhow::{Context, Result};
use barrelcraft_core::write_default_config;
use colored::*;
use std::env;

pub fn handle_init_command(args: InitArgs, quiet: bool) -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let path = write_default_config(&cwd, args.force)?;
    if !quiet {
        println!(
            "{} Created {}",
            "✅".green(),
            display_path(&path, &cwd).blue()
        );
    }
    Ok(())
}
