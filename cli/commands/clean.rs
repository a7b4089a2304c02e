use crate::cli_args::CleanArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use barrelcraft_core::{BarrelCleaner, BarrelConfig};
use colored::*;
use std::env;

pub fn handle_clean_command(args: CleanArgs, quiet: bool) -> Result<bool> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let options = BarrelConfig {
        config_file: args.config,
        ..BarrelConfig::default()
    };
    let config = load_config_for_command(&options, &cwd, &cwd)?;

    let cleaner = BarrelCleaner::from_config(&config, args.force)?;
    if cleaner.is_forced() && !quiet {
        println!(
            "{} Force clean: every index.ts / index.tsx under the targets is removed.",
            "⚠️".yellow()
        );
    }

    let report = cleaner.run(args.dry_run);
    if !quiet {
        output::print_clean_summary(&report, &cwd);
    }
    Ok(report.failures.is_empty())
}
