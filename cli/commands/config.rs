use crate::cli_args::{ConfigArgs, OutputFormat};
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use barrelcraft_core::BarrelConfig;
use std::env;

pub fn handle_config_command(args: ConfigArgs) -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let options = BarrelConfig {
        config_file: args.config_file.config,
        disable_config_file: args.config_file.no_config,
        ..BarrelConfig::default()
    };
    let config = load_config_for_command(&options, &cwd, &cwd)?;

    match args.format {
        OutputFormat::Json => output::print_json(&config)?,
        OutputFormat::Text => output::print_config_table(&config, &cwd),
    }
    Ok(())
}
