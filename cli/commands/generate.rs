use crate::cli_args::{GenerateArgs, OutputFormat};
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use barrelcraft_core::{AppError, BarrelConfig, BarrelGenerator};
use std::env;

pub fn handle_generate_command(args: GenerateArgs, quiet: bool, verbose: u8) -> Result<bool> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let directory = cwd.join(&args.directory);
    if !directory.is_dir() {
        return Err(AppError::DirectoryNotFound(directory).into());
    }
    log::info!("Generation directory: {}", directory.display());

    let options = BarrelConfig {
        extensions: args.extensions,
        exclude_patterns: args.exclude,
        include_subdirectories: args.subdirectories,
        sort_exports: !args.no_sort,
        verbose: verbose > 0,
        header_comment: args.header,
        config_file: args.config_file.config,
        disable_config_file: args.config_file.no_config,
    };

    let config = load_config_for_command(&options, &directory, &cwd)?;
    let show_exports = config.verbose;

    let generator = BarrelGenerator::new(config).context("Invalid generation settings")?;
    let report = generator
        .generate(&directory)
        .context("Barrel generation failed")?;
    log::info!(
        "Generation finished: {} barrel(s), {} failure(s)",
        report.results.len(),
        report.failures.len()
    );

    match args.format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Text if !quiet => {
            output::print_generation_summary(&report, &cwd, show_exports)
        }
        OutputFormat::Text => {}
    }
    Ok(!report.has_failures())
}
