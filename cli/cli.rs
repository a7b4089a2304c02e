mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use barrelcraft_core::{AppError, BarrelConfig, ResolvedConfig};
use clap::{CommandFactory, Parser};
use colored::*;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands};

const EXIT_PARTIAL_FAILURE: i32 = 2;

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;
    let verbose = cli_args.verbose;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet, verbose) {
        Ok(code) => {
            log::info!("Application finished with code {}.", code);
            code
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AppError>() {
        Some(e) if e.is_config_error() => 1,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::DirectoryNotFound(_))
        | Some(AppError::Io(_))
        | Some(AppError::DirRead { .. })
        | Some(AppError::FileRead { .. })
        | Some(AppError::FileWrite { .. })
        | Some(AppError::FileRemove { .. })
        | Some(AppError::Walk(_)) => 2,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool, verbose: u8) -> Result<i32> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(0);
    };

    let clean_run = match command {
        Commands::Generate(args) => {
            log::debug!("Executing 'generate' command...");
            commands::generate::handle_generate_command(args, quiet, verbose)?
        }
        Commands::Clean(args) => {
            log::debug!("Executing 'clean' command...");
            commands::clean::handle_clean_command(args, quiet)?
        }
        Commands::Init(args) => {
            log::debug!("Executing 'init' command...");
            commands::init::handle_init_command(args, quiet)?;
            true
        }
        Commands::Config(args) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(args)?;
            true
        }
        Commands::Completion(args) => {
            log::debug!("Executing 'completion' command...");
            commands::completion::handle_completion_command(&args, quiet)?;
            true
        }
    };
    Ok(if clean_run { 0 } else { EXIT_PARTIAL_FAILURE })
}

pub fn load_config_for_command(
    options: &BarrelConfig,
    start_dir: &Path,
    cwd: &Path,
) -> Result<ResolvedConfig> {
    let loaded = options
        .locate_file_config(start_dir, cwd)
        .context("Failed to load configuration")?;
    match &loaded {
        Some(l) => log::info!("Using config file: {}", l.path.display()),
        None => log::info!("No config file found, using command line options."),
    }
    Ok(ResolvedConfig::resolve(options, loaded.as_ref(), cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn config_errors_exit_with_one() {
        let err = anyhow::Error::new(AppError::ConfigurationMissing);
        assert_eq!(exit_code_for(&err), 1);
        let err = anyhow::Error::new(AppError::Glob("bad".into())).context("while loading");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn filesystem_errors_exit_with_two() {
        let err = anyhow::Error::new(AppError::DirectoryNotFound(PathBuf::from("/nope")));
        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn invalid_arguments_exit_with_five() {
        let err = anyhow::Error::new(AppError::InvalidArgument("powershell".into()));
        assert_eq!(exit_code_for(&err), 5);
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
