use anyhow::{Context, Result};
use barrelcraft_core::{CleanReason, CleanReport, GenerationReport, PathFailure, ResolvedConfig};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

pub fn display_path(path: &Path, cwd: &Path) -> String {
    pathdiff::diff_paths(path, cwd)
        .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let content =
        serde_json::to_string_pretty(data).context("Failed to serialize output to JSON")?;
    write_to_stdout(&content)
}

pub fn print_generation_summary(report: &GenerationReport, cwd: &Path, verbose: bool) {
    if report.results.is_empty() {
        println!("{}", "No barrel files generated.".yellow());
    } else {
        println!(
            "{} Generated {} barrel file(s):",
            "✅".green(),
            report.results.len().to_string().cyan()
        );
        for result in &report.results {
            println!(
                "  {} ({} exports)",
                display_path(&result.file_path, cwd).blue(),
                result.exports_count
            );
            if verbose {
                for line in result.content.lines() {
                    println!("      {}", line.dimmed());
                }
            }
        }
    }
    print_failures(&report.failures, cwd);
}

pub fn print_clean_summary(report: &CleanReport, cwd: &Path) {
    for candidate in &report.candidates {
        let reason = match candidate.reason {
            CleanReason::HeaderMatch => "generated".normal(),
            CleanReason::Forced => "forced".yellow(),
        };
        println!(
            "  {} {} ({})",
            "-".red(),
            display_path(&candidate.path, cwd).blue(),
            reason
        );
    }
    if report.dry_run {
        println!(
            "{} {} file(s) would be cleaned",
            "ℹ️".cyan(),
            report.cleaned_count().to_string().cyan()
        );
    } else {
        println!(
            "{} Cleaned {} old barrel file(s)",
            "✅".green(),
            report.cleaned_count().to_string().cyan()
        );
    }
    print_failures(&report.failures, cwd);
}

fn print_failures(failures: &[PathFailure], cwd: &Path) {
    for failure in failures {
        eprintln!(
            "{} {}: {}",
            "Failed:".red().bold(),
            display_path(&failure.path, cwd),
            failure.message
        );
    }
}

pub fn print_config_table(config: &ResolvedConfig, cwd: &Path) {
    println!();
    println!("{}", " Effective Configuration ".green().bold().underline());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Green),
        Cell::new("Value").fg(Color::Green),
    ]);

    let config_file = config
        .config_path
        .as_deref()
        .map(|p| display_path(p, cwd))
        .unwrap_or_else(|| "(none)".to_string());
    let header = config
        .header_comment
        .as_deref()
        .map(|h| format!("{:?}", h))
        .unwrap_or_else(|| "(none)".to_string());

    let rows: Vec<(&str, String)> = vec![
        ("Config file", config_file),
        ("Project root", config.project_root.display().to_string()),
        ("Extensions", config.extensions.join(", ")),
        ("Exclude", config.exclude_patterns.join(", ")),
        ("Subdirectories", config.include_subdirectories.to_string()),
        ("Sort exports", config.sort_exports.to_string()),
        ("Verbose", config.verbose.to_string()),
        ("Force", config.force.to_string()),
        ("Header", header),
    ];
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }
    println!("{table}");

    print_target_list("Targets", &config.normal_target_paths(), cwd);
    print_target_list("Force Generate", &config.forced_target_paths(), cwd);
    println!();
}

fn print_target_list(title: &str, paths: &[std::path::PathBuf], cwd: &Path) {
    println!(
        "{}",
        format!("\n--- {} ---", title).green().bold().underline()
    );
    if paths.is_empty() {
        println!("{}", "(None)".dimmed());
        return;
    }
    for path in paths {
        let marker = if path.is_dir() {
            "".normal()
        } else {
            " (missing)".yellow()
        };
        println!("- {}{}", display_path(path, cwd).cyan(), marker);
    }
}

fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
