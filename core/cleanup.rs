use crate::barrel::is_barrel_file_name;
use crate::config::ResolvedConfig;
use crate::error::{AppError, Result};
use crate::generator::PathFailure;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const GENERATED_MARKER: &str = "auto-generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CleanReason {
    HeaderMatch,
    Forced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanCandidate {
    pub path: PathBuf,
    pub reason: CleanReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub candidates: Vec<CleanCandidate>,
    pub removed: usize,
    pub dry_run: bool,
    pub failures: Vec<PathFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanScan {
    pub candidates: Vec<CleanCandidate>,
    pub failures: Vec<PathFailure>,
}

#[derive(Debug, Clone)]
pub struct BarrelCleaner {
    targets: Vec<PathBuf>,
    expected_header: String,
    force: bool,
}

impl BarrelCleaner {
    pub fn from_config(config: &ResolvedConfig, force_flag: bool) -> Result<Self> {
        if !config.has_file_config() {
            return Err(AppError::ConfigurationMissing);
        }
        Ok(Self::new(
            config.all_target_paths(),
            config.header(),
            force_flag || config.force,
        ))
    }

    pub fn new(targets: Vec<PathBuf>, expected_header: &str, force: bool) -> Self {
        Self {
            targets,
            expected_header: expected_header.trim().to_string(),
            force,
        }
    }

    pub fn is_forced(&self) -> bool {
        self.force
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn scan(&self) -> CleanScan {
        let mut seen = HashSet::new();
        let mut scan = CleanScan::default();

        for target in &self.targets {
            if !target.is_dir() {
                log::debug!("Clean target does not exist, skipping: {}", target.display());
                continue;
            }
            log::info!("Scanning for generated barrels in: {}", target.display());

            let walker = WalkDir::new(target)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter();
            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e.path().unwrap_or(target.as_path()).to_path_buf();
                        let error = AppError::from(e);
                        log::warn!("Error walking directory: {}", error);
                        scan.failures.push(PathFailure {
                            path,
                            message: error.to_string(),
                        });
                        continue;
                    }
                };
                if !entry.file_type().is_file()
                    || !is_barrel_file_name(&entry.file_name().to_string_lossy())
                {
                    continue;
                }
                let Some(reason) = self.clean_reason(entry.path()) else {
                    log::trace!("Keeping {}", entry.path().display());
                    continue;
                };
                if seen.insert(entry.path().to_path_buf()) {
                    scan.candidates.push(CleanCandidate {
                        path: entry.path().to_path_buf(),
                        reason,
                    });
                }
            }
        }
        log::info!("Found {} barrel file(s) to clean", scan.candidates.len());
        scan
    }

    fn clean_reason(&self, path: &Path) -> Option<CleanReason> {
        if self.force {
            return Some(CleanReason::Forced);
        }
        match fs::read_to_string(path) {
            Ok(content) => header_matches(&content, &self.expected_header)
                .then_some(CleanReason::HeaderMatch),
            Err(e) => {
                log::debug!("Cannot read {}, keeping it: {}", path.display(), e);
                None
            }
        }
    }

    pub fn apply(&self, scan: CleanScan, dry_run: bool) -> CleanReport {
        let CleanScan {
            candidates,
            failures,
        } = scan;
        let mut report = CleanReport {
            dry_run,
            failures,
            ..CleanReport::default()
        };
        if dry_run {
            report.candidates = candidates;
            return report;
        }

        for candidate in &candidates {
            match fs::remove_file(&candidate.path) {
                Ok(()) => {
                    log::debug!("Removed {}", candidate.path.display());
                    report.removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::warn!("Already gone: {}", candidate.path.display());
                }
                Err(e) => {
                    let error = AppError::FileRemove {
                        path: candidate.path.clone(),
                        source: e,
                    };
                    log::warn!("{}", error);
                    report.failures.push(PathFailure {
                        path: candidate.path.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }
        report.candidates = candidates;
        report
    }

    pub fn run(&self, dry_run: bool) -> CleanReport {
        let scan = self.scan();
        self.apply(scan, dry_run)
    }
}

impl CleanReport {
    pub fn cleaned_count(&self) -> usize {
        if self.dry_run {
            self.candidates.len()
        } else {
            self.removed
        }
    }
}

fn normalize_comment(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix("//").unwrap_or(line).trim()
}

pub fn header_matches(content: &str, expected_header: &str) -> bool {
    let first_line = normalize_comment(content.lines().next().unwrap_or(""));
    let expected = normalize_comment(expected_header.trim().lines().next().unwrap_or(""));
    first_line.contains(GENERATED_MARKER) && (expected.is_empty() || first_line.contains(expected))
}
