use crate::barrel::{
    BARREL_TS, BARREL_TSX, FileEntry, GenerationMode, GenerationResult, barrel_file_name,
    render_barrel, sort_exports,
};
use crate::config::ResolvedConfig;
use crate::eligibility::EligibilityFilter;
use crate::error::{AppError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub results: Vec<GenerationResult>,
    pub failures: Vec<PathFailure>,
}

impl GenerationReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record_failure(&mut self, path: &Path, error: AppError) {
        log::warn!("Skipping {}: {}", path.display(), error);
        self.failures.push(PathFailure {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }
}

pub struct BarrelGenerator {
    config: ResolvedConfig,
    filter: EligibilityFilter,
}

impl BarrelGenerator {
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        let filter = EligibilityFilter::from_config(&config)?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn generate(&self, directory: &Path) -> Result<GenerationReport> {
        if !directory.is_dir() {
            return Err(AppError::DirectoryNotFound(directory.to_path_buf()));
        }

        let mut report = GenerationReport::default();

        if self.config.has_file_config() {
            for target in self.config.normal_target_paths() {
                if !target.is_dir() {
                    log::debug!("Target directory does not exist, skipping: {}", target.display());
                    continue;
                }
                log::info!("Generating barrels for target: {}", target.display());
                if self.filter.is_directory_excluded(&target) {
                    log::info!("[EXCLUDED] Skipping target: {}", target.display());
                    continue;
                }
                self.walk_normal(&target, &mut report);
            }

            for target in self.config.forced_target_paths() {
                if !target.is_dir() {
                    log::debug!(
                        "Force-generate directory does not exist, skipping: {}",
                        target.display()
                    );
                    continue;
                }
                log::info!("Force-generating barrels for: {}", target.display());
                self.walk_forced(&target, &mut report);
            }
        } else {
            log::info!("Generating barrels for: {}", directory.display());
            self.walk_normal(directory, &mut report);
        }

        log::info!(
            "Generation complete: {} barrel(s), {} failure(s)",
            report.results.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn walk_normal(&self, dir: &Path, report: &mut GenerationReport) {
        match self.generate_normal(dir) {
            Ok(Some(result)) => report.results.push(result),
            Ok(None) => {}
            Err(e) => {
                report.record_failure(dir, e);
                return;
            }
        }

        if !self.config.include_subdirectories {
            return;
        }
        let subdirs = match self.filter.candidate_subdirectories(dir) {
            Ok(subdirs) => subdirs,
            Err(e) => {
                report.record_failure(dir, e);
                return;
            }
        };
        for sub in subdirs {
            self.walk_normal(&sub, report);
        }
    }

    fn generate_normal(&self, dir: &Path) -> Result<Option<GenerationResult>> {
        let mut entries = self.filter.eligible_files(dir)?;
        if self.config.include_subdirectories {
            entries.extend(self.filter.subdirectories_with_barrels(dir)?);
        }
        if entries.is_empty() {
            log::debug!("No eligible entries in {}", dir.display());
            return Ok(None);
        }
        self.write_barrel(dir, &entries, GenerationMode::Normal)
    }

    // Post-order. Returns whether this directory ended up with a barrel the
    // parent may re-export.
    fn walk_forced(&self, dir: &Path, report: &mut GenerationReport) -> bool {
        let produced_before = report.results.len();
        if self.filter.is_directory_excluded(dir) {
            log::info!("[EXCLUDED] Skipping directory: {}", dir.display());
            return false;
        }

        let subdirs = match self.filter.candidate_subdirectories(dir) {
            Ok(subdirs) => subdirs,
            Err(e) => {
                report.record_failure(dir, e);
                return false;
            }
        };

        let mut entries: Vec<FileEntry> = Vec::new();
        for sub in subdirs {
            if self.walk_forced(&sub, report) {
                entries.push(FileEntry::directory(sub));
            }
        }

        match self.filter.eligible_files(dir) {
            Ok(files) => entries.extend(files),
            Err(e) => {
                report.record_failure(dir, e);
                return false;
            }
        }

        if entries.is_empty() {
            log::debug!("Nothing to force-generate in {}", dir.display());
            return false;
        }

        match self.write_barrel(dir, &entries, GenerationMode::Forced) {
            Ok(Some(result)) => {
                report.results.push(result);
                true
            }
            Ok(None) => report.results.len() > produced_before,
            // No barrel here, so the parent must not re-export this directory.
            Err(e) => {
                report.record_failure(dir, e);
                false
            }
        }
    }

    fn write_barrel(
        &self,
        dir: &Path,
        entries: &[FileEntry],
        mode: GenerationMode,
    ) -> Result<Option<GenerationResult>> {
        let mut exports: Vec<String> = entries.iter().map(|e| e.export_line(dir)).collect();
        if self.config.sort_exports {
            sort_exports(&mut exports);
        }

        let file_name = barrel_file_name(entries);
        if file_name == BARREL_TS && dir.join(BARREL_TSX).exists() {
            log::info!(
                "Keeping existing {} in {}; not writing {}",
                BARREL_TSX,
                dir.display(),
                BARREL_TS
            );
            return Ok(None);
        }

        let barrel_path = dir.join(file_name);
        fs::write(&barrel_path, render_barrel(self.config.header(), &exports)).map_err(|e| {
            AppError::FileWrite {
                path: barrel_path.clone(),
                source: e,
            }
        })?;
        log::debug!(
            "Wrote {} ({} exports, {} mode)",
            barrel_path.display(),
            exports.len(),
            mode
        );

        Ok(Some(GenerationResult {
            file_path: barrel_path,
            content: exports.join("\n"),
            exports_count: exports.len(),
            mode,
        }))
    }
}
