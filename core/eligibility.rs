use crate::barrel::{FileEntry, is_barrel_file_name};
use crate::config::ResolvedConfig;
use crate::error::{AppError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    set: GlobSet,
}

impl ExcludeMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern_str in patterns {
            let mut processed_pattern = pattern_str.trim().to_string();
            if processed_pattern.ends_with('/') && processed_pattern.len() > 1 {
                processed_pattern.push_str("**");
            }
            let glob = GlobBuilder::new(&processed_pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| {
                    log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
                    AppError::Glob(format!(
                        "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                        pattern_str, processed_pattern, e
                    ))
                })?;
            log::trace!(
                "Adding exclude pattern: {} (processed as {})",
                pattern_str,
                processed_pattern
            );
            builder.add(glob);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    // Tries the path relative to `project_root` and the absolute path, each with
    // and without a trailing separator, plus `/`-normalized relative forms.
    pub fn is_directory_excluded(&self, dir: &Path, project_root: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        let absolute = dir.to_string_lossy().into_owned();
        let relative = pathdiff::diff_paths(dir, project_root)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| absolute.clone());
        let slashed = relative.replace('\\', "/");

        let candidates = [
            relative.clone(),
            format!("{}{}", relative, MAIN_SEPARATOR),
            slashed.clone(),
            format!("{}/", slashed),
            absolute.clone(),
            format!("{}{}", absolute, MAIN_SEPARATOR),
        ];
        let excluded = candidates.iter().any(|c| self.set.is_match(c));
        if excluded {
            log::debug!("Directory excluded by pattern: {}", dir.display());
        }
        excluded
    }
}

#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    extensions: Vec<String>,
    excludes: ExcludeMatcher,
    project_root: PathBuf,
}

impl EligibilityFilter {
    pub fn new(extensions: &[String], exclude_patterns: &[String], project_root: &Path) -> Result<Self> {
        Ok(Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            excludes: ExcludeMatcher::new(exclude_patterns)?,
            project_root: project_root.to_path_buf(),
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        Self::new(
            &config.extensions,
            &config.exclude_patterns,
            &config.project_root,
        )
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn is_valid_source_file(&self, file_name: &str) -> bool {
        !file_name.starts_with('.')
            && self.extensions.iter().any(|ext| has_extension(file_name, ext))
            && !is_barrel_file_name(file_name)
            && !file_name.ends_with(".d.ts")
            && !self.excludes.matches_name(file_name)
    }

    pub fn is_directory_excluded(&self, dir: &Path) -> bool {
        self.excludes.is_directory_excluded(dir, &self.project_root)
    }

    pub fn eligible_files(&self, dir: &Path) -> Result<Vec<FileEntry>> {
        let listing = read_sorted_dir(dir)?;
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for ext in &self.extensions {
            for item in &listing {
                if !item.is_file || !has_extension(&item.name, ext) {
                    continue;
                }
                if !self.is_valid_source_file(&item.name) {
                    log::trace!("Skipping ineligible file: {}", item.path.display());
                    continue;
                }
                if seen.insert(item.path.clone()) {
                    files.push(FileEntry::file(item.path.clone()));
                }
            }
        }
        log::trace!("{} eligible file(s) in {}", files.len(), dir.display());
        Ok(files)
    }

    pub fn candidate_subdirectories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(read_sorted_dir(dir)?
            .into_iter()
            .filter(|item| item.is_dir && !item.name.starts_with('.'))
            .filter(|item| {
                let excluded = self.is_directory_excluded(&item.path);
                if excluded {
                    log::info!("[EXCLUDED] Skipping directory: {}", item.path.display());
                }
                !excluded
            })
            .map(|item| item.path)
            .collect())
    }

    pub fn subdirectories_with_barrels(&self, dir: &Path) -> Result<Vec<FileEntry>> {
        Ok(self
            .candidate_subdirectories(dir)?
            .into_iter()
            .filter(|sub| has_barrel_file(sub))
            .map(FileEntry::directory)
            .collect())
    }
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() > ext.len() + 1
        && name.ends_with(ext)
        && name[..name.len() - ext.len()].ends_with('.')
}

pub fn has_barrel_file(dir: &Path) -> bool {
    dir.join(crate::barrel::BARREL_TS).is_file() || dir.join(crate::barrel::BARREL_TSX).is_file()
}

#[derive(Debug)]
struct ListedEntry {
    name: String,
    path: PathBuf,
    is_file: bool,
    is_dir: bool,
}

// Symlinked files count as files; symlinked directories are not followed.
fn read_sorted_dir(dir: &Path) -> Result<Vec<ListedEntry>> {
    let read_err = |e| AppError::DirRead {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(read_err)?;
        let path = entry.path();
        let is_dir = file_type.is_dir();
        let is_file = if file_type.is_symlink() {
            fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false)
        } else {
            file_type.is_file()
        };
        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_file,
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, "export const x = 1\n").unwrap();
        }
    }

    fn default_filter(root: &Path) -> EligibilityFilter {
        EligibilityFilter::new(
            &strings(&["ts", "tsx"]),
            &strings(&["*.test.*", "*.spec.*"]),
            root,
        )
        .unwrap()
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn barrels_declarations_and_excluded_names_are_never_eligible() {
        let filter = default_filter(Path::new("/"));
        for name in [
            "index.ts",
            "index.tsx",
            "global.d.ts",
            "button.test.ts",
            "Button.Spec.tsx",
            "BUTTON.TEST.TSX",
            ".hidden.ts",
            "readme.md",
            "ts",
        ] {
            assert!(!filter.is_valid_source_file(name), "{name} should be ineligible");
        }
        for name in ["button.ts", "Button.tsx", "user.service.ts", "index.page.ts"] {
            assert!(filter.is_valid_source_file(name), "{name} should be eligible");
        }
    }

    #[test]
    fn extension_must_follow_a_dot() {
        let filter = default_filter(Path::new("/"));
        assert!(!filter.is_valid_source_file("mts"));
        assert!(!filter.is_valid_source_file("file.mts"));
        assert!(filter.is_valid_source_file("file.ts"));
    }

    #[test]
    fn dot_prefixed_extension_config_is_accepted() {
        let filter =
            EligibilityFilter::new(&strings(&[".ts"]), &[], Path::new("/")).unwrap();
        assert!(filter.is_valid_source_file("a.ts"));
    }

    #[test]
    fn eligible_files_groups_by_extension_then_name() {
        let tmp = TempDir::new().unwrap();
        touch(
            tmp.path(),
            &[
                "b.tsx",
                "z.ts",
                "a.ts",
                "index.ts",
                "types.d.ts",
                "a.test.ts",
                "notes.md",
            ],
        );
        fs::create_dir(tmp.path().join("folder.ts")).unwrap();

        let filter = default_filter(tmp.path());
        let files = filter.eligible_files(tmp.path()).unwrap();
        assert_eq!(names(&files), vec!["a.ts", "z.ts", "b.tsx"]);
        assert!(files.iter().all(|f| !f.is_directory));
        assert_eq!(files[2].extension, ".tsx");
    }

    #[test]
    fn missing_directory_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let filter = default_filter(tmp.path());
        let err = filter.eligible_files(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, AppError::DirRead { .. }));
    }

    #[test]
    fn subdirectories_skip_hidden_and_excluded() {
        let tmp = TempDir::new().unwrap();
        for dir in ["b", "a", ".git", "legacy", "node_modules"] {
            fs::create_dir(tmp.path().join(dir)).unwrap();
        }
        let filter = EligibilityFilter::new(
            &strings(&["ts"]),
            &strings(&["legacy", "**/node_modules"]),
            tmp.path(),
        )
        .unwrap();
        let subdirs = filter.candidate_subdirectories(tmp.path()).unwrap();
        assert_eq!(subdirs, vec![tmp.path().join("a"), tmp.path().join("b")]);
    }

    #[test]
    fn only_subdirectories_with_barrels_qualify() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), &["with_ts/index.ts", "with_tsx/index.tsx", "plain/a.ts"]);
        let filter = default_filter(tmp.path());
        let dirs = filter.subdirectories_with_barrels(tmp.path()).unwrap();
        assert_eq!(names(&dirs), vec!["with_ts", "with_tsx"]);
        assert!(dirs.iter().all(|d| d.is_directory && d.extension.is_empty()));
    }

    #[test]
    fn directory_exclusion_checks_relative_and_absolute_forms() {
        let root = Path::new("/proj");
        let matcher = ExcludeMatcher::new(&strings(&["src/legacy/**"])).unwrap();
        assert!(matcher.is_directory_excluded(Path::new("/proj/src/legacy"), root));
        assert!(matcher.is_directory_excluded(Path::new("/proj/src/legacy/old"), root));
        assert!(!matcher.is_directory_excluded(Path::new("/proj/src/modern"), root));

        let matcher = ExcludeMatcher::new(&strings(&["SRC/Generated"])).unwrap();
        assert!(matcher.is_directory_excluded(Path::new("/proj/src/generated"), root));

        let matcher = ExcludeMatcher::new(&strings(&["/opt/vendor/**"])).unwrap();
        assert!(matcher.is_directory_excluded(Path::new("/opt/vendor"), root));

        let matcher = ExcludeMatcher::new(&strings(&["*.test.*"])).unwrap();
        assert!(!matcher.is_directory_excluded(Path::new("/proj/src"), root));

        let matcher = ExcludeMatcher::new(&[]).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.is_directory_excluded(Path::new("/proj/src"), root));
    }

    #[test]
    fn trailing_slash_patterns_cover_directory_contents() {
        let matcher = ExcludeMatcher::new(&strings(&["generated/"])).unwrap();
        assert!(matcher.is_directory_excluded(Path::new("/proj/generated"), Path::new("/proj")));
    }

    #[test]
    fn invalid_patterns_are_glob_errors() {
        let err = ExcludeMatcher::new(&strings(&["src/[unclosed"])).unwrap_err();
        assert!(matches!(err, AppError::Glob(_)));
    }
}
