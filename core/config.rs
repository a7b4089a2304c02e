use crate::error::{AppError, Result};
use crate::patterns::expand_variable_patterns;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: &[&str] = &[
    "barrel-craft.json",
    "barrel-craft.config.json",
    "barrel.config.json",
    "barrel-craft.toml",
];
pub const DEFAULT_CONFIG_FILENAME: &str = "barrel-craft.json";
pub const DEFAULT_HEADER_COMMENT: &str = "// auto-generated by barrel-craft\n\n";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_generate: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_exports: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdirectories: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarrelConfig {
    pub extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub include_subdirectories: bool,
    pub sort_exports: bool,
    pub verbose: bool,
    pub header_comment: Option<String>,
    pub config_file: Option<String>,
    pub disable_config_file: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: FileConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub include_subdirectories: bool,
    pub sort_exports: bool,
    pub verbose: bool,
    pub header_comment: Option<String>,
    pub targets: Vec<String>,
    pub force_generate: Vec<String>,
    pub force: bool,
    pub project_root: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl Default for BarrelConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            exclude_patterns: vec!["*.test.*".to_string(), "*.spec.*".to_string()],
            include_subdirectories: false,
            sort_exports: true,
            verbose: false,
            header_comment: None,
            config_file: None,
            disable_config_file: false,
        }
    }
}

impl FileConfig {
    pub fn default_template() -> Self {
        Self {
            header_comment: Some(DEFAULT_HEADER_COMMENT.to_string()),
            targets: Some(vec!["src".to_string()]),
            force_generate: Some(Vec::new()),
            exclude: Some(vec!["**/*.test.*".to_string(), "**/*.spec.*".to_string()]),
            extensions: Some(vec!["ts".to_string(), "tsx".to_string()]),
            sort_exports: Some(true),
            subdirectories: Some(true),
            verbose: Some(false),
            force: Some(false),
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        let parse_error = |message: String| AppError::ConfigurationParse {
            path: config_path.to_path_buf(),
            message,
        };
        match config_path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str::<FileConfig>(&content)
                .map_err(|e| parse_error(format!("{}. Check TOML syntax and structure.", e))),
            _ => serde_json::from_str::<FileConfig>(&content)
                .map_err(|e| parse_error(format!("{}. Check JSON syntax and structure.", e))),
        }
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                log::debug!("Found config file: {}", candidate.display());
                return Some(candidate);
            }
        }
    }
    log::debug!(
        "No config file found in {} or its ancestors",
        start_dir.display()
    );
    None
}

pub fn write_default_config(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILENAME);
    if path.exists() && !overwrite {
        return Err(AppError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }
    let body = serde_json::to_string_pretty(&FileConfig::default_template())
        .map_err(|e| AppError::Config(format!("Failed to serialize default config: {}", e)))?;
    fs::write(&path, format!("{}\n", body)).map_err(|e| AppError::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(path)
}

impl BarrelConfig {
    pub fn locate_file_config(&self, start_dir: &Path, cwd: &Path) -> Result<Option<LoadedConfig>> {
        if self.disable_config_file {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        let path = match &self.config_file {
            Some(p_str) => {
                let expanded = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                let path = if expanded.is_absolute() {
                    expanded
                } else {
                    cwd.join(expanded)
                };
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                path
            }
            None => match find_config_file(start_dir) {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        let config = FileConfig::load_from_path(&path)?;
        Ok(Some(LoadedConfig { path, config }))
    }
}

impl ResolvedConfig {
    // The file wins wherever it sets a key. `verbose` is on when either side
    // sets it; an empty file header counts as unset.
    pub fn resolve(options: &BarrelConfig, loaded: Option<&LoadedConfig>, cwd: &Path) -> Self {
        let Some(loaded) = loaded else {
            return Self {
                extensions: options.extensions.clone(),
                exclude_patterns: options.exclude_patterns.clone(),
                include_subdirectories: options.include_subdirectories,
                sort_exports: options.sort_exports,
                verbose: options.verbose,
                header_comment: options.header_comment.clone().filter(|h| !h.is_empty()),
                targets: Vec::new(),
                force_generate: Vec::new(),
                force: false,
                project_root: cwd.to_path_buf(),
                config_path: None,
            };
        };

        let file = &loaded.config;
        let header_comment = file
            .header_comment
            .clone()
            .filter(|h| !h.is_empty())
            .or_else(|| options.header_comment.clone().filter(|h| !h.is_empty()));

        let resolved = Self {
            extensions: file
                .extensions
                .clone()
                .unwrap_or_else(|| options.extensions.clone()),
            exclude_patterns: file
                .exclude
                .clone()
                .unwrap_or_else(|| options.exclude_patterns.clone()),
            include_subdirectories: file
                .subdirectories
                .unwrap_or(options.include_subdirectories),
            sort_exports: file.sort_exports.unwrap_or(options.sort_exports),
            verbose: options.verbose || file.verbose.unwrap_or(false),
            header_comment,
            targets: expand_variable_patterns(file.targets.as_deref().unwrap_or_default()),
            force_generate: expand_variable_patterns(
                file.force_generate.as_deref().unwrap_or_default(),
            ),
            force: file.force.unwrap_or(false),
            project_root: cwd.to_path_buf(),
            config_path: Some(loaded.path.clone()),
        };
        log::trace!("Resolved configuration: {:?}", resolved);
        resolved
    }

    pub fn has_file_config(&self) -> bool {
        self.config_path.is_some()
    }

    pub fn header(&self) -> &str {
        self.header_comment.as_deref().unwrap_or("")
    }

    pub fn resolve_target(&self, target: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(target).as_ref());
        if expanded.is_absolute() {
            expanded
        } else {
            self.project_root.join(expanded)
        }
    }

    pub fn normal_target_paths(&self) -> Vec<PathBuf> {
        self.targets.iter().map(|t| self.resolve_target(t)).collect()
    }

    pub fn forced_target_paths(&self) -> Vec<PathBuf> {
        self.force_generate
            .iter()
            .map(|t| self.resolve_target(t))
            .collect()
    }

    pub fn all_target_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.normal_target_paths();
        paths.extend(self.forced_target_paths());
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loaded(config: FileConfig, dir: &Path) -> LoadedConfig {
        LoadedConfig {
            path: dir.join(DEFAULT_CONFIG_FILENAME),
            config,
        }
    }

    #[test]
    fn without_file_the_supplied_options_apply() {
        let options = BarrelConfig {
            include_subdirectories: true,
            header_comment: Some("// hi\n".to_string()),
            ..BarrelConfig::default()
        };
        let resolved = ResolvedConfig::resolve(&options, None, Path::new("/work"));
        assert_eq!(resolved.extensions, vec!["ts", "tsx"]);
        assert!(resolved.include_subdirectories);
        assert!(resolved.sort_exports);
        assert_eq!(resolved.header(), "// hi\n");
        assert!(!resolved.has_file_config());
        assert_eq!(resolved.project_root, PathBuf::from("/work"));
        assert!(resolved.all_target_paths().is_empty());
    }

    #[test]
    fn file_values_override_supplied_defaults() {
        let file = FileConfig {
            extensions: Some(vec!["ts".to_string()]),
            exclude: Some(Vec::new()),
            sort_exports: Some(false),
            subdirectories: Some(true),
            targets: Some(vec!["src/{a|b}".to_string()]),
            force_generate: Some(vec!["lib".to_string()]),
            force: Some(true),
            ..FileConfig::default()
        };
        let loaded = loaded(file, Path::new("/proj"));
        let resolved = ResolvedConfig::resolve(&BarrelConfig::default(), Some(&loaded), Path::new("/work"));

        assert_eq!(resolved.extensions, vec!["ts"]);
        assert!(resolved.exclude_patterns.is_empty());
        assert!(!resolved.sort_exports);
        assert!(resolved.include_subdirectories);
        assert!(resolved.force);
        assert_eq!(resolved.targets, vec!["src/a", "src/b"]);
        assert_eq!(resolved.project_root, PathBuf::from("/work"));
        assert_eq!(
            resolved.all_target_paths(),
            vec![
                PathBuf::from("/work/src/a"),
                PathBuf::from("/work/src/b"),
                PathBuf::from("/work/lib"),
            ]
        );
    }

    #[test]
    fn missing_file_keys_fall_back() {
        let options = BarrelConfig {
            extensions: vec!["js".to_string()],
            sort_exports: false,
            ..BarrelConfig::default()
        };
        let loaded = loaded(FileConfig::default(), Path::new("/proj"));
        let resolved = ResolvedConfig::resolve(&options, Some(&loaded), Path::new("/proj"));
        assert_eq!(resolved.extensions, vec!["js"]);
        assert!(!resolved.sort_exports);
        assert!(!resolved.force);
        assert!(resolved.targets.is_empty());
    }

    #[test]
    fn verbose_is_on_when_either_side_sets_it() {
        let quiet = BarrelConfig::default();
        let loud = BarrelConfig {
            verbose: true,
            ..BarrelConfig::default()
        };
        let file_verbose = loaded(
            FileConfig {
                verbose: Some(true),
                ..FileConfig::default()
            },
            Path::new("/p"),
        );
        let file_silent = loaded(
            FileConfig {
                verbose: Some(false),
                ..FileConfig::default()
            },
            Path::new("/p"),
        );
        let cwd = Path::new("/p");
        assert!(ResolvedConfig::resolve(&quiet, Some(&file_verbose), cwd).verbose);
        assert!(ResolvedConfig::resolve(&loud, Some(&file_silent), cwd).verbose);
        assert!(!ResolvedConfig::resolve(&quiet, Some(&file_silent), cwd).verbose);
    }

    #[test]
    fn empty_file_header_falls_back_to_supplied_header() {
        let options = BarrelConfig {
            header_comment: Some("// cli\n".to_string()),
            ..BarrelConfig::default()
        };
        let empty = loaded(
            FileConfig {
                header_comment: Some(String::new()),
                ..FileConfig::default()
            },
            Path::new("/p"),
        );
        let set = loaded(
            FileConfig {
                header_comment: Some("// file\n".to_string()),
                ..FileConfig::default()
            },
            Path::new("/p"),
        );
        let cwd = Path::new("/p");
        assert_eq!(ResolvedConfig::resolve(&options, Some(&empty), cwd).header(), "// cli\n");
        assert_eq!(ResolvedConfig::resolve(&options, Some(&set), cwd).header(), "// file\n");
    }

    #[test]
    fn discovery_walks_up_from_start_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("src").join("components");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config_file(&nested), None);

        fs::write(tmp.path().join("barrel-craft.toml"), "sortExports = false\n").unwrap();
        assert_eq!(
            find_config_file(&nested),
            Some(tmp.path().join("barrel-craft.toml"))
        );

        fs::write(tmp.path().join("barrel-craft.json"), "{}").unwrap();
        assert_eq!(
            find_config_file(&nested),
            Some(tmp.path().join("barrel-craft.json"))
        );
    }

    #[test]
    fn loads_json_and_toml_documents() {
        let tmp = TempDir::new().unwrap();
        let json = tmp.path().join("barrel-craft.json");
        fs::write(
            &json,
            r#"{ "headerComment": "// auto-generated\n", "targets": ["src"], "sortExports": false }"#,
        )
        .unwrap();
        let config = FileConfig::load_from_path(&json).unwrap();
        assert_eq!(config.header_comment.as_deref(), Some("// auto-generated\n"));
        assert_eq!(config.targets, Some(vec!["src".to_string()]));
        assert_eq!(config.sort_exports, Some(false));
        assert_eq!(config.force, None);

        let toml_path = tmp.path().join("barrel-craft.toml");
        fs::write(&toml_path, "forceGenerate = [\"lib\"]\nsubdirectories = true\n").unwrap();
        let config = FileConfig::load_from_path(&toml_path).unwrap();
        assert_eq!(config.force_generate, Some(vec!["lib".to_string()]));
        assert_eq!(config.subdirectories, Some(true));
    }

    #[test]
    fn malformed_or_unknown_fields_are_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("barrel-craft.json");
        fs::write(&bad, "{ \"targets\": [").unwrap();
        assert!(matches!(
            FileConfig::load_from_path(&bad),
            Err(AppError::ConfigurationParse { .. })
        ));

        fs::write(&bad, r#"{ "unknownKey": true }"#).unwrap();
        assert!(matches!(
            FileConfig::load_from_path(&bad),
            Err(AppError::ConfigurationParse { .. })
        ));
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let options = BarrelConfig {
            config_file: Some("missing.json".to_string()),
            ..BarrelConfig::default()
        };
        let err = options.locate_file_config(tmp.path(), tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn disabled_config_skips_discovery() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("barrel-craft.json"), "{}").unwrap();
        let options = BarrelConfig {
            disable_config_file: true,
            ..BarrelConfig::default()
        };
        assert_eq!(options.locate_file_config(tmp.path(), tmp.path()).unwrap(), None);
        let found = BarrelConfig::default()
            .locate_file_config(tmp.path(), tmp.path())
            .unwrap()
            .unwrap();
        assert_eq!(found.path, tmp.path().join("barrel-craft.json"));
    }

    #[test]
    fn default_config_round_trips_and_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = write_default_config(tmp.path(), false).unwrap();
        let config = FileConfig::load_from_path(&path).unwrap();
        assert_eq!(config, FileConfig::default_template());
        assert!(matches!(
            write_default_config(tmp.path(), false),
            Err(AppError::Config(_))
        ));
        assert!(write_default_config(tmp.path(), true).is_ok());
    }
}
