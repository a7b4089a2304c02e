use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const BARREL_TS: &str = "index.ts";
pub const BARREL_TSX: &str = "index.tsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub base_name: String,
    pub extension: String,
    pub is_directory: bool,
}

impl FileEntry {
    pub fn file(path: PathBuf) -> Self {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            base_name,
            extension,
            is_directory: false,
        }
    }

    pub fn directory(path: PathBuf) -> Self {
        let base_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            base_name,
            extension: String::new(),
            is_directory: true,
        }
    }

    pub fn import_path(&self, directory: &Path) -> String {
        if self.is_directory {
            return format!("./{}", self.base_name);
        }
        let relative = pathdiff::diff_paths(&self.path, directory)
            .unwrap_or_else(|| PathBuf::from(self.path.file_name().unwrap_or_default()));
        let without_ext = relative.with_extension("");
        format!("./{}", without_ext.to_string_lossy().replace('\\', "/"))
    }

    pub fn export_line(&self, directory: &Path) -> String {
        format!("export * from '{}'", self.import_path(directory))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Normal,
    Forced,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Normal => write!(f, "normal"),
            GenerationMode::Forced => write!(f, "forced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub file_path: PathBuf,
    pub content: String,
    pub exports_count: usize,
    pub mode: GenerationMode,
}

pub fn barrel_file_name(entries: &[FileEntry]) -> &'static str {
    if entries.iter().any(|e| e.extension == ".tsx") {
        BARREL_TSX
    } else {
        BARREL_TS
    }
}

pub fn is_barrel_file_name(name: &str) -> bool {
    name == BARREL_TS || name == BARREL_TSX
}

pub fn sort_exports(exports: &mut [String]) {
    exports.sort();
}

pub fn render_barrel(header: &str, exports: &[String]) -> String {
    format!("{}{}\n", header, exports.join("\n"))
}
