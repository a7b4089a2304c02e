use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error(
        "No configuration found. Run \"barrel-craft init\" or specify a config file with --config."
    )]
    ConfigurationMissing,

    #[error("Configuration Parse Error: Path '{}', Error: {message}", .path.display())]
    ConfigurationParse { path: PathBuf, message: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory Read Error: Path '{}', Error: {source}", .path.display())]
    DirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Read Error: Path '{}', Error: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{}', Error: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Remove Error: Path '{}', Error: {source}", .path.display())]
    FileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WalkDir Error: {0}")]
    Walk(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AppError::ConfigurationMissing
                | AppError::ConfigurationParse { .. }
                | AppError::Config(_)
                | AppError::Glob(_)
        )
    }
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::Walk(err.to_string())
    }
}
