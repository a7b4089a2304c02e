pub mod barrel;
pub mod cleanup;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod generator;
pub mod patterns;

pub use barrel::{FileEntry, GenerationMode, GenerationResult};
pub use cleanup::{BarrelCleaner, CleanCandidate, CleanReason, CleanReport, CleanScan};
pub use config::{
    BarrelConfig, DEFAULT_CONFIG_FILENAME, DEFAULT_HEADER_COMMENT, FileConfig, LoadedConfig,
    ResolvedConfig, find_config_file, write_default_config,
};
pub use eligibility::EligibilityFilter;
pub use error::{AppError, Result};
pub use generator::{BarrelGenerator, GenerationReport, PathFailure};
pub use patterns::expand_variable_patterns;
