pub mod clean;
pub mod completion;
pub mod config;
pub mod generate;
pub mod init;
