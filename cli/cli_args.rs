use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigFileOpts {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to a config file (default: search for barrel-craft.json upwards).",
        value_name = "FILE",
        conflicts_with = "no_config",
        help_heading = "Configuration"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Ignore any configuration file.",
        conflicts_with = "config",
        help_heading = "Configuration"
    )]
    pub no_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "barrel-craft",
    author,
    version,
    about = "Generate index.ts barrel files for TypeScript projects.",
    long_about = "barrel-craft writes index.ts / index.tsx files that re-export every eligible \nmodule of a directory, optionally recursing into subdirectories, and can \nremove the barrels it generated earlier.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  barrel-craft init\n  barrel-craft generate src -s\n  barrel-craft clean --dry-run\n  barrel-craft config -f json",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate barrel files for a directory or the configured targets."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "c",
        about = "Remove barrel files generated by earlier runs."
    )]
    Clean(CleanArgs),

    #[command(about = "Write a default barrel-craft.json in the current directory.")]
    Init(InitArgs),

    #[command(
        visible_alias = "d",
        about = "Show the effective configuration and resolved targets."
    )]
    Config(ConfigArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        default_value = ".",
        value_name = "DIRECTORY",
        help = "Directory to generate barrels for (ignored when a config sets targets)."
    )]
    pub directory: PathBuf,

    #[arg(
        short = 'e',
        long,
        num_args = 1..,
        default_values = ["ts", "tsx"],
        value_name = "EXT",
        help = "File extensions to include.",
        help_heading = "Filtering"
    )]
    pub extensions: Vec<String>,

    #[arg(
        short = 'x',
        long,
        num_args = 1..,
        default_values = ["*.test.*", "*.spec.*"],
        value_name = "PATTERN",
        help = "Glob patterns for files and directories to exclude.",
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(
        short = 's',
        long,
        help = "Also generate barrels for subdirectories.",
        help_heading = "Generation"
    )]
    pub subdirectories: bool,

    #[arg(
        long,
        help = "Keep exports in discovery order instead of sorting them.",
        help_heading = "Generation"
    )]
    pub no_sort: bool,

    #[arg(
        long,
        value_name = "TEXT",
        help = "Header text written at the top of every barrel.",
        help_heading = "Generation"
    )]
    pub header: Option<String>,

    #[clap(flatten)]
    pub config_file: ConfigFileOpts,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Format of the run summary.",
        help_heading = "Output Formatting"
    )]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[arg(long, help = "List the files that would be removed without deleting them.")]
    pub dry_run: bool,

    #[arg(long, help = "Remove every index.ts / index.tsx under the targets, whatever its header.")]
    pub force: bool,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to a config file (default: search for barrel-craft.json upwards)."
    )]
    pub config: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, help = "Overwrite an existing barrel-craft.json.")]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub config_file: ConfigFileOpts,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Show the configuration as a table or as JSON."
    )]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save the completion script to the shell's standard location."
    )]
    pub save: bool,
}
