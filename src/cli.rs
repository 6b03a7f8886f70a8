use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A tool to extract and test Fail2Ban failregex rules against log lines
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config profile overriding the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the filter definition files
    #[arg(long, global = true, env = "FILTER_ANALYZER_DIR")]
    pub filter_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Path to write the report to, in addition to stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Color handling for terminal output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter's rules and report fragments that fail to compile
    Check {
        /// Filter file name, resolved against the filter directory
        filter: String,
    },
    /// List the extracted rule fragments and their compiled patterns
    Info {
        /// Filter file name, resolved against the filter directory
        filter: String,
    },
    /// Test individual log lines against a filter
    Match {
        /// Filter file name, resolved against the filter directory
        filter: String,

        /// Log lines to test
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Run a log file through a filter and summarize which rules fired
    Test {
        /// Filter file name, resolved against the filter directory
        filter: String,

        /// Log file with one candidate line per entry
        #[arg(short, long)]
        log_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
