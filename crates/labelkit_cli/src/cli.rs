//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use labelkit_label::EnumScanPatternMode;
use serde::Deserialize;

/// How `--include`/`--exclude` patterns match file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumPatternMode {
    Glob,
    Regex,
    Literal,
}

impl From<EnumPatternMode> for EnumScanPatternMode {
    fn from(mode: EnumPatternMode) -> Self {
        match mode {
            EnumPatternMode::Glob => Self::Glob,
            EnumPatternMode::Regex => Self::Regex,
            EnumPatternMode::Literal => Self::Literal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "labelkit")]
#[command(version)]
#[command(
    about = "Print front and side server labels from spreadsheet host inventories",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the inventory spreadsheets
    #[arg(long = "scan-path", value_name = "DIR", env = "LABELKIT_SCAN_PATH")]
    pub scan_path: Option<PathBuf>,

    /// Directory the label document is written to
    #[arg(long = "export-path", value_name = "DIR", env = "LABELKIT_EXPORT_PATH")]
    pub export_path: Option<PathBuf>,

    /// Zone term matched against the type column (repeatable)
    #[arg(long = "zone", value_name = "ZONE")]
    pub zones: Vec<String>,

    /// Exact node name (repeatable)
    #[arg(long = "node", value_name = "NODE")]
    pub nodes: Vec<String>,

    /// Server type searched in the description column (repeatable)
    #[arg(long = "server-type", value_name = "TYPE")]
    pub server_types: Vec<String>,

    /// Label copies per host; values below 1 print one copy
    #[arg(
        long = "repeat",
        value_name = "N",
        env = "LABELKIT_REPEAT",
        allow_negative_numbers = true
    )]
    pub repeat: Option<i64>,

    /// Output document file name inside the export directory
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Worksheet to read from every file (default: first sheet)
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Maximum worker threads for loading files
    #[arg(long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Treat zone and server-type terms as regular expressions
    #[arg(long = "regex-filters")]
    pub regex_filters: bool,

    /// Only scan files whose name matches (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Skip files whose name matches (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Interpretation of include/exclude patterns
    #[arg(long = "pattern-mode", value_enum, value_name = "MODE")]
    pub pattern_mode: Option<EnumPatternMode>,

    /// Directory levels to scan; 1 lists only the scan directory
    #[arg(long = "depth", value_name = "N", conflicts_with = "recursive")]
    pub depth: Option<usize>,

    /// Scan every sub-directory
    #[arg(long = "recursive")]
    pub recursive: bool,

    /// Also scan files and directories starting with `.`
    #[arg(long = "include-hidden")]
    pub include_hidden: bool,

    /// JSON file with default options; explicit flags win
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}
