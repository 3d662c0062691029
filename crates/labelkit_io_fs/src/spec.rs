//! Scan specification models and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for include/exclude lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumScanPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    #[default]
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Substring match.
    Literal,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `scan_dir`.
#[derive(Debug, Clone)]
pub struct SpecScanOptions {
    /// Include patterns applied to file basename.
    pub patterns_include_files: Option<Vec<String>>,
    /// Exclude patterns applied to file basename.
    pub patterns_exclude_files: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumScanPatternMode,
    /// Maximum directory depth to list; `Some(1)` lists only the root directory,
    /// `None` walks the whole tree.
    pub depth_limit: Option<usize>,
    /// List entries whose name starts with `.`.
    pub if_include_hidden: bool,
}

impl Default for SpecScanOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: None,
            patterns_exclude_files: None,
            rule_pattern: EnumScanPatternMode::Glob,
            depth_limit: Some(1),
            if_include_hidden: false,
        }
    }
}

/// "Top-level call failed" errors (input validation stage).
#[derive(Debug, Error)]
pub enum ScanDirError {
    /// Invalid depth value.
    #[error("{0}")]
    InvalidDepthLimit(String),
    /// Invalid include/exclude pattern.
    #[error("{0}")]
    InvalidPattern(String),
    /// Scan path does not exist or is not a directory.
    #[error("Scan path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
