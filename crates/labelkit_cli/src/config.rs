//! JSON config file and option resolution.
//!
//! Precedence per option: command-line flag (or its environment variable),
//! then the config file, then the library default.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use labelkit_label::{
    EnumMatchMode, SpecColumnNames, SpecLabelOptions, SpecLabelValues, SpecScanOptions,
};
use serde::Deserialize;

use crate::cli::{Cli, EnumPatternMode};

/// Inventory header overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFileColumns {
    pub r#type: Option<String>,
    pub node_name: Option<String>,
    pub description: Option<String>,
    pub hostname: Option<String>,
    pub subnet: Option<String>,
}

/// Label text overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFileLabels {
    pub name_hostname: Option<String>,
    pub name_ip: Option<String>,
    pub name_project_number: Option<String>,
    pub name_zone: Option<String>,
    pub name_weight: Option<String>,
    pub project_number: Option<String>,
    pub weight: Option<String>,
}

/// Directory scan overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFileScan {
    pub depth_limit: Option<usize>,
    /// `true` walks the whole tree unless `depth_limit` is set.
    pub recursive: Option<bool>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub rule_pattern: Option<EnumPatternMode>,
    pub include_hidden: Option<bool>,
}

/// Contents of `--config <file.json>`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFileConfig {
    pub scan_path: Option<String>,
    pub export_path: Option<String>,
    #[serde(default)]
    pub zone_filter: Vec<String>,
    #[serde(default)]
    pub node_filter: Vec<String>,
    #[serde(default)]
    pub server_type_filter: Vec<String>,
    pub repeat_count: Option<i64>,
    pub output: Option<String>,
    pub sheet_name: Option<String>,
    pub workers: Option<usize>,
    pub regex_filters: Option<bool>,
    pub render_placeholder_template: Option<bool>,
    #[serde(default)]
    pub columns: SpecFileColumns,
    #[serde(default)]
    pub labels: SpecFileLabels,
    #[serde(default)]
    pub scan: SpecFileScan,
}

pub fn load_config(path: &Path) -> Result<SpecFileConfig> {
    let c_text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&c_text)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn pick_list(from_cli: &[String], from_file: Vec<String>) -> Vec<String> {
    if from_cli.is_empty() {
        from_file
    } else {
        from_cli.to_vec()
    }
}

fn pick_patterns(from_cli: &[String], from_file: Option<Vec<String>>) -> Option<Vec<String>> {
    if from_cli.is_empty() {
        from_file
    } else {
        Some(from_cli.to_vec())
    }
}

fn derive_scan_options(cli: &Cli, scan: SpecFileScan) -> SpecScanOptions {
    let defaults = SpecScanOptions::default();

    // `None` means unlimited depth, so flags and keys are checked in order.
    let depth_limit = if let Some(n_depth) = cli.depth {
        Some(n_depth)
    } else if cli.recursive {
        None
    } else if let Some(n_depth) = scan.depth_limit {
        Some(n_depth)
    } else if scan.recursive == Some(true) {
        None
    } else {
        defaults.depth_limit
    };

    SpecScanOptions {
        patterns_include_files: pick_patterns(&cli.include, scan.include)
            .or(defaults.patterns_include_files),
        patterns_exclude_files: pick_patterns(&cli.exclude, scan.exclude)
            .or(defaults.patterns_exclude_files),
        rule_pattern: cli
            .pattern_mode
            .or(scan.rule_pattern)
            .map_or(defaults.rule_pattern, Into::into),
        depth_limit,
        if_include_hidden: cli.include_hidden
            || scan.include_hidden.unwrap_or(defaults.if_include_hidden),
    }
}

/// Merge command line, config file and defaults into pipeline options.
pub fn derive_label_options(cli: &Cli, config: SpecFileConfig) -> SpecLabelOptions {
    let defaults = SpecLabelOptions::default();
    let columns_default = SpecColumnNames::default();
    let labels_default = SpecLabelValues::default();

    let if_regex = cli.regex_filters || config.regex_filters.unwrap_or(false);
    let rule_match = if if_regex {
        EnumMatchMode::Regex
    } else {
        EnumMatchMode::Literal
    };

    SpecLabelOptions {
        scan_path: cli
            .scan_path
            .clone()
            .or(config.scan_path.map(Into::into))
            .unwrap_or(defaults.scan_path),
        export_path: cli
            .export_path
            .clone()
            .or(config.export_path.map(Into::into))
            .unwrap_or(defaults.export_path),
        zone_filter: pick_list(&cli.zones, config.zone_filter),
        node_filter: pick_list(&cli.nodes, config.node_filter),
        server_type_filter: pick_list(&cli.server_types, config.server_type_filter),
        repeat_count: cli
            .repeat
            .or(config.repeat_count)
            .unwrap_or(defaults.repeat_count),
        rule_match_zone: rule_match,
        rule_match_server_type: rule_match,
        columns: SpecColumnNames {
            col_type: config.columns.r#type.unwrap_or(columns_default.col_type),
            col_node_name: config
                .columns
                .node_name
                .unwrap_or(columns_default.col_node_name),
            col_description: config
                .columns
                .description
                .unwrap_or(columns_default.col_description),
            col_hostname: config
                .columns
                .hostname
                .unwrap_or(columns_default.col_hostname),
            col_subnet: config.columns.subnet.unwrap_or(columns_default.col_subnet),
        },
        label_values: SpecLabelValues {
            name_hostname: config
                .labels
                .name_hostname
                .unwrap_or(labels_default.name_hostname),
            name_ip: config.labels.name_ip.unwrap_or(labels_default.name_ip),
            name_project_number: config
                .labels
                .name_project_number
                .unwrap_or(labels_default.name_project_number),
            name_zone: config.labels.name_zone.unwrap_or(labels_default.name_zone),
            name_weight: config
                .labels
                .name_weight
                .unwrap_or(labels_default.name_weight),
            project_number: config
                .labels
                .project_number
                .unwrap_or(labels_default.project_number),
            weight: config.labels.weight.unwrap_or(labels_default.weight),
        },
        sheet_name: cli.sheet.clone().or(config.sheet_name),
        num_workers_max: cli.workers.or(config.workers).or(defaults.num_workers_max),
        scan_options: derive_scan_options(cli, config.scan),
        file_name_out: cli
            .output
            .clone()
            .or(config.output)
            .unwrap_or(defaults.file_name_out),
        if_render_placeholder_template: config
            .render_placeholder_template
            .unwrap_or(defaults.if_render_placeholder_template),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use labelkit_label::EnumScanPatternMode;

    use super::*;

    fn parse_config(c_json: &str) -> SpecFileConfig {
        serde_json::from_str(c_json).expect("config")
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from(["labelkit", "--zone", "prod", "--repeat", "3"]);
        let config = parse_config(
            r#"{"zone_filter": ["test"], "node_filter": ["n1"], "repeat_count": 2, "scan_path": "inv"}"#,
        );
        let options = derive_label_options(&cli, config);
        assert_eq!(options.zone_filter, vec!["prod"]);
        assert_eq!(options.node_filter, vec!["n1"]);
        assert_eq!(options.repeat_count, 3);
        assert_eq!(options.scan_path, PathBuf::from("inv"));
    }

    #[test]
    fn config_overrides_defaults() {
        let cli = Cli::parse_from(["labelkit"]);
        let config = parse_config(
            r#"{
                "regex_filters": true,
                "output": "rack.xlsx",
                "columns": {"hostname": "Host"},
                "labels": {"weight": "30 kg"},
                "render_placeholder_template": false
            }"#,
        );
        let options = derive_label_options(&cli, config);
        assert_eq!(options.rule_match_zone, EnumMatchMode::Regex);
        assert_eq!(options.file_name_out, "rack.xlsx");
        assert_eq!(options.columns.col_hostname, "Host");
        assert_eq!(options.columns.col_subnet, "Подсеть");
        assert_eq!(options.label_values.weight, "30 kg");
        assert_eq!(options.label_values.project_number, "1");
        assert!(!options.if_render_placeholder_template);
        assert_eq!(options.num_workers_max, Some(1));
    }

    #[test]
    fn scan_section_sets_scan_options() {
        let cli = Cli::parse_from(["labelkit"]);
        let config = parse_config(
            r#"{
                "scan": {
                    "recursive": true,
                    "include": ["inv_*"],
                    "exclude": ["*.bak.xlsx"],
                    "rule_pattern": "glob",
                    "include_hidden": true
                }
            }"#,
        );
        let scan_options = derive_label_options(&cli, config).scan_options;
        assert_eq!(scan_options.depth_limit, None);
        assert_eq!(scan_options.patterns_include_files, Some(vec!["inv_*".to_string()]));
        assert_eq!(scan_options.patterns_exclude_files, Some(vec!["*.bak.xlsx".to_string()]));
        assert_eq!(scan_options.rule_pattern, EnumScanPatternMode::Glob);
        assert!(scan_options.if_include_hidden);
    }

    #[test]
    fn scan_flags_override_scan_section() {
        let cli = Cli::parse_from([
            "labelkit",
            "--depth",
            "3",
            "--exclude",
            "old",
            "--pattern-mode",
            "literal",
        ]);
        let config = parse_config(
            r#"{"scan": {"depth_limit": 2, "exclude": ["tmp"], "rule_pattern": "regex"}}"#,
        );
        let scan_options = derive_label_options(&cli, config).scan_options;
        assert_eq!(scan_options.depth_limit, Some(3));
        assert_eq!(scan_options.patterns_exclude_files, Some(vec!["old".to_string()]));
        assert_eq!(scan_options.rule_pattern, EnumScanPatternMode::Literal);
        assert!(!scan_options.if_include_hidden);
    }

    #[test]
    fn scan_defaults_list_only_scan_dir() {
        let cli = Cli::parse_from(["labelkit"]);
        let scan_options = derive_label_options(&cli, SpecFileConfig::default()).scan_options;
        assert_eq!(scan_options.depth_limit, Some(1));
        assert!(scan_options.patterns_include_files.is_none());
        assert!(serde_json::from_str::<SpecFileConfig>(r#"{"scan": {"depth": 2}}"#).is_err());
        assert!(
            serde_json::from_str::<SpecFileConfig>(r#"{"scan": {"rule_pattern": "fuzzy"}}"#)
                .is_err()
        );
    }

    #[test]
    fn unknown_config_keys_rejected() {
        assert!(serde_json::from_str::<SpecFileConfig>(r#"{"zones": []}"#).is_err());
    }

    #[test]
    fn load_config_reports_path() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("labelkit.json");
        fs::write(&path, "{ not json").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("labelkit.json"));
    }
}
