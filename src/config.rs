//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.submetrics.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".submetrics.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Violation thresholds.
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Subroutine thresholds.
///
/// A subroutine is reported as a violation only when it reaches both limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Maximum subroutine length in lines.
    #[serde(default = "default_max_sub_lines")]
    pub max_sub_lines: u32,

    /// Maximum McCabe complexity.
    #[serde(default = "default_max_sub_complexity")]
    pub max_sub_complexity: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_sub_lines: default_max_sub_lines(),
            max_sub_complexity: default_max_sub_complexity(),
        }
    }
}

fn default_max_sub_lines() -> u32 {
    60
}

fn default_max_sub_complexity() -> u32 {
    10
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Only list violating subroutines in the tables.
    #[serde(default)]
    pub show_only_errors: bool,

    /// Write only the SARIF document, no tables.
    #[serde(default)]
    pub only_machine_output: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load the configuration file from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(max_sub_lines) = args.max_sub_lines {
            self.thresholds.max_sub_lines = max_sub_lines;
        }
        if let Some(max_sub_complexity) = args.max_sub_complexity {
            self.thresholds.max_sub_complexity = max_sub_complexity;
        }

        // Flags can only switch behavior on
        if args.show_only_errors {
            self.output.show_only_errors = true;
        }
        if args.only_machine_output {
            self.output.only_machine_output = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Validate merged settings.
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.max_sub_lines == 0 {
            anyhow::bail!("max_sub_lines must be at least 1");
        }
        if self.thresholds.max_sub_complexity == 0 {
            anyhow::bail!("max_sub_complexity must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use std::path::PathBuf;

    fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("metrics.json")),
            output: None,
            config: None,
            max_sub_lines: None,
            max_sub_complexity: None,
            show_only_errors: false,
            only_machine_output: false,
            fail_on_violations: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.thresholds.max_sub_lines, 60);
        assert_eq!(config.thresholds.max_sub_complexity, 10);
        assert!(!config.output.show_only_errors);
        assert!(!config.output.only_machine_output);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[thresholds]
max_sub_lines = 80

[output]
show_only_errors = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.thresholds.max_sub_lines, 80);
        assert_eq!(config.thresholds.max_sub_complexity, 10);
        assert!(config.output.show_only_errors);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_merge_only_explicit_values() {
        let mut config: Config = toml::from_str("[thresholds]\nmax_sub_lines = 80\nmax_sub_complexity = 20\n").unwrap();
        let mut args = make_args();
        args.max_sub_complexity = Some(5);
        args.only_machine_output = true;

        config.merge_with_args(&args);

        assert_eq!(config.thresholds.max_sub_lines, 80);
        assert_eq!(config.thresholds.max_sub_complexity, 5);
        assert!(config.output.only_machine_output);
        assert!(!config.output.show_only_errors);
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = Config::default();
        config.thresholds.max_sub_complexity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[output]\nonly_machine_output = true\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert!(config.output.only_machine_output);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[thresholds\nmax_sub_lines = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[thresholds]"));
        assert!(toml_str.contains("max_sub_lines = 60"));
        assert!(toml_str.contains("[output]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.thresholds.max_sub_complexity, 10);
    }
}
