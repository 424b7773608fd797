//! TOML configuration for the `realty` front-end.
//!
//! Every table and key is optional; an empty file yields
//! [`AppConfig::default`]. Command-line flags override what is loaded here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::PropertyForm;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Any `EnvFilter` directive, e.g. `"info"` or `"info,realty_core=debug"`.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Initial values for the interactive form.
    pub defaults: PropertyForm,
    pub chart: ChartConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Columns available to the bars.
    pub width: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: String,
    /// Used by a bare `--export`; unset means `multi_property_analysis.<ext>`.
    pub file_name: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            defaults: PropertyForm::default(),
            chart: ChartConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 40,
            title: "Return on Investment by Property".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            file_name: None,
        }
    }
}

impl ExportConfig {
    /// Where a bare `--export` writes, given the chosen writer's extension.
    pub fn default_path(
        &self,
        extension: &str,
    ) -> PathBuf {
        self.file_name
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("multi_property_analysis.{extension}")))
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.export.file_name, None);
        assert_eq!(config.chart.width, 40);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            log_level = "debug"

            [defaults]
            name = "Duplex"
            purchase_price = "350000"

            [chart]
            width = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.defaults.name, "Duplex");
        assert_eq!(config.defaults.purchase_price, "350000");
        assert_eq!(config.defaults.down_payment, "40000");
        assert_eq!(config.chart.width, 60);
        assert_eq!(config.chart.title, "Return on Investment by Property");
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn log_file_is_a_path() {
        let config = AppConfig::from_toml_str(r#"log_file = "logs/realty.log""#).unwrap();

        assert_eq!(config.log_file, Some(PathBuf::from("logs/realty.log")));
    }

    #[test]
    fn default_export_path_follows_format_extension() {
        let config = AppConfig::default();

        assert_eq!(
            config.export.default_path("csv"),
            PathBuf::from("multi_property_analysis.csv")
        );
        assert_eq!(
            config.export.default_path("json"),
            PathBuf::from("multi_property_analysis.json")
        );
    }

    #[test]
    fn configured_export_file_name_wins() {
        let config =
            AppConfig::from_toml_str("[export]\nfile_name = \"out/compare.json\"").unwrap();

        assert_eq!(
            config.export.default_path("csv"),
            PathBuf::from("out/compare.json")
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = AppConfig::from_toml_str("colour = \"blue\"").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = AppConfig::from_toml_str("[chart]\nwidth = \"wide\"").unwrap_err();

        assert!(err.to_string().starts_with("invalid config:"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/this/path/does/not/exist.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
