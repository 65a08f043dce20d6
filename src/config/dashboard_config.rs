//! Dashboard Configuration - data source, selection, model mode and sliders
//!
//! Each section implements `Default` with the values the dashboard ships with,
//! so a missing or partial `dashboard.toml` behaves exactly like no file at all.

use super::defaults::{
    DEFAULT_DATA_PATH, DEFAULT_REGION_COUNT, DEFAULT_SHEET, OUTPUT_SLIDER, SPENDING_SLIDER,
};
use crate::data_prep::{DataSource, NonPositivePolicy};
use crate::types::{CoefficientMode, SliderRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SPENDING_IMPACT_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "dashboard.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$SPENDING_IMPACT_CONFIG`
/// 2. `./dashboard.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded dashboard config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dashboard config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No dashboard.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate ranges and required values, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.data.sheet.trim().is_empty() {
            errors.push("data.sheet must not be empty".to_string());
        }
        if self.data.path.as_os_str().is_empty() {
            errors.push("data.path must not be empty".to_string());
        }
        if self.selection.default_region_count == 0 {
            errors.push("selection.default_region_count must be > 0".to_string());
        }

        Self::check_slider(&self.simulation.spending, "simulation.spending", &mut errors);
        Self::check_slider(&self.simulation.output, "simulation.output", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_slider(range: &SliderRange, name: &str, errors: &mut Vec<String>) {
        if !(range.min.is_finite() && range.max.is_finite()) || range.min >= range.max {
            errors.push(format!(
                "{name}: min ({:.2}) must be less than max ({:.2})",
                range.min, range.max
            ));
        }
        if !(range.step.is_finite() && range.step > 0.0) {
            errors.push(format!("{name}.step ({}) must be > 0", range.step));
        }
        if !range.contains(range.default) {
            errors.push(format!(
                "{name}.default ({:.2}) must lie within [{:.2}, {:.2}]",
                range.default, range.min, range.max
            ));
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Where the observations come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file or workbook
    pub path: PathBuf,
    /// Sheet name (workbooks only)
    pub sheet: String,
    /// Handling of non-positive spending / service output
    pub non_positive: NonPositivePolicy,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
            sheet: DEFAULT_SHEET.to_string(),
            non_positive: NonPositivePolicy::Reject,
        }
    }
}

impl DataConfig {
    pub fn source(&self) -> DataSource {
        DataSource::new(self.path.clone(), self.sheet.clone())
    }
}

/// Chart selection defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Leading regions selected when `regions` is empty
    pub default_region_count: usize,
    /// Explicit region selection
    pub regions: Vec<String>,
    /// Explicit year selection (empty = all years)
    pub years: Vec<i32>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_region_count: DEFAULT_REGION_COUNT,
            regions: Vec::new(),
            years: Vec::new(),
        }
    }
}

/// Coefficient source selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub mode: CoefficientMode,
    /// Fit on the selected rows instead of the full table
    pub fit_on_selection: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mode: CoefficientMode::Dynamic,
            fit_on_selection: false,
        }
    }
}

/// Slider ranges for the simulation panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub spending: SliderRange,
    pub output: SliderRange,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spending: SPENDING_SLIDER,
            output: OUTPUT_SLIDER,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.sheet, "BENER");
        assert_eq!(config.selection.default_region_count, 3);
        assert_eq!(config.model.mode, CoefficientMode::Dynamic);
        assert!(!config.model.fit_on_selection);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
[model]
mode = "static"
"#,
        )
        .unwrap();
        assert_eq!(config.model.mode, CoefficientMode::Static);
        assert_eq!(config.simulation.spending, SPENDING_SLIDER);
        assert_eq!(config.data.non_positive, NonPositivePolicy::Reject);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DashboardConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_slider_collects_all_errors() {
        let err = DashboardConfig::from_toml_str(
            r#"
[simulation.spending]
min = 29.0
max = 22.0
step = 0.0
default = 26.5
"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 3, "{errors:?}"),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_bad_policy_is_parse_error() {
        let err = DashboardConfig::from_toml_str("[data]\nnon_positive = \"clamp\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }
}
