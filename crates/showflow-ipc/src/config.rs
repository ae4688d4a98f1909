//! Switcher configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowflowConfig {
    /// Output surface settings.
    pub output: OutputConfig,

    /// Liveness polling settings.
    pub monitor: MonitorConfig,

    /// Capture request constraints.
    pub capture: CaptureConfig,
}

impl ShowflowConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Output surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Address of the main context; the output route is appended as a fragment.
    pub base_url: String,

    /// Fragment that selects output mode.
    pub route: String,

    /// Name given to the output surface so reopening targets the same one.
    pub window_name: String,

    /// Requested surface width in pixels.
    pub width: u32,

    /// Requested surface height in pixels.
    pub height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/showflow/".to_string(),
            route: "projector".to_string(),
            window_name: "ShowFlowProjector".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Liveness polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Interval between liveness checks in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

/// Capture request constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Suppress the cursor in captured video.
    pub hide_cursor: bool,

    /// Request audio alongside video.
    pub audio: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            hide_cursor: true,
            audio: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ShowflowConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShowflowConfig::default());
        assert_eq!(config.monitor.poll_interval_ms, 1000);
        assert_eq!(config.output.route, "projector");
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = ShowflowConfig::from_toml_str(
            r#"
            [output]
            width = 1920
            height = 1080

            [monitor]
            poll_interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.output.width, 1920);
        assert_eq!(config.output.window_name, "ShowFlowProjector");
        assert_eq!(config.monitor.poll_interval_ms, 250);
        assert!(config.capture.hide_cursor);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err =
            ShowflowConfig::from_toml_str("[monitor]\npoll_interval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
