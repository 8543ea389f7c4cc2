//! Configuration file support for methanetree
//!
//! Reads from .methanetree/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Treemap drawing settings
    #[serde(default)]
    pub chart: ChartConfig,

    /// Viewer server settings
    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Margins around the drawing area, in pixels
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 0.0,
            right: 20.0,
            bottom: 20.0,
            left: 20.0,
        }
    }
}

/// Treemap drawing settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Upper bound on the outer width
    pub max_width: f64,
    /// Upper bound on the outer height
    pub max_height: f64,
    pub margin: Margin,
    /// Gap between tiles
    pub padding: f64,
    /// Tiles narrower than this get no label
    pub label_min_width: f64,
    /// Fill for the smallest tiles
    pub color_low: String,
    /// Fill for the largest tiles (reached at 1.5x the largest leaf)
    pub color_high: String,
    pub transition_ms: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_width: 520.0,
            max_height: 500.0,
            margin: Margin::default(),
            padding: 4.0,
            label_min_width: 60.0,
            color_low: "#fee3d6".to_string(),
            color_high: "#67000d".to_string(),
            transition_ms: 500,
        }
    }
}

/// Viewer server settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServeConfig {
    pub port: u16,
    /// Reload records and reset the view when the data file changes
    pub watch: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 3100,
            watch: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from .methanetree/config.toml
    /// Returns default config if file doesn't exist or doesn't parse
    pub fn load() -> Self {
        Self::find_config_path()
            .and_then(|path| Self::from_file(&path).ok())
            .unwrap_or_default()
    }

    /// Parse a specific config file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".methanetree").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chart.max_width, 520.0);
        assert_eq!(config.chart.max_height, 500.0);
        assert_eq!(config.chart.margin.left, 20.0);
        assert_eq!(config.chart.margin.top, 0.0);
        assert_eq!(config.chart.label_min_width, 60.0);
        assert_eq!(config.serve.port, 3100);
        assert!(config.serve.watch);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r##"
[chart]
padding = 2
color_high = "#000000"

[serve]
port = 8080
"##;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.chart.padding, 2.0);
        assert_eq!(config.chart.color_high, "#000000");
        assert_eq!(config.chart.color_low, "#fee3d6");
        assert_eq!(config.serve.port, 8080);
        assert!(config.serve.watch);
    }

    #[test]
    fn test_from_file_reports_bad_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[serve\nport = ").unwrap();
        assert!(matches!(Config::from_file(&path), Err(crate::Error::Config(_))));
    }
}
