//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/folio/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::PdfRendererConfig;
use crate::measure::{BoxMetrics, PageGeometry};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Page size and padding in CSS pixels
    #[serde(default)]
    pub page: PageGeometry,

    /// Layout approximation used to measure page content
    #[serde(default)]
    pub metrics: BoxMetrics,

    /// Largest row or column count accepted when inserting a table
    #[serde(default = "default_max_table_dimension")]
    pub max_table_dimension: usize,

    /// External program that turns exported HTML into PDF
    #[serde(default)]
    pub pdf_renderer: PdfRendererConfig,

    /// Title used when the export title prompt is left blank
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Author used when the export author prompt is left blank
    #[serde(default = "default_author")]
    pub default_author: String,
}

fn default_max_table_dimension() -> usize {
    50
}

fn default_title() -> String {
    "Untitled Document".to_string()
}

fn default_author() -> String {
    "Anonymous".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            metrics: BoxMetrics::default(),
            max_table_dimension: default_max_table_dimension(),
            pdf_renderer: PdfRendererConfig::default(),
            default_title: default_title(),
            default_author: default_author(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<EditorConfig>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace values that would make pagination meaningless with defaults
    fn sanitized(mut self) -> Self {
        let defaults = PageGeometry::default();
        if self.page.width <= 2.0 * self.page.padding || self.page.height <= 2.0 * self.page.padding {
            tracing::warn!("Page geometry leaves no content area, using defaults");
            self.page = defaults;
        }
        if self.max_table_dimension == 0 {
            self.max_table_dimension = default_max_table_dimension();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EditorConfig = serde_yaml::from_str("max_table_dimension: 10\n").unwrap();
        assert_eq!(config.max_table_dimension, 10);
        assert_eq!(config.default_title, "Untitled Document");
        assert_eq!(config.page, PageGeometry::default());
    }

    #[test]
    fn test_degenerate_geometry_is_replaced() {
        let mut config = EditorConfig::default();
        config.page.padding = 600.0;
        assert_eq!(config.sanitized().page, PageGeometry::default());
    }
}
