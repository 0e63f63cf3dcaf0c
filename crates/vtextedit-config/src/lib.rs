use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// When the editor scrolls so the cursor block sits in the middle of the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterCursor {
    #[default]
    NeverCenter,
    AlwaysCenter,
    /// Only recenter once the cursor block drops below the middle of the page
    CenterOnBottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Insert spaces instead of a tab character on Tab
    pub expand_tab: bool,
    pub tab_stop_width_in_spaces: usize,
    pub center_cursor: CenterCursor,
    /// Name of the input mode to install, e.g. "normal"
    pub input_mode: String,
    pub line_height: f32,
    pub char_width: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            expand_tab: true,
            tab_stop_width_in_spaces: 4,
            center_cursor: CenterCursor::NeverCenter,
            input_mode: "normal".to_string(),
            line_height: 20.0,
            char_width: 8.0,
        }
    }
}

impl EditorConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: EditorConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config.sanitized()))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/vtextedit");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Replace values a layout cannot work with by their defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.tab_stop_width_in_spaces == 0 {
            self.tab_stop_width_in_spaces = defaults.tab_stop_width_in_spaces;
        }
        if self.line_height.is_nan() || self.line_height <= 0.0 {
            self.line_height = defaults.line_height;
        }
        if self.char_width.is_nan() || self.char_width <= 0.0 {
            self.char_width = defaults.char_width;
        }
        self
    }
}
