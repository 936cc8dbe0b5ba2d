//! Progress bar configuration and settings

use crate::animation::Easing;
use crate::error::{ProgressError, ProgressResult};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Track and fill colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarColors {
    /// Background track behind the moving fill (light blue)
    pub track: Color,
    /// The moving fill (blue)
    pub fill: Color,
}

impl Default for BarColors {
    fn default() -> Self {
        Self {
            track: Color::Rgb(186, 222, 250),
            fill: Color::Rgb(31, 135, 230),
        }
    }
}

/// Full configuration surface of a progress indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressBarConfig {
    /// Height the bar grows to
    pub bar_height: f64,

    /// Explicit bar width; 0 tracks the container width
    pub bar_width: f64,

    /// Vertical offset of the bar inside its container
    pub top_offset: f64,

    /// Duration of the grow-in and shrink-out animations
    #[serde(with = "duration_secs")]
    pub grow_duration: Duration,

    /// Duration of one sweep iteration
    #[serde(with = "duration_secs")]
    pub sweep_duration: Duration,

    /// Curve used for the grow-in and shrink-out animations
    pub grow_easing: Easing,

    /// How often the demo host advances animations
    #[serde(with = "duration_secs")]
    pub tick_rate: Duration,

    pub colors: BarColors,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            bar_height: 5.0,
            bar_width: 0.0,
            top_offset: 0.0,
            grow_duration: Duration::from_millis(500),
            sweep_duration: Duration::from_secs(1),
            grow_easing: Easing::EaseInOut,
            tick_rate: Duration::from_millis(16),
            colors: BarColors::default(),
        }
    }
}

impl ProgressBarConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("linear-progress").join("config.toml"))
    }

    /// Load configuration from file, falling back to defaults if it does not exist
    pub async fn load_from_file(path: &Path) -> ProgressResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_toml(&content)?;
        tracing::info!("Loaded progress bar config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> ProgressResult<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> ProgressResult<Self> {
        let config: ProgressBarConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate, then render as pretty TOML
    pub fn to_toml(&self) -> ProgressResult<String> {
        self.validate()?;
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> ProgressResult<()> {
        for (name, value) in [
            ("bar_height", self.bar_height),
            ("bar_width", self.bar_width),
            ("top_offset", self.top_offset),
        ] {
            if !value.is_finite() {
                return Err(ProgressError::config_error(format!("{} must be finite", name)));
            }
            if value < 0.0 {
                return Err(ProgressError::config_error(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }

        if self.sweep_duration.is_zero() {
            return Err(ProgressError::config_error("sweep_duration must be greater than 0"));
        }

        if self.tick_rate.is_zero() {
            return Err(ProgressError::config_error("tick_rate must be greater than 0"));
        }

        Ok(())
    }
}

/// Durations stored as fractional seconds
mod duration_secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
