//! Page configuration loaded from TOML
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! seed = 7
//!
//! [detection]
//! mobile_viewport_px = 768
//! low_memory_gb = 4.0
//! slow_connections = ["slow-2g", "2g", "3g"]
//! low_capability_signatures = ["android"]
//! low_battery_level = 0.2
//!
//! [watchdog]
//! min_fps = 30
//! consecutive_windows = 2
//! window_ms = 1000
//!
//! [timing]
//! loader_ms = 3000
//! carousel_interval_ms = 5000
//! ```

use std::time::Duration;

use devices::Thresholds;
use logic::WatchdogConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Timer lengths used by the page, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Loader hold time
    pub loader_ms: u64,
    /// Loader hold time on a low-capability OS
    pub loader_fast_ms: u64,
    /// Loader fade-out
    pub loader_fade_ms: u64,
    /// Testimonial auto-rotation
    pub carousel_interval_ms: u64,
    pub form_sending_ms: u64,
    pub form_reset_ms: u64,
    /// How long confetti falls after a submit
    pub confetti_ms: u64,
    /// Delay before hero particles and counters start
    pub hero_start_ms: u64,
    /// Lifetime of a touch ripple
    pub ripple_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loader_ms: 3000,
            loader_fast_ms: 1500,
            loader_fade_ms: 800,
            carousel_interval_ms: 5000,
            form_sending_ms: 2000,
            form_reset_ms: 3000,
            confetti_ms: 3000,
            hero_start_ms: 1000,
            ripple_ms: 1000,
        }
    }
}

impl TimingConfig {
    pub fn loader_hold(&self, low_capability_os: bool) -> Duration {
        Duration::from_millis(if low_capability_os {
            self.loader_fast_ms
        } else {
            self.loader_ms
        })
    }

    pub fn loader_fade(&self) -> Duration {
        Duration::from_millis(self.loader_fade_ms)
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms)
    }

    pub fn form_sending(&self) -> Duration {
        Duration::from_millis(self.form_sending_ms)
    }

    pub fn form_reset(&self) -> Duration {
        Duration::from_millis(self.form_reset_ms)
    }

    pub fn confetti(&self) -> Duration {
        Duration::from_millis(self.confetti_ms)
    }

    pub fn hero_start(&self) -> Duration {
        Duration::from_millis(self.hero_start_ms)
    }

    pub fn ripple(&self) -> Duration {
        Duration::from_millis(self.ripple_ms)
    }
}

/// Everything a page session can be tuned with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub detection: Thresholds,
    pub watchdog: WatchdogConfig,
    pub timing: TimingConfig,
    /// Seed for effect parameters; random when absent
    pub seed: Option<u64>,
}

impl PageConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "Loaded page config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watchdog.window_ms == 0 {
            return Err(ConfigError::Invalid("watchdog.window_ms must be positive".into()));
        }
        if self.watchdog.consecutive_windows == 0 {
            return Err(ConfigError::Invalid(
                "watchdog.consecutive_windows must be positive".into(),
            ));
        }
        let level = self.detection.low_battery_level;
        if !(0.0..=1.0).contains(&level) {
            return Err(ConfigError::Invalid(format!(
                "detection.low_battery_level must be within 0..=1, got {level}"
            )));
        }
        Ok(())
    }
}
