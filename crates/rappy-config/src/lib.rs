use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::artifacts::ArtifactConfig;
use self::classifier::ClassifierConfig;
use self::controls::ControlsConfig;
use self::homing::HomingConfig;
use self::notifier::NotifierConfig;
use self::window::WindowConfig;

pub mod artifacts;
pub mod classifier;
pub mod controls;
pub mod homing;
pub mod notifier;
pub mod window;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub classifier: ClassifierConfig,
    pub homing: HomingConfig,
    pub notifier: NotifierConfig,
    pub artifacts: ArtifactConfig,
    pub controls: ControlsConfig,
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Apply environment-style overrides; `lookup` is normally `std::env::var`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(title) = lookup("RAPPY_WINDOW_TITLE") {
            self.window.title = title;
        }

        if let Some(url) = lookup("WEBHOOK_URL") {
            self.notifier.webhook_url = url;
        }

        if let Some(ms) = parse_var(&lookup, "RAPPY_POLL_INTERVAL_MS") {
            self.controls.poll_interval_ms = ms;
        }

        if let Some(ceiling) = parse_var(&lookup, "RAPPY_HOMING_CEILING") {
            self.homing.ceiling = ceiling;
        }

        if let Some(root) = lookup("RAPPY_ARTIFACT_DIR") {
            self.artifacts.root = PathBuf::from(root);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.counter.region.is_empty() {
            return Err(ConfigError::Invalid {
                field: "classifier.counter.region",
                reason: "width and height must be non-zero".into(),
            });
        }

        if self.homing.region.is_empty() {
            return Err(ConfigError::Invalid {
                field: "homing.region",
                reason: "width and height must be non-zero".into(),
            });
        }

        if self.homing.ceiling == 0 {
            return Err(ConfigError::Invalid {
                field: "homing.ceiling",
                reason: "must allow at least one sample".into(),
            });
        }

        let confidence = self.homing.confidence;
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "homing.confidence",
                reason: format!("{confidence} is outside (0, 1]"),
            });
        }

        if self.controls.action_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "controls.action_key",
                reason: "must name a key".into(),
            });
        }

        Ok(())
    }
}
