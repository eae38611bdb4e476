use std::path::PathBuf;
use std::time::Duration;

use rappy_types::CaptureRegion;
use serde::{Deserialize, Serialize};

fn default_template_path() -> PathBuf {
    PathBuf::from("wild_indicator.png")
}

fn default_region() -> CaptureRegion {
    CaptureRegion {
        x: 440,
        y: 160,
        width: 400,
        height: 400,
    }
}

fn default_confidence() -> f32 {
    0.8
}

fn default_ceiling() -> u32 {
    200
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_cooldown_ms() -> u64 {
    3000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HomingConfig {
    /// Area searched for the wild indicator. Depends on window layout.
    #[serde(default = "default_region")]
    pub region: CaptureRegion,
    /// Image of the bottom of the wild indicator the circle homes in on
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    /// Correlation score that counts as a hit
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// Samples taken before the failsafe fires
    #[serde(default = "default_ceiling")]
    pub ceiling: u32,
    /// Pause between samples, 0 samples as fast as capture allows
    pub sample_interval_ms: u64,
    /// Wait after the armed state is confirmed, before sampling starts
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Wait after the key press that ends a homing run
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl HomingConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            template_path: default_template_path(),
            confidence: default_confidence(),
            ceiling: default_ceiling(),
            sample_interval_ms: 0,
            settle_ms: default_settle_ms(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}
