use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_title() -> String {
    "PHANTASY STAR ONLINE 2 NEW GENESIS".to_string()
}

fn default_capture_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    /// Case-insensitive substring of the target window title
    #[serde(default = "default_title")]
    pub title: String,
    /// Upper bound for a single capture call
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            capture_timeout_ms: default_capture_timeout_ms(),
        }
    }
}

impl WindowConfig {
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }
}
