use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_action_key() -> String {
    "enter".to_string()
}

fn default_stop_hotkey() -> String {
    "ctrl+shift+KeyQ".to_string()
}

fn default_advance() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ControlsConfig {
    /// Key pressed on a hit, on the failsafe and to advance the slots
    #[serde(default = "default_action_key")]
    pub action_key: String,
    /// Global hotkey that stops the run
    #[serde(default = "default_stop_hotkey")]
    pub stop_hotkey: String,
    /// Press the action key at the end of every poll cycle
    #[serde(default = "default_advance")]
    pub advance_each_cycle: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ControlsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            action_key: default_action_key(),
            stop_hotkey: default_stop_hotkey(),
            advance_each_cycle: default_advance(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
