use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NotifierConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Discord-compatible webhook. Empty disables delivery.
    pub webhook_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Also post pip filled/empty changes
    pub notify_pip_changes: bool,
}

impl NotifierConfig {
    pub fn is_active(&self) -> bool {
        self.enabled && !self.webhook_url.trim().is_empty()
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            webhook_url: String::new(),
            timeout_ms: default_timeout_ms(),
            notify_pip_changes: false,
        }
    }
}
