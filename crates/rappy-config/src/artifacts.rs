use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_root() -> PathBuf {
    PathBuf::from("./detection_history")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ArtifactConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Snapshots land in `<root>/<category>/`
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            root: default_root(),
        }
    }
}
