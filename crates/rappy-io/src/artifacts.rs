use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use rappy_core::Frame;
use rappy_core::error::ArtifactWriteError;
use rappy_core::ports::{ArtifactCategory, ArtifactSink};

/// Writes snapshots to `<root>/<category>/<category>_detected_<timestamp>.png`
#[derive(Debug, Clone)]
pub struct DirArtifactSink {
    root: PathBuf,
}

impl DirArtifactSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, category: ArtifactCategory, at: DateTime<Local>) -> PathBuf {
        let stamp = at.format("%Y%m%d_%H%M%S_%3f");
        self.root
            .join(category.as_str())
            .join(format!("{category}_detected_{stamp}.png"))
    }
}

impl ArtifactSink for DirArtifactSink {
    fn persist(
        &self,
        category: ArtifactCategory,
        frame: &Frame,
    ) -> Result<PathBuf, ArtifactWriteError> {
        let path = self.path_for(category, frame.captured_at());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        frame.image().save(&path)?;
        tracing::debug!("Saved {} snapshot to {}", category, path.display());
        Ok(path)
    }
}

/// Discards everything. Used when artifact saving is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullArtifactSink;

impl ArtifactSink for NullArtifactSink {
    fn persist(
        &self,
        category: ArtifactCategory,
        _frame: &Frame,
    ) -> Result<PathBuf, ArtifactWriteError> {
        tracing::trace!("Skipping {} snapshot", category);
        Ok(PathBuf::new())
    }
}
