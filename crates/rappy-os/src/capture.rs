use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use rappy_core::frame::{ChannelOrder, RawLayout};
use rappy_core::ports::FrameSource;
use rappy_core::{CaptureError, Frame};
use xcap::Window;

/// List all available windows with their titles
pub fn list_windows() -> Result<Vec<(u32, String)>> {
    let windows = Window::all().context("Failed to enumerate windows")?;
    Ok(windows
        .into_iter()
        .filter(|w| !w.title().is_empty() && !w.is_minimized())
        .map(|w| (w.id(), w.title().to_string()))
        .collect())
}

/// Grab the first window whose title contains `title` (case-insensitive)
fn capture_by_title(title: &str) -> Result<Frame, CaptureError> {
    let windows = Window::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
    let needle = title.to_lowercase();
    let window = windows
        .into_iter()
        .find(|w| w.title().to_lowercase().contains(&needle))
        .ok_or_else(|| CaptureError::WindowNotFound(title.to_string()))?;

    if window.is_minimized() {
        return Err(CaptureError::WindowMinimized(title.to_string()));
    }

    let captured_at = Local::now();
    let image = window
        .capture_image()
        .map_err(|e| CaptureError::Backend(e.to_string()))?;
    let (width, height) = (image.width(), image.height());

    Frame::from_raw(
        image.as_raw(),
        width,
        height,
        RawLayout::packed(ChannelOrder::Rgba),
        captured_at,
    )
}

/// Captures the game window's client area through xcap
pub struct WindowFrameSource {
    title: String,
    timeout: Duration,
}

impl WindowFrameSource {
    pub fn new(title: impl Into<String>, timeout: Duration) -> Self {
        Self {
            title: title.into(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for WindowFrameSource {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        let title = self.title.clone();
        let grab = tokio::task::spawn_blocking(move || capture_by_title(&title));

        match tokio::time::timeout(self.timeout, grab).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(CaptureError::Backend(format!("capture task failed: {e}"))),
            Err(_) => Err(CaptureError::Timeout(self.timeout)),
        }
    }
}
