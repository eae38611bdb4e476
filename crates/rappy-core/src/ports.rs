//! Seams between the monitor and the outside world.
//!
//! The controller talks to the window, the keyboard, the OCR engine, the
//! webhook and the snapshot directory only through these traits, so the
//! classification and state logic can run against in-memory fakes.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use image::GrayImage;
use tokio_util::sync::CancellationToken;

use crate::error::{ArtifactWriteError, CaptureError, DeliveryError, RecognizeError};
use crate::frame::Frame;
use crate::notification::Notification;

/// Produces full-window frames on demand
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self) -> Result<Frame, CaptureError>;
}

/// Synchronous, fire-and-forget key injection
pub trait KeyInjector: Send {
    fn press(&mut self, key: &str);
}

/// Opaque digit recognition over an already binarized image
pub trait DigitRecognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage, charset: &str) -> Result<String, RecognizeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub status: u16,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<Ack, DeliveryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
    Chance,
    Burst,
    /// Homing hit on the wild indicator
    Wild,
    Failsafe,
}

impl ArtifactCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactCategory::Chance => "chance",
            ArtifactCategory::Burst => "burst",
            ArtifactCategory::Wild => "wild",
            ArtifactCategory::Failsafe => "failsafe",
        }
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort snapshot persistence
pub trait ArtifactSink: Send + Sync {
    fn persist(&self, category: ArtifactCategory, frame: &Frame)
    -> Result<PathBuf, ArtifactWriteError>;
}

/// Polled stop condition, never awaited
pub trait CancelSignal: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}
