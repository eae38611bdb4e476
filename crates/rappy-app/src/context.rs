use rappy_core::ports::{ArtifactSink, DigitRecognizer, FrameSource, KeyInjector, Notifier};
use rappy_io::NullArtifactSink;

/// The outside world as seen by the controller
///
/// Everything here is swappable, so the scenario tests run the real controller
/// against scripted frames and recording fakes.
pub struct MonitorContext {
    pub source: Box<dyn FrameSource>,
    pub keys: Box<dyn KeyInjector>,
    pub recognizer: Box<dyn DigitRecognizer>,
    /// `None` when webhooks are disabled or unconfigured
    pub notifier: Option<Box<dyn Notifier>>,
    pub artifacts: Box<dyn ArtifactSink>,
}

impl MonitorContext {
    pub fn new(
        source: Box<dyn FrameSource>,
        keys: Box<dyn KeyInjector>,
        recognizer: Box<dyn DigitRecognizer>,
    ) -> Self {
        Self {
            source,
            keys,
            recognizer,
            notifier: None,
            artifacts: Box::new(NullArtifactSink),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_artifacts(mut self, artifacts: Box<dyn ArtifactSink>) -> Self {
        self.artifacts = artifacts;
        self
    }
}
