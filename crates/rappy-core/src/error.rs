use std::time::Duration;

/// Fatal to the run: the window is gone or the graphics stack failed
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No window matching '{0}'")]
    WindowNotFound(String),

    #[error("Window '{0}' is minimized")]
    WindowMinimized(String),

    #[error("Capture backend error: {0}")]
    Backend(String),

    #[error("Capture returned an empty frame")]
    EmptyFrame,

    #[error("Malformed capture buffer: expected {expected} bytes, got {actual}")]
    MalformedBuffer { expected: usize, actual: usize },

    #[error("Capture timed out after {0:?}")]
    Timeout(Duration),
}

/// Notification failed. Logged by the caller, never retried.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Endpoint rejected notification with status {status}")]
    Rejected { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Notification timed out")]
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactWriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizeError {
    #[error("Recognizer engine error: {0}")]
    Engine(String),

    #[error("Empty image: width or height is 0")]
    EmptyImage,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to load template: {0}")]
    Load(#[from] image::ImageError),

    #[error("Template has no pixels")]
    Empty,

    #[error("Template is a single flat gray level and cannot be correlated")]
    Flat,
}
