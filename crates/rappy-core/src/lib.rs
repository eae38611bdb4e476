pub mod classify;
pub mod correlation;
pub mod error;
pub mod frame;
pub mod homing;
pub mod notification;
pub mod ports;
pub mod state;

pub use error::{ArtifactWriteError, CaptureError, DeliveryError, RecognizeError, TemplateError};
pub use frame::Frame;
