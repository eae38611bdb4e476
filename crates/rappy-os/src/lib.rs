mod capture;
mod hotkey;
mod keys;
mod ocr;

pub use capture::{WindowFrameSource, list_windows};
pub use hotkey::HotkeyManager;
pub use keys::{EnigoKeyInjector, LoggingKeyInjector, parse_key};
#[cfg(feature = "ocr")]
pub use ocr::TesseractRecognizer;
pub use ocr::{NullRecognizer, encode_png};
