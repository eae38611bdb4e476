use image::{ExtendedColorType, GrayImage, ImageEncoder, codecs::png::PngEncoder};
use rappy_core::RecognizeError;
use rappy_core::ports::DigitRecognizer;

/// PNG-encode a grayscale image for engines that read from memory
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, RecognizeError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| RecognizeError::Engine(format!("failed to encode PNG: {e}")))?;
    Ok(buffer)
}

/// Used when no OCR engine is compiled in. Footers come out as `Coins: `.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecognizer;

impl DigitRecognizer for NullRecognizer {
    fn recognize(&self, _image: &GrayImage, _charset: &str) -> Result<String, RecognizeError> {
        Ok(String::new())
    }
}

#[cfg(feature = "ocr")]
pub use tesseract::TesseractRecognizer;

#[cfg(feature = "ocr")]
mod tesseract {
    use std::path::PathBuf;

    use image::GrayImage;
    use leptess::{LepTess, Variable};
    use rappy_core::RecognizeError;
    use rappy_core::ports::DigitRecognizer;

    use super::encode_png;

    /// Single-line Tesseract recognition restricted to a charset
    pub struct TesseractRecognizer {
        tessdata: Option<PathBuf>,
        language: String,
    }

    impl TesseractRecognizer {
        pub fn new(tessdata: Option<PathBuf>) -> Self {
            Self {
                tessdata,
                language: "eng".to_string(),
            }
        }
    }

    impl DigitRecognizer for TesseractRecognizer {
        fn recognize(&self, image: &GrayImage, charset: &str) -> Result<String, RecognizeError> {
            if image.width() == 0 || image.height() == 0 {
                return Err(RecognizeError::EmptyImage);
            }

            let tessdata = self
                .tessdata
                .as_ref()
                .map(|p| p.to_string_lossy().to_string());
            let mut lt = LepTess::new(tessdata.as_deref(), &self.language)
                .map_err(|e| RecognizeError::Engine(e.to_string()))?;

            lt.set_variable(Variable::TesseditCharWhitelist, charset)
                .map_err(|e| RecognizeError::Engine(e.to_string()))?;
            lt.set_variable(Variable::TesseditPagesegMode, "7")
                .map_err(|e| RecognizeError::Engine(e.to_string()))?;

            let png = encode_png(image)?;
            lt.set_image_from_mem(&png)
                .map_err(|e| RecognizeError::Engine(e.to_string()))?;

            let text = lt
                .get_utf8_text()
                .map_err(|e| RecognizeError::Engine(e.to_string()))?;
            Ok(text.trim().to_string())
        }
    }
}
