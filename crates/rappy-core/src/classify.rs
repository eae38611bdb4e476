use image::{GrayImage, Luma};
use rappy_config::classifier::{ClassifierConfig, CounterConfig, PipConfig, SkyConfig};
use rappy_types::{ObservedState, Pip, PixelSample, Rgb, Sky};

use crate::frame::Frame;
use crate::ports::DigitRecognizer;

/// True when every channel differs by at most `tolerance`
pub fn color_matches(actual: Rgb, expected: Rgb, tolerance: u8) -> bool {
    actual
        .channels()
        .into_iter()
        .zip(expected.channels())
        .all(|(a, e)| a.abs_diff(e) <= tolerance)
}

/// Sampled pixel is inside the frame and within tolerance of the expected color
pub fn sample_matches(frame: &Frame, sample: &PixelSample) -> bool {
    frame
        .pixel(sample.at)
        .is_some_and(|color| color_matches(color, sample.expected, sample.tolerance))
}

/// Filled is tested first, so a color close to both resolves as filled
pub fn classify_pip(frame: &Frame, config: &PipConfig) -> Option<Pip> {
    if sample_matches(frame, &config.filled_sample()) {
        Some(Pip::Filled)
    } else if sample_matches(frame, &config.empty_sample()) {
        Some(Pip::Empty)
    } else {
        None
    }
}

/// Priority default > chance > burst, first match wins
pub fn classify_sky(frame: &Frame, config: &SkyConfig) -> Option<Sky> {
    [
        (Sky::Default, config.default_sample()),
        (Sky::Chance, config.chance_sample()),
        (Sky::Burst, config.burst_sample()),
    ]
    .into_iter()
    .find(|(_, sample)| sample_matches(frame, sample))
    .map(|(sky, _)| sky)
}

pub fn classify(frame: &Frame, config: &ClassifierConfig) -> ObservedState {
    let observed = ObservedState {
        pip: classify_pip(frame, &config.pip),
        sky: classify_sky(frame, &config.sky),
    };

    tracing::debug!(
        pip_color = ?frame.pixel(config.pip.at),
        sky_color = ?frame.pixel(config.sky.at),
        ?observed,
        "classified frame"
    );

    observed
}

/// Crop the coin display, gray it and threshold with inverted polarity so the
/// digits come out dark on a light background
pub fn binarize_counter(frame: &Frame, config: &CounterConfig) -> GrayImage {
    let mut gray = frame.crop(config.region).to_gray();
    for Luma([value]) in gray.pixels_mut() {
        *value = if *value > config.threshold { 0 } else { 255 };
    }
    gray
}

/// Raw counter label for notification footers. Best-effort: recognition
/// failures are logged and yield an empty string.
pub fn read_counter_text(
    frame: &Frame,
    config: &CounterConfig,
    recognizer: &dyn DigitRecognizer,
) -> String {
    let binary = binarize_counter(frame, config);
    if binary.width() == 0 || binary.height() == 0 {
        tracing::warn!("Counter region {:?} lies outside the frame", config.region);
        return String::new();
    }

    match recognizer.recognize(&binary, &config.charset) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!("Counter recognition failed: {}", e);
            String::new()
        }
    }
}
