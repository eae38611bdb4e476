use rappy_types::{CaptureRegion, PixelSample, Point, Rgb};
use serde::{Deserialize, Serialize};

fn default_tolerance() -> u8 {
    10
}

/// Sample point on the left edge of the final pip
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PipConfig {
    pub at: Point,
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,
    pub filled: Rgb,
    pub empty: Rgb,
}

impl PipConfig {
    pub fn filled_sample(&self) -> PixelSample {
        PixelSample {
            at: self.at,
            expected: self.filled,
            tolerance: self.tolerance,
        }
    }

    pub fn empty_sample(&self) -> PixelSample {
        PixelSample {
            at: self.at,
            expected: self.empty,
            tolerance: self.tolerance,
        }
    }
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            at: Point { x: 156, y: 260 },
            tolerance: default_tolerance(),
            filled: Rgb(147, 103, 29),
            empty: Rgb(119, 115, 101),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SkyConfig {
    pub at: Point,
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,
    /// Turquoise
    pub default: Rgb,
    /// Lavender
    pub chance: Rgb,
    /// Dark blue
    pub burst: Rgb,
}

impl SkyConfig {
    fn sample(&self, expected: Rgb) -> PixelSample {
        PixelSample {
            at: self.at,
            expected,
            tolerance: self.tolerance,
        }
    }

    pub fn default_sample(&self) -> PixelSample {
        self.sample(self.default)
    }

    pub fn chance_sample(&self) -> PixelSample {
        self.sample(self.chance)
    }

    pub fn burst_sample(&self) -> PixelSample {
        self.sample(self.burst)
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            at: Point { x: 738, y: 137 },
            tolerance: default_tolerance(),
            default: Rgb(2, 167, 231),
            chance: Rgb(213, 190, 217),
            burst: Rgb(2, 6, 215),
        }
    }
}

fn default_threshold() -> u8 {
    50
}

fn default_charset() -> String {
    "0123456789,".to_string()
}

/// Casino coin display
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CounterConfig {
    pub region: CaptureRegion,
    /// Gray levels above this turn black after inversion
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            region: CaptureRegion {
                x: 680,
                y: 705,
                width: 70,
                height: 35,
            },
            threshold: default_threshold(),
            charset: default_charset(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ClassifierConfig {
    pub pip: PipConfig,
    pub sky: SkyConfig,
    pub counter: CounterConfig,
}
