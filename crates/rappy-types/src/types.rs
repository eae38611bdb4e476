use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 8-bit RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Packed `0xRRGGBB`, the form webhook embeds expect
    pub const fn to_hex(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }

    pub const fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Window-relative coordinate, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A single sampled pixel and the color it is expected to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSample {
    pub at: Point,
    pub expected: Rgb,
    /// Max per-channel absolute difference still counted as a match
    pub tolerance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pip {
    Filled,
    #[default]
    Empty,
}

impl fmt::Display for Pip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pip::Filled => "filled",
            Pip::Empty => "empty",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sky {
    #[default]
    Default,
    Chance,
    Burst,
}

impl fmt::Display for Sky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sky::Default => "default",
            Sky::Chance => "chance",
            Sky::Burst => "burst",
        })
    }
}

/// Classification of a single frame. `None` on an axis means the sampled
/// pixel matched no reference color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservedState {
    pub pip: Option<Pip>,
    pub sky: Option<Sky>,
}

/// Last accepted value on each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfirmedState {
    pub pip: Pip,
    pub sky: Sky,
}

impl ConfirmedState {
    pub const ARMED: ConfirmedState = ConfirmedState {
        pip: Pip::Filled,
        sky: Sky::Default,
    };

    /// Filled pip over the default sky opens the timed wild window
    pub fn is_armed(&self) -> bool {
        *self == Self::ARMED
    }
}

impl fmt::Display for ConfirmedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pip, self.sky)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Pip,
    Sky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "axis", rename_all = "lowercase")]
pub enum Change {
    Pip { from: Pip, to: Pip },
    Sky { from: Sky, to: Sky },
}

impl Change {
    pub fn axis(&self) -> Axis {
        match self {
            Change::Pip { .. } => Axis::Pip,
            Change::Sky { .. } => Axis::Sky,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub change: Change,
    pub occurred_at: DateTime<Local>,
    /// Free-form label attached by the controller, e.g. the coin counter
    pub auxiliary_text: Option<String>,
}

impl TransitionEvent {
    pub fn new(change: Change, occurred_at: DateTime<Local>) -> Self {
        Self {
            change,
            occurred_at,
            auxiliary_text: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.change.axis()
    }
}

/// Terminal result of one homing run, carrying the number of samples taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum HomingOutcome {
    Hit { samples: u32 },
    Failsafe { samples: u32 },
}
