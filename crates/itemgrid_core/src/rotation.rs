use std::fmt;

use serde::{Deserialize, Serialize};

/// Quarter-turn rotation stored in the low two bits of an item's system param.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub const MASK: u8 = 0b11;

    pub fn from_raw(raw: u8) -> Self {
        match raw & Self::MASK {
            0 => Self::None,
            1 => Self::Quarter,
            2 => Self::Half,
            _ => Self::ThreeQuarter,
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::None => 0,
            Self::Quarter => 1,
            Self::Half => 2,
            Self::ThreeQuarter => 3,
        }
    }

    /// Odd rotations lie on their side, swapping footprint width and height.
    pub fn is_sideways(&self) -> bool {
        self.raw() & 1 == 1
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::None => "0",
            Self::Quarter => "90",
            Self::Half => "180",
            Self::ThreeQuarter => "270",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.as_str())
    }
}
