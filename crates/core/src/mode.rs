use serde::{Serialize, Serializer};
use std::fmt;

/// Learning-density tier derived from the engagement score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdaptiveMode {
    UltraSimplified,
    MicroLearning,
    Highlighted,
    Normal,
}

impl AdaptiveMode {
    /// Selects the mode for an engagement score.
    ///
    /// Thresholds are checked lowest first; the ranges are half-open:
    /// `<25`, `25..40`, `40..60`, `>=60`.
    pub fn from_engagement(engagement: u8) -> Self {
        if engagement < 25 {
            AdaptiveMode::UltraSimplified
        } else if engagement < 40 {
            AdaptiveMode::MicroLearning
        } else if engagement < 60 {
            AdaptiveMode::Highlighted
        } else {
            AdaptiveMode::Normal
        }
    }

    /// The display name of the mode.
    pub const fn label(self) -> &'static str {
        match self {
            AdaptiveMode::UltraSimplified => "Ultra Simplified",
            AdaptiveMode::MicroLearning => "Micro Learning",
            AdaptiveMode::Highlighted => "Highlighted",
            AdaptiveMode::Normal => "Normal",
        }
    }
}

impl fmt::Display for AdaptiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AdaptiveMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
