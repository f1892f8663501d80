//! Contains common, primitive types shared across the clock face.
//!
//! This module defines the element handle type, the fixed set of stats
//! modes and the clock-display preference.

use crate::error::FaceError;
use serde::Deserialize;
use slotmap::new_key_type;
use std::fmt;
use std::str::FromStr;

new_key_type! {
    /// Uniquely and safely identifies an element within a `Document`.
    ///
    /// Handles are resolved once, when a component is constructed, and are
    /// then used for every later write.
    pub struct ElementId;
}

/// One of the rotating statistic categories shown in the stats slot.
///
/// The declaration order is the cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Mode {
    Calories,
    HeartRate,
    Steps,
    Distance,
    ActiveZoneMinutes,
}

impl Mode {
    /// Every mode, in cycling order.
    pub const ALL: [Mode; 5] = [
        Mode::Calories,
        Mode::HeartRate,
        Mode::Steps,
        Mode::Distance,
        Mode::ActiveZoneMinutes,
    ];

    /// Looks up the mode at `index` in the cycling order.
    pub fn from_index(index: usize) -> Option<Mode> {
        Self::ALL.get(index).copied()
    }

    /// Position of this mode in the cycling order.
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .unwrap_or_default()
    }

    /// The canonical mode name, also used as the icon stem.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Calories => "calories",
            Mode::HeartRate => "heartRate",
            Mode::Steps => "steps",
            Mode::Distance => "distance",
            Mode::ActiveZoneMinutes => "activeZoneMinutes",
        }
    }

    /// Resource name of the icon drawn next to this mode's value.
    pub fn icon(self) -> String {
        format!("{}.png", self.name())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = FaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| FaceError::UnknownMode(s.to_string()))
    }
}

impl TryFrom<String> for Mode {
    type Error = FaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The user's clock-display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ClockDisplay {
    #[serde(rename = "12h")]
    TwelveHour,
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl ClockDisplay {
    /// Interprets a raw preference value the way the device does: `"12h"`
    /// selects the 12-hour clock, anything else the 24-hour clock.
    pub fn from_preference(value: &str) -> Self {
        if value == "12h" {
            ClockDisplay::TwelveHour
        } else {
            ClockDisplay::TwentyFourHour
        }
    }
}

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockDisplay::TwelveHour => f.write_str("12h"),
            ClockDisplay::TwentyFourHour => f.write_str("24h"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_names_match_exactly() {
        assert_eq!("heartRate".parse::<Mode>().unwrap(), Mode::HeartRate);
        assert_eq!(
            "activeZoneMinutes".parse::<Mode>().unwrap(),
            Mode::ActiveZoneMinutes
        );
        assert!("HeartRate".parse::<Mode>().is_err());
        assert!("heart_rate".parse::<Mode>().is_err());
    }

    #[test]
    fn unknown_mode_name_is_reported() {
        let err = "pulse".parse::<Mode>().unwrap_err();
        assert!(matches!(err, FaceError::UnknownMode(ref name) if name == "pulse"));
    }

    #[test]
    fn index_follows_cycling_order() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
            assert_eq!(Mode::from_index(i), Some(*mode));
        }
        assert_eq!(Mode::from_index(5), None);
    }

    #[test]
    fn icon_uses_mode_name() {
        assert_eq!(Mode::Distance.icon(), "distance.png");
        assert_eq!(Mode::ActiveZoneMinutes.icon(), "activeZoneMinutes.png");
    }

    #[test]
    fn anything_but_12h_is_24h() {
        assert_eq!(ClockDisplay::from_preference("12h"), ClockDisplay::TwelveHour);
        assert_eq!(ClockDisplay::from_preference("24h"), ClockDisplay::TwentyFourHour);
        assert_eq!(ClockDisplay::from_preference(""), ClockDisplay::TwentyFourHour);
    }
}
