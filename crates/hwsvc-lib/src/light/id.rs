//! Light identities: the fixed set of indicators a device may expose.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of light identities.
pub const LIGHT_COUNT: usize = 8;

/// A device-controlled LED or backlight.
///
/// Discriminants match the driver-level light ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightId {
    Backlight = 0,
    Keyboard = 1,
    Buttons = 2,
    Battery = 3,
    Notifications = 4,
    Attention = 5,
    Bluetooth = 6,
    Wifi = 7,
}

impl LightId {
    /// All light ids in driver order.
    pub const ALL: [LightId; LIGHT_COUNT] = [
        LightId::Backlight,
        LightId::Keyboard,
        LightId::Buttons,
        LightId::Battery,
        LightId::Notifications,
        LightId::Attention,
        LightId::Bluetooth,
        LightId::Wifi,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable lowercase name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            LightId::Backlight => "backlight",
            LightId::Keyboard => "keyboard",
            LightId::Buttons => "buttons",
            LightId::Battery => "battery",
            LightId::Notifications => "notifications",
            LightId::Attention => "attention",
            LightId::Bluetooth => "bluetooth",
            LightId::Wifi => "wifi",
        }
    }

    /// Default Linux LED class node for this light.
    pub fn default_led_name(self) -> &'static str {
        match self {
            LightId::Backlight => "lcd-backlight",
            LightId::Keyboard => "keyboard-backlight",
            LightId::Buttons => "button-backlight",
            LightId::Battery => "battery",
            LightId::Notifications => "notifications",
            LightId::Attention => "attention",
            LightId::Bluetooth => "bluetooth",
            LightId::Wifi => "wifi",
        }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return Self::from_index(n).ok_or_else(|| format!("light id {n} out of range"));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown light: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_driver_order() {
        for (i, id) in LightId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(LightId::from_index(i), Some(*id));
        }
        assert_eq!(LightId::from_index(LIGHT_COUNT), None);
    }

    #[test]
    fn parse_by_name_and_number() {
        assert_eq!("buttons".parse::<LightId>().unwrap(), LightId::Buttons);
        assert_eq!("WIFI".parse::<LightId>().unwrap(), LightId::Wifi);
        assert_eq!("4".parse::<LightId>().unwrap(), LightId::Notifications);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("torch".parse::<LightId>().is_err());
        assert!("8".parse::<LightId>().is_err());
    }

    #[test]
    fn display_is_name() {
        assert_eq!(LightId::Attention.to_string(), "attention");
    }
}
