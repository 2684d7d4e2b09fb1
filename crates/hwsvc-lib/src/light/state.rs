//! Applied light state: color, flash timing, brightness mode.

use serde::Serialize;

/// How a light blinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Steady.
    #[default]
    None = 0,
    /// Software-timed blink.
    Timed = 1,
    /// Driver-managed blink pattern.
    Hardware = 2,
}

/// Whether brightness is user-set or driven by a light sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    #[default]
    User = 0,
    Sensor = 1,
}

/// The last state written to the driver for one light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LightState {
    /// Packed `0xAARRGGBB`.
    pub color: u32,
    pub mode: FlashMode,
    pub on_ms: u32,
    pub off_ms: u32,
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// Steady state with the given color.
    pub fn steady(color: u32, brightness_mode: BrightnessMode) -> Self {
        LightState {
            color,
            mode: FlashMode::None,
            on_ms: 0,
            off_ms: 0,
            brightness_mode,
        }
    }

    /// Whether `other` would require a driver write to reach.
    ///
    /// Brightness mode alone never counts as a difference.
    pub fn differs_from(&self, other: &LightState) -> bool {
        self.color != other.color
            || self.mode != other.mode
            || self.on_ms != other.on_ms
            || self.off_ms != other.off_ms
    }

    pub fn is_flashing(&self) -> bool {
        self.mode != FlashMode::None
    }

    pub fn is_off(&self) -> bool {
        self.color == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zero_steady() {
        let s = LightState::default();
        assert_eq!(s.color, 0);
        assert_eq!(s.mode, FlashMode::None);
        assert_eq!((s.on_ms, s.off_ms), (0, 0));
        assert_eq!(s.brightness_mode, BrightnessMode::User);
        assert!(s.is_off());
        assert!(!s.is_flashing());
    }

    #[test]
    fn brightness_mode_alone_is_not_a_difference() {
        let a = LightState::steady(0xFF10_1010, BrightnessMode::User);
        let b = LightState::steady(0xFF10_1010, BrightnessMode::Sensor);
        assert!(!a.differs_from(&b));
    }

    #[test]
    fn timing_change_is_a_difference() {
        let a = LightState::steady(0xFF00_0000, BrightnessMode::User);
        let b = LightState {
            on_ms: 500,
            ..a
        };
        assert!(a.differs_from(&b));
    }
}
