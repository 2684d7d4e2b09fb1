//! Indicator lights: ids, applied state, colors, and the per-light controller.

pub mod color;
mod controller;
mod id;
mod state;

pub use color::{brightness_to_argb, format_color, parse_color};
pub use controller::{
    DEFAULT_PULSE_COLOR, DEFAULT_PULSE_ON_MS, Light, LightController, PULSE_OFF_MS,
};
pub use id::{LIGHT_COUNT, LightId};
pub use state::{BrightnessMode, FlashMode, LightState};
