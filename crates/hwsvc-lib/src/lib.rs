//! hwsvc: indicator light service and CDMA/IMS phone wiring.

pub mod button_light;
pub mod config;
pub mod driver;
pub mod error;
pub mod legacy;
pub mod light;
pub mod properties;
pub mod service;
pub mod settings;
pub mod telephony;
pub mod timer;

pub use error::HwsvcError;
