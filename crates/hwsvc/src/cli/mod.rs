//! CLI subcommands: light control, button backlight, flashlight, diagnostics.

mod button_light;
mod classify;
mod config_cmd;
mod flashlight;
mod light;
mod status;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use hwsvc_lib::HwsvcError;
pub(super) use hwsvc_lib::button_light::ButtonLightState;
pub(super) use hwsvc_lib::config::Config;
pub(super) use hwsvc_lib::error::Result;
pub(super) use hwsvc_lib::light::{self as lights, BrightnessMode, FlashMode, LightId};
pub(super) use hwsvc_lib::service::{
    ButtonLightStatus, FlashlightStatus, LightStatus, LightsService,
};
pub(super) use hwsvc_lib::telephony::{AppState, ServiceState};
pub(super) use hwsvc_lib::timer::ThreadScheduler;

/// Spaces between the widest key and its value.
const GAP: usize = 2;
/// Lead of an indented row.
const INDENT: usize = 2;

/// Poll interval while waiting for scheduled timers.
const WAIT_POLL: Duration = Duration::from_millis(100);

/// Value column shared by top-level rows (`top`) and indented rows (`indent`).
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let widest = |keys: &[&str], lead: usize| {
        keys.iter().map(|k| lead + k.len() + GAP).max().unwrap_or(0)
    };
    widest(top, 0).max(widest(indent, INDENT))
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<w$}{value}")
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    let inner = w.saturating_sub(INDENT);
    println!("{:INDENT$}{}", "", format_kv(key, value, inner));
}

pub(super) fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HwsvcError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Load the config from `custom_path` or the platform default, logging
/// parse and validation warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let (config, warnings) = match custom_path {
        Some(p) => Config::load_from(p),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    if let Err(errors) = config.validate() {
        for e in &errors {
            log::warn!("config: {e}");
        }
    }
    config
}

/// Build the service with a real timer thread.
pub(super) fn open_service(config: &Config) -> Result<(LightsService, Arc<ThreadScheduler>)> {
    let scheduler = Arc::new(ThreadScheduler::new()?);
    let service = LightsService::from_config(config, scheduler.clone())?;
    Ok((service, scheduler))
}

/// Block until every scheduled timer has fired. Returns `false` if Ctrl+C
/// interrupted the wait; pending timers are then dropped with the scheduler.
pub(super) fn wait_for_timers(scheduler: &ThreadScheduler) -> bool {
    loop {
        if scheduler.wait_idle(WAIT_POLL) {
            return true;
        }
        if !RUNNING.load(Ordering::SeqCst) {
            log::warn!("interrupted, pending timers discarded");
            return false;
        }
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub sysfs_root: String,
    pub lights: Vec<LedNodeJson>,
    pub button_light: ButtonLightStatus,
    pub flashlight: FlashlightStatus,
}

#[derive(Serialize)]
pub(super) struct LedNodeJson {
    pub light: LightId,
    pub path: String,
    pub present: bool,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub files: ConfigFilesJson,
}

#[derive(Serialize)]
pub(super) struct ConfigFilesJson {
    pub properties_file: Option<String>,
    pub properties_file_exists: bool,
    pub flashlight_path: String,
    pub flashlight_path_exists: bool,
}

#[derive(Serialize)]
pub(super) struct ClassifyOutput {
    pub service_state: ServiceState,
    pub ruim: bool,
    pub icc: Option<AppState>,
    pub cause_code: i32,
    pub disconnect_cause: hwsvc_lib::telephony::DisconnectCause,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ButtonAction {
    /// Turn on until turned off
    On,
    /// Turn off
    Off,
    /// Turn on, then off after the configured timeout
    Oneshot,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show LED nodes, button backlight and flashlight status
    Status,

    /// Show current configuration and file paths
    Config,

    /// Set a light to a steady color
    Set {
        /// Light name (backlight, keyboard, buttons, battery, notifications,
        /// attention, bluetooth, wifi) or id 0-7
        light: LightId,
        /// Color: #RRGGBB, #AARRGGBB, or a name (red, green, blue, ...)
        color: String,
    },

    /// Set a light to an 8-bit gray level
    Brightness {
        light: LightId,
        /// 0-255
        level: u8,
        /// Brightness comes from the light sensor
        #[arg(long)]
        sensor: bool,
    },

    /// Blink a light
    Flash {
        light: LightId,
        color: String,
        /// On time in milliseconds
        #[arg(long, value_name = "MS")]
        on: u32,
        /// Off time in milliseconds
        #[arg(long, value_name = "MS")]
        off: u32,
        /// Let the driver run the blink pattern
        #[arg(long)]
        hardware: bool,
    },

    /// Pulse an unlit light once, then hold the color steady
    Pulse {
        light: LightId,
        /// Pulse color (default: #00FFFFFF)
        color: Option<String>,
        /// Pulse length in milliseconds
        #[arg(long, value_name = "MS", default_value_t = lights::DEFAULT_PULSE_ON_MS)]
        on: u32,
    },

    /// Turn a light off
    Off { light: LightId },

    /// Control the button backlight
    ButtonLight {
        action: ButtonAction,
        /// Brightness level (default: the button_light_brightness setting)
        #[arg(long)]
        level: Option<u32>,
    },

    /// Show or switch the legacy flashlight
    Flashlight { state: Option<Switch> },

    /// Classify a call-fail cause code under the given radio conditions
    Classify {
        /// in-service, out-of-service, emergency-only or power-off
        #[arg(long, default_value = "in-service")]
        service_state: ServiceState,
        /// Subscription comes from the RUIM card
        #[arg(long)]
        ruim: bool,
        /// UICC application state (omit for no UICC application)
        #[arg(long)]
        icc: Option<AppState>,
        /// Network call-fail cause code (16 = normal clearing)
        #[arg(allow_negative_numbers = true)]
        cause: i32,
    },
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Status => status::cmd_status(json, config_path),
        Command::Config => config_cmd::cmd_config(json, config_path),
        Command::Set { light, color } => {
            let color = lights::parse_color(&color)?;
            light::cmd_light(light, light::LightOp::Color(color), json, config_path)
        }
        Command::Brightness {
            light,
            level,
            sensor,
        } => {
            let mode = if sensor {
                BrightnessMode::Sensor
            } else {
                BrightnessMode::User
            };
            light::cmd_light(
                light,
                light::LightOp::Brightness { level, mode },
                json,
                config_path,
            )
        }
        Command::Flash {
            light,
            color,
            on,
            off,
            hardware,
        } => {
            let color = lights::parse_color(&color)?;
            let mode = if hardware {
                FlashMode::Hardware
            } else {
                FlashMode::Timed
            };
            light::cmd_light(
                light,
                light::LightOp::Flash {
                    color,
                    mode,
                    on_ms: on,
                    off_ms: off,
                },
                json,
                config_path,
            )
        }
        Command::Pulse { light, color, on } => {
            let color = match color {
                Some(c) => lights::parse_color(&c)?,
                None => lights::DEFAULT_PULSE_COLOR,
            };
            light::cmd_light(
                light,
                light::LightOp::Pulse { color, on_ms: on },
                json,
                config_path,
            )
        }
        Command::Off { light } => light::cmd_light(light, light::LightOp::Off, json, config_path),
        Command::ButtonLight { action, level } => {
            button_light::cmd_button_light(action, level, json, config_path)
        }
        Command::Flashlight { state } => flashlight::cmd_flashlight(state, json, config_path),
        Command::Classify {
            service_state,
            ruim,
            icc,
            cause,
        } => classify::cmd_classify(service_state, ruim, icc, cause, json),
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn width_follows_widest_top_key() {
        assert_eq!(kv_width(&["Light:", "Brightness:"], &[]), "Brightness:".len() + GAP);
    }

    #[test]
    fn indented_keys_count_their_lead() {
        let w = kv_width(&["Flashlight:"], &["persist.sys.timeout.light.but:"]);
        assert_eq!(w, INDENT + "persist.sys.timeout.light.but:".len() + GAP);
    }

    #[test]
    fn no_keys_gives_zero_width() {
        assert_eq!(kv_width(&[], &[]), 0);
    }

    #[test]
    fn top_and_indented_values_share_a_column() {
        let w = kv_width(&["Settings:"], &["sysfs_root:"]);
        let top = format_kv("Settings:", "X", w);
        let nested = format!("{:INDENT$}{}", "", format_kv("sysfs_root:", "X", w - INDENT));
        assert_eq!(top.find('X'), nested.find('X'));
    }

    #[test]
    fn on_off_labels() {
        assert_eq!(on_off(true), "on");
        assert_eq!(on_off(false), "off");
    }

    #[test]
    fn load_config_missing_path_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("none.toml")));
        assert_eq!(config, Config::default());
    }
}
