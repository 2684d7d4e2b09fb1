//! Service configuration: TOML-based, platform-aware paths.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::button_light::PERSIST_BUTTON_LIGHT_TIMEOUT;
use crate::legacy::{DEFAULT_FLASHLIGHT_PATH, PERMISSION_FLASHLIGHT};
use crate::light::LightId;
use crate::settings::{BUTTON_LIGHT_BRIGHTNESS, BUTTON_LIGHT_ENABLE};

const CONFIG_FILE: &str = "config.toml";

const CONFIG_HEADER: &str =
    "# hwsvc configuration. Changes made outside the tool may be overwritten.\n\n";

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/leds";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one sub-directory per LED. Default: "/sys/class/leds".
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,

    /// build.prop style property file. Empty = no file, only `properties` below.
    #[serde(default)]
    pub properties_file: String,

    /// Legacy flashlight flag file.
    #[serde(default = "default_flashlight_path")]
    pub flashlight_path: String,

    /// Permissions held by callers of this tool.
    #[serde(default = "default_granted_permissions")]
    pub granted_permissions: Vec<String>,

    /// Property overrides applied on top of `properties_file`.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Sysfs LED directory per light name (e.g. `buttons = "button-backlight"`).
    /// Lights not listed use their built-in LED name.
    #[serde(default)]
    pub led_names: BTreeMap<String, String>,

    /// Initial user settings (e.g. `button_light_enable = 1`).
    #[serde(default)]
    pub settings: BTreeMap<String, i64>,
}

fn default_sysfs_root() -> String {
    DEFAULT_SYSFS_ROOT.into()
}
fn default_flashlight_path() -> String {
    DEFAULT_FLASHLIGHT_PATH.into()
}
fn default_granted_permissions() -> Vec<String> {
    vec![PERMISSION_FLASHLIGHT.into()]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sysfs_root: default_sysfs_root(),
            properties_file: String::new(),
            properties: BTreeMap::new(),
            flashlight_path: default_flashlight_path(),
            led_names: BTreeMap::new(),
            granted_permissions: default_granted_permissions(),
            settings: BTreeMap::new(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `sysfs_root` is empty or whitespace-only.
    EmptySysfsRoot,
    /// A `led_names` key is not a known light.
    UnknownLight(String),
    /// A `led_names` value is empty.
    EmptyLedName(String),
    /// The button light timeout override is not a positive integer.
    InvalidTimeout(String),
    /// A `settings` entry is out of range.
    InvalidSetting { key: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySysfsRoot => write!(f, "sysfs_root cannot be empty"),
            ValidationError::UnknownLight(e) => write!(f, "Unknown light in led_names: {e}"),
            ValidationError::EmptyLedName(light) => {
                write!(f, "led_names[{light}] cannot be empty")
            }
            ValidationError::InvalidTimeout(v) => write!(
                f,
                "Invalid {PERSIST_BUTTON_LIGHT_TIMEOUT}: \"{v}\" \
                 (expected a positive number of milliseconds)"
            ),
            ValidationError::InvalidSetting { key, reason } => {
                write!(f, "Invalid settings[{key}]: {reason}")
            }
        }
    }
}

impl Config {
    /// `<config dir>/hwsvc`, if the platform has a config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hwsvc"))
    }

    /// Default config file location.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join(CONFIG_FILE))
    }

    /// Write the config as TOML, replacing `path` in one rename where possible.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        write_replacing(path, &format!("{CONFIG_HEADER}{body}"))
    }

    /// Read `path`. A missing file yields defaults silently; an unparsable
    /// one yields defaults plus a warning for the caller to report.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        let Ok(text) = fs::read_to_string(path) else {
            return (Self::default(), Vec::new());
        };
        match toml::from_str::<Config>(&text) {
            Ok(config) => (config, Vec::new()),
            Err(e) => (
                Self::default(),
                vec![format!("config parse error ({}), using defaults: {e}", path.display())],
            ),
        }
    }

    /// [`load_from`](Self::load_from) on the default location.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => (Self::default(), Vec::new()),
        }
    }

    /// `led_names` entries whose key names a light. Unknown keys are skipped.
    pub fn led_name_overrides(&self) -> Vec<(LightId, String)> {
        self.led_names
            .iter()
            .filter_map(|(k, v)| k.parse::<LightId>().ok().map(|id| (id, v.clone())))
            .collect()
    }

    /// Validate the entire config, collecting all errors.
    ///
    /// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all problems found.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.sysfs_root.trim().is_empty() {
            errors.push(ValidationError::EmptySysfsRoot);
        }

        for (key, value) in &self.led_names {
            if key.parse::<LightId>().is_err() {
                errors.push(ValidationError::UnknownLight(key.clone()));
            } else if value.trim().is_empty() {
                errors.push(ValidationError::EmptyLedName(key.clone()));
            }
        }

        if let Some(v) = self.properties.get(PERSIST_BUTTON_LIGHT_TIMEOUT) {
            match v.trim().parse::<i64>() {
                Ok(ms) if ms > 0 => {}
                _ => errors.push(ValidationError::InvalidTimeout(v.clone())),
            }
        }

        if let Some(&v) = self.settings.get(BUTTON_LIGHT_ENABLE)
            && v != 0
            && v != 1
        {
            errors.push(ValidationError::InvalidSetting {
                key: BUTTON_LIGHT_ENABLE.into(),
                reason: format!("expected 0 or 1, got {v}"),
            });
        }
        if let Some(&v) = self.settings.get(BUTTON_LIGHT_BRIGHTNESS)
            && !(0..=255).contains(&v)
        {
            errors.push(ValidationError::InvalidSetting {
                key: BUTTON_LIGHT_BRIGHTNESS.into(),
                reason: format!("expected 0-255, got {v}"),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Stage `contents` next to `path` and rename over it. Falls back to a plain
/// write when the rename fails (e.g. across filesystems).
fn write_replacing(path: &Path, contents: &str) -> std::io::Result<()> {
    let staged = path.with_extension("toml.tmp");
    fs::write(&staged, contents)?;
    if fs::rename(&staged, path).is_ok() {
        return Ok(());
    }
    let written = fs::write(path, contents);
    let _ = fs::remove_file(&staged);
    written
}
