//! Light driver boundary: trait + Linux LED class backend.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::light::{FlashMode, LightId, LightState, color};

// ── Error type ──

/// Light driver errors.
///
/// String payloads follow the convention **"context: details"** where
/// *context* names the LED node or attribute being written.
#[derive(Debug)]
pub enum DriverError {
    NotFound(String),
    WriteFailed(String),
    Unsupported(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::NotFound(name) => write!(f, "LED not found: {name}"),
            DriverError::WriteFailed(e) => write!(f, "LED write failed: {e}"),
            DriverError::Unsupported(e) => write!(f, "Unsupported by driver: {e}"),
        }
    }
}

impl std::error::Error for DriverError {}

pub type Result<T> = std::result::Result<T, DriverError>;

// ── Trait ──

/// The driver entry point consumed by the light controller.
///
/// Callers treat writes as best-effort; the controller logs and drops errors.
pub trait LightDriver: Send + Sync {
    fn apply(&self, id: LightId, state: &LightState) -> Result<()>;
}

// ── Linux LED class backend ──

/// Drives lights through `/sys/class/leds/<name>/`.
///
/// Steady states clear the trigger and write `brightness`; flashing states
/// arm the `timer` trigger with `delay_on` / `delay_off`.
#[derive(Debug, Clone)]
pub struct SysfsDriver {
    root: PathBuf,
    led_names: HashMap<LightId, String>,
}

impl SysfsDriver {
    /// Create a driver rooted at `root`, using each light's default LED node name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let led_names = LightId::ALL
            .iter()
            .map(|&id| (id, id.default_led_name().to_string()))
            .collect();
        SysfsDriver {
            root: root.into(),
            led_names,
        }
    }

    /// Driver rooted at `config.sysfs_root` with its `led_names` overrides.
    pub fn from_config(config: &Config) -> Self {
        config
            .led_name_overrides()
            .into_iter()
            .fold(Self::new(&config.sysfs_root), |d, (id, name)| {
                d.with_led_name(id, name)
            })
    }

    /// Override the LED node name for one light.
    pub fn with_led_name(mut self, id: LightId, name: impl Into<String>) -> Self {
        self.led_names.insert(id, name.into());
        self
    }

    pub fn led_dir(&self, id: LightId) -> PathBuf {
        let name = self
            .led_names
            .get(&id)
            .map(String::as_str)
            .unwrap_or_else(|| id.default_led_name());
        self.root.join(name)
    }
}

/// Single-channel brightness for a packed color: the brightest RGB component.
pub fn color_to_brightness(argb: u32) -> u8 {
    let (_, r, g, b) = color::components(argb);
    r.max(g).max(b)
}

fn write_attr(dir: &Path, attr: &str, value: &str) -> Result<()> {
    std::fs::write(dir.join(attr), value)
        .map_err(|e| DriverError::WriteFailed(format!("{}/{attr}: {e}", dir.display())))
}

impl LightDriver for SysfsDriver {
    fn apply(&self, id: LightId, state: &LightState) -> Result<()> {
        let dir = self.led_dir(id);
        if !dir.is_dir() {
            return Err(DriverError::NotFound(dir.display().to_string()));
        }
        let brightness = color_to_brightness(state.color).to_string();
        match state.mode {
            FlashMode::None => {
                // Clearing the trigger turns the LED off, so brightness goes last.
                write_attr(&dir, "trigger", "none")?;
                write_attr(&dir, "brightness", &brightness)?;
            }
            FlashMode::Timed | FlashMode::Hardware => {
                write_attr(&dir, "brightness", &brightness)?;
                write_attr(&dir, "trigger", "timer")?;
                write_attr(&dir, "delay_on", &state.on_ms.to_string())?;
                write_attr(&dir, "delay_off", &state.off_ms.to_string())?;
            }
        }
        log::debug!(
            "[driver] {id} -> {} ({:?}, on={} off={})",
            dir.display(),
            state.mode,
            state.on_ms,
            state.off_ms
        );
        Ok(())
    }
}

// ── Mock driver (tests) ──

pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory driver for unit tests. Records every `apply` call in order.
    #[derive(Default)]
    pub struct MockDriver {
        /// Recorded writes: (light, state).
        pub applied: Mutex<Vec<(LightId, LightState)>>,
        /// If true, `apply` records the call and then returns an error.
        pub fail_apply: AtomicBool,
    }

    impl MockDriver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of writes issued for one light.
        pub fn writes_for(&self, id: LightId) -> usize {
            self.applied
                .lock()
                .map(|a| a.iter().filter(|(l, _)| *l == id).count())
                .unwrap_or(0)
        }

        /// Total number of writes across all lights.
        pub fn write_count(&self) -> usize {
            self.applied.lock().map(|a| a.len()).unwrap_or(0)
        }

        /// The most recent state written for one light.
        pub fn last_for(&self, id: LightId) -> Option<LightState> {
            self.applied.lock().ok().and_then(|a| {
                a.iter()
                    .rev()
                    .find(|(l, _)| *l == id)
                    .map(|(_, s)| *s)
            })
        }

        pub fn clear(&self) {
            if let Ok(mut a) = self.applied.lock() {
                a.clear();
            }
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail_apply.store(fail, Ordering::SeqCst);
        }
    }

    impl LightDriver for MockDriver {
        fn apply(&self, id: LightId, state: &LightState) -> Result<()> {
            if let Ok(mut a) = self.applied.lock() {
                a.push((id, *state));
            }
            if self.fail_apply.load(Ordering::SeqCst) {
                return Err(DriverError::WriteFailed(
                    "mock: apply failure injected".into(),
                ));
            }
            Ok(())
        }
    }
}
