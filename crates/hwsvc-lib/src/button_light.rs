//! Button backlight policy: settings-gated brightness with a one-shot auto-off.
//!
//! Only some hardware variants have a capacitive-button backlight; on the
//! rest every operation here is a no-op. The enable flag and brightness level
//! come from user settings and are cached through change notifications, so
//! turning the light on never reads settings.
//!
//! States: `Off`, `OnPersistent`, `OnPendingTimeout`. A one-shot replaces
//! any pending deadline; disabling the setting forces `Off` from any state.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use serde::Serialize;

use crate::light::{Light, LightId};
use crate::properties::Properties;
use crate::settings::{
    BUTTON_LIGHT_BRIGHTNESS, BUTTON_LIGHT_ENABLE, SettingsObserver, SettingsStore,
};
use crate::timer::{Scheduler, TimerKey, TimerKind};

/// Property naming the hardware platform.
pub const HW_PLATFORM: &str = "ro.hw_platform";
/// The only platform with a button backlight.
pub const HW_PLATFORM_SKU5: &str = "msm8x25_sku5";
/// Persisted tunable: one-shot timeout in milliseconds.
pub const PERSIST_BUTTON_LIGHT_TIMEOUT: &str = "persist.sys.timeout.light.but";
pub const BUTTON_LIGHT_TIMEOUT_DEFAULT_MS: u64 = 1500;
pub const DEFAULT_BUTTON_BRIGHTNESS: u32 = 2;

const TIMEOUT_KEY: TimerKey = TimerKey {
    light: LightId::Buttons,
    kind: TimerKind::ButtonTimeout,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonLightState {
    Off,
    OnPersistent,
    OnPendingTimeout,
}

#[derive(Debug)]
struct Status {
    enabled: bool,
    brightness: u32,
    state: ButtonLightState,
    /// Bumped on every transition; a timeout only acts if it still matches.
    generation: u64,
}

struct Inner {
    exists: bool,
    timeout: Duration,
    light: Arc<Light>,
    scheduler: Arc<dyn Scheduler>,
    status: Mutex<Status>,
}

/// Handle to the button backlight policy. Cheap to clone.
#[derive(Clone)]
pub struct ButtonLight {
    inner: Arc<Inner>,
}

fn brightness_from_setting(value: Option<i64>) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(DEFAULT_BUTTON_BRIGHTNESS)
}

impl ButtonLight {
    /// Build the policy for `light` and read the startup inputs once.
    ///
    /// The caller subscribes the result to `settings` (see
    /// [`LightsService`](crate::service::LightsService)).
    pub fn new(
        light: Arc<Light>,
        scheduler: Arc<dyn Scheduler>,
        properties: &Properties,
        settings: &SettingsStore,
    ) -> Self {
        let exists = properties.get(HW_PLATFORM).as_deref() == Some(HW_PLATFORM_SKU5);
        let timeout_ms = match properties.get_int(
            PERSIST_BUTTON_LIGHT_TIMEOUT,
            BUTTON_LIGHT_TIMEOUT_DEFAULT_MS as i64,
        ) {
            ms if ms > 0 => ms as u64,
            _ => BUTTON_LIGHT_TIMEOUT_DEFAULT_MS,
        };
        let enabled = settings.get_int(BUTTON_LIGHT_ENABLE, 1) == 1;
        let brightness = brightness_from_setting(Some(
            settings.get_int(BUTTON_LIGHT_BRIGHTNESS, i64::from(DEFAULT_BUTTON_BRIGHTNESS)),
        ));
        log::debug!(
            "[buttons] exists={exists} enabled={enabled} \
             brightness={brightness} timeout={timeout_ms}ms"
        );
        ButtonLight {
            inner: Arc::new(Inner {
                exists,
                timeout: Duration::from_millis(timeout_ms),
                light,
                scheduler,
                status: Mutex::new(Status {
                    enabled,
                    brightness,
                    state: ButtonLightState::Off,
                    generation: 0,
                }),
            }),
        }
    }

    pub fn exists(&self) -> bool {
        self.inner.exists
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    /// Cached brightness level used by [`turn_on`](Self::turn_on).
    pub fn brightness(&self) -> u32 {
        self.inner.lock().brightness
    }

    pub fn state(&self) -> ButtonLightState {
        self.inner.lock().state
    }

    pub fn turn_on(&self) {
        let level = self.brightness();
        self.set_brightness(level);
    }

    pub fn turn_off(&self) {
        self.set_brightness(0);
    }

    /// Apply `level` until told otherwise. Forces off when disabled.
    pub fn set_brightness(&self, level: u32) {
        if !self.inner.exists {
            return;
        }
        let mut status = self.inner.lock();
        self.inner.cancel_timeout(&mut status);
        let applied = self.inner.apply_locked(&status, level);
        status.state = if applied > 0 {
            ButtonLightState::OnPersistent
        } else {
            ButtonLightState::Off
        };
    }

    pub fn turn_on_one_shot(&self) {
        let level = self.brightness();
        self.set_brightness_one_shot(level);
    }

    /// Turn on at `level` and schedule an auto-off after the timeout.
    ///
    /// A pending timeout is replaced. When disabled or `level == 0` the
    /// light goes straight off, in a single write.
    pub fn set_brightness_one_shot(&self, level: u32) {
        if !self.inner.exists {
            return;
        }
        let mut status = self.inner.lock();
        if !(status.enabled && level > 0) {
            self.inner.off_locked(&mut status);
            return;
        }
        self.inner.cancel_timeout(&mut status);
        self.inner.apply_locked(&status, level);
        status.state = ButtonLightState::OnPendingTimeout;

        let generation = status.generation;
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            TIMEOUT_KEY,
            self.inner.timeout,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_timeout(generation);
                }
            }),
        );
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cancel_timeout(&self, status: &mut Status) {
        status.generation += 1;
        self.scheduler.cancel(TIMEOUT_KEY);
    }

    /// Write `level`, or 0 when disabled. Returns the level written.
    fn apply_locked(&self, status: &Status, level: u32) -> u32 {
        let level = if status.enabled { level } else { 0 };
        self.light.set_brightness(level);
        level
    }

    fn off_locked(&self, status: &mut Status) {
        self.cancel_timeout(status);
        self.apply_locked(status, 0);
        status.state = ButtonLightState::Off;
    }

    fn on_timeout(&self, generation: u64) {
        let mut status = self.lock();
        if status.generation != generation {
            log::debug!("[buttons] stale timeout ignored");
            return;
        }
        log::debug!("[buttons] timeout, turning off");
        self.apply_locked(&status, 0);
        status.state = ButtonLightState::Off;
    }
}

impl SettingsObserver for ButtonLight {
    fn on_setting_changed(&self, key: &str, value: Option<i64>) {
        match key {
            BUTTON_LIGHT_ENABLE => {
                let mut status = self.inner.lock();
                status.enabled = value.unwrap_or(0) == 1;
                if !status.enabled && self.inner.exists {
                    self.inner.off_locked(&mut status);
                }
            }
            BUTTON_LIGHT_BRIGHTNESS => {
                self.inner.lock().brightness = brightness_from_setting(value);
            }
            _ => {}
        }
    }
}
