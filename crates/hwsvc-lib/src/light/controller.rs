//! Per-light state holder: serializes updates and forwards net changes to the driver.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::driver::LightDriver;
use crate::timer::{Scheduler, TimerKey, TimerKind};

use super::color::brightness_to_argb;
use super::id::{LIGHT_COUNT, LightId};
use super::state::{BrightnessMode, FlashMode, LightState};

/// Color used by [`Light::pulse_default`].
pub const DEFAULT_PULSE_COLOR: u32 = 0x00ff_ffff;
/// On-time used by [`Light::pulse_default`].
pub const DEFAULT_PULSE_ON_MS: u32 = 7;
/// Off-time the driver is given for a hardware pulse.
pub const PULSE_OFF_MS: u32 = 1000;

/// One indicator light.
///
/// Every mutation takes this light's lock for the whole read-compare-write,
/// so concurrent callers (and the pulse-revert timer) never interleave a
/// partial update. Lights do not lock each other.
pub struct Light {
    id: LightId,
    state: Mutex<LightState>,
    driver: Arc<dyn LightDriver>,
    scheduler: Arc<dyn Scheduler>,
}

impl Light {
    pub fn new(id: LightId, driver: Arc<dyn LightDriver>, scheduler: Arc<dyn Scheduler>) -> Self {
        Light {
            id,
            state: Mutex::new(LightState::default()),
            driver,
            scheduler,
        }
    }

    pub fn id(&self) -> LightId {
        self.id
    }

    /// Snapshot of the last applied state.
    pub fn state(&self) -> LightState {
        *self.lock()
    }

    pub fn set_brightness(&self, brightness: u32) {
        self.set_brightness_with_mode(brightness, BrightnessMode::User);
    }

    /// Apply an 8-bit brightness as an opaque gray, steady.
    pub fn set_brightness_with_mode(&self, brightness: u32, brightness_mode: BrightnessMode) {
        let mut state = self.lock();
        let next = LightState::steady(brightness_to_argb(brightness), brightness_mode);
        self.apply_locked(&mut state, next);
    }

    pub fn set_color(&self, color: u32) {
        let mut state = self.lock();
        self.apply_locked(&mut state, LightState::steady(color, BrightnessMode::User));
    }

    pub fn set_flashing(&self, color: u32, mode: FlashMode, on_ms: u32, off_ms: u32) {
        let mut state = self.lock();
        let next = LightState {
            color,
            mode,
            on_ms,
            off_ms,
            brightness_mode: BrightnessMode::User,
        };
        self.apply_locked(&mut state, next);
    }

    pub fn pulse_default(self: &Arc<Self>) {
        self.pulse(DEFAULT_PULSE_COLOR, DEFAULT_PULSE_ON_MS);
    }

    /// Flash once in hardware for `on_ms`, then revert to steady.
    ///
    /// No-op unless the light is currently off and not flashing, so pulses
    /// never overlap.
    pub fn pulse(self: &Arc<Self>, color: u32, on_ms: u32) {
        let mut state = self.lock();
        if !state.is_off() || state.is_flashing() {
            log::debug!("[light] {} pulse ignored (busy)", self.id);
            return;
        }
        let next = LightState {
            color,
            mode: FlashMode::Hardware,
            on_ms,
            off_ms: PULSE_OFF_MS,
            brightness_mode: BrightnessMode::User,
        };
        self.apply_locked(&mut state, next);

        // Weak: the task lives in the scheduler, which the light owns.
        let light = Arc::downgrade(self);
        self.scheduler.schedule(
            TimerKey::new(self.id, TimerKind::PulseRevert),
            Duration::from_millis(u64::from(on_ms)),
            Box::new(move || {
                if let Some(light) = light.upgrade() {
                    light.stop_flashing();
                }
            }),
        );
    }

    pub fn turn_off(&self) {
        let mut state = self.lock();
        self.apply_locked(&mut state, LightState::steady(0, BrightnessMode::User));
    }

    /// Keep the current color but stop blinking.
    fn stop_flashing(&self) {
        let mut state = self.lock();
        let next = LightState::steady(state.color, BrightnessMode::User);
        self.apply_locked(&mut state, next);
    }

    fn apply_locked(&self, current: &mut LightState, next: LightState) {
        if !current.differs_from(&next) {
            return;
        }
        log::debug!(
            "[light] {} -> color={} mode={:?} on={} off={}",
            self.id,
            super::color::format_color(next.color),
            next.mode,
            next.on_ms,
            next.off_ms
        );
        *current = next;
        if let Err(e) = self.driver.apply(self.id, &next) {
            log::warn!("[light] {} driver write failed: {e}", self.id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, LightState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owns one [`Light`] per fixed identity, created once in id order.
pub struct LightController {
    lights: [Arc<Light>; LIGHT_COUNT],
}

impl LightController {
    pub fn new(driver: Arc<dyn LightDriver>, scheduler: Arc<dyn Scheduler>) -> Self {
        let lights = LightId::ALL.map(|id| {
            Arc::new(Light::new(id, Arc::clone(&driver), Arc::clone(&scheduler)))
        });
        LightController { lights }
    }

    pub fn light(&self, id: LightId) -> &Arc<Light> {
        &self.lights[id.index()]
    }

    pub fn lights(&self) -> impl Iterator<Item = &Arc<Light>> {
        self.lights.iter()
    }
}
