//! User settings store with change subscriptions.
//!
//! Observers are notified synchronously on the writer's thread, after the
//! store's own locks are released, so an observer may read the store back.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Whether the button backlight may turn on at all (`1` = enabled).
pub const BUTTON_LIGHT_ENABLE: &str = "button_light_enable";
/// Brightness level used when the button backlight turns on.
pub const BUTTON_LIGHT_BRIGHTNESS: &str = "button_light_brightness";

/// Receives setting changes.
pub trait SettingsObserver: Send + Sync {
    /// `value` is `None` when the setting was removed.
    fn on_setting_changed(&self, key: &str, value: Option<i64>);
}

#[derive(Default)]
pub struct SettingsStore {
    values: Mutex<BTreeMap<String, i64>>,
    observers: Mutex<Vec<Arc<dyn SettingsObserver>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `initial`. No observers are notified.
    pub fn with_values(initial: &BTreeMap<String, i64>) -> Self {
        SettingsStore {
            values: Mutex::new(initial.clone()),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        lock(&self.values).get(key).copied().unwrap_or(default)
    }

    pub fn put_int(&self, key: &str, value: i64) {
        lock(&self.values).insert(key.to_string(), value);
        self.notify(key, Some(value));
    }

    pub fn remove(&self, key: &str) {
        let removed = lock(&self.values).remove(key).is_some();
        if removed {
            self.notify(key, None);
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn SettingsObserver>) {
        lock(&self.observers).push(observer);
    }

    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        lock(&self.values).clone()
    }

    fn notify(&self, key: &str, value: Option<i64>) {
        let observers: Vec<_> = lock(&self.observers).clone();
        log::debug!("[settings] {key} = {value:?} ({} observers)", observers.len());
        for observer in observers {
            observer.on_setting_changed(key, value);
        }
    }
}
