//! System properties: `key=value` store loaded from a build.prop style file.
//!
//! Read-only (`ro.*`) and persisted (`persist.*`) tunables are looked up here
//! once at startup; nothing on a hot path reads properties.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

/// In-memory property store.
#[derive(Debug, Default)]
pub struct Properties {
    values: RwLock<BTreeMap<String, String>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` lines. Blank lines and `#` comments are skipped;
    /// the value is everything after the first `=`.
    pub fn parse(contents: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if !key.is_empty() {
                    values.insert(key.to_string(), value.trim().to_string());
                }
            }
        }
        Properties {
            values: RwLock::new(values),
        }
    }

    /// Load from a property file. A missing file yields an empty store.
    pub fn load_from(path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Integer value, or `default` if missing or unparsable.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Boolean value. Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            _ => default,
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    /// Snapshot of all properties, sorted by key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
