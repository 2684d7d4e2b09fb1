//! Legacy flashlight shim: a permission-gated on/off flag in a single file.
//!
//! The file holds one byte (`'0'` or `'1'`) followed by a newline. Reads that
//! fail report off; writes that fail are dropped.

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{HwsvcError, Result};

pub const DEFAULT_FLASHLIGHT_PATH: &str = "/sys/class/leds/spotlight/brightness";

pub const PERMISSION_FLASHLIGHT: &str = "android.permission.FLASHLIGHT";
pub const PERMISSION_HARDWARE_TEST: &str = "android.permission.HARDWARE_TEST";

/// Answers whether the calling context holds a permission.
pub trait PermissionChecker: Send + Sync {
    fn check(&self, permission: &str) -> bool;
}

/// Fixed permission set, usually built from config.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    granted: BTreeSet<String>,
}

impl StaticPermissions {
    pub fn new<I, S>(granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticPermissions {
            granted: granted.into_iter().map(Into::into).collect(),
        }
    }

    /// Holds nothing.
    pub fn none() -> Self {
        Self::default()
    }
}

impl PermissionChecker for StaticPermissions {
    fn check(&self, permission: &str) -> bool {
        self.granted.contains(permission)
    }
}

#[derive(Debug, Clone)]
pub struct LegacyFlashlight {
    path: PathBuf,
}

impl Default for LegacyFlashlight {
    fn default() -> Self {
        Self::new(DEFAULT_FLASHLIGHT_PATH)
    }
}

impl LegacyFlashlight {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LegacyFlashlight { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` unless the first byte of the file is `'0'` or the read fails.
    /// An empty file has no `'0'` and reads as on.
    pub fn flashlight_enabled(&self) -> bool {
        let mut byte = [0u8; 1];
        match fs::File::open(&self.path).and_then(|mut f| f.read(&mut byte)) {
            Ok(0) => true,
            Ok(_) => byte[0] != b'0',
            Err(e) => {
                log::debug!("[flashlight] read {} failed: {e}", self.path.display());
                false
            }
        }
    }

    pub fn set_flashlight_enabled(&self, caller: &dyn PermissionChecker, on: bool) -> Result<()> {
        if !caller.check(PERMISSION_FLASHLIGHT) && !caller.check(PERMISSION_HARDWARE_TEST) {
            return Err(HwsvcError::PermissionDenied(
                "Requires FLASHLIGHT or HARDWARE_TEST permission".into(),
            ));
        }
        let bytes: &[u8] = if on { b"1\n" } else { b"0\n" };
        if let Err(e) = fs::write(&self.path, bytes) {
            log::debug!("[flashlight] write {} failed: {e}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flashlight_in(dir: &tempfile::TempDir) -> LegacyFlashlight {
        LegacyFlashlight::new(dir.path().join("brightness"))
    }

    #[test]
    fn default_path() {
        assert_eq!(
            LegacyFlashlight::default().path(),
            Path::new("/sys/class/leds/spotlight/brightness")
        );
    }

    #[test]
    fn set_on_then_off() {
        let dir = tempfile::tempdir().unwrap();
        let fl = flashlight_in(&dir);
        let perms = StaticPermissions::new([PERMISSION_FLASHLIGHT]);

        fl.set_flashlight_enabled(&perms, true).unwrap();
        assert_eq!(fs::read(fl.path()).unwrap(), b"1\n");
        assert!(fl.flashlight_enabled());

        fl.set_flashlight_enabled(&perms, false).unwrap();
        assert_eq!(fs::read(fl.path()).unwrap(), b"0\n");
        assert!(!fl.flashlight_enabled());
    }

    #[test]
    fn hardware_test_permission_suffices() {
        let dir = tempfile::tempdir().unwrap();
        let fl = flashlight_in(&dir);
        let perms = StaticPermissions::new([PERMISSION_HARDWARE_TEST]);
        assert!(fl.set_flashlight_enabled(&perms, true).is_ok());
        assert!(fl.flashlight_enabled());
    }

    #[test]
    fn missing_permission_is_denied_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let fl = flashlight_in(&dir);
        let err = fl
            .set_flashlight_enabled(&StaticPermissions::none(), true)
            .unwrap_err();
        match err {
            HwsvcError::PermissionDenied(msg) => {
                assert_eq!(msg, "Requires FLASHLIGHT or HARDWARE_TEST permission")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!fl.path().exists());
    }

    #[test]
    fn unrelated_permission_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let fl = flashlight_in(&dir);
        let perms = StaticPermissions::new(["android.permission.CAMERA"]);
        assert!(fl.set_flashlight_enabled(&perms, true).is_err());
    }

    #[test]
    fn write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let fl = LegacyFlashlight::new(dir.path().join("missing-dir").join("brightness"));
        let perms = StaticPermissions::new([PERMISSION_FLASHLIGHT]);
        assert!(fl.set_flashlight_enabled(&perms, true).is_ok());
        assert!(!fl.flashlight_enabled());
    }

    #[test]
    fn missing_file_reads_off() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!flashlight_in(&dir).flashlight_enabled());
    }

    #[test]
    fn empty_file_reads_on() {
        let dir = tempfile::tempdir().unwrap();
        let fl = flashlight_in(&dir);
        fs::write(fl.path(), b"").unwrap();
        assert!(fl.flashlight_enabled());
    }

    #[test]
    fn unreadable_path_reads_off() {
        let dir = tempfile::tempdir().unwrap();
        // A directory opens but cannot be read.
        assert!(!LegacyFlashlight::new(dir.path()).flashlight_enabled());
    }

    #[test]
    fn any_nonzero_first_byte_reads_on() {
        let dir = tempfile::tempdir().unwrap();
        let fl = flashlight_in(&dir);
        fs::write(fl.path(), b"255\n").unwrap();
        assert!(fl.flashlight_enabled());
        fs::write(fl.path(), b"0255\n").unwrap();
        assert!(!fl.flashlight_enabled());
    }
}
