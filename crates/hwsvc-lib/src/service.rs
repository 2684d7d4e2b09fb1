//! Light service: the controller, button-light policy and legacy flashlight
//! wired to one driver, scheduler, property store and settings store.

use std::sync::Arc;

use serde::Serialize;

use crate::button_light::{ButtonLight, ButtonLightState};
use crate::config::Config;
use crate::driver::{LightDriver, SysfsDriver};
use crate::error::Result;
use crate::legacy::{LegacyFlashlight, PermissionChecker};
use crate::light::{BrightnessMode, FlashMode, Light, LightController, LightId, format_color};
use crate::properties::Properties;
use crate::settings::SettingsStore;
use crate::timer::Scheduler;

pub struct LightsService {
    controller: LightController,
    buttons: ButtonLight,
    flashlight: LegacyFlashlight,
    properties: Arc<Properties>,
    settings: Arc<SettingsStore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LightStatus {
    pub light: LightId,
    pub color: String,
    pub mode: FlashMode,
    pub on_ms: u32,
    pub off_ms: u32,
    pub brightness_mode: BrightnessMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct ButtonLightStatus {
    pub exists: bool,
    pub enabled: bool,
    pub brightness: u32,
    pub timeout_ms: u64,
    pub state: ButtonLightState,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlashlightStatus {
    pub path: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub lights: Vec<LightStatus>,
    pub button_light: ButtonLightStatus,
    pub flashlight: FlashlightStatus,
}

impl LightsService {
    /// Build every light in id order and subscribe the button-light policy
    /// to `settings`.
    pub fn new(
        driver: Arc<dyn LightDriver>,
        scheduler: Arc<dyn Scheduler>,
        properties: Arc<Properties>,
        settings: Arc<SettingsStore>,
        flashlight: LegacyFlashlight,
    ) -> Self {
        let controller = LightController::new(driver, scheduler.clone());
        let buttons = ButtonLight::new(
            controller.light(LightId::Buttons).clone(),
            scheduler,
            &properties,
            &settings,
        );
        settings.subscribe(Arc::new(buttons.clone()));
        LightsService {
            controller,
            buttons,
            flashlight,
            properties,
            settings,
        }
    }

    /// Build against the sysfs LED class using paths and seeds from `config`.
    pub fn from_config(config: &Config, scheduler: Arc<dyn Scheduler>) -> Result<Self> {
        let driver = SysfsDriver::from_config(config);

        let properties = if config.properties_file.trim().is_empty() {
            Properties::new()
        } else {
            Properties::load_from(config.properties_file.trim().as_ref())?
        };
        for (key, value) in &config.properties {
            properties.set(key, value);
        }

        Ok(Self::new(
            Arc::new(driver),
            scheduler,
            Arc::new(properties),
            Arc::new(SettingsStore::with_values(&config.settings)),
            LegacyFlashlight::new(&config.flashlight_path),
        ))
    }

    pub fn light(&self, id: LightId) -> &Arc<Light> {
        self.controller.light(id)
    }

    pub fn controller(&self) -> &LightController {
        &self.controller
    }

    pub fn button_light(&self) -> &ButtonLight {
        &self.buttons
    }

    pub fn flashlight(&self) -> &LegacyFlashlight {
        &self.flashlight
    }

    pub fn properties(&self) -> &Arc<Properties> {
        &self.properties
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn flashlight_enabled(&self) -> bool {
        self.flashlight.flashlight_enabled()
    }

    pub fn set_flashlight_enabled(&self, caller: &dyn PermissionChecker, on: bool) -> Result<()> {
        self.flashlight.set_flashlight_enabled(caller, on)
    }

    pub fn light_status(&self, id: LightId) -> LightStatus {
        let s = self.light(id).state();
        LightStatus {
            light: id,
            color: format_color(s.color),
            mode: s.mode,
            on_ms: s.on_ms,
            off_ms: s.off_ms,
            brightness_mode: s.brightness_mode,
        }
    }

    pub fn button_light_status(&self) -> ButtonLightStatus {
        ButtonLightStatus {
            exists: self.buttons.exists(),
            enabled: self.buttons.is_enabled(),
            brightness: self.buttons.brightness(),
            timeout_ms: self.buttons.timeout().as_millis() as u64,
            state: self.buttons.state(),
        }
    }

    pub fn flashlight_status(&self) -> FlashlightStatus {
        FlashlightStatus {
            path: self.flashlight.path().display().to_string(),
            enabled: self.flashlight.flashlight_enabled(),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            lights: LightId::ALL.iter().map(|&id| self.light_status(id)).collect(),
            button_light: self.button_light_status(),
            flashlight: self.flashlight_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button_light::HW_PLATFORM;
    use crate::driver::mock::MockDriver;
    use crate::legacy::{PERMISSION_FLASHLIGHT, StaticPermissions};
    use crate::settings::BUTTON_LIGHT_ENABLE;
    use crate::timer::mock::ManualScheduler;

    fn service(props: &str) -> (LightsService, Arc<MockDriver>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(MockDriver::new());
        let svc = LightsService::new(
            driver.clone(),
            Arc::new(ManualScheduler::new()),
            Arc::new(Properties::parse(props)),
            Arc::new(SettingsStore::new()),
            LegacyFlashlight::new(dir.path().join("spotlight")),
        );
        (svc, driver, dir)
    }

    #[test]
    fn lights_are_in_id_order() {
        let (svc, _, _dir) = service("");
        let ids: Vec<_> = svc.controller().lights().map(|l| l.id()).collect();
        assert_eq!(ids, LightId::ALL);
    }

    #[test]
    fn settings_changes_reach_button_light() {
        let (svc, driver, _dir) = service("ro.hw_platform=msm8x25_sku5\n");
        svc.button_light().turn_on();
        assert_eq!(svc.button_light().state(), ButtonLightState::OnPersistent);

        svc.settings().put_int(BUTTON_LIGHT_ENABLE, 0);
        assert_eq!(svc.button_light().state(), ButtonLightState::Off);
        assert_eq!(driver.writes_for(LightId::Buttons), 2);
    }

    #[test]
    fn status_reports_applied_state() {
        let (svc, _, _dir) = service("");
        svc.light(LightId::Notifications)
            .set_flashing(0xFF00FF00, FlashMode::Timed, 500, 1500);
        let status = svc.status();
        let n = &status.lights[LightId::Notifications.index()];
        assert_eq!(n.color, "#FF00FF00");
        assert_eq!(n.mode, FlashMode::Timed);
        assert_eq!((n.on_ms, n.off_ms), (500, 1500));
        assert!(!status.button_light.exists);
        assert!(!status.flashlight.enabled);
    }

    #[test]
    fn status_serializes() {
        let (svc, _, _dir) = service("");
        let json = serde_json::to_value(svc.status()).unwrap();
        assert_eq!(json["lights"].as_array().unwrap().len(), 8);
        assert_eq!(json["lights"][2]["light"], "buttons");
        assert_eq!(json["button_light"]["state"], "off");
    }

    #[test]
    fn flashlight_goes_through_permission_check() {
        let (svc, _, _dir) = service("");
        assert!(svc
            .set_flashlight_enabled(&StaticPermissions::none(), true)
            .is_err());
        svc.set_flashlight_enabled(&StaticPermissions::new([PERMISSION_FLASHLIGHT]), true)
            .unwrap();
        assert!(svc.flashlight_enabled());
    }

    #[test]
    fn from_config_merges_property_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let prop_file = dir.path().join("build.prop");
        std::fs::write(&prop_file, "ro.hw_platform=msm8x25_sku1\nro.product=x\n").unwrap();

        let mut config = Config {
            sysfs_root: dir.path().display().to_string(),
            properties_file: prop_file.display().to_string(),
            flashlight_path: dir.path().join("spot").display().to_string(),
            ..Config::default()
        };
        config
            .properties
            .insert(HW_PLATFORM.into(), "msm8x25_sku5".into());
        config.settings.insert("button_light_brightness".into(), 12);

        let svc = LightsService::from_config(&config, Arc::new(ManualScheduler::new())).unwrap();
        assert!(svc.button_light().exists());
        assert_eq!(svc.button_light().brightness(), 12);
        assert_eq!(svc.properties().get("ro.product").as_deref(), Some("x"));
    }

    #[test]
    fn from_config_writes_sysfs() {
        let dir = tempfile::tempdir().unwrap();
        let led = dir.path().join("kpd");
        std::fs::create_dir(&led).unwrap();

        let mut config = Config {
            sysfs_root: dir.path().display().to_string(),
            ..Config::default()
        };
        config.led_names.insert("keyboard".into(), "kpd".into());

        let svc = LightsService::from_config(&config, Arc::new(ManualScheduler::new())).unwrap();
        svc.light(LightId::Keyboard).set_brightness(80);
        assert_eq!(std::fs::read_to_string(led.join("brightness")).unwrap(), "80");
    }
}
