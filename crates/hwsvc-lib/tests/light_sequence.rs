//! Integration tests: light and button-light sequences through the service.
//!
//! These drive the public API against `MockDriver` and `ManualScheduler`,
//! checking the exact driver writes and timer behaviour, plus one pass over
//! the real thread scheduler and sysfs driver.

use std::sync::Arc;
use std::time::Duration;

use hwsvc_lib::button_light::ButtonLightState;
use hwsvc_lib::driver::SysfsDriver;
use hwsvc_lib::driver::mock::MockDriver;
use hwsvc_lib::legacy::LegacyFlashlight;
use hwsvc_lib::light::{BrightnessMode, FlashMode, LightId, LightState, brightness_to_argb};
use hwsvc_lib::properties::Properties;
use hwsvc_lib::service::LightsService;
use hwsvc_lib::settings::{BUTTON_LIGHT_BRIGHTNESS, BUTTON_LIGHT_ENABLE, SettingsStore};
use hwsvc_lib::timer::mock::ManualScheduler;
use hwsvc_lib::timer::{Scheduler, ThreadScheduler};

const SKU5: &str = "ro.hw_platform=msm8x25_sku5\npersist.sys.timeout.light.but=1000\n";

struct Rig {
    svc: LightsService,
    driver: Arc<MockDriver>,
    sched: Arc<ManualScheduler>,
}

fn rig(props: &str) -> Rig {
    let driver = Arc::new(MockDriver::new());
    let sched = Arc::new(ManualScheduler::new());
    let svc = LightsService::new(
        driver.clone(),
        sched.clone(),
        Arc::new(Properties::parse(props)),
        Arc::new(SettingsStore::new()),
        LegacyFlashlight::new("/nonexistent/spotlight"),
    );
    Rig { svc, driver, sched }
}

// ── Indicator lights ──

#[test]
fn repeated_identical_requests_write_once() {
    let r = rig("");
    let battery = r.svc.light(LightId::Battery);
    for _ in 0..5 {
        battery.set_color(0xFFFF_8000);
    }
    battery.set_brightness_with_mode(0, BrightnessMode::Sensor);
    battery.set_brightness_with_mode(0, BrightnessMode::User);

    assert_eq!(r.driver.writes_for(LightId::Battery), 2);
    assert_eq!(r.driver.write_count(), 2);
}

#[test]
fn notification_flash_then_off() {
    let r = rig("");
    let n = r.svc.light(LightId::Notifications);
    n.set_flashing(0xFF00_00FF, FlashMode::Timed, 250, 2750);
    n.turn_off();

    let last = r.driver.last_for(LightId::Notifications).unwrap();
    assert_eq!(last, LightState::default());
    assert_eq!(r.driver.writes_for(LightId::Notifications), 2);
}

#[test]
fn pulse_default_reverts_to_steady_color() {
    let r = rig("");
    let attention = r.svc.light(LightId::Attention);
    attention.pulse_default();

    let pulsed = r.driver.last_for(LightId::Attention).unwrap();
    assert_eq!(pulsed.color, 0x00ff_ffff);
    assert_eq!(pulsed.mode, FlashMode::Hardware);
    assert_eq!((pulsed.on_ms, pulsed.off_ms), (7, 1000));

    r.sched.advance(Duration::from_millis(7));
    let reverted = attention.state();
    assert_eq!(reverted.color, 0x00ff_ffff);
    assert_eq!(reverted.mode, FlashMode::None);
    assert_eq!(r.driver.writes_for(LightId::Attention), 2);
}

#[test]
fn pulse_ignored_while_lit() {
    let r = rig("");
    let attention = r.svc.light(LightId::Attention);
    attention.set_color(0xFFFF_0000);
    attention.pulse(0xFF00_FF00, 50);
    assert_eq!(attention.state().color, 0xFFFF_0000);
    assert_eq!(r.sched.pending_count(), 0);
}

#[test]
fn lights_are_independent() {
    let r = rig("");
    r.svc.light(LightId::Wifi).set_color(0xFF00_FF00);
    r.svc.light(LightId::Bluetooth).pulse(0xFF00_00FF, 100);
    r.svc.light(LightId::Wifi).turn_off();
    r.sched.advance(Duration::from_millis(100));

    assert!(r.svc.light(LightId::Wifi).state().is_off());
    assert_eq!(r.svc.light(LightId::Bluetooth).state().color, 0xFF00_00FF);
    assert!(!r.svc.light(LightId::Bluetooth).state().is_flashing());
}

#[test]
fn driver_failure_keeps_service_usable() {
    let r = rig("");
    r.driver.set_fail(true);
    r.svc.light(LightId::Keyboard).set_brightness(10);
    r.driver.set_fail(false);
    // Same request again: already applied, so no retry.
    r.svc.light(LightId::Keyboard).set_brightness(10);
    assert_eq!(r.driver.writes_for(LightId::Keyboard), 1);
    r.svc.light(LightId::Keyboard).set_brightness(11);
    assert_eq!(r.driver.writes_for(LightId::Keyboard), 2);
}

// ── Button light ──

#[test]
fn key_presses_extend_button_light() {
    let r = rig(SKU5);
    let buttons = r.svc.button_light();

    buttons.turn_on_one_shot();
    r.sched.advance(Duration::from_millis(800));
    buttons.turn_on_one_shot();
    r.sched.advance(Duration::from_millis(800));
    assert_eq!(buttons.state(), ButtonLightState::OnPendingTimeout);

    r.sched.advance(Duration::from_millis(200));
    assert_eq!(buttons.state(), ButtonLightState::Off);

    // One on write, one off write; the repeat one-shot changed nothing.
    assert_eq!(r.driver.writes_for(LightId::Buttons), 2);
}

#[test]
fn settings_drive_button_light() {
    let r = rig(SKU5);
    let settings = r.svc.settings();
    settings.put_int(BUTTON_LIGHT_BRIGHTNESS, 64);
    r.svc.button_light().turn_on();
    assert_eq!(
        r.driver.last_for(LightId::Buttons).unwrap().color,
        brightness_to_argb(64)
    );

    settings.put_int(BUTTON_LIGHT_ENABLE, 0);
    assert_eq!(
        r.driver.last_for(LightId::Buttons).unwrap().color,
        brightness_to_argb(0)
    );

    r.driver.clear();
    r.svc.button_light().turn_on_one_shot();
    assert_eq!(r.driver.write_count(), 0, "already off, nothing to write");
    assert_eq!(r.sched.pending_count(), 0);
}

#[test]
fn button_light_absent_on_other_platforms() {
    let r = rig("ro.hw_platform=msm8x25_sku1\n");
    r.svc.button_light().turn_on_one_shot();
    r.svc.button_light().turn_on();
    assert_eq!(r.driver.writes_for(LightId::Buttons), 0);
}

// ── Real scheduler and driver ──

#[test]
fn thread_scheduler_pulse_against_sysfs() {
    let dir = tempfile::tempdir().unwrap();
    let led = dir.path().join("attention");
    std::fs::create_dir(&led).unwrap();

    let sched = Arc::new(ThreadScheduler::new().unwrap());
    let svc = LightsService::new(
        Arc::new(SysfsDriver::new(dir.path())),
        sched.clone(),
        Arc::new(Properties::new()),
        Arc::new(SettingsStore::new()),
        LegacyFlashlight::new(dir.path().join("spotlight")),
    );

    svc.light(LightId::Attention).pulse(0xFF40_2010, 20);
    assert_eq!(std::fs::read_to_string(led.join("trigger")).unwrap(), "timer");
    assert_eq!(std::fs::read_to_string(led.join("delay_on")).unwrap(), "20");

    assert!(sched.wait_idle(Duration::from_secs(5)));
    assert_eq!(std::fs::read_to_string(led.join("trigger")).unwrap(), "none");
    assert_eq!(std::fs::read_to_string(led.join("brightness")).unwrap(), "64");
}
