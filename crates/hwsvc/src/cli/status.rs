//! `status` subcommand: LED nodes, button backlight and flashlight.

use std::path::Path;

use hwsvc_lib::driver::SysfsDriver;

use super::{
    ButtonLightStatus, Config, FlashlightStatus, LedNodeJson, LightId, Result, StatusOutput, kv,
    kv_indent, kv_width, load_config, on_off, open_service, print_json,
};

fn collect_led_nodes(config: &Config) -> Vec<LedNodeJson> {
    let driver = SysfsDriver::from_config(config);
    LightId::ALL
        .iter()
        .map(|&id| {
            let dir = driver.led_dir(id);
            LedNodeJson {
                light: id,
                present: dir.is_dir(),
                path: dir.display().to_string(),
            }
        })
        .collect()
}

fn print_status(
    config: &Config,
    leds: Vec<LedNodeJson>,
    button_light: ButtonLightStatus,
    flashlight: FlashlightStatus,
    json: bool,
) -> Result<()> {
    if json {
        return print_json(&StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            sysfs_root: config.sysfs_root.clone(),
            lights: leds,
            button_light,
            flashlight,
        });
    }

    let names: Vec<String> = LightId::ALL.iter().map(|id| format!("{id}:")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let w = kv_width(
        &["Version:", "LEDs:", "Button light:", "Flashlight:"],
        &name_refs,
    );

    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    println!();

    kv("LEDs:", &config.sysfs_root, w);
    for led in &leds {
        let presence = if led.present { "present" } else { "missing" };
        kv_indent(
            &format!("{}:", led.light),
            format_args!("{} ({presence})", led.path),
            w,
        );
    }
    println!();

    if button_light.exists {
        kv(
            "Button light:",
            format_args!(
                "{} (brightness {}, timeout {}ms)",
                if button_light.enabled { "enabled" } else { "disabled" },
                button_light.brightness,
                button_light.timeout_ms
            ),
            w,
        );
    } else {
        kv("Button light:", "not present", w);
    }
    kv(
        "Flashlight:",
        format_args!("{} ({})", on_off(flashlight.enabled), flashlight.path),
        w,
    );
    Ok(())
}

pub(super) fn cmd_status(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let (service, _scheduler) = open_service(&config)?;
    print_status(
        &config,
        collect_led_nodes(&config),
        service.button_light_status(),
        service.flashlight_status(),
        json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> Config {
        Config {
            sysfs_root: dir.path().display().to_string(),
            flashlight_path: dir.path().join("spotlight").display().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn led_nodes_report_presence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("battery")).unwrap();
        let nodes = collect_led_nodes(&config_in(&dir));
        assert_eq!(nodes.len(), 8);
        assert!(nodes[LightId::Battery.index()].present);
        assert!(!nodes[LightId::Wifi.index()].present);
    }

    #[test]
    fn led_nodes_use_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.led_names.insert("wifi".into(), "wlan-led".into());
        let nodes = collect_led_nodes(&config);
        assert!(nodes[LightId::Wifi.index()].path.ends_with("wlan-led"));
    }

    #[test]
    fn cmd_status_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        config_in(&dir).save_to(&path).unwrap();
        assert!(cmd_status(false, Some(&path)).is_ok());
        assert!(cmd_status(true, Some(&path)).is_ok());
    }
}
