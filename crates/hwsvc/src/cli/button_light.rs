//! `button-light` subcommand: drive the button backlight policy.

use std::path::Path;

use super::{
    ButtonAction, ButtonLightState, ButtonLightStatus, Result, kv, kv_width, load_config,
    on_off, open_service, print_json, wait_for_timers,
};

fn state_label(state: ButtonLightState) -> &'static str {
    match state {
        ButtonLightState::Off => "off",
        ButtonLightState::OnPersistent => "on",
        ButtonLightState::OnPendingTimeout => "on (timeout pending)",
    }
}

pub(super) fn cmd_button_light(
    action: ButtonAction,
    level: Option<u32>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path);
    let (service, scheduler) = open_service(&config)?;
    let buttons = service.button_light();

    if !buttons.exists() {
        log::warn!("button backlight not present on this platform");
    }

    match (action, level) {
        (ButtonAction::On, Some(level)) => buttons.set_brightness(level),
        (ButtonAction::On, None) => buttons.turn_on(),
        (ButtonAction::Off, _) => buttons.turn_off(),
        (ButtonAction::Oneshot, Some(level)) => buttons.set_brightness_one_shot(level),
        (ButtonAction::Oneshot, None) => buttons.turn_on_one_shot(),
    }

    if !json && buttons.state() == ButtonLightState::OnPendingTimeout {
        println!(
            "Button light on, turning off in {}ms...",
            buttons.timeout().as_millis()
        );
    }
    wait_for_timers(&scheduler);

    print_status(&service.button_light_status(), json)
}

fn print_status(status: &ButtonLightStatus, json: bool) -> Result<()> {
    if json {
        return print_json(status);
    }
    let w = kv_width(
        &["Button light:", "Enabled:", "Brightness:", "Timeout:"],
        &[],
    );
    if !status.exists {
        kv("Button light:", "not present", w);
        return Ok(());
    }
    kv("Button light:", state_label(status.state), w);
    kv("Enabled:", on_off(status.enabled), w);
    kv("Brightness:", status.brightness, w);
    kv("Timeout:", format_args!("{}ms", status.timeout_ms), w);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels() {
        assert_eq!(state_label(ButtonLightState::Off), "off");
        assert_eq!(state_label(ButtonLightState::OnPersistent), "on");
        assert!(state_label(ButtonLightState::OnPendingTimeout).contains("pending"));
    }

    #[test]
    fn print_absent_status_succeeds() {
        let status = ButtonLightStatus {
            exists: false,
            enabled: true,
            brightness: 2,
            timeout_ms: 1500,
            state: ButtonLightState::Off,
        };
        assert!(print_status(&status, false).is_ok());
        assert!(print_status(&status, true).is_ok());
    }
}
