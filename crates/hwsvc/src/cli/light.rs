//! `set` / `brightness` / `flash` / `pulse` / `off` subcommands.

use std::path::Path;

use super::{
    BrightnessMode, FlashMode, LightId, LightStatus, Result, kv, kv_width, load_config,
    open_service, print_json, wait_for_timers,
};

pub(super) enum LightOp {
    Color(u32),
    Brightness { level: u8, mode: BrightnessMode },
    Flash {
        color: u32,
        mode: FlashMode,
        on_ms: u32,
        off_ms: u32,
    },
    Pulse { color: u32, on_ms: u32 },
    Off,
}

pub(super) fn cmd_light(
    id: LightId,
    op: LightOp,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path);
    let (service, scheduler) = open_service(&config)?;
    let light = service.light(id);

    let waits = matches!(op, LightOp::Pulse { .. });
    match op {
        LightOp::Color(color) => light.set_color(color),
        LightOp::Brightness { level, mode } => {
            light.set_brightness_with_mode(u32::from(level), mode)
        }
        LightOp::Flash {
            color,
            mode,
            on_ms,
            off_ms,
        } => light.set_flashing(color, mode, on_ms, off_ms),
        LightOp::Pulse { color, on_ms } => light.pulse(color, on_ms),
        LightOp::Off => light.turn_off(),
    }
    if waits {
        wait_for_timers(&scheduler);
    }

    print_light(&service.light_status(id), json)
}

fn mode_label(status: &LightStatus) -> String {
    match status.mode {
        FlashMode::None => "steady".into(),
        FlashMode::Timed => {
            format!("timed flash ({}ms on / {}ms off)", status.on_ms, status.off_ms)
        }
        FlashMode::Hardware => {
            format!("hardware flash ({}ms on / {}ms off)", status.on_ms, status.off_ms)
        }
    }
}

fn print_light(status: &LightStatus, json: bool) -> Result<()> {
    if json {
        return print_json(status);
    }
    let w = kv_width(&["Light:", "Color:", "Mode:", "Brightness:"], &[]);
    kv("Light:", status.light, w);
    kv("Color:", &status.color, w);
    kv("Mode:", mode_label(status), w);
    if status.brightness_mode == BrightnessMode::Sensor {
        kv("Brightness:", "sensor", w);
    }
    Ok(())
}
