//! `flashlight` subcommand: show or switch the legacy flashlight flag.

use std::path::Path;

use hwsvc_lib::legacy::StaticPermissions;

use super::{Result, Switch, kv, kv_width, load_config, on_off, open_service, print_json};

pub(super) fn cmd_flashlight(
    state: Option<Switch>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path);
    let (service, _scheduler) = open_service(&config)?;

    if let Some(state) = state {
        let caller = StaticPermissions::new(config.granted_permissions.iter().cloned());
        service.set_flashlight_enabled(&caller, matches!(state, Switch::On))?;
    }

    let status = service.flashlight_status();
    if json {
        return print_json(&status);
    }
    let w = kv_width(&["Flashlight:", "Path:"], &[]);
    kv("Flashlight:", on_off(status.enabled), w);
    kv("Path:", &status.path, w);
    Ok(())
}
