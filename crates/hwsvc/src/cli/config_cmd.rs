//! `config` subcommand: show current configuration and file paths.

use std::path::Path;

use super::{
    Config, ConfigFilesJson, ConfigOutput, Result, kv, kv_indent, kv_width, load_config, print_json,
};

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    let properties_file = Some(config.properties_file.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    let properties_file_exists = properties_file
        .as_deref()
        .is_some_and(|p| Path::new(p).exists());
    let flashlight_path_exists = Path::new(&config.flashlight_path).exists();

    if json {
        let flashlight_path = config.flashlight_path.clone();
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            files: ConfigFilesJson {
                properties_file,
                properties_file_exists,
                flashlight_path,
                flashlight_path_exists,
            },
        });
    }

    // Human-readable output
    let mut entries: Vec<(String, String)> = vec![
        ("sysfs_root:".into(), config.sysfs_root.clone()),
        (
            "granted_permissions:".into(),
            if config.granted_permissions.is_empty() {
                "(none)".into()
            } else {
                config.granted_permissions.join(", ")
            },
        ),
    ];
    entries.extend(
        config
            .led_names
            .iter()
            .map(|(light, name)| (format!("led_names.{light}:"), name.clone())),
    );
    entries.extend(
        config
            .properties
            .iter()
            .map(|(key, value)| (format!("{key}:"), value.clone())),
    );
    entries.extend(
        config
            .settings
            .iter()
            .map(|(key, value)| (format!("{key}:"), value.to_string())),
    );
    let mut indent_keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    indent_keys.extend(["Properties file:", "Flashlight:"]);
    let w = kv_width(&["Config file:"], &indent_keys);

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    for (key, value) in &entries {
        kv_indent(key, value, w);
    }
    println!();

    println!("Files:");
    let presence = |exists: bool| if exists { "present" } else { "not found" };
    match &properties_file {
        Some(p) => kv_indent(
            "Properties file:",
            format_args!("{p} ({})", presence(properties_file_exists)),
            w,
        ),
        None => kv_indent("Properties file:", "(none)", w),
    }
    kv_indent(
        "Flashlight:",
        format_args!(
            "{} ({})",
            config.flashlight_path,
            presence(flashlight_path_exists)
        ),
        w,
    );
    Ok(())
}
