//! Build script for lumen-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates display.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted per section, mirroring the firmware's runtime parser
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "chain",
        &["chip_count", "data_pin", "clock_pin", "select_pin", "bus_clock_hz", "order"],
    ),
    ("pwm", &["frequency_hz", "min_pulse_us"]),
    (
        "brightness",
        &[
            "sensor_pin",
            "bright_limit",
            "dark_limit",
            "min_pct",
            "max_pct",
            "sample_interval_ms",
        ],
    ),
    (
        "content",
        &[
            "mode",
            "message",
            "scroll_delay_ms",
            "fixed_offset",
            "refresh_ms",
            "intensity",
        ],
    ),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the lumen-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_chain(&config, &mut errors);
    validate_pwm(&config, &mut errors);
    validate_brightness(&config, &mut errors);
    validate_content(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in display.toml                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=display.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections and keys
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, section) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(s, _)| *s == name.as_str()) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}

/// Integer value, or `default` when the key is absent
fn int(config: &toml::Value, section: &str, key: &str, default: i64, errors: &mut Vec<String>) -> i64 {
    match get(config, section, key) {
        None => default,
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let value = int(config, section, key, default, errors);
    if !range.contains(&value) {
        errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        ));
    }
    value
}

fn check_choice(config: &toml::Value, section: &str, key: &str, choices: &[&str], errors: &mut Vec<String>) {
    match get(config, section, key) {
        None => {}
        Some(toml::Value::String(s)) if choices.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be one of {}",
            section,
            key,
            choices.join(", ")
        )),
    }
}

fn validate_chain(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "chain", "chip_count", 4, 1..=16, errors);
    check_range(config, "chain", "bus_clock_hz", 2_000_000, 1..=10_000_000, errors);
    check_choice(config, "chain", "order", &["forward", "reversed"], errors);
}

fn validate_pwm(config: &toml::Value, errors: &mut Vec<String>) {
    let freq = check_range(config, "pwm", "frequency_hz", 200, 1..=1_000_000, errors);
    let min_pulse = check_range(config, "pwm", "min_pulse_us", 50, 0..=i64::from(u32::MAX), errors);
    if freq > 0 && min_pulse * 2 > 1_000_000 / freq {
        errors.push(format!(
            "[pwm] min_pulse_us {} leaves no room in a {} us period",
            min_pulse,
            1_000_000 / freq
        ));
    }
}

fn validate_brightness(config: &toml::Value, errors: &mut Vec<String>) {
    let bright = check_range(config, "brightness", "bright_limit", 100, 0..=4095, errors);
    let dark = check_range(config, "brightness", "dark_limit", 3500, 0..=4095, errors);
    if dark <= bright {
        errors.push("[brightness] dark_limit must be above bright_limit".to_string());
    }

    let min = check_range(config, "brightness", "min_pct", 5, 0..=100, errors);
    let max = check_range(config, "brightness", "max_pct", 100, 0..=100, errors);
    if min > max {
        errors.push("[brightness] min_pct must not exceed max_pct".to_string());
    }

    check_range(config, "brightness", "sample_interval_ms", 200, 1..=60_000, errors);
}

fn validate_content(config: &toml::Value, errors: &mut Vec<String>) {
    check_choice(config, "content", "mode", &["scroll", "fixed"], errors);
    check_range(config, "content", "scroll_delay_ms", 200, 1..=60_000, errors);
    check_range(config, "content", "fixed_offset", 1, -128..=128, errors);
    check_range(config, "content", "refresh_ms", 1000, 1..=3_600_000, errors);
    check_range(config, "content", "intensity", 1, 0..=15, errors);

    match get(config, "content", "message") {
        None => {}
        Some(toml::Value::String(message)) => {
            if message.chars().count() > 64 {
                errors.push("[content] message is longer than 64 characters".to_string());
            }
            if !message.chars().all(|c| (' '..='~').contains(&c)) {
                errors.push("[content] message must be printable ASCII".to_string());
            }
        }
        Some(_) => errors.push("[content] message must be a string".to_string()),
    }
}

/// Pins are "gpioN", distinct, and the sensor sits on an ADC input
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pins = [
        ("chain", "data_pin", 3),
        ("chain", "clock_pin", 2),
        ("chain", "select_pin", 5),
        ("brightness", "sensor_pin", 26),
    ];

    let mut seen = HashSet::new();
    for (section, key, default) in pins {
        let pin = match get(config, section, key) {
            None => Some(default),
            Some(toml::Value::String(s)) => s
                .strip_prefix("gpio")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|&n| n < 30),
            Some(_) => None,
        };

        let Some(pin) = pin else {
            errors.push(format!("[{}] {} must be \"gpio0\"-\"gpio29\"", section, key));
            continue;
        };
        if !seen.insert(pin) {
            errors.push(format!("[{}] {} reuses gpio{}", section, key, pin));
        }
        if key == "sensor_pin" && !(26..=29).contains(&pin) {
            errors.push("[brightness] sensor_pin must be an ADC pin (gpio26-29)".to_string());
        }
    }
}
