//! Minimal TOML parser for the display configuration
//!
//! Handles only the subset the display configuration needs. It does NOT
//! support the full TOML spec and needs no allocator.
//!
//! Supported features:
//! - `[chain]`, `[pwm]`, `[brightness]` and `[content]` section headers
//! - Key = value pairs (integer or quoted string)
//! - Pin values as `"gpioN"`
//! - Comments (# ...), including trailing comments
//!
//! Keys that are not set keep their [`Default`] value. Unknown sections
//! and keys are errors so that typos do not silently fall back.

use super::types::{
    ChainOrder, ConfigError, ContentMode, DisplayConfig, MAX_MESSAGE_LEN,
};
use heapless::String;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed or unknown section header (1-based line)
    InvalidSection(usize),
    /// Key not recognised in its section (1-based line)
    UnknownKey(usize),
    /// Line is not `key = value` (1-based line)
    InvalidLine(usize),
    /// Value has the wrong type or is out of range (1-based line)
    InvalidValue(usize),
    /// Invalid pin string (1-based line)
    InvalidPin(usize),
    /// Message longer than the buffer (1-based line)
    MessageTooLong(usize),
    /// Parsed values fail validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Invalid(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Chain,
    Pwm,
    Brightness,
    Content,
}

/// Parse and validate a TOML document into a [`DisplayConfig`]
pub fn parse_config(input: &str) -> Result<DisplayConfig, ParseError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection(line_no))?;
            section = parse_section_header(header).ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine(line_no))?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "chain" => Some(Section::Chain),
        "pwm" => Some(Section::Pwm),
        "brightness" => Some(Section::Brightness),
        "content" => Some(Section::Content),
        _ => None,
    }
}

fn apply_value(
    config: &mut DisplayConfig,
    section: Section,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Chain, "chip_count") => config.chain.chip_count = parse_int(value, line)?,
        (Section::Chain, "data_pin") => config.chain.data_pin = parse_pin(value, line)?,
        (Section::Chain, "clock_pin") => config.chain.clock_pin = parse_pin(value, line)?,
        (Section::Chain, "select_pin") => config.chain.select_pin = parse_pin(value, line)?,
        (Section::Chain, "bus_clock_hz") => config.chain.bus_clock_hz = parse_int(value, line)?,
        (Section::Chain, "order") => {
            config.chain.order = match parse_string(value, line)? {
                "forward" => ChainOrder::Forward,
                "reversed" => ChainOrder::Reversed,
                _ => return Err(ParseError::InvalidValue(line)),
            }
        }

        (Section::Pwm, "frequency_hz") => config.pwm.frequency_hz = parse_int(value, line)?,
        (Section::Pwm, "min_pulse_us") => config.pwm.min_pulse_us = parse_int(value, line)?,

        (Section::Brightness, "sensor_pin") => {
            config.brightness.sensor_pin = parse_pin(value, line)?
        }
        (Section::Brightness, "bright_limit") => {
            config.brightness.bright_limit = parse_int(value, line)?
        }
        (Section::Brightness, "dark_limit") => {
            config.brightness.dark_limit = parse_int(value, line)?
        }
        (Section::Brightness, "min_pct") => config.brightness.min_pct = parse_int(value, line)?,
        (Section::Brightness, "max_pct") => config.brightness.max_pct = parse_int(value, line)?,
        (Section::Brightness, "sample_interval_ms") => {
            config.brightness.sample_interval_ms = parse_int(value, line)?
        }

        (Section::Content, "mode") => {
            config.content.mode = match parse_string(value, line)? {
                "scroll" => ContentMode::Scroll,
                "fixed" => ContentMode::Fixed,
                _ => return Err(ParseError::InvalidValue(line)),
            }
        }
        (Section::Content, "message") => {
            let text = parse_string(value, line)?;
            let mut message = String::<MAX_MESSAGE_LEN>::new();
            message
                .push_str(text)
                .map_err(|_| ParseError::MessageTooLong(line))?;
            config.content.message = message;
        }
        (Section::Content, "scroll_delay_ms") => {
            config.content.scroll_delay_ms = parse_int(value, line)?
        }
        (Section::Content, "fixed_offset") => {
            config.content.fixed_offset = parse_int(value, line)?
        }
        (Section::Content, "refresh_ms") => config.content.refresh_ms = parse_int(value, line)?,
        (Section::Content, "intensity") => config.content.intensity = parse_int(value, line)?,

        _ => return Err(ParseError::UnknownKey(line)),
    }
    Ok(())
}

/// Drop a trailing `#` comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse a key-value pair
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value (removes quotes)
fn parse_string(value: &str, line: usize) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue(line))
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    let mut digits = String::<24>::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue(line))?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue(line))
}

/// Parse a pin string like "gpio3"
fn parse_pin(value: &str, line: usize) -> Result<u8, ParseError> {
    let value = parse_string(value, line).map_err(|_| ParseError::InvalidPin(line))?;
    value
        .strip_prefix("gpio")
        .and_then(|n| n.parse().ok())
        .ok_or(ParseError::InvalidPin(line))
}
