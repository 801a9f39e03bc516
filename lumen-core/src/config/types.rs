//! Configuration type definitions
//!
//! All values are fixed at startup. Defaults reproduce the reference
//! build: four chips, 2 MHz bus, 200 Hz brightness PWM, 50 µs minimum
//! pulse, sensor limits 100 (bright) / 3500 (dark), 5-100 % duty.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::framebuffer::MAX_CHIPS;

/// Maximum message length in characters
pub const MAX_MESSAGE_LEN: usize = 64;

/// Highest MAX7219 intensity register value
pub const MAX_INTENSITY: u8 = 15;

/// Highest bus clock the chips accept
pub const MAX_BUS_CLOCK_HZ: u32 = 10_000_000;

/// Physical frame order of the logical chips within one transaction
///
/// The first frame shifted out ends up in the chip furthest from the
/// controller. Which physical module that is depends on how the chain is
/// wired, so both orders are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChainOrder {
    /// Logical chip `i` is frame `i`
    #[default]
    Forward,
    /// Logical chip `i` is frame `N - 1 - i`
    Reversed,
}

/// Chip chain wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChainConfig {
    /// Number of chained chips (display width = chip_count × 8)
    pub chip_count: u8,
    /// DIN GPIO
    pub data_pin: u8,
    /// CLK GPIO
    pub clock_pin: u8,
    /// CS/LOAD GPIO
    pub select_pin: u8,
    /// Serial clock in Hz
    pub bus_clock_hz: u32,
    /// Frame order within a transaction
    pub order: ChainOrder,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chip_count: 4,
            data_pin: 3,
            clock_pin: 2,
            select_pin: 5,
            bus_clock_hz: 2_000_000,
            order: ChainOrder::Forward,
        }
    }
}

/// Brightness PWM timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmConfig {
    /// PWM frequency in Hz (200 Hz is well above flicker perception)
    pub frequency_hz: u32,
    /// Shortest ON or OFF phase in µs
    pub min_pulse_us: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 200,
            min_pulse_us: 50,
        }
    }
}

impl PwmConfig {
    /// PWM period in µs (0 if the frequency is 0)
    pub const fn period_us(&self) -> u32 {
        if self.frequency_hz == 0 {
            0
        } else {
            1_000_000 / self.frequency_hz
        }
    }
}

/// Ambient light to duty mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrightnessConfig {
    /// Light sensor GPIO (must be ADC capable)
    pub sensor_pin: u8,
    /// Raw reading in bright ambient light (maps to `max_pct`)
    pub bright_limit: u16,
    /// Raw reading in dark ambient light (maps to `min_pct`)
    pub dark_limit: u16,
    /// Duty in the dark, also the fallback on sensor failure
    pub min_pct: u8,
    /// Duty in bright light
    pub max_pct: u8,
    /// Sensor sampling interval in ms
    pub sample_interval_ms: u32,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            sensor_pin: 26,
            bright_limit: 100,
            dark_limit: 3500,
            min_pct: 5,
            max_pct: 100,
            sample_interval_ms: 200,
        }
    }
}

/// What the content task shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContentMode {
    /// Marquee from right to left
    #[default]
    Scroll,
    /// Static text at `fixed_offset`
    Fixed,
}

/// Displayed content
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentConfig {
    /// Scroll or fixed
    pub mode: ContentMode,
    /// Message text (printable ASCII; anything else renders as space)
    pub message: String<MAX_MESSAGE_LEN>,
    /// Delay between scroll steps in ms
    pub scroll_delay_ms: u32,
    /// Left column of fixed text
    pub fixed_offset: i16,
    /// Re-send interval for fixed text in ms
    pub refresh_ms: u32,
    /// Hardware intensity (0-15) applied after init
    pub intensity: u8,
}

impl Default for ContentConfig {
    fn default() -> Self {
        let mut message = String::new();
        let _ = message.push_str("Hello from Lumen!   ");
        Self {
            mode: ContentMode::Scroll,
            message,
            scroll_delay_ms: 200,
            fixed_offset: 1,
            refresh_ms: 1000,
            // Lowest hardware level leaves the whole range to the PWM
            intensity: 1,
        }
    }
}

/// Complete display configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub chain: ChainConfig,
    pub pwm: PwmConfig,
    pub brightness: BrightnessConfig,
    pub content: ContentConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// chip_count outside 1..=MAX_CHIPS
    ChipCount,
    /// Two functions share one GPIO
    DuplicatePin(u8),
    /// Bus clock is zero or above the chip maximum
    BusClock,
    /// PWM frequency is zero or above 1 MHz
    PwmFrequency,
    /// Period cannot fit both a minimum ON and a minimum OFF pulse
    PulseTooLong,
    /// dark_limit must be above bright_limit
    SensorLimits,
    /// min_pct > max_pct or max_pct > 100
    BrightnessRange,
    /// Hardware intensity above 15
    Intensity,
    /// A task interval is zero
    ZeroInterval,
}

impl DisplayConfig {
    /// Check every cross-field constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chain = &self.chain;
        if chain.chip_count == 0 || usize::from(chain.chip_count) > MAX_CHIPS {
            return Err(ConfigError::ChipCount);
        }
        if chain.bus_clock_hz == 0 || chain.bus_clock_hz > MAX_BUS_CLOCK_HZ {
            return Err(ConfigError::BusClock);
        }

        let pins = [
            chain.data_pin,
            chain.clock_pin,
            chain.select_pin,
            self.brightness.sensor_pin,
        ];
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(ConfigError::DuplicatePin(*pin));
            }
        }

        let pwm = &self.pwm;
        if pwm.frequency_hz == 0 || pwm.frequency_hz > 1_000_000 {
            return Err(ConfigError::PwmFrequency);
        }
        if pwm.min_pulse_us.saturating_mul(2) > pwm.period_us() {
            return Err(ConfigError::PulseTooLong);
        }

        let brightness = &self.brightness;
        if brightness.dark_limit <= brightness.bright_limit {
            return Err(ConfigError::SensorLimits);
        }
        if brightness.max_pct > 100 || brightness.min_pct > brightness.max_pct {
            return Err(ConfigError::BrightnessRange);
        }

        let content = &self.content;
        if content.intensity > MAX_INTENSITY {
            return Err(ConfigError::Intensity);
        }
        if brightness.sample_interval_ms == 0
            || content.scroll_delay_ms == 0
            || content.refresh_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DisplayConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pwm.period_us(), 5000);
        assert_eq!(config.content.message.as_str(), "Hello from Lumen!   ");
    }

    #[test]
    fn test_chip_count_bounds() {
        let mut config = DisplayConfig::default();
        config.chain.chip_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::ChipCount));

        config.chain.chip_count = MAX_CHIPS as u8 + 1;
        assert_eq!(config.validate(), Err(ConfigError::ChipCount));

        config.chain.chip_count = MAX_CHIPS as u8;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_pins() {
        let mut config = DisplayConfig::default();
        config.brightness.sensor_pin = config.chain.clock_pin;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePin(config.chain.clock_pin))
        );
    }

    #[test]
    fn test_bus_clock_limit() {
        let mut config = DisplayConfig::default();
        config.chain.bus_clock_hz = 12_000_000;
        assert_eq!(config.validate(), Err(ConfigError::BusClock));
    }

    #[test]
    fn test_pulse_must_fit_period() {
        let mut config = DisplayConfig::default();
        config.pwm.min_pulse_us = 2501;
        assert_eq!(config.validate(), Err(ConfigError::PulseTooLong));

        config.pwm.min_pulse_us = 2500;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_sensor_limits_ordered() {
        let mut config = DisplayConfig::default();
        config.brightness.dark_limit = config.brightness.bright_limit;
        assert_eq!(config.validate(), Err(ConfigError::SensorLimits));
    }

    #[test]
    fn test_brightness_range() {
        let mut config = DisplayConfig::default();
        config.brightness.min_pct = 60;
        config.brightness.max_pct = 50;
        assert_eq!(config.validate(), Err(ConfigError::BrightnessRange));

        config.brightness.min_pct = 0;
        config.brightness.max_pct = 101;
        assert_eq!(config.validate(), Err(ConfigError::BrightnessRange));
    }

    #[test]
    fn test_intensity_and_intervals() {
        let mut config = DisplayConfig::default();
        config.content.intensity = 16;
        assert_eq!(config.validate(), Err(ConfigError::Intensity));

        let mut config = DisplayConfig::default();
        config.content.scroll_delay_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }
}
