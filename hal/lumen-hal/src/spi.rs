//! Serial bus timing
//!
//! The MAX7219 chain is clocked in SPI mode 0: the clock idles low and DIN
//! is sampled on the rising edge. Chip select is driven separately by the
//! transport because one select pulse has to frame the whole chain
//! transaction.

/// Maximum serial clock the MAX7219 accepts
pub const MAX7219_MAX_FREQUENCY: u32 = 10_000_000;

/// Serial bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 2_000_000, // 2 MHz keeps the raw ISR path short
        }
    }
}

impl SpiConfig {
    /// Configuration for a MAX7219 chain at the given clock
    ///
    /// The frequency is capped at the chip maximum.
    pub const fn max7219(frequency: u32) -> Self {
        let frequency = if frequency > MAX7219_MAX_FREQUENCY {
            MAX7219_MAX_FREQUENCY
        } else {
            frequency
        };
        Self { frequency }
    }

    /// Half of one clock period in nanoseconds (0 if the frequency is 0)
    pub const fn half_period_ns(&self) -> u32 {
        if self.frequency == 0 {
            0
        } else {
            500_000_000 / self.frequency
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max7219_config_caps_frequency() {
        let cfg = SpiConfig::max7219(20_000_000);
        assert_eq!(cfg.frequency, MAX7219_MAX_FREQUENCY);

        let cfg = SpiConfig::max7219(2_000_000);
        assert_eq!(cfg.frequency, 2_000_000);
    }

    #[test]
    fn test_half_period() {
        assert_eq!(SpiConfig::max7219(2_000_000).half_period_ns(), 250);
        assert_eq!(SpiConfig::max7219(10_000_000).half_period_ns(), 50);
        assert_eq!(SpiConfig::max7219(0).half_period_ns(), 0);
        assert_eq!(SpiConfig::default().half_period_ns(), 250);
    }
}
