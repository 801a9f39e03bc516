//! ADC channel management
//!
//! RP2040 has a single ADC with four external channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29

use embassy_rp::adc::{self, Adc, Blocking, Channel};
use embassy_rp::peripherals::ADC;
use embassy_rp::Peri;
use lumen_hal::{AdcError, AdcReader};

/// External ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
}

impl AdcChannel {
    /// Get ADC channel from GPIO pin
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }
}

/// One-shot blocking reader for a single ADC channel
///
/// A conversion takes about 2 µs, short enough to run inline in the
/// brightness task.
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RpAdc {
    pub fn new(adc: Peri<'static, ADC>, channel: Channel<'static>) -> Self {
        Self {
            adc: Adc::new_blocking(adc, adc::Config::default()),
            channel,
        }
    }
}

impl AdcReader for RpAdc {
    fn read(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AdcError::Conversion)
    }
}
