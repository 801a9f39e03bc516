//! Dynamic pin allocation for config-driven hardware setup
//!
//! Hands out GPIO pins by number at runtime so the chain and sensor pins
//! can come from the TOML configuration instead of being hardcoded. Each
//! pin can be taken once; a second request is an error.

use embassy_rp::adc::Channel;
use embassy_rp::gpio::{AnyPin, Level, Output, Pull};
use embassy_rp::peripherals::{ADC, PIN_26, PIN_27, PIN_28, PIN_29};
use embassy_rp::{Peri, Peripherals};

use crate::adc::AdcChannel;
use crate::gpio::RpOutput;

/// Number of user GPIOs on RP2040
pub const GPIO_COUNT: u8 = 30;

/// GPIOs without an ADC function
const DIGITAL_ONLY: usize = 26;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin has no ADC input
    NotAnalog(u8),
}

/// Pin bank that holds the GPIO pins and allows taking them by number
pub struct PinBank {
    digital: [Option<Peri<'static, AnyPin>>; DIGITAL_ONLY],
    pin26: Option<Peri<'static, PIN_26>>,
    pin27: Option<Peri<'static, PIN_27>>,
    pin28: Option<Peri<'static, PIN_28>>,
    pin29: Option<Peri<'static, PIN_29>>,
}

impl PinBank {
    /// Move every GPIO out of `p`, returning the ADC peripheral alongside
    pub fn from_peripherals(p: Peripherals) -> (Self, Peri<'static, ADC>) {
        let bank = Self {
            digital: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
            ],
            pin26: Some(p.PIN_26),
            pin27: Some(p.PIN_27),
            pin28: Some(p.PIN_28),
            pin29: Some(p.PIN_29),
        };
        (bank, p.ADC)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        let taken = match pin {
            0..=25 => self.digital[usize::from(pin)].take(),
            26 => self.pin26.take().map(|p| p.into()),
            27 => self.pin27.take().map(|p| p.into()),
            28 => self.pin28.take().map(|p| p.into()),
            29 => self.pin29.take().map(|p| p.into()),
            _ => return Err(PinError::InvalidPin(pin)),
        };
        taken.ok_or(PinError::AlreadyTaken(pin))
    }

    /// Take a pin and configure it as a push-pull output
    pub fn take_output(&mut self, pin: u8, initial: Level) -> Result<RpOutput, PinError> {
        let pin = self.take(pin)?;
        Ok(RpOutput::new(Output::new(pin, initial)))
    }

    /// Take an ADC-capable pin as an analog input channel
    pub fn take_adc_channel(&mut self, pin: u8) -> Result<Channel<'static>, PinError> {
        let channel = match AdcChannel::from_gpio(pin) {
            Some(AdcChannel::Adc0) => self.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            Some(AdcChannel::Adc1) => self.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            Some(AdcChannel::Adc2) => self.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            Some(AdcChannel::Adc3) => self.pin29.take().map(|p| Channel::new_pin(p, Pull::None)),
            None if pin < GPIO_COUNT => return Err(PinError::NotAnalog(pin)),
            None => return Err(PinError::InvalidPin(pin)),
        };
        channel.ok_or(PinError::AlreadyTaken(pin))
    }
}
