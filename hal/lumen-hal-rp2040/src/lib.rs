//! RP2040-specific HAL for the LED matrix firmware
//!
//! This crate provides RP2040 implementations of the shared `lumen-hal`
//! and `lumen-core` traits:
//!
//! - Config-driven pin allocation ([`pins::PinBank`])
//! - Push-pull outputs for the chain bus ([`gpio::RpOutput`])
//! - Blocking ADC for the light sensor ([`adc::RpAdc`])
//! - TIMER alarm 1 for the brightness PWM ([`alarm::TimerAlarm`])

#![no_std]

pub mod adc;
pub mod alarm;
pub mod gpio;
pub mod pins;

pub use adc::{AdcChannel, RpAdc};
pub use alarm::TimerAlarm;
pub use gpio::RpOutput;
pub use pins::{PinBank, PinError};
