//! Photoresistor ambient light sensor
//!
//! An LDR on a pull-up divider into an ADC input. Darkness raises the LDR
//! resistance and with it the reading, so higher means darker.

use lumen_core::traits::{LightSensor, SensorError};
use lumen_hal::{AdcError, AdcReader};

/// Full-scale reading of a 12-bit ADC
pub const ADC_MAX: u16 = 4095;

/// Photoresistor divider sampled by a one-shot ADC
pub struct Photoresistor<ADC> {
    adc: ADC,
}

impl<ADC: AdcReader> Photoresistor<ADC> {
    pub fn new(adc: ADC) -> Self {
        Self { adc }
    }
}

impl<ADC: AdcReader> LightSensor for Photoresistor<ADC> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        match self.adc.read() {
            Ok(raw) => Ok(raw.min(ADC_MAX)),
            Err(AdcError::Conversion) => Err(SensorError::ConversionError),
        }
    }
}

#[cfg(test)]
pub struct DummyAdc(pub Result<u16, AdcError>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, AdcError> {
        self.0
    }
}
