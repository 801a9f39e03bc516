//! Ambient light sensor trait

/// Errors that can occur while sampling the light sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    ConversionError,
}

/// Raw ambient light reading
///
/// Higher readings mean a darker room (photoresistor to ground on a
/// pull-up divider).
pub trait LightSensor {
    /// Sample the sensor once, returning the raw 12-bit ADC value
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}
