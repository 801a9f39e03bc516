//! Analog sampling abstractions

/// Errors from a one-shot ADC conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// The conversion did not complete or reported an error
    Conversion,
}

/// One-shot ADC channel reader
pub trait AdcReader {
    /// Read one raw sample (12-bit on most targets, 0-4095)
    fn read(&mut self) -> Result<u16, AdcError>;
}

impl<A: AdcReader + ?Sized> AdcReader for &mut A {
    fn read(&mut self) -> Result<u16, AdcError> {
        (**self).read()
    }
}
