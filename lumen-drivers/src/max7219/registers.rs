//! MAX7219 register map

/// Register addresses (first byte of every 16-bit frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Noop = 0x00,
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    Digit7 = 0x08,
    /// BCD decode per digit (0x00 = raw segments)
    DecodeMode = 0x09,
    /// 0-15
    Intensity = 0x0A,
    /// Digits scanned, 0-7
    ScanLimit = 0x0B,
    /// 0 = shutdown, 1 = normal operation
    Shutdown = 0x0C,
    /// 0 = normal, 1 = all LEDs on
    DisplayTest = 0x0F,
}

impl Register {
    /// Row register for display row `row` (0 = top)
    pub const fn digit(row: usize) -> Option<Self> {
        match row {
            0 => Some(Self::Digit0),
            1 => Some(Self::Digit1),
            2 => Some(Self::Digit2),
            3 => Some(Self::Digit3),
            4 => Some(Self::Digit4),
            5 => Some(Self::Digit5),
            6 => Some(Self::Digit6),
            7 => Some(Self::Digit7),
            _ => None,
        }
    }

    /// Wire address
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_rows() {
        assert_eq!(Register::digit(0), Some(Register::Digit0));
        assert_eq!(Register::digit(7).map(Register::addr), Some(0x08));
        assert_eq!(Register::digit(8), None);
    }

    #[test]
    fn test_control_addresses() {
        assert_eq!(Register::DecodeMode.addr(), 0x09);
        assert_eq!(Register::Intensity.addr(), 0x0A);
        assert_eq!(Register::ScanLimit.addr(), 0x0B);
        assert_eq!(Register::Shutdown.addr(), 0x0C);
        assert_eq!(Register::DisplayTest.addr(), 0x0F);
    }
}
