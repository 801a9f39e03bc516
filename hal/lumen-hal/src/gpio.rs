//! GPIO pin abstractions
//!
//! The chain's data, clock and select lines are plain push-pull outputs.
//! The same pins are driven from task context (buffered transport) and from
//! the PWM interrupt (raw transport), so every method here must be a single
//! register write: no locking, no allocation, no failure path.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_level() {
        let mut pin = MockPin { high: false };

        pin.set_level(true);
        assert!(pin.is_set_high());

        pin.set_level(false);
        assert!(!pin.is_set_high());
    }

    #[test]
    fn test_mut_ref_forwarding() {
        fn drive_high<P: OutputPin>(mut pin: P) -> bool {
            pin.set_high();
            pin.is_set_high()
        }

        let mut pin = MockPin { high: false };
        assert!(drive_high(&mut pin));
        assert!(pin.high);
    }
}
