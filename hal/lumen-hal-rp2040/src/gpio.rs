//! Output pin adapter
//!
//! Single-cycle SIO writes, so safe to drive from the PWM interrupt.

use embassy_rp::gpio::Output;
use lumen_hal::OutputPin;

/// Embassy output implementing [`lumen_hal::OutputPin`]
pub struct RpOutput(Output<'static>);

impl RpOutput {
    pub fn new(output: Output<'static>) -> Self {
        Self(output)
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
