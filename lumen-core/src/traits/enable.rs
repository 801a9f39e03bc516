//! Display enable control from interrupt context

/// Turns the whole display on or off
///
/// Called from the PWM alarm interrupt, so implementations must not block,
/// allocate, or wait on anything the interrupted code might hold. Failures
/// cannot be reported from there and are swallowed by the implementation.
pub trait EnableLine {
    /// Drive the display enabled (`true`) or shut down (`false`)
    fn set_enabled_isr(&mut self, enabled: bool);
}

impl<E: EnableLine + ?Sized> EnableLine for &mut E {
    fn set_enabled_isr(&mut self, enabled: bool) {
        (**self).set_enabled_isr(enabled);
    }
}
