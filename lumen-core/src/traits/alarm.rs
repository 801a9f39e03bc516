//! One-shot hardware alarm

/// Free-running microsecond clock with a single one-shot alarm
///
/// The scheduler always arms against an absolute target so that interrupt
/// latency does not accumulate into the PWM period.
pub trait AlarmTimer {
    /// Current time in µs since boot
    fn now_us(&self) -> u64;

    /// Fire the alarm at `target_us`
    ///
    /// If the target is already in the past the alarm must fire as soon as
    /// possible rather than waiting for the counter to wrap.
    fn arm(&mut self, target_us: u64);

    /// Cancel a pending alarm
    fn disarm(&mut self);

    /// Clear the pending interrupt flag, if the hardware has one
    fn acknowledge(&mut self) {}
}
