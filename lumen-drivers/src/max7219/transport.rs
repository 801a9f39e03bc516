//! Chain transports
//!
//! Two ways to get a transaction onto the wire:
//!
//! - [`BufferedTransport`] is the normal task-context path. It may fail and
//!   may involve locking.
//! - [`RawTransport`] is the interrupt-context path used by the brightness
//!   PWM. It must not block, lock or fail.
//!
//! Both usually drive the same select/clock/data lines. A buffered
//! transaction must therefore be atomic with respect to the raw path: the
//! implementation either masks the PWM interrupt for the whole transaction
//! or performs it as one uninterruptible burst. Interleaving the two
//! corrupts the frames latched by every chip.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use lumen_hal::{OutputPin, SpiConfig};

/// Task-context transport
pub trait BufferedTransport {
    type Error;

    /// Send one complete chain transaction inside one select pulse
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Interrupt-context transport
pub trait RawTransport {
    /// Send one complete chain transaction inside one select pulse
    fn burst(&mut self, bytes: &[u8]);
}

impl<T: BufferedTransport + ?Sized> BufferedTransport for &mut T {
    type Error = T::Error;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).transmit(bytes)
    }
}

impl<T: RawTransport + ?Sized> RawTransport for &mut T {
    fn burst(&mut self, bytes: &[u8]) {
        (**self).burst(bytes);
    }
}

/// Bit-banged chain bus on three output pins (SPI mode 0, MSB first)
///
/// Implements both transports; callers that share one instance between
/// task and interrupt context provide the mutual exclusion.
pub struct BitBang<DIN, CLK, CS, D> {
    data: DIN,
    clock: CLK,
    select: CS,
    delay: D,
    half_period_ns: u32,
}

impl<DIN, CLK, CS, D> BitBang<DIN, CLK, CS, D>
where
    DIN: OutputPin,
    CLK: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    /// Take the pins and park the bus idle (select high, clock low)
    pub fn new(data: DIN, clock: CLK, select: CS, delay: D, config: SpiConfig) -> Self {
        let mut bus = Self {
            data,
            clock,
            select,
            delay,
            half_period_ns: config.half_period_ns(),
        };
        bus.select.set_high();
        bus.clock.set_low();
        bus.data.set_low();
        bus
    }

    /// Shift `bytes` out inside one select pulse
    fn shift_out(&mut self, bytes: &[u8]) {
        self.select.set_low();
        for &byte in bytes {
            for bit in (0..8).rev() {
                self.data.set_level(byte & (1 << bit) != 0);
                self.half_period();
                self.clock.set_high();
                self.half_period();
                self.clock.set_low();
            }
        }
        // Rising edge latches every chip's frame at once
        self.select.set_high();
    }

    fn half_period(&mut self) {
        if self.half_period_ns > 0 {
            self.delay.delay_ns(self.half_period_ns);
        }
    }

    /// Give the pins back
    pub fn release(self) -> (DIN, CLK, CS, D) {
        (self.data, self.clock, self.select, self.delay)
    }
}

impl<DIN, CLK, CS, D> BufferedTransport for BitBang<DIN, CLK, CS, D>
where
    DIN: OutputPin,
    CLK: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = Infallible;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.shift_out(bytes);
        Ok(())
    }
}

impl<DIN, CLK, CS, D> RawTransport for BitBang<DIN, CLK, CS, D>
where
    DIN: OutputPin,
    CLK: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    fn burst(&mut self, bytes: &[u8]) {
        self.shift_out(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Data,
        Clock,
        Select,
    }

    type Trace = RefCell<Vec<(Line, bool), 512>>;

    struct TracePin<'a> {
        line: Line,
        high: bool,
        trace: &'a Trace,
    }

    impl OutputPin for TracePin<'_> {
        fn set_high(&mut self) {
            self.high = true;
            let _ = self.trace.borrow_mut().push((self.line, true));
        }

        fn set_low(&mut self) {
            self.high = false;
            let _ = self.trace.borrow_mut().push((self.line, false));
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    fn bus(trace: &Trace, config: SpiConfig) -> BitBang<TracePin<'_>, TracePin<'_>, TracePin<'_>, CountingDelay> {
        let pin = |line| TracePin { line, high: false, trace };
        BitBang::new(
            pin(Line::Data),
            pin(Line::Clock),
            pin(Line::Select),
            CountingDelay { total_ns: 0 },
            config,
        )
    }

    /// Bytes sampled on rising clock edges while select is low
    fn decode(trace: &[(Line, bool)]) -> Vec<u8, 64> {
        let mut bytes = Vec::new();
        let (mut data, mut selected) = (false, false);
        let (mut current, mut bits) = (0u8, 0);
        for &(line, level) in trace {
            match line {
                Line::Data => data = level,
                Line::Select => selected = !level,
                Line::Clock if level && selected => {
                    current = (current << 1) | u8::from(data);
                    bits += 1;
                    if bits == 8 {
                        let _ = bytes.push(current);
                        bits = 0;
                    }
                }
                Line::Clock => {}
            }
        }
        bytes
    }

    #[test]
    fn test_new_parks_bus_idle() {
        let trace = Trace::default();
        let _bus = bus(&trace, SpiConfig::default());
        assert_eq!(
            trace.borrow().as_slice(),
            &[(Line::Select, true), (Line::Clock, false), (Line::Data, false)]
        );
    }

    #[test]
    fn test_transmit_msb_first_in_one_select_pulse() {
        let trace = Trace::default();
        let mut bus = bus(&trace, SpiConfig::default());
        trace.borrow_mut().clear();

        bus.transmit(&[0x0C, 0x01, 0x0C, 0x01]).unwrap();

        let trace = trace.borrow();
        assert_eq!(trace.first(), Some(&(Line::Select, false)));
        assert_eq!(trace.last(), Some(&(Line::Select, true)));
        let selects = trace.iter().filter(|(line, _)| *line == Line::Select).count();
        assert_eq!(selects, 2);

        assert_eq!(decode(&trace).as_slice(), &[0x0C, 0x01, 0x0C, 0x01]);
    }

    #[test]
    fn test_burst_matches_transmit() {
        let buffered = Trace::default();
        let raw = Trace::default();
        bus(&buffered, SpiConfig::default()).transmit(&[0xA5, 0x3C]).unwrap();
        bus(&raw, SpiConfig::default()).burst(&[0xA5, 0x3C]);

        assert_eq!(buffered.borrow().as_slice(), raw.borrow().as_slice());
    }

    #[test]
    fn test_clock_pacing() {
        let trace = Trace::default();
        let mut bus = bus(&trace, SpiConfig::max7219(2_000_000));
        bus.burst(&[0xFF, 0x00]);

        // 16 bits, two half periods of 250 ns each
        let (.., delay) = bus.release();
        assert_eq!(delay.total_ns, 16 * 2 * 250);
    }
}
