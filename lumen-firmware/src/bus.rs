//! Chain bus shared between tasks and the PWM interrupt
//!
//! One bit-banged bus drives the chain's data/clock/select lines. Task code
//! reaches it through [`SharedBus`] as a [`BufferedTransport`]; the PWM
//! interrupt reaches it through the same handle as a [`RawTransport`].
//!
//! Every access runs inside `CHAIN_BUS.lock`, a critical section that masks
//! interrupts. A buffered transaction therefore completes before the PWM
//! interrupt can toggle SHUTDOWN, so the two paths never interleave their
//! bits on the wire. The PWM interrupt is delayed by at most one
//! transaction (one row for the whole chain) and catches up through its
//! absolute alarm targets.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use lumen_drivers::max7219::{BitBang, BufferedTransport, RawTransport};
use lumen_hal_rp2040::RpOutput;

/// Concrete bit-banged chain bus
pub type ChainBus = BitBang<RpOutput, RpOutput, RpOutput, CycleDelay>;

/// The one chain bus, installed once at startup
static CHAIN_BUS: Mutex<CriticalSectionRawMutex, RefCell<Option<ChainBus>>> =
    Mutex::new(RefCell::new(None));

/// Errors on the buffered path
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BusError {
    /// Transmit before [`install`]
    NotInstalled,
}

/// Make `bus` the chain bus
///
/// Must run before the display driver or the PWM interrupt use it.
pub fn install(bus: ChainBus) {
    CHAIN_BUS.lock(|cell| {
        cell.replace(Some(bus));
    });
}

/// Handle to the installed chain bus
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedBus;

impl BufferedTransport for SharedBus {
    type Error = BusError;

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        CHAIN_BUS.lock(|cell| match cell.borrow_mut().as_mut() {
            Some(bus) => bus.transmit(bytes).map_err(|never| match never {}),
            None => Err(BusError::NotInstalled),
        })
    }
}

impl RawTransport for SharedBus {
    fn burst(&mut self, bytes: &[u8]) {
        CHAIN_BUS.lock(|cell| {
            if let Some(bus) = cell.borrow_mut().as_mut() {
                bus.burst(bytes);
            }
        });
    }
}

/// Busy-wait delay counted in core clock cycles
///
/// Safe in interrupt context; sub-microsecond bus half periods are too
/// short for any timer-based delay.
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    pub fn new(sys_clock_hz: u32) -> Self {
        Self {
            cycles_per_us: (sys_clock_hz / 1_000_000).max(1),
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (u64::from(ns) * u64::from(self.cycles_per_us)).div_ceil(1000);
        cortex_m::asm::delay(cycles.min(u64::from(u32::MAX)) as u32);
    }
}
