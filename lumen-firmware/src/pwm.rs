//! Brightness PWM interrupt
//!
//! Process-wide state for the one PWM instance:
//!
//! - [`PWM_TIMING`]: ON/OFF times, written by the brightness task, read by
//!   the interrupt. Lock-free.
//! - `PWM`: the scheduler, owned by `TIMER_IRQ_1` once installed.
//!
//! Ordering: [`start`] installs and starts the scheduler before it unmasks
//! `TIMER_IRQ_1`, so the handler never runs without a scheduler. Once
//! started the PWM runs for the life of the firmware.

use core::cell::RefCell;

use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use lumen_core::brightness::PhaseTimes;
use lumen_core::pwm::{PwmScheduler, SharedTiming};
use lumen_drivers::max7219::{ChainEncoder, ShutdownLine};
use lumen_hal_rp2040::TimerAlarm;

use crate::bus::SharedBus;

type Scheduler = PwmScheduler<'static, ShutdownLine<SharedBus>, TimerAlarm>;

/// Current ON/OFF times (50 % until the first sensor sample)
pub static PWM_TIMING: SharedTiming = SharedTiming::new(PhaseTimes::half(5000));

static PWM: Mutex<CriticalSectionRawMutex, RefCell<Option<Scheduler>>> =
    Mutex::new(RefCell::new(None));

/// Install the scheduler and let the alarm interrupt run
pub fn start(encoder: ChainEncoder, period_us: u32) {
    let line = ShutdownLine::new(SharedBus, encoder);
    let mut scheduler = PwmScheduler::new(line, TimerAlarm::new(), &PWM_TIMING, period_us);

    PWM.lock(|cell| {
        scheduler.start();
        cell.replace(Some(scheduler));
    });

    interrupt::TIMER_IRQ_1.unpend();
    // SAFETY: the handler only touches PWM and the chain bus, both behind
    // critical-section mutexes, and PWM is populated above.
    unsafe { interrupt::TIMER_IRQ_1.enable() };
}

#[interrupt]
fn TIMER_IRQ_1() {
    PWM.lock(|cell| {
        if let Some(scheduler) = cell.borrow_mut().as_mut() {
            scheduler.on_alarm();
        }
    });
}
