//! TIMER alarm 1 as the brightness PWM time base
//!
//! The RP2040 TIMER is a free-running 64-bit µs counter with four alarms
//! that compare against its low 32 bits. Alarm 0 belongs to the embassy
//! time driver; this module owns alarm 1 and its `TIMER_IRQ_1` line.
//!
//! Targets are absolute. Since every PWM phase is far shorter than the
//! 32-bit wrap (~71 minutes), writing the low word is unambiguous.

use embassy_rp::pac;
use lumen_core::traits::AlarmTimer;

/// Alarm index used by the PWM
const ALARM: usize = 1;

/// TIMER alarm 1
///
/// Construct only once; two instances would fight over the same alarm.
pub struct TimerAlarm {
    _private: (),
}

#[allow(clippy::new_without_default)]
impl TimerAlarm {
    /// Claim alarm 1 and enable its interrupt at the TIMER
    ///
    /// The NVIC line stays masked until the firmware unmasks `TIMER_IRQ_1`.
    pub fn new() -> Self {
        let timer = pac::TIMER;
        timer.armed().write(|w| w.set_armed(1 << ALARM));
        timer.intr().write(|w| w.set_alarm(ALARM, true));
        timer.inte().modify(|w| w.set_alarm(ALARM, true));
        Self { _private: () }
    }
}

impl AlarmTimer for TimerAlarm {
    fn now_us(&self) -> u64 {
        let timer = pac::TIMER;
        loop {
            let hi = timer.timerawh().read();
            let lo = timer.timerawl().read();
            if timer.timerawh().read() == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
        }
    }

    fn arm(&mut self, target_us: u64) {
        let timer = pac::TIMER;
        timer.alarm(ALARM).write_value(target_us as u32);

        // A target already behind the counter would only match after the
        // 32-bit wrap; disarm and raise the interrupt by hand instead.
        if target_us <= self.now_us() {
            timer.armed().write(|w| w.set_armed(1 << ALARM));
            timer.intf().modify(|w| w.set_alarm(ALARM, true));
        }
    }

    fn disarm(&mut self) {
        let timer = pac::TIMER;
        timer.armed().write(|w| w.set_armed(1 << ALARM));
        timer.intf().modify(|w| w.set_alarm(ALARM, false));
        timer.intr().write(|w| w.set_alarm(ALARM, true));
    }

    fn acknowledge(&mut self) {
        let timer = pac::TIMER;
        timer.intf().modify(|w| w.set_alarm(ALARM, false));
        timer.intr().write(|w| w.set_alarm(ALARM, true));
    }
}
