//! Two-phase PWM state machine driven by a one-shot alarm

use crate::traits::{AlarmTimer, EnableLine};

use super::timing::SharedTiming;

/// Current half of the PWM cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Display enabled
    On,
    /// Display shut down
    Off,
}

/// Brightness PWM scheduler
///
/// Owned by the alarm interrupt once started. Each alarm toggles the enable
/// line and re-arms at the previous *target* plus the next phase length, so
/// interrupt latency never accumulates into the period.
///
/// A phase length of zero (duty 0 % or 100 %) means "no toggle": the
/// scheduler stays in its current phase and re-checks one period later.
pub struct PwmScheduler<'a, E, A> {
    enable: E,
    alarm: A,
    timing: &'a SharedTiming,
    period_us: u32,
    phase: Phase,
    target_us: u64,
}

impl<'a, E: EnableLine, A: AlarmTimer> PwmScheduler<'a, E, A> {
    /// Create a stopped scheduler
    ///
    /// `period_us` is only used to pace re-checks while a phase is empty.
    pub fn new(enable: E, alarm: A, timing: &'a SharedTiming, period_us: u32) -> Self {
        Self {
            enable,
            alarm,
            timing,
            period_us: period_us.max(1),
            phase: Phase::On,
            target_us: 0,
        }
    }

    /// Enter the first phase and arm the first alarm relative to now
    pub fn start(&mut self) {
        let times = self.timing.load();
        let now = self.alarm.now_us();

        if times.on_us == 0 {
            self.enable.set_enabled_isr(false);
            self.phase = Phase::Off;
            self.target_us = now + u64::from(self.nonzero(times.off_us));
        } else {
            self.enable.set_enabled_isr(true);
            self.phase = Phase::On;
            self.target_us = now + u64::from(times.on_us);
        }
        self.alarm.arm(self.target_us);
    }

    /// Alarm callback: switch phase and re-arm
    ///
    /// Runs in interrupt context. Fixed amount of work, no blocking.
    pub fn on_alarm(&mut self) {
        self.alarm.acknowledge();
        let times = self.timing.load();

        match self.phase {
            Phase::On if times.off_us == 0 => {
                self.target_us += u64::from(self.period_us);
            }
            Phase::On => {
                self.enable.set_enabled_isr(false);
                self.phase = Phase::Off;
                self.target_us += u64::from(times.off_us);
            }
            Phase::Off if times.on_us == 0 => {
                self.target_us += u64::from(self.period_us);
            }
            Phase::Off => {
                self.enable.set_enabled_isr(true);
                self.phase = Phase::On;
                self.target_us += u64::from(times.on_us);
            }
        }

        self.alarm.arm(self.target_us);
    }

    /// Disarm the alarm and hand the enable line and timer back
    ///
    /// The display is left in whatever phase it was in.
    pub fn stop(mut self) -> (E, A) {
        self.alarm.disarm();
        (self.enable, self.alarm)
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Absolute time of the pending alarm in µs
    pub fn target_us(&self) -> u64 {
        self.target_us
    }

    fn nonzero(&self, phase_us: u32) -> u32 {
        if phase_us == 0 {
            self.period_us
        } else {
            phase_us
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brightness::PhaseTimes;
    use heapless::Vec;
    use proptest::prelude::*;

    #[derive(Default)]
    struct MockEnable {
        calls: Vec<bool, 64>,
    }

    impl EnableLine for MockEnable {
        fn set_enabled_isr(&mut self, enabled: bool) {
            let _ = self.calls.push(enabled);
        }
    }

    #[derive(Default)]
    struct MockAlarm {
        now: u64,
        armed: Option<u64>,
        acks: u32,
    }

    impl AlarmTimer for MockAlarm {
        fn now_us(&self) -> u64 {
            self.now
        }

        fn arm(&mut self, target_us: u64) {
            self.armed = Some(target_us);
        }

        fn disarm(&mut self) {
            self.armed = None;
        }

        fn acknowledge(&mut self) {
            self.acks += 1;
        }
    }

    fn timing(on_us: u32, off_us: u32) -> SharedTiming {
        SharedTiming::new(PhaseTimes { on_us, off_us })
    }

    #[test]
    fn test_start_enables_and_arms_on_time() {
        let timing = timing(2500, 2500);
        let alarm = MockAlarm { now: 1000, ..Default::default() };
        let mut pwm = PwmScheduler::new(MockEnable::default(), alarm, &timing, 5000);

        pwm.start();
        assert_eq!(pwm.phase(), Phase::On);
        assert_eq!(pwm.target_us(), 3500);

        let (enable, alarm) = pwm.stop();
        assert_eq!(enable.calls.as_slice(), &[true]);
        assert_eq!(alarm.armed, None);
    }

    #[test]
    fn test_phases_alternate() {
        let timing = timing(1000, 4000);
        let mut pwm = PwmScheduler::new(MockEnable::default(), MockAlarm::default(), &timing, 5000);
        pwm.start();

        let mut expected = Phase::On;
        for _ in 0..10 {
            assert_eq!(pwm.phase(), expected);
            pwm.on_alarm();
            expected = match expected {
                Phase::On => Phase::Off,
                Phase::Off => Phase::On,
            };
        }

        let (enable, alarm) = pwm.stop();
        assert_eq!(
            enable.calls.as_slice(),
            &[true, false, true, false, true, false, true, false, true, false, true]
        );
        assert_eq!(alarm.acks, 10);
    }

    #[test]
    fn test_schedules_from_previous_target_not_now() {
        let timing = timing(1000, 4000);
        let mut pwm = PwmScheduler::new(MockEnable::default(), MockAlarm::default(), &timing, 5000);
        pwm.start();
        assert_eq!(pwm.target_us(), 1000);

        // Late interrupt does not shift the next target
        pwm.alarm.now = 1700;
        pwm.on_alarm();
        assert_eq!(pwm.target_us(), 5000);
        assert_eq!(pwm.alarm.armed, Some(5000));
    }

    #[test]
    fn test_timing_change_applies_to_next_phase() {
        let timing = timing(2500, 2500);
        let mut pwm = PwmScheduler::new(MockEnable::default(), MockAlarm::default(), &timing, 5000);
        pwm.start();

        timing.publish(PhaseTimes { on_us: 4000, off_us: 1000 });
        pwm.on_alarm();
        assert_eq!(pwm.target_us(), 2500 + 1000);
        pwm.on_alarm();
        assert_eq!(pwm.target_us(), 3500 + 4000);
    }

    #[test]
    fn test_full_duty_never_toggles() {
        let timing = timing(5000, 0);
        let mut pwm = PwmScheduler::new(MockEnable::default(), MockAlarm::default(), &timing, 5000);
        pwm.start();

        for i in 1..=5u64 {
            pwm.on_alarm();
            assert_eq!(pwm.phase(), Phase::On);
            assert_eq!(pwm.target_us(), 5000 + i * 5000);
        }

        let (enable, _) = pwm.stop();
        assert_eq!(enable.calls.as_slice(), &[true]);
    }

    #[test]
    fn test_zero_duty_stays_off() {
        let timing = timing(0, 5000);
        let mut pwm = PwmScheduler::new(MockEnable::default(), MockAlarm::default(), &timing, 5000);
        pwm.start();
        assert_eq!(pwm.phase(), Phase::Off);
        assert_eq!(pwm.target_us(), 5000);

        pwm.on_alarm();
        pwm.on_alarm();
        assert_eq!(pwm.phase(), Phase::Off);
        assert_eq!(pwm.target_us(), 15000);

        let (enable, _) = pwm.stop();
        assert_eq!(enable.calls.as_slice(), &[false]);
    }

    #[test]
    fn test_recovers_from_zero_duty() {
        let timing = timing(0, 5000);
        let mut pwm = PwmScheduler::new(MockEnable::default(), MockAlarm::default(), &timing, 5000);
        pwm.start();

        timing.publish(PhaseTimes { on_us: 2500, off_us: 2500 });
        pwm.on_alarm();
        assert_eq!(pwm.phase(), Phase::On);
        assert_eq!(pwm.target_us(), 7500);
    }

    proptest! {
        #[test]
        fn prop_no_drift(
            on in 50u32..5000,
            off in 50u32..5000,
            latency in 0u64..40,
            cycles in 1u64..30,
        ) {
            let timing = timing(on, off);
            let mut pwm = PwmScheduler::new(
                MockEnable::default(),
                MockAlarm::default(),
                &timing,
                on + off,
            );
            pwm.start();

            for _ in 0..cycles * 2 {
                pwm.alarm.now = pwm.target_us() + latency;
                pwm.on_alarm();
            }

            // Back in ON, one full ON pulse past `cycles` periods
            prop_assert_eq!(pwm.phase(), Phase::On);
            prop_assert_eq!(pwm.target_us(), u64::from(on) + cycles * u64::from(on + off));
        }
    }
}
