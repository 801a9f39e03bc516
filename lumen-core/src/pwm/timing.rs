//! ON/OFF times shared between task and interrupt context

use portable_atomic::{AtomicU32, Ordering};

use crate::brightness::PhaseTimes;

/// Lock-free ON/OFF pair
///
/// One writer (the brightness task) and one reader (the PWM interrupt).
/// The two halves are separate word-sized atomics with relaxed ordering, so
/// the reader may see a new ON time with an old OFF time for one cycle.
/// That affects a single PWM period of brightness and is tolerated; no lock
/// is ever taken on the interrupt path.
#[derive(Debug)]
pub struct SharedTiming {
    on_us: AtomicU32,
    off_us: AtomicU32,
}

impl SharedTiming {
    pub const fn new(initial: PhaseTimes) -> Self {
        Self {
            on_us: AtomicU32::new(initial.on_us),
            off_us: AtomicU32::new(initial.off_us),
        }
    }

    /// Replace both phase lengths
    pub fn publish(&self, times: PhaseTimes) {
        self.on_us.store(times.on_us, Ordering::Relaxed);
        self.off_us.store(times.off_us, Ordering::Relaxed);
    }

    /// Current ON time
    pub fn on_us(&self) -> u32 {
        self.on_us.load(Ordering::Relaxed)
    }

    /// Current OFF time
    pub fn off_us(&self) -> u32 {
        self.off_us.load(Ordering::Relaxed)
    }

    /// Snapshot of both halves (not atomic as a pair)
    pub fn load(&self) -> PhaseTimes {
        PhaseTimes {
            on_us: self.on_us(),
            off_us: self.off_us(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_load() {
        let timing = SharedTiming::new(PhaseTimes::half(5000));
        assert_eq!(timing.load(), PhaseTimes { on_us: 2500, off_us: 2500 });

        timing.publish(PhaseTimes { on_us: 4000, off_us: 1000 });
        assert_eq!(timing.on_us(), 4000);
        assert_eq!(timing.off_us(), 1000);
    }

    #[test]
    fn test_usable_as_static() {
        static TIMING: SharedTiming = SharedTiming::new(PhaseTimes { on_us: 1, off_us: 2 });
        TIMING.publish(PhaseTimes { on_us: 3, off_us: 4 });
        assert_eq!(TIMING.load().period_us(), 7);
    }
}
