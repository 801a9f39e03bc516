//! Brightness PWM
//!
//! The display's SHUTDOWN register is toggled from an alarm interrupt to
//! modulate perceived brightness. A task publishes ON/OFF times into
//! [`SharedTiming`]; the interrupt handler owns a [`PwmScheduler`] that reads
//! them once per phase.
//!
//! ```text
//!  brightness task             alarm interrupt
//!  ───────────────             ───────────────
//!  sample sensor               PwmScheduler::on_alarm
//!  sample_to_duty                ├─ load SharedTiming
//!  duty_to_timing                ├─ EnableLine::set_enabled_isr
//!  SharedTiming::publish ──────► └─ AlarmTimer::arm(target + phase)
//! ```

pub mod scheduler;
pub mod timing;

pub use scheduler::{Phase, PwmScheduler};
pub use timing::SharedTiming;
