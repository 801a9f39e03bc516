//! Embassy async tasks
//!
//! Each task runs independently. The brightness task talks to the PWM
//! interrupt only through `PWM_TIMING`; the content task owns the display.

pub mod brightness;
pub mod content;

pub use brightness::brightness_task;
pub use content::content_task;
