//! Hardware abstraction traits
//!
//! These traits define the interface between the display logic and the
//! board-specific drivers. The PWM scheduler only sees [`EnableLine`] and
//! [`AlarmTimer`]; the brightness task only sees [`LightSensor`].

pub mod alarm;
pub mod enable;
pub mod sensor;

pub use alarm::AlarmTimer;
pub use enable::EnableLine;
pub use sensor::{LightSensor, SensorError};
