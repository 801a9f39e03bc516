//! MAX7219 LED matrix chain
//!
//! Each MAX7219 drives one 8x8 matrix. The chips are daisy-chained on a
//! shared data/clock/select bus and addressed with one transaction of
//! N × 16 bits.
//!
//! # Usage
//!
//! ```ignore
//! let mut display = Max7219::new(bus, 4, ChainOrder::Forward);
//! display.init()?;
//! display.framebuffer_mut().draw_string(1, "09:17");
//! display.refresh()?;
//! ```

pub mod driver;
pub mod encoder;
pub mod registers;
pub mod transport;

pub use driver::{DriverError, Max7219, ShutdownLine, MAX_ATTEMPTS};
pub use encoder::{ChainEncoder, Transaction};
pub use registers::Register;
pub use transport::{BitBang, BufferedTransport, RawTransport};
