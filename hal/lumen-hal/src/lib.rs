//! Lumen Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the display drivers
//! are written against. Chip-specific crates (RP2040, ...) implement them
//! so the same driver code runs on any board and on the host in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lumen-drivers (MAX7219, photoresistor) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  lumen-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Contents
//!
//! - [`gpio::OutputPin`] - Digital output, usable from interrupt context
//! - [`spi::SpiConfig`] - Serial clock timing for the chain bus
//! - [`adc::AdcReader`] - One-shot analog sampling

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AdcReader};
pub use gpio::OutputPin;
pub use spi::SpiConfig;
