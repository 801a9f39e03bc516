//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lumen-core for the display hardware:
//!
//! - MAX7219 chain (register map, wire encoder, transports, driver)
//! - Photoresistor light sensor

#![no_std]
#![deny(unsafe_code)]

pub mod max7219;
pub mod sensor;
