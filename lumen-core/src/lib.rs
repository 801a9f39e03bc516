//! Board-agnostic core logic for the LED matrix firmware
//!
//! This crate contains all display logic that does not depend on specific
//! hardware implementations:
//!
//! - Hardware abstraction traits (enable line, alarm, light sensor)
//! - Column framebuffer, 5x7 font and text rendering
//! - Marquee scroll position
//! - Ambient light to duty mapping
//! - Brightness PWM timing and scheduler
//! - Configuration type definitions and TOML parsing

#![no_std]
#![deny(unsafe_code)]

pub mod brightness;
pub mod config;
pub mod font;
pub mod framebuffer;
pub mod pwm;
pub mod scroll;
pub mod text;
pub mod traits;
