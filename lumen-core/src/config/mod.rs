//! Configuration types
//!
//! Board-agnostic configuration structures, parsed from the TOML document
//! embedded in the firmware image.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
