//! Light sensor implementations

pub mod photoresistor;

pub use photoresistor::Photoresistor;
