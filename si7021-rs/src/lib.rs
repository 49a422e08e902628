#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//!# SI7021 - Driver for the Silicon Labs SI7021 Humidity and Temperature Sensor
//! This crate provides a driver for the SI7021 sensor, allowing you to read humidity and
//! temperature data, the electronic serial number, and to control the on-chip heater.
//!
//! Response reads are retried while the sensor NACKs, up to a configurable number of
//! attempts, after which [`Error::Timeout`] is returned instead of blocking forever.
mod command;
mod driver;
mod error;
mod register;

pub use command::{Command, SI7021_ADDRESS};
pub use driver::{Si7021, Si7021Builder};
pub use error::Error;
pub use register::{
    DeviceKind, Environment, Humidity, SerialNumber, Temperature, UserRegister,
    celsius_to_fahrenheit_hundredths,
};
