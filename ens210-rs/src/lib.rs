#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # ENS210 - Driver for the ams ENS210 Relative Humidity and Temperature Sensor
//!
//! This crate provides a driver for the ENS210 sensor on top of the `embedded-hal`
//! I2C and delay traits. It performs single shot measurements, validates the
//! CRC and valid flag of every reading, and converts raw data to Kelvin,
//! Celsius, Fahrenheit and %RH in caller-chosen fixed-point scale.
//!
//! ```ignore
//! let mut ens = Ens210Builder::default().build(&mut i2c, &mut delay)?;
//! let m = ens.measure(&mut i2c, &mut delay);
//! if let Some(t) = m.temperature.ok() {
//!     let centi_celsius = ens.to_celsius(t, 100);
//! }
//! ```
mod crc;
mod device;
mod error;
mod register;
mod status;

pub mod convert;

pub use convert::{DEFAULT_SOLDER_CORRECTION, MAX_MULTIPLIER};
pub use crc::crc7;
pub use device::{CONVERSION_TIME, ENS210_ADDRESS, Ens210, Ens210Builder};
pub use error::Error;
pub use register::{ENS210_PART_ID, Identity, Measurement, RawValue, Reading};
pub use status::{Status, UNKNOWN_STATUS, status_str};
