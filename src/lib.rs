#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod asynchronous;
mod code;
pub mod convert;
mod driver;
mod error;
pub mod fault;
mod profile;
mod reading;
mod register;

pub use asynchronous::Max318xxAsync;
pub use code::{AdcCode, CodeLayout};
pub use convert::{Conversion, RtdCurve};
pub use driver::Max318xx;
pub use error::{ConfigError, DecodeError, Error, MathError};
pub use fault::{FaultEntry, FaultTable, Faults, classify};
pub use profile::{
    ChannelProfile, ChipSelect, Config, DEFAULT_REFERENCE_OHMS, DeviceProfile, SensorType,
};
pub use reading::{ChannelReading, RegisterFrame, TemperatureReading, decode, decode_frame};
pub use register::{RtdRegister, TcRegister};
