//! Key read/write protocol, enumeration and fan reporting for Apple SMC.
//!
//! This is the layer callers use. An [`SmcClient`] owns a transport and
//! turns the controller's record exchanges into typed operations:
//! - `read_key` / `write_key` with the read-before-write size check
//! - `keys` for a lazy walk of the whole key index
//! - `fan_report` for per-fan speeds and modes
//!
//! [`SimulatedSmc`] stands in for the hardware in tests and demos.

pub mod client;
pub mod enumerate;
pub mod error;
pub mod exchange;
pub mod fans;
pub mod sim;

pub use client::{ClientConfig, KeyInfo, SmcClient};
pub use enumerate::KeyIter;
pub use error::{Result, SmcError};
pub use exchange::Exchange;
pub use fans::{FanMode, FanReading, FanReport};
pub use sim::{ExchangeRecord, SimulatedSmc};
