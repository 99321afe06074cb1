//! Read, write and enumerate Apple System Management Controller keys.
//!
//! smcprims talks to the SMC through its fixed-size key-data record
//! exchange and decodes the typed values behind each 4-byte key.
//!
//! # Crate Structure
//!
//! - [`transport`] — The struct-exchange boundary and the IOKit connection (macOS)
//! - [`codec`] — Keys, type tags, value decoding and the wire record
//! - [`client`] — Key protocol, key enumeration, fan report and simulator

/// Re-export transport types.
pub mod transport {
    pub use smcprims_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use smcprims_codec::*;
}

/// Re-export client types.
pub mod client {
    pub use smcprims_client::*;
}

pub use smcprims_client::{FanReport, SimulatedSmc, SmcClient, SmcError};
pub use smcprims_codec::{DataType, DecodedValue, Key, Value};
