//! Fixed-size struct exchange with the Apple System Management Controller.
//!
//! The controller is reached through a single blocking primitive that sends
//! one key-data record and receives one key-data record back. This crate
//! owns that boundary:
//! - [`Transport`] is the seam every higher layer talks through
//! - [`IoKitConnection`] implements it over the `AppleSMC` IOKit user client (macOS)
//!
//! Record contents are opaque here; `smcprims-codec` gives them meaning.

pub mod error;
pub mod traits;

#[cfg(target_os = "macos")]
pub mod iokit;

pub use error::{Result, TransportError};
pub use traits::{RawRecord, Transport, KEY_DATA_SIZE};

#[cfg(target_os = "macos")]
pub use iokit::{ConnectionConfig, IoKitConnection};
