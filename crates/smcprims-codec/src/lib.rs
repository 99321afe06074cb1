//! Key, type-tag and value codecs for Apple SMC key-data records.
//!
//! The controller exposes a flat namespace of 4-byte keys. Each key's value
//! is a blob of up to 32 bytes labelled with a 4-character type tag. This
//! crate translates between those wire forms and typed Rust values:
//! - [`Key`] and the big-endian key packing helpers
//! - [`DataType`] and [`decode_type_tag`] for the `ui*`/`fp*`/`sp*` families
//! - [`Value`] and its unsigned / fixed-point decoders
//! - [`KeyData`], the 80-byte record carried by the transport
//!
//! Nothing here performs I/O.

pub mod command;
pub mod datatype;
pub mod error;
pub mod hex;
pub mod key;
pub mod record;
pub mod value;

pub use command::{command_name, KERNEL_INDEX_SMC};
pub use datatype::{decode_type_tag, DataType, FixedPoint, TypeDescriptor};
pub use error::{CodecError, Result};
pub use hex::parse_hex_payload;
pub use key::{bytes_to_uint, int_to_key, key_to_int, Key, KEY_LEN};
pub use record::{KeyData, KeyInfoData, PLimitData, VersionData};
pub use value::{DecodedValue, Value, PAYLOAD_CAPACITY};
