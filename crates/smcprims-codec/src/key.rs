use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{CodecError, Result};

/// Length of a key name in bytes.
pub const KEY_LEN: usize = 4;

/// Accumulate `size` bytes big-endian into a `u32`, `bytes[0]` most significant.
///
/// Each byte is taken as unsigned. Bytes missing from a short slice count as
/// zero, and for `size > 4` only the low four bytes survive.
pub fn bytes_to_uint(bytes: &[u8], size: usize) -> u32 {
    (0..size).fold(0u32, |acc, i| {
        let byte = bytes.get(i).copied().unwrap_or(0);
        (acc << 8) | u32::from(byte)
    })
}

/// Pack a 4-byte key name into its 32-bit transport form.
pub fn key_to_int(bytes: &[u8]) -> u32 {
    bytes_to_uint(bytes, KEY_LEN)
}

/// Unpack a 32-bit transport key into its 4 raw bytes.
pub fn int_to_key(value: u32) -> [u8; KEY_LEN] {
    value.to_be_bytes()
}

/// Replace the first NUL and everything after it with ASCII spaces.
pub(crate) fn pad_after_nul(mut bytes: [u8; KEY_LEN]) -> [u8; KEY_LEN] {
    if let Some(nul) = bytes.iter().position(|&b| b == 0) {
        bytes[nul..].fill(b' ');
    }
    bytes
}

/// A 4-byte controller key such as `TC0P` or `#KEY`.
///
/// Holds the raw bytes exactly as they travel on the wire, so conversion to
/// and from `u32` is lossless. The text form pads a short (NUL-terminated)
/// name with spaces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Number of keys the controller exposes.
    pub const KEY_COUNT: Key = Key(*b"#KEY");
    /// Number of fans.
    pub const FAN_COUNT: Key = Key(*b"FNum");
    /// Forced-mode bitfield, one bit per fan.
    pub const FAN_FORCE_BITS: Key = Key(*b"FS! ");

    /// Build a key from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a key from its transport form.
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// The transport form of this key.
    pub fn to_u32(self) -> u32 {
        key_to_int(&self.0)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Key for a per-fan field, e.g. `fan(0, "Ac")` is `F0Ac`.
    pub fn fan(index: u32, field: &str) -> Result<Self> {
        format!("F{index}{field}").parse()
    }
}

impl FromStr for Key {
    type Err = CodecError;

    /// Parse 1-4 printable ASCII characters, padding short names with spaces.
    fn from_str(s: &str) -> Result<Self> {
        let raw = s.as_bytes();
        let printable = raw.iter().all(|b| (0x20..0x7f).contains(b));
        if raw.is_empty() || raw.len() > KEY_LEN || !printable {
            return Err(CodecError::InvalidKey(s.to_string()));
        }
        let mut bytes = [b' '; KEY_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl From<Key> for u32 {
    fn from(key: Key) -> Self {
        key.to_u32()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in pad_after_nul(self.0).iter() {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", self.to_string())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
