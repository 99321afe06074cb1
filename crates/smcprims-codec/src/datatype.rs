//! Type tags and their numeric interpretation.
//!
//! The controller labels every value with a 4-character tag. Three families
//! carry a known interpretation:
//! - `ui8 `, `ui16`, `ui32`: unsigned big-endian integers
//! - `fpIF`: unsigned fixed point with `I` integer and `F` fraction bits
//! - `spIF`: signed fixed point, one sign bit followed by `I` and `F` bits
//!
//! `I` and `F` are single hex digits. Everything else is opaque bytes.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{CodecError, Result};
use crate::key::{pad_after_nul, KEY_LEN};

const UNSIGNED_PREFIX: &[u8; 2] = b"fp";
const SIGNED_PREFIX: &[u8; 2] = b"sp";

/// A 4-byte type tag as reported by a key-info query.
///
/// Tags coming off the wire are normalized so that a short NUL-terminated
/// tag (`ui8\0`) compares equal to its space-padded spelling (`ui8 `).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType([u8; KEY_LEN]);

impl DataType {
    pub const UINT8: DataType = DataType(*b"ui8 ");
    pub const UINT16: DataType = DataType(*b"ui16");
    pub const UINT32: DataType = DataType(*b"ui32");
    pub const FPE2: DataType = DataType(*b"fpe2");
    pub const SP78: DataType = DataType(*b"sp78");
    /// Placeholder tag for values whose type is not known yet.
    pub const UNTYPED: DataType = DataType(*b"    ");

    /// Build a tag from raw bytes, padding after the first NUL.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(pad_after_nul(bytes))
    }

    /// Build a tag from its transport form.
    pub fn from_u32(value: u32) -> Self {
        Self::from_bytes(value.to_be_bytes())
    }

    /// The transport form of this tag.
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The tag bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Interpret this tag. See [`decode_type_tag`].
    pub fn descriptor(&self) -> Result<TypeDescriptor> {
        decode_type_tag(&self.0)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataType({:?})", self.to_string())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The numeric interpretation of a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Unsigned integer; width comes from the value's declared size.
    Unsigned,
    /// Fixed-point number, bits left-aligned starting at byte 0.
    FixedPoint(FixedPoint),
    /// No known interpretation.
    Unknown,
}

/// Bit layout of a fixed-point tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    pub signed: bool,
    pub int_bits: u8,
    pub frac_bits: u8,
}

impl FixedPoint {
    pub fn sign_bits(&self) -> u32 {
        u32::from(self.signed)
    }

    /// Sign, integer and fraction bits together.
    pub fn total_bits(&self) -> u32 {
        self.sign_bits() + u32::from(self.int_bits) + u32::from(self.frac_bits)
    }
}

/// Parse a 4-byte type tag.
///
/// A fixed-point tag with a non-hex digit is an error rather than a zero.
pub fn decode_type_tag(tag: &[u8; KEY_LEN]) -> Result<TypeDescriptor> {
    let tag = pad_after_nul(*tag);
    let tag_type = DataType(tag);
    if tag_type == DataType::UINT8 || tag_type == DataType::UINT16 || tag_type == DataType::UINT32
    {
        return Ok(TypeDescriptor::Unsigned);
    }

    let prefix = &tag[..2];
    let signed = if prefix == SIGNED_PREFIX {
        true
    } else if prefix == UNSIGNED_PREFIX {
        false
    } else {
        return Ok(TypeDescriptor::Unknown);
    };

    let invalid = || CodecError::InvalidTypeTag(tag_type.to_string());
    let int_bits = hex_digit(tag[2]).ok_or_else(invalid)?;
    let frac_bits = hex_digit(tag[3]).ok_or_else(invalid)?;

    Ok(TypeDescriptor::FixedPoint(FixedPoint {
        signed,
        int_bits,
        frac_bits,
    }))
}

fn hex_digit(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).map(|d| d as u8)
}
