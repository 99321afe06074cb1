use serde::Serialize;

use crate::datatype::{DataType, FixedPoint, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::key::{bytes_to_uint, Key};

/// Capacity of the payload area of a key-data record.
pub const PAYLOAD_CAPACITY: usize = 32;

/// A key's value: its type tag and up to 32 bytes of data.
///
/// Only the first `size` bytes are meaningful; the rest of the buffer is zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Value {
    key: Key,
    data_type: DataType,
    size: u8,
    bytes: [u8; PAYLOAD_CAPACITY],
}

impl Value {
    /// Build a value from its meaningful bytes.
    ///
    /// Fails with `BufferOverflow` if `data` does not fit the payload area.
    pub fn new(key: Key, data_type: DataType, data: &[u8]) -> Result<Self> {
        if data.len() > PAYLOAD_CAPACITY {
            return Err(CodecError::BufferOverflow {
                size: data.len(),
                max: PAYLOAD_CAPACITY,
            });
        }
        let mut bytes = [0u8; PAYLOAD_CAPACITY];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            key,
            data_type,
            size: data.len() as u8,
            bytes,
        })
    }

    /// Build an untyped value, as used for writes.
    pub fn raw(key: Key, data: &[u8]) -> Result<Self> {
        Self::new(key, DataType::UNTYPED, data)
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Number of meaningful bytes.
    pub fn size(&self) -> usize {
        usize::from(self.size)
    }

    /// The meaningful bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.size()]
    }

    /// The full zero-padded payload area.
    pub fn payload(&self) -> &[u8; PAYLOAD_CAPACITY] {
        &self.bytes
    }

    /// Decode as an unsigned big-endian integer of `size` bytes.
    pub fn decode_unsigned(&self) -> Result<u32> {
        if !(1..=4).contains(&self.size()) {
            return Err(CodecError::UnsignedWidth(self.size()));
        }
        Ok(bytes_to_uint(&self.bytes, self.size()))
    }

    /// Decode with an explicit fixed-point layout.
    ///
    /// The layout must cover a whole number of bytes, no more than `size`.
    pub fn decode_fixed_point(&self, layout: &FixedPoint) -> Result<f64> {
        let bits = layout.total_bits();
        let len = (bits / 8) as usize;
        if bits == 0 || bits % 8 != 0 || len > self.size() {
            return Err(CodecError::MalformedFixedPoint {
                bits,
                size: self.size(),
            });
        }

        let mut negative = false;
        let mut acc = 0f64;
        for (i, &byte) in self.bytes[..len].iter().enumerate() {
            let mut byte = byte;
            if i == 0 && layout.signed {
                negative = byte & 0x80 != 0;
                byte &= 0x7f;
            }
            acc = acc * 256.0 + f64::from(byte);
        }

        let magnitude = acc / 2f64.powi(i32::from(layout.frac_bits));
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Decode according to the value's own type tag.
    ///
    /// An empty value decodes as empty raw bytes whatever its tag.
    pub fn decode(&self) -> Result<DecodedValue> {
        if self.size == 0 {
            return Ok(DecodedValue::Raw(Vec::new()));
        }
        match self.data_type.descriptor()? {
            TypeDescriptor::Unsigned => self.decode_unsigned().map(DecodedValue::Unsigned),
            TypeDescriptor::FixedPoint(layout) => self
                .decode_fixed_point(&layout)
                .map(DecodedValue::FixedPoint),
            TypeDescriptor::Unknown => Ok(DecodedValue::Raw(self.bytes().to_vec())),
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("key", &self.key)
            .field("data_type", &self.data_type)
            .field("size", &self.size)
            .field("bytes", &self.bytes())
            .finish()
    }
}

/// A value interpreted according to its type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DecodedValue {
    Unsigned(u32),
    FixedPoint(f64),
    Raw(Vec<u8>),
}

impl std::fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodedValue::Unsigned(v) => write!(f, "{v}"),
            DecodedValue::FixedPoint(v) => write!(f, "{v}"),
            DecodedValue::Raw(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
                write!(f, "{}", hex.join(" "))
            }
        }
    }
}
