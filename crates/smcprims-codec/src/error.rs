/// Errors that can occur while encoding or decoding controller data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A key name is empty, longer than 4 bytes, or not printable ASCII.
    #[error("invalid key {0:?} (expected 1-4 printable ASCII characters)")]
    InvalidKey(String),

    /// A fixed-point type tag carries a non-hex bit-count digit.
    #[error("invalid type tag {0:?}")]
    InvalidTypeTag(String),

    /// A fixed-point layout does not fit the value's bytes.
    #[error("malformed fixed-point value: {bits} bits declared, {size} bytes available")]
    MalformedFixedPoint { bits: u32, size: usize },

    /// A declared data size exceeds the fixed payload capacity.
    #[error("data size {size} exceeds payload capacity {max}")]
    BufferOverflow { size: usize, max: usize },

    /// An unsigned value was declared with a width outside 1..=4 bytes.
    #[error("unsigned value width {0} outside 1..=4 bytes")]
    UnsignedWidth(usize),

    /// A hex payload string is not an even-length run of hex digits.
    #[error("invalid hex payload: {0}")]
    InvalidHex(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
