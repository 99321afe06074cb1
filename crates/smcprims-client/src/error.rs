use smcprims_codec::{command_name, DataType, Key};

/// Errors that can occur in controller key operations.
#[derive(Debug, thiserror::Error)]
pub enum SmcError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] smcprims_transport::TransportError),

    /// Encoding or decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] smcprims_codec::CodecError),

    /// The exchange completed but the controller reported a failure.
    #[error("controller returned status {code:#04x} for {}", command_name(*command))]
    ControllerStatus { command: u8, code: u8 },

    /// The key has no entry on the controller.
    #[error("key {0} not found")]
    NotFound(Key),

    /// A write payload does not match the key's current declared size.
    #[error("size mismatch for key {key}: key holds {expected} bytes, payload has {actual}")]
    SizeMismatch {
        key: Key,
        expected: usize,
        actual: usize,
    },

    /// The key's type tag cannot be decoded the way the caller asked.
    #[error("key {key} has type {data_type}, not a fixed-point type")]
    UnexpectedType { key: Key, data_type: DataType },
}

pub type Result<T> = std::result::Result<T, SmcError>;
