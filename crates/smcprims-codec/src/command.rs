//! Command and result codes carried in a key-data record.

/// Struct-method selector for every key exchange.
pub const KERNEL_INDEX_SMC: u32 = 2;

/// Read the bytes of a key.
pub const READ_BYTES: u8 = 5;
/// Write the bytes of a key.
pub const WRITE_BYTES: u8 = 6;
/// Read the key stored at an index.
pub const READ_INDEX: u8 = 8;
/// Read the size and type tag of a key.
pub const READ_KEYINFO: u8 = 9;
/// Read power-limit data.
pub const READ_PLIMIT: u8 = 11;
/// Read the controller firmware version.
pub const READ_VERS: u8 = 12;

/// Controller result: success.
pub const RESULT_SUCCESS: u8 = 0;
/// Controller result: generic failure.
pub const RESULT_ERROR: u8 = 1;
/// Controller result: the key has no entry.
pub const RESULT_KEY_NOT_FOUND: u8 = 0x84;

/// Returns a human-readable name for a command code.
pub fn command_name(command: u8) -> &'static str {
    match command {
        READ_BYTES => "READ_BYTES",
        WRITE_BYTES => "WRITE_BYTES",
        READ_INDEX => "READ_INDEX",
        READ_KEYINFO => "READ_KEYINFO",
        READ_PLIMIT => "READ_PLIMIT",
        READ_VERS => "READ_VERS",
        _ => "UNKNOWN",
    }
}
