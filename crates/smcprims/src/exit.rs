use std::fmt;

use smcprims_client::SmcError;
use smcprims_codec::CodecError;
use smcprims_transport::TransportError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const NOT_FOUND: i32 = 4;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

/// `kIOReturnNotPrivileged`: opening the SMC user client needs more rights.
const IO_RETURN_NOT_PRIVILEGED: i32 = 0xe000_02c1_u32 as i32;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open {
            code: IO_RETURN_NOT_PRIVILEGED,
            ..
        } => CliError::new(PERMISSION_DENIED, format!("{context}: {err}")),
        TransportError::Unsupported(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::InvalidKey(_) | CodecError::InvalidHex(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn smc_error(context: &str, err: SmcError) -> CliError {
    match err {
        SmcError::Transport(err) => transport_error(context, err),
        SmcError::Codec(err) => codec_error(context, err),
        SmcError::NotFound(_) => CliError::new(NOT_FOUND, format!("{context}: {err}")),
        SmcError::SizeMismatch { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        SmcError::ControllerStatus { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use smcprims_codec::Key;

    use super::*;

    #[test]
    fn not_privileged_maps_to_permission_denied() {
        let err = TransportError::Open {
            service: "AppleSMC".to_string(),
            code: IO_RETURN_NOT_PRIVILEGED,
        };
        assert_eq!(transport_error("open", err).code, PERMISSION_DENIED);
    }

    #[test]
    fn smc_errors_map_to_codes() {
        let key = Key::FAN_COUNT;
        assert_eq!(smc_error("read", SmcError::NotFound(key)).code, NOT_FOUND);
        assert_eq!(
            smc_error(
                "write",
                SmcError::SizeMismatch {
                    key,
                    expected: 1,
                    actual: 2
                }
            )
            .code,
            DATA_INVALID
        );
        assert_eq!(
            smc_error("read", SmcError::Codec(CodecError::InvalidKey("x".into()))).code,
            USAGE
        );
        assert_eq!(
            smc_error("read", SmcError::Transport(TransportError::Closed)).code,
            TRANSPORT_ERROR
        );
    }
}
