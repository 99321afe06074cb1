/// Errors that can occur while talking to the controller's transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No service with the given name is registered.
    #[error("no {0} service found")]
    ServiceNotFound(String),

    /// Opening the user client failed.
    #[error("failed to open {service}: kern_return {code:#010x}")]
    Open { service: String, code: i32 },

    /// Closing the user client failed.
    #[error("failed to close {service}: kern_return {code:#010x}")]
    Close { service: String, code: i32 },

    /// The struct-exchange call itself failed.
    #[error("struct call on selector {selector} failed: kern_return {code:#010x}")]
    Call { selector: u32, code: i32 },

    /// The output structure came back smaller than the record size.
    #[error("short response ({actual} bytes, expected {expected})")]
    ShortResponse { expected: usize, actual: usize },

    /// The connection has already been closed.
    #[error("transport closed")]
    Closed,

    /// No controller transport is available on this platform.
    #[error("controller transport not supported on {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, TransportError>;
