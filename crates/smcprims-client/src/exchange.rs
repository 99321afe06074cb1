use smcprims_codec::command::{READ_INDEX, RESULT_KEY_NOT_FOUND, RESULT_SUCCESS};
use smcprims_codec::{command_name, KeyData, KERNEL_INDEX_SMC};
use smcprims_transport::Transport;
use tracing::debug;

use crate::error::{Result, SmcError};

/// One request/response round trip with a two-layer status check.
///
/// The transport call can succeed structurally while the controller reports
/// its own failure in the response's `result` byte; both are surfaced.
pub struct Exchange<T> {
    transport: T,
    selector: u32,
}

impl<T: Transport> Exchange<T> {
    /// Wrap a transport using the standard SMC selector.
    pub fn new(transport: T) -> Self {
        Self::with_selector(transport, KERNEL_INDEX_SMC)
    }

    /// Wrap a transport using an explicit struct-method selector.
    pub fn with_selector(transport: T, selector: u32) -> Self {
        Self {
            transport,
            selector,
        }
    }

    /// Send `request` and return the controller's response.
    pub fn call(&mut self, request: &KeyData) -> Result<KeyData> {
        let raw = self
            .transport
            .call_struct(self.selector, &request.encode())?;
        let response = KeyData::decode(&raw);

        debug!(
            command = command_name(request.data8),
            key = %request.key(),
            result = response.result,
            "controller exchange"
        );

        match response.result {
            RESULT_SUCCESS => Ok(response),
            RESULT_KEY_NOT_FOUND if request.data8 != READ_INDEX => {
                Err(SmcError::NotFound(request.key()))
            }
            code => Err(SmcError::ControllerStatus {
                command: request.data8,
                code,
            }),
        }
    }

    /// The struct-method selector in use.
    pub fn selector(&self) -> u32 {
        self.selector
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the exchange and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
