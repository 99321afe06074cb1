use std::ffi::CString;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{RawRecord, Transport, KEY_DATA_SIZE};

#[allow(non_camel_case_types)]
type kern_return_t = libc::c_int;
#[allow(non_camel_case_types)]
type mach_port_t = libc::c_uint;
#[allow(non_camel_case_types)]
type io_object_t = mach_port_t;

const KERN_SUCCESS: kern_return_t = 0;
const MACH_PORT_NULL: mach_port_t = 0;

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOServiceMatching(name: *const libc::c_char) -> *mut libc::c_void;
    fn IOServiceGetMatchingServices(
        main_port: mach_port_t,
        matching: *mut libc::c_void,
        existing: *mut io_object_t,
    ) -> kern_return_t;
    fn IOIteratorNext(iterator: io_object_t) -> io_object_t;
    fn IOObjectRelease(object: io_object_t) -> kern_return_t;
    fn IOServiceOpen(
        service: io_object_t,
        owning_task: mach_port_t,
        connect_type: u32,
        connect: *mut io_object_t,
    ) -> kern_return_t;
    fn IOServiceClose(connect: io_object_t) -> kern_return_t;
    fn IOConnectCallStructMethod(
        connection: mach_port_t,
        selector: u32,
        input: *const libc::c_void,
        input_cnt: libc::size_t,
        output: *mut libc::c_void,
        output_cnt: *mut libc::size_t,
    ) -> kern_return_t;
}

extern "C" {
    static mach_task_self_: mach_port_t;
}

/// Configuration for opening an IOKit connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// IOKit service class to match. Default: `AppleSMC`.
    pub service_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            service_name: "AppleSMC".to_string(),
        }
    }
}

/// An open user-client connection to the SMC service.
///
/// Released exactly once, either by [`IoKitConnection::close`] or on drop.
pub struct IoKitConnection {
    conn: io_object_t,
    service_name: String,
    open: bool,
}

impl IoKitConnection {
    /// Open a connection to the default `AppleSMC` service.
    pub fn open() -> Result<Self> {
        Self::open_with_config(&ConnectionConfig::default())
    }

    /// Open a connection with explicit configuration.
    pub fn open_with_config(config: &ConnectionConfig) -> Result<Self> {
        let name = CString::new(config.service_name.as_str())
            .map_err(|_| TransportError::ServiceNotFound(config.service_name.clone()))?;

        let mut iterator: io_object_t = 0;
        // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
        // IOServiceGetMatchingServices consumes the matching dictionary reference.
        let rc = unsafe {
            let matching = IOServiceMatching(name.as_ptr());
            IOServiceGetMatchingServices(MACH_PORT_NULL, matching, &mut iterator)
        };
        if rc != KERN_SUCCESS {
            return Err(TransportError::ServiceNotFound(config.service_name.clone()));
        }

        // SAFETY: `iterator` was returned by a successful IOServiceGetMatchingServices.
        let device = unsafe {
            let device = IOIteratorNext(iterator);
            IOObjectRelease(iterator);
            device
        };
        if device == 0 {
            return Err(TransportError::ServiceNotFound(config.service_name.clone()));
        }

        let mut conn: io_object_t = 0;
        // SAFETY: `device` is a live service object; `conn` is a valid out pointer.
        let rc = unsafe {
            let rc = IOServiceOpen(device, mach_task_self_, 0, &mut conn);
            IOObjectRelease(device);
            rc
        };
        if rc != KERN_SUCCESS {
            return Err(TransportError::Open {
                service: config.service_name.clone(),
                code: rc,
            });
        }

        info!(service = %config.service_name, "opened controller connection");

        Ok(Self {
            conn,
            service_name: config.service_name.clone(),
            open: true,
        })
    }

    /// Release the connection.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        self.open = false;
        // SAFETY: `conn` was opened by IOServiceOpen and has not been closed yet.
        let rc = unsafe { IOServiceClose(self.conn) };
        debug!(service = %self.service_name, rc, "closed controller connection");
        if rc != KERN_SUCCESS {
            return Err(TransportError::Close {
                service: self.service_name.clone(),
                code: rc,
            });
        }
        Ok(())
    }
}

impl Transport for IoKitConnection {
    fn call_struct(&mut self, selector: u32, input: &RawRecord) -> Result<RawRecord> {
        if !self.open {
            return Err(TransportError::Closed);
        }

        let mut output = [0u8; KEY_DATA_SIZE];
        let mut output_len: libc::size_t = KEY_DATA_SIZE;
        // SAFETY: both buffers are KEY_DATA_SIZE bytes and outlive the call;
        // `output_len` tells the kernel how much it may write.
        let rc = unsafe {
            IOConnectCallStructMethod(
                self.conn,
                selector,
                input.as_ptr().cast::<libc::c_void>(),
                KEY_DATA_SIZE,
                output.as_mut_ptr().cast::<libc::c_void>(),
                &mut output_len,
            )
        };
        if rc != KERN_SUCCESS {
            return Err(TransportError::Call { selector, code: rc });
        }
        if output_len < KEY_DATA_SIZE {
            return Err(TransportError::ShortResponse {
                expected: KEY_DATA_SIZE,
                actual: output_len,
            });
        }
        Ok(output)
    }

    fn transport_name(&self) -> &'static str {
        "iokit"
    }
}

impl Drop for IoKitConnection {
    fn drop(&mut self) {
        if self.open {
            let _ = self.release();
        }
    }
}

impl std::fmt::Debug for IoKitConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoKitConnection")
            .field("service", &self.service_name)
            .field("open", &self.open)
            .finish()
    }
}
