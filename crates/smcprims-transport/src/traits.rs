use crate::error::Result;

/// Size in bytes of the controller's key-data record.
///
/// Every exchange sends exactly one record and receives exactly one record
/// of this size.
pub const KEY_DATA_SIZE: usize = 80;

/// A raw key-data record as it crosses the transport.
pub type RawRecord = [u8; KEY_DATA_SIZE];

/// A channel to the controller that exchanges one fixed-size record for another.
///
/// Implementations are single-owner: the channel is an ordered, stateful
/// conduit and exactly one exchange may be in flight at a time. Callers that
/// need shared access must serialize it themselves.
pub trait Transport {
    /// Exchange one request record for one response record (blocking).
    fn call_struct(&mut self, selector: u32, input: &RawRecord) -> Result<RawRecord>;

    /// Short name for diagnostics.
    fn transport_name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn call_struct(&mut self, selector: u32, input: &RawRecord) -> Result<RawRecord> {
        (**self).call_struct(selector, input)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call_struct(&mut self, selector: u32, input: &RawRecord) -> Result<RawRecord> {
        (**self).call_struct(selector, input)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}
