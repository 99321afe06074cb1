use serde::Serialize;
use smcprims_codec::{
    CodecError, DataType, Key, KeyData, Value, KERNEL_INDEX_SMC, PAYLOAD_CAPACITY,
};
use smcprims_transport::Transport;
use tracing::{debug, info};

use crate::error::{Result, SmcError};
use crate::exchange::Exchange;

/// Configuration for an [`SmcClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Struct-method selector used for every exchange.
    pub selector: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            selector: KERNEL_INDEX_SMC,
        }
    }
}

/// Declared size and type of a key, as reported by a key-info query.
///
/// Produced fresh on every read; the controller may change it between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub size: u8,
    pub data_type: DataType,
}

/// Reads and writes controller keys over an owned transport.
///
/// The client is the single owner of the channel for its lifetime; operations
/// take `&mut self` so only one exchange is ever in flight.
pub struct SmcClient<T> {
    exchange: Exchange<T>,
}

impl<T: Transport> SmcClient<T> {
    /// Create a client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            exchange: Exchange::with_selector(transport, config.selector),
        }
    }

    /// Query the declared size and type tag of `key`.
    ///
    /// A declared size above the payload capacity is rejected with
    /// `BufferOverflow`.
    pub fn read_key_info(&mut self, key: Key) -> Result<KeyInfo> {
        let response = self.exchange.call(&KeyData::read_key_info(key))?;
        let size = response.key_info.data_size as usize;
        if size > PAYLOAD_CAPACITY {
            return Err(CodecError::BufferOverflow {
                size,
                max: PAYLOAD_CAPACITY,
            }
            .into());
        }
        Ok(KeyInfo {
            size: size as u8,
            data_type: DataType::from_u32(response.key_info.data_type),
        })
    }

    /// Read the current value of `key`: a key-info query, then a bytes query.
    pub fn read_key(&mut self, key: Key) -> Result<Value> {
        let info = self.read_key_info(key)?;
        let response = self
            .exchange
            .call(&KeyData::read_bytes(key, u32::from(info.size)))?;
        let data = &response.bytes[..usize::from(info.size)];
        let value = Value::new(key, info.data_type, data)?;
        debug!(%key, data_type = %info.data_type, size = info.size, "read key");
        Ok(value)
    }

    /// Overwrite a key.
    ///
    /// The key is read first; if its current size differs from the payload
    /// size the write fails with `SizeMismatch` and nothing is written.
    pub fn write_key(&mut self, value: &Value) -> Result<()> {
        let key = value.key();
        let current = self.read_key(key)?;
        if current.size() != value.size() {
            return Err(SmcError::SizeMismatch {
                key,
                expected: current.size(),
                actual: value.size(),
            });
        }

        self.exchange.call(&KeyData::write_bytes(value))?;
        info!(%key, size = value.size(), "wrote key");
        Ok(())
    }

    /// Read the key stored at position `index` of the controller's key table.
    pub fn read_index(&mut self, index: u32) -> Result<Key> {
        let response = self.exchange.call(&KeyData::read_index(index))?;
        Ok(response.key())
    }

    /// Number of keys the controller exposes, read from `#KEY`.
    ///
    /// A snapshot: keys added or removed afterwards are not reflected.
    pub fn key_count(&mut self) -> Result<u32> {
        let value = self.read_key(Key::KEY_COUNT)?;
        Ok(value.decode_unsigned()?)
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        self.exchange.get_ref()
    }

    /// Mutably borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        self.exchange.get_mut()
    }

    /// Consume the client and return the transport, e.g. to close it.
    pub fn into_inner(self) -> T {
        self.exchange.into_inner()
    }
}

impl<T: Transport> std::fmt::Debug for SmcClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmcClient")
            .field("transport", &self.exchange.get_ref().transport_name())
            .field("selector", &self.exchange.selector())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use smcprims_codec::command::{READ_BYTES, READ_KEYINFO, WRITE_BYTES};
    use smcprims_codec::DecodedValue;

    use super::*;
    use crate::sim::SimulatedSmc;

    fn key(name: &str) -> Key {
        name.parse().unwrap()
    }

    fn client() -> SmcClient<SimulatedSmc> {
        let sim = SimulatedSmc::new()
            .with_key(key("F0Tg"), DataType::FPE2, &[0x12, 0xc0])
            .with_key(key("BNum"), DataType::UINT8, &[0x01]);
        SmcClient::new(sim)
    }

    #[test]
    fn read_is_info_then_bytes() {
        let mut client = client();
        let value = client.read_key(key("F0Tg")).unwrap();

        assert_eq!(value.data_type(), DataType::FPE2);
        assert_eq!(value.bytes(), &[0x12, 0xc0]);
        assert_eq!(value.decode().unwrap(), DecodedValue::FixedPoint(1200.0));

        let commands: Vec<u8> = client
            .transport()
            .exchanges()
            .iter()
            .map(|e| e.command)
            .collect();
        assert_eq!(commands, vec![READ_KEYINFO, READ_BYTES]);
    }

    #[test]
    fn missing_key_is_not_found() {
        let mut client = client();
        let err = client.read_key(key("NOPE")).unwrap_err();
        assert!(matches!(err, SmcError::NotFound(k) if k == key("NOPE")));
        // The bytes query is never attempted.
        assert_eq!(client.transport().count_command(READ_BYTES), 0);
    }

    #[test]
    fn oversized_declared_size_is_rejected() {
        let sim = SimulatedSmc::new()
            .with_key(key("BIG!"), DataType::UNTYPED, &[0u8; 4])
            .declare_size(key("BIG!"), 40);
        let mut client = SmcClient::new(sim);

        let err = client.read_key(key("BIG!")).unwrap_err();
        assert!(matches!(
            err,
            SmcError::Codec(CodecError::BufferOverflow { size: 40, max: 32 })
        ));
        assert_eq!(client.transport().count_command(READ_BYTES), 0);
    }

    #[test]
    fn write_with_matching_size() {
        let mut client = client();
        let value = Value::raw(key("F0Tg"), &[0x1f, 0x40]).unwrap();
        client.write_key(&value).unwrap();

        assert_eq!(client.transport().count_command(WRITE_BYTES), 1);
        let reread = client.read_key(key("F0Tg")).unwrap();
        assert_eq!(reread.bytes(), &[0x1f, 0x40]);
        assert_eq!(reread.data_type(), DataType::FPE2);
    }

    #[test]
    fn write_size_mismatch_performs_no_write() {
        let mut client = client();
        let value = Value::raw(key("F0Tg"), &[0x01]).unwrap();
        let err = client.write_key(&value).unwrap_err();

        assert!(matches!(
            err,
            SmcError::SizeMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        assert_eq!(client.transport().count_command(WRITE_BYTES), 0);
    }

    #[test]
    fn write_to_missing_key_performs_no_write() {
        let mut client = client();
        let value = Value::raw(key("GONE"), &[0x01]).unwrap();
        assert!(matches!(
            client.write_key(&value),
            Err(SmcError::NotFound(_))
        ));
        assert_eq!(client.transport().count_command(WRITE_BYTES), 0);
    }

    #[test]
    fn key_count_reads_hash_key() {
        let mut client = client();
        assert_eq!(client.key_count().unwrap(), 2);
    }

    #[test]
    fn custom_selector_is_used() {
        let config = ClientConfig { selector: 5 };
        let mut client = SmcClient::with_config(SimulatedSmc::new(), &config);
        assert!(matches!(
            client.key_count(),
            Err(SmcError::Transport(_))
        ));
    }
}
