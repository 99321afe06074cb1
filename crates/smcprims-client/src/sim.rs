//! In-memory controller for tests, demos and machines without an SMC.
//!
//! Speaks the same key-data records and result codes as the real
//! controller, and records every exchange it serves.

use std::collections::HashSet;

use smcprims_codec::command::{
    READ_BYTES, READ_INDEX, READ_KEYINFO, RESULT_ERROR, RESULT_KEY_NOT_FOUND, WRITE_BYTES,
};
use smcprims_codec::{DataType, Key, KeyData, KERNEL_INDEX_SMC, PAYLOAD_CAPACITY};
use smcprims_transport::{RawRecord, Transport, TransportError};

/// `kIOReturnUnsupported`, returned for any selector other than the SMC one.
const IO_RETURN_UNSUPPORTED: i32 = 0xe000_02c7_u32 as i32;

/// One exchange served by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRecord {
    pub command: u8,
    pub key: Key,
    pub index: u32,
}

#[derive(Debug, Clone)]
struct Entry {
    key: Key,
    data_type: DataType,
    declared_size: u32,
    bytes: [u8; PAYLOAD_CAPACITY],
}

/// A simulated controller with an ordered key table.
///
/// `#KEY` is answered virtually with the number of indexed keys unless
/// overridden, and is not itself part of the index.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSmc {
    entries: Vec<Entry>,
    key_count: Option<u32>,
    failing_indices: HashSet<u32>,
    failing_keys: HashSet<Key>,
    offline: bool,
    log: Vec<ExchangeRecord>,
}

impl SimulatedSmc {
    /// An empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// A two-fan machine with a handful of sensors.
    pub fn demo() -> Self {
        let k = |name: &[u8; 4]| Key::from_bytes(*name);
        Self::new()
            .with_key(k(b"FNum"), DataType::UINT8, &[0x02])
            .with_key(k(b"F0Ac"), DataType::FPE2, &[0x1f, 0x38])
            .with_key(k(b"F0Mn"), DataType::FPE2, &[0x12, 0xc0])
            .with_key(k(b"F0Mx"), DataType::FPE2, &[0x60, 0x30])
            .with_key(k(b"F0Sf"), DataType::FPE2, &[0x00, 0x00])
            .with_key(k(b"F0Tg"), DataType::FPE2, &[0x12, 0xc0])
            .with_key(k(b"F1Ac"), DataType::FPE2, &[0x21, 0xc0])
            .with_key(k(b"F1Mn"), DataType::FPE2, &[0x14, 0x50])
            .with_key(k(b"F1Mx"), DataType::FPE2, &[0x59, 0x10])
            .with_key(k(b"F1Sf"), DataType::FPE2, &[0x00, 0x00])
            .with_key(k(b"F1Tg"), DataType::FPE2, &[0x21, 0xc0])
            .with_key(k(b"FS! "), DataType::UINT16, &[0x00, 0x02])
            .with_key(k(b"BNum"), DataType::UINT8, &[0x01])
            .with_key(k(b"TB0T"), DataType::SP78, &[0x1e, 0x40])
            .with_key(k(b"TC0P"), DataType::SP78, &[0x2f, 0x80])
            .with_key(k(b"LSOF"), DataType::from_bytes(*b"flag"), &[0x00])
            .with_key(k(b"RPlt"), DataType::from_bytes(*b"ch8*"), b"j314\0\0\0\0")
    }

    /// Add a key at the end of the index, or replace an existing key's value.
    ///
    /// Data longer than the payload area is truncated to it.
    pub fn with_key(mut self, key: Key, data_type: DataType, data: &[u8]) -> Self {
        self.set_key(key, data_type, data);
        self
    }

    /// Same as [`SimulatedSmc::with_key`] on an existing simulator.
    pub fn set_key(&mut self, key: Key, data_type: DataType, data: &[u8]) {
        let len = data.len().min(PAYLOAD_CAPACITY);
        let mut bytes = [0u8; PAYLOAD_CAPACITY];
        bytes[..len].copy_from_slice(&data[..len]);
        let entry = Entry {
            key,
            data_type,
            declared_size: len as u32,
            bytes,
        };
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Report `size` as the key's data size regardless of its bytes.
    pub fn declare_size(mut self, key: Key, size: u32) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.declared_size = size;
        }
        self
    }

    /// Answer `#KEY` with `count` instead of the real number of keys.
    pub fn override_key_count(mut self, count: u32) -> Self {
        self.key_count = Some(count);
        self
    }

    /// Fail every index lookup for `index` with a controller error.
    pub fn fail_index(mut self, index: u32) -> Self {
        self.failing_indices.insert(index);
        self
    }

    /// Fail every request addressed to `key` with a controller error.
    pub fn fail_key(mut self, key: Key) -> Self {
        self.failing_keys.insert(key);
        self
    }

    /// Make every exchange fail at the transport level.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Every exchange served so far, oldest first.
    pub fn exchanges(&self) -> &[ExchangeRecord] {
        &self.log
    }

    /// Number of exchanges served with the given command code.
    pub fn count_command(&self, command: u8) -> usize {
        self.log.iter().filter(|e| e.command == command).count()
    }

    /// Current bytes of `key`, if it exists.
    pub fn bytes_of(&self, key: Key) -> Option<&[u8]> {
        self.entries.iter().find(|e| e.key == key).map(|e| {
            let len = (e.declared_size as usize).min(PAYLOAD_CAPACITY);
            &e.bytes[..len]
        })
    }

    fn lookup(&self, key: Key) -> Option<Entry> {
        if key == Key::KEY_COUNT {
            let count = self.key_count.unwrap_or(self.entries.len() as u32);
            let mut bytes = [0u8; PAYLOAD_CAPACITY];
            bytes[..4].copy_from_slice(&count.to_be_bytes());
            return Some(Entry {
                key,
                data_type: DataType::UINT32,
                declared_size: 4,
                bytes,
            });
        }
        self.entries.iter().find(|e| e.key == key).cloned()
    }

    fn serve(&mut self, request: &KeyData) -> KeyData {
        let mut response = KeyData {
            key: request.key,
            data8: request.data8,
            ..KeyData::default()
        };

        let key = request.key();
        if request.data8 != READ_INDEX && self.failing_keys.contains(&key) {
            response.result = RESULT_ERROR;
            return response;
        }

        match request.data8 {
            READ_KEYINFO => match self.lookup(key) {
                Some(entry) => {
                    response.key_info.data_size = entry.declared_size;
                    response.key_info.data_type = entry.data_type.to_u32();
                }
                None => response.result = RESULT_KEY_NOT_FOUND,
            },
            READ_BYTES => match self.lookup(key) {
                Some(entry) => response.bytes = entry.bytes,
                None => response.result = RESULT_KEY_NOT_FOUND,
            },
            WRITE_BYTES => {
                let size = request.key_info.data_size;
                match self.entries.iter_mut().find(|e| e.key == key) {
                    Some(entry) if entry.declared_size == size => {
                        entry.bytes = request.bytes;
                    }
                    Some(_) => response.result = RESULT_ERROR,
                    None => response.result = RESULT_KEY_NOT_FOUND,
                }
            }
            READ_INDEX => {
                let index = request.data32;
                match self.entries.get(index as usize) {
                    Some(entry) if !self.failing_indices.contains(&index) => {
                        response.key = entry.key.to_u32();
                    }
                    _ => response.result = RESULT_ERROR,
                }
            }
            _ => response.result = RESULT_ERROR,
        }
        response
    }
}

impl Transport for SimulatedSmc {
    fn call_struct(
        &mut self,
        selector: u32,
        input: &RawRecord,
    ) -> smcprims_transport::Result<RawRecord> {
        if self.offline {
            return Err(TransportError::Closed);
        }
        if selector != KERNEL_INDEX_SMC {
            return Err(TransportError::Call {
                selector,
                code: IO_RETURN_UNSUPPORTED,
            });
        }

        let request = KeyData::decode(input);
        self.log.push(ExchangeRecord {
            command: request.data8,
            key: request.key(),
            index: request.data32,
        });
        Ok(self.serve(&request).encode())
    }

    fn transport_name(&self) -> &'static str {
        "sim"
    }
}
