use bytes::{Buf, BufMut, BytesMut};
use smcprims_transport::{RawRecord, KEY_DATA_SIZE};

use crate::command::{READ_BYTES, READ_INDEX, READ_KEYINFO, WRITE_BYTES};
use crate::key::Key;
use crate::value::{Value, PAYLOAD_CAPACITY};

/// Firmware version block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionData {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub reserved: u8,
    pub release: u16,
}

/// Power-limit block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PLimitData {
    pub version: u16,
    pub length: u16,
    pub cpu_limit: u32,
    pub gpu_limit: u32,
    pub mem_limit: u32,
}

/// Key-info block: declared size and type tag of a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInfoData {
    pub data_size: u32,
    pub data_type: u32,
    pub data_attributes: u8,
}

/// The key-data record exchanged with the controller.
///
/// Wire layout (80 bytes, little-endian, C alignment):
/// ```text
/// off  field
///   0  key            u32
///   4  vers           major u8, minor u8, build u8, reserved u8, release u16
///  12  pLimitData     version u16, length u16, cpu u32, gpu u32, mem u32
///  28  keyInfo        dataSize u32, dataType u32, dataAttributes u8 (+3 pad)
///  40  result u8, status u8, data8 u8 (+1 pad)
///  44  data32         u32
///  48  bytes          [u8; 32]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyData {
    pub key: u32,
    pub vers: VersionData,
    pub p_limit: PLimitData,
    pub key_info: KeyInfoData,
    pub result: u8,
    pub status: u8,
    pub data8: u8,
    pub data32: u32,
    pub bytes: [u8; PAYLOAD_CAPACITY],
}

impl KeyData {
    /// Request for the size and type tag of `key`.
    pub fn read_key_info(key: Key) -> Self {
        Self {
            key: key.to_u32(),
            data8: READ_KEYINFO,
            ..Self::default()
        }
    }

    /// Request for `size` bytes of `key`.
    pub fn read_bytes(key: Key, size: u32) -> Self {
        Self {
            key: key.to_u32(),
            data8: READ_BYTES,
            key_info: KeyInfoData {
                data_size: size,
                ..KeyInfoData::default()
            },
            ..Self::default()
        }
    }

    /// Request to overwrite `value.key()` with the value's bytes.
    pub fn write_bytes(value: &Value) -> Self {
        Self {
            key: value.key().to_u32(),
            data8: WRITE_BYTES,
            key_info: KeyInfoData {
                data_size: value.size() as u32,
                ..KeyInfoData::default()
            },
            bytes: *value.payload(),
            ..Self::default()
        }
    }

    /// Request for the key stored at `index`.
    pub fn read_index(index: u32) -> Self {
        Self {
            data8: READ_INDEX,
            data32: index,
            ..Self::default()
        }
    }

    /// The key this record refers to.
    pub fn key(&self) -> Key {
        Key::from_u32(self.key)
    }

    /// Serialize into the fixed wire record.
    pub fn encode(&self) -> RawRecord {
        let mut dst = BytesMut::with_capacity(KEY_DATA_SIZE);
        dst.put_u32_le(self.key);

        dst.put_u8(self.vers.major);
        dst.put_u8(self.vers.minor);
        dst.put_u8(self.vers.build);
        dst.put_u8(self.vers.reserved);
        dst.put_u16_le(self.vers.release);
        dst.put_bytes(0, 2);

        dst.put_u16_le(self.p_limit.version);
        dst.put_u16_le(self.p_limit.length);
        dst.put_u32_le(self.p_limit.cpu_limit);
        dst.put_u32_le(self.p_limit.gpu_limit);
        dst.put_u32_le(self.p_limit.mem_limit);

        dst.put_u32_le(self.key_info.data_size);
        dst.put_u32_le(self.key_info.data_type);
        dst.put_u8(self.key_info.data_attributes);
        dst.put_bytes(0, 3);

        dst.put_u8(self.result);
        dst.put_u8(self.status);
        dst.put_u8(self.data8);
        dst.put_bytes(0, 1);
        dst.put_u32_le(self.data32);
        dst.put_slice(&self.bytes);

        let mut out = [0u8; KEY_DATA_SIZE];
        out.copy_from_slice(&dst);
        out
    }

    /// Parse a wire record.
    pub fn decode(raw: &RawRecord) -> Self {
        let mut src = &raw[..];
        let key = src.get_u32_le();

        let vers = VersionData {
            major: src.get_u8(),
            minor: src.get_u8(),
            build: src.get_u8(),
            reserved: src.get_u8(),
            release: src.get_u16_le(),
        };
        src.advance(2);

        let p_limit = PLimitData {
            version: src.get_u16_le(),
            length: src.get_u16_le(),
            cpu_limit: src.get_u32_le(),
            gpu_limit: src.get_u32_le(),
            mem_limit: src.get_u32_le(),
        };

        let key_info = KeyInfoData {
            data_size: src.get_u32_le(),
            data_type: src.get_u32_le(),
            data_attributes: src.get_u8(),
        };
        src.advance(3);

        let result = src.get_u8();
        let status = src.get_u8();
        let data8 = src.get_u8();
        src.advance(1);
        let data32 = src.get_u32_le();

        let mut bytes = [0u8; PAYLOAD_CAPACITY];
        src.copy_to_slice(&mut bytes);

        Self {
            key,
            vers,
            p_limit,
            key_info,
            result,
            status,
            data8,
            data32,
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;

    #[test]
    fn field_offsets() {
        let record = KeyData {
            key: 0x1122_3344,
            key_info: KeyInfoData {
                data_size: 2,
                data_type: DataType::FPE2.to_u32(),
                data_attributes: 0xd4,
            },
            result: 0x84,
            status: 0x01,
            data8: READ_BYTES,
            data32: 7,
            ..KeyData::default()
        };
        let raw = record.encode();

        assert_eq!(&raw[0..4], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&raw[28..32], &[2, 0, 0, 0]);
        assert_eq!(u32::from_le_bytes(raw[32..36].try_into().unwrap()), 0x6670_6532);
        assert_eq!(raw[36], 0xd4);
        assert_eq!(raw[40], 0x84);
        assert_eq!(raw[41], 0x01);
        assert_eq!(raw[42], READ_BYTES);
        assert_eq!(&raw[44..48], &[7, 0, 0, 0]);
    }

    #[test]
    fn payload_lands_at_offset_48() {
        let key: Key = "F0Tg".parse().unwrap();
        let value = Value::raw(key, &[0xab, 0xcd]).unwrap();
        let raw = KeyData::write_bytes(&value).encode();

        assert_eq!(raw.len(), KEY_DATA_SIZE);
        assert_eq!(&raw[48..50], &[0xab, 0xcd]);
        assert!(raw[50..].iter().all(|&b| b == 0));
        assert_eq!(raw[42], WRITE_BYTES);
        assert_eq!(&raw[28..32], &[2, 0, 0, 0]);
    }

    #[test]
    fn decode_reads_what_encode_wrote() {
        let mut record = KeyData::read_index(41);
        record.vers.release = 0x0f01;
        record.p_limit.gpu_limit = 99;
        record.bytes[31] = 0x5a;

        assert_eq!(KeyData::decode(&record.encode()), record);
    }

    #[test]
    fn request_builders_set_command() {
        let key = Key::KEY_COUNT;
        assert_eq!(KeyData::read_key_info(key).data8, READ_KEYINFO);
        assert_eq!(KeyData::read_key_info(key).key(), key);

        let bytes = KeyData::read_bytes(key, 4);
        assert_eq!(bytes.data8, READ_BYTES);
        assert_eq!(bytes.key_info.data_size, 4);

        let index = KeyData::read_index(3);
        assert_eq!(index.data8, READ_INDEX);
        assert_eq!(index.data32, 3);
        assert_eq!(index.key, 0);
    }
}
