//! Property tests for the key codec.

use proptest::prelude::*;
use smcprims_codec::{bytes_to_uint, int_to_key, key_to_int, Key};

proptest! {
    #[test]
    fn prop_int_key_int_is_identity(value in any::<u32>()) {
        prop_assert_eq!(key_to_int(&int_to_key(value)), value);
        prop_assert_eq!(Key::from_u32(value).to_u32(), value);
    }

    #[test]
    fn prop_key_int_key_is_identity(bytes in any::<[u8; 4]>()) {
        prop_assert_eq!(int_to_key(key_to_int(&bytes)), bytes);
        prop_assert_eq!(*Key::from_u32(Key::from_bytes(bytes).to_u32()).as_bytes(), bytes);
    }

    #[test]
    fn prop_bytes_to_uint_matches_be_bytes(bytes in any::<[u8; 4]>(), size in 1usize..=4) {
        let mut padded = [0u8; 4];
        padded[4 - size..].copy_from_slice(&bytes[..size]);
        prop_assert_eq!(bytes_to_uint(&bytes, size), u32::from_be_bytes(padded));
    }

    #[test]
    fn prop_printable_names_parse_and_display(name in "[ -~]{4}") {
        let key: Key = name.parse().unwrap();
        prop_assert_eq!(key.to_string(), name);
    }
}
