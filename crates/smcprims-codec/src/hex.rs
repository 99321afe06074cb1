use crate::error::{CodecError, Result};
use crate::value::PAYLOAD_CAPACITY;

/// Parse a write payload given as hex digits, two per byte (`"0a1f"`).
///
/// Rejects odd length, non-hex characters and payloads over 32 bytes.
pub fn parse_hex_payload(input: &str) -> Result<Vec<u8>> {
    let digits = input.trim();
    if digits.is_empty() {
        return Err(CodecError::InvalidHex("empty payload".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(CodecError::InvalidHex(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }
    if digits.len() / 2 > PAYLOAD_CAPACITY {
        return Err(CodecError::BufferOverflow {
            size: digits.len() / 2,
            max: PAYLOAD_CAPACITY,
        });
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = char::from(pair[0]).to_digit(16);
            let lo = char::from(pair[1]).to_digit(16);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as u8),
                _ => Err(CodecError::InvalidHex(format!(
                    "not a hex byte: {:?}",
                    String::from_utf8_lossy(pair)
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        assert_eq!(parse_hex_payload("0a1F").unwrap(), vec![0x0a, 0x1f]);
        assert_eq!(parse_hex_payload(" 00 ").unwrap(), vec![0x00]);
    }

    #[test]
    fn rejects_odd_length() {
        assert!(matches!(
            parse_hex_payload("abc"),
            Err(CodecError::InvalidHex(_))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(parse_hex_payload("zz").is_err());
        assert!(parse_hex_payload("0x10").is_err());
        assert!(parse_hex_payload("").is_err());
    }

    #[test]
    fn rejects_oversized() {
        let long = "00".repeat(33);
        assert!(matches!(
            parse_hex_payload(&long),
            Err(CodecError::BufferOverflow { size: 33, .. })
        ));
        assert_eq!(parse_hex_payload(&"ff".repeat(32)).unwrap().len(), 32);
    }
}
