use crate::Byte;

pub(crate) fn ascii_to_u64(bytes: &[Byte]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut number = Some(0u64);
    for &byte in bytes {
        if let b'0'..=b'9' = byte {
            let digit = byte - b'0';
            number = number
                .and_then(|number| number.checked_mul(10))
                .and_then(|number| number.checked_add(u64::from(digit)));
        } else {
            return None;
        }
    }
    number
}

/// Interpret big-endian bytes as an unsigned integer, as used by the fields of
/// cross-reference stream entries.
pub(crate) fn bytes_to_u64(bytes: &[Byte]) -> Option<u64> {
    let mut number = Some(0u64);
    for &byte in bytes {
        number = number
            .and_then(|number| number.checked_mul(256))
            .and_then(|number| number.checked_add(u64::from(byte)));
    }
    number
}

/// The number of bytes needed to store `value` big-endian, never less than one.
pub(crate) fn byte_width(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()).max(1) as usize;
    (bits + 7) / 8
}

pub(crate) fn hex_val(byte: Byte) -> Option<Byte> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Format a number the way it is written into a PDF file: integers without a
/// fractional part and no exponent notation in any case.
pub(crate) fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        // Also covers negative zero
        return "0".to_string();
    }
    // `Display` for `f64` prints the shortest representation that round-trips
    // and never switches to exponent notation.
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_to_u64_valid() {
        assert_eq!(ascii_to_u64(b"0"), Some(0));
        assert_eq!(ascii_to_u64(b"0000000017"), Some(17));
        assert_eq!(ascii_to_u64(b"18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn ascii_to_u64_invalid() {
        assert_eq!(ascii_to_u64(b""), None);
        assert_eq!(ascii_to_u64(b"-1"), None);
        assert_eq!(ascii_to_u64(b"18446744073709551616"), None);
    }

    #[test]
    fn bytes_to_u64_valid() {
        assert_eq!(bytes_to_u64(&[]), Some(0));
        assert_eq!(bytes_to_u64(&[0x01, 0x00]), Some(256));
        assert_eq!(bytes_to_u64(&[0x00, 0x12, 0x34]), Some(0x1234));
    }

    #[test]
    fn byte_width_valid() {
        assert_eq!(byte_width(0), 1);
        assert_eq!(byte_width(255), 1);
        assert_eq!(byte_width(256), 2);
        assert_eq!(byte_width(65_535), 2);
        assert_eq!(byte_width(65_536), 3);
    }

    #[test]
    fn number_to_string_valid() {
        assert_eq!(number_to_string(0.0), "0");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(612.0), "612");
        assert_eq!(number_to_string(-1.5), "-1.5");
        assert_eq!(number_to_string(0.000_000_1), "0.0000001");
        assert_eq!(number_to_string(1e21), "1000000000000000000000");
    }
}
