use crate::parse::character_set::is_white_space;
use crate::parse::num::hex_val;
use crate::Byte;

/// Interpret the escape sequences of a literal string payload.
/// REFERENCE: [7.3.4.2 Literal strings, p25-27]
/// - `\n`, `\r`, `\t`, `\b` and `\f` stand for their control characters.
/// - `\(`, `\)` and `\\` stand for the escaped character.
/// - `\ddd` stands for the byte with octal value `ddd`, one to three digits.
/// - A backslash before an end-of-line marker joins the two lines.
/// - A backslash before any other byte is ignored.
pub(crate) fn unescape_literal(value: &[Byte]) -> Vec<Byte> {
    let mut bytes = Vec::with_capacity(value.len());
    let mut iter = value.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let Some(escaped) = iter.next() else {
            break;
        };
        match escaped {
            b'n' => bytes.push(b'\n'),
            b'r' => bytes.push(b'\r'),
            b't' => bytes.push(b'\t'),
            b'b' => bytes.push(b'\x08'),
            b'f' => bytes.push(b'\x0C'),
            b'\r' => {
                iter.next_if_eq(&b'\n');
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut octal = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match iter.next_if(|byte| matches!(byte, b'0'..=b'7')) {
                        Some(digit) => octal = octal * 8 + u32::from(digit - b'0'),
                        None => break,
                    }
                }
                // High-order overflow is ignored
                bytes.push(octal as Byte);
            }
            other => bytes.push(other),
        }
    }
    bytes
}

/// Interpret a hexadecimal string payload as pairs of digits. White space is
/// ignored, a missing final digit is taken as zero and any other byte counts
/// as the digit zero.
/// REFERENCE: [7.3.4.3 Hexadecimal strings, p27]
pub(crate) fn unescape_hexadecimal(value: &[Byte]) -> Vec<Byte> {
    let digits: Vec<Byte> = value
        .iter()
        .copied()
        .filter(|&byte| !is_white_space(byte))
        .map(|byte| hex_val(byte).unwrap_or(0))
        .collect();
    digits
        .chunks(2)
        .map(|pair| pair[0] << 4 | pair.get(1).copied().unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_literal_valid() {
        assert_eq!(unescape_literal(b"plain text"), b"plain text");
        assert_eq!(
            unescape_literal(b"\\n\\r\\t\\b\\f\\(\\)\\\\"),
            b"\n\r\t\x08\x0C()\\"
        );
        assert_eq!(unescape_literal(b"\\053\\53\\0053"), b"++\x053");
        assert_eq!(unescape_literal(b"split \\\r\nline"), b"split line");
        assert_eq!(unescape_literal(b"split \\\nline"), b"split line");
        // Unknown escapes drop the backslash
        assert_eq!(unescape_literal(b"\\q"), b"q");
        // A trailing backslash is dropped
        assert_eq!(unescape_literal(b"end\\"), b"end");
    }

    #[test]
    fn unescape_hexadecimal_valid() {
        assert_eq!(unescape_hexadecimal(b"48656C6C6F"), b"Hello");
        assert_eq!(unescape_hexadecimal(b"48 65\n6c 6c 6f"), b"Hello");
        // An odd number of digits is padded with zero
        assert_eq!(unescape_hexadecimal(b"901FA"), [0x90, 0x1F, 0xA0]);
        assert_eq!(unescape_hexadecimal(b"ZZ"), [0x00]);
    }
}
