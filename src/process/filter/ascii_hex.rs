use self::error::AHxErrorCode;
use super::Filter;
use crate::parse::character_set::is_white_space;
use crate::parse::num::hex_val;
use crate::process::filter::error::FilterResult;
use crate::Byte;

/// ASCII hexadecimal filter.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct AHx;

impl Filter for AHx {
    /// REFERENCE: [7.4.2 ASCIIHexDecode filter, p37]
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
        let mut decoded = Vec::with_capacity(bytes.len() / 2 + 1);
        let mut high = None;
        for &byte in bytes.iter() {
            if is_white_space(byte) {
                continue;
            }
            if byte == b'>' {
                break;
            }
            let digit = hex_val(byte).ok_or(AHxErrorCode::InvalidHexDigit(char::from(byte)))?;
            match high.take() {
                Some(high) => decoded.push(high << 4 | digit),
                None => high = Some(digit),
            }
        }
        // An odd final digit is followed by an implicit zero
        if let Some(high) = high {
            decoded.push(high << 4);
        }
        Ok(decoded)
    }
}

pub(crate) mod error {
    use ::thiserror::Error;

    #[derive(Debug, Error, PartialEq, Clone, Copy)]
    pub enum AHxErrorCode {
        #[error("Invalid ASCII hexadecimal digit: {0}")]
        InvalidHexDigit(char),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err_eq;

    #[test]
    fn ascii_hex_valid() {
        let encoded = b"412048657861646563696D616C20537472696E67";
        assert_eq!(AHx.decode(encoded), Ok(b"A Hexadecimal String".to_vec()));
        assert_eq!(AHx.decode(b"41 20 48"), Ok(b"\x41\x20\x48".to_vec()));
        assert_eq!(AHx.decode(b"41 20 4"), Ok(b"\x41\x20\x40".to_vec()));
        // Anything after the EOD marker is ignored
        assert_eq!(AHx.decode(b"6a6B> 1"), Ok(b"jk".to_vec()));
    }

    #[test]
    fn ascii_hex_invalid() {
        let result = AHx.decode(b"41204X");
        assert_err_eq!(result, AHxErrorCode::InvalidHexDigit('X'));
    }
}
