use ::chrono::DateTime;
use ::chrono::FixedOffset;
use ::std::fmt::Debug;
use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::fmt::debug_bytes;
use crate::fmt::latin1;
use crate::object::error::ObjectResult;
use crate::object::Serialize;
use crate::process::encoding::decode_text;
use crate::process::encoding::utf16_encode;
use crate::process::escape::unescape_hexadecimal;
use crate::Byte;

/// REFERENCE: [7.3.4.3 Hexadecimal strings, p27]
/// The payload holds the hexadecimal digits as written.
#[derive(Clone, PartialEq, Eq)]
pub struct Hexadecimal {
    value: Vec<Byte>,
}

impl Display for Hexadecimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "<{}>", latin1(&self.value))
    }
}

impl Debug for Hexadecimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "<{}>", debug_bytes(&self.value))
    }
}

impl Serialize for Hexadecimal {
    fn size_in_bytes(&self) -> usize {
        self.value.len() + 2
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        buffer.push(b'<');
        buffer.extend_from_slice(&self.value);
        buffer.push(b'>');
        self.value.len() + 2
    }
}

mod convert {
    use super::*;

    impl Hexadecimal {
        pub fn of(value: impl Into<Vec<Byte>>) -> Self {
            Self {
                value: value.into(),
            }
        }

        /// Encode `text` as UTF-16BE with a byte order mark, four digits per
        /// code unit.
        pub fn from_text(text: &str) -> Self {
            let value = utf16_encode(text)
                .into_iter()
                .map(|unit| format!("{:04X}", unit))
                .collect::<String>();
            Self::of(value)
        }

        pub fn value(&self) -> &[Byte] {
            &self.value
        }
    }
}

mod process {
    use super::*;

    impl Hexadecimal {
        pub fn as_bytes(&self) -> Vec<Byte> {
            unescape_hexadecimal(&self.value)
        }

        pub fn decode_text(&self) -> String {
            decode_text(&self.as_bytes())
        }

        pub fn decode_date(&self) -> ObjectResult<DateTime<FixedOffset>> {
            super::super::decode_date(&self.as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexadecimal_serialize() {
        let hex = Hexadecimal::of("901FA3");
        assert_eq!(hex.size_in_bytes(), 8);
        assert_eq!(hex.to_bytes(), b"<901FA3>");
    }

    #[test]
    fn hexadecimal_decode_text() {
        assert_eq!(Hexadecimal::of("48656C6C6F").decode_text(), "Hello");
        assert_eq!(Hexadecimal::of("FEFF00480069").decode_text(), "Hi");
    }

    #[test]
    fn hexadecimal_from_text() {
        let hex = Hexadecimal::from_text("Hi\u{1F600}");
        assert_eq!(hex.value(), b"FEFF00480069D83DDE00");
        assert_eq!(hex.decode_text(), "Hi\u{1F600}");
    }

    #[test]
    fn hexadecimal_decode_date() {
        let hex = Hexadecimal::of("443A32303030");
        assert_eq!(
            hex.decode_date().map(|date| date.to_rfc3339()),
            Ok("2000-01-01T00:00:00+00:00".to_string())
        );
    }
}
