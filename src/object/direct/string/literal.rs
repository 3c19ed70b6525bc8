use ::chrono::DateTime;
use ::chrono::FixedOffset;
use ::chrono::Utc;
use ::std::fmt::Debug;
use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::fmt::debug_bytes;
use crate::fmt::latin1;
use crate::object::error::ObjectResult;
use crate::object::Serialize;
use crate::process::encoding::decode_text;
use crate::process::escape::unescape_literal;
use crate::Byte;

/// REFERENCE: [7.3.4.2 Literal strings, p25-27]
/// The payload is kept as written, without the enclosing parentheses and with
/// its escape sequences. Newlines and balanced parentheses are written as
/// they are.
#[derive(Clone, PartialEq, Eq)]
pub struct Literal {
    value: Vec<Byte>,
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({})", latin1(&self.value))
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({})", debug_bytes(&self.value))
    }
}

impl Serialize for Literal {
    fn size_in_bytes(&self) -> usize {
        self.value.len() + 2
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        buffer.push(b'(');
        buffer.extend_from_slice(&self.value);
        buffer.push(b')');
        self.value.len() + 2
    }
}

mod convert {
    use super::*;

    impl Literal {
        pub fn of(value: impl Into<Vec<Byte>>) -> Self {
            Self {
                value: value.into(),
            }
        }

        /// `D:YYYYMMDDHHmmSSZ` in UTC.
        pub fn from_date(date: DateTime<Utc>) -> Self {
            Self::of(date.format("D:%Y%m%d%H%M%SZ").to_string())
        }

        /// The payload as written, escape sequences included.
        pub fn value(&self) -> &[Byte] {
            &self.value
        }
    }
}

mod process {
    use super::*;

    impl Literal {
        pub fn as_bytes(&self) -> Vec<Byte> {
            unescape_literal(&self.value)
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
    use ::chrono::TimeZone;

    use super::*;
    use crate::object::error::ObjectErr;

    #[test]
    fn literal_serialize() {
        let literal = Literal::of("Hello (World)\\n");
        assert_eq!(literal.size_in_bytes(), 17);
        assert_eq!(literal.to_bytes(), b"(Hello (World)\\n)");
        assert_eq!(literal.to_string(), "(Hello (World)\\n)");
    }

    #[test]
    fn literal_decode_text() {
        assert_eq!(Literal::of("a\\(b\\)c\\\\").decode_text(), "a(b)c\\");
        let utf16 = Literal::of(b"\xFE\xFF\x00\\101".as_slice());
        assert_eq!(utf16.decode_text(), "A");
    }

    #[test]
    fn literal_from_date() {
        let date = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        let literal = Literal::from_date(date);
        assert_eq!(literal.value(), b"D:20230405060708Z");
        assert_eq!(literal.decode_date(), Ok(date.fixed_offset()));
    }

    #[test]
    fn literal_decode_date_invalid() {
        assert_eq!(
            Literal::of("yesterday").decode_date(),
            Err(ObjectErr::InvalidDate("yesterday".to_string()))
        );
    }
}
