use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use self::error::A85ErrorCode;
use super::Filter;
use crate::parse::character_set::is_white_space;
use crate::process::filter::error::FilterResult;
use crate::Byte;

/// ASCII base-85 filter.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct A85;

impl Filter for A85 {
    /// REFERENCE: [7.4.3 ASCII85Decode filter, p37-39]
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
        let mut decoded = Vec::with_capacity(bytes.len() * 4 / 5 + 1);
        let mut group = Group::default();
        let mut tilde = false;
        for &byte in bytes.iter() {
            if is_white_space(byte) {
                continue;
            }
            if tilde {
                if byte == b'>' {
                    break;
                }
                return Err(A85ErrorCode::CorruptEod(char::from(byte)).into());
            }
            match byte {
                b'~' => tilde = true,
                b'z' if group.len == 0 => decoded.extend_from_slice(&[0; 4]),
                b'z' => return Err(A85ErrorCode::ZInMiddle(group).into()),
                b'!'..=b'u' => {
                    if group.push(byte) {
                        decoded.extend_from_slice(&group.value()?.to_be_bytes());
                        group = Group::default();
                    }
                }
                _ => return Err(A85ErrorCode::InvalidBase85Digit(char::from(byte)).into()),
            }
        }
        match group.len {
            0 => {}
            1 => return Err(A85ErrorCode::FinalPartialGroup(group).into()),
            len => {
                // Pad with the highest digit and keep `len - 1` bytes
                let mut padded = group;
                while !padded.push(b'u') {}
                decoded.extend_from_slice(&padded.value()?.to_be_bytes()[..len - 1]);
            }
        }
        Ok(decoded)
    }
}

/// Up to five base-85 digits.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Group {
    digits: [Byte; 5],
    len: usize,
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for &byte in self.digits.iter().take(self.len) {
            write!(f, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl Group {
    /// Add a digit and report whether the group is complete.
    fn push(&mut self, digit: Byte) -> bool {
        self.digits[self.len] = digit;
        self.len += 1;
        self.len == self.digits.len()
    }

    fn value(&self) -> Result<u32, A85ErrorCode> {
        self.digits.iter().try_fold(0u32, |value, &digit| {
            value
                .checked_mul(85)
                .and_then(|value| value.checked_add(u32::from(digit - b'!')))
                .ok_or(A85ErrorCode::ValueTooLarge(*self))
        })
    }
}

pub(crate) mod error {
    use ::thiserror::Error;

    use super::Group;

    #[derive(Debug, Error, PartialEq, Clone, Copy)]
    pub enum A85ErrorCode {
        #[error("Invalid ASCII base-85 digit: {0}")]
        InvalidBase85Digit(char),
        #[error("Value is greater than 2^32 - 1. {0}")]
        ValueTooLarge(Group),
        #[error("A z character occurs in the middle of a group: {0}")]
        ZInMiddle(Group),
        #[error("A final partial group contains only one character: {0}")]
        FinalPartialGroup(Group),
        #[error("Corrupt EOD marker. Expected '>' after '~'. Found: {0}")]
        CorruptEod(char),
    }
}
