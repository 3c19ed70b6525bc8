use self::error::RLErrorCode;
use super::Filter;
use crate::process::filter::error::FilterResult;
use crate::Byte;

const EOD: Byte = 128;

/// REFERENCE: [7.4.5 RunLengthDecode filter, p42]
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct RL;

impl Filter for RL {
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
        let mut decoded = Vec::with_capacity(bytes.len() * 2);
        let mut idx = 0;
        while let Some(&length) = bytes.get(idx) {
            idx += 1;
            match length {
                EOD => break,
                // Copy the next `length + 1` bytes literally
                0..=127 => {
                    let end = idx + usize::from(length) + 1;
                    let run = bytes
                        .get(idx..end)
                        .ok_or(RLErrorCode::Truncated(idx - 1))?;
                    decoded.extend_from_slice(run);
                    idx = end;
                }
                // Repeat the next byte `257 - length` times
                _ => {
                    let &byte = bytes.get(idx).ok_or(RLErrorCode::Truncated(idx - 1))?;
                    let count = 257 - usize::from(length);
                    decoded.resize(decoded.len() + count, byte);
                    idx += 1;
                }
            }
        }
        Ok(decoded)
    }
}

pub(crate) mod error {
    use ::thiserror::Error;

    #[derive(Debug, Error, PartialEq, Clone, Copy)]
    pub enum RLErrorCode {
        #[error("Truncated run starting at byte {0}")]
        Truncated(usize),
    }
}
