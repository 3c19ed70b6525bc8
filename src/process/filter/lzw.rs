use self::error::LzwErrorCode;
use super::Filter;
use crate::context::Context;
use crate::object::direct::dictionary::Dictionary;
use crate::object::error::ObjectErr;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::process::filter::error::FilterErr;
use crate::process::filter::error::FilterErrorCode;
use crate::process::filter::error::FilterResult;
use crate::Byte;
use crate::DECODED_LIMIT;

const KEY_EARLY_CHANGE: &str = "EarlyChange";
const MIN_CODE_SIZE: usize = 9;
const MAX_CODE_SIZE: usize = 12;
const CLEAR_CODE: u16 = 256;
const EOD_CODE: u16 = 257;
const FIRST_CODE: usize = 258;
const MAX_TABLE_LEN: usize = 1 << MAX_CODE_SIZE;

/// REFERENCE: [7.4.4 LZWDecode and FlateDecode filters, p38] and [[Adobe TIFF
/// Revision 6.0; Final (TIFF)] 7.4.4.2 "Details of LZW encoding"]
/// The LZW (Lempel-Ziv-Welch) adaptive compression filter.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub(crate) struct Lzw {
    early_change: EarlyChange,
}

/// REFERENCE: [Table 8 — Optional parameters for LZWDecode and FlateDecode
/// filters, p40]
/// With an early change, the code size grows one code before the table fills
/// the current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EarlyChange(bool);

impl Default for EarlyChange {
    fn default() -> Self {
        Self(true)
    }
}

impl Filter for Lzw {
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
        let mut reader = BitReader::new(bytes);
        let mut table = initial_table();
        let mut code_size = MIN_CODE_SIZE;
        let mut prev: Option<Vec<Byte>> = None;
        let mut decoded = Vec::with_capacity(bytes.len() * 2);

        while let Some(code) = reader.read(code_size) {
            match code {
                CLEAR_CODE => {
                    table.truncate(FIRST_CODE);
                    code_size = MIN_CODE_SIZE;
                    prev = None;
                    continue;
                }
                EOD_CODE => break,
                _ => {}
            }
            let idx = usize::from(code);
            let sequence = match (table.get(idx), prev.as_ref()) {
                (Some(entry), _) => entry.clone(),
                // The code being defined by this very step
                (None, Some(prev)) if idx == table.len() => {
                    let mut sequence = prev.clone();
                    sequence.extend(prev.first());
                    sequence
                }
                _ => {
                    return Err(LzwErrorCode::OutOfBounds {
                        code,
                        len: table.len(),
                    }
                    .into())
                }
            };
            if let (Some(mut entry), Some(&first)) = (prev.take(), sequence.first()) {
                // A full table stays as is until the next clear code
                if table.len() < MAX_TABLE_LEN {
                    entry.push(first);
                    table.push(entry);
                }
            }
            decoded.extend_from_slice(&sequence);
            if decoded.len() > DECODED_LIMIT {
                return Err(LzwErrorCode::TooLarge(reader.offset(), bytes.len()).into());
            }
            let next_len = table.len() + usize::from(self.early_change.0);
            if next_len >= (1 << code_size) && code_size < MAX_CODE_SIZE {
                code_size += 1;
            }
            prev = Some(sequence);
        }
        Ok(decoded)
    }
}

/// Single-byte sequences followed by placeholders for the clear and EOD
/// codes.
fn initial_table() -> Vec<Vec<Byte>> {
    let mut table = Vec::with_capacity(MAX_TABLE_LEN);
    table.extend((0..=Byte::MAX).map(|byte| vec![byte]));
    table.extend([Vec::new(), Vec::new()]);
    table
}

/// Reads big-endian codes of varying widths.
struct BitReader<'a> {
    bytes: &'a [Byte],
    idx: usize,
    buffer: u32,
    bits: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [Byte]) -> Self {
        Self {
            bytes,
            idx: 0,
            buffer: 0,
            bits: 0,
        }
    }

    fn read(&mut self, size: usize) -> Option<u16> {
        while self.bits < size {
            let byte = *self.bytes.get(self.idx)?;
            self.idx += 1;
            self.buffer = (self.buffer << 8) | u32::from(byte);
            self.bits += 8;
        }
        self.bits -= size;
        let code = (self.buffer >> self.bits) & ((1 << size) - 1);
        self.buffer &= (1 << self.bits) - 1;
        Some(code as u16)
    }

    fn offset(&self) -> usize {
        self.idx
    }
}

mod convert {
    use super::*;

    impl Lzw {
        pub(crate) fn new(
            decode_parms: Option<&Dictionary>,
            context: &Context,
        ) -> FilterResult<Self> {
            let Some(decode_parms) = decode_parms else {
                return Ok(Self::default());
            };
            let early_change = decode_parms
                .lookup(KEY_EARLY_CHANGE, context, &[])?
                .map(EarlyChange::try_from)
                .transpose()?
                .unwrap_or_default();
            Ok(Self { early_change })
        }
    }

    impl TryFrom<&Object> for EarlyChange {
        type Error = FilterErr;

        fn try_from(value: &Object) -> Result<Self, Self::Error> {
            match value.as_number() {
                Some(value) if value == 0.0 => Ok(Self(false)),
                Some(value) if value == 1.0 => Ok(Self(true)),
                Some(value) => Err(FilterErr::new(
                    stringify!(EarlyChange),
                    FilterErrorCode::UnsupportedParameter(value),
                )),
                None => Err(FilterErr::new(
                    stringify!(EarlyChange),
                    FilterErrorCode::Object(ObjectErr::UnexpectedType {
                        expected: vec![ObjectKind::Number],
                        actual: Some(value.kind()),
                    }),
                )),
            }
        }
    }
}

pub(crate) mod error {
    use ::thiserror::Error;

    use crate::DECODED_LIMIT;

    #[derive(Debug, Error, PartialEq, Clone, Copy)]
    pub enum LzwErrorCode {
        #[error("Out of bounds. Code: {code}. Table length: {len}")]
        OutOfBounds { code: u16, len: usize },
        #[error(
            "Too large: Exceeding the set limit of {} bytes while decoding byte {0} out of {1}",
            DECODED_LIMIT
        )]
        TooLarge(usize, usize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err_eq;

    #[test]
    fn lzw_valid() {
        // REFERENCE: [7.4.4.2 Details of LZW encoding, p39]
        let encoded = [0x80, 0x0B, 0x60, 0x50, 0x22, 0x0C, 0x0C, 0x85, 0x01];
        assert_eq!(Lzw::default().decode(&encoded), Ok(b"-----A---B".to_vec()));
        // Missing EOD code
        assert_eq!(Lzw::default().decode(&encoded[..7]), Ok(b"-----A---".to_vec()));
    }

    #[test]
    fn lzw_early_change_parameter() {
        let context = Context::create();
        let mut decode_parms = Dictionary::new();
        decode_parms.set(KEY_EARLY_CHANGE, 0.0);
        let filter = Lzw::new(Some(&decode_parms), &context).unwrap();
        assert_eq!(filter.early_change, EarlyChange(false));
        assert_eq!(Lzw::new(None, &context).unwrap().early_change, EarlyChange(true));

        decode_parms.set(KEY_EARLY_CHANGE, 2.0);
        assert_eq!(
            Lzw::new(Some(&decode_parms), &context),
            Err(FilterErr::new(
                "EarlyChange",
                FilterErrorCode::UnsupportedParameter(2.0)
            ))
        );
    }

    #[test]
    fn lzw_invalid() {
        // Codes 256, 45, 300
        let encoded = [0x80, 0x0B, 0x65, 0x80];
        let expected_error = LzwErrorCode::OutOfBounds { code: 300, len: 258 };
        assert_err_eq!(Lzw::default().decode(&encoded), expected_error);
    }
}
