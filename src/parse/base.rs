use ::log::warn;

use super::byte_stream::ByteStream;
use super::character_set::digits;
use super::character_set::numeric_token;
use super::character_set::white_space;
use super::character_set::white_space_or_comment;
use super::error::ParseErr;
use super::error::ParseErrorCode;
use super::error::ParseResult;
use super::num::ascii_to_u64;
use crate::fmt::latin1;
use crate::Byte;

/// The largest integer a double represents exactly, 2^53 - 1.
pub(crate) const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Tokenising primitives shared by the object and document parsers. Each
/// token is recognised on the unread bytes before the cursor moves past it.
#[derive(Debug, Clone)]
pub struct BaseParser {
    pub(crate) bytes: ByteStream,
    cap_numbers: bool,
}

impl BaseParser {
    pub fn new(bytes: ByteStream, cap_numbers: bool) -> Self {
        Self { bytes, cap_numbers }
    }

    /// Parse a run of decimal digits.
    pub fn parse_raw_int(&mut self) -> ParseResult<u64> {
        let digits = digits(self.bytes.remaining())
            .map(|(_, digits)| digits)
            .unwrap_or_default();
        let value = ascii_to_u64(digits).ok_or_else(|| {
            ParseErr::new(
                self.bytes.position(),
                ParseErrorCode::NumberParsing(latin1(digits)),
            )
        })?;
        let count = digits.len();
        self.bytes.advance(count);
        Ok(value)
    }

    /// Parse the leading run of sign, digit and period characters up to and
    /// including the first period, followed by the fractional digits.
    /// REFERENCE: [7.3.3 Numeric objects, p24]
    pub fn parse_raw_number(&mut self) -> ParseResult<f64> {
        let token = numeric_token(self.bytes.remaining())
            .map(|(_, token)| token)
            .unwrap_or_default();
        let text = latin1(token);
        let count = token.len();
        self.bytes.advance(count);
        let value = parse_number_text(&text).ok_or_else(|| {
            ParseErr::new(
                self.bytes.position(),
                ParseErrorCode::NumberParsing(text.clone()),
            )
        })?;
        if value > MAX_SAFE_INTEGER {
            if self.cap_numbers {
                warn!(
                    "Parsed number that is too large for some PDF readers: {}, using {} instead",
                    text, MAX_SAFE_INTEGER
                );
                return Ok(MAX_SAFE_INTEGER);
            }
            warn!(
                "Parsed number that is too large for some PDF readers: {}, not capping",
                text
            );
        }
        Ok(value)
    }

    pub fn skip_whitespace(&mut self) {
        if let Ok((_, skipped)) = white_space(self.bytes.remaining()) {
            let count = skipped.len();
            self.bytes.advance(count);
        }
    }

    pub fn skip_whitespace_and_comments(&mut self) {
        if let Ok((_, skipped)) = white_space_or_comment(self.bytes.remaining()) {
            let count = skipped.len();
            self.bytes.advance(count);
        }
    }

    /// Consume `keyword` if the unread bytes start with it, otherwise leave
    /// the cursor untouched.
    pub fn match_keyword(&mut self, keyword: &str) -> bool {
        self.match_bytes(keyword.as_bytes())
    }

    pub fn match_bytes(&mut self, keyword: &[Byte]) -> bool {
        if self.bytes.remaining().starts_with(keyword) {
            self.bytes.advance(keyword.len());
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> &[Byte] {
        self.bytes.remaining()
    }
}

/// Interpret the text collected by `parse_raw_number`. It only holds signs,
/// digits and periods, so exponents and special values never parse.
fn parse_number_text(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}
