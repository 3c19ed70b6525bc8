use ::log::warn;
use ::nom::branch::alt;
use ::nom::bytes::complete::tag;
use ::nom::bytes::complete::take;
use ::nom::bytes::complete::take_till;
use ::nom::bytes::complete::take_while1;
use ::nom::character::complete::char;
use ::nom::combinator::recognize;
use ::nom::error::Error as NomError;
use ::nom::multi::many0;
use ::nom::sequence::delimited;
use ::nom::sequence::pair;
use ::nom::sequence::preceded;
use ::nom::IResult;
use ::std::ops::Deref;
use ::std::ops::DerefMut;

use super::base::BaseParser;
use super::byte_stream::ByteStream;
use super::character_set::is_digit;
use super::character_set::is_numeric;
use super::character_set::name_token;
use super::error::ParseErr;
use super::error::ParseErrorCode;
use super::error::ParseResult;
use super::error::Position;
use super::KW_ENDSTREAM;
use super::KW_EOL_ENDSTREAM;
use super::KW_FALSE;
use super::KW_NULL;
use super::KW_STREAM;
use super::KW_STREAM_EOL;
use super::KW_TRUE;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::direct::numeric::Number;
use crate::object::direct::string::hexadecimal::Hexadecimal;
use crate::object::direct::string::literal::Literal;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::RawStream;
use crate::object::indirect::stream::KEY_LENGTH;
use crate::object::Object;
use crate::structure::catalog::Catalog;
use crate::structure::page_leaf::PageLeaf;
use crate::structure::page_tree::PageTree;
use crate::structure::KEY_TYPE;
use crate::structure::VAL_CATALOG;
use crate::structure::VAL_PAGE;
use crate::structure::VAL_PAGES;
use crate::Byte;
use crate::GenerationNumber;
use crate::ObjectNumber;
use crate::Offset;

/// Recursive-descent parser for a single direct object, or a dictionary
/// followed by a stream body.
/// REFERENCE: [7.3 Objects, p24]
#[derive(Debug, Clone)]
pub struct ObjectParser {
    base: BaseParser,
}

impl Deref for ObjectParser {
    type Target = BaseParser;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for ObjectParser {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

mod convert {
    use super::*;

    impl ObjectParser {
        pub fn for_bytes(bytes: impl Into<Vec<Byte>>, cap_numbers: bool) -> Self {
            Self::for_byte_stream(ByteStream::of(bytes), cap_numbers)
        }

        pub fn for_byte_stream(bytes: ByteStream, cap_numbers: bool) -> Self {
            Self {
                base: BaseParser::new(bytes, cap_numbers),
            }
        }

        /// The unread bytes.
        pub fn remaining(&self) -> &[Byte] {
            self.base.remaining()
        }
    }
}

mod process {
    use super::*;

    impl ObjectParser {
        pub fn parse_object(&mut self) -> ParseResult<Object> {
            self.skip_whitespace_and_comments();
            if self.match_keyword(KW_TRUE) {
                return Ok(Object::Boolean(true));
            }
            if self.match_keyword(KW_FALSE) {
                return Ok(Object::Boolean(false));
            }
            if self.match_keyword(KW_NULL) {
                return Ok(Object::Null);
            }
            match (self.bytes.peek(), self.bytes.peek_ahead(1)) {
                (Some(b'<'), Some(b'<')) => self.parse_dict_or_stream(),
                (Some(b'<'), _) => self.parse_hex_string().map(Object::from),
                (Some(b'('), _) => self.parse_string().map(Object::from),
                (Some(b'/'), _) => self.parse_name().map(Object::from),
                (Some(b'['), _) => self.parse_array().map(Object::from),
                (Some(byte), _) if is_numeric(byte) => self.parse_number_or_ref(),
                (byte, _) => Err(ParseErr::new(
                    self.bytes.position(),
                    ParseErrorCode::ObjectParsing(byte),
                )),
            }
        }

        /// REFERENCE: [7.3.10 Indirect objects, p33]
        /// `N G R` is a reference, while any other number is returned alone
        /// with the cursor placed right before the following token.
        fn parse_number_or_ref(&mut self) -> ParseResult<Object> {
            let first = self.parse_raw_number()?;
            self.skip_whitespace_and_comments();
            let lookahead_start = self.bytes.offset();
            if matches!(self.bytes.peek(), Some(byte) if is_digit(byte)) {
                let second = self.parse_raw_number()?;
                self.skip_whitespace_and_comments();
                if self.bytes.peek() == Some(b'R') {
                    self.bytes.assert_next(b'R')?;
                    return Ok(Reference::of(
                        first as ObjectNumber,
                        second as GenerationNumber,
                    )
                    .into());
                }
            }
            self.bytes.move_to(lookahead_start);
            Ok(Number::of(first).into())
        }

        /// REFERENCE: [7.3.4.3 Hexadecimal strings, p27]
        /// The digits are kept as written.
        fn parse_hex_string(&mut self) -> ParseResult<Hexadecimal> {
            let remaining = self.bytes.remaining();
            let (remains, value) = parse::hexadecimal(remaining)
                .map_err(|_| self.next_byte_err('<'))?;
            let value = value.to_vec();
            let consumed = remaining.len() - remains.len();
            self.bytes.advance(consumed);
            self.bytes.assert_next(b'>')?;
            Ok(Hexadecimal::of(value))
        }

        /// REFERENCE: [7.3.4.2 Literal strings, p25]
        /// Escape sequences are kept as written. Only unescaped parentheses
        /// count towards the balance.
        fn parse_string(&mut self) -> ParseResult<Literal> {
            let remaining = self.bytes.remaining();
            let (remains, value) = parse::literal(remaining).map_err(|_| self.next_byte_err('('))?;
            let closed = char::<_, NomError<_>>(')')(remains).is_ok();
            let value = value.to_vec();
            let consumed = remaining.len() - remains.len();
            self.bytes.advance(consumed);
            if !closed {
                return Err(ParseErr::new(
                    self.bytes.position(),
                    ParseErrorCode::UnbalancedParenthesis,
                ));
            }
            self.bytes.next_byte();
            Ok(Literal::of(value))
        }

        fn next_byte_err(&self, expected: char) -> ParseErr {
            ParseErr::new(
                self.bytes.position(),
                ParseErrorCode::NextByteAssertion {
                    expected,
                    actual: self.bytes.peek(),
                },
            )
        }

        /// REFERENCE: [7.3.5 Name objects, p27]
        pub(crate) fn parse_name(&mut self) -> ParseResult<Name> {
            self.bytes.assert_next(b'/')?;
            let token_len = name_token(self.bytes.remaining())
                .map(|(_, token)| token.len())
                .unwrap_or_default();
            let name = Name::from_bytes(&self.bytes.remaining()[..token_len]);
            self.bytes.advance(token_len);
            Ok(name)
        }

        /// REFERENCE: [7.3.6 Array objects, p29]
        fn parse_array(&mut self) -> ParseResult<Array> {
            self.bytes.assert_next(b'[')?;
            self.skip_whitespace_and_comments();
            let mut array = Array::new();
            while self.bytes.peek() != Some(b']') {
                array.push(self.parse_object()?);
                self.skip_whitespace_and_comments();
            }
            self.bytes.assert_next(b']')?;
            Ok(array)
        }

        /// REFERENCE: [7.3.7 Dictionary objects, p30]
        pub(crate) fn parse_dict(&mut self) -> ParseResult<Dictionary> {
            self.bytes.assert_next(b'<')?;
            self.bytes.assert_next(b'<')?;
            self.skip_whitespace_and_comments();
            let mut dict = Dictionary::new();
            while !matches!(self.bytes.peek(), None | Some(b'>')) {
                let key = self.parse_name()?;
                let value = self.parse_object()?;
                dict.set(key, value);
                self.skip_whitespace_and_comments();
            }
            self.skip_whitespace_and_comments();
            self.bytes.assert_next(b'>')?;
            self.bytes.assert_next(b'>')?;
            Ok(dict)
        }

        /// REFERENCE: [7.3.8 Stream objects, p31]
        fn parse_dict_or_stream(&mut self) -> ParseResult<Object> {
            let start_position = self.bytes.position();
            let dict = self.parse_dict()?;
            self.skip_whitespace_and_comments();
            let is_stream = KW_STREAM_EOL
                .iter()
                .chain([&KW_STREAM])
                .any(|keyword| self.match_keyword(keyword));
            if !is_stream {
                return Ok(upgrade_dict(dict));
            }

            let start = self.bytes.offset();
            let length = dict.get(KEY_LENGTH).and_then(Object::as_number);
            let end = match length {
                Some(length) if length >= 0.0 => {
                    let end = start
                        .checked_add(length as Offset)
                        .filter(|&end| end <= self.bytes.len());
                    match end {
                        Some(end) if self.is_end_of_stream(end) => end,
                        _ => {
                            warn!(
                                "Stream at {} does not end after its /Length of {}. Scanning \
                                 for endstream",
                                start_position, length
                            );
                            self.bytes.move_to(start);
                            self.find_end_of_stream_fallback(start_position)?
                        }
                    }
                }
                _ => self.find_end_of_stream_fallback(start_position)?,
            };
            let contents = self.bytes.slice(start, end).to_vec();
            Ok(RawStream::of(dict, contents).into())
        }

        /// Whether `endstream` follows `end`, possibly after white space. The
        /// cursor is left after the keyword when it does.
        fn is_end_of_stream(&mut self, end: Offset) -> bool {
            self.bytes.move_to(end);
            self.skip_whitespace_and_comments();
            self.match_keyword(KW_ENDSTREAM)
        }

        /// Scan for the `endstream` matching the current stream, counting
        /// nested `stream` keywords. Return the offset right before it and its
        /// preceding end-of-line marker.
        fn find_end_of_stream_fallback(&mut self, start_position: Position) -> ParseResult<Offset> {
            let mut depth = 1usize;
            while !self.bytes.done() {
                let end = self.bytes.offset();
                if self.match_keyword(KW_STREAM) {
                    depth += 1;
                } else if KW_EOL_ENDSTREAM
                    .iter()
                    .chain([&KW_ENDSTREAM])
                    .any(|keyword| self.match_keyword(keyword))
                {
                    depth -= 1;
                } else {
                    self.bytes.next_byte();
                }
                if depth == 0 {
                    return Ok(end);
                }
            }
            Err(ParseErr::new(start_position, ParseErrorCode::StreamParsing))
        }
    }

    /// Dictionaries typed as a catalog, a page tree node or a page become the
    /// dedicated structures.
    fn upgrade_dict(dict: Dictionary) -> Object {
        let Some(kind) = dict.get(KEY_TYPE).and_then(Object::as_name).cloned() else {
            return dict.into();
        };
        match kind.as_bytes() {
            kind if kind == VAL_CATALOG.as_bytes() => Catalog::from_dict(dict).into(),
            kind if kind == VAL_PAGES.as_bytes() => PageTree::from_dict(dict).into(),
            kind if kind == VAL_PAGE.as_bytes() => PageLeaf::from_dict(dict).into(),
            _ => dict.into(),
        }
    }
}

mod parse {
    use super::*;

    /// Bytes outside nested parentheses, escape sequences included.
    fn not_parentheses(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
        recognize(many0(alt((
            take_while1(|byte| byte != b'\\' && byte != b'(' && byte != b')'),
            recognize(pair(tag(b"\\"), take(1usize))),
        ))))(buffer)
    }

    fn inner_parentheses(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
        recognize(delimited(
            char('('),
            pair(
                not_parentheses,
                many0(pair(inner_parentheses, not_parentheses)),
            ),
            char(')'),
        ))(buffer)
    }

    /// The contents of a literal string, stopping before its closing
    /// parenthesis.
    pub(super) fn literal(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
        preceded(
            char('('),
            recognize(pair(
                not_parentheses,
                many0(pair(inner_parentheses, not_parentheses)),
            )),
        )(buffer)
    }

    /// The contents of a hexadecimal string, stopping before `>`.
    pub(super) fn hexadecimal(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
        preceded(char('<'), take_till(|byte| byte == b'>'))(buffer)
    }
}
