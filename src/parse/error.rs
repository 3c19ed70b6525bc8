use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;
use ::thiserror::Error;

use crate::object::error::ObjectErr;
use crate::process::filter::error::FilterErr;
use crate::Byte;
use crate::ObjectNumber;
use crate::Offset;

pub type ParseResult<T> = Result<T, ParseErr>;

/// Location of the cursor when an error was raised.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: Offset,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "line {}, column {}, offset {}",
            self.line, self.column, self.offset
        )
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
#[error("Parse. Error: {code}. Position: {position}")]
pub struct ParseErr {
    pub(crate) position: Position,
    pub(crate) code: ParseErrorCode,
}

// ObjectErr and FilterErr do not implement Copy
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseErrorCode {
    #[error("Failed to parse number: {0:?}")]
    NumberParsing(String),
    #[error("Expected next byte {expected:?}. Found: {}", display_byte(.actual))]
    NextByteAssertion { expected: char, actual: Option<Byte> },
    #[error("Unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("Failed to parse object starting with {}", display_byte(.0))]
    ObjectParsing(Option<Byte>),
    #[error("Failed to find the end of the stream")]
    StreamParsing,
    #[error("Object offset {offset} after /First {first} is out of range")]
    ObjectOffsetOutOfRange { first: Offset, offset: Offset },
    #[error("Cross-reference subsection {first} {length} is out of range")]
    SubsectionOutOfRange { first: ObjectNumber, length: u64 },
    #[error("Cross-reference stream field width {0} exceeds 8 bytes")]
    FieldWidthOutOfRange(usize),
    #[error("Missing keyword: {0}")]
    MissingKeyword(&'static str),
    #[error("No PDF header found")]
    MissingPdfHeader,
    #[error("Failed to parse invalid object")]
    InvalidObjectParsing,
    #[error("Invalid object: {0}")]
    InvalidObject(Box<ParseErr>),
    #[error("Parser stalled")]
    StalledParser,
    #[error("{parser}.{method} may only be called once")]
    Reparse {
        parser: &'static str,
        method: &'static str,
    },
    //
    #[error("Object: {0}")]
    Object(#[from] ObjectErr),
    #[error("Filter: {0}")]
    Filter(#[from] FilterErr),
}

fn display_byte(byte: &Option<Byte>) -> String {
    match byte {
        Some(byte) => format!("{:?}", char::from(*byte)),
        None => "end of input".to_string(),
    }
}

mod convert {
    use super::*;

    impl ParseErr {
        pub fn new(position: Position, code: ParseErrorCode) -> Self {
            Self { position, code }
        }

        pub fn position(&self) -> Position {
            self.position
        }

        pub fn code(&self) -> &ParseErrorCode {
            &self.code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_err_display() {
        let err = ParseErr::new(
            Position {
                line: 2,
                column: 4,
                offset: 20,
            },
            ParseErrorCode::NextByteAssertion {
                expected: '>',
                actual: None,
            },
        );
        assert_eq!(
            err.to_string(),
            "Parse. Error: Expected next byte '>'. Found: end of input. Position: line 2, \
             column 4, offset 20"
        );
    }
}
