use super::error::ParseErr;
use super::error::ParseErrorCode;
use super::error::ParseResult;
use super::error::Position;
use crate::Byte;
use crate::Offset;

/// A cursor over a byte buffer tracking the line and column of the bytes
/// consumed through `next_byte`. Jumps made with `move_to` only update the
/// offset.
#[derive(Debug, Clone)]
pub struct ByteStream {
    bytes: Vec<Byte>,
    idx: Offset,
    line: usize,
    column: usize,
}

impl ByteStream {
    pub fn of(bytes: impl Into<Vec<Byte>>) -> Self {
        Self {
            bytes: bytes.into(),
            idx: 0,
            line: 0,
            column: 0,
        }
    }

    pub fn move_to(&mut self, offset: Offset) {
        self.idx = offset;
    }

    pub fn next_byte(&mut self) -> Option<Byte> {
        let byte = self.bytes.get(self.idx).copied();
        self.idx += 1;
        if byte == Some(b'\n') {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        byte
    }

    /// Consume `count` bytes as if by repeated calls to `next_byte`.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            self.next_byte();
        }
    }

    pub fn assert_next(&mut self, expected: Byte) -> ParseResult<Byte> {
        match self.peek() {
            Some(actual) if actual == expected => {
                self.next_byte();
                Ok(actual)
            }
            actual => Err(ParseErr::new(
                self.position(),
                ParseErrorCode::NextByteAssertion {
                    expected: char::from(expected),
                    actual,
                },
            )),
        }
    }

    pub fn peek(&self) -> Option<Byte> {
        self.bytes.get(self.idx).copied()
    }

    pub fn peek_ahead(&self, steps: usize) -> Option<Byte> {
        self.bytes.get(self.idx + steps).copied()
    }

    pub fn done(&self) -> bool {
        self.idx >= self.bytes.len()
    }

    pub fn offset(&self) -> Offset {
        self.idx
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bytes in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: Offset, end: Offset) -> &[Byte] {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        &self.bytes[start..end]
    }

    /// The unread bytes.
    pub fn remaining(&self) -> &[Byte] {
        self.slice(self.idx, self.bytes.len())
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err_eq;

    #[test]
    fn byte_stream_cursor() {
        let mut bytes = ByteStream::of(b"ab\ncd".as_slice());
        assert_eq!(bytes.peek(), Some(b'a'));
        assert_eq!(bytes.peek_ahead(2), Some(b'\n'));
        assert_eq!(bytes.next_byte(), Some(b'a'));
        bytes.advance(2);
        assert_eq!(
            bytes.position(),
            Position {
                line: 1,
                column: 0,
                offset: 3
            }
        );
        assert_eq!(bytes.remaining(), b"cd");
        bytes.move_to(5);
        assert!(bytes.done());
        assert_eq!(bytes.next_byte(), None);
        assert_eq!(bytes.slice(1, 100), b"b\ncd");
    }

    #[test]
    fn byte_stream_assert_next() {
        let mut bytes = ByteStream::of(b"<x".as_slice());
        assert_eq!(bytes.assert_next(b'<'), Ok(b'<'));
        let expected_error = ParseErr::new(
            Position {
                line: 0,
                column: 1,
                offset: 1,
            },
            ParseErrorCode::NextByteAssertion {
                expected: '>',
                actual: Some(b'x'),
            },
        );
        assert_err_eq!(bytes.assert_next(b'>'), expected_error);
    }
}
