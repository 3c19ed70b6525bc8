use ::log::trace;
use ::nom::branch::alt;
use ::nom::bytes::complete::take_till;
use ::nom::bytes::complete::take_while;
use ::nom::bytes::complete::take_while1;
use ::nom::character::complete::char;
use ::nom::character::complete::digit0;
use ::nom::combinator::opt;
use ::nom::combinator::recognize;
use ::nom::multi::many1;
use ::nom::sequence::pair;
use ::nom::sequence::preceded;
use ::nom::IResult;

use crate::fmt::debug_bytes;
use crate::Byte;

/// REFERENCE: [3.68 white-space character, p14] and ["Table 1 — White-space
/// characters" in 7.2.3, "Character set", p22]
pub(crate) const fn is_white_space(byte: Byte) -> bool {
    byte == b'\x09' // HORIZONTAL TABULATION
        || byte == b'\x0A' // LINE FEED
        || byte == b'\x0C' // FORM FEED
        || byte == b'\x0D' // CARRIAGE RETURN
        || byte == b'\x20' // SPACE
        || byte == b'\x00' // NULL
}

/// REFERENCE: [7.2.3 Character set, p22]
pub(crate) const fn is_delimiter(byte: Byte) -> bool {
    byte == b'('
        || byte == b')'
        || byte == b'<'
        || byte == b'>'
        || byte == b'['
        || byte == b']'
        || byte == b'{'
        || byte == b'}'
        || byte == b'/'
        || byte == b'%'
}

/// Characters that must be written as `#XX` escapes inside a name.
/// REFERENCE: [7.3.5 Name objects, p27]
pub(crate) const fn is_irregular(byte: Byte) -> bool {
    is_white_space(byte) || is_delimiter(byte) || byte == b'#'
}

/// Characters written verbatim inside a name.
pub(crate) const fn is_regular_name_char(byte: Byte) -> bool {
    byte >= b'!' && byte <= b'~' && !is_irregular(byte)
}

pub(crate) const fn is_digit(byte: Byte) -> bool {
    byte.is_ascii_digit()
}

/// Characters that may start or continue a number: digits, signs and the
/// decimal point.
pub(crate) const fn is_numeric(byte: Byte) -> bool {
    is_digit(byte) || byte == b'+' || byte == b'-' || byte == b'.'
}

/// REFERENCE: [7.2.3 Character set, p22]
pub(crate) fn white_space(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
    take_while1(is_white_space)(buffer)
}

/// REFERENCE: [7.2.4 Comments, p23]
pub(crate) fn comment(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
    let (buffer, comment) =
        preceded(char('%'), take_till(|byte| byte == b'\n' || byte == b'\r'))(buffer)?;
    trace!("Comment: {}", debug_bytes(comment));
    Ok((buffer, comment))
}

/// REFERENCE: [7.2.4 Comments, p23]
pub(crate) fn white_space_or_comment(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
    // A comment is treated as a single white-space character.
    recognize(many1(alt((white_space, comment))))(buffer)
}

/// The bytes of a name up to the next white-space or delimiter character.
pub(crate) fn name_token(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
    take_while(|byte| !is_white_space(byte) && !is_delimiter(byte))(buffer)
}

pub(crate) fn digits(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
    take_while1(is_digit)(buffer)
}

/// REFERENCE: [7.3.3 Numeric objects, p24]
/// The sign, digit and period characters up to and including the first
/// period, followed by the fractional digits. The token may be empty and is
/// not checked to form a number.
pub(crate) fn numeric_token(buffer: &[Byte]) -> IResult<&[Byte], &[Byte]> {
    recognize(pair(
        take_while(|byte| is_numeric(byte) && byte != b'.'),
        opt(pair(char('.'), digit0)),
    ))(buffer)
}

#[cfg(test)]
mod tests {
    use ::nom::error::Error as NomError;
    use ::nom::error::ErrorKind;
    use ::nom::Err as NomErr;

    use super::*;

    #[test]
    fn white_space_valid() {
        for ws in [b" .", b"\t.", b"\n.", b"\x0C.", b"\r.", b"\x00."] {
            assert_eq!(white_space(ws).unwrap(), (b".".as_slice(), &ws[..1]));
        }
        // Comments are not white space on their own
        assert_eq!(
            white_space(b"  %%EOF\n").unwrap(),
            (b"%%EOF\n".as_slice(), b"  ".as_slice())
        );
    }

    #[test]
    fn white_space_invalid() {
        assert_eq!(
            white_space(b"R"),
            Err(NomErr::Error(NomError::new(
                b"R".as_slice(),
                ErrorKind::TakeWhile1
            )))
        );
    }

    #[test]
    fn comment_valid() {
        assert_eq!(comment(b"%\r\n").unwrap(), (b"\r\n".as_slice(), b"".as_slice()));
        assert_eq!(
            comment(b"%%EOF\n").unwrap(),
            (b"\n".as_slice(), b"%EOF".as_slice())
        );
        assert_eq!(
            comment(b"%PDF\rLINE2%ANOTHER COMMENT\n").unwrap(),
            (b"\rLINE2%ANOTHER COMMENT\n".as_slice(), b"PDF".as_slice())
        );
        // Unterminated comment at the end of the buffer
        assert_eq!(comment(b"%EOF").unwrap(), (b"".as_slice(), b"EOF".as_slice()));
    }

    #[test]
    fn white_space_or_comment_valid() {
        assert_eq!(
            white_space_or_comment(b"  %A COMMENT\n<").unwrap(),
            (b"<".as_slice(), b"  %A COMMENT\n".as_slice())
        );
        assert_eq!(
            white_space_or_comment(b"%1\n%2\r\n 3").unwrap(),
            (b"3".as_slice(), b"%1\n%2\r\n ".as_slice())
        );
    }

    #[test]
    fn white_space_or_comment_invalid() {
        assert_eq!(
            white_space_or_comment(b">"),
            Err(NomErr::Error(NomError::new(b">".as_slice(), ErrorKind::Char)))
        );
    }

    #[test]
    fn name_token_valid() {
        assert_eq!(
            name_token(b"Type/Page").unwrap(),
            (b"/Page".as_slice(), b"Type".as_slice())
        );
        assert_eq!(
            name_token(b"A#20B>>").unwrap(),
            (b">>".as_slice(), b"A#20B".as_slice())
        );
        assert_eq!(name_token(b" ").unwrap(), (b" ".as_slice(), b"".as_slice()));
    }

    #[test]
    fn digits_valid() {
        assert_eq!(digits(b"0017 0").unwrap(), (b" 0".as_slice(), b"0017".as_slice()));
        assert!(digits(b"-1").is_err());
    }

    #[test]
    fn numeric_token_valid() {
        for (buffer, token, remains) in [
            (b"-98.6]".as_slice(), b"-98.6".as_slice(), b"]".as_slice()),
            (b".5/", b".5", b"/"),
            (b"1.2.3", b"1.2", b".3"),
            (b"1-2 ", b"1-2", b" "),
            (b"R", b"", b"R"),
        ] {
            assert_eq!(numeric_token(buffer).unwrap(), (remains, token));
        }
    }

    #[test]
    fn classification() {
        assert!(is_numeric(b'+') && is_numeric(b'.') && is_numeric(b'7'));
        assert!(!is_numeric(b'e'));
        assert!(is_irregular(b'#') && is_irregular(b'/') && is_irregular(b' '));
        assert!(is_regular_name_char(b'A') && is_regular_name_char(b'~'));
        assert!(!is_regular_name_char(b'\x7F') && !is_regular_name_char(b'('));
    }
}
