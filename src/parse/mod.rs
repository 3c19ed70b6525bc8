pub mod base;
pub mod byte_stream;
pub(crate) mod character_set;
pub mod error;
pub(crate) mod num;
pub mod object;
pub(crate) mod object_stream;
pub(crate) mod xref_stream;

pub use self::base::BaseParser;
pub use self::byte_stream::ByteStream;
pub use self::error::ParseErr;
pub use self::error::ParseErrorCode;
pub use self::error::ParseResult;
pub use self::error::Position;
pub use self::object::ObjectParser;

pub(crate) const KW_HEADER: &str = "%PDF-";
pub(crate) const KW_EOF: &str = "%%EOF";
pub(crate) const KW_OBJ: &str = "obj";
pub(crate) const KW_ENDOBJ: &str = "endobj";
pub(crate) const KW_XREF: &str = "xref";
pub(crate) const KW_TRAILER: &str = "trailer";
pub(crate) const KW_STARTXREF: &str = "startxref";
pub(crate) const KW_TRUE: &str = "true";
pub(crate) const KW_FALSE: &str = "false";
pub(crate) const KW_NULL: &str = "null";
pub(crate) const KW_STREAM: &str = "stream";
pub(crate) const KW_ENDSTREAM: &str = "endstream";

/// Variants of the `stream` keyword together with the end-of-line marker that
/// should follow it, longest first. REFERENCE: [7.3.8.1 General, p31]
pub(crate) const KW_STREAM_EOL: [&str; 4] = ["stream \r\n", "stream\r\n", "stream\r", "stream\n"];
/// Variants of the `endstream` keyword together with the end-of-line marker
/// that should precede it.
pub(crate) const KW_EOL_ENDSTREAM: [&str; 3] = ["\r\nendstream", "\rendstream", "\nendstream"];

#[cfg(test)]
mod tests {
    /// Parse a single object from `$buffer` and compare it with the expected
    /// object. The optional third argument is the expected unread remainder.
    #[macro_export]
    macro_rules! parse_assert_eq {
        ($buffer:expr, $expected_parsed:expr) => {
            let mut parser = $crate::parse::object::ObjectParser::for_bytes($buffer, false);
            assert_eq!(parser.parse_object(), Ok($expected_parsed.into()));
        };
        ($buffer:expr, $expected_parsed:expr, $expected_remains:expr) => {
            let mut parser = $crate::parse::object::ObjectParser::for_bytes($buffer, false);
            assert_eq!(parser.parse_object(), Ok($expected_parsed.into()));
            assert_eq!(parser.remaining(), $expected_remains);
        };
    }
}
