use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::Serialize;
use crate::parse::KW_HEADER;
use crate::Byte;

/// Bytes above 127 in the comment following the version line, marking the
/// file as binary.
const BINARY_MARKER: [Byte; 4] = [0x81; 4];

/// REFERENCE: [7.5.2 File header, p54-55]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    major: u64,
    minor: u64,
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}.{}", KW_HEADER, self.major, self.minor)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::for_version(1, 7)
    }
}

impl Serialize for Header {
    fn size_in_bytes(&self) -> usize {
        // The version line, `\n%` and the binary marker
        self.to_string().len() + 2 + BINARY_MARKER.len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let initial_len = buffer.len();
        buffer.extend_from_slice(self.to_string().as_bytes());
        buffer.extend_from_slice(b"\n%");
        buffer.extend_from_slice(&BINARY_MARKER);
        buffer.len() - initial_len
    }
}

mod convert {
    use super::*;

    impl Header {
        pub fn for_version(major: u64, minor: u64) -> Self {
            Self { major, minor }
        }

        pub fn major(&self) -> u64 {
            self.major
        }

        pub fn minor(&self) -> u64 {
            self.minor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_serialize() {
        let header = Header::for_version(1, 7);
        assert_eq!(header.to_string(), "%PDF-1.7");
        assert_eq!(header.size_in_bytes(), 14);
        assert_eq!(header.to_bytes(), b"%PDF-1.7\n%\x81\x81\x81\x81");
        assert_eq!(Header::for_version(2, 10).size_in_bytes(), 15);
    }
}
