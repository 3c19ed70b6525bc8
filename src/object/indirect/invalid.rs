use ::std::fmt::Debug;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::fmt::debug_bytes;
use crate::object::Serialize;
use crate::Byte;

/// The bytes of an indirect object the parser could not interpret, written
/// back verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Invalid(Vec<Byte>);

impl Debug for Invalid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Invalid({})", debug_bytes(&self.0))
    }
}

impl Serialize for Invalid {
    fn size_in_bytes(&self) -> usize {
        self.0.len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        buffer.extend_from_slice(&self.0);
        self.0.len()
    }
}

mod convert {
    use super::*;

    impl Invalid {
        pub fn of(bytes: impl Into<Vec<Byte>>) -> Self {
            Self(bytes.into())
        }

        pub fn as_bytes(&self) -> &[Byte] {
            &self.0
        }
    }
}
