use ::std::fmt::Debug;
use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::Serialize;
use crate::Byte;
use crate::GenerationNumber;
use crate::ObjectNumber;

pub(crate) const KW_R: &str = "R";

/// REFERENCE: [7.3.10 Indirect Objects, p33]
/// References are plain values. Two references to the same object number and
/// generation number are interchangeable, and the ordering follows the object
/// number first.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Reference {
    object_number: ObjectNumber,
    generation_number: GenerationNumber,
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} {} {}",
            self.object_number, self.generation_number, KW_R
        )
    }
}

impl Debug for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Serialize for Reference {
    fn size_in_bytes(&self) -> usize {
        self.tag().len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let tag = self.tag();
        buffer.extend_from_slice(tag.as_bytes());
        tag.len()
    }
}

mod convert {
    use super::*;

    impl Reference {
        pub fn of(object_number: ObjectNumber, generation_number: GenerationNumber) -> Self {
            Self {
                object_number,
                generation_number,
            }
        }

        pub fn object_number(&self) -> ObjectNumber {
            self.object_number
        }

        pub fn generation_number(&self) -> GenerationNumber {
            self.generation_number
        }

        /// `N G R`
        pub fn tag(&self) -> String {
            self.to_string()
        }
    }
}
