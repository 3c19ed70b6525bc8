use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::direct::dictionary::Dictionary;
use crate::object::Serialize;
use crate::parse::KW_EOF;
use crate::parse::KW_STARTXREF;
use crate::parse::KW_TRAILER;
use crate::Byte;
use crate::Offset;

/// REFERENCE: [7.5.5 File trailer, p58]
/// The last lines of a file pointing at the last cross-reference section.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Trailer {
    last_xref_offset: Offset,
}

impl Display for Trailer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}\n{}\n{}",
            KW_STARTXREF, self.last_xref_offset, KW_EOF
        )
    }
}

impl Serialize for Trailer {
    fn size_in_bytes(&self) -> usize {
        KW_STARTXREF.len() + 1 + self.last_xref_offset.to_string().len() + 1 + KW_EOF.len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let text = self.to_string();
        buffer.extend_from_slice(text.as_bytes());
        text.len()
    }
}

/// REFERENCE: [7.5.5 File trailer, p58-59]
/// The `trailer` keyword followed by the trailer dictionary.
#[derive(Debug, PartialEq, Clone)]
pub struct TrailerDict {
    dict: Dictionary,
}

impl Display for TrailerDict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}\n{}", KW_TRAILER, self.dict)
    }
}

impl Serialize for TrailerDict {
    fn size_in_bytes(&self) -> usize {
        KW_TRAILER.len() + 1 + self.dict.size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let initial_len = buffer.len();
        buffer.extend_from_slice(KW_TRAILER.as_bytes());
        buffer.push(b'\n');
        self.dict.copy_bytes_into(buffer);
        buffer.len() - initial_len
    }
}

mod convert {
    use super::*;

    impl Trailer {
        pub fn for_last_cross_ref_section_offset(offset: Offset) -> Self {
            Self {
                last_xref_offset: offset,
            }
        }

        pub fn last_xref_offset(&self) -> Offset {
            self.last_xref_offset
        }
    }

    impl TrailerDict {
        pub fn of(dict: Dictionary) -> Self {
            Self { dict }
        }

        pub fn dict(&self) -> &Dictionary {
            &self.dict
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::name::Name;

    #[test]
    fn trailer_serialize() {
        let trailer = Trailer::for_last_cross_ref_section_offset(799);
        assert_eq!(trailer.to_bytes(), b"startxref\n799\n%%EOF");
        assert_eq!(trailer.size_in_bytes(), 19);
        assert_eq!(trailer.last_xref_offset(), 799);
    }

    #[test]
    fn trailer_dict_serialize() {
        let mut dict = Dictionary::new();
        dict.set("Size", 4.0);
        dict.set("Root", Name::of("Placeholder"));
        let trailer_dict = TrailerDict::of(dict);
        let expected = b"trailer\n<<\n/Size 4\n/Root /Placeholder\n>>";
        assert_eq!(trailer_dict.to_bytes(), expected);
        assert_eq!(trailer_dict.size_in_bytes(), expected.len());
        assert_eq!(trailer_dict.to_string().as_bytes(), expected);
    }
}
