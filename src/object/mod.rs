pub mod direct;
pub mod error;
pub mod indirect;
pub mod operator;

use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use self::direct::array::Array;
use self::direct::dictionary::Dictionary;
use self::direct::name::Name;
use self::direct::numeric::Number;
use self::direct::string::hexadecimal::Hexadecimal;
use self::direct::string::literal::Literal;
use self::indirect::invalid::Invalid;
use self::indirect::reference::Reference;
use self::indirect::stream::RawStream;
use crate::fmt::latin1;
use crate::structure::catalog::Catalog;
use crate::structure::content_stream::ContentStream;
use crate::structure::object_stream::ObjectStream;
use crate::structure::page_leaf::PageLeaf;
use crate::structure::page_tree::PageTree;
use crate::xref::stream::CrossRefStream;
use crate::Byte;

pub(crate) const KW_NULL: &str = "null";
pub(crate) const KW_TRUE: &str = "true";
pub(crate) const KW_FALSE: &str = "false";

/// The binary form of a value as written into a PDF file.
pub trait Serialize {
    /// The exact number of bytes `copy_bytes_into` appends.
    fn size_in_bytes(&self) -> usize;

    /// Append the serialized bytes to `buffer` and return their count.
    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize;

    fn to_bytes(&self) -> Vec<Byte> {
        let mut buffer = Vec::with_capacity(self.size_in_bytes());
        self.copy_bytes_into(&mut buffer);
        buffer
    }
}

/// REFERENCE:
/// - [7.3 Objects, p24]
/// - [7.3.8 Stream objects, p31]
/// Dictionaries with a `/Type` of `/Catalog`, `/Pages` or `/Page` are held as
/// their dedicated structures, and the streams the library generates keep
/// their unencoded form until serialization.
#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Null,
    Boolean(bool),
    Number(Number),
    Name(Name),
    String(Literal),
    HexString(Hexadecimal),
    Reference(Reference),
    Array(Array),
    Dictionary(Dictionary),
    Catalog(Catalog),
    PageTree(PageTree),
    PageLeaf(PageLeaf),
    RawStream(RawStream),
    ContentStream(ContentStream),
    ObjectStream(ObjectStream),
    CrossRefStream(CrossRefStream),
    Invalid(Invalid),
}

/// Object types accepted by the checked lookups. `Dictionary` also accepts
/// the dictionary-backed structures and `Stream` accepts every stream.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ObjectKind {
    Null,
    Boolean,
    Number,
    Name,
    String,
    HexString,
    Reference,
    Array,
    Dictionary,
    Catalog,
    PageTree,
    PageLeaf,
    Stream,
    RawStream,
    ContentStream,
    ObjectStream,
    CrossRefStream,
    Invalid,
}

impl ObjectKind {
    pub fn matches(self, object: &Object) -> bool {
        match self {
            Self::Dictionary => object.as_dictionary().is_some(),
            Self::Stream => object.is_stream(),
            kind => object.kind() == kind,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", latin1(&self.to_bytes()))
    }
}

impl Serialize for Object {
    fn size_in_bytes(&self) -> usize {
        match self {
            Self::Null => KW_NULL.len(),
            Self::Boolean(true) => KW_TRUE.len(),
            Self::Boolean(false) => KW_FALSE.len(),
            Self::Number(number) => number.size_in_bytes(),
            Self::Name(name) => name.size_in_bytes(),
            Self::String(string) => string.size_in_bytes(),
            Self::HexString(string) => string.size_in_bytes(),
            Self::Reference(reference) => reference.size_in_bytes(),
            Self::Array(array) => array.size_in_bytes(),
            Self::Dictionary(dict) => dict.size_in_bytes(),
            Self::Catalog(catalog) => catalog.size_in_bytes(),
            Self::PageTree(tree) => tree.size_in_bytes(),
            Self::PageLeaf(leaf) => leaf.size_in_bytes(),
            Self::RawStream(stream) => stream.size_in_bytes(),
            Self::ContentStream(stream) => stream.size_in_bytes(),
            Self::ObjectStream(stream) => stream.size_in_bytes(),
            Self::CrossRefStream(stream) => stream.size_in_bytes(),
            Self::Invalid(invalid) => invalid.size_in_bytes(),
        }
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        match self {
            Self::Null => copy_keyword(KW_NULL, buffer),
            Self::Boolean(true) => copy_keyword(KW_TRUE, buffer),
            Self::Boolean(false) => copy_keyword(KW_FALSE, buffer),
            Self::Number(number) => number.copy_bytes_into(buffer),
            Self::Name(name) => name.copy_bytes_into(buffer),
            Self::String(string) => string.copy_bytes_into(buffer),
            Self::HexString(string) => string.copy_bytes_into(buffer),
            Self::Reference(reference) => reference.copy_bytes_into(buffer),
            Self::Array(array) => array.copy_bytes_into(buffer),
            Self::Dictionary(dict) => dict.copy_bytes_into(buffer),
            Self::Catalog(catalog) => catalog.copy_bytes_into(buffer),
            Self::PageTree(tree) => tree.copy_bytes_into(buffer),
            Self::PageLeaf(leaf) => leaf.copy_bytes_into(buffer),
            Self::RawStream(stream) => stream.copy_bytes_into(buffer),
            Self::ContentStream(stream) => stream.copy_bytes_into(buffer),
            Self::ObjectStream(stream) => stream.copy_bytes_into(buffer),
            Self::CrossRefStream(stream) => stream.copy_bytes_into(buffer),
            Self::Invalid(invalid) => invalid.copy_bytes_into(buffer),
        }
    }
}

fn copy_keyword(keyword: &str, buffer: &mut Vec<Byte>) -> usize {
    buffer.extend_from_slice(keyword.as_bytes());
    keyword.len()
}

mod convert {
    use super::*;
    use crate::impl_from;

    impl_from!(bool, Boolean, Object);
    impl_from!(Number, Number, Object);
    impl_from!(Name, Name, Object);
    impl_from!(Literal, String, Object);
    impl_from!(Hexadecimal, HexString, Object);
    impl_from!(Reference, Reference, Object);
    impl_from!(Array, Array, Object);
    impl_from!(Dictionary, Dictionary, Object);
    impl_from!(Catalog, Catalog, Object);
    impl_from!(PageTree, PageTree, Object);
    impl_from!(PageLeaf, PageLeaf, Object);
    impl_from!(RawStream, RawStream, Object);
    impl_from!(ContentStream, ContentStream, Object);
    impl_from!(ObjectStream, ObjectStream, Object);
    impl_from!(CrossRefStream, CrossRefStream, Object);
    impl_from!(Invalid, Invalid, Object);

    impl From<f64> for Object {
        fn from(value: f64) -> Self {
            Self::Number(Number::of(value))
        }
    }

    impl From<i64> for Object {
        fn from(value: i64) -> Self {
            Self::Number(Number::of(value as f64))
        }
    }

    impl From<&str> for Object {
        fn from(value: &str) -> Self {
            Self::Name(Name::of(value))
        }
    }

    impl Object {
        pub fn kind(&self) -> ObjectKind {
            match self {
                Self::Null => ObjectKind::Null,
                Self::Boolean(_) => ObjectKind::Boolean,
                Self::Number(_) => ObjectKind::Number,
                Self::Name(_) => ObjectKind::Name,
                Self::String(_) => ObjectKind::String,
                Self::HexString(_) => ObjectKind::HexString,
                Self::Reference(_) => ObjectKind::Reference,
                Self::Array(_) => ObjectKind::Array,
                Self::Dictionary(_) => ObjectKind::Dictionary,
                Self::Catalog(_) => ObjectKind::Catalog,
                Self::PageTree(_) => ObjectKind::PageTree,
                Self::PageLeaf(_) => ObjectKind::PageLeaf,
                Self::RawStream(_) => ObjectKind::RawStream,
                Self::ContentStream(_) => ObjectKind::ContentStream,
                Self::ObjectStream(_) => ObjectKind::ObjectStream,
                Self::CrossRefStream(_) => ObjectKind::CrossRefStream,
                Self::Invalid(_) => ObjectKind::Invalid,
            }
        }

        pub fn is_null(&self) -> bool {
            matches!(self, Self::Null)
        }

        pub fn is_stream(&self) -> bool {
            matches!(
                self,
                Self::RawStream(_)
                    | Self::ContentStream(_)
                    | Self::ObjectStream(_)
                    | Self::CrossRefStream(_)
            )
        }

        pub fn as_bool(&self) -> Option<bool> {
            match self {
                Self::Boolean(value) => Some(*value),
                _ => None,
            }
        }

        pub fn as_number(&self) -> Option<f64> {
            match self {
                Self::Number(number) => Some(number.value()),
                _ => None,
            }
        }

        pub fn as_name(&self) -> Option<&Name> {
            match self {
                Self::Name(name) => Some(name),
                _ => None,
            }
        }

        pub fn as_reference(&self) -> Option<Reference> {
            match self {
                Self::Reference(reference) => Some(*reference),
                _ => None,
            }
        }

        pub fn as_array(&self) -> Option<&Array> {
            match self {
                Self::Array(array) => Some(array),
                _ => None,
            }
        }

        pub fn as_array_mut(&mut self) -> Option<&mut Array> {
            match self {
                Self::Array(array) => Some(array),
                _ => None,
            }
        }

        /// The dictionary of a plain dictionary or of a dictionary-backed
        /// structure. Stream dictionaries are reached through `stream_dict`.
        pub fn as_dictionary(&self) -> Option<&Dictionary> {
            match self {
                Self::Dictionary(dict) => Some(dict),
                Self::Catalog(catalog) => Some(catalog.dict()),
                Self::PageTree(tree) => Some(tree.dict()),
                Self::PageLeaf(leaf) => Some(leaf.dict()),
                _ => None,
            }
        }

        pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
            match self {
                Self::Dictionary(dict) => Some(dict),
                Self::Catalog(catalog) => Some(catalog.dict_mut()),
                Self::PageTree(tree) => Some(tree.dict_mut()),
                Self::PageLeaf(leaf) => Some(leaf.dict_mut()),
                _ => None,
            }
        }

        pub fn stream_dict(&self) -> Option<&Dictionary> {
            match self {
                Self::RawStream(stream) => Some(stream.dict()),
                Self::ContentStream(stream) => Some(stream.dict()),
                Self::ObjectStream(stream) => Some(stream.dict()),
                Self::CrossRefStream(stream) => Some(stream.dict()),
                _ => None,
            }
        }

        pub fn stream_dict_mut(&mut self) -> Option<&mut Dictionary> {
            match self {
                Self::RawStream(stream) => Some(stream.dict_mut()),
                Self::ContentStream(stream) => Some(stream.dict_mut()),
                Self::ObjectStream(stream) => Some(stream.dict_mut()),
                Self::CrossRefStream(stream) => Some(stream.dict_mut()),
                _ => None,
            }
        }

        pub fn as_raw_stream(&self) -> Option<&RawStream> {
            match self {
                Self::RawStream(stream) => Some(stream),
                _ => None,
            }
        }

        pub fn as_catalog(&self) -> Option<&Catalog> {
            match self {
                Self::Catalog(catalog) => Some(catalog),
                _ => None,
            }
        }

        pub fn as_page_tree(&self) -> Option<&PageTree> {
            match self {
                Self::PageTree(tree) => Some(tree),
                _ => None,
            }
        }

        pub fn as_page_tree_mut(&mut self) -> Option<&mut PageTree> {
            match self {
                Self::PageTree(tree) => Some(tree),
                _ => None,
            }
        }

        pub fn as_page_leaf(&self) -> Option<&PageLeaf> {
            match self {
                Self::PageLeaf(leaf) => Some(leaf),
                _ => None,
            }
        }

        pub fn as_page_leaf_mut(&mut self) -> Option<&mut PageLeaf> {
            match self {
                Self::PageLeaf(leaf) => Some(leaf),
                _ => None,
            }
        }

        pub fn as_content_stream_mut(&mut self) -> Option<&mut ContentStream> {
            match self {
                Self::ContentStream(stream) => Some(stream),
                _ => None,
            }
        }
    }
}

mod process {
    use super::*;
    use crate::context::Context;
    use crate::process::filter::error::FilterErr;
    use crate::process::filter::error::FilterErrorCode;
    use crate::process::filter::error::FilterResult;

    impl Object {
        /// The decoded payload of a stream. Parsed streams go through their
        /// filter chain. Generated streams return the contents they were
        /// built from.
        pub fn decode_stream(&self, context: &Context) -> FilterResult<Vec<Byte>> {
            match self {
                Self::RawStream(stream) => stream.decode(context),
                Self::ContentStream(stream) => Ok(stream.unencoded_contents()),
                Self::ObjectStream(stream) => Ok(stream.unencoded_contents()),
                Self::CrossRefStream(stream) => Ok(stream.unencoded_contents()),
                other => Err(FilterErr::new(
                    stringify!(Object),
                    FilterErrorCode::UnexpectedStreamType(other.kind()),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::process::filter::error::FilterErr;
    use crate::process::filter::error::FilterErrorCode;

    #[test]
    fn object_serialize_keywords() {
        assert_eq!(Object::Null.to_bytes(), b"null");
        assert_eq!(Object::from(true).to_string(), "true");
        assert_eq!(Object::from(false).size_in_bytes(), 5);
    }

    #[test]
    fn object_kind_matches() {
        let catalog = Object::Catalog(Catalog::default());
        assert!(ObjectKind::Dictionary.matches(&catalog));
        assert!(ObjectKind::Catalog.matches(&catalog));
        assert!(!ObjectKind::PageTree.matches(&catalog));
        let stream = Object::RawStream(RawStream::of(Dictionary::new(), b"abc".to_vec()));
        assert!(ObjectKind::Stream.matches(&stream));
        assert!(!ObjectKind::Dictionary.matches(&stream));
        assert!(ObjectKind::Null.matches(&Object::Null));
    }

    #[test]
    fn object_decode_stream_unexpected_type() {
        let context = Context::create();
        assert_eq!(
            Object::from(1.0).decode_stream(&context),
            Err(FilterErr::new(
                "Object",
                FilterErrorCode::UnexpectedStreamType(ObjectKind::Number)
            ))
        );
    }
}
