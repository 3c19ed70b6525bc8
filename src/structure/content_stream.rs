use ::std::fmt::Debug;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::direct::dictionary::Dictionary;
use crate::object::indirect::stream::flate_dict;
use crate::object::indirect::stream::ContentsCache;
use crate::object::indirect::stream::FlateStream;
use crate::object::operator::Operator;
use crate::object::Serialize;
use crate::Byte;

/// REFERENCE: [7.8.2 Content streams, p97]
/// A content stream built from operators, one per line.
#[derive(PartialEq, Clone)]
pub struct ContentStream {
    dict: Dictionary,
    operators: Vec<Operator>,
    encode: bool,
    cache: ContentsCache,
}

impl Debug for ContentStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContentStream")
            .field("dict", &self.dict)
            .field("operators", &self.operators.len())
            .field("encode", &self.encode)
            .finish()
    }
}

impl FlateStream for ContentStream {
    fn dict(&self) -> &Dictionary {
        &self.dict
    }

    fn encode(&self) -> bool {
        self.encode
    }

    fn cache(&self) -> &ContentsCache {
        &self.cache
    }

    fn unencoded_contents(&self) -> Vec<Byte> {
        let size = self
            .operators
            .iter()
            .map(|operator| operator.size_in_bytes() + 1)
            .sum();
        let mut buffer = Vec::with_capacity(size);
        for operator in self.operators.iter() {
            operator.copy_bytes_into(&mut buffer);
            buffer.push(b'\n');
        }
        buffer
    }
}

impl Serialize for ContentStream {
    fn size_in_bytes(&self) -> usize {
        self.flate_size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        self.flate_copy_bytes_into(buffer)
    }
}

mod convert {
    use super::*;

    impl ContentStream {
        /// With `encode`, the operators are deflated when the stream is
        /// serialized and `/Filter /FlateDecode` is added to `dict`.
        pub fn of(dict: Dictionary, operators: Vec<Operator>, encode: bool) -> Self {
            Self {
                dict: flate_dict(dict, encode),
                operators,
                encode,
                cache: ContentsCache::default(),
            }
        }

        pub fn dict(&self) -> &Dictionary {
            &self.dict
        }

        pub fn dict_mut(&mut self) -> &mut Dictionary {
            &mut self.dict
        }

        pub fn operators(&self) -> &[Operator] {
            &self.operators
        }

        pub fn push(&mut self, operators: impl IntoIterator<Item = Operator>) {
            self.operators.extend(operators);
            self.cache.invalidate();
        }

        /// The operators as text, before any encoding.
        pub fn unencoded_contents(&self) -> Vec<Byte> {
            FlateStream::unencoded_contents(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::name::Name;
    use crate::object::operator::OperatorArg;
    use crate::object::operator::POP_GRAPHICS_STATE;
    use crate::object::operator::PUSH_GRAPHICS_STATE;
    use crate::object::Object;

    #[test]
    fn content_stream_unencoded() {
        let mut stream = ContentStream::of(
            Dictionary::new(),
            vec![Operator::of(PUSH_GRAPHICS_STATE, Vec::new())],
            false,
        );
        let expected = b"<<\n/Length 2\n>>\nstream\nq\n\nendstream";
        assert_eq!(stream.size_in_bytes(), expected.len());
        assert_eq!(stream.to_bytes(), expected);

        stream.push([
            Operator::of(
                "Tf",
                vec![Name::of("F1").into(), OperatorArg::Raw("12".to_string())],
            ),
            Operator::of(POP_GRAPHICS_STATE, Vec::new()),
        ]);
        assert_eq!(stream.unencoded_contents(), b"q\n/F1 12 Tf\nQ\n");
        assert_eq!(stream.contents(), b"q\n/F1 12 Tf\nQ\n");
    }

    #[test]
    fn content_stream_encoded() {
        let stream = ContentStream::of(
            Dictionary::new(),
            vec![Operator::of(PUSH_GRAPHICS_STATE, Vec::new())],
            true,
        );
        assert_eq!(
            stream.dict().get("Filter"),
            Some(&Object::from(Name::of("FlateDecode")))
        );
        let size = stream.size_in_bytes();
        let bytes = stream.to_bytes();
        assert_eq!(bytes.len(), size);
        assert!(bytes.starts_with(b"<<\n/Filter /FlateDecode\n/Length "));
        assert!(bytes.ends_with(b"\nendstream"));
    }
}
