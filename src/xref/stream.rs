use ::std::fmt::Debug;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use super::KEY_INDEX;
use super::KEY_W;
use super::VAL_XREF;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::flate_dict;
use crate::object::indirect::stream::ContentsCache;
use crate::object::indirect::stream::FlateStream;
use crate::object::indirect::stream::KEY_TYPE;
use crate::object::Object;
use crate::object::Serialize;
use crate::parse::num::byte_width;
use crate::Byte;
use crate::GenerationNumber;
use crate::ObjectNumber;
use crate::Offset;

/// REFERENCE: [7.5.8.3 Cross-reference stream data, p67-68]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CrossRefEntry {
    /// Type 0
    Deleted {
        reference: Reference,
        next_free: ObjectNumber,
    },
    /// Type 1
    Uncompressed { reference: Reference, offset: Offset },
    /// Type 2. Objects in object streams always have generation number zero.
    Compressed {
        reference: Reference,
        object_stream: Reference,
        index: usize,
    },
}

impl CrossRefEntry {
    pub fn reference(&self) -> Reference {
        match self {
            Self::Deleted { reference, .. }
            | Self::Uncompressed { reference, .. }
            | Self::Compressed { reference, .. } => *reference,
        }
    }

    /// The three fields of the binary entry.
    fn fields(&self) -> [u64; 3] {
        match self {
            Self::Deleted {
                reference,
                next_free,
            } => [0, *next_free, u64::from(reference.generation_number())],
            Self::Uncompressed { reference, offset } => {
                [1, *offset as u64, u64::from(reference.generation_number())]
            }
            Self::Compressed {
                object_stream,
                index,
                ..
            } => [2, object_stream.object_number(), *index as u64],
        }
    }
}

/// REFERENCE: [7.5.8 Cross-reference streams, p65-68]
/// A cross-reference table stored as a stream. `/W` and `/Index` follow the
/// entries as they are added. Entries must be added in ascending
/// object-number order.
#[derive(PartialEq, Clone)]
pub struct CrossRefStream {
    dict: Dictionary,
    entries: Vec<CrossRefEntry>,
    widths: [usize; 3],
    // Pairs of first object number and length
    index: Vec<(ObjectNumber, usize)>,
    encode: bool,
    cache: ContentsCache,
}

impl Debug for CrossRefStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CrossRefStream")
            .field("dict", &self.dict)
            .field("entries", &self.entries.len())
            .field("widths", &self.widths)
            .field("encode", &self.encode)
            .finish()
    }
}

impl FlateStream for CrossRefStream {
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
        let entry_len: usize = self.widths.iter().sum();
        let mut buffer = Vec::with_capacity(entry_len * self.entries.len());
        for entry in self.entries.iter() {
            for (field, width) in entry.fields().into_iter().zip(self.widths) {
                let bytes = field.to_be_bytes();
                buffer.extend_from_slice(&bytes[bytes.len() - width..]);
            }
        }
        buffer
    }
}

impl Serialize for CrossRefStream {
    fn size_in_bytes(&self) -> usize {
        self.flate_size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        self.flate_copy_bytes_into(buffer)
    }
}

mod convert {
    use super::*;

    impl CrossRefStream {
        /// A stream over the trailer entries in `dict`, starting with the
        /// head of the free list.
        pub fn create(dict: Dictionary, encode: bool) -> Self {
            let mut stream = Self {
                dict: flate_dict(dict, encode),
                entries: Vec::new(),
                widths: [1; 3],
                index: Vec::new(),
                encode,
                cache: ContentsCache::default(),
            };
            stream.dict.set(KEY_TYPE, Name::of(VAL_XREF));
            stream.add_deleted_entry(Reference::of(0, GenerationNumber::MAX), 0);
            stream
        }

        pub fn dict(&self) -> &Dictionary {
            &self.dict
        }

        pub fn dict_mut(&mut self) -> &mut Dictionary {
            &mut self.dict
        }

        pub fn entries(&self) -> &[CrossRefEntry] {
            &self.entries
        }

        /// The packed entries, before any encoding.
        pub fn unencoded_contents(&self) -> Vec<Byte> {
            FlateStream::unencoded_contents(self)
        }
    }
}

mod process {
    use super::*;

    impl CrossRefStream {
        pub fn add_deleted_entry(&mut self, reference: Reference, next_free: ObjectNumber) {
            self.add_entry(CrossRefEntry::Deleted {
                reference,
                next_free,
            });
        }

        pub fn add_uncompressed_entry(&mut self, reference: Reference, offset: Offset) {
            self.add_entry(CrossRefEntry::Uncompressed { reference, offset });
        }

        pub fn add_compressed_entry(
            &mut self,
            reference: Reference,
            object_stream: Reference,
            index: usize,
        ) {
            self.add_entry(CrossRefEntry::Compressed {
                reference,
                object_stream,
                index,
            });
        }

        fn add_entry(&mut self, entry: CrossRefEntry) {
            for (width, field) in self.widths.iter_mut().zip(entry.fields()) {
                *width = (*width).max(byte_width(field));
            }
            let object_number = entry.reference().object_number();
            match self.index.last_mut() {
                Some((first, length))
                    if object_number.checked_sub(*first) == Some(*length as u64) =>
                {
                    *length += 1;
                }
                _ => self.index.push((object_number, 1)),
            }
            self.entries.push(entry);
            self.cache.invalidate();
            self.update_dict();
        }

        fn update_dict(&mut self) {
            let widths: Array = self
                .widths
                .iter()
                .map(|width| Object::from(*width as f64))
                .collect();
            let index: Array = self
                .index
                .iter()
                .flat_map(|(first, length)| {
                    [Object::from(*first as f64), Object::from(*length as f64)]
                })
                .collect();
            self.dict.set(KEY_W, widths);
            self.dict.set(KEY_INDEX, index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_ref_stream_create() {
        let stream = CrossRefStream::create(Dictionary::new(), false);
        assert_eq!(
            stream.dict().get("Type"),
            Some(&Object::from(Name::of("XRef")))
        );
        assert_eq!(stream.unencoded_contents(), vec![0x00, 0x00, 0xFF, 0xFF]);
        assert_eq!(
            stream.dict().get("W").map(Object::to_string),
            Some("[ 1 1 2 ]".to_string())
        );
        assert_eq!(
            stream.dict().get("Index").map(Object::to_string),
            Some("[ 0 1 ]".to_string())
        );
    }

    #[test]
    fn cross_ref_stream_entries() {
        let mut stream = CrossRefStream::create(Dictionary::new(), false);
        stream.add_uncompressed_entry(Reference::of(1, 0), 15);
        stream.add_compressed_entry(Reference::of(2, 0), Reference::of(5, 0), 0);
        stream.add_compressed_entry(Reference::of(3, 0), Reference::of(5, 0), 1);
        stream.add_uncompressed_entry(Reference::of(5, 0), 300);
        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0xFF, 0xFF,
            0x01, 0x00, 0x0F, 0x00, 0x00,
            0x02, 0x00, 0x05, 0x00, 0x00,
            0x02, 0x00, 0x05, 0x00, 0x01,
            0x01, 0x01, 0x2C, 0x00, 0x00,
        ];
        assert_eq!(stream.unencoded_contents(), expected);
        assert_eq!(
            stream.dict().get("W").map(Object::to_string),
            Some("[ 1 2 2 ]".to_string())
        );
        assert_eq!(
            stream.dict().get("Index").map(Object::to_string),
            Some("[ 0 4 5 1 ]".to_string())
        );
        assert_eq!(stream.entries().len(), 5);
    }

    #[test]
    fn cross_ref_stream_encoded() {
        let mut stream = CrossRefStream::create(Dictionary::new(), true);
        stream.add_uncompressed_entry(Reference::of(1, 0), 15);
        let bytes = stream.to_bytes();
        assert_eq!(bytes.len(), stream.size_in_bytes());
        assert!(bytes.starts_with(b"<<\n/Filter /FlateDecode\n/Type /XRef\n"));
    }
}
