use ::std::fmt::Debug;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::direct::numeric::Number;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::flate_dict;
use crate::object::indirect::stream::ContentsCache;
use crate::object::indirect::stream::FlateStream;
use crate::object::indirect::stream::KEY_TYPE;
use crate::object::Object;
use crate::object::Serialize;
use crate::Byte;
use crate::ObjectNumber;

pub(crate) const VAL_OBJ_STM: &str = "ObjStm";
pub(crate) const KEY_N: &str = "N";
pub(crate) const KEY_FIRST: &str = "First";

/// REFERENCE: [7.5.7 Object streams, p59-60]
/// Indirect objects packed into one stream. The contents start with pairs of
/// object numbers and offsets relative to `/First`, followed by the objects,
/// each terminated by a newline.
#[derive(PartialEq, Clone)]
pub struct ObjectStream {
    dict: Dictionary,
    objects: Vec<(Reference, Object)>,
    offsets: Vec<(ObjectNumber, usize)>,
    offsets_string: String,
    encode: bool,
    cache: ContentsCache,
}

impl Debug for ObjectStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ObjectStream")
            .field("dict", &self.dict)
            .field("offsets", &self.offsets)
            .field("encode", &self.encode)
            .finish()
    }
}

impl FlateStream for ObjectStream {
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
        let size = self.offsets_string.len()
            + self
                .objects
                .iter()
                .map(|(_, object)| object.size_in_bytes() + 1)
                .sum::<usize>();
        let mut buffer = Vec::with_capacity(size);
        buffer.extend_from_slice(self.offsets_string.as_bytes());
        for (_, object) in self.objects.iter() {
            object.copy_bytes_into(&mut buffer);
            buffer.push(b'\n');
        }
        buffer
    }
}

impl Serialize for ObjectStream {
    fn size_in_bytes(&self) -> usize {
        self.flate_size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        self.flate_copy_bytes_into(buffer)
    }
}

mod convert {
    use super::*;

    impl ObjectStream {
        pub fn with_objects(objects: Vec<(Reference, Object)>, encode: bool) -> Self {
            let offsets = compute_offsets(&objects);
            let offsets_string: String = offsets
                .iter()
                .map(|(object_number, offset)| format!("{} {} ", object_number, offset))
                .collect();
            let mut dict = flate_dict(Dictionary::new(), encode);
            dict.set(KEY_TYPE, Name::of(VAL_OBJ_STM));
            dict.set(KEY_N, Number::of(objects.len() as f64));
            dict.set(KEY_FIRST, Number::of(offsets_string.len() as f64));
            Self {
                dict,
                objects,
                offsets,
                offsets_string,
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

        pub fn objects(&self) -> &[(Reference, Object)] {
            &self.objects
        }

        pub fn objects_count(&self) -> usize {
            self.objects.len()
        }

        /// The header followed by the objects, before any encoding.
        pub fn unencoded_contents(&self) -> Vec<Byte> {
            FlateStream::unencoded_contents(self)
        }
    }

    /// Each object starts after the previous one and its newline.
    fn compute_offsets(objects: &[(Reference, Object)]) -> Vec<(ObjectNumber, usize)> {
        let mut offset = 0;
        objects
            .iter()
            .map(|(reference, object)| {
                let entry = (reference.object_number(), offset);
                offset += object.size_in_bytes() + 1;
                entry
            })
            .collect()
    }
}
