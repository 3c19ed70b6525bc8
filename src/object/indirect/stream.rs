use ::flate2::write::ZlibEncoder;
use ::flate2::Compression;
use ::log::error;
use ::std::borrow::Cow;
use ::std::cell::OnceCell;
use ::std::fmt::Debug;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;
use ::std::io::Write;

use crate::fmt::debug_bytes;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::direct::numeric::Number;
use crate::object::Object;
use crate::object::Serialize;
use crate::Byte;

pub(crate) const KEY_LENGTH: &str = "Length";
pub(crate) const KEY_FILTER: &str = "Filter";
pub(crate) const KEY_DECODEPARMS: &str = "DecodeParms";
pub(crate) const KEY_TYPE: &str = "Type";
pub(crate) const VAL_FLATE_DECODE: &str = "FlateDecode";

const KW_STREAM_START: &[Byte] = b"\nstream\n";
const KW_STREAM_END: &[Byte] = b"\nendstream";

/// REFERENCE: [7.3.8 Stream objects, p31]
/// A stream as read from a file or built from already encoded bytes. The
/// contents are kept encoded.
#[derive(PartialEq, Clone)]
pub struct RawStream {
    pub(crate) dict: Dictionary,
    contents: Vec<Byte>,
}

impl Debug for RawStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "RawStream({:?}, {})",
            self.dict,
            debug_bytes(&self.contents)
        )
    }
}

impl Serialize for RawStream {
    fn size_in_bytes(&self) -> usize {
        stream_size_in_bytes(&self.dict, self.contents.len())
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        copy_stream_into(&self.dict, &self.contents, buffer)
    }
}

/// The dictionary of a stream with `/Length` matching `contents_size`.
fn with_length(dict: &Dictionary, contents_size: usize) -> Cow<'_, Dictionary> {
    let length = contents_size as f64;
    match dict.get_preserving_null(KEY_LENGTH) {
        Some(Object::Number(number)) if number.value() == length => Cow::Borrowed(dict),
        _ => {
            let mut dict = dict.clone();
            dict.set(Name::of(KEY_LENGTH), Number::of(length));
            Cow::Owned(dict)
        }
    }
}

/// The size of `dict`, with its `/Length` updated, followed by the stream
/// keywords enclosing `contents_size` bytes.
pub(crate) fn stream_size_in_bytes(dict: &Dictionary, contents_size: usize) -> usize {
    with_length(dict, contents_size).size_in_bytes()
        + KW_STREAM_START.len()
        + contents_size
        + KW_STREAM_END.len()
}

pub(crate) fn copy_stream_into(dict: &Dictionary, contents: &[Byte], buffer: &mut Vec<Byte>) -> usize {
    let initial_len = buffer.len();
    with_length(dict, contents.len()).copy_bytes_into(buffer);
    buffer.extend_from_slice(KW_STREAM_START);
    buffer.extend_from_slice(contents);
    buffer.extend_from_slice(KW_STREAM_END);
    buffer.len() - initial_len
}

/// Compress `bytes` into a zlib stream.
pub(crate) fn deflate(bytes: &[Byte]) -> Vec<Byte> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing into a vector does not fail
    match encoder.write_all(bytes).and_then(|()| encoder.finish()) {
        Ok(deflated) => deflated,
        Err(err) => {
            error!("Failed to deflate stream contents: {}", err);
            bytes.to_vec()
        }
    }
}

/// Lazily computed encoded contents of a generated stream. It does not take
/// part in comparisons.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContentsCache(OnceCell<Vec<Byte>>);

impl PartialEq for ContentsCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl ContentsCache {
    pub(crate) fn access(&self, compute: impl FnOnce() -> Vec<Byte>) -> &[Byte] {
        self.0.get_or_init(compute)
    }

    pub(crate) fn invalidate(&mut self) {
        self.0.take();
    }
}

/// Streams generated from a structured form, deflated on first access when
/// `encode` is set.
pub(crate) trait FlateStream {
    fn dict(&self) -> &Dictionary;

    fn encode(&self) -> bool;

    fn cache(&self) -> &ContentsCache;

    fn unencoded_contents(&self) -> Vec<Byte>;

    fn contents(&self) -> &[Byte] {
        self.cache().access(|| {
            let unencoded = self.unencoded_contents();
            if self.encode() {
                deflate(&unencoded)
            } else {
                unencoded
            }
        })
    }

    fn flate_size_in_bytes(&self) -> usize {
        stream_size_in_bytes(self.dict(), self.contents().len())
    }

    fn flate_copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        copy_stream_into(self.dict(), self.contents(), buffer)
    }
}

/// Mark `dict` as deflated when `encode` is set.
pub(crate) fn flate_dict(mut dict: Dictionary, encode: bool) -> Dictionary {
    if encode {
        dict.set(Name::of(KEY_FILTER), Name::of(VAL_FLATE_DECODE));
    }
    dict
}

mod convert {
    use super::*;

    impl RawStream {
        pub fn of(dict: Dictionary, contents: impl Into<Vec<Byte>>) -> Self {
            Self {
                dict,
                contents: contents.into(),
            }
        }

        pub fn dict(&self) -> &Dictionary {
            &self.dict
        }

        pub fn dict_mut(&mut self) -> &mut Dictionary {
            &mut self.dict
        }

        /// The contents as stored, still encoded.
        pub fn contents(&self) -> &[Byte] {
            &self.contents
        }
    }
}

mod process {
    use super::*;
    use crate::context::Context;
    use crate::process::filter::error::FilterResult;
    use crate::process::filter::FilteringChain;

    impl RawStream {
        /// Run the contents through the filters named by `/Filter`.
        pub fn decode(&self, context: &Context) -> FilterResult<Vec<Byte>> {
            FilteringChain::new(&self.dict, context)?.decode(&self.contents)
        }
    }
}
