pub(crate) mod ascii_85;
pub(crate) mod ascii_hex;
pub mod error;
pub(crate) mod flate;
pub(crate) mod lzw;
pub(crate) mod run_length;

use ::log::debug;

use self::ascii_85::A85;
use self::ascii_hex::AHx;
use self::error::FilterErr;
use self::error::FilterErrorCode;
use self::error::FilterResult;
use self::flate::Fl;
use self::lzw::Lzw;
use self::run_length::RL;
use crate::context::Context;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::error::ObjectErr;
use crate::object::indirect::stream::KEY_DECODEPARMS;
use crate::object::indirect::stream::KEY_FILTER;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::Byte;
use crate::DECODED_LIMIT;

pub(crate) trait Filter {
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>>;
}

/// REFERENCE: [7.3.8.2 Stream extent, p31-33] and [7.4 Filters, p34]
/// The decoders named by a stream dictionary, in the order they apply. Nothing
/// is decoded until `decode` is called.
#[derive(Debug, PartialEq, Clone)]
pub struct FilteringChain(Vec<Filtering>);

/// REFERENCE: [Table 6: Standard filters, p35-36]
/// NOTE: This structure is named `Filtering` to avoid conflicts with the
/// `Filter` trait.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Filtering {
    AHx(AHx),
    A85(A85),
    Lzw(Lzw),
    Fl(Fl),
    RL(RL),
}

impl Filter for Filtering {
    fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
        match self {
            Self::AHx(filtering) => filtering.decode(bytes),
            Self::A85(filtering) => filtering.decode(bytes),
            Self::Lzw(filtering) => filtering.decode(bytes),
            Self::Fl(filtering) => filtering.decode(bytes),
            Self::RL(filtering) => filtering.decode(bytes),
        }
    }
}

mod convert {
    use super::*;

    impl Filtering {
        fn new(
            name: &Name,
            decode_parms: Option<&Dictionary>,
            context: &Context,
        ) -> FilterResult<Self> {
            // REFERENCE: [Table 92 — Additional abbreviations in an inline
            // image object, p269]
            match name.as_bytes() {
                b"AHx" | b"ASCIIHexDecode" => Ok(Self::AHx(AHx)),
                b"A85" | b"ASCII85Decode" => Ok(Self::A85(A85)),
                b"LZW" | b"LZWDecode" => Ok(Self::Lzw(Lzw::new(decode_parms, context)?)),
                b"Fl" | b"FlateDecode" => Ok(Self::Fl(Fl)),
                b"RL" | b"RunLengthDecode" => Ok(Self::RL(RL)),
                _ => Err(FilterErr::new(
                    stringify!(Filtering),
                    FilterErrorCode::Unsupported(name.decode_text()),
                )),
            }
        }
    }

    impl FilteringChain {
        /// Read `/Filter` and `/DecodeParms` from a stream dictionary. A
        /// missing `/Filter` yields an empty chain.
        pub fn new(dict: &Dictionary, context: &Context) -> FilterResult<Self> {
            let filter = dict.lookup(KEY_FILTER, context, &[])?;
            let decode_parms = dict.lookup(KEY_DECODEPARMS, context, &[])?;
            let chain = match filter {
                None => Vec::new(),
                Some(Object::Name(name)) => {
                    let decode_parms = decode_parms.and_then(Object::as_dictionary);
                    vec![Filtering::new(name, decode_parms, context)?]
                }
                Some(Object::Array(names)) => {
                    let mut chain = Vec::with_capacity(names.size());
                    for index in 0..names.size() {
                        let name = names
                            .lookup(index, context, &[ObjectKind::Name])?
                            .and_then(Object::as_name);
                        let Some(name) = name else {
                            continue;
                        };
                        let parms = match decode_parms {
                            Some(Object::Array(parms)) => parms
                                .lookup_maybe(index, context, &[ObjectKind::Dictionary])?
                                .and_then(Object::as_dictionary),
                            _ => None,
                        };
                        chain.push(Filtering::new(name, parms, context)?);
                    }
                    chain
                }
                Some(other) => {
                    return Err(FilterErr::new(
                        stringify!(FilteringChain),
                        FilterErrorCode::Object(ObjectErr::UnexpectedType {
                            expected: vec![ObjectKind::Name, ObjectKind::Array],
                            actual: Some(other.kind()),
                        }),
                    ))
                }
            };
            Ok(Self(chain))
        }

        pub fn len(&self) -> usize {
            self.0.len()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }
}

mod process {
    use super::*;

    impl FilteringChain {
        /// Run `bytes` through every decoder in turn.
        pub fn decode(&self, bytes: &[Byte]) -> FilterResult<Vec<Byte>> {
            let mut decoded = bytes.to_vec();
            for (count, filtering) in self.0.iter().enumerate() {
                decoded = filtering.decode(&decoded)?;
                if decoded.len() > DECODED_LIMIT {
                    return Err(FilterErr::new(
                        stringify!(FilteringChain),
                        FilterErrorCode::TooLarge(count + 1),
                    ));
                }
            }
            debug!(
                "Decoded {} bytes into {} bytes using {} filters",
                bytes.len(),
                decoded.len(),
                self.0.len()
            );
            Ok(decoded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::array::Array;
    use crate::object::indirect::stream::deflate;

    #[test]
    fn filtering_chain_empty() {
        let context = Context::create();
        let chain = FilteringChain::new(&Dictionary::new(), &context).unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.decode(b"raw"), Ok(b"raw".to_vec()));
    }

    #[test]
    fn filtering_chain_array() {
        let context = Context::create();
        let mut dict = Dictionary::new();
        let filters: Array = [Name::of("ASCIIHexDecode"), Name::of("FlateDecode")]
            .into_iter()
            .map(Object::from)
            .collect();
        dict.set("Filter", filters);
        let chain = FilteringChain::new(&dict, &context).unwrap();
        assert_eq!(chain.len(), 2);

        let encoded: String = deflate(b"Hello, chain")
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect();
        let encoded = format!("{}>", encoded);
        assert_eq!(chain.decode(encoded.as_bytes()), Ok(b"Hello, chain".to_vec()));
    }

    #[test]
    fn filtering_chain_through_reference() {
        let mut context = Context::create();
        let filter = context.register(Name::of("RunLengthDecode"));
        let mut dict = Dictionary::new();
        dict.set("Filter", filter);
        let chain = FilteringChain::new(&dict, &context).unwrap();
        assert_eq!(
            chain.decode(&[0x02, b'a', b'b', b'c', 0xFE, b'z', 0x80]),
            Ok(b"abczzz".to_vec())
        );
    }

    #[test]
    fn filtering_chain_invalid() {
        let context = Context::create();
        let mut dict = Dictionary::new();
        dict.set("Filter", Name::of("JBIG2Decode"));
        assert_eq!(
            FilteringChain::new(&dict, &context),
            Err(FilterErr::new(
                "Filtering",
                FilterErrorCode::Unsupported("JBIG2Decode".to_string())
            ))
        );

        let mut dict = Dictionary::new();
        dict.set("Filter", 1.0);
        assert!(matches!(
            FilteringChain::new(&dict, &context).map_err(|err| err.code().clone()),
            Err(FilterErrorCode::Object(_))
        ));
    }
}
