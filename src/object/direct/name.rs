use ::std::collections::HashMap;
use ::std::fmt::Debug;
use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;
use ::std::hash::Hash;
use ::std::hash::Hasher;
use ::std::sync::Arc;
use ::std::sync::Mutex;
use ::std::sync::OnceLock;
use ::std::sync::PoisonError;

use crate::fmt::latin1;
use crate::object::Serialize;
use crate::parse::character_set::is_regular_name_char;
use crate::parse::num::hex_val;
use crate::Byte;

#[derive(Debug)]
struct NameEntry {
    decoded: Vec<Byte>,
    encoded: String,
}

type NamePool = Mutex<HashMap<Vec<Byte>, Arc<NameEntry>>>;

static POOL: OnceLock<NamePool> = OnceLock::new();

/// REFERENCE: [7.3.5 Name objects, p27-28]
/// Names are interned by their decoded bytes, so `/F#6fo` and `/Foo` share one
/// entry and compare equal by identity.
#[derive(Clone)]
pub struct Name(Arc<NameEntry>);

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.encoded)
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.encoded)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Name {}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0.decoded == other.as_bytes()
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.decoded.hash(state);
    }
}

impl AsRef<[Byte]> for Name {
    fn as_ref(&self) -> &[Byte] {
        &self.0.decoded
    }
}

impl Serialize for Name {
    fn size_in_bytes(&self) -> usize {
        self.0.encoded.len()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        buffer.extend_from_slice(self.0.encoded.as_bytes());
        self.0.encoded.len()
    }
}

mod convert {
    use super::*;

    impl Name {
        pub fn of(name: &str) -> Self {
            Self::from_bytes(name.as_bytes())
        }

        /// Intern the name spelled by `raw`, without its leading solidus.
        /// `#XX` escapes are decoded first.
        pub fn from_bytes(raw: &[Byte]) -> Self {
            let decoded = decode_name(raw);
            let pool = POOL.get_or_init(Default::default);
            let mut pool = pool.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = pool.entry(decoded).or_insert_with_key(|decoded| {
                Arc::new(NameEntry {
                    encoded: encode_name(decoded),
                    decoded: decoded.clone(),
                })
            });
            Self(Arc::clone(entry))
        }

        /// The decoded bytes of the name.
        pub fn as_bytes(&self) -> &[Byte] {
            &self.0.decoded
        }

        /// The name as written into a file, including the leading solidus.
        pub fn as_str(&self) -> &str {
            &self.0.encoded
        }

        pub fn decode_text(&self) -> String {
            latin1(&self.0.decoded)
        }
    }

    impl From<&str> for Name {
        fn from(name: &str) -> Self {
            Self::of(name)
        }
    }
}

/// Replace each `#` followed by two hexadecimal digits with the byte they
/// spell. Other number signs are kept as they are.
fn decode_name(raw: &[Byte]) -> Vec<Byte> {
    let mut decoded = Vec::with_capacity(raw.len());
    let mut idx = 0;
    while idx < raw.len() {
        let byte = raw[idx];
        if byte == b'#' {
            let high = raw.get(idx + 1).copied().and_then(hex_val);
            let low = raw.get(idx + 2).copied().and_then(hex_val);
            if let (Some(high), Some(low)) = (high, low) {
                decoded.push(high << 4 | low);
                idx += 3;
                continue;
            }
        }
        decoded.push(byte);
        idx += 1;
    }
    decoded
}

fn encode_name(decoded: &[Byte]) -> String {
    let mut encoded = String::with_capacity(decoded.len() + 1);
    encoded.push('/');
    for &byte in decoded {
        if is_regular_name_char(byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("#{:02X}", byte));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_interning() {
        let name = Name::of("Foo");
        assert!(Arc::ptr_eq(&name.0, &Name::of("Foo").0));
        assert!(Arc::ptr_eq(&name.0, &Name::of("F#6fo").0));
        assert!(Arc::ptr_eq(&name.0, &Name::of("F#6Fo").0));
        assert_ne!(name, Name::of("Bar"));
        assert!(name == *"Foo");
    }

    #[test]
    fn name_encoding() {
        assert_eq!(Name::of("Type").as_str(), "/Type");
        assert_eq!(Name::of("A B").as_str(), "/A#20B");
        assert_eq!(Name::of("A#20B").as_str(), "/A#20B");
        assert_eq!(Name::of("paired()parentheses").as_str(), "/paired#28#29parentheses");
        assert_eq!(Name::of("The_Key_of_F#23_Minor").as_str(), "/The_Key_of_F#23_Minor");
        assert_eq!(Name::of("Lime Green").as_bytes(), b"Lime Green");
        assert_eq!(Name::of("\n").to_string(), "/#0A");
    }

    #[test]
    fn name_malformed_escape() {
        // A number sign not followed by two hexadecimal digits stands for itself
        let name = Name::of("A#G1");
        assert_eq!(name.as_bytes(), b"A#G1");
        assert_eq!(name.as_str(), "/A#23G1");
    }

    #[test]
    fn name_serialize() {
        let name = Name::of("MediaBox");
        assert_eq!(name.size_in_bytes(), 9);
        assert_eq!(name.to_bytes(), b"/MediaBox");
    }
}
