use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use super::name::Name;
use crate::context::Context;
use crate::fmt::latin1;
use crate::object::error::ObjectResult;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::object::Serialize;
use crate::Byte;

/// REFERENCE: [7.3.7 Dictionary objects, p30]
/// Entries keep their insertion order, which is also the order they are
/// written in.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct Dictionary(Vec<(Name, Object)>);

impl Display for Dictionary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", latin1(&self.to_bytes()))
    }
}

impl Serialize for Dictionary {
    fn size_in_bytes(&self) -> usize {
        // `<<\n` and `>>`, then a space and a newline per entry
        5 + self
            .0
            .iter()
            .map(|(key, value)| key.size_in_bytes() + value.size_in_bytes() + 2)
            .sum::<usize>()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        let initial_len = buffer.len();
        buffer.extend_from_slice(b"<<\n");
        for (key, value) in self.0.iter() {
            key.copy_bytes_into(buffer);
            buffer.push(b' ');
            value.copy_bytes_into(buffer);
            buffer.push(b'\n');
        }
        buffer.extend_from_slice(b">>");
        buffer.len() - initial_len
    }
}

mod convert {
    use super::*;

    impl Dictionary {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn size(&self) -> usize {
            self.0.len()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        pub fn keys(&self) -> impl Iterator<Item = &Name> {
            self.0.iter().map(|(key, _)| key)
        }

        pub fn values(&self) -> impl Iterator<Item = &Object> {
            self.0.iter().map(|(_, value)| value)
        }

        pub fn entries(&self) -> &[(Name, Object)] {
            &self.0
        }

        /// Replace the value of `key` in place, or append a new entry.
        pub fn set(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
            let key = key.into();
            let value = value.into();
            match self.0.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, existing)) => *existing = value,
                None => self.0.push((key, value)),
            }
        }

        /// The value of `key`, treating an explicit `null` as absent.
        pub fn get(&self, key: impl AsRef<[Byte]>) -> Option<&Object> {
            self.get_preserving_null(key)
                .filter(|value| !value.is_null())
        }

        pub fn get_preserving_null(&self, key: impl AsRef<[Byte]>) -> Option<&Object> {
            let key = key.as_ref();
            self.0
                .iter()
                .find(|(existing, _)| existing.as_bytes() == key)
                .map(|(_, value)| value)
        }

        pub fn get_mut(&mut self, key: impl AsRef<[Byte]>) -> Option<&mut Object> {
            let key = key.as_ref();
            self.0
                .iter_mut()
                .find(|(existing, _)| existing.as_bytes() == key)
                .map(|(_, value)| value)
        }

        pub fn has(&self, key: impl AsRef<[Byte]>) -> bool {
            self.get(key).is_some()
        }

        /// Remove `key`, reporting whether it was present.
        pub fn delete(&mut self, key: impl AsRef<[Byte]>) -> bool {
            let key = key.as_ref();
            let len = self.0.len();
            self.0.retain(|(existing, _)| existing.as_bytes() != key);
            self.0.len() != len
        }
    }

    impl FromIterator<(Name, Object)> for Dictionary {
        fn from_iter<T: IntoIterator<Item = (Name, Object)>>(iter: T) -> Self {
            let mut dict = Self::new();
            for (key, value) in iter {
                dict.set(key, value);
            }
            dict
        }
    }
}

mod process {
    use super::*;

    impl Dictionary {
        /// Resolve the value of `key` through `context`. When `kinds` is not
        /// empty, the resolved value must match one of them.
        pub fn lookup<'a>(
            &'a self,
            key: impl AsRef<[Byte]>,
            context: &'a Context,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            let preserve_null = kinds.contains(&ObjectKind::Null);
            let value = if preserve_null {
                self.get_preserving_null(key)
            } else {
                self.get(key)
            };
            let value = context.resolve(value, kinds)?;
            Ok(value.filter(|value| preserve_null || !value.is_null()))
        }

        /// Like `lookup`, except that missing values are not an error.
        pub fn lookup_maybe<'a>(
            &'a self,
            key: impl AsRef<[Byte]>,
            context: &'a Context,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            let preserve_null = kinds.contains(&ObjectKind::Null);
            let value = if preserve_null {
                self.get_preserving_null(key)
            } else {
                self.get(key)
            };
            context.resolve_maybe(value, kinds)
        }

        /// A key of the form `tag-NNNNNNNNNN` not yet used in the dictionary.
        pub fn unique_key(&self, tag: &str, context: &mut Context) -> Name {
            loop {
                let key = Name::of(&context.add_random_suffix(tag, 10));
                if !self.keys().any(|existing| *existing == key) {
                    return key;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::numeric::Number;
    use crate::object::error::ObjectErr;
    use crate::object::indirect::reference::Reference;

    fn sample() -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Name::of("Page"));
        dict.set("Rotate", Number::of(90.0));
        dict.set("Missing", Object::Null);
        dict
    }

    #[test]
    fn dictionary_serialize() {
        let dict = sample();
        let expected = b"<<\n/Type /Page\n/Rotate 90\n/Missing null\n>>";
        assert_eq!(dict.size_in_bytes(), expected.len());
        assert_eq!(dict.to_bytes(), expected);
        assert_eq!(Dictionary::new().to_bytes(), b"<<\n>>");
    }

    #[test]
    fn dictionary_set_replaces_in_place() {
        let mut dict = sample();
        dict.set("Type", Name::of("Pages"));
        let keys: Vec<_> = dict.keys().map(|key| key.as_str().to_string()).collect();
        assert_eq!(keys, vec!["/Type", "/Rotate", "/Missing"]);
        assert_eq!(dict.get("Type"), Some(&Object::from(Name::of("Pages"))));
    }

    #[test]
    fn dictionary_null_handling() {
        let mut dict = sample();
        assert_eq!(dict.get("Missing"), None);
        assert_eq!(dict.get_preserving_null("Missing"), Some(&Object::Null));
        assert!(!dict.has("Missing"));
        assert!(dict.has("Rotate"));
        assert!(dict.delete("Missing"));
        assert!(!dict.delete("Missing"));
        assert_eq!(dict.size(), 2);
    }

    #[test]
    fn dictionary_lookup() {
        let mut context = Context::create();
        let reference = context.register(Number::of(612.0));
        let mut dict = sample();
        dict.set("Width", reference);
        dict.set("Dangling", Reference::of(99, 0));

        assert_eq!(
            dict.lookup("Width", &context, &[ObjectKind::Number]),
            Ok(Some(&Object::from(612.0)))
        );
        assert_eq!(
            dict.lookup("Width", &context, &[ObjectKind::Name]),
            Err(ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::Name],
                actual: Some(ObjectKind::Number),
            })
        );
        assert_eq!(
            dict.lookup("Dangling", &context, &[ObjectKind::Array]),
            Err(ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::Array],
                actual: None,
            })
        );
        assert_eq!(
            dict.lookup_maybe("Dangling", &context, &[ObjectKind::Array]),
            Ok(None)
        );
        assert_eq!(dict.lookup("Missing", &context, &[]), Ok(None));
        assert_eq!(
            dict.lookup("Missing", &context, &[ObjectKind::Null]),
            Ok(Some(&Object::Null))
        );
    }

    #[test]
    fn dictionary_unique_key() {
        let mut context = Context::create();
        let dict = sample();
        let key = dict.unique_key("Font", &mut context);
        assert!(key.as_str().starts_with("/Font-"));
        assert!(!dict.has(&key));
    }
}
