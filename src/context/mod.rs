mod rng;

use ::std::collections::BTreeMap;
use ::std::ptr;

use self::rng::SimpleRng;
use crate::header::Header;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::object::indirect::reference::Reference;
use crate::object::indirect::stream::deflate;
use crate::object::indirect::stream::RawStream;
use crate::object::indirect::stream::KEY_FILTER;
use crate::object::indirect::stream::VAL_FLATE_DECODE;
use crate::object::operator::Operator;
use crate::object::operator::POP_GRAPHICS_STATE;
use crate::object::operator::PUSH_GRAPHICS_STATE;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::structure::content_stream::ContentStream;
use crate::Byte;
use crate::ObjectNumber;

/// REFERENCE: [7.5.5 File trailer, p58-59]
/// The trailer entries that identify the document. Each entry is kept as it
/// was read, usually a reference.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct TrailerInfo {
    pub root: Option<Object>,
    pub encrypt: Option<Object>,
    pub info: Option<Object>,
    pub id: Option<Object>,
}

/// A plain value converted into an object by `Context::obj`.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    /// Omitted from dictionaries, `null` elsewhere.
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    /// Plain strings become names.
    Name(String),
    Array(Vec<Value>),
    Dictionary(Vec<(String, Value)>),
    Object(Object),
}

/// The table of indirect objects of one document, with its header and
/// trailer information.
#[derive(Debug, PartialEq, Clone)]
pub struct Context {
    largest_object_number: ObjectNumber,
    header: Header,
    trailer_info: TrailerInfo,
    indirect_objects: BTreeMap<Reference, Object>,
    rng: SimpleRng,
    push_graphics_state_ref: Option<Reference>,
    pop_graphics_state_ref: Option<Reference>,
}

impl Default for Context {
    fn default() -> Self {
        Self::create()
    }
}

mod convert {
    use super::*;
    use crate::impl_from;

    impl Context {
        pub fn create() -> Self {
            Self {
                largest_object_number: 0,
                header: Header::default(),
                trailer_info: TrailerInfo::default(),
                indirect_objects: BTreeMap::new(),
                rng: SimpleRng::with_seed(1.0),
                push_graphics_state_ref: None,
                pop_graphics_state_ref: None,
            }
        }

        pub fn header(&self) -> Header {
            self.header
        }

        pub fn set_header(&mut self, header: Header) {
            self.header = header;
        }

        pub fn trailer_info(&self) -> &TrailerInfo {
            &self.trailer_info
        }

        pub fn trailer_info_mut(&mut self) -> &mut TrailerInfo {
            &mut self.trailer_info
        }

        pub fn largest_object_number(&self) -> ObjectNumber {
            self.largest_object_number
        }

        pub fn object_count(&self) -> usize {
            self.indirect_objects.len()
        }
    }

    impl_from!(Object, Object, Value);
    impl_from!(Reference, Object, Value);
    impl_from!(Array, Object, Value);
    impl_from!(Dictionary, Object, Value);
    impl_from!(bool, Boolean, Value);
    impl_from!(f64, Number, Value);
    impl_from!(String, Name, Value);
    impl_from!(&str, Name, Value);

    impl Value {
        /// A dictionary literal from `(key, value)` pairs.
        pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
            Self::Dictionary(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect(),
            )
        }

        pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
            Self::Array(values.into_iter().collect())
        }

        pub fn optional(value: Option<impl Into<Value>>) -> Self {
            value.map_or(Self::Undefined, Into::into)
        }
    }
}

mod process {
    use super::*;

    impl Context {
        /// Map `reference` to `object`, replacing any previous value.
        pub fn assign(&mut self, reference: Reference, object: impl Into<Object>) {
            let object_number = reference.object_number();
            self.indirect_objects.insert(reference, object.into());
            if object_number > self.largest_object_number {
                self.largest_object_number = object_number;
            }
        }

        /// A reference with an object number above every number assigned so
        /// far.
        pub fn next_ref(&mut self) -> Reference {
            self.largest_object_number += 1;
            Reference::of(self.largest_object_number, 0)
        }

        pub fn register(&mut self, object: impl Into<Object>) -> Reference {
            let reference = self.next_ref();
            self.assign(reference, object);
            reference
        }

        /// Remove the object of `reference`, reporting whether it existed.
        pub fn delete(&mut self, reference: Reference) -> bool {
            self.indirect_objects.remove(&reference).is_some()
        }

        pub fn get(&self, reference: Reference) -> Option<&Object> {
            self.indirect_objects.get(&reference)
        }

        pub fn lookup_mut(&mut self, reference: Reference) -> Option<&mut Object> {
            self.indirect_objects.get_mut(&reference)
        }

        /// Resolve `value` if it is a reference. When `kinds` is not empty,
        /// the result must match one of them, and an unresolved reference is
        /// an error.
        pub fn lookup<'a>(
            &'a self,
            value: &'a Object,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            self.resolve(Some(value), kinds)
        }

        /// Like `lookup`, except that unresolved references and `null` (unless
        /// requested) yield `None`.
        pub fn lookup_maybe<'a>(
            &'a self,
            value: &'a Object,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            self.resolve_maybe(Some(value), kinds)
        }

        pub fn lookup_reference(
            &self,
            reference: Reference,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&Object>> {
            check_kinds(self.get(reference), kinds)
        }

        pub(crate) fn resolve<'a>(
            &'a self,
            value: Option<&'a Object>,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            check_kinds(self.follow(value), kinds)
        }

        pub(crate) fn resolve_maybe<'a>(
            &'a self,
            value: Option<&'a Object>,
            kinds: &[ObjectKind],
        ) -> ObjectResult<Option<&'a Object>> {
            let preserve_null = kinds.contains(&ObjectKind::Null);
            match self.follow(value) {
                None => Ok(None),
                Some(Object::Null) if !preserve_null => Ok(None),
                Some(result) if kinds.is_empty() => Ok(Some(result)),
                result => check_kinds(result, kinds),
            }
        }

        fn follow<'a>(&'a self, value: Option<&'a Object>) -> Option<&'a Object> {
            match value {
                Some(Object::Reference(reference)) => self.get(*reference),
                value => value,
            }
        }

        /// Run `f` on the object of `reference`, with the rest of the context
        /// available. The object is detached for the duration of the call.
        pub fn update<R>(
            &mut self,
            reference: Reference,
            f: impl FnOnce(&mut Object, &mut Context) -> R,
        ) -> Option<R> {
            let mut object = self.indirect_objects.remove(&reference)?;
            let result = f(&mut object, self);
            self.indirect_objects.insert(reference, object);
            Some(result)
        }

        /// The reference under which this very object is stored.
        pub fn get_object_ref(&self, object: &Object) -> Option<Reference> {
            self.indirect_objects
                .iter()
                .find(|(_, stored)| ptr::eq(*stored, object))
                .map(|(reference, _)| *reference)
        }

        /// All indirect objects in ascending object number order.
        pub fn enumerate_indirect_objects(&self) -> Vec<(Reference, &Object)> {
            self.indirect_objects
                .iter()
                .map(|(reference, object)| (*reference, object))
                .collect()
        }

        pub fn obj(&self, value: impl Into<Value>) -> Object {
            match value.into() {
                Value::Undefined | Value::Null => Object::Null,
                Value::Boolean(value) => value.into(),
                Value::Number(value) => value.into(),
                Value::Name(name) => Name::of(&name).into(),
                Value::Array(values) => values
                    .into_iter()
                    .map(|value| self.obj(value))
                    .collect::<Array>()
                    .into(),
                Value::Dictionary(entries) => self.dict(entries).into(),
                Value::Object(object) => object,
            }
        }

        fn dict(&self, entries: Vec<(String, Value)>) -> Dictionary {
            entries
                .into_iter()
                .filter(|(_, value)| *value != Value::Undefined)
                .map(|(key, value)| (Name::of(&key), self.obj(value)))
                .collect()
        }

        fn dict_of(&self, value: Value) -> Dictionary {
            match self.obj(value) {
                Object::Dictionary(dict) => dict,
                _ => Dictionary::new(),
            }
        }

        pub fn stream(&self, contents: impl Into<Vec<Byte>>, dict: impl Into<Value>) -> RawStream {
            RawStream::of(self.dict_of(dict.into()), contents)
        }

        /// A stream with deflated `contents` and `/Filter /FlateDecode`.
        pub fn flate_stream(&self, contents: &[Byte], dict: impl Into<Value>) -> RawStream {
            let mut dict = self.dict_of(dict.into());
            dict.set(KEY_FILTER, Name::of(VAL_FLATE_DECODE));
            RawStream::of(dict, deflate(contents))
        }

        pub fn content_stream(&self, operators: Vec<Operator>, dict: impl Into<Value>) -> ContentStream {
            ContentStream::of(self.dict_of(dict.into()), operators, true)
        }

        /// REFERENCE: [8.10 Form XObjects, p229]
        pub fn form_x_object(&self, operators: Vec<Operator>, dict: impl Into<Value>) -> ContentStream {
            let mut form = Dictionary::new();
            form.set("BBox", self.obj(Value::array([0.0, 0.0, 0.0, 0.0].map(Value::Number))));
            form.set(
                "Matrix",
                self.obj(Value::array([1.0, 0.0, 0.0, 1.0, 0.0, 0.0].map(Value::Number))),
            );
            for (key, value) in self.dict_of(dict.into()).entries() {
                form.set(key.clone(), value.clone());
            }
            form.set("Type", Name::of("XObject"));
            form.set("Subtype", Name::of("Form"));
            ContentStream::of(form, operators, true)
        }

        /// The shared content stream holding a single `q` operator.
        pub fn push_graphics_state_content_stream(&mut self) -> Reference {
            if let Some(reference) = self.push_graphics_state_ref {
                return reference;
            }
            let reference = self.register_operator_stream(PUSH_GRAPHICS_STATE);
            self.push_graphics_state_ref = Some(reference);
            reference
        }

        /// The shared content stream holding a single `Q` operator.
        pub fn pop_graphics_state_content_stream(&mut self) -> Reference {
            if let Some(reference) = self.pop_graphics_state_ref {
                return reference;
            }
            let reference = self.register_operator_stream(POP_GRAPHICS_STATE);
            self.pop_graphics_state_ref = Some(reference);
            reference
        }

        fn register_operator_stream(&mut self, operator: &str) -> Reference {
            let stream = ContentStream::of(
                Dictionary::new(),
                vec![Operator::of(operator, Vec::new())],
                true,
            );
            self.register(stream)
        }

        /// `prefix-N` where `N` has at most `len` digits.
        pub fn add_random_suffix(&mut self, prefix: &str, len: u32) -> String {
            let suffix = (self.rng.next_float() * 10f64.powi(len as i32)).floor();
            format!("{}-{}", prefix, suffix as u64)
        }
    }

    fn check_kinds<'a>(
        result: Option<&'a Object>,
        kinds: &[ObjectKind],
    ) -> ObjectResult<Option<&'a Object>> {
        if kinds.is_empty() {
            return Ok(result);
        }
        match result {
            Some(object) if kinds.iter().any(|kind| kind.matches(object)) => Ok(Some(object)),
            _ => Err(ObjectErr::UnexpectedType {
                expected: kinds.to_vec(),
                actual: result.map(Object::kind),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::direct::numeric::Number;
    use crate::object::Serialize;

    #[test]
    fn context_register_is_monotonic() {
        let mut context = Context::create();
        context.assign(Reference::of(10, 0), Object::Null);
        let first = context.register(true);
        let second = context.register(false);
        assert_eq!(first, Reference::of(11, 0));
        assert_eq!(second, Reference::of(12, 0));
        assert!(context.delete(second));
        assert!(!context.delete(second));
        assert_eq!(context.next_ref(), Reference::of(13, 0));
        assert_eq!(context.largest_object_number(), 13);
    }

    #[test]
    fn context_lookup() {
        let mut context = Context::create();
        let number = context.register(Number::of(21.0));
        let null = context.register(Object::Null);
        let value = Object::from(number);

        assert_eq!(context.lookup(&value, &[]), Ok(Some(&Object::from(21.0))));
        assert_eq!(
            context.lookup(&value, &[ObjectKind::Name, ObjectKind::Number]),
            Ok(Some(&Object::from(21.0)))
        );
        assert_eq!(
            context.lookup(&value, &[ObjectKind::Dictionary]),
            Err(ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::Dictionary],
                actual: Some(ObjectKind::Number),
            })
        );
        let direct = Object::from(true);
        assert_eq!(context.lookup(&direct, &[]), Ok(Some(&direct)));

        let unresolved = Object::from(Reference::of(99, 0));
        assert_eq!(context.lookup(&unresolved, &[]), Ok(None));
        assert_eq!(
            context.lookup(&unresolved, &[ObjectKind::Number]),
            Err(ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::Number],
                actual: None,
            })
        );
        assert_eq!(context.lookup_maybe(&unresolved, &[ObjectKind::Number]), Ok(None));

        let null = Object::from(null);
        assert_eq!(context.lookup_maybe(&null, &[ObjectKind::Number]), Ok(None));
        assert_eq!(
            context.lookup_maybe(&null, &[ObjectKind::Null]),
            Ok(Some(&Object::Null))
        );
        assert_eq!(context.lookup(&null, &[ObjectKind::Null]), Ok(Some(&Object::Null)));
    }

    #[test]
    fn context_update() {
        let mut context = Context::create();
        let dict = context.register(Dictionary::new());
        let result = context.update(dict, |object, context| {
            let size = context.register(Number::of(3.0));
            if let Some(dict) = object.as_dictionary_mut() {
                dict.set("Size", size);
            }
            size
        });
        assert_eq!(result, Some(Reference::of(2, 0)));
        let updated = context.get(dict).and_then(Object::as_dictionary).unwrap();
        assert_eq!(updated.get("Size"), Some(&Object::from(Reference::of(2, 0))));
        assert_eq!(context.update(Reference::of(7, 0), |_, _| ()), None);
    }

    #[test]
    fn context_get_object_ref() {
        let mut context = Context::create();
        let first = context.register(Number::of(1.0));
        let second = context.register(Number::of(1.0));
        let object = context.get(second).unwrap();
        assert_eq!(context.get_object_ref(object), Some(second));
        assert_ne!(context.get_object_ref(object), Some(first));
        assert_eq!(context.get_object_ref(&Object::from(1.0)), None);
    }

    #[test]
    fn context_enumerate_in_object_number_order() {
        let mut context = Context::create();
        context.assign(Reference::of(3, 0), Object::Null);
        context.assign(Reference::of(1, 0), Object::Null);
        context.assign(Reference::of(2, 0), Object::Null);
        let numbers: Vec<_> = context
            .enumerate_indirect_objects()
            .into_iter()
            .map(|(reference, _)| reference.object_number())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn context_obj() {
        let context = Context::create();
        let object = context.obj(Value::dict([
            ("Type", Value::Name("Page".to_string())),
            ("Rotate", Value::Number(90.0)),
            ("Omitted", Value::Undefined),
            (
                "Box",
                Value::array([Value::Number(0.0), Value::Null, Value::Boolean(true)]),
            ),
        ]));
        assert_eq!(
            object.to_bytes(),
            b"<<\n/Type /Page\n/Rotate 90\n/Box [ 0 null true ]\n>>"
        );
        assert_eq!(context.obj(Value::optional(None::<Value>)), Object::Null);
    }

    #[test]
    fn context_flate_stream() {
        let context = Context::create();
        let stream = context.flate_stream(b"BT ET", Value::dict::<&str>([]));
        assert_eq!(
            stream.dict().get(KEY_FILTER),
            Some(&Object::from(Name::of(VAL_FLATE_DECODE)))
        );
        assert_eq!(Object::from(stream).decode_stream(&context), Ok(b"BT ET".to_vec()));
    }

    #[test]
    fn context_graphics_state_streams_are_shared() {
        let mut context = Context::create();
        let push = context.push_graphics_state_content_stream();
        let pop = context.pop_graphics_state_content_stream();
        assert_ne!(push, pop);
        assert_eq!(context.push_graphics_state_content_stream(), push);
        assert_eq!(context.pop_graphics_state_content_stream(), pop);
        assert_eq!(context.object_count(), 2);
        let contents = context.get(push).unwrap().decode_stream(&context);
        assert_eq!(contents, Ok(b"q\n".to_vec()));
    }

    #[test]
    fn context_add_random_suffix() {
        let mut context = Context::create();
        assert_eq!(context.add_random_suffix("Image", 4), "Image-7098");
        let suffix = context.add_random_suffix("Font", 10);
        assert!(suffix.starts_with("Font-"));
        assert!(suffix.len() <= "Font-".len() + 10);
    }
}
