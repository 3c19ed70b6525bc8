use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;
use ::std::mem;

use super::array_mut;
use super::dict_mut;
use super::expect_dict_mut;
use super::KEY_PARENT;
use super::KEY_TYPE;
use super::VAL_PAGE;
use crate::context::Context;
use crate::impl_deref_dictionary;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::error::ObjectResult;
use crate::object::indirect::reference::Reference;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::object::Serialize;
use crate::Byte;

const KEY_CONTENTS: &str = "Contents";
const KEY_RESOURCES: &str = "Resources";
const KEY_ANNOTS: &str = "Annots";
const KEY_MEDIA_BOX: &str = "MediaBox";
const KEY_CROP_BOX: &str = "CropBox";
const KEY_BLEED_BOX: &str = "BleedBox";
const KEY_TRIM_BOX: &str = "TrimBox";
const KEY_ART_BOX: &str = "ArtBox";
const KEY_ROTATE: &str = "Rotate";
const KEY_FONT: &str = "Font";
const KEY_XOBJECT: &str = "XObject";
const KEY_EXT_G_STATE: &str = "ExtGState";

/// REFERENCE: [7.7.3.3 Page objects, p87-88]
#[derive(Debug, PartialEq, Clone)]
pub struct PageLeaf {
    pub(crate) dict: Dictionary,
    normalized: bool,
    /// Wrap the existing content streams between `q` and `Q` on
    /// normalization.
    auto_normalize_ctm: bool,
}

impl_deref_dictionary!(PageLeaf);

impl Display for PageLeaf {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.dict)
    }
}

impl Serialize for PageLeaf {
    fn size_in_bytes(&self) -> usize {
        self.dict.size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        self.dict.copy_bytes_into(buffer)
    }
}

mod convert {
    use super::*;

    impl PageLeaf {
        /// A new US Letter page below `parent`.
        pub fn create(parent: Reference) -> Self {
            let mut dict = Dictionary::new();
            dict.set(KEY_TYPE, Name::of(VAL_PAGE));
            dict.set(KEY_PARENT, parent);
            dict.set(KEY_RESOURCES, Dictionary::new());
            dict.set(
                KEY_MEDIA_BOX,
                [0.0, 0.0, 612.0, 792.0]
                    .into_iter()
                    .map(Object::from)
                    .collect::<Array>(),
            );
            Self {
                dict,
                normalized: false,
                auto_normalize_ctm: false,
            }
        }

        pub fn from_dict(dict: Dictionary) -> Self {
            Self::from_dict_with(dict, true)
        }

        pub fn from_dict_with(dict: Dictionary, auto_normalize_ctm: bool) -> Self {
            Self {
                dict,
                normalized: false,
                auto_normalize_ctm,
            }
        }

        pub fn dict(&self) -> &Dictionary {
            &self.dict
        }

        pub fn dict_mut(&mut self) -> &mut Dictionary {
            &mut self.dict
        }

        pub fn into_dict(self) -> Dictionary {
            self.dict
        }

        pub fn parent(&self) -> Option<Reference> {
            self.dict.get(KEY_PARENT).and_then(Object::as_reference)
        }

        pub fn set_parent(&mut self, parent: Reference) {
            self.dict.set(KEY_PARENT, parent);
        }

        pub fn contents<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Object>> {
            self.dict.lookup(KEY_CONTENTS, context, &[])
        }

        pub fn annots<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Array>> {
            self.array_maybe(KEY_ANNOTS, context)
        }

        pub fn bleed_box<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Array>> {
            self.array_maybe(KEY_BLEED_BOX, context)
        }

        pub fn trim_box<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Array>> {
            self.array_maybe(KEY_TRIM_BOX, context)
        }

        pub fn art_box<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Array>> {
            self.array_maybe(KEY_ART_BOX, context)
        }

        pub fn resources<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Dictionary>> {
            let resources = self.get_inheritable_attribute(KEY_RESOURCES, context);
            Ok(context
                .resolve_maybe(resources, &[ObjectKind::Dictionary])?
                .and_then(Object::as_dictionary))
        }

        /// The media box is required, either on the page or on an ancestor.
        pub fn media_box<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Array>> {
            let media_box = self.get_inheritable_attribute(KEY_MEDIA_BOX, context);
            Ok(context
                .resolve(media_box, &[ObjectKind::Array])?
                .and_then(Object::as_array))
        }

        pub fn crop_box<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Array>> {
            let crop_box = self.get_inheritable_attribute(KEY_CROP_BOX, context);
            Ok(context
                .resolve_maybe(crop_box, &[ObjectKind::Array])?
                .and_then(Object::as_array))
        }

        pub fn rotate(&self, context: &Context) -> ObjectResult<Option<f64>> {
            let rotate = self.get_inheritable_attribute(KEY_ROTATE, context);
            Ok(context
                .resolve_maybe(rotate, &[ObjectKind::Number])?
                .and_then(Object::as_number))
        }

        /// REFERENCE: [7.7.3.4 Inheritance of page attributes, p90]
        /// The value of `key` on this page or on its nearest ancestor that
        /// defines it.
        pub fn get_inheritable_attribute<'a>(
            &'a self,
            key: &str,
            context: &'a Context,
        ) -> Option<&'a Object> {
            if let Some(value) = self.dict.get(key) {
                return Some(value);
            }
            let mut parent = self.dict.get(KEY_PARENT);
            // Bounded in case `/Parent` entries form a cycle
            for _ in 0..context.object_count() {
                let node = context
                    .resolve_maybe(parent, &[ObjectKind::Dictionary])
                    .ok()
                    .flatten()
                    .and_then(Object::as_dictionary)?;
                if let Some(value) = node.get(key) {
                    return Some(value);
                }
                parent = node.get(KEY_PARENT);
            }
            None
        }

        fn array_maybe<'a>(
            &'a self,
            key: &str,
            context: &'a Context,
        ) -> ObjectResult<Option<&'a Array>> {
            Ok(self
                .dict
                .lookup_maybe(key, context, &[ObjectKind::Array])?
                .and_then(Object::as_array))
        }
    }
}

mod process {
    use super::*;

    impl PageLeaf {
        /// Make `/Contents` an array and give the page its own `/Resources`,
        /// with `/Font`, `/XObject` and `/ExtGState`, and `/Annots`. Only the
        /// first call has an effect.
        pub fn normalize(&mut self, context: &mut Context) -> ObjectResult<()> {
            if self.normalized {
                return Ok(());
            }

            let contents_is_stream = match self.dict.get(KEY_CONTENTS) {
                Some(contents) => context.lookup(contents, &[])?.is_some_and(Object::is_stream),
                None => false,
            };
            if contents_is_stream {
                if let Some(contents) = self.dict.get_mut(KEY_CONTENTS) {
                    let stream = mem::replace(contents, Object::Null);
                    *contents = Array::from(vec![stream]).into();
                }
            }

            if self.auto_normalize_ctm {
                let push = context.push_graphics_state_content_stream();
                let pop = context.pop_graphics_state_content_stream();
                self.wrap_content_streams(push, pop, context)?;
            }

            let inherited = self.get_inheritable_attribute(KEY_RESOURCES, context);
            let resources = match context.resolve_maybe(inherited, &[ObjectKind::Dictionary])? {
                Some(_) => inherited.cloned(),
                None => None,
            };
            self.dict.set(
                KEY_RESOURCES,
                resources.unwrap_or_else(|| Dictionary::new().into()),
            );

            let mut missing = Vec::new();
            if let Some(resources) = self.resources(context)? {
                for key in [KEY_FONT, KEY_XOBJECT, KEY_EXT_G_STATE] {
                    if resources
                        .lookup_maybe(key, context, &[ObjectKind::Dictionary])?
                        .is_none()
                    {
                        missing.push(key);
                    }
                }
            }
            let resources = dict_mut(self.dict.get_mut(KEY_RESOURCES), context)?;
            for key in missing {
                resources.set(key, Dictionary::new());
            }

            if self.annots(context)?.is_none() {
                self.dict.set(KEY_ANNOTS, Array::new());
            }

            self.normalized = true;
            Ok(())
        }

        pub fn add_content_stream(&mut self, stream: Reference, context: &mut Context) -> ObjectResult<()> {
            self.normalize(context)?;
            if self.contents(context)?.is_none() {
                self.dict.set(KEY_CONTENTS, Array::new());
            }
            array_mut(self.dict.get_mut(KEY_CONTENTS), context)?.push(stream);
            Ok(())
        }

        /// Enclose the content streams between `start` and `end`. Returns
        /// whether `/Contents` is an array that could be wrapped.
        pub fn wrap_content_streams(
            &mut self,
            start: Reference,
            end: Reference,
            context: &mut Context,
        ) -> ObjectResult<bool> {
            let is_array = self
                .contents(context)?
                .is_some_and(|contents| contents.as_array().is_some());
            if !is_array {
                return Ok(false);
            }
            let contents = array_mut(self.dict.get_mut(KEY_CONTENTS), context)?;
            contents.insert(0, start)?;
            contents.push(end);
            Ok(true)
        }

        pub fn add_annot(&mut self, annot: Reference, context: &mut Context) -> ObjectResult<()> {
            self.normalize(context)?;
            array_mut(self.dict.get_mut(KEY_ANNOTS), context)?.push(annot);
            Ok(())
        }

        pub fn remove_annot(&mut self, annot: Reference, context: &mut Context) -> ObjectResult<()> {
            self.normalize(context)?;
            let annots = array_mut(self.dict.get_mut(KEY_ANNOTS), context)?;
            if let Some(index) = annots.index_of(&annot.into()) {
                annots.remove(index)?;
            }
            Ok(())
        }

        pub fn set_font_dictionary(
            &mut self,
            name: impl Into<Name>,
            font: Reference,
            context: &mut Context,
        ) -> ObjectResult<()> {
            self.set_resource(KEY_FONT, name.into(), font, context)
        }

        pub fn new_font_dictionary_key(&mut self, tag: &str, context: &mut Context) -> ObjectResult<Name> {
            self.new_resource_key(KEY_FONT, tag, context)
        }

        pub fn new_font_dictionary(
            &mut self,
            tag: &str,
            font: Reference,
            context: &mut Context,
        ) -> ObjectResult<Name> {
            self.new_resource(KEY_FONT, tag, font, context)
        }

        pub fn set_x_object(
            &mut self,
            name: impl Into<Name>,
            x_object: Reference,
            context: &mut Context,
        ) -> ObjectResult<()> {
            self.set_resource(KEY_XOBJECT, name.into(), x_object, context)
        }

        pub fn new_x_object_key(&mut self, tag: &str, context: &mut Context) -> ObjectResult<Name> {
            self.new_resource_key(KEY_XOBJECT, tag, context)
        }

        pub fn new_x_object(
            &mut self,
            tag: &str,
            x_object: Reference,
            context: &mut Context,
        ) -> ObjectResult<Name> {
            self.new_resource(KEY_XOBJECT, tag, x_object, context)
        }

        pub fn set_ext_g_state(
            &mut self,
            name: impl Into<Name>,
            ext_g_state: Reference,
            context: &mut Context,
        ) -> ObjectResult<()> {
            self.set_resource(KEY_EXT_G_STATE, name.into(), ext_g_state, context)
        }

        pub fn new_ext_g_state_key(&mut self, tag: &str, context: &mut Context) -> ObjectResult<Name> {
            self.new_resource_key(KEY_EXT_G_STATE, tag, context)
        }

        pub fn new_ext_g_state(
            &mut self,
            tag: &str,
            ext_g_state: Reference,
            context: &mut Context,
        ) -> ObjectResult<Name> {
            self.new_resource(KEY_EXT_G_STATE, tag, ext_g_state, context)
        }

        fn set_resource(
            &mut self,
            category: &str,
            name: Name,
            value: Reference,
            context: &mut Context,
        ) -> ObjectResult<()> {
            self.resource_dict_mut(category, context)?.set(name, value);
            Ok(())
        }

        fn new_resource_key(
            &mut self,
            category: &str,
            tag: &str,
            context: &mut Context,
        ) -> ObjectResult<Name> {
            self.normalize(context)?;
            loop {
                let key = Name::of(&context.add_random_suffix(tag, 10));
                let taken = self
                    .resource_dict(category, context)?
                    .is_some_and(|dict| dict.keys().any(|existing| *existing == key));
                if !taken {
                    return Ok(key);
                }
            }
        }

        fn new_resource(
            &mut self,
            category: &str,
            tag: &str,
            value: Reference,
            context: &mut Context,
        ) -> ObjectResult<Name> {
            let key = self.new_resource_key(category, tag, context)?;
            self.set_resource(category, key.clone(), value, context)?;
            Ok(key)
        }

        fn resource_dict<'a>(
            &'a self,
            category: &str,
            context: &'a Context,
        ) -> ObjectResult<Option<&'a Dictionary>> {
            let Some(resources) = self.resources(context)? else {
                return Ok(None);
            };
            Ok(resources
                .lookup(category, context, &[ObjectKind::Dictionary])?
                .and_then(Object::as_dictionary))
        }

        fn resource_dict_mut<'a>(
            &'a mut self,
            category: &str,
            context: &'a mut Context,
        ) -> ObjectResult<&'a mut Dictionary> {
            self.normalize(context)?;
            let indirect = self
                .resources(context)?
                .and_then(|resources| resources.get(category))
                .and_then(Object::as_reference);
            if let Some(reference) = indirect {
                return expect_dict_mut(context.lookup_mut(reference));
            }
            let resources = dict_mut(self.dict.get_mut(KEY_RESOURCES), context)?;
            expect_dict_mut(resources.get_mut(category))
        }
    }
}
