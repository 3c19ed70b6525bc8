pub mod catalog;
pub mod content_stream;
pub mod object_stream;
pub mod page_leaf;
pub mod page_tree;

use crate::context::Context;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::object::Object;
use crate::object::ObjectKind;

pub(crate) const KEY_TYPE: &str = "Type";
pub(crate) const KEY_PARENT: &str = "Parent";
pub(crate) const KEY_KIDS: &str = "Kids";
pub(crate) const KEY_COUNT: &str = "Count";
pub(crate) const KEY_PAGES: &str = "Pages";
pub(crate) const VAL_CATALOG: &str = "Catalog";
pub(crate) const VAL_PAGES: &str = "Pages";
pub(crate) const VAL_PAGE: &str = "Page";

/// Mutable access to the dictionary held in `value` or in the indirect
/// object it refers to.
pub(crate) fn dict_mut<'a>(
    value: Option<&'a mut Object>,
    context: &'a mut Context,
) -> ObjectResult<&'a mut Dictionary> {
    let object = match value {
        Some(Object::Reference(reference)) => {
            let reference = *reference;
            context.lookup_mut(reference)
        }
        value => value,
    };
    expect_dict_mut(object)
}

pub(crate) fn expect_dict_mut(object: Option<&mut Object>) -> ObjectResult<&mut Dictionary> {
    match object {
        Some(object) => {
            let actual = object.kind();
            object
                .as_dictionary_mut()
                .ok_or_else(|| unexpected(ObjectKind::Dictionary, Some(actual)))
        }
        None => Err(unexpected(ObjectKind::Dictionary, None)),
    }
}

/// Mutable access to the array held in `value` or in the indirect object it
/// refers to.
pub(crate) fn array_mut<'a>(
    value: Option<&'a mut Object>,
    context: &'a mut Context,
) -> ObjectResult<&'a mut Array> {
    let object = match value {
        Some(Object::Reference(reference)) => {
            let reference = *reference;
            context.lookup_mut(reference)
        }
        value => value,
    };
    match object {
        Some(object) => {
            let actual = object.kind();
            object
                .as_array_mut()
                .ok_or_else(|| unexpected(ObjectKind::Array, Some(actual)))
        }
        None => Err(unexpected(ObjectKind::Array, None)),
    }
}

fn unexpected(expected: ObjectKind, actual: Option<ObjectKind>) -> ObjectErr {
    ObjectErr::UnexpectedType {
        expected: vec![expected],
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::indirect::reference::Reference;

    #[test]
    fn dict_mut_follows_references() {
        let mut context = Context::create();
        let reference = context.register(Dictionary::new());
        let mut value = Object::from(reference);
        dict_mut(Some(&mut value), &mut context)
            .unwrap()
            .set("Size", 1.0);
        let stored = context.get(reference).and_then(Object::as_dictionary);
        assert_eq!(stored.and_then(|dict| dict.get("Size")), Some(&Object::from(1.0)));

        let mut dangling = Object::from(Reference::of(9, 0));
        assert_eq!(
            dict_mut(Some(&mut dangling), &mut context),
            Err(unexpected(ObjectKind::Dictionary, None))
        );
    }

    #[test]
    fn array_mut_rejects_other_kinds() {
        let mut context = Context::create();
        let mut value = Object::from(1.0);
        assert_eq!(
            array_mut(Some(&mut value), &mut context),
            Err(unexpected(ObjectKind::Array, Some(ObjectKind::Number)))
        );
        let mut value = Object::from(Array::new());
        array_mut(Some(&mut value), &mut context).unwrap().push(true);
        assert_eq!(value.as_array().map(Array::size), Some(1));
    }
}
