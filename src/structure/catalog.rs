use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use super::KEY_PAGES;
use super::KEY_TYPE;
use super::VAL_CATALOG;
use crate::context::Context;
use crate::impl_deref_dictionary;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::object::indirect::reference::Reference;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::object::Serialize;
use crate::Byte;

/// REFERENCE: [7.7.2 Document catalog dictionary, p85]
#[derive(Debug, PartialEq, Clone)]
pub struct Catalog {
    pub(crate) dict: Dictionary,
}

impl_deref_dictionary!(Catalog);

impl Default for Catalog {
    fn default() -> Self {
        let mut dict = Dictionary::new();
        dict.set(KEY_TYPE, Name::of(VAL_CATALOG));
        Self { dict }
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.dict)
    }
}

impl Serialize for Catalog {
    fn size_in_bytes(&self) -> usize {
        self.dict.size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        self.dict.copy_bytes_into(buffer)
    }
}

mod convert {
    use super::*;

    impl Catalog {
        pub fn with_pages(pages: Reference) -> Self {
            let mut catalog = Self::default();
            catalog.dict.set(KEY_PAGES, pages);
            catalog
        }

        pub fn from_dict(dict: Dictionary) -> Self {
            Self { dict }
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
    }
}

mod process {
    use super::*;

    impl Catalog {
        /// The root of the page tree.
        pub fn pages<'a>(&'a self, context: &'a Context) -> ObjectResult<Option<&'a Dictionary>> {
            Ok(self
                .dict
                .lookup(KEY_PAGES, context, &[ObjectKind::Dictionary])?
                .and_then(Object::as_dictionary))
        }

        /// Insert `leaf` at `index` among the pages of the document and return
        /// the page tree node that received it.
        pub fn insert_leaf_node(
            &mut self,
            leaf: Reference,
            index: usize,
            context: &mut Context,
        ) -> ObjectResult<Reference> {
            let pages = self.pages_ref()?;
            let parent = context
                .update(pages, |object, context| {
                    object
                        .as_page_tree_mut()
                        .map(|tree| tree.insert_leaf_node(leaf, index, context))
                })
                .flatten()
                .ok_or_else(|| self.unexpected_pages(context))??;
            Ok(parent.unwrap_or(pages))
        }

        /// Remove the page at `index`, pruning page tree nodes left empty.
        pub fn remove_leaf_node(&mut self, index: usize, context: &mut Context) -> ObjectResult<()> {
            let pages = self.pages_ref()?;
            context
                .update(pages, |object, context| {
                    object
                        .as_page_tree_mut()
                        .map(|tree| tree.remove_leaf_node(index, true, context))
                })
                .flatten()
                .ok_or_else(|| self.unexpected_pages(context))?
        }

        fn pages_ref(&self) -> ObjectResult<Reference> {
            let pages = self.dict.get(KEY_PAGES);
            pages
                .and_then(Object::as_reference)
                .ok_or_else(|| ObjectErr::UnexpectedType {
                    expected: vec![ObjectKind::Reference],
                    actual: pages.map(Object::kind),
                })
        }

        fn unexpected_pages(&self, context: &Context) -> ObjectErr {
            let actual = self
                .dict
                .get(KEY_PAGES)
                .and_then(Object::as_reference)
                .and_then(|reference| context.get(reference))
                .map(Object::kind);
            ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::PageTree],
                actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::page_leaf::PageLeaf;
    use crate::structure::page_tree::PageTree;

    #[test]
    fn catalog_pages() {
        let mut context = Context::create();
        let pages = context.register(PageTree::create(None));
        let catalog = Catalog::with_pages(pages);
        assert_eq!(
            catalog.to_bytes(),
            b"<<\n/Type /Catalog\n/Pages 1 0 R\n>>"
        );
        let tree = catalog.pages(&context).unwrap().unwrap();
        assert_eq!(tree.get("Count"), Some(&Object::from(0.0)));
    }

    #[test]
    fn catalog_insert_and_remove_leaf_node() {
        let mut context = Context::create();
        let pages = context.register(PageTree::create(None));
        let mut catalog = Catalog::with_pages(pages);
        for index in 0..3 {
            let leaf = context.register(PageLeaf::create(pages));
            assert_eq!(catalog.insert_leaf_node(leaf, index, &mut context), Ok(pages));
        }
        catalog.remove_leaf_node(1, &mut context).unwrap();
        let tree = context.get(pages).and_then(Object::as_page_tree).unwrap();
        assert_eq!(tree.get("Count"), Some(&Object::from(2.0)));
        assert_eq!(tree.kids(&context).map(|kids| kids.size()), Ok(2));
        assert_eq!(
            catalog.insert_leaf_node(Reference::of(9, 0), 5, &mut context),
            Err(ObjectErr::InvalidTargetIndex {
                target_index: 5,
                count: 2
            })
        );
    }

    #[test]
    fn catalog_without_page_tree() {
        let mut context = Context::create();
        let mut catalog = Catalog::default();
        assert_eq!(
            catalog.remove_leaf_node(0, &mut context),
            Err(ObjectErr::UnexpectedType {
                expected: vec![ObjectKind::Reference],
                actual: None,
            })
        );
    }
}
