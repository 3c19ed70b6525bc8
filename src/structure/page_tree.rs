use ::std::fmt::Display;
use ::std::fmt::Formatter;
use ::std::fmt::Result as FmtResult;

use super::array_mut;
use super::KEY_COUNT;
use super::KEY_KIDS;
use super::KEY_PARENT;
use super::KEY_TYPE;
use super::VAL_PAGES;
use crate::context::Context;
use crate::impl_deref_dictionary;
use crate::object::direct::array::Array;
use crate::object::direct::dictionary::Dictionary;
use crate::object::direct::name::Name;
use crate::object::direct::numeric::Number;
use crate::object::error::ObjectErr;
use crate::object::error::ObjectResult;
use crate::object::indirect::reference::Reference;
use crate::object::Object;
use crate::object::ObjectKind;
use crate::object::Serialize;
use crate::Byte;

/// REFERENCE: [7.7.3.2 Page tree nodes, p86]
/// An intermediate node of the page tree. Its `/Count` is the number of
/// leaves below it.
///
/// The mutating operations run on a node detached from `context` (see
/// `Context::update`) and reach the kids through `context`. Each node on the
/// path down to the modified leaf updates its own count, and the ancestors
/// above the starting node are reached through `/Parent`.
#[derive(Debug, PartialEq, Clone)]
pub struct PageTree {
    pub(crate) dict: Dictionary,
}

impl_deref_dictionary!(PageTree);

impl Display for PageTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.dict)
    }
}

impl Serialize for PageTree {
    fn size_in_bytes(&self) -> usize {
        self.dict.size_in_bytes()
    }

    fn copy_bytes_into(&self, buffer: &mut Vec<Byte>) -> usize {
        self.dict.copy_bytes_into(buffer)
    }
}

mod convert {
    use super::*;

    impl PageTree {
        pub fn create(parent: Option<Reference>) -> Self {
            let mut dict = Dictionary::new();
            dict.set(KEY_TYPE, Name::of(VAL_PAGES));
            dict.set(KEY_KIDS, Array::new());
            dict.set(KEY_COUNT, Number::of(0.0));
            if let Some(parent) = parent {
                dict.set(KEY_PARENT, parent);
            }
            Self { dict }
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

        pub fn parent(&self) -> Option<Reference> {
            self.dict.get(KEY_PARENT).and_then(Object::as_reference)
        }

        pub fn kids<'a>(&'a self, context: &'a Context) -> ObjectResult<&'a Array> {
            self.dict
                .lookup(KEY_KIDS, context, &[ObjectKind::Array])?
                .and_then(Object::as_array)
                .ok_or(ObjectErr::UnexpectedType {
                    expected: vec![ObjectKind::Array],
                    actual: None,
                })
        }

        pub fn count(&self, context: &Context) -> ObjectResult<usize> {
            let count = self
                .dict
                .lookup(KEY_COUNT, context, &[ObjectKind::Number])?
                .and_then(Object::as_number)
                .unwrap_or_default();
            Ok(count.max(0.0) as usize)
        }

        pub(crate) fn kids_mut<'a>(
            &'a mut self,
            context: &'a mut Context,
        ) -> ObjectResult<&'a mut Array> {
            array_mut(self.dict.get_mut(KEY_KIDS), context)
        }

        pub(crate) fn add_to_count(&mut self, delta: isize, context: &Context) -> ObjectResult<()> {
            let count = self.count(context)? as isize + delta;
            self.dict.set(KEY_COUNT, Number::of(count as f64));
            Ok(())
        }
    }
}

mod process {
    use super::*;

    /// The kind of a kid of a page tree node, and the number of leaves
    /// below it.
    enum Kid {
        Tree(Reference, usize),
        Leaf,
        Other,
    }

    impl PageTree {
        /// Append a node to the kids without updating any count.
        pub fn push_tree_node(&mut self, tree: Reference, context: &mut Context) -> ObjectResult<()> {
            self.kids_mut(context)?.push(tree);
            Ok(())
        }

        /// Append a leaf and increment the count of this node and of each of
        /// its ancestors.
        pub fn push_leaf_node(&mut self, leaf: Reference, context: &mut Context) -> ObjectResult<()> {
            self.kids_mut(context)?.push(leaf);
            self.add_to_count(1, context)?;
            self.add_to_ancestor_counts(1, context)
        }

        /// Insert `leaf` so that it becomes the leaf at `target_index` below
        /// this node, and increment the count of each ancestor. Returns the
        /// node that received it, or `None` when it is this one.
        pub fn insert_leaf_node(
            &mut self,
            leaf: Reference,
            target_index: usize,
            context: &mut Context,
        ) -> ObjectResult<Option<Reference>> {
            let parent = self.insert_leaf_node_below(leaf, target_index, context)?;
            self.add_to_ancestor_counts(1, context)?;
            Ok(parent)
        }

        /// Remove the leaf at `target_index` below this node and decrement
        /// the count of each ancestor. With `prune`, nodes below this one
        /// left without kids are removed too.
        pub fn remove_leaf_node(
            &mut self,
            target_index: usize,
            prune: bool,
            context: &mut Context,
        ) -> ObjectResult<()> {
            self.remove_leaf_node_below(target_index, prune, context)?;
            self.add_to_ancestor_counts(-1, context)
        }

        fn add_to_ancestor_counts(&self, delta: isize, context: &mut Context) -> ObjectResult<()> {
            let mut parent = self.parent();
            // Bounded in case `/Parent` entries form a cycle
            for _ in 0..context.object_count() {
                let Some(reference) = parent else {
                    break;
                };
                let count = match context.get(reference).and_then(Object::as_page_tree) {
                    Some(tree) => tree.count(context)? as isize,
                    None => break,
                };
                let Some(tree) = context.lookup_mut(reference).and_then(Object::as_page_tree_mut) else {
                    break;
                };
                tree.dict.set(KEY_COUNT, Number::of((count + delta).max(0) as f64));
                parent = tree.parent();
            }
            Ok(())
        }

        fn insert_leaf_node_below(
            &mut self,
            leaf: Reference,
            target_index: usize,
            context: &mut Context,
        ) -> ObjectResult<Option<Reference>> {
            let count = self.count(context)?;
            if target_index > count {
                return Err(ObjectErr::InvalidTargetIndex {
                    target_index,
                    count,
                });
            }
            let kids = self.kids(context)?.as_slice().to_vec();
            let mut remaining = target_index;
            for (idx, kid) in kids.iter().enumerate() {
                if remaining == 0 {
                    self.insert_leaf_kid(idx, leaf, context)?;
                    return Ok(None);
                }
                match classify(kid, context)? {
                    Kid::Tree(reference, kid_count) if kid_count > remaining => {
                        let parent = context
                            .update(reference, |object, context| {
                                object
                                    .as_page_tree_mut()
                                    .map(|tree| tree.insert_leaf_node_below(leaf, remaining, context))
                            })
                            .flatten()
                            .ok_or(ObjectErr::CorruptPageTree {
                                target_index,
                                count,
                            })??;
                        self.add_to_count(1, context)?;
                        return Ok(Some(parent.unwrap_or(reference)));
                    }
                    Kid::Tree(_, kid_count) => remaining -= kid_count,
                    Kid::Leaf => remaining -= 1,
                    Kid::Other => {}
                }
            }
            if remaining == 0 {
                self.insert_leaf_kid(kids.len(), leaf, context)?;
                return Ok(None);
            }
            Err(ObjectErr::CorruptPageTree {
                target_index,
                count,
            })
        }

        fn remove_leaf_node_below(
            &mut self,
            target_index: usize,
            prune: bool,
            context: &mut Context,
        ) -> ObjectResult<()> {
            let count = self.count(context)?;
            if target_index >= count {
                return Err(ObjectErr::InvalidTargetIndex {
                    target_index,
                    count,
                });
            }
            let kids = self.kids(context)?.as_slice().to_vec();
            let mut remaining = target_index;
            for (idx, kid) in kids.iter().enumerate() {
                match classify(kid, context)? {
                    Kid::Tree(reference, kid_count) if kid_count > remaining => {
                        let now_empty = context
                            .update(reference, |object, context| {
                                object.as_page_tree_mut().map(|tree| -> ObjectResult<bool> {
                                    tree.remove_leaf_node_below(remaining, prune, context)?;
                                    Ok(tree.kids(context)?.is_empty())
                                })
                            })
                            .flatten()
                            .ok_or(ObjectErr::CorruptPageTree {
                                target_index,
                                count,
                            })??;
                        self.add_to_count(-1, context)?;
                        if prune && now_empty {
                            self.kids_mut(context)?.remove(idx)?;
                        }
                        return Ok(());
                    }
                    Kid::Tree(_, kid_count) => remaining -= kid_count,
                    Kid::Leaf if remaining == 0 => {
                        self.kids_mut(context)?.remove(idx)?;
                        self.add_to_count(-1, context)?;
                        return Ok(());
                    }
                    Kid::Leaf => remaining -= 1,
                    Kid::Other => {}
                }
            }
            Err(ObjectErr::CorruptPageTree {
                target_index,
                count,
            })
        }

        /// Visit every descendant in post-order, together with the value
        /// that refers to it.
        pub fn traverse<'a>(
            &'a self,
            context: &'a Context,
            visitor: &mut impl FnMut(&'a Object, &'a Object),
        ) -> ObjectResult<()> {
            for kid in self.kids(context)?.iter() {
                let Some(node) = context.lookup(kid, &[])? else {
                    continue;
                };
                if let Some(tree) = node.as_page_tree() {
                    tree.traverse(context, visitor)?;
                }
                visitor(node, kid);
            }
            Ok(())
        }

        fn insert_leaf_kid(
            &mut self,
            idx: usize,
            leaf: Reference,
            context: &mut Context,
        ) -> ObjectResult<()> {
            self.kids_mut(context)?.insert(idx, leaf)?;
            self.add_to_count(1, context)
        }
    }

    fn classify(kid: &Object, context: &Context) -> ObjectResult<Kid> {
        Ok(match context.lookup(kid, &[])? {
            Some(Object::PageTree(tree)) => match kid.as_reference() {
                Some(reference) => Kid::Tree(reference, tree.count(context)?),
                None => Kid::Other,
            },
            Some(Object::PageLeaf(_)) => Kid::Leaf,
            _ => Kid::Other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::page_leaf::PageLeaf;

    /// root
    /// ├── middle
    /// │   ├── leaf 0
    /// │   └── leaf 1
    /// └── leaf 2
    fn sample(context: &mut Context) -> (Reference, Reference) {
        let root = context.register(PageTree::create(None));
        let middle = context.register(PageTree::create(Some(root)));
        context
            .update(root, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.push_tree_node(middle, context).unwrap();
            })
            .unwrap();
        for parent in [middle, middle, root] {
            let leaf = context.register(PageLeaf::create(parent));
            context
                .update(parent, |object, context| {
                    let tree = object.as_page_tree_mut().unwrap();
                    tree.push_leaf_node(leaf, context).unwrap();
                })
                .unwrap();
        }
        (root, middle)
    }

    fn count(context: &Context, reference: Reference) -> usize {
        let tree = context.get(reference).and_then(Object::as_page_tree).unwrap();
        tree.count(context).unwrap()
    }

    fn leaves(context: &Context, reference: Reference) -> usize {
        let tree = context.get(reference).and_then(Object::as_page_tree).unwrap();
        let mut leaves = 0;
        tree.traverse(context, &mut |node, _| {
            if node.as_page_leaf().is_some() {
                leaves += 1;
            }
        })
        .unwrap();
        leaves
    }

    #[test]
    fn page_tree_push_updates_ancestors() {
        let mut context = Context::create();
        let (root, middle) = sample(&mut context);
        assert_eq!(count(&context, root), 3);
        assert_eq!(count(&context, middle), 2);
        assert_eq!(leaves(&context, root), 3);
    }

    #[test]
    fn page_tree_insert_leaf_node() {
        let mut context = Context::create();
        let (root, middle) = sample(&mut context);
        let leaf = context.register(PageLeaf::create(middle));
        let parent = context
            .update(root, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.insert_leaf_node(leaf, 1, context)
            })
            .unwrap();
        assert_eq!(parent, Ok(Some(middle)));
        assert_eq!(count(&context, root), 4);
        assert_eq!(count(&context, middle), 3);
        assert_eq!(leaves(&context, root), 4);

        let leaf = context.register(PageLeaf::create(root));
        let parent = context
            .update(root, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.insert_leaf_node(leaf, 4, context)
            })
            .unwrap();
        assert_eq!(parent, Ok(None));
        assert_eq!(count(&context, root), 5);
        assert_eq!(leaves(&context, root), 5);
    }

    #[test]
    fn page_tree_updates_ancestors_from_inner_node() {
        let mut context = Context::create();
        let (root, middle) = sample(&mut context);
        let leaf = context.register(PageLeaf::create(middle));
        let parent = context
            .update(middle, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.insert_leaf_node(leaf, 0, context)
            })
            .unwrap();
        assert_eq!(parent, Ok(None));
        assert_eq!(count(&context, middle), 3);
        assert_eq!(count(&context, root), 4);
        assert_eq!(leaves(&context, root), 4);

        let result = context
            .update(middle, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.remove_leaf_node(2, true, context)
            })
            .unwrap();
        assert_eq!(result, Ok(()));
        assert_eq!(count(&context, middle), 2);
        assert_eq!(count(&context, root), 3);
        assert_eq!(leaves(&context, root), 3);
    }

    #[test]
    fn page_tree_insert_leaf_node_invalid_index() {
        let mut context = Context::create();
        let (root, _) = sample(&mut context);
        let result = context
            .update(root, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.insert_leaf_node(Reference::of(99, 0), 4, context)
            })
            .unwrap();
        assert_eq!(
            result,
            Err(ObjectErr::InvalidTargetIndex {
                target_index: 4,
                count: 3
            })
        );
    }

    #[test]
    fn page_tree_remove_leaf_node() {
        let mut context = Context::create();
        let (root, middle) = sample(&mut context);
        let remove = |context: &mut Context, index| {
            context
                .update(root, |object, context| {
                    let tree = object.as_page_tree_mut().unwrap();
                    tree.remove_leaf_node(index, true, context)
                })
                .unwrap()
        };
        assert_eq!(remove(&mut context, 1), Ok(()));
        assert_eq!(count(&context, root), 2);
        assert_eq!(count(&context, middle), 1);
        assert_eq!(leaves(&context, root), 2);

        // Removing the last leaf of `middle` prunes it
        assert_eq!(remove(&mut context, 0), Ok(()));
        let tree = context.get(root).and_then(Object::as_page_tree).unwrap();
        assert_eq!(tree.kids(&context).map(Array::size), Ok(1));
        assert_eq!(count(&context, root), 1);

        assert_eq!(
            remove(&mut context, 1),
            Err(ObjectErr::InvalidTargetIndex {
                target_index: 1,
                count: 1
            })
        );
    }

    #[test]
    fn page_tree_corrupt_count() {
        let mut context = Context::create();
        let root = context.register(PageTree::create(None));
        context
            .lookup_mut(root)
            .and_then(Object::as_page_tree_mut)
            .unwrap()
            .dict_mut()
            .set(KEY_COUNT, Number::of(2.0));
        let result = context
            .update(root, |object, context| {
                let tree = object.as_page_tree_mut().unwrap();
                tree.remove_leaf_node(0, true, context)
            })
            .unwrap();
        assert_eq!(
            result,
            Err(ObjectErr::CorruptPageTree {
                target_index: 0,
                count: 2
            })
        );
    }
}
