//! Section/item semantics over the tree layer.
//!
//! A sectioned array is a two-level tree: depth 1 holds sections, depth 2
//! holds items. [`Array2dElement`] is a closed sum type, so a slot is
//! always exactly one of the two - there is no way to represent both or
//! neither. Items never hold children; that is enforced by the tree
//! layer through [`TreeValue`] on every mutation.
//!
//! Every method here is a thin call into the changeset: it derives the
//! concrete path (trailing components come from current child counts at
//! call time, never cached) and applies one logged operation. Lookup and
//! mutation form a single logical step under the crate's single-writer
//! discipline.

use crate::error::ChangesetError;
use crate::op::Op;
use crate::path::Path;
use crate::tree::changeset::TreeChangeset;
use crate::tree::diff::TreeDiff;
use crate::tree::{TreeArray, TreeNode, TreeValue};

/// One element of a sectioned array: a section header or an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Array2dElement<S, I> {
    Section(S),
    Item(I),
}

impl<S, I> Array2dElement<S, I> {
    pub fn section(&self) -> Option<&S> {
        match self {
            Array2dElement::Section(section) => Some(section),
            Array2dElement::Item(_) => None,
        }
    }

    pub fn item(&self) -> Option<&I> {
        match self {
            Array2dElement::Section(_) => None,
            Array2dElement::Item(item) => Some(item),
        }
    }
}

impl<S, I> TreeValue for Array2dElement<S, I> {
    fn allows_children(&self) -> bool {
        matches!(self, Array2dElement::Section(_))
    }
}

/// A two-level collection of sections and items, observed through a
/// [`TreeChangeset`].
#[derive(Clone, Debug)]
pub struct SectionedArray<S, I> {
    changeset: TreeChangeset<Array2dElement<S, I>>,
}

impl<S: Clone, I: Clone> SectionedArray<S, I> {
    pub fn new() -> SectionedArray<S, I> {
        SectionedArray { changeset: TreeChangeset::new() }
    }

    /// Start tracking changes against `initial` as the snapshot.
    pub fn from_tree(initial: TreeArray<Array2dElement<S, I>>) -> SectionedArray<S, I> {
        SectionedArray { changeset: TreeChangeset::from_tree(initial) }
    }

    pub fn section_count(&self) -> usize {
        self.changeset.tree().len()
    }

    /// Number of items in the section at `section`, if it exists.
    pub fn item_count(&self, section: usize) -> Option<usize> {
        self.changeset.tree().child_count(&Path::from(section))
    }

    pub fn section(&self, at: usize) -> Option<&S> {
        self.changeset.tree().node(&Path::from(at))?.value.section()
    }

    pub fn item(&self, at: (usize, usize)) -> Option<&I> {
        self.changeset.tree().node(&Path::from(at))?.value.item()
    }

    /// Append a new section at the end of the array.
    pub fn append_section(&mut self, section: S) -> Result<(), ChangesetError> {
        self.insert_section(section, self.section_count())
    }

    /// Insert a section so that it ends up at index `at`.
    pub fn insert_section(&mut self, section: S, at: usize) -> Result<(), ChangesetError> {
        self.changeset.apply(Op::Insert {
            at: Path::from(at),
            value: TreeNode::new(Array2dElement::Section(section)),
        })
    }

    /// Append `item` to the section at `to_section`.
    pub fn append_item(&mut self, item: I, to_section: usize) -> Result<(), ChangesetError> {
        let count = self.item_count(to_section).ok_or(ChangesetError::OutOfBounds {
            index: to_section,
            len: self.section_count(),
        })?;
        self.insert_item(item, (to_section, count))
    }

    /// Insert `item` so that it ends up at `at`.
    pub fn insert_item(&mut self, item: I, at: (usize, usize)) -> Result<(), ChangesetError> {
        self.changeset.apply(Op::Insert {
            at: Path::from(at),
            value: TreeNode::new(Array2dElement::Item(item)),
        })
    }

    /// Move the section at `from` (items and all) to index `to`.
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), ChangesetError> {
        self.changeset.apply(Op::Move { from: Path::from(from), to: Path::from(to) })
    }

    /// Move the item at `from` to `to`, possibly across sections.
    pub fn move_item(
        &mut self,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Result<(), ChangesetError> {
        self.changeset.apply(Op::Move { from: Path::from(from), to: Path::from(to) })
    }

    /// Remove and return the section at `at`, items included.
    pub fn remove_section(&mut self, at: usize) -> Result<S, ChangesetError> {
        let section = self.section(at).cloned().ok_or(ChangesetError::OutOfBounds {
            index: at,
            len: self.section_count(),
        })?;
        self.changeset.apply(Op::Delete { at: Path::from(at) })?;
        Ok(section)
    }

    /// Remove and return the item at `at`.
    pub fn remove_item(&mut self, at: (usize, usize)) -> Result<I, ChangesetError> {
        let item = self.item(at).cloned().ok_or(ChangesetError::OutOfBounds {
            index: at.1,
            len: self.item_count(at.0).unwrap_or(0),
        })?;
        self.changeset.apply(Op::Delete { at: Path::from(at) })?;
        Ok(item)
    }

    /// Replace the section header at `at` without touching its items.
    pub fn set_section(&mut self, at: usize, section: S) -> Result<(), ChangesetError> {
        self.changeset.apply(Op::Update {
            at: Path::from(at),
            value: TreeNode::new(Array2dElement::Section(section)),
        })
    }

    /// Replace the item at `at`.
    pub fn set_item(&mut self, at: (usize, usize), item: I) -> Result<(), ChangesetError> {
        self.changeset.apply(Op::Update {
            at: Path::from(at),
            value: TreeNode::new(Array2dElement::Item(item)),
        })
    }

    /// Remove every item from every section, keeping the (now empty)
    /// sections in place.
    pub fn remove_all_items(&mut self) -> Result<(), ChangesetError> {
        let items: Vec<Path> = self
            .changeset
            .tree()
            .paths()
            .into_iter()
            .filter(|path| path.len() == 2)
            .collect();
        for path in items.into_iter().rev() {
            self.changeset.apply(Op::Delete { at: path })?;
        }
        Ok(())
    }

    /// Remove every item and every section.
    pub fn remove_all_items_and_sections(&mut self) -> Result<(), ChangesetError> {
        for index in (0..self.section_count()).rev() {
            self.changeset.apply(Op::Delete { at: Path::from(index) })?;
        }
        Ok(())
    }

    /// The live tree.
    pub fn tree(&self) -> &TreeArray<Array2dElement<S, I>> {
        self.changeset.tree()
    }

    /// The snapshot taken when this array was created.
    pub fn original(&self) -> &TreeArray<Array2dElement<S, I>> {
        self.changeset.original()
    }

    /// The raw operation log accumulated so far.
    pub fn log(&self) -> &[Op<Path, TreeNode<Array2dElement<S, I>>>] {
        self.changeset.log()
    }

    /// Consolidate the log into a canonical diff.
    pub fn diff(&self) -> Result<TreeDiff, ChangesetError> {
        self.changeset.diff()
    }

    /// Consolidate and generate the replay-safe patch against the live
    /// contents.
    pub fn patch(
        &self,
    ) -> Result<Vec<Op<Path, TreeNode<Array2dElement<S, I>>>>, ChangesetError> {
        self.changeset.patch()
    }
}

impl<S: Clone, I: Clone> Default for SectionedArray<S, I> {
    fn default() -> Self {
        SectionedArray::new()
    }
}
