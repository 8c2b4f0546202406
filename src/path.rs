//! Path-addressed positions in a two-level (or deeper) tree.
//!
//! A path is an ordered sequence of child indices; each component selects
//! a child at that depth. Length 1 addresses a section, length 2 an item
//! within the section at the first component. Length 0 is reserved for
//! the root and never addresses a node.
//!
//! Paths order lexicographically, with a proper prefix sorting before its
//! extensions. Walking paths in that order visits a tree pre-order;
//! walking in reverse visits children before their parents and later
//! siblings before earlier ones, which is exactly the order the patch
//! generator deletes in.

use std::fmt;

use smallvec::SmallVec;

/// Sectioned collections never go deeper than two levels, so paths stay
/// inline at that depth.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(SmallVec<[usize; 2]>);

impl Path {
    /// The empty path addressing the tree root.
    pub fn root() -> Path {
        Path(SmallVec::new())
    }

    /// Number of components; equals the depth of the addressed node.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path components, outermost first.
    pub fn components(&self) -> &[usize] {
        &self.0
    }

    /// The sibling index of the addressed node, if not the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The path of the addressed node's parent. The root's parent is the
    /// root itself.
    pub fn parent(&self) -> Path {
        match self.0.split_last() {
            Some((_, init)) => Path(SmallVec::from_slice(init)),
            None => Path::root(),
        }
    }

    /// The path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Path {
        let mut components = self.0.clone();
        components.push(index);
        Path(components)
    }

    /// True when `self` addresses a strict ancestor of `other`.
    pub fn is_proper_prefix_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Path {
        Path(SmallVec::from_slice(&[index]))
    }
}

impl From<(usize, usize)> for Path {
    fn from((section, item): (usize, usize)) -> Path {
        Path(SmallVec::from_slice(&[section, item]))
    }
}

impl From<&[usize]> for Path {
    fn from(components: &[usize]) -> Path {
        Path(SmallVec::from_slice(components))
    }
}

impl FromIterator<usize> for Path {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Path {
        Path(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{component}")?;
        }
        write!(f, "]")
    }
}
