//! Ordered trees with parent-owned child lists.
//!
//! A [`TreeArray`] generalizes the flat layer so every position is a
//! [`Path`] rather than a bare index. Each node exclusively owns its
//! children; moves are realized as detach-then-reattach, matching the
//! flat layer's remove-then-insert move semantics (the destination path
//! is interpreted against the tree after the removal).
//!
//! Whether a node may hold children is a property of its value, expressed
//! through [`TreeValue`]. The sectioned layer uses this to keep items
//! childless; violations fail with `ShapeViolation` on the mutation that
//! would introduce them.

pub mod changeset;
pub mod diff;
mod patch;

use crate::error::ChangesetError;
use crate::op::Op;
use crate::path::Path;

/// Shape constraint a tree payload imposes on its node.
pub trait TreeValue {
    /// Whether a node holding this value may have children.
    fn allows_children(&self) -> bool {
        true
    }
}

/// One node of a tree: a value plus an ordered list of exclusively owned
/// child nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode<T> {
    pub value: T,
    children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// A childless node.
    pub fn new(value: T) -> TreeNode<T> {
        TreeNode { value, children: Vec::new() }
    }

    /// A node with children, checked against the value's shape.
    pub fn with_children(value: T, children: Vec<TreeNode<T>>) -> Result<TreeNode<T>, ChangesetError>
    where
        T: TreeValue,
    {
        if !children.is_empty() && !value.allows_children() {
            return Err(ChangesetError::ShapeViolation);
        }
        Ok(TreeNode { value, children })
    }

    pub fn children(&self) -> &[TreeNode<T>] {
        &self.children
    }

    /// Size of this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }
}

/// An ordered forest addressed by paths. The root itself holds no value;
/// its children are the depth-1 nodes (sections, in the sectioned layer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeArray<T> {
    children: Vec<TreeNode<T>>,
}

impl<T> Default for TreeArray<T> {
    fn default() -> Self {
        TreeArray::new()
    }
}

impl<T> TreeArray<T> {
    pub fn new() -> TreeArray<T> {
        TreeArray { children: Vec::new() }
    }

    /// The depth-1 nodes.
    pub fn children(&self) -> &[TreeNode<T>] {
        &self.children
    }

    /// Number of depth-1 nodes.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.children.iter().map(TreeNode::node_count).sum()
    }

    /// The node addressed by `path`, if it exists. The root path
    /// addresses no node.
    pub fn node(&self, path: &Path) -> Option<&TreeNode<T>> {
        let (&first, rest) = path.components().split_first()?;
        let mut node = self.children.get(first)?;
        for &component in rest {
            node = node.children.get(component)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &Path) -> Option<&mut TreeNode<T>> {
        let (&first, rest) = path.components().split_first()?;
        let mut node = self.children.get_mut(first)?;
        for &component in rest {
            node = node.children.get_mut(component)?;
        }
        Some(node)
    }

    /// Number of children under `path` (the root included), or `None` if
    /// the path addresses nothing.
    pub fn child_count(&self, path: &Path) -> Option<usize> {
        if path.is_empty() {
            return Some(self.children.len());
        }
        Some(self.node(path)?.children.len())
    }

    /// Every node's path, pre-order (lexicographically ascending).
    pub fn paths(&self) -> Vec<Path> {
        fn walk<T>(children: &[TreeNode<T>], prefix: &Path, out: &mut Vec<Path>) {
            for (index, child) in children.iter().enumerate() {
                let path = prefix.child(index);
                out.push(path.clone());
                walk(&child.children, &path, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &Path::root(), &mut out);
        out
    }
}

impl<T: TreeValue> TreeArray<T> {
    /// Insert `node` so that it ends up at `path`. The parent must exist,
    /// allow children, and have at least `path.last()` children already.
    pub fn insert(&mut self, path: &Path, node: TreeNode<T>) -> Result<(), ChangesetError> {
        self.try_insert(path, node).map_err(|(_, err)| err)
    }

    /// Like [`TreeArray::insert`], but returns the node on failure so the
    /// caller can restore it.
    fn try_insert(
        &mut self,
        path: &Path,
        node: TreeNode<T>,
    ) -> Result<(), (TreeNode<T>, ChangesetError)> {
        let Some(index) = path.last() else {
            return Err((node, ChangesetError::OutOfBounds { index: 0, len: 0 }));
        };
        let parent = path.parent();
        let siblings = if parent.is_empty() {
            &mut self.children
        } else {
            let Some(parent_node) = self.node_mut(&parent) else {
                let err = ChangesetError::OutOfBounds {
                    index: *parent.components().last().unwrap_or(&0),
                    len: 0,
                };
                return Err((node, err));
            };
            if !parent_node.value.allows_children() {
                return Err((node, ChangesetError::ShapeViolation));
            }
            &mut parent_node.children
        };
        if index > siblings.len() {
            let err = ChangesetError::OutOfBounds { index, len: siblings.len() };
            return Err((node, err));
        }
        siblings.insert(index, node);
        Ok(())
    }

    /// Remove and return the subtree at `path`.
    pub fn remove(&mut self, path: &Path) -> Result<TreeNode<T>, ChangesetError> {
        let Some(index) = path.last() else {
            return Err(ChangesetError::OutOfBounds { index: 0, len: 0 });
        };
        let parent = path.parent();
        let siblings = if parent.is_empty() {
            &mut self.children
        } else {
            match self.node_mut(&parent) {
                Some(parent_node) => &mut parent_node.children,
                None => {
                    return Err(ChangesetError::OutOfBounds {
                        index: *parent.components().last().unwrap_or(&0),
                        len: 0,
                    });
                }
            }
        };
        if index >= siblings.len() {
            return Err(ChangesetError::OutOfBounds { index, len: siblings.len() });
        }
        Ok(siblings.remove(index))
    }

    /// Replace the value at `path`, returning the old value. Replacing a
    /// value in a way that would leave existing children under a
    /// childless-only value is a shape violation.
    pub fn update(&mut self, path: &Path, value: T) -> Result<T, ChangesetError> {
        let Some(node) = self.node_mut(path) else {
            return Err(ChangesetError::OutOfBounds {
                index: path.last().unwrap_or(0),
                len: 0,
            });
        };
        if !node.children.is_empty() && !value.allows_children() {
            return Err(ChangesetError::ShapeViolation);
        }
        Ok(std::mem::replace(&mut node.value, value))
    }

    /// Detach the subtree at `from` and reattach it at `to`, where `to`
    /// addresses the tree as it exists after the detach. On failure the
    /// subtree is restored at `from` and the tree is unchanged.
    pub fn move_node(&mut self, from: &Path, to: &Path) -> Result<(), ChangesetError> {
        let node = self.remove(from)?;
        if let Err((node, err)) = self.try_insert(to, node) {
            // Reattaching at the source cannot fail: the slot was just
            // vacated and the parent chain is untouched.
            let _ = self.try_insert(from, node);
            return Err(err);
        }
        Ok(())
    }

    /// Apply one path-addressed operation in place.
    ///
    /// An update replaces the addressed node's value only; the existing
    /// children stay. The payload node must therefore be childless, or
    /// the operation fails with `ShapeViolation` before touching the
    /// tree.
    pub fn apply(&mut self, op: Op<Path, TreeNode<T>>) -> Result<(), ChangesetError> {
        match op {
            Op::Insert { at, value } => self.insert(&at, value),
            Op::Delete { at } => self.remove(&at).map(|_| ()),
            Op::Update { at, value } => {
                if !value.children.is_empty() {
                    return Err(ChangesetError::ShapeViolation);
                }
                self.update(&at, value.value).map(|_| ())
            }
            Op::Move { from, to } => self.move_node(&from, &to),
        }
    }
}

#[cfg(test)]
impl TreeValue for i32 {}
#[cfg(test)]
impl TreeValue for &'static str {}
