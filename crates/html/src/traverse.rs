//! Child-index paths into an owned tree, and depth-first searches that produce them.
use crate::Node;
use std::fmt;

/// Location of a node as the sequence of child indices from the root.
///
/// The empty path is the root itself. Paths are only meaningful for the tree they were
/// computed on; any mutation that shifts sibling indices invalidates paths below that point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Parent path and this node's index within it; `None` for the root.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (&last, rest) = self.0.split_last()?;
        Some((NodePath(rest.to_vec()), last))
    }

    pub fn parent(&self) -> Option<NodePath> {
        self.split_last().map(|(parent, _)| parent)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

pub fn node_at<'a>(root: &'a Node, path: &NodePath) -> Option<&'a Node> {
    let mut current = root;
    for &index in path.indices() {
        current = current.children().get(index)?;
    }
    Some(current)
}

pub fn node_at_mut<'a>(root: &'a mut Node, path: &NodePath) -> Option<&'a mut Node> {
    let mut current = root;
    for &index in path.indices() {
        current = current.children_mut()?.get_mut(index)?;
    }
    Some(current)
}

/// Path of the first node in depth-first pre-order (document order) matching `pred`.
///
/// Iterative so that pathological nesting cannot overflow the stack.
pub fn find_first_path(root: &Node, mut pred: impl FnMut(&Node) -> bool) -> Option<NodePath> {
    // Each frame: the node and the next child index to visit.
    let mut stack: Vec<(&Node, usize)> = vec![(root, 0)];
    let mut path: Vec<usize> = Vec::new();
    if pred(root) {
        return Some(NodePath::root());
    }
    while let Some(top) = stack.last_mut() {
        let (node, index) = *top;
        let children = node.children();
        if index >= children.len() {
            stack.pop();
            path.pop();
            continue;
        }
        top.1 += 1;
        let child = &children[index];
        path.push(index);
        if pred(child) {
            return Some(NodePath(path));
        }
        if child.children().is_empty() {
            path.pop();
        } else {
            stack.push((child, 0));
        }
    }
    None
}

pub fn find_first(root: &Node, pred: impl FnMut(&Node) -> bool) -> Option<&Node> {
    let path = find_first_path(root, pred)?;
    node_at(root, &path)
}

/// First element named `tag` (ASCII case-insensitive) in document order.
pub fn find_first_element(root: &Node, tag: &str) -> Option<NodePath> {
    find_first_path(root, |node| node.is_element_named(tag))
}
