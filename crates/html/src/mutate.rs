//! In-place edits of an owned tree, addressed by [`NodePath`].
//!
//! Detaching moves the node out of its parent's child list and hands ownership to the caller.
//! Appending takes ownership of the new child, so a subtree can only ever live in one tree.
use crate::error::MutationError;
use crate::traverse::{NodePath, node_at_mut};
use crate::types::{Attribute, Node};

/// Body of an element built by [`append_child_with_content`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InnerContent {
    /// Escaped when serialized.
    Text(String),
    /// Emitted verbatim when serialized.
    Raw(String),
}

impl InnerContent {
    fn into_node(self) -> Option<Node> {
        match self {
            InnerContent::Text(text) if text.is_empty() => None,
            InnerContent::Raw(content) if content.is_empty() => None,
            InnerContent::Text(text) => Some(Node::Text { text }),
            InnerContent::Raw(content) => Some(Node::RawInjected { content }),
        }
    }
}

fn container_at<'a>(
    root: &'a mut Node,
    path: &NodePath,
) -> Result<&'a mut Vec<Node>, MutationError> {
    let node = node_at_mut(root, path).ok_or_else(|| MutationError::InvalidPath(path.to_string()))?;
    node.children_mut()
        .ok_or_else(|| MutationError::NotAContainer(path.to_string()))
}

/// Append `<tag attrs>inner</tag>` as the last child of the node at `target`.
/// Returns the path of the new element.
pub fn append_child_with_content(
    root: &mut Node,
    target: &NodePath,
    tag: &str,
    attributes: Vec<Attribute>,
    inner: InnerContent,
) -> Result<NodePath, MutationError> {
    let children: Vec<Node> = inner.into_node().into_iter().collect();
    append_subtree(root, target, Node::element(tag, attributes, children))
}

/// Append an owned subtree as the last child of the node at `target`.
/// Returns the path of the appended node.
pub fn append_subtree(
    root: &mut Node,
    target: &NodePath,
    subtree: Node,
) -> Result<NodePath, MutationError> {
    if matches!(subtree, Node::Document { .. }) {
        return Err(MutationError::DocumentNotAppendable);
    }
    let children = container_at(root, target)?;
    children.push(subtree);
    Ok(target.child(children.len() - 1))
}

/// Remove the node at `path` from its parent and return it.
pub fn detach(root: &mut Node, path: &NodePath) -> Result<Node, MutationError> {
    let (parent, index) = path.split_last().ok_or(MutationError::RootNotDetachable)?;
    let siblings = container_at(root, &parent)
        .map_err(|_| MutationError::InvalidPath(path.to_string()))?;
    if index >= siblings.len() {
        return Err(MutationError::InvalidPath(path.to_string()));
    }
    Ok(siblings.remove(index))
}

/// Remove every sibling after the node at `path`, returning them in document order.
/// The node at `path` itself stays in place.
pub fn remove_following_siblings(
    root: &mut Node,
    path: &NodePath,
) -> Result<Vec<Node>, MutationError> {
    let (parent, index) = path.split_last().ok_or(MutationError::RootNotDetachable)?;
    let siblings = container_at(root, &parent)
        .map_err(|_| MutationError::InvalidPath(path.to_string()))?;
    if index >= siblings.len() {
        return Err(MutationError::InvalidPath(path.to_string()));
    }
    Ok(siblings.split_off(index + 1))
}
