//! Class-attribute lookups.
//!
//! The match key is the whole `class` attribute value, compared exactly. `class="a b"` matches
//! `"a b"` but not `"a"`; a marker must be written the same way in the page and in the config.
use crate::Node;
use crate::traverse::{NodePath, find_first_path, node_at};

pub fn has_class(node: &Node, class: &str) -> bool {
    matches!(node, Node::Element { .. }) && node.attr("class") == Some(class)
}

/// Path of the first element (document order) whose `class` equals `class`.
pub fn locate_by_class(root: &Node, class: &str) -> Option<NodePath> {
    find_first_path(root, |node| has_class(node, class))
}

pub fn find_by_class<'a>(root: &'a Node, class: &str) -> Option<&'a Node> {
    let path = locate_by_class(root, class)?;
    node_at(root, &path)
}

/// First element with `class`, plus its parent (`None` when the match is `root` itself).
pub fn find_by_class_with_parent<'a>(
    root: &'a Node,
    class: &str,
) -> Option<(&'a Node, Option<&'a Node>)> {
    let path = locate_by_class(root, class)?;
    let node = node_at(root, &path)?;
    let parent = match path.parent() {
        Some(parent_path) => Some(node_at(root, &parent_path)?),
        None => None,
    };
    Some((node, parent))
}
