//! Cut a page at its cutoff marker.
//!
//! Everything after the marker, among the marker's siblings, is serialized into the walled
//! content and removed from the tree. The marker itself stays where it was; a placeholder
//! node is appended to the marker's parent in place of the removed siblings.
use html::{
    MutationError, Node, NodePath, append_subtree, locate_by_class, remove_following_siblings,
    serialize_nodes,
};

#[derive(Debug)]
pub struct SplitOutcome {
    pub root: Node,
    /// Serialized trailing siblings, or `None` when the marker was not found.
    pub walled: Option<String>,
    /// Where the marker is, when found.
    pub marker: Option<NodePath>,
}

/// Split `root` at the first element whose class is exactly `cutoff_class`.
///
/// Without a marker the tree is returned untouched. `placeholder` is only called when a
/// marker is found.
pub fn split(
    mut root: Node,
    cutoff_class: &str,
    placeholder: impl FnOnce() -> Node,
) -> Result<SplitOutcome, MutationError> {
    let Some(marker) = locate_by_class(&root, cutoff_class) else {
        return Ok(SplitOutcome {
            root,
            walled: None,
            marker: None,
        });
    };
    let parent = marker.parent().ok_or(MutationError::RootNotDetachable)?;

    let trailing = remove_following_siblings(&mut root, &marker)?;
    let walled = serialize_nodes(&trailing);
    append_subtree(&mut root, &parent, placeholder())?;

    Ok(SplitOutcome {
        root,
        walled: Some(walled),
        marker: Some(marker),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::{node_at, parse, serialize};

    fn body_page(body: &str) -> Node {
        parse(&format!("<body>{body}</body>")).unwrap()
    }

    #[test]
    fn trailing_siblings_become_walled_content() {
        let page = body_page(r#"<p>free</p><div class="CUT"></div><p>one</p>two<p>three</p>"#);
        let outcome = split(page, "CUT", || Node::raw("{{PLACEHOLDER}}")).unwrap();
        assert_eq!(outcome.walled.as_deref(), Some("<p>one</p>two<p>three</p>"));
        assert_eq!(
            serialize(&outcome.root),
            r#"<html><head></head><body><p>free</p><div class="CUT"></div>{{PLACEHOLDER}}</body></html>"#
        );
        let marker = node_at(&outcome.root, outcome.marker.as_ref().unwrap()).unwrap();
        assert_eq!(marker.attr("class"), Some("CUT"));
    }

    #[test]
    fn marker_children_are_kept() {
        let page = body_page(r#"<div class="CUT"><em>teaser</em></div><p>secret</p>"#);
        let outcome = split(page, "CUT", || Node::raw("X")).unwrap();
        let out = serialize(&outcome.root);
        assert!(out.contains(r#"<div class="CUT"><em>teaser</em></div>X"#));
        assert!(!out.contains("secret"));
    }

    #[test]
    fn nested_marker_only_cuts_its_own_siblings() {
        let page = body_page(
            r#"<article><h1>t</h1><div class="CUT"></div><p>secret</p></article><footer>f</footer>"#,
        );
        let outcome = split(page, "CUT", || Node::raw("X")).unwrap();
        assert_eq!(outcome.walled.as_deref(), Some("<p>secret</p>"));
        assert!(
            serialize(&outcome.root)
                .contains(r#"<div class="CUT"></div>X</article><footer>f</footer>"#)
        );
    }

    #[test]
    fn marker_as_last_child_gives_empty_walled_content() {
        let page = body_page(r#"<p>a</p><div class="CUT"></div>"#);
        let outcome = split(page, "CUT", || Node::raw("X")).unwrap();
        assert_eq!(outcome.walled.as_deref(), Some(""));
        assert!(serialize(&outcome.root).ends_with(r#"<div class="CUT"></div>X</body></html>"#));
    }

    #[test]
    fn missing_marker_leaves_tree_untouched() {
        let page = body_page("<p>a</p><div class=\"other\"></div><p>b</p>");
        let before = serialize(&page);
        let mut called = false;
        let outcome = split(page, "CUT", || {
            called = true;
            Node::raw("X")
        })
        .unwrap();
        assert!(!called);
        assert!(outcome.walled.is_none());
        assert!(outcome.marker.is_none());
        assert_eq!(serialize(&outcome.root), before);
    }

    #[test]
    fn marker_at_root_cannot_be_split() {
        let root = Node::element("div", vec![("class".to_string(), Some("CUT".to_string()))], vec![]);
        assert_eq!(
            split(root, "CUT", || Node::raw("X")).unwrap_err(),
            MutationError::RootNotDetachable
        );
    }
}
