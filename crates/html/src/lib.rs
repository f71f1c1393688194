//! Owned HTML document trees: a lenient parser, an HTML serializer, class lookups, and
//! path-addressed mutation.
pub mod locate;
pub mod mutate;
pub mod serialize;
pub mod traverse;

mod dom_builder;
mod entities;
mod error;
mod tokenizer;
mod types;

pub use crate::error::{MutationError, ParseError, ParseErrorCode};
pub use crate::locate::{find_by_class, find_by_class_with_parent, has_class, locate_by_class};
pub use crate::mutate::{
    InnerContent, append_child_with_content, append_subtree, detach, remove_following_siblings,
};
pub use crate::serialize::{serialize, serialize_into, serialize_nodes};
pub use crate::tokenizer::tokenize;
pub use crate::traverse::{
    NodePath, find_first, find_first_element, find_first_path, node_at, node_at_mut,
};
pub use crate::types::{Attribute, Node, Token};

/// Parse a full document.
///
/// The result is always `Document → html → (head, body)`, with recoverable markup errors
/// repaired. Only input that cannot be tokenized is rejected.
pub fn parse(html: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(html)?;
    log::trace!(target: "html.parse", "document: {} bytes, {} tokens", html.len(), tokens.len());
    Ok(dom_builder::build_dom(tokens))
}

/// Parse markup in body context, returning the top-level nodes without any synthesized
/// `html`/`head`/`body` wrapper.
pub fn parse_fragment(html: &str) -> Result<Vec<Node>, ParseError> {
    let tokens = tokenize(html)?;
    log::trace!(target: "html.parse", "fragment: {} bytes, {} tokens", html.len(), tokens.len());
    Ok(dom_builder::build_fragment(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &str) -> String {
        serialize(&parse(input).unwrap())
    }

    #[test]
    fn parse_wraps_body_only_markup() {
        assert_eq!(
            round_trip(r#"<body><div class="nav"></div><div class="CUT"></div><div>secret</div></body>"#),
            r#"<html><head></head><body><div class="nav"></div><div class="CUT"></div><div>secret</div></body></html>"#
        );
    }

    #[test]
    fn parse_keeps_doctype_and_attribute_order() {
        assert_eq!(
            round_trip(r#"<!doctype html><html lang="en"><head><title>T</title></head><body><a id=1 href="/x" class="c">x</a></body></html>"#),
            r#"<!DOCTYPE html><html lang="en"><head><title>T</title></head><body><a id="1" href="/x" class="c">x</a></body></html>"#
        );
    }

    #[test]
    fn parse_serialize_is_a_fixed_point() {
        let samples = [
            "<p>one<p>two<ul><li>a<li>b</ul>",
            "<title>a &amp; b</title><script>if (a < b) {}</script>text &lt; more",
            "<div><span>unclosed</div></p><br/><img src=x alt>",
            "<!-- c --><table><tr><td>1</td></tr></table>",
            "plain &nbsp; text",
            "<p>&#0; &#xD800; &#x110000;</p>",
            "<p class=\"a\0b\">raw\0nul</p><script>x\0</script>",
        ];
        for input in samples {
            let once = round_trip(input);
            let twice = round_trip(&once);
            assert_eq!(once, twice, "not stable for {input:?}");
        }
    }

    #[test]
    fn nul_bytes_and_references_become_replacement_characters() {
        assert_eq!(
            round_trip("<p>a\0b &#0;</p>"),
            "<html><head></head><body><p>a\u{FFFD}b \u{FFFD}</p></body></html>"
        );
    }

    #[test]
    fn parse_rejects_untokenizable_input() {
        let err = parse("<div><!-- open").unwrap_err();
        assert_eq!(err.code, ParseErrorCode::UnterminatedComment);
        assert_eq!(err.position, 5);
        assert_eq!(err.to_string(), "comment is never closed at byte 5");
    }

    #[test]
    fn parse_fragment_has_no_wrapper() {
        let nodes = parse_fragment(r#"<script src="/login.js"></script>"#).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_element_named("script"));
        assert_eq!(serialize_nodes(&nodes), r#"<script src="/login.js"></script>"#);
    }
}
