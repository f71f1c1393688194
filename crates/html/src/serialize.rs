//! HTML serialization of an owned tree.
//!
//! Follows the HTML fragment serialization rules for the node kinds this crate models:
//! text escapes `&`, `<`, `>` and U+00A0, attribute values escape `&`, `"` and U+00A0, raw text
//! element children are written as-is, void elements get no end tag. [`Node::RawInjected`]
//! content is always written verbatim.
use crate::Node;
use crate::tokenizer::{is_raw_text_element, is_void_element};

pub fn serialize(node: &Node) -> String {
    let mut out = String::new();
    serialize_into(node, &mut out);
    out
}

/// Serialize a list of sibling nodes (e.g. captured trailing content) back to back.
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        serialize_into(node, &mut out);
    }
    out
}

enum Step<'a> {
    Enter(&'a Node, bool),
    Close(&'a str),
}

/// Append the serialization of `node` to `out`.
///
/// Iterative so that deeply nested input cannot overflow the stack.
pub fn serialize_into(node: &Node, out: &mut String) {
    let mut stack: Vec<Step<'_>> = vec![Step::Enter(node, false)];

    while let Some(step) = stack.pop() {
        let (node, in_raw_text) = match step {
            Step::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
                continue;
            }
            Step::Enter(node, in_raw_text) => (node, in_raw_text),
        };

        match node {
            Node::Document { doctype, children } => {
                if let Some(doctype) = doctype {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(doctype);
                    out.push('>');
                }
                for child in children.iter().rev() {
                    stack.push(Step::Enter(child, false));
                }
            }
            Node::Element {
                name,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    if let Some(value) = value {
                        escape_attribute_into(value, out);
                    }
                    out.push('"');
                }
                out.push('>');
                if is_void_element(name) {
                    continue;
                }
                stack.push(Step::Close(name));
                let raw = is_raw_text_element(name);
                for child in children.iter().rev() {
                    stack.push(Step::Enter(child, raw));
                }
            }
            Node::Text { text } => {
                if in_raw_text {
                    out.push_str(text);
                } else {
                    escape_text_into(text, out);
                }
            }
            Node::RawInjected { content } => out.push_str(content),
            Node::Comment { text } => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn escape_text_into(text: &str, out: &mut String) {
    escape_into(text, out, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\u{00A0}' => Some("&nbsp;"),
        _ => None,
    });
}

fn escape_attribute_into(value: &str, out: &mut String) {
    escape_into(value, out, |ch| match ch {
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\u{00A0}' => Some("&nbsp;"),
        _ => None,
    });
}

fn escape_into(input: &str, out: &mut String, replacement: impl Fn(char) -> Option<&'static str>) {
    let mut copy_start = 0;
    for (i, ch) in input.char_indices() {
        if let Some(entity) = replacement(ch) {
            out.push_str(&input[copy_start..i]);
            out.push_str(entity);
            copy_start = i + ch.len_utf8();
        }
    }
    out.push_str(&input[copy_start..]);
}
