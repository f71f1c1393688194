//! Line-per-node rendering of a tree for readable test failures.
use crate::escape_text;
use html::Node;

const INDENT_STEP: &str = "  ";

/// One line per node, children indented below their parent.
///
/// Elements show every attribute in source order; text is quoted with control characters made
/// visible so whitespace differences show up in diffs.
pub fn dom_outline(root: &Node) -> Vec<String> {
    let mut out = Vec::new();
    // Explicit stack to keep deep fixtures from overflowing.
    let mut stack: Vec<(&Node, usize)> = vec![(root, 0)];
    while let Some((node, depth)) = stack.pop() {
        let mut line = INDENT_STEP.repeat(depth);
        match node {
            Node::Document { doctype, .. } => match doctype {
                Some(doctype) => {
                    line.push_str("#document <!DOCTYPE ");
                    line.push_str(doctype);
                    line.push('>');
                }
                None => line.push_str("#document"),
            },
            Node::Element {
                name, attributes, ..
            } => {
                line.push('<');
                line.push_str(name);
                for (key, value) in attributes {
                    line.push(' ');
                    line.push_str(key);
                    if let Some(value) = value {
                        line.push_str("=\"");
                        line.push_str(&escape_text(value));
                        line.push('"');
                    }
                }
                line.push('>');
            }
            Node::Text { text } => {
                line.push('"');
                line.push_str(&escape_text(text));
                line.push('"');
            }
            Node::RawInjected { content } => {
                line.push_str("#raw \"");
                line.push_str(&escape_text(content));
                line.push('"');
            }
            Node::Comment { text } => {
                line.push_str("<!-- ");
                line.push_str(&escape_text(text));
                line.push_str(" -->");
            }
        }
        out.push(line);
        for child in node.children().iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}
