/// Attribute as written in markup: lower-cased name, optional value.
/// A valueless attribute (`<input disabled>`) carries `None`.
pub type Attribute = (String, Option<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

/// A node in an owned document tree.
///
/// Every node is owned by exactly one parent `Vec`; moving a node out of that
/// `Vec` is the only way to detach it, so a detached subtree never keeps links
/// into its former tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document {
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    /// Markup inserted verbatim by the serializer; never re-parsed or escaped.
    RawInjected {
        content: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document {
            doctype: None,
            children,
        }
    }

    pub fn element(name: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Self {
        Node::Element {
            name: name.into(),
            attributes,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Node::RawInjected {
            content: content.into(),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Document { .. } | Node::Element { .. })
    }

    /// Element tag name; `None` for every other node kind.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, target: &str) -> bool {
        self.name().is_some_and(|name| name.eq_ignore_ascii_case(target))
    }

    /// Value of the first attribute named `key`. Valueless attributes read as `""`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_deref().unwrap_or("")),
            _ => None,
        }
    }
}
