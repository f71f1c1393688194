//! Tree construction from tokens.
//!
//! Builds into an index arena first (cheap appends, no borrow juggling while the stack of open
//! elements points into the tree) and converts the arena into an owned [`Node`] tree at the end.
//!
//! Document mode normalizes the shape an HTML5 parser would produce: `html` containing `head`
//! and `body`, head-only elements before any body content placed in `head`, and stray
//! `</body>`/`</html>` ignored. Fragment mode parses as if inside a `<body>` and returns the
//! top-level nodes without any synthesized wrapper.
use crate::tokenizer::is_void_element;
use crate::types::{Attribute, Node, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BuildMode {
    Document,
    Fragment,
}

/// Tree-construction insertion mode (the subset this builder needs).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
enum InsertionMode {
    #[default]
    BeforeHtml,
    BeforeHead,
    InHead,
    AfterHead,
    InBody,
}

/// Scope flavor used when searching the stack of open elements for an implied close.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScopeKind {
    Button,
    ListItem,
    DefinitionList,
}

fn is_scope_boundary(name: &str, kind: ScopeKind) -> bool {
    let base = matches!(
        name,
        "applet"
            | "caption"
            | "html"
            | "table"
            | "td"
            | "th"
            | "marquee"
            | "object"
            | "template"
            | "svg"
            | "math"
    );
    base || match kind {
        ScopeKind::Button => name == "button",
        ScopeKind::ListItem => matches!(name, "ol" | "ul"),
        ScopeKind::DefinitionList => name == "dl",
    }
}

fn is_head_element(name: &str) -> bool {
    matches!(
        name,
        "base" | "link" | "meta" | "noscript" | "script" | "style" | "template" | "title"
    )
}

/// Start tags that close an open `<p>` in button scope.
fn closes_paragraph(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "details"
            | "dialog"
            | "div"
            | "dl"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "ul"
    )
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

pub(crate) fn build_dom(tokens: Vec<Token>) -> Node {
    let mut builder = Builder::new(BuildMode::Document);
    for token in tokens {
        builder.push_token(token);
    }
    builder.ensure_body();
    builder.arena.into_dom(builder.root)
}

pub(crate) fn build_fragment(tokens: Vec<Token>) -> Vec<Node> {
    let mut builder = Builder::new(BuildMode::Fragment);
    for token in tokens {
        builder.push_token(token);
    }
    match builder.arena.into_dom(builder.root) {
        Node::Document { children, .. } => children,
        other => vec![other],
    }
}

struct Builder {
    arena: NodeArena,
    mode: BuildMode,
    insertion: InsertionMode,
    root: usize,
    html: Option<usize>,
    head: Option<usize>,
    body: Option<usize>,
    /// Stack of open elements below the current section root (`head`, `body`, or the fragment).
    open: Vec<usize>,
}

impl Builder {
    fn new(mode: BuildMode) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.push(ArenaNode::Document {
            doctype: None,
            children: Vec::new(),
        });
        let insertion = match mode {
            BuildMode::Document => InsertionMode::BeforeHtml,
            BuildMode::Fragment => InsertionMode::InBody,
        };
        Self {
            arena,
            mode,
            insertion,
            root,
            html: None,
            head: None,
            body: None,
            open: Vec::new(),
        }
    }

    fn push_token(&mut self, token: Token) {
        match token {
            Token::Doctype(doctype) => {
                if self.mode == BuildMode::Document && self.insertion == InsertionMode::BeforeHtml {
                    self.arena.set_doctype(self.root, doctype);
                }
            }
            Token::Comment(text) => {
                let parent = self.current_parent();
                self.arena.add_child(parent, ArenaNode::Comment { text });
            }
            Token::Text(text) => self.insert_text(text),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.start_tag(name, attributes, self_closing),
            Token::EndTag(name) => self.end_tag(&name),
        }

        #[cfg(feature = "parser_invariants")]
        self.check_invariants();
    }

    fn current_parent(&self) -> usize {
        if let Some(&top) = self.open.last() {
            return top;
        }
        match self.insertion {
            InsertionMode::InBody => self.body.unwrap_or(self.root),
            InsertionMode::InHead => self.head.unwrap_or(self.root),
            _ => self.html.unwrap_or(self.root),
        }
    }

    fn insert_text(&mut self, text: String) {
        if self.insertion < InsertionMode::InBody {
            let whitespace_only = text.bytes().all(|b| b.is_ascii_whitespace());
            if whitespace_only {
                // Inter-element whitespace before the body only survives inside head.
                if self.insertion == InsertionMode::InHead {
                    let parent = self.current_parent();
                    self.arena.add_text(parent, text);
                }
                return;
            }
            if self.insertion == InsertionMode::InHead && !self.open.is_empty() {
                let parent = self.current_parent();
                self.arena.add_text(parent, text);
                return;
            }
            self.ensure_body();
        }
        let parent = self.current_parent();
        self.arena.add_text(parent, text);
    }

    fn start_tag(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        match name.as_str() {
            "html" => {
                if self.mode == BuildMode::Document {
                    let html = self.ensure_html();
                    self.arena.merge_attributes(html, attributes);
                }
                return;
            }
            "head" => {
                if self.mode == BuildMode::Document && self.insertion <= InsertionMode::BeforeHead
                {
                    self.ensure_html();
                    let html = self.html.unwrap_or(self.root);
                    let head = self.arena.add_child(html, ArenaNode::element(name, attributes));
                    self.head = Some(head);
                    self.insertion = InsertionMode::InHead;
                }
                return;
            }
            "body" => {
                if self.mode == BuildMode::Document {
                    match self.body {
                        Some(body) => self.arena.merge_attributes(body, attributes),
                        None => self.open_body(attributes),
                    }
                }
                return;
            }
            _ => {}
        }

        if self.insertion < InsertionMode::InBody {
            if is_head_element(&name) {
                self.ensure_head();
                if self.insertion == InsertionMode::AfterHead {
                    // Late head content still belongs to head; keep the head open for it.
                    self.insertion = InsertionMode::InHead;
                }
                self.insert_element(name, attributes, self_closing);
                return;
            }
            self.ensure_body();
        }

        self.close_implied(&name);
        self.insert_element(name, attributes, self_closing);
    }

    fn insert_element(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        let parent = self.current_parent();
        let foreign = name == "svg" || name == "math" || self.arena.is_foreign(parent);
        // `<div/>` opens a div in HTML content; only void and foreign elements self-close.
        let closes_immediately = is_void_element(&name) || (self_closing && foreign);
        let mut node = ArenaNode::element(name, attributes);
        node.set_foreign(foreign);
        let index = self.arena.add_child(parent, node);
        if !closes_immediately {
            self.open.push(index);
        }
    }

    fn close_implied(&mut self, name: &str) {
        if closes_paragraph(name) {
            self.close_in_scope("p", ScopeKind::Button);
        }
        if is_heading(name) {
            if let Some(&top) = self.open.last() {
                if self.arena.element_name(top).is_some_and(is_heading) {
                    self.open.pop();
                }
            }
        }
        match name {
            "li" => self.close_in_scope("li", ScopeKind::ListItem),
            "dt" | "dd" => {
                self.close_in_scope("dt", ScopeKind::DefinitionList);
                self.close_in_scope("dd", ScopeKind::DefinitionList);
            }
            "option" => {
                if let Some(&top) = self.open.last() {
                    if self.arena.is_element_named(top, "option") {
                        self.open.pop();
                    }
                }
            }
            _ => {}
        }
    }

    /// Pop up to and including the nearest open `target`, unless a scope boundary comes first.
    fn close_in_scope(&mut self, target: &str, kind: ScopeKind) {
        for pos in (0..self.open.len()).rev() {
            let index = self.open[pos];
            let Some(name) = self.arena.element_name(index) else {
                continue;
            };
            if name == target {
                self.open.truncate(pos);
                return;
            }
            if is_scope_boundary(name, kind) {
                return;
            }
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "html" | "body" if self.mode == BuildMode::Document => {
                if self.insertion < InsertionMode::InBody {
                    self.ensure_body();
                }
                return;
            }
            "head" if self.mode == BuildMode::Document => {
                if self.insertion == InsertionMode::InHead {
                    self.open.clear();
                    self.insertion = InsertionMode::AfterHead;
                }
                return;
            }
            _ => {}
        }

        // Unmatched end tags are ignored.
        if let Some(pos) = self
            .open
            .iter()
            .rposition(|&i| self.arena.is_element_named(i, name))
        {
            self.open.truncate(pos);
        }
    }

    fn ensure_html(&mut self) -> usize {
        if let Some(html) = self.html {
            return html;
        }
        let html = self
            .arena
            .add_child(self.root, ArenaNode::element("html".to_string(), Vec::new()));
        self.html = Some(html);
        self.insertion = InsertionMode::BeforeHead;
        html
    }

    fn ensure_head(&mut self) -> usize {
        if let Some(head) = self.head {
            return head;
        }
        let html = self.ensure_html();
        let head = self
            .arena
            .add_child(html, ArenaNode::element("head".to_string(), Vec::new()));
        self.head = Some(head);
        self.insertion = InsertionMode::InHead;
        head
    }

    fn ensure_body(&mut self) {
        if self.mode == BuildMode::Fragment || self.body.is_some() {
            return;
        }
        self.open_body(Vec::new());
    }

    fn open_body(&mut self, attributes: Vec<Attribute>) {
        self.ensure_head();
        let html = self.html.unwrap_or(self.root);
        let body = self
            .arena
            .add_child(html, ArenaNode::element("body".to_string(), attributes));
        self.body = Some(body);
        self.open.clear();
        self.insertion = InsertionMode::InBody;
    }

    #[cfg(feature = "parser_invariants")]
    fn check_invariants(&self) {
        for &index in &self.open {
            assert!(
                self.arena.element_name(index).is_some(),
                "open element stack holds a non-element"
            );
        }
        if self.body.is_some() {
            assert_eq!(self.insertion, InsertionMode::InBody);
        }
    }
}

#[derive(Debug)]
enum ArenaNode {
    Document {
        doctype: Option<String>,
        children: Vec<usize>,
    },
    Element {
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<usize>,
        /// Inside `svg` or `math`, where `/>` closes the element.
        foreign: bool,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl ArenaNode {
    fn element(name: String, attributes: Vec<Attribute>) -> Self {
        ArenaNode::Element {
            name,
            attributes,
            children: Vec::new(),
            foreign: false,
        }
    }

    fn set_foreign(&mut self, value: bool) {
        if let ArenaNode::Element { foreign, .. } = self {
            *foreign = value;
        }
    }

    fn children(&self) -> Option<&[usize]> {
        match self {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                Some(children)
            }
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => None,
        }
    }
}

#[derive(Debug)]
struct NodeArena {
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: ArenaNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    fn add_child(&mut self, parent_index: usize, child: ArenaNode) -> usize {
        let child_index = self.push(child);
        match &mut self.nodes[parent_index] {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                children.push(child_index);
            }
            // The builder only ever passes document/element indices as parents.
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => {
                debug_assert!(false, "dom builder parent cannot have children");
            }
        }
        child_index
    }

    /// Append text, coalescing with a preceding text sibling.
    fn add_text(&mut self, parent_index: usize, text: String) {
        let last = self.nodes[parent_index]
            .children()
            .and_then(|children| children.last().copied());
        if let Some(last) = last {
            if let ArenaNode::Text { text: prev } = &mut self.nodes[last] {
                prev.push_str(&text);
                return;
            }
        }
        self.add_child(parent_index, ArenaNode::Text { text });
    }

    fn set_doctype(&mut self, root_index: usize, doctype: String) {
        if let ArenaNode::Document { doctype: dt, .. } = &mut self.nodes[root_index] {
            *dt = Some(doctype);
        }
    }

    fn merge_attributes(&mut self, node_index: usize, extra: Vec<Attribute>) {
        if let ArenaNode::Element { attributes, .. } = &mut self.nodes[node_index] {
            for (key, value) in extra {
                if !attributes.iter().any(|(k, _)| *k == key) {
                    attributes.push((key, value));
                }
            }
        }
    }

    fn element_name(&self, node_index: usize) -> Option<&str> {
        match &self.nodes[node_index] {
            ArenaNode::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn is_foreign(&self, node_index: usize) -> bool {
        matches!(self.nodes[node_index], ArenaNode::Element { foreign: true, .. })
    }

    fn is_element_named(&self, node_index: usize, target: &str) -> bool {
        self.element_name(node_index)
            .is_some_and(|name| name.eq_ignore_ascii_case(target))
    }

    fn into_dom(self, root_index: usize) -> Node {
        let mut nodes = self.nodes;
        let mut built_nodes: Vec<Node> = Vec::with_capacity(nodes.len());

        fn take_children(n: usize, built: &mut Vec<Node>) -> Vec<Node> {
            let at = built.len().saturating_sub(n);
            built.split_off(at)
        }

        // Iterative postorder traversal over the arena:
        // - First time we see a node, we schedule it for construction (visited=true) and then
        //   descend into its children.
        // - When we see it again, all of its descendants have already been built and its direct
        //   children are the last `child_count` entries of `built_nodes`, in original order.
        let mut stack: Vec<(usize, bool)> = vec![(root_index, false)];

        while let Some((node_index, visited)) = stack.pop() {
            if !visited {
                stack.push((node_index, true));
                if let Some(children) = nodes[node_index].children() {
                    for &child_index in children.iter().rev() {
                        stack.push((child_index, false));
                    }
                }
                continue;
            }

            let node = match &mut nodes[node_index] {
                ArenaNode::Document { doctype, children } => {
                    let child_count = children.len();
                    Node::Document {
                        doctype: doctype.take(),
                        children: take_children(child_count, &mut built_nodes),
                    }
                }
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                    ..
                } => {
                    let child_count = children.len();
                    Node::Element {
                        name: std::mem::take(name),
                        attributes: std::mem::take(attributes),
                        children: take_children(child_count, &mut built_nodes),
                    }
                }
                ArenaNode::Text { text } => Node::Text {
                    text: std::mem::take(text),
                },
                ArenaNode::Comment { text } => Node::Comment {
                    text: std::mem::take(text),
                },
            };

            built_nodes.push(node);
        }

        debug_assert_eq!(built_nodes.len(), 1, "dom builder should build exactly one root");
        built_nodes
            .pop()
            .unwrap_or_else(|| Node::document(Vec::new()))
    }
}
