use std::cell::RefCell;

/// Column alignment in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// A heading's attributes.
///
/// The `id` slot is written during TOC synthesis (or automatic id assignment)
/// and read later by the body renderer, so it lives behind a `RefCell`. That
/// also makes `Node` non-`Sync`: a tree cannot be rendered on one thread while
/// another thread assigns its ids.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heading {
    pub level: u8,
    pub is_title_block: bool,
    pub id: RefCell<Option<String>>,
    pub classes: Vec<String>,
}

impl Heading {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn title_block() -> Self {
        Self {
            level: 1,
            is_title_block: true,
            ..Self::default()
        }
    }

    /// A copy of the current id, if any.
    pub fn id(&self) -> Option<String> {
        self.id.borrow().clone()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        *self.id.borrow_mut() = Some(id.into());
    }
}

/// A footnote label and its number. Footnotes are numbered by the parser in
/// order of first use, whether that's a reference or the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub label: String,
    pub number: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Containers.
    Document,
    Paragraph,
    Heading(Heading),
    BlockQuote,
    HtmlBlock,
    List { start: Option<u64> },
    Item,
    FootnoteDefinition(Footnote),
    DefinitionList,
    DefinitionTitle,
    DefinitionDetails,
    Table(Vec<Alignment>),
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { dest: String, title: String },
    Image { dest: String, title: String },
    Metadata,
    /// Inline container the tree has no dedicated kind for; renders only its
    /// children.
    Span,

    // Leaves.
    Text(String),
    Code(String),
    Html(String),
    InlineHtml(String),
    InlineMath(String),
    DisplayMath(String),
    CodeBlock { info: String, literal: String },
    FootnoteReference(Footnote),
    TaskListMarker(bool),
    SoftBreak,
    HardBreak,
    Rule,
}

/// A node of a parsed markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: vec![],
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn document(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Document, children)
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(s.into()))
    }

    /// Leaves are visited once by the walker; containers are visited on the
    /// way in and on the way out, even when they have no children.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Text(_)
                | NodeKind::Code(_)
                | NodeKind::Html(_)
                | NodeKind::InlineHtml(_)
                | NodeKind::InlineMath(_)
                | NodeKind::DisplayMath(_)
                | NodeKind::CodeBlock { .. }
                | NodeKind::FootnoteReference(_)
                | NodeKind::TaskListMarker(_)
                | NodeKind::SoftBreak
                | NodeKind::HardBreak
                | NodeKind::Rule
        )
    }

    pub fn as_heading(&self) -> Option<&Heading> {
        match &self.kind {
            NodeKind::Heading(h) => Some(h),
            _ => None,
        }
    }

    /// Concatenate the plain text below this node. Breaks become spaces.
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.push_text(&mut buf);
        buf
    }

    fn push_text(&self, buf: &mut String) {
        match &self.kind {
            NodeKind::Text(s) | NodeKind::Code(s) | NodeKind::InlineMath(s) => buf.push_str(s),
            NodeKind::SoftBreak | NodeKind::HardBreak => buf.push(' '),
            _ => {
                for child in &self.children {
                    child.push_text(buf);
                }
            }
        }
    }
}
