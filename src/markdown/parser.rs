use super::add_ids;
use super::ast::{Alignment, Footnote, Heading, Node, NodeKind};
use pulldown_cmark::{self as cmark, CodeBlockKind, CowStr, Event, Tag};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;

/// Which markdown extensions to enable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
    /// Allow `# Heading {#id .class}`.
    pub heading_attributes: bool,
    pub math: bool,
    pub definition_lists: bool,
    /// Treat leading `%` lines as a document title block.
    pub title_block: bool,
    /// Give every heading without an explicit id a slug of its text.
    pub auto_heading_ids: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
            heading_attributes: true,
            math: false,
            definition_lists: true,
            title_block: false,
            auto_heading_ids: false,
        }
    }
}

impl ParseOptions {
    fn cmark_options(&self) -> cmark::Options {
        let mut options = cmark::Options::empty();
        let flags = [
            (self.tables, cmark::Options::ENABLE_TABLES),
            (self.footnotes, cmark::Options::ENABLE_FOOTNOTES),
            (self.strikethrough, cmark::Options::ENABLE_STRIKETHROUGH),
            (self.tasklists, cmark::Options::ENABLE_TASKLISTS),
            (self.smart_punctuation, cmark::Options::ENABLE_SMART_PUNCTUATION),
            (self.heading_attributes, cmark::Options::ENABLE_HEADING_ATTRIBUTES),
            (self.math, cmark::Options::ENABLE_MATH),
            (self.definition_lists, cmark::Options::ENABLE_DEFINITION_LIST),
        ];
        for (enabled, flag) in flags {
            if enabled {
                options.insert(flag);
            }
        }
        options
    }
}

/// Parses markdown text into a [`Node`] tree.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a whole document. The result is always rooted at a
    /// [`NodeKind::Document`].
    pub fn parse(&self, source: &str) -> Node {
        let (title, body) = if self.options.title_block {
            split_title_block(source)
        } else {
            (None, source)
        };

        // One numbering for the whole document, title included.
        let mut footnotes = FootnoteNumbers::default();
        let mut children = vec![];
        if let Some(title) = title {
            children.push(self.title_heading(&title, &mut footnotes));
        }
        children.extend(self.parse_blocks(body, &mut footnotes));

        let doc = Node::document(children);
        if self.options.auto_heading_ids {
            add_ids::assign_heading_ids(&doc);
        }
        doc
    }

    fn parse_blocks(&self, source: &str, footnotes: &mut FootnoteNumbers) -> Vec<Node> {
        let mut builder = TreeBuilder::new(footnotes);
        for event in cmark::Parser::new_ext(source, self.options.cmark_options()) {
            builder.push(event);
        }
        builder.finish()
    }

    /// Build the title-block heading, parsing its text as inline markdown.
    fn title_heading(&self, text: &str, footnotes: &mut FootnoteNumbers) -> Node {
        let mut blocks = self.parse_blocks(text, footnotes);
        let inlines = if blocks.first().is_some_and(|b| b.kind == NodeKind::Paragraph) {
            blocks.swap_remove(0).children
        } else {
            vec![Node::text(text)]
        };
        Node::with_children(NodeKind::Heading(Heading::title_block()), inlines)
    }
}

/// Split a leading title block (consecutive lines starting with `%`) off the
/// document. Returns the title text, with each line's `% ` prefix removed, and
/// the rest of the document.
fn split_title_block(source: &str) -> (Option<String>, &str) {
    if !source.starts_with('%') {
        return (None, source);
    }

    let mut lines = vec![];
    let mut rest = source;
    while rest.starts_with('%') {
        let (line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
        lines.push(line.strip_prefix("% ").unwrap_or(line));
        rest = tail;
    }
    (Some(lines.join("\n")), rest)
}

/// Footnote numbers by label, handed out in order of first appearance.
#[derive(Default)]
struct FootnoteNumbers(HashMap<String, usize>);

impl FootnoteNumbers {
    fn footnote(&mut self, label: CowStr) -> Footnote {
        let label = label.into_string();
        let next = self.0.len() + 1;
        let number = *self.0.entry(label.clone()).or_insert(next);
        Footnote { label, number }
    }
}

/// Assembles pulldown-cmark's flat event stream into a tree.
struct TreeBuilder<'f> {
    /// Containers that have started but not ended yet.
    open: Vec<Node>,
    roots: Vec<Node>,
    footnotes: &'f mut FootnoteNumbers,
}

impl<'f> TreeBuilder<'f> {
    fn new(footnotes: &'f mut FootnoteNumbers) -> Self {
        Self {
            open: vec![],
            roots: vec![],
            footnotes,
        }
    }

    fn push(&mut self, event: Event) {
        let leaf = match event {
            Event::Start(Tag::FootnoteDefinition(label)) => {
                let footnote = self.footnotes.footnote(label);
                self.open.push(Node::new(NodeKind::FootnoteDefinition(footnote)));
                return;
            }
            Event::Start(tag) => {
                self.open.push(Node::new(container_kind(tag)));
                return;
            }
            Event::End(_) => {
                if let Some(node) = self.open.pop() {
                    self.append(close(node));
                }
                return;
            }
            Event::Text(s) => NodeKind::Text(s.into_string()),
            Event::Code(s) => NodeKind::Code(s.into_string()),
            Event::InlineMath(s) => NodeKind::InlineMath(s.into_string()),
            Event::DisplayMath(s) => NodeKind::DisplayMath(s.into_string()),
            Event::Html(s) => NodeKind::Html(s.into_string()),
            Event::InlineHtml(s) => NodeKind::InlineHtml(s.into_string()),
            Event::FootnoteReference(label) => {
                NodeKind::FootnoteReference(self.footnotes.footnote(label))
            }
            Event::SoftBreak => NodeKind::SoftBreak,
            Event::HardBreak => NodeKind::HardBreak,
            Event::Rule => NodeKind::Rule,
            Event::TaskListMarker(checked) => NodeKind::TaskListMarker(checked),
        };
        self.append(Node::new(leaf));
    }

    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        // The parser balances its events, but don't lose anything if it didn't.
        while let Some(node) = self.open.pop() {
            self.append(close(node));
        }
        self.roots
    }
}

fn container_kind(tag: Tag) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading {
            level, id, classes, ..
        } => NodeKind::Heading(Heading {
            level: level as u8,
            is_title_block: false,
            id: RefCell::new(id.map(CowStr::into_string)),
            classes: classes.into_iter().map(CowStr::into_string).collect(),
        }),
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => info.into_string(),
                CodeBlockKind::Indented => String::new(),
            },
            literal: String::new(),
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::Item,
        Tag::DefinitionList => NodeKind::DefinitionList,
        Tag::DefinitionListTitle => NodeKind::DefinitionTitle,
        Tag::DefinitionListDefinition => NodeKind::DefinitionDetails,
        Tag::Table(alignments) => {
            NodeKind::Table(alignments.into_iter().map(convert_alignment).collect())
        }
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => NodeKind::Link {
            dest: dest_url.into_string(),
            title: title.into_string(),
        },
        Tag::Image {
            dest_url, title, ..
        } => NodeKind::Image {
            dest: dest_url.into_string(),
            title: title.into_string(),
        },
        Tag::MetadataBlock(_) => NodeKind::Metadata,
        #[allow(unreachable_patterns)]
        _ => NodeKind::Span,
    }
}

fn convert_alignment(alignment: cmark::Alignment) -> Alignment {
    match alignment {
        cmark::Alignment::None => Alignment::None,
        cmark::Alignment::Left => Alignment::Left,
        cmark::Alignment::Center => Alignment::Center,
        cmark::Alignment::Right => Alignment::Right,
    }
}

/// Finish a container once its end event arrives. Code blocks collect their
/// text into a literal and become leaves.
fn close(mut node: Node) -> Node {
    if let NodeKind::CodeBlock { literal, .. } = &mut node.kind {
        for child in node.children.drain(..) {
            if let NodeKind::Text(text) = child.kind {
                literal.push_str(&text);
            }
        }
    }
    node
}
