use super::ast::{Alignment, Heading, Node, NodeKind};
use super::render::Renderer;
use super::walk::WalkStatus;
use serde::Deserialize;
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlOptions {
    /// Wrap the output in a complete HTML document.
    pub complete_page: bool,
    /// Document title for complete pages. When empty, the document's own title
    /// is used.
    pub title: String,
    /// Stylesheet to link from complete pages.
    pub css: Option<String>,
    /// Open absolute links in a new tab.
    pub href_target_blank: bool,
}

/// Renders a document tree to HTML.
///
/// Markup follows pulldown-cmark's own HTML writer, so output from this
/// renderer lines up with `pulldown_cmark::html::push_html` for the common
/// constructs.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
    table_alignments: Vec<Alignment>,
    in_table_head: bool,
    cell_index: usize,
}

impl HtmlRenderer {
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    fn heading(&self, out: &mut String, heading: &Heading, entering: bool) {
        if !entering {
            let _ = writeln!(out, "</h{}>", heading.level);
            return;
        }

        cr(out);
        let _ = write!(out, "<h{}", heading.level);
        if let Some(id) = heading.id() {
            out.push_str(" id=\"");
            escape_html(out, &id);
            out.push('"');
        }
        let mut classes: Vec<&str> = heading.classes.iter().map(String::as_str).collect();
        if heading.is_title_block {
            classes.insert(0, "title");
        }
        if !classes.is_empty() {
            out.push_str(" class=\"");
            escape_html(out, &classes.join(" "));
            out.push('"');
        }
        out.push('>');
    }

    fn link(&self, out: &mut String, dest: &str, title: &str) {
        out.push_str("<a href=\"");
        escape_href(out, dest);
        out.push('"');
        if !title.is_empty() {
            out.push_str(" title=\"");
            escape_html(out, title);
            out.push('"');
        }
        if self.options.href_target_blank && is_absolute_url(dest) {
            out.push_str(" target=\"_blank\"");
        }
        out.push('>');
    }

    fn table_cell(&mut self, out: &mut String, entering: bool) {
        let tag = if self.in_table_head { "th" } else { "td" };
        if !entering {
            let _ = write!(out, "</{tag}>");
            self.cell_index += 1;
            return;
        }

        let _ = write!(out, "<{tag}");
        match self.table_alignments.get(self.cell_index) {
            Some(Alignment::Left) => out.push_str(" style=\"text-align: left\""),
            Some(Alignment::Center) => out.push_str(" style=\"text-align: center\""),
            Some(Alignment::Right) => out.push_str(" style=\"text-align: right\""),
            Some(Alignment::None) | None => (),
        }
        out.push('>');
    }
}

impl Renderer for HtmlRenderer {
    fn render_node(&mut self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
        match &node.kind {
            NodeKind::Document | NodeKind::Span | NodeKind::HtmlBlock => (),
            NodeKind::Metadata => return WalkStatus::SkipChildren,
            NodeKind::Paragraph => {
                if entering {
                    cr(out);
                    out.push_str("<p>");
                } else {
                    out.push_str("</p>\n");
                }
            }
            NodeKind::Heading(heading) => self.heading(out, heading, entering),
            NodeKind::BlockQuote => {
                cr(out);
                out.push_str(if entering {
                    "<blockquote>\n"
                } else {
                    "</blockquote>\n"
                });
            }
            NodeKind::List { start } => {
                if entering {
                    cr(out);
                    match start {
                        None => out.push_str("<ul>\n"),
                        Some(1) => out.push_str("<ol>\n"),
                        Some(n) => {
                            let _ = writeln!(out, "<ol start=\"{n}\">");
                        }
                    }
                } else {
                    cr(out);
                    out.push_str(if start.is_some() { "</ol>\n" } else { "</ul>\n" });
                }
            }
            NodeKind::Item => {
                if entering {
                    cr(out);
                    out.push_str("<li>");
                } else {
                    out.push_str("</li>\n");
                }
            }
            NodeKind::FootnoteDefinition(footnote) => {
                if entering {
                    cr(out);
                    out.push_str("<div class=\"footnote-definition\" id=\"");
                    escape_html(out, &footnote.label);
                    let _ = write!(
                        out,
                        "\"><sup class=\"footnote-definition-label\">{}</sup>",
                        footnote.number
                    );
                } else {
                    out.push_str("</div>\n");
                }
            }
            NodeKind::DefinitionList => {
                cr(out);
                out.push_str(if entering { "<dl>\n" } else { "</dl>\n" });
            }
            NodeKind::DefinitionTitle => {
                if entering {
                    cr(out);
                    out.push_str("<dt>");
                } else {
                    out.push_str("</dt>\n");
                }
            }
            NodeKind::DefinitionDetails => {
                if entering {
                    cr(out);
                    out.push_str("<dd>");
                } else {
                    out.push_str("</dd>\n");
                }
            }
            NodeKind::Table(alignments) => {
                if entering {
                    self.table_alignments = alignments.clone();
                    cr(out);
                    out.push_str("<table>");
                } else {
                    self.table_alignments.clear();
                    out.push_str("</tbody></table>\n");
                }
            }
            NodeKind::TableHead => {
                self.in_table_head = entering;
                if entering {
                    self.cell_index = 0;
                    out.push_str("<thead><tr>");
                } else {
                    out.push_str("</tr></thead><tbody>\n");
                }
            }
            NodeKind::TableRow => {
                if entering {
                    self.cell_index = 0;
                    out.push_str("<tr>");
                } else {
                    out.push_str("</tr>\n");
                }
            }
            NodeKind::TableCell => self.table_cell(out, entering),
            NodeKind::Emphasis => out.push_str(if entering { "<em>" } else { "</em>" }),
            NodeKind::Strong => out.push_str(if entering { "<strong>" } else { "</strong>" }),
            NodeKind::Strikethrough => out.push_str(if entering { "<del>" } else { "</del>" }),
            NodeKind::Link { dest, title } => {
                if entering {
                    self.link(out, dest, title);
                } else {
                    out.push_str("</a>");
                }
            }
            NodeKind::Image { dest, title } => {
                // The alt text is written here as plain text, so the children
                // don't get rendered as markup.
                out.push_str("<img src=\"");
                escape_href(out, dest);
                out.push_str("\" alt=\"");
                escape_html(out, &node.text_content());
                out.push('"');
                if !title.is_empty() {
                    out.push_str(" title=\"");
                    escape_html(out, title);
                    out.push('"');
                }
                out.push_str(" />");
                return WalkStatus::SkipChildren;
            }
            NodeKind::Text(text) => escape_html(out, text),
            NodeKind::Code(code) => {
                out.push_str("<code>");
                escape_html(out, code);
                out.push_str("</code>");
            }
            NodeKind::Html(html) | NodeKind::InlineHtml(html) => out.push_str(html),
            NodeKind::InlineMath(math) => {
                out.push_str("<span class=\"math math-inline\">");
                escape_html(out, math);
                out.push_str("</span>");
            }
            NodeKind::DisplayMath(math) => {
                out.push_str("<span class=\"math math-display\">");
                escape_html(out, math);
                out.push_str("</span>");
            }
            NodeKind::CodeBlock { info, literal } => {
                cr(out);
                match info.split_whitespace().next() {
                    Some(lang) => {
                        out.push_str("<pre><code class=\"language-");
                        escape_html(out, lang);
                        out.push_str("\">");
                    }
                    None => out.push_str("<pre><code>"),
                }
                escape_html(out, literal);
                out.push_str("</code></pre>\n");
            }
            NodeKind::FootnoteReference(footnote) => {
                out.push_str("<sup class=\"footnote-reference\"><a href=\"#");
                escape_html(out, &footnote.label);
                let _ = write!(out, "\">{}</a></sup>", footnote.number);
            }
            NodeKind::TaskListMarker(checked) => {
                out.push_str("<input disabled=\"\" type=\"checkbox\"");
                if *checked {
                    out.push_str(" checked=\"\"");
                }
                out.push_str("/>\n");
            }
            NodeKind::SoftBreak => out.push('\n'),
            NodeKind::HardBreak => out.push_str("<br />\n"),
            NodeKind::Rule => {
                cr(out);
                out.push_str("<hr />\n");
            }
        }
        WalkStatus::GoToNext
    }

    fn render_header(&mut self, out: &mut String, doc: &Node) {
        self.table_alignments.clear();
        self.in_table_head = false;
        self.cell_index = 0;

        if !self.options.complete_page {
            return;
        }

        let title = match self.options.title.as_str() {
            "" => super::document_title(doc).unwrap_or_default(),
            title => title.to_string(),
        };
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <title>");
        escape_html(out, &title);
        out.push_str("</title>\n  <meta charset=\"utf-8\">\n");
        if let Some(css) = &self.options.css {
            out.push_str("  <link rel=\"stylesheet\" type=\"text/css\" href=\"");
            escape_href(out, css);
            out.push_str("\">\n");
        }
        out.push_str("</head>\n<body>\n\n");
    }

    fn render_footer(&mut self, out: &mut String, _doc: &Node) {
        if self.options.complete_page {
            out.push_str("\n</body>\n</html>\n");
        }
    }
}

/// Start a new line unless we're already at the start of one.
fn cr(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

pub fn escape_html(out: &mut String, text: &str) {
    let mut last = 0;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => continue,
        };
        out.push_str(&text[last..i]);
        out.push_str(esc);
        last = i + 1;
    }
    out.push_str(&text[last..]);
}

/// Bytes that may appear in an href unchanged.
fn href_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-_.+!*(),%#@?=;:/$~".contains(&b)
}

pub fn escape_href(out: &mut String, url: &str) {
    for b in url.bytes() {
        match b {
            b'&' => out.push_str("&amp;"),
            b'\'' => out.push_str("&#x27;"),
            b if href_safe(b) => out.push(b as char),
            b => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
}

/// Whether a link leaves the site: it names a scheme before any path, or
/// it is protocol-relative.
fn is_absolute_url(url: &str) -> bool {
    let path_start = url.find('/').unwrap_or(url.len());
    url[..path_start].contains(':') || url[path_start..].starts_with("//")
}
