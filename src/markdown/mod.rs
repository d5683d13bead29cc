mod add_ids;
pub mod ast;
pub mod html;
mod parser;
mod preprocess;
mod render;
mod toc;
pub mod walk;

pub use add_ids::{assign_heading_ids, slugify};
pub use ast::{Footnote, Heading, Node, NodeKind};
pub use html::{HtmlOptions, HtmlRenderer};
pub use parser::{ParseOptions, Parser};
pub use preprocess::{has_toc_marker, preprocess};
pub use render::{Renderer, render};
pub use toc::{heading_id, synthesize_toc};
pub use walk::{WalkStatus, try_walk, walk};

use log::debug;

/// The result of converting a markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Table of contents fragment. Empty unless the source asked for one with
    /// a `[TOC]` marker.
    pub toc: String,
    pub body: String,
    pub title: Option<String>,
}

/// Preprocess and parse a markdown document. Without a parser, the default
/// configuration is used.
pub fn parse(source: &str, parser: Option<&Parser>) -> Node {
    let source = preprocess(source);
    match parser {
        Some(parser) => parser.parse(&source),
        None => Parser::default().parse(&source),
    }
}

/// Convert markdown to HTML with the default parser and renderer.
pub fn to_html(source: &str) -> Rendered {
    to_html_with(source, &Parser::default(), &mut HtmlRenderer::default())
}

/// Convert markdown with a custom parser and renderer. If the source contains
/// a `[TOC]` marker, a table of contents is built too, and the body's headings
/// carry the ids it links to.
pub fn to_html_with<R: Renderer + ?Sized>(
    source: &str,
    parser: &Parser,
    renderer: &mut R,
) -> Rendered {
    let doc = parse(source, Some(parser));

    // The TOC assigns heading ids, so it has to come before the body.
    let toc = if has_toc_marker(source) {
        synthesize_toc(&doc, renderer)
    } else {
        String::new()
    };
    let body = render(&doc, renderer);
    debug!("rendered {} bytes of body, {} of TOC", body.len(), toc.len());

    Rendered {
        toc,
        body,
        title: document_title(&doc),
    }
}

/// The document's title: its title block if it has one, or else its first
/// heading if that heading is top-level.
pub fn document_title(doc: &Node) -> Option<String> {
    let mut title_block = None;
    let mut first_heading = None;
    walk(doc, |node, _| {
        let Some(heading) = node.as_heading() else {
            return WalkStatus::GoToNext;
        };
        if heading.is_title_block {
            title_block = Some(node.text_content());
            return WalkStatus::Terminate;
        }
        if first_heading.is_none() {
            first_heading = Some((heading.level, node.text_content()));
        }
        WalkStatus::SkipChildren
    });
    title_block.or(first_heading
        .filter(|(level, _)| *level == 1)
        .map(|(_, text)| text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_marker() {
        let out = to_html("# A\n\ntext\n");
        assert_eq!(out.toc, "");
        assert_eq!(out.body, "<h1>A</h1>\n<p>text</p>\n");
        assert_eq!(out.title.as_deref(), Some("A"));
    }

    #[test]
    fn with_marker() {
        let out = to_html("[TOC]\n# A\n## B\n");
        assert_eq!(
            out.toc,
            "\n<ul>\n<li><a href=\"#toc_0\">A</a>\
             \n<ul>\n<li><a href=\"#toc_1\">B</a></li>\n</ul></li>\n</ul>"
        );
        assert_eq!(
            out.body,
            "<h1 id=\"toc_0\">A</h1>\n<h2 id=\"toc_1\">B</h2>\n"
        );
    }

    #[test]
    fn text_before_marker_is_dropped() {
        let out = to_html("preamble\n[TOC]\n# A\n");
        assert_eq!(out.body, "<h1 id=\"toc_0\">A</h1>\n");
    }

    #[test]
    fn crlf_source() {
        let out = to_html("[TOC]\r\n## A\r\n\r\nbody\r\n");
        assert_eq!(out.toc, "\n<ul>\n<li><a href=\"#toc_0\">A</a></li>\n</ul>");
        assert_eq!(out.body, "<h2 id=\"toc_0\">A</h2>\n<p>body</p>\n");
    }

    #[test]
    fn title_block_document() {
        let parser = Parser::new(ParseOptions {
            title_block: true,
            ..ParseOptions::default()
        });
        let out = to_html_with(
            "[TOC]\n% The Title\n\n## A\n",
            &parser,
            &mut HtmlRenderer::default(),
        );
        assert_eq!(out.toc, "\n<ul>\n<li><a href=\"#toc_0\">A</a></li>\n</ul>");
        assert_eq!(
            out.body,
            "<h1 class=\"title\">The Title</h1>\n<h2 id=\"toc_0\">A</h2>\n"
        );
        assert_eq!(out.title.as_deref(), Some("The Title"));
    }

    #[test]
    fn default_parser() {
        let doc = parse("[TOC]\nhi", None);
        assert_eq!(doc.text_content(), "hi");
    }

    #[test]
    fn title_needs_top_level_heading() {
        assert_eq!(document_title(&parse("## A\n# B\n", None)), None);
        assert_eq!(document_title(&parse("text\n\n# B\n", None)).as_deref(), Some("B"));
    }

    #[test]
    fn toc_leaves_footnote_numbers_alone() {
        let source = "See[^a].\n\n# H[^b]\n\n[^a]: A\n\n[^b]: B\n";
        let plain = to_html(source);
        let with_toc = to_html(&format!("[TOC]\n{source}"));

        assert!(with_toc.toc.contains("<a href=\"#b\">2</a>"));
        assert!(
            plain
                .body
                .starts_with("<p>See<sup class=\"footnote-reference\"><a href=\"#a\">1</a>")
        );
        assert_eq!(with_toc.body.replace(" id=\"toc_0\"", ""), plain.body);
    }

    #[test]
    fn renderer_reused_across_documents() {
        let parser = Parser::default();
        let mut renderer = HtmlRenderer::default();
        to_html_with("[TOC]\n# A[^a]\n\n[^a]: A\n", &parser, &mut renderer);
        let second = to_html_with("[TOC]\n# B[^b]\n\n[^b]: B\n", &parser, &mut renderer);
        assert_eq!(second, to_html("[TOC]\n# B[^b]\n\n[^b]: B\n"));
        assert!(second.body.contains("<a href=\"#b\">1</a>"));
    }
}
