use super::ast::{Heading, Node};
use super::render::Renderer;
use super::walk::{WalkStatus, walk};
use log::debug;

/// Closes the current item and starts a sibling at the same depth.
const NEXT_ITEM: &str = "</li>\n\n<li>";
/// Opens one more level of nesting.
const OPEN_LEVEL: &str = "\n<ul>\n<li>";
/// Closes one level of nesting.
const CLOSE_LEVEL: &str = "</li>\n</ul>";

/// The anchor id given to the `n`th (zero-based) heading in the TOC.
pub fn heading_id(n: usize) -> String {
    format!("toc_{n}")
}

/// Build a table of contents: nested lists with one item per heading, in
/// document order, each linking to its heading.
///
/// As a side effect, every heading that appears in the TOC gets its id set to
/// the anchor the TOC links to, so this must run before the body is rendered.
/// Title-block headings are left out entirely.
///
/// `renderer` is used only for the inline contents of each heading. The list
/// structure itself is always HTML.
///
/// Nesting starts at the shallowest heading level that actually occurs: a
/// document whose headings are all `h2` and deeper gets a single top-level
/// list of `h2`s, not a list holding one empty item that wraps them.
pub fn synthesize_toc<R: Renderer + ?Sized>(doc: &Node, renderer: &mut R) -> String {
    let Some(min_level) = min_heading_level(doc) else {
        return String::new();
    };

    // Levels above the shallowest one present are never opened.
    let base_level = min_level.saturating_sub(1);
    let mut toc = TableOfContents {
        renderer,
        buf: String::new(),
        in_heading: false,
        base_level,
        current_level: base_level,
        heading_count: 0,
    };
    walk(doc, |node, entering| toc.visit(node, entering));

    debug!(
        "table of contents: {} headings, shallowest level {}",
        toc.heading_count, min_level
    );
    toc.finish()
}

/// The smallest level among the headings that go into the TOC.
fn min_heading_level(doc: &Node) -> Option<u8> {
    let mut min: Option<u8> = None;
    walk(doc, |node, entering| {
        if let Some(heading) = node.as_heading()
            && entering
            && !heading.is_title_block
        {
            min = Some(min.map_or(heading.level, |m| m.min(heading.level)));
        }
        WalkStatus::GoToNext
    });
    min
}

struct TableOfContents<'r, R: ?Sized> {
    renderer: &'r mut R,
    buf: String,
    /// Between a TOC heading's enter and exit.
    in_heading: bool,
    /// Nesting depth that the TOC starts and ends at.
    base_level: u8,
    /// Nesting depth of the currently open item.
    current_level: u8,
    heading_count: usize,
}

impl<R: Renderer + ?Sized> TableOfContents<'_, R> {
    fn visit(&mut self, node: &Node, entering: bool) -> WalkStatus {
        if let Some(heading) = node.as_heading()
            && !heading.is_title_block
        {
            self.in_heading = entering;
            if entering {
                self.start_entry(heading);
            } else {
                self.buf.push_str("</a>");
            }
            return WalkStatus::GoToNext;
        }

        if self.in_heading {
            self.renderer.render_node(&mut self.buf, node, entering)
        } else {
            WalkStatus::GoToNext
        }
    }

    fn start_entry(&mut self, heading: &Heading) {
        let id = heading_id(self.heading_count);
        heading.set_id(id.clone());

        // Headings may jump by several levels in either direction, so open or
        // close as many lists as it takes.
        if heading.level <= self.current_level {
            while self.current_level > heading.level {
                self.current_level -= 1;
                self.buf.push_str(CLOSE_LEVEL);
            }
            self.buf.push_str(NEXT_ITEM);
        } else {
            while self.current_level < heading.level {
                self.current_level += 1;
                self.buf.push_str(OPEN_LEVEL);
            }
        }

        self.buf.push_str("<a href=\"#");
        self.buf.push_str(&id);
        self.buf.push_str("\">");
        self.heading_count += 1;
    }

    fn finish(mut self) -> String {
        while self.current_level > self.base_level {
            self.current_level -= 1;
            self.buf.push_str(CLOSE_LEVEL);
        }
        self.buf
    }
}
