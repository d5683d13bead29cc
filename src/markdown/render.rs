use super::ast::Node;
use super::walk::{WalkStatus, walk};

/// Something that turns a document tree into output, one node at a time.
pub trait Renderer {
    /// Render a single node into `out`. Leaves are rendered once, with
    /// `entering == true`; containers are rendered on the way in and again on
    /// the way out. The returned status steers the walk that drives rendering,
    /// e.g., `SkipChildren` when the node already rendered its own contents.
    fn render_node(&mut self, out: &mut String, node: &Node, entering: bool) -> WalkStatus;

    /// Output preceding the document body. Gets the whole tree in case it needs
    /// to inspect it.
    fn render_header(&mut self, _out: &mut String, _doc: &Node) {}

    /// Output following the document body.
    fn render_footer(&mut self, _out: &mut String, _doc: &Node) {}
}

/// Render a whole document: header, every node in order, then footer.
pub fn render<R: Renderer + ?Sized>(doc: &Node, renderer: &mut R) -> String {
    let mut buf = String::new();
    renderer.render_header(&mut buf, doc);
    walk(doc, |node, entering| {
        renderer.render_node(&mut buf, node, entering)
    });
    renderer.render_footer(&mut buf, doc);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ast::NodeKind;

    /// Writes an s-expression-ish trace of the walk.
    struct Trace;

    impl Renderer for Trace {
        fn render_node(&mut self, out: &mut String, node: &Node, entering: bool) -> WalkStatus {
            match (&node.kind, entering) {
                (NodeKind::Text(t), _) => out.push_str(t),
                (NodeKind::Image { .. }, true) => {
                    out.push_str("[img]");
                    return WalkStatus::SkipChildren;
                }
                (_, true) => out.push('('),
                (_, false) => out.push(')'),
            }
            WalkStatus::GoToNext
        }

        fn render_header(&mut self, out: &mut String, _doc: &Node) {
            out.push_str("<<");
        }

        fn render_footer(&mut self, out: &mut String, _doc: &Node) {
            out.push_str(">>");
        }
    }

    #[test]
    fn header_body_footer() {
        let doc = Node::document(vec![Node::with_children(
            NodeKind::Paragraph,
            vec![Node::text("a"), Node::text("b")],
        )]);
        assert_eq!(render(&doc, &mut Trace), "<<((ab))>>");
    }

    #[test]
    fn renderer_controls_walk() {
        let image = Node::with_children(
            NodeKind::Image {
                dest: "x.png".into(),
                title: String::new(),
            },
            vec![Node::text("alt")],
        );
        let doc = Node::document(vec![image, Node::text("c")]);
        assert_eq!(render(&doc, &mut Trace), "<<([img]c)>>");
    }

    #[test]
    fn default_header_and_footer_are_empty() {
        struct Bare;
        impl Renderer for Bare {
            fn render_node(&mut self, out: &mut String, _: &Node, _: bool) -> WalkStatus {
                out.push('.');
                WalkStatus::GoToNext
            }
        }
        assert_eq!(render(&Node::document(vec![]), &mut Bare), "..");
    }
}
