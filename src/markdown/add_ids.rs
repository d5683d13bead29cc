use super::ast::{Heading, Node};
use super::walk::{WalkStatus, walk};
use std::collections::HashSet;

/// Slugify a string and append it to a buffer.
fn slug_append(buf: &mut String, s: &str) {
    let mut last_is_dash = buf.ends_with('-');
    buf.extend(s.chars().filter_map(|c| {
        if c.is_alphanumeric() {
            last_is_dash = false;
            Some(c.to_ascii_lowercase())
        } else if last_is_dash {
            None
        } else {
            last_is_dash = true;
            Some('-')
        }
    }));
}

pub fn slugify(s: &str) -> String {
    let mut buf = String::new();
    slug_append(&mut buf, s);
    buf.trim_matches('-').to_string()
}

/// Give every heading that doesn't already have an id a slug of its text. Slugs
/// are made unique within the document by appending `-1`, `-2`, and so on, and
/// never reuse an explicit id, even one that comes later in the document.
pub fn assign_heading_ids(doc: &Node) {
    let mut taken: HashSet<String> = HashSet::new();
    for_each_heading(doc, |heading, _| {
        if let Some(id) = heading.id() {
            taken.insert(id);
        }
    });

    for_each_heading(doc, |heading, node| {
        if heading.id().is_none() {
            let id = unique(slugify(&node.text_content()), &taken);
            heading.set_id(id.clone());
            taken.insert(id);
        }
    });
}

fn for_each_heading(doc: &Node, mut f: impl FnMut(&Heading, &Node)) {
    walk(doc, |node, _| {
        let Some(heading) = node.as_heading() else {
            return WalkStatus::GoToNext;
        };
        f(heading, node);
        // Headings don't nest, so there's nothing else to find in here.
        WalkStatus::SkipChildren
    });
}

fn unique(slug: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&slug) {
        return slug;
    }
    (1..)
        .map(|n| format!("{slug}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ast::NodeKind;

    fn heading(text: &str) -> Node {
        Node::with_children(NodeKind::Heading(Heading::new(1)), vec![Node::text(text)])
    }

    fn ids(doc: &Node) -> Vec<Option<String>> {
        doc.children
            .iter()
            .map(|n| n.as_heading().and_then(Heading::id))
            .collect()
    }

    #[test]
    fn simple() {
        assert_eq!(slugify("hi"), "hi");
    }

    #[test]
    fn space() {
        assert_eq!(slugify("h i"), "h-i");
    }

    #[test]
    fn punctuation() {
        assert_eq!(slugify("h'i"), "h-i");
    }

    #[test]
    fn multi_gap() {
        assert_eq!(slugify("h ' i"), "h-i");
    }

    #[test]
    fn trailing_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn keeps_explicit_ids() {
        let doc = Node::document(vec![heading("a"), heading("b")]);
        doc.children[0].as_heading().unwrap().set_id("x");
        assign_heading_ids(&doc);
        assert_eq!(ids(&doc), [Some("x".to_string()), Some("b".to_string())]);
    }

    #[test]
    fn slug_avoids_later_explicit_id() {
        let doc = Node::document(vec![heading("a"), heading("b")]);
        doc.children[1].as_heading().unwrap().set_id("a");
        assign_heading_ids(&doc);
        assert_eq!(ids(&doc), [Some("a-1".to_string()), Some("a".to_string())]);
    }

    #[test]
    fn duplicates() {
        let doc = Node::document(vec![heading("a"), heading("a"), heading("a")]);
        assign_heading_ids(&doc);
        assert_eq!(
            ids(&doc),
            [
                Some("a".to_string()),
                Some("a-1".to_string()),
                Some("a-2".to_string())
            ]
        );
    }

    #[test]
    fn styled_text() {
        let doc = Node::document(vec![Node::with_children(
            NodeKind::Heading(Heading::new(2)),
            vec![
                Node::text("big "),
                Node::with_children(NodeKind::Emphasis, vec![Node::text("news")]),
            ],
        )]);
        assign_heading_ids(&doc);
        assert_eq!(ids(&doc), [Some("big-news".to_string())]);
    }
}
