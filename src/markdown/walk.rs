use super::ast::Node;
use std::convert::Infallible;

/// What a visitor wants the walker to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Continue with the next node in document order.
    GoToNext,
    /// Don't descend into this node's children and don't visit it on the way
    /// out. No effect on leaves.
    SkipChildren,
    /// Stop the walk immediately.
    Terminate,
}

enum Phase {
    Enter,
    Exit,
}

/// Walk a tree depth-first, calling `visitor` with `entering == true` before a
/// node's children and `entering == false` after them. Leaves are visited once,
/// with `entering == true`.
pub fn walk<'a, F>(root: &'a Node, mut visitor: F)
where
    F: FnMut(&'a Node, bool) -> WalkStatus,
{
    let res: Result<(), Infallible> = try_walk(root, |node, entering| Ok(visitor(node, entering)));
    match res {
        Ok(()) => (),
        Err(never) => match never {},
    }
}

/// Like [`walk`], but the visitor may fail. The first error aborts the walk and
/// is returned unchanged.
pub fn try_walk<'a, F, E>(root: &'a Node, mut visitor: F) -> Result<(), E>
where
    F: FnMut(&'a Node, bool) -> Result<WalkStatus, E>,
{
    // Iterate with an explicit stack so deeply nested documents can't overflow
    // the call stack. Children are pushed in reverse so the first child pops
    // first.
    let mut stack = vec![(root, Phase::Enter)];

    while let Some((node, phase)) = stack.pop() {
        match phase {
            Phase::Enter => match visitor(node, true)? {
                WalkStatus::Terminate => return Ok(()),
                WalkStatus::SkipChildren => (),
                WalkStatus::GoToNext => {
                    if !node.is_leaf() {
                        stack.push((node, Phase::Exit));
                        stack.extend(node.children.iter().rev().map(|c| (c, Phase::Enter)));
                    }
                }
            },
            Phase::Exit => {
                if visitor(node, false)? == WalkStatus::Terminate {
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ast::NodeKind;

    fn sample() -> Node {
        // doc(p(a, em(b)), p(c))
        Node::document(vec![
            Node::with_children(
                NodeKind::Paragraph,
                vec![
                    Node::text("a"),
                    Node::with_children(NodeKind::Emphasis, vec![Node::text("b")]),
                ],
            ),
            Node::with_children(NodeKind::Paragraph, vec![Node::text("c")]),
        ])
    }

    fn label(node: &Node, entering: bool) -> String {
        let name = match &node.kind {
            NodeKind::Document => "doc".to_string(),
            NodeKind::Paragraph => "p".to_string(),
            NodeKind::Emphasis => "em".to_string(),
            NodeKind::Text(t) => t.clone(),
            other => format!("{other:?}"),
        };
        if node.is_leaf() {
            name
        } else if entering {
            format!("+{name}")
        } else {
            format!("-{name}")
        }
    }

    fn trace(root: &Node, mut status: impl FnMut(usize, &Node) -> WalkStatus) -> Vec<String> {
        let mut calls = vec![];
        walk(root, |node, entering| {
            calls.push(label(node, entering));
            status(calls.len(), node)
        });
        calls
    }

    #[test]
    fn pre_and_post_order() {
        let doc = sample();
        assert_eq!(
            trace(&doc, |_, _| WalkStatus::GoToNext),
            ["+doc", "+p", "a", "+em", "b", "-em", "-p", "+p", "c", "-p", "-doc"]
        );
    }

    #[test]
    fn empty_container_visited_twice() {
        let doc = Node::document(vec![]);
        assert_eq!(trace(&doc, |_, _| WalkStatus::GoToNext), ["+doc", "-doc"]);
    }

    #[test]
    fn skip_children() {
        let doc = sample();
        let calls = trace(&doc, |_, node| match node.kind {
            NodeKind::Emphasis => WalkStatus::SkipChildren,
            _ => WalkStatus::GoToNext,
        });
        assert_eq!(calls, ["+doc", "+p", "a", "+em", "-p", "+p", "c", "-p", "-doc"]);
    }

    #[test]
    fn skip_children_on_leaf_is_noop() {
        let doc = sample();
        let calls = trace(&doc, |_, node| {
            if node.is_leaf() {
                WalkStatus::SkipChildren
            } else {
                WalkStatus::GoToNext
            }
        });
        assert_eq!(calls.len(), 11);
    }

    #[test]
    fn terminate_on_third_call() {
        let doc = sample();
        let calls = trace(&doc, |n, _| {
            if n == 3 {
                WalkStatus::Terminate
            } else {
                WalkStatus::GoToNext
            }
        });
        assert_eq!(calls, ["+doc", "+p", "a"]);
    }

    #[test]
    fn terminate_on_exit() {
        let doc = sample();
        let mut calls = 0;
        walk(&doc, |node, entering| {
            calls += 1;
            if !entering && node.kind == NodeKind::Emphasis {
                WalkStatus::Terminate
            } else {
                WalkStatus::GoToNext
            }
        });
        assert_eq!(calls, 6);
    }

    #[test]
    fn error_aborts_walk() {
        let doc = sample();
        let mut calls = 0;
        let res = try_walk(&doc, |node, _| {
            calls += 1;
            match node.kind {
                NodeKind::Emphasis => Err("boom"),
                _ => Ok(WalkStatus::GoToNext),
            }
        });
        assert_eq!(res, Err("boom"));
        assert_eq!(calls, 4);
    }
}
