use log::trace;

use crate::syntax::SyntaxNode;

/// Pre-order walk over every node of a tree: parents before children,
/// children left to right.
pub struct Walk<N> {
    stack: Vec<(N, usize)>,
}

pub fn walk<N: SyntaxNode>(root: N) -> Walk<N> {
    Walk {
        stack: vec![(root, 0)],
    }
}

impl<N: SyntaxNode> Iterator for Walk<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let (node, depth) = self.stack.pop()?;
        trace!(
            "{}type: {}, text: {}",
            " ".repeat(depth * 2),
            node.kind(),
            node.text()
        );
        // Reversed so the leftmost child is popped first
        let children = node.children();
        self.stack
            .extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        Some(node)
    }
}

/// Collects the whole walk up front.
pub fn flatten<N: SyntaxNode>(root: N) -> Vec<N> {
    walk(root).collect()
}
