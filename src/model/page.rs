//! Page - a fixed-capacity container holding a contiguous run of content

use super::node::Node;
use super::selection::Position;
use super::tree;

/// Unique identifier for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub u64);

/// A page container and the content nodes it currently owns
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    /// Top-level content nodes in reading order
    pub nodes: Vec<Node>,
    /// Whether the page accepts direct text editing
    pub editable: bool,
}

impl Page {
    /// Create an empty, editable page
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            editable: true,
        }
    }

    pub fn with_nodes(id: PageId, nodes: Vec<Node>) -> Self {
        Self {
            id,
            nodes,
            editable: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Node::is_empty)
    }

    /// Total caret units on this page
    pub fn len(&self) -> usize {
        tree::seq_len(&self.nodes)
    }

    /// Convert a node/offset position into a page-local flat offset
    pub fn flat_offset(&self, node: usize, offset: usize) -> usize {
        let before: usize = self.nodes.iter().take(node).map(Node::len).sum();
        let within = self
            .nodes
            .get(node)
            .map(|n| offset.min(n.len()))
            .unwrap_or(0);
        before + within
    }

    /// Convert a page-local flat offset back into a position.
    ///
    /// An offset on a node boundary resolves to the end of the earlier node.
    pub fn position_at(&self, flat: usize) -> Position {
        let mut start = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let end = start + node.len();
            if flat <= end {
                return Position::new(self.id, i, flat - start);
            }
            start = end;
        }
        self.end_position()
    }

    /// Like [`Page::position_at`], but a boundary resolves to the start of
    /// the later node
    pub fn position_after(&self, flat: usize) -> Position {
        let mut start = 0;
        let last = self.nodes.len().saturating_sub(1);
        for (i, node) in self.nodes.iter().enumerate() {
            let end = start + node.len();
            if flat < end || (flat == end && i == last) {
                return Position::new(self.id, i, flat.saturating_sub(start));
            }
            start = end;
        }
        self.end_position()
    }

    /// Position just after the last caret unit
    pub fn end_position(&self) -> Position {
        match self.nodes.len() {
            0 => Position::new(self.id, 0, 0),
            n => Position::new(self.id, n - 1, self.nodes[n - 1].len()),
        }
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.id, 0, 0)
    }

    /// Rendered text of the page, one line per block
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_text(&mut out);
        }
        out.trim_end_matches('\n').to_string()
    }
}
