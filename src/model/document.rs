//! Document model - the ordered page sequence that holds all content
//!
//! Invariants: there is always at least one page, page order is reading
//! order, and a content node is owned by exactly one page.

use super::node::Node;
use super::page::{Page, PageId};

/// The whole multi-page document
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
    next_page_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with a single empty page
    pub fn new() -> Self {
        let mut doc = Self {
            pages: Vec::new(),
            next_page_id: 1,
        };
        doc.create_page();
        doc
    }

    /// Rebuild a document from per-page node lists.
    ///
    /// An empty list yields a single fresh page.
    pub fn from_pages(pages: Vec<Vec<Node>>) -> Self {
        let mut doc = Self {
            pages: Vec::with_capacity(pages.len().max(1)),
            next_page_id: 1,
        };
        for nodes in pages {
            let id = doc.next_id();
            doc.pages.push(Page::with_nodes(id, nodes));
        }
        if doc.pages.is_empty() {
            doc.create_page();
        }
        doc
    }

    fn next_id(&mut self) -> PageId {
        let id = PageId(self.next_page_id);
        self.next_page_id += 1;
        id
    }

    /// Append a new empty, editable page and return its id
    pub fn create_page(&mut self) -> PageId {
        let id = self.next_id();
        self.pages.push(Page::new(id));
        tracing::debug!(target: "pages", page = id.0, count = self.pages.len(), "created page");
        id
    }

    /// Insert a new page holding `nodes` directly after `after`.
    ///
    /// Falls back to appending when `after` is not in the document.
    pub fn insert_page_after(&mut self, after: PageId, nodes: Vec<Node>) -> PageId {
        let id = self.next_id();
        let at = self
            .index_of(after)
            .map(|i| i + 1)
            .unwrap_or(self.pages.len());
        self.pages.insert(at, Page::with_nodes(id, nodes));
        tracing::debug!(target: "pages", page = id.0, index = at, "inserted page");
        id
    }

    /// Drop every page and start over with one empty page
    pub fn reset(&mut self) -> PageId {
        self.pages.clear();
        self.create_page()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    /// The page with `id`, or the last page when it is gone
    pub fn page_or_last(&self, id: PageId) -> &Page {
        match self.index_of(id) {
            Some(i) => &self.pages[i],
            None => &self.pages[self.pages.len() - 1],
        }
    }

    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn first_page_id(&self) -> PageId {
        self.pages[0].id
    }

    pub fn last_page_id(&self) -> PageId {
        self.pages[self.pages.len() - 1].id
    }

    /// Page id by 0-based reading index
    pub fn page_id_at(&self, index: usize) -> Option<PageId> {
        self.pages.get(index).map(|p| p.id)
    }

    /// Concatenation of every page's content nodes, in reading order
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.pages.iter().flat_map(|p| p.nodes.iter()).collect()
    }

    /// Rendered text of every page, separated by a blank line
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text_content)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }
}
