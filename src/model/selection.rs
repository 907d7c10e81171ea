//! Caret/selection types and the editing context that carries them
//!
//! A [`Selection`] is a weak reference into page content: reflow can move the
//! nodes it points at, so it is saved before anything that steals focus and
//! restored right before the edit that needs it.

use super::page::PageId;

/// A caret position: a content node on a page plus an offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub page: PageId,
    /// Index of the content node within the page
    pub node: usize,
    /// Caret units into that node
    pub offset: usize,
}

impl Position {
    pub fn new(page: PageId, node: usize, offset: usize) -> Self {
        Self { page, node, offset }
    }

    /// Ordering key within a single page
    fn key(&self) -> (usize, usize) {
        (self.node, self.offset)
    }
}

/// A selection with anchor (fixed point) and head (caret)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret with no extent)
    pub fn collapsed(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Whether both ends are on the same page
    pub fn is_single_page(&self) -> bool {
        self.anchor.page == self.head.page
    }

    /// Earlier end (only meaningful for single-page selections)
    pub fn start(&self) -> Position {
        if self.anchor.key() <= self.head.key() {
            self.anchor
        } else {
            self.head
        }
    }

    /// Later end (only meaningful for single-page selections)
    pub fn end(&self) -> Position {
        if self.anchor.key() >= self.head.key() {
            self.anchor
        } else {
            self.head
        }
    }

    pub fn page(&self) -> PageId {
        self.head.page
    }
}

/// The resumable editing context: which page has focus and where the caret is.
///
/// It is `Copy` so asynchronous continuations (prompts, file reads) can carry
/// the context captured before the digression and resume from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditingContext {
    /// Page currently receiving input
    pub current_page: PageId,
    /// Live selection, if the user has one
    pub selection: Option<Selection>,
    /// Selection captured by [`EditingContext::save`]
    pub saved: Option<Selection>,
}

impl EditingContext {
    pub fn new(current_page: PageId) -> Self {
        Self {
            current_page,
            selection: None,
            saved: None,
        }
    }

    /// Capture the live selection; no-op when there is none
    pub fn save(&mut self) {
        if let Some(selection) = self.selection {
            self.saved = Some(selection);
        }
    }

    /// Re-apply the last saved selection; no-op when nothing was saved
    pub fn restore(&mut self) {
        if let Some(saved) = self.saved {
            self.selection = Some(saved);
            self.current_page = saved.page();
        }
    }

    /// Place a collapsed caret and follow it to its page
    pub fn set_caret(&mut self, pos: Position) {
        self.set_selection(Selection::collapsed(pos));
    }

    /// Replace the live selection; focus follows the head
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.current_page = selection.page();
    }
}
