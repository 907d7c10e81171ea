//! Overflow reflow engine
//!
//! After a mutation, a page whose content renders taller than its capacity
//! hands its trailing content nodes to a new page inserted right after it.
//! The new page is checked the same way, so one pass can cascade across
//! several pages. Nodes are moved whole, in order, and never copied.
//!
//! The first content node of a page never moves. A page holding a single
//! oversize node therefore stays as it is, and every step of the loop either
//! stops or strictly shrinks the page it works on.

use crate::measure::{Measure, PageGeometry};
use crate::model::document::Document;
use crate::model::node::Node;
use crate::model::page::PageId;
use crate::model::selection::{EditingContext, Position};

/// What a reflow pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflowOutcome {
    /// Pages created by the pass, in creation order
    pub created: Vec<PageId>,
    /// Content nodes moved (a node moved twice counts twice)
    pub moved: usize,
}

impl ReflowOutcome {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }

    pub fn absorb(&mut self, other: ReflowOutcome) {
        self.created.extend(other.created);
        self.moved += other.moved;
    }
}

/// Index of the first node that must leave the page, if any.
///
/// A top-level page break ends the page; otherwise trailing nodes are dropped
/// one at a time until the remainder fits.
pub fn overflow_split(nodes: &[Node], measure: &dyn Measure, geometry: &PageGeometry) -> Option<usize> {
    let width = geometry.content_width();
    let capacity = geometry.capacity();

    let forced = nodes
        .iter()
        .position(Node::is_page_break)
        .map(|i| i + 1)
        .filter(|&i| i < nodes.len());

    let mut end = forced.unwrap_or(nodes.len());
    if forced.is_none() && measure.extent(nodes, width) <= capacity {
        return None;
    }

    while end > 1 && measure.extent(&nodes[..end], width) > capacity {
        end -= 1;
        #[cfg(feature = "reflow-trace")]
        tracing::trace!(target: "reflow", keep = end, "dropped trailing node from measurement");
    }

    (end < nodes.len()).then_some(end)
}

/// Reflow one page and cascade into the pages it creates.
///
/// Current page becomes the last page created. A caret inside a node that
/// moved onto that page follows it; any other caret collapses to the end of
/// that page. A saved selection always follows its nodes.
pub fn reflow_page(
    doc: &mut Document,
    ctx: &mut EditingContext,
    page: PageId,
    measure: &dyn Measure,
    geometry: &PageGeometry,
) -> ReflowOutcome {
    let mut outcome = ReflowOutcome::default();
    let mut target = page;

    loop {
        let Some(current) = doc.page_mut(target) else {
            break;
        };
        let Some(at) = overflow_split(&current.nodes, measure, geometry) else {
            break;
        };

        let moving = current.nodes.split_off(at);
        let count = moving.len();
        let new_page = doc.insert_page_after(target, moving);

        for selection in [ctx.selection.as_mut(), ctx.saved.as_mut()].into_iter().flatten() {
            remap(&mut selection.anchor, target, at, new_page);
            remap(&mut selection.head, target, at, new_page);
        }

        tracing::debug!(
            target: "reflow",
            from = target.0,
            to = new_page.0,
            split_at = at,
            moved = count,
            "moved overflowing nodes to new page"
        );

        outcome.created.push(new_page);
        outcome.moved += count;
        target = new_page;
    }

    if let Some(last) = outcome.created.last().copied() {
        match ctx.selection {
            // Focus always lands on the last page of the pass
            Some(selection) if selection.head.page == last => {
                if selection.is_single_page() {
                    ctx.set_selection(selection);
                } else {
                    ctx.set_caret(selection.head);
                }
            }
            _ => {
                if let Some(end) = doc.page(last).map(|p| p.end_position()) {
                    ctx.set_caret(end);
                }
            }
        }
    }

    outcome
}

/// Reflow every page in reading order (after document-wide edits or loading)
pub fn reflow_all(
    doc: &mut Document,
    ctx: &mut EditingContext,
    measure: &dyn Measure,
    geometry: &PageGeometry,
) -> ReflowOutcome {
    let mut outcome = ReflowOutcome::default();
    let mut index = 0;
    while let Some(id) = doc.page_id_at(index) {
        outcome.absorb(reflow_page(doc, ctx, id, measure, geometry));
        index += 1;
    }
    outcome
}

/// Point a position inside a moved node at the node's new home
fn remap(pos: &mut Position, from: PageId, split_at: usize, to: PageId) {
    if pos.page == from && pos.node >= split_at {
        *pos = Position::new(to, pos.node - split_at, pos.offset);
    }
}
