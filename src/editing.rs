//! Caret-level editing on pages
//!
//! These are the content mutations that feed the reflow engine: typing,
//! Enter, Backspace, deleting a selection and inserting fragments. Each one
//! works on the page under the caret, leaves a collapsed caret behind and
//! returns the page it touched so the caller can reflow and persist it.

use crate::model::document::Document;
use crate::model::node::{Element, Node};
use crate::model::page::{Page, PageId};
use crate::model::selection::{EditingContext, Position, Selection};
use crate::model::tree;

/// Where input goes: the live caret if it points at a page, otherwise the end
/// of the current page (or of the last page when that is gone).
pub fn caret(doc: &Document, ctx: &EditingContext) -> Position {
    if let Some(selection) = ctx.selection {
        if let Some(page) = doc.page(selection.head.page) {
            return clamp(page, selection.head);
        }
    }
    doc.page_or_last(ctx.current_page).end_position()
}

/// Clamp a position to the content that exists on `page`
pub fn clamp(page: &Page, pos: Position) -> Position {
    if page.nodes.is_empty() {
        return page.start_position();
    }
    let node = pos.node.min(page.nodes.len() - 1);
    let offset = pos.offset.min(page.nodes[node].len());
    Position::new(page.id, node, offset)
}

/// An empty block kept open by a lone `<br>`
pub fn is_placeholder(node: &Node) -> bool {
    match node {
        Node::Element(el) if !el.is_void() => {
            matches!(el.children.as_slice(), [Node::Element(br)] if br.tag == "br")
        }
        _ => false,
    }
}

pub fn placeholder_block() -> Node {
    Node::from(Element::new("div").with_children(vec![Node::from(Element::new("br"))]))
}

fn fill_if_empty(node: &mut Node) {
    if let Node::Element(el) = node {
        if !el.is_void() && el.children.iter().all(Node::is_empty) {
            el.children = vec![Node::from(Element::new("br"))];
        }
    }
}

/// Type text at the caret, replacing a non-empty selection.
///
/// Every line after the first starts a new paragraph.
pub fn insert_text(doc: &mut Document, ctx: &mut EditingContext, text: &str) -> Option<PageId> {
    if text.is_empty() {
        return None;
    }
    delete_selection(doc, ctx);

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            insert_paragraph(doc, ctx);
        }
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            insert_inline(doc, ctx, vec![Node::text(line)]);
        }
    }
    Some(ctx.current_page)
}

/// Insert inline nodes at the caret without splitting any block
pub fn insert_inline(doc: &mut Document, ctx: &mut EditingContext, nodes: Vec<Node>) -> Option<PageId> {
    let pos = caret(doc, ctx);
    let inserted = tree::seq_len(&nodes);
    let page = doc.page_mut(pos.page)?;

    let next = match page.nodes.get_mut(pos.node) {
        Some(Node::Element(el)) if !el.is_void() => {
            let mut offset = pos.offset;
            if matches!(el.children.as_slice(), [Node::Element(br)] if br.tag == "br") {
                el.children.clear();
                offset = 0;
            }
            tree::insert_nodes(&mut el.children, offset, nodes);
            tree::normalize(&mut el.children);
            Position::new(page.id, pos.node, offset + inserted)
        }
        _ => {
            let flat = page.flat_offset(pos.node, pos.offset);
            tree::insert_nodes(&mut page.nodes, flat, nodes);
            tree::normalize(&mut page.nodes);
            page.position_at(flat + inserted)
        }
    };

    ctx.set_caret(next);
    Some(next.page)
}

/// Split the content node under the caret (Enter).
///
/// The part after the caret becomes its own content node; an empty trailing
/// part becomes `<div><br></div>`. Inside a list the item is split instead.
pub fn insert_paragraph(doc: &mut Document, ctx: &mut EditingContext) -> Option<PageId> {
    delete_selection(doc, ctx);
    let pos = caret(doc, ctx);
    let page = doc.page_mut(pos.page)?;

    if page.nodes.is_empty() {
        page.nodes = vec![placeholder_block(), placeholder_block()];
        let next = Position::new(page.id, 1, 0);
        ctx.set_caret(next);
        return Some(page.id);
    }

    let (index, offset) = blockify(page, pos.node, pos.offset);
    let node = page.nodes.remove(index);

    let next = match node {
        Node::Element(el) if el.is_void() => {
            let at = if offset == 0 { index } else { index + 1 };
            page.nodes.insert(index, Node::Element(el));
            page.nodes.insert(at, placeholder_block());
            Position::new(page.id, at, 0)
        }
        Node::Element(mut el) if el.tag == "ul" || el.tag == "ol" => {
            let offset = split_list_item(&mut el, offset);
            page.nodes.insert(index, Node::Element(el));
            Position::new(page.id, index, offset)
        }
        node => {
            let offset = if is_placeholder(&node) { 0 } else { offset };
            let (mut left, right) = tree::split_node(node, offset);
            fill_if_empty(&mut left);
            let right = if right.is_empty() {
                placeholder_block()
            } else {
                right
            };
            page.nodes.insert(index, left);
            page.nodes.insert(index + 1, right);
            Position::new(page.id, index + 1, 0)
        }
    };

    ctx.set_caret(next);
    Some(next.page)
}

/// Wrap the run of inline top-level nodes around `index` in a `div`.
///
/// Returns the index of the block now holding the caret and the caret offset
/// inside it. Block nodes are returned as they are.
pub fn blockify(page: &mut Page, index: usize, offset: usize) -> (usize, usize) {
    if page.nodes.get(index).map(Node::is_block).unwrap_or(true) {
        return (index, offset);
    }

    let mut start = index;
    while start > 0 && !page.nodes[start - 1].is_block() {
        start -= 1;
    }
    let mut end = index + 1;
    while end < page.nodes.len() && !page.nodes[end].is_block() {
        end += 1;
    }

    let shift: usize = page.nodes[start..index].iter().map(Node::len).sum();
    let run: Vec<Node> = page.nodes.drain(start..end).collect();
    page.nodes
        .insert(start, Node::from(Element::new("div").with_children(run)));
    (start, shift + offset)
}

/// Split the list item holding `offset`; returns the caret offset in the list
fn split_list_item(list: &mut Element, offset: usize) -> usize {
    let mut start = 0;
    for i in 0..list.children.len() {
        let len = list.children[i].len();
        let is_item = matches!(&list.children[i], Node::Element(li) if li.tag == "li");
        if is_item && offset <= start + len {
            let item = list.children.remove(i);
            let local = if is_placeholder(&item) { 0 } else { offset - start };
            let (mut left, mut right) = tree::split_node(item, local);
            fill_if_empty(&mut left);
            fill_if_empty(&mut right);
            let left_len = left.len();
            list.children.insert(i, left);
            list.children.insert(i + 1, right);
            return start + left_len;
        }
        start += len;
    }

    list.children.push(Node::from(
        Element::new("li").with_children(vec![Node::from(Element::new("br"))]),
    ));
    start
}

/// Delete the unit before the caret (Backspace).
///
/// At the start of a content node the node merges into the one before it.
/// At the start of a page nothing happens.
pub fn delete_backward(doc: &mut Document, ctx: &mut EditingContext) -> Option<PageId> {
    if ctx.selection.is_some_and(|s| !s.is_collapsed()) {
        return delete_selection(doc, ctx);
    }

    let mut pos = caret(doc, ctx);
    let page = doc.page_mut(pos.page)?;
    if page.nodes.is_empty() {
        return None;
    }
    if is_placeholder(&page.nodes[pos.node]) {
        pos.offset = 0;
    }

    if pos.offset > 0 {
        let next = match &mut page.nodes[pos.node] {
            Node::Element(el) if !el.is_void() => {
                tree::remove_range(&mut el.children, pos.offset - 1, pos.offset);
                tree::normalize(&mut el.children);
                if el.children.is_empty() {
                    if matches!(el.tag.as_str(), "ul" | "ol" | "table") {
                        page.nodes[pos.node] = placeholder_block();
                    } else {
                        el.children.push(Node::from(Element::new("br")));
                    }
                }
                Position::new(page.id, pos.node, pos.offset - 1)
            }
            _ => {
                let flat = page.flat_offset(pos.node, pos.offset);
                tree::remove_range(&mut page.nodes, flat - 1, flat);
                tree::normalize(&mut page.nodes);
                page.position_at(flat - 1)
            }
        };
        ctx.set_caret(next);
        return Some(page.id);
    }

    if pos.node == 0 {
        return None;
    }

    let next = merge_into_previous(page, pos.node);
    ctx.set_caret(next);
    Some(page.id)
}

/// Inline content of a node about to be merged into its predecessor
fn merge_payload(node: Node) -> Vec<Node> {
    match node {
        ref n if is_placeholder(n) => Vec::new(),
        Node::Element(el) if !el.is_void() && el.is_block() => el.children,
        other => vec![other],
    }
}

fn merge_into_previous(page: &mut Page, index: usize) -> Position {
    let current = page.nodes.remove(index);
    let prev = index - 1;

    let drop_prev = match &page.nodes[prev] {
        Node::Element(el) => el.is_void() || is_placeholder(&page.nodes[prev]),
        Node::Text(_) => false,
    };
    if drop_prev {
        page.nodes[prev] = current;
        return Position::new(page.id, prev, 0);
    }

    let payload = merge_payload(current);
    let payload_len = tree::seq_len(&payload);

    match &mut page.nodes[prev] {
        Node::Element(el) => {
            append_into(el, payload);
            let offset = page.nodes[prev].len() - payload_len;
            Position::new(page.id, prev, offset)
        }
        Node::Text(_) => {
            let flat = page.flat_offset(index, 0);
            let count = payload.len();
            page.nodes.splice(index..index, payload);
            if count > 0 {
                tree::normalize(&mut page.nodes);
            }
            page.position_at(flat)
        }
    }
}

/// Append inline content to a block; lists take it into their last item
fn append_into(el: &mut Element, payload: Vec<Node>) {
    if el.tag == "ul" || el.tag == "ol" {
        let last_item = el
            .children
            .iter_mut()
            .rev()
            .find(|c| matches!(c, Node::Element(li) if li.tag == "li"));
        if let Some(Node::Element(li)) = last_item {
            append_children(li, payload);
            return;
        }
    }
    append_children(el, payload);
}

fn append_children(el: &mut Element, payload: Vec<Node>) {
    if payload.is_empty() {
        return;
    }
    if matches!(el.children.as_slice(), [Node::Element(br)] if br.tag == "br") {
        el.children.clear();
    }
    el.children.extend(payload);
    tree::normalize(&mut el.children);
}

/// Delete the selected content, collapsing the caret to where it started.
///
/// A selection spanning pages clears the tail of the first page, the middle
/// pages and the head of the last page; emptied pages stay in place.
pub fn delete_selection(doc: &mut Document, ctx: &mut EditingContext) -> Option<PageId> {
    let selection = ctx.selection.filter(|s| !s.is_collapsed())?;
    let (start, end) = ordered(doc, selection)?;
    let first = doc.index_of(start.page)?;
    let last = doc.index_of(end.page)?;

    let mut next = None;
    for index in first..=last {
        let page = &mut doc.pages_mut()[index];
        let from = if index == first {
            clamp(page, start)
        } else {
            page.start_position()
        };
        let to = if index == last {
            clamp(page, end)
        } else {
            page.end_position()
        };
        let caret = remove_span(page, from, to);
        if index == first {
            next = Some(caret);
        }
    }

    let next = next?;
    ctx.set_caret(next);
    Some(next.page)
}

/// Order a selection's ends in reading order
pub fn ordered(doc: &Document, selection: Selection) -> Option<(Position, Position)> {
    let a = doc.index_of(selection.anchor.page)?;
    let h = doc.index_of(selection.head.page)?;
    Some(match a.cmp(&h) {
        std::cmp::Ordering::Less => (selection.anchor, selection.head),
        std::cmp::Ordering::Greater => (selection.head, selection.anchor),
        std::cmp::Ordering::Equal => (selection.start(), selection.end()),
    })
}

fn remove_span(page: &mut Page, start: Position, end: Position) -> Position {
    if page.nodes.is_empty() {
        return page.start_position();
    }
    let fs = page.flat_offset(start.node, start.offset);
    let fe = page.flat_offset(end.node, end.offset);
    let keep_start = start.offset > 0;
    let keep_end = page
        .nodes
        .get(end.node)
        .map(|n| end.offset < n.len())
        .unwrap_or(false);

    tree::remove_range(&mut page.nodes, fs, fe);

    // The partial first and last blocks join into one, as typing over them would
    if start.node != end.node && keep_start && keep_end && start.node + 1 < page.nodes.len() {
        let both_blocks = [start.node, start.node + 1]
            .iter()
            .all(|&i| matches!(&page.nodes[i], Node::Element(el) if !el.is_void() && el.is_block()));
        if both_blocks {
            let tail = page.nodes.remove(start.node + 1);
            if let Node::Element(el) = &mut page.nodes[start.node] {
                append_into(el, merge_payload(tail));
            }
        }
    }

    tree::normalize(&mut page.nodes);
    page.position_at(fs)
}

/// Insert a parsed fragment at the caret, replacing a non-empty selection.
///
/// Inline fragments flow into the node under the caret. Fragments holding
/// blocks are inserted as content nodes of their own, splitting the node
/// under the caret.
pub fn insert_fragment(doc: &mut Document, ctx: &mut EditingContext, nodes: Vec<Node>) -> Option<PageId> {
    if nodes.is_empty() {
        return None;
    }
    delete_selection(doc, ctx);
    if !nodes.iter().any(Node::is_block) {
        return insert_inline(doc, ctx, nodes);
    }

    let pos = caret(doc, ctx);
    let page = doc.page_mut(pos.page)?;
    let count = nodes.len();

    let at = if page.nodes.is_empty() {
        0
    } else {
        let current = page.nodes.remove(pos.node);
        if is_placeholder(&current) {
            pos.node
        } else {
            let (left, right) = tree::split_node(current, pos.offset);
            let mut at = pos.node;
            if !left.is_empty() {
                page.nodes.insert(at, left);
                at += 1;
            }
            if !right.is_empty() {
                page.nodes.insert(at, right);
            }
            at
        }
    };

    page.nodes.splice(at..at, nodes);
    let last = at + count - 1;
    let next = Position::new(page.id, last, page.nodes[last].len());
    ctx.set_caret(next);
    Some(page.id)
}

/// Select everything on the current page
pub fn select_all_on_page(doc: &Document, ctx: &mut EditingContext) {
    let page = doc.page_or_last(ctx.current_page);
    ctx.set_selection(Selection::new(page.start_position(), page.end_position()));
}

/// Move the selection; false when it points at a page that does not exist
pub fn set_selection(doc: &Document, ctx: &mut EditingContext, selection: Selection) -> bool {
    let (Some(anchor_page), Some(head_page)) =
        (doc.page(selection.anchor.page), doc.page(selection.head.page))
    else {
        return false;
    };
    ctx.set_selection(Selection::new(
        clamp(anchor_page, selection.anchor),
        clamp(head_page, selection.head),
    ));
    true
}
