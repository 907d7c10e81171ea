//! Offset-addressed operations on node sequences
//!
//! Offsets are caret units as counted by [`Node::len`]: one per char and one
//! per void element. All functions take the children of some container (a
//! page or an element) and an offset relative to the start of that container.

use super::node::{byte_index, Element, Node};

/// Total caret units in a sequence
pub fn seq_len(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::len).sum()
}

/// Split a node at `offset`, returning the parts before and after it.
///
/// Either part may be empty; callers drop empty parts with [`Node::is_empty`].
/// Elements are cloned shallowly so both halves keep the tag and attributes.
pub fn split_node(node: Node, offset: usize) -> (Node, Node) {
    match node {
        Node::Text(mut text) => {
            let at = byte_index(&text, offset);
            let tail = text.split_off(at);
            (Node::Text(text), Node::Text(tail))
        }
        Node::Element(el) if el.is_void() => {
            if offset == 0 {
                (Node::Text(String::new()), Node::Element(el))
            } else {
                (Node::Element(el), Node::Text(String::new()))
            }
        }
        Node::Element(el) => {
            let mut left = el.shallow_clone();
            let mut right = el.shallow_clone();
            let mut start = 0;
            for child in el.children {
                let len = child.len();
                let end = start + len;
                if end <= offset {
                    left.children.push(child);
                } else if start >= offset {
                    right.children.push(child);
                } else {
                    let (l, r) = split_node(child, offset - start);
                    if !l.is_empty() {
                        left.children.push(l);
                    }
                    if !r.is_empty() {
                        right.children.push(r);
                    }
                }
                start = end;
            }
            (Node::Element(left), Node::Element(right))
        }
    }
}

/// Whether an insertion at the very end of `node` should land inside it
fn accepts_at_end(node: &Node) -> bool {
    match node {
        Node::Text(_) => true,
        Node::Element(el) => !el.is_void(),
    }
}

/// Insert `new` nodes at `offset`, descending into the deepest container.
pub fn insert_nodes(children: &mut Vec<Node>, offset: usize, new: Vec<Node>) {
    let mut start = 0;
    for i in 0..children.len() {
        let end = start + children[i].len();
        let at_end = offset == end && accepts_at_end(&children[i]) && !next_is_placeholder(children, i);
        if offset < end || at_end {
            let local = offset - start;
            match &mut children[i] {
                Node::Text(text) => {
                    let at = byte_index(text, local);
                    let tail = text.split_off(at);
                    let mut idx = i + 1;
                    for node in new {
                        children.insert(idx, node);
                        idx += 1;
                    }
                    if !tail.is_empty() {
                        children.insert(idx, Node::Text(tail));
                    }
                }
                Node::Element(el) if !el.is_void() => {
                    // A lone placeholder break goes away once real content arrives
                    if is_placeholder_break(&el.children) {
                        el.children.clear();
                    }
                    insert_nodes(&mut el.children, local, new);
                }
                Node::Element(_) => {
                    let idx = if local == 0 { i } else { i + 1 };
                    for (n, node) in new.into_iter().enumerate() {
                        children.insert(idx + n, node);
                    }
                }
            }
            return;
        }
        start = end;
    }
    children.extend(new);
}

fn is_placeholder_break(children: &[Node]) -> bool {
    matches!(children, [Node::Element(el)] if el.tag == "br")
}

/// A caret between a block and a fresh empty block belongs to the fresh one
fn next_is_placeholder(children: &[Node], i: usize) -> bool {
    match children.get(i + 1) {
        Some(Node::Element(el)) => !el.is_void() && is_placeholder_break(&el.children),
        _ => false,
    }
}

/// Table structure survives having all of its text removed
fn keeps_shape(node: &Node) -> bool {
    matches!(node, Node::Element(el) if matches!(el.tag.as_str(), "td" | "th" | "tr" | "thead" | "tbody" | "tfoot"))
}

/// Insert plain text at `offset`
pub fn insert_text(children: &mut Vec<Node>, offset: usize, text: &str) {
    if text.is_empty() {
        return;
    }
    insert_nodes(children, offset, vec![Node::text(text)]);
    normalize(children);
}

/// Remove the caret units in `start..end`.
///
/// Elements emptied by the removal are dropped; untouched empty elements stay.
pub fn remove_range(children: &mut Vec<Node>, start: usize, end: usize) {
    if start >= end {
        return;
    }
    let mut base = 0;
    let mut i = 0;
    while i < children.len() {
        let len = children[i].len();
        let (cs, ce) = (base, base + len);
        base = ce;

        if ce <= start || cs >= end {
            i += 1;
            continue;
        }

        if cs >= start && ce <= end && !keeps_shape(&children[i]) {
            children.remove(i);
            continue;
        }

        let from = start.saturating_sub(cs);
        let to = end.min(ce) - cs;
        match &mut children[i] {
            Node::Text(text) => {
                let a = byte_index(text, from);
                let b = byte_index(text, to);
                text.replace_range(a..b, "");
            }
            Node::Element(el) => {
                remove_range(&mut el.children, from, to);
            }
        }
        if children[i].is_empty() && !keeps_shape(&children[i]) {
            children.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Merge adjacent text nodes and drop empty ones, recursively
pub fn normalize(children: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    for mut node in children.drain(..) {
        if let Node::Element(el) = &mut node {
            normalize(&mut el.children);
        }
        if let Node::Text(text) = &node {
            if text.is_empty() {
                continue;
            }
            if let Some(Node::Text(prev)) = out.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        out.push(node);
    }
    *children = out;
}

/// Make sure a text-leaf boundary exists at `offset` (does not merge texts back)
pub fn split_text_at(children: &mut Vec<Node>, offset: usize) {
    let mut start = 0;
    for i in 0..children.len() {
        let len = children[i].len();
        let end = start + len;
        if offset > start && offset < end {
            match &mut children[i] {
                Node::Text(text) => {
                    let at = byte_index(text, offset - start);
                    let tail = text.split_off(at);
                    children.insert(i + 1, Node::Text(tail));
                }
                Node::Element(el) => split_text_at(&mut el.children, offset - start),
            }
            return;
        }
        start = end;
    }
}

/// Wrap every text leaf inside `start..end` in a clone of `wrapper`
pub fn wrap_text_range(children: &mut Vec<Node>, start: usize, end: usize, wrapper: &Element) {
    if start >= end {
        return;
    }
    split_text_at(children, start);
    split_text_at(children, end);
    wrap_leaves(children, 0, start, end, wrapper);
}

fn wrap_leaves(children: &mut [Node], base: usize, start: usize, end: usize, wrapper: &Element) {
    let mut cs = base;
    for child in children.iter_mut() {
        let len = child.len();
        let ce = cs + len;
        if ce > start && cs < end {
            match child {
                Node::Text(text) if cs >= start && ce <= end && !text.is_empty() => {
                    let mut el = wrapper.shallow_clone();
                    el.children.push(Node::Text(std::mem::take(text)));
                    *child = Node::Element(el);
                }
                Node::Element(el) if !el.is_void() => {
                    wrap_leaves(&mut el.children, cs, start, end, wrapper);
                }
                _ => {}
            }
        }
        cs = ce;
    }
}

/// Unwrap inline formatting elements inside `start..end`.
///
/// Wrappers that straddle a boundary are split so the parts outside the range
/// keep their formatting.
pub fn strip_formatting(children: &mut Vec<Node>, start: usize, end: usize) {
    strip_matching(children, start, end, &Element::is_inline_format);
}

/// Unwrap the elements accepted by `matches` inside `start..end`
pub fn strip_matching(
    children: &mut Vec<Node>,
    start: usize,
    end: usize,
    matches: &dyn Fn(&Element) -> bool,
) {
    if start >= end {
        return;
    }
    split_text_at(children, start);
    split_text_at(children, end);
    let nodes = std::mem::take(children);
    *children = strip_nodes(nodes, 0, start, end, matches);
    normalize(children);
}

fn strip_nodes(
    nodes: Vec<Node>,
    base: usize,
    start: usize,
    end: usize,
    matches: &dyn Fn(&Element) -> bool,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut cs = base;
    for node in nodes {
        let len = node.len();
        let ce = cs + len;
        let intersects = ce > start && cs < end;
        match node {
            Node::Element(el) if intersects && !el.is_void() => {
                let shell = el.shallow_clone();
                let children = strip_nodes(el.children, cs, start, end, matches);
                if !matches(&shell) {
                    out.push(Node::Element(shell.with_children(children)));
                } else if cs >= start && ce <= end {
                    out.extend(children);
                } else {
                    regroup(&shell, children, cs, start, end, &mut out);
                }
            }
            other => out.push(other),
        }
        cs = ce;
    }
    out
}

/// Re-wrap the children of a partially covered wrapper: runs outside the
/// range keep a copy of the wrapper, runs inside are emitted bare.
fn regroup(
    shell: &Element,
    children: Vec<Node>,
    base: usize,
    start: usize,
    end: usize,
    out: &mut Vec<Node>,
) {
    let mut outside: Vec<Node> = Vec::new();
    let mut cs = base;
    for child in children {
        let ce = cs + child.len();
        let inside = cs >= start && ce <= end && ce > cs;
        if inside {
            if !outside.is_empty() {
                out.push(Node::Element(
                    shell.shallow_clone().with_children(std::mem::take(&mut outside)),
                ));
            }
            out.push(child);
        } else {
            outside.push(child);
        }
        cs = ce;
    }
    if !outside.is_empty() {
        out.push(Node::Element(shell.shallow_clone().with_children(outside)));
    }
}
