//! Block commands: rewrite the content nodes the selection touches

use super::FormatCommand;
use crate::editing;
use crate::model::node::{Element, Node};
use crate::model::page::Page;

/// Style the indent command gives its blockquote
pub const INDENT_STYLE: &str = "margin: 0 0 0 40px; border: none; padding: 0px;";

pub(super) fn apply(cmd: &FormatCommand, page: &mut Page, start: usize, end: usize) -> bool {
    if page.nodes.is_empty() {
        return false;
    }
    blockify_range(page, start, end);
    let (first, last) = node_range(page, start, end);

    match cmd {
        FormatCommand::Align(alignment) => {
            for node in &mut page.nodes[first..=last] {
                if let Some(el) = node.as_element_mut().filter(|el| !el.is_void()) {
                    el.set_style("text-align", alignment.as_css());
                }
            }
            true
        }
        FormatCommand::FormatBlock(tag) => {
            let name = tag.tag_name();
            let mut changed = false;
            for node in &mut page.nodes[first..=last] {
                if let Some(el) = node.as_element_mut() {
                    changed |= retag_block(el, &name);
                }
            }
            changed
        }
        FormatCommand::InsertOrderedList => toggle_list(page, first, last, "ol"),
        FormatCommand::InsertUnorderedList => toggle_list(page, first, last, "ul"),
        FormatCommand::Indent => {
            let nodes: Vec<Node> = page.nodes.drain(first..=last).collect();
            let quote = Element::new("blockquote")
                .with_attr("style", INDENT_STYLE)
                .with_children(nodes);
            page.nodes.insert(first, Node::from(quote));
            true
        }
        FormatCommand::Outdent => outdent(page, first, last),
        _ => false,
    }
}

/// Retag the innermost text blocks under `el`.
///
/// A container holding blocks keeps its tag, so a `p` or heading never ends
/// up wrapping another block.
fn retag_block(el: &mut Element, name: &str) -> bool {
    if el.is_void() || matches!(el.tag.as_str(), "ul" | "ol" | "table") {
        return false;
    }
    if el.children.iter().any(Node::is_block) {
        let mut changed = false;
        for child in &mut el.children {
            if let Some(inner) = child.as_element_mut().filter(|inner| inner.is_block()) {
                changed |= retag_block(inner, name);
            }
        }
        return changed;
    }
    el.tag = name.to_string();
    true
}

/// Give every inline run the range touches a block of its own
fn blockify_range(page: &mut Page, start: usize, end: usize) {
    let mut i = 0;
    while i < page.nodes.len() {
        let cs = page.flat_offset(i, 0);
        if cs > end {
            break;
        }
        let ce = cs + page.nodes[i].len();
        if ce >= start && !page.nodes[i].is_block() {
            i = editing::blockify(page, i, 0).0;
        }
        i += 1;
    }
}

/// First and last content node touched by `start..end`
fn node_range(page: &Page, start: usize, end: usize) -> (usize, usize) {
    let first = if start == end {
        page.position_at(start).node
    } else {
        page.position_after(start).node
    };
    let last = page.position_at(end).node.max(first);
    let max = page.nodes.len() - 1;
    (first.min(max), last.min(max))
}

fn is_list(node: &Node, tag: &str) -> bool {
    matches!(node, Node::Element(el) if el.tag == tag)
}

/// A list item (or stray list child) turned back into a standalone block
fn item_to_block(item: Node) -> Node {
    match item {
        Node::Element(el) if el.tag == "li" => {
            let children = if el.children.is_empty() {
                vec![Node::from(Element::new("br"))]
            } else {
                el.children
            };
            Node::from(Element::new("div").with_children(children))
        }
        other => other,
    }
}

fn into_items(node: Node) -> Vec<Node> {
    match node {
        Node::Element(el) if el.tag == "ul" || el.tag == "ol" => el.children,
        Node::Element(el) if !el.is_void() && el.is_block() => {
            vec![Node::from(Element::new("li").with_children(el.children))]
        }
        other => vec![Node::from(Element::new("li").with_children(vec![other]))],
    }
}

/// Make the range one list of `tag`; when it already is, unwrap it instead
fn toggle_list(page: &mut Page, first: usize, last: usize, tag: &str) -> bool {
    let nodes: Vec<Node> = page.nodes.drain(first..=last).collect();

    if nodes.iter().all(|n| is_list(n, tag)) {
        let blocks: Vec<Node> = nodes
            .into_iter()
            .filter_map(|n| match n {
                Node::Element(el) => Some(el.children),
                Node::Text(_) => None,
            })
            .flatten()
            .map(item_to_block)
            .collect();
        page.nodes.splice(first..first, blocks);
        return true;
    }

    let items: Vec<Node> = nodes.into_iter().flat_map(into_items).collect();
    page.nodes
        .insert(first, Node::from(Element::new(tag).with_children(items)));
    true
}

/// Unwrap indent blockquotes and lists in the range
fn outdent(page: &mut Page, first: usize, last: usize) -> bool {
    let nodes: Vec<Node> = page.nodes.drain(first..=last).collect();
    let mut changed = false;
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Node::Element(el) if el.tag == "blockquote" => {
                changed = true;
                out.extend(group_inline(el.children));
            }
            Node::Element(el) if el.tag == "ul" || el.tag == "ol" => {
                changed = true;
                out.extend(el.children.into_iter().map(item_to_block));
            }
            other => out.push(other),
        }
    }

    page.nodes.splice(first..first, out);
    changed
}

/// Wrap runs of inline nodes in `div`s so every result is a block
fn group_inline(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if child.is_block() {
            if !run.is_empty() {
                out.push(Node::from(
                    Element::new("div").with_children(std::mem::take(&mut run)),
                ));
            }
            out.push(child);
        } else {
            run.push(child);
        }
    }
    if !run.is_empty() {
        out.push(Node::from(Element::new("div").with_children(run)));
    }
    out
}
