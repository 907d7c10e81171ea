//! Inline commands: wrap or unwrap the selected text leaves

use super::FormatCommand;
use crate::model::node::{Element, Node};
use crate::model::page::Page;
use crate::model::tree;

/// `<a href=url>url</a>`, inserted when a link has no text to wrap
pub(super) fn link_node(url: &str) -> Node {
    Node::from(
        Element::new("a")
            .with_attr("href", url)
            .with_children(vec![Node::text(url)]),
    )
}

/// Tags that count as "already applied" for the toggling commands
fn toggle_tags(cmd: &FormatCommand) -> Option<&'static [&'static str]> {
    match cmd {
        FormatCommand::Bold => Some(&["b", "strong"]),
        FormatCommand::Italic => Some(&["i", "em"]),
        FormatCommand::Underline => Some(&["u"]),
        FormatCommand::Strike => Some(&["s", "strike", "del"]),
        _ => None,
    }
}

fn wrapper(cmd: &FormatCommand) -> Option<Element> {
    let el = match cmd {
        FormatCommand::Bold => Element::new("b"),
        FormatCommand::Italic => Element::new("i"),
        FormatCommand::Underline => Element::new("u"),
        FormatCommand::Strike => Element::new("strike"),
        FormatCommand::FontName(face) => Element::new("font").with_attr("face", face),
        FormatCommand::FontSize(size) => Element::new("font").with_attr("size", size.to_string()),
        FormatCommand::ForeColor(color) => Element::new("font").with_attr("color", color),
        FormatCommand::HiliteColor(color) => {
            Element::new("span").with_attr("style", format!("background-color: {}", color))
        }
        FormatCommand::CreateLink(url) => Element::new("a").with_attr("href", url),
        _ => return None,
    };
    Some(el)
}

/// Returns whether the page changed. A collapsed range changes nothing.
pub(super) fn apply(cmd: &FormatCommand, page: &mut Page, start: usize, end: usize) -> bool {
    if start >= end {
        return false;
    }

    if *cmd == FormatCommand::RemoveFormat {
        tree::strip_formatting(&mut page.nodes, start, end);
        return true;
    }

    if let Some(tags) = toggle_tags(cmd) {
        if covered(&page.nodes, 0, start, end, tags, false) {
            let matches = |el: &Element| tags.contains(&el.tag.as_str());
            tree::strip_matching(&mut page.nodes, start, end, &matches);
            return true;
        }
    }

    let Some(wrapper) = wrapper(cmd) else {
        return false;
    };
    if wrapper.tag == "a" {
        let is_link = |el: &Element| el.tag == "a";
        tree::strip_matching(&mut page.nodes, start, end, &is_link);
    }
    tree::wrap_text_range(&mut page.nodes, start, end, &wrapper);
    tree::normalize(&mut page.nodes);
    true
}

/// Whether every text unit in `start..end` sits inside one of `tags`
fn covered(nodes: &[Node], base: usize, start: usize, end: usize, tags: &[&str], inside: bool) -> bool {
    let mut cs = base;
    for node in nodes {
        let ce = cs + node.len();
        if ce > start && cs < end {
            let ok = match node {
                Node::Text(_) => inside,
                Node::Element(el) if !el.is_void() => {
                    let inside = inside || tags.contains(&el.tag.as_str());
                    covered(&el.children, cs, start, end, tags, inside)
                }
                Node::Element(_) => true,
            };
            if !ok {
                return false;
            }
        }
        cs = ce;
    }
    true
}
