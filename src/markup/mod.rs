//! Markup codec for document content
//!
//! Serialises node trees to HTML and parses HTML back with a lenient
//! byte-level tokenizer. Only the subset an editing surface produces needs to
//! round-trip exactly; anything else is parsed on a best-effort basis.

mod parser;

pub use parser::parse_fragment;

use crate::model::node::{Element, Node};

/// Serialise a node sequence to markup
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

/// Append the markup for one node
pub fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_text(out, text),
        Node::Element(el) => write_element(out, el),
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.tag);
    for attr in &el.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        escape_attr(out, &attr.value);
        out.push('"');
    }
    out.push('>');
    if el.is_void() {
        return;
    }
    for child in &el.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Escape text content (`&`, `<`, `>` and non-breaking spaces)
pub fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Escape a string for use as text, returning a new string
pub fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_text(&mut out, text);
    out
}

/// Escape a string for use as an attribute value, returning a new string
pub fn escaped_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_attr(&mut out, value);
    out
}
