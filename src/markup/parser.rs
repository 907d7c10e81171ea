//! Lenient markup tokenizer and tree builder.

use crate::model::node::{Attr, Element, Node};

/// Parse markup into a node sequence.
///
/// Comments, doctypes and processing instructions are skipped, `script` and
/// `style` bodies are dropped, `on*` attributes are discarded and unclosed
/// elements are closed at the end of input.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    let bytes = input.as_bytes();
    let mut builder = TreeBuilder::default();
    let mut idx = 0_usize;

    while idx < bytes.len() {
        if bytes[idx] != b'<' {
            let next = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
            builder.text(&decode_entities(&input[idx..next]));
            idx = next;
            continue;
        }

        if starts_with(bytes, idx, b"<!--") {
            idx = skip_comment(bytes, idx);
            continue;
        }

        if starts_with(bytes, idx, b"<!") || starts_with(bytes, idx, b"<?") {
            idx = skip_to_gt(bytes, idx.saturating_add(2));
            continue;
        }

        let Some((tag, next_idx)) = parse_tag(input, idx) else {
            builder.text("<");
            idx = idx.saturating_add(1);
            continue;
        };

        if tag.is_end {
            builder.close(&tag.name);
        } else if tag.name == "script" || tag.name == "style" {
            idx = if tag.self_closing {
                next_idx
            } else {
                skip_raw_text(input, next_idx, &tag.name)
            };
            continue;
        } else {
            builder.open(tag);
        }

        idx = next_idx;
    }

    builder.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedTag {
    name: String,
    attrs: Vec<Attr>,
    is_end: bool,
    self_closing: bool,
}

#[derive(Debug, Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn children(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(el) => &mut el.children,
            None => &mut self.roots,
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Source formatting between tags, not content
        if text.contains('\n') && text.trim().is_empty() {
            return;
        }
        let children = self.children();
        if let Some(Node::Text(prev)) = children.last_mut() {
            prev.push_str(text);
        } else {
            children.push(Node::Text(text.to_string()));
        }
    }

    fn open(&mut self, tag: ParsedTag) {
        self.close_implied(&tag.name);

        let mut el = Element::new(tag.name);
        el.attrs = tag.attrs;
        if el.is_void() || tag.self_closing {
            self.children().push(Node::Element(el));
        } else {
            self.stack.push(el);
        }
    }

    /// Close elements whose end tag is implied by the tag being opened
    fn close_implied(&mut self, opening: &str) {
        let top = self.stack.last().map(|el| el.tag.as_str());
        let implied = match (opening, top) {
            ("li", Some("li")) => true,
            ("td" | "th", Some("td" | "th")) => true,
            ("tr", Some("td" | "th")) => {
                self.pop();
                matches!(self.stack.last().map(|el| el.tag.as_str()), Some("tr"))
            }
            ("tr", Some("tr")) => true,
            (_, Some("p")) => Element::new(opening).is_block(),
            _ => false,
        };
        if implied {
            self.pop();
        }
    }

    fn close(&mut self, name: &str) {
        let Some(depth) = self.stack.iter().rposition(|el| el.tag == name) else {
            return;
        };
        while self.stack.len() > depth {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if let Some(el) = self.stack.pop() {
            self.children().push(Node::Element(el));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.pop();
        }
        self.roots
    }
}

fn parse_tag(input: &str, start: usize) -> Option<(ParsedTag, usize)> {
    let bytes = input.as_bytes();
    if bytes.get(start).copied() != Some(b'<') {
        return None;
    }

    let mut idx = start.saturating_add(1);
    let mut is_end = false;
    if bytes.get(idx).copied() == Some(b'/') {
        is_end = true;
        idx = idx.saturating_add(1);
    }

    let name_start = idx;
    while idx < bytes.len() && is_tag_name_char(bytes[idx]) {
        idx = idx.saturating_add(1);
    }
    if idx == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    let name = input[name_start..idx].to_ascii_lowercase();

    let mut attrs = Vec::new();
    loop {
        idx = skip_spaces(bytes, idx);
        match bytes.get(idx).copied() {
            None => return None,
            Some(b'>') => {
                return Some((
                    ParsedTag {
                        name,
                        attrs,
                        is_end,
                        self_closing: false,
                    },
                    idx.saturating_add(1),
                ));
            }
            Some(b'/') if bytes.get(idx.saturating_add(1)).copied() == Some(b'>') => {
                return Some((
                    ParsedTag {
                        name,
                        attrs,
                        is_end,
                        self_closing: true,
                    },
                    idx.saturating_add(2),
                ));
            }
            Some(b'/') => idx = idx.saturating_add(1),
            Some(_) => {
                let (attr, next) = parse_attr(input, idx)?;
                if let Some(attr) = attr {
                    if !attr.name.starts_with("on") && !is_script_url(&attr) {
                        attrs.push(attr);
                    }
                }
                idx = next;
            }
        }
    }
}

/// `href`/`src` pointing at script
fn is_script_url(attr: &Attr) -> bool {
    if !matches!(attr.name.as_str(), "href" | "src") {
        return false;
    }
    let value: String = attr
        .value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    value.starts_with("javascript:") || value.starts_with("vbscript:")
}

fn parse_attr(input: &str, start: usize) -> Option<(Option<Attr>, usize)> {
    let bytes = input.as_bytes();
    let mut idx = start;
    while idx < bytes.len()
        && !bytes[idx].is_ascii_whitespace()
        && !matches!(bytes[idx], b'=' | b'>' | b'/')
    {
        idx = idx.saturating_add(1);
    }
    if idx == start {
        // Stray '=' or similar; skip one byte so the caller makes progress
        return Some((None, idx.saturating_add(1)));
    }
    let name = input[start..idx].to_ascii_lowercase();

    idx = skip_spaces(bytes, idx);
    if bytes.get(idx).copied() != Some(b'=') {
        return Some((Some(Attr::new(name, "")), idx));
    }
    idx = skip_spaces(bytes, idx.saturating_add(1));

    match bytes.get(idx).copied() {
        Some(quote @ (b'"' | b'\'')) => {
            let value_start = idx.saturating_add(1);
            let value_end = find_byte(bytes, value_start, quote)?;
            let value = decode_entities(&input[value_start..value_end]);
            Some((Some(Attr::new(name, value)), value_end.saturating_add(1)))
        }
        Some(_) => {
            let value_start = idx;
            while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() && bytes[idx] != b'>' {
                idx = idx.saturating_add(1);
            }
            let value = decode_entities(&input[value_start..idx]);
            Some((Some(Attr::new(name, value)), idx))
        }
        None => None,
    }
}

/// Decode the character references an editing surface emits
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn skip_raw_text(input: &str, start: usize, tag_name: &str) -> usize {
    let bytes = input.as_bytes();
    let tag_bytes = tag_name.as_bytes();
    let mut idx = start;

    while idx < bytes.len() {
        if bytes[idx] == b'<'
            && bytes.get(idx.saturating_add(1)).copied() == Some(b'/')
            && starts_with_ignore_ascii_case(bytes, idx.saturating_add(2), tag_bytes)
        {
            return skip_to_gt(bytes, idx.saturating_add(2));
        }
        idx = idx.saturating_add(1);
    }

    bytes.len()
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    find_subslice(bytes, start.saturating_add(4), b"-->")
        .map(|end| end.saturating_add(3))
        .unwrap_or(bytes.len())
}

fn skip_to_gt(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() {
        if bytes[idx] == b'>' {
            return idx.saturating_add(1);
        }
        idx = idx.saturating_add(1);
    }

    bytes.len()
}

fn skip_spaces(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx = idx.saturating_add(1);
    }
    idx
}

fn is_tag_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

fn starts_with(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx.saturating_add(pattern.len());
    end <= bytes.len() && bytes[idx..end] == *pattern
}

fn starts_with_ignore_ascii_case(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx.saturating_add(pattern.len());
    if end > bytes.len() {
        return false;
    }

    bytes[idx..end]
        .iter()
        .zip(pattern.iter())
        .all(|(left, right)| left.eq_ignore_ascii_case(right))
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }

    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

fn find_byte(bytes: &[u8], from: usize, byte: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|candidate| *candidate == byte)
        .map(|offset| from + offset)
}
