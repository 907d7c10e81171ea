//! Content nodes - the units of document content a page holds
//!
//! A top-level child of a page is a *content node*: reflow moves whole
//! content nodes between pages and never splits one.

/// Elements that never have children
pub const VOID_TAGS: &[&str] = &[
    "img", "br", "hr", "meta", "link", "input", "col", "area", "source", "wbr",
];

/// Elements laid out as blocks
pub const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "pre",
    "table",
    "thead",
    "tbody",
    "tfoot",
    "tr",
    "td",
    "th",
    "hr",
    "section",
    "article",
    "header",
    "footer",
    "figure",
];

/// Inline elements that only carry formatting (stripped by "clear formatting")
pub const INLINE_FORMAT_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "strike", "del", "span", "font", "sub", "sup", "mark",
    "small", "big", "code",
];

/// Class marking a manual page break (`<hr class="page-break">`)
pub const PAGE_BREAK_CLASS: &str = "page-break";

/// A single `name="value"` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: set the children
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing value
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr { name, value }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Set one declaration inside the `style` attribute, keeping the others
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attr("style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|decl| {
                let (k, v) = decl.split_once(':')?;
                let k = k.trim();
                (!k.is_empty()).then(|| (k.to_ascii_lowercase(), v.trim().to_string()))
            })
            .filter(|(k, _)| k != property)
            .collect();
        declarations.push((property.to_string(), value.to_string()));

        let style = declarations
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr("style", style);
    }

    /// Read one declaration from the `style` attribute
    pub fn style(&self, property: &str) -> Option<String> {
        self.attr("style")?.split(';').find_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(property)
                .then(|| v.trim().to_string())
        })
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_inline_format(&self) -> bool {
        INLINE_FORMAT_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_page_break(&self) -> bool {
        self.tag == "hr" && self.has_class(PAGE_BREAK_CLASS)
    }

    /// Clone tag and attributes without children
    pub fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn element(element: Element) -> Self {
        Node::Element(element)
    }

    /// Number of caret units: one per char, one per void element
    pub fn len(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Element(el) if el.is_void() => 1,
            Node::Element(el) => el.children.iter().map(Node::len).sum(),
        }
    }

    /// True when the node holds no caret units at all
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Text(text) => text.is_empty(),
            Node::Element(el) if el.is_void() => false,
            Node::Element(el) => el.children.iter().all(Node::is_empty),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Element(el) if el.is_block())
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, Node::Element(el) if el.is_page_break())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Rendered text (not markup): blocks end lines, `br` breaks them
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out.trim_end_matches('\n').to_string()
    }

    pub(crate) fn write_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.replace('\u{a0}', " ")),
            Node::Element(el) => match el.tag.as_str() {
                "br" => out.push('\n'),
                "img" | "hr" => {}
                "td" | "th" => {
                    for child in &el.children {
                        child.write_text(out);
                    }
                    out.push('\t');
                }
                _ => {
                    let block = el.is_block();
                    if block && !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    for child in &el.children {
                        child.write_text(out);
                    }
                    if el.tag == "tr" && out.ends_with('\t') {
                        out.pop();
                    }
                    if block && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            },
        }
    }

    /// Visit every text leaf mutably, in document order
    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        match self {
            Node::Text(text) => f(text),
            Node::Element(el) => {
                for child in &mut el.children {
                    child.for_each_text_mut(f);
                }
            }
        }
    }

    /// Visit every text leaf, in document order
    pub fn for_each_text(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Node::Text(text) => f(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.for_each_text(f);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Byte index of the `char_idx`-th char (clamped to the end)
pub(crate) fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
