//! Formatting commands
//!
//! Each [`FormatCommand`] is a named, parameterised transform over the
//! selection. Inline commands rewrap text leaves, block commands rewrite the
//! content nodes the selection touches. Commands can also be looked up by
//! their stable names with [`FormatCommand::from_name`].

mod block;
mod inline;

use crate::editing;
use crate::insert::{normalize_url, UrlTarget};
use crate::model::document::Document;
use crate::model::page::PageId;
use crate::model::selection::{EditingContext, Position, Selection};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// CSS `text-align` value
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Target of the block-format command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Paragraph,
    Heading(u8),
    Blockquote,
    Pre,
}

impl BlockTag {
    /// Accepts `h2` as well as `<h2>`
    pub fn parse(value: &str) -> Option<Self> {
        let tag = value
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .to_ascii_lowercase();
        match tag.as_str() {
            "p" => Some(BlockTag::Paragraph),
            "blockquote" => Some(BlockTag::Blockquote),
            "pre" => Some(BlockTag::Pre),
            _ => {
                let level: u8 = tag.strip_prefix('h')?.parse().ok()?;
                (1..=6).contains(&level).then_some(BlockTag::Heading(level))
            }
        }
    }

    pub fn tag_name(&self) -> String {
        match self {
            BlockTag::Paragraph => "p".to_string(),
            BlockTag::Heading(level) => format!("h{}", level),
            BlockTag::Blockquote => "blockquote".to_string(),
            BlockTag::Pre => "pre".to_string(),
        }
    }
}

/// A formatting operation over the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strike,
    FontName(String),
    /// Legacy font size, 1 through 7
    FontSize(u8),
    ForeColor(String),
    HiliteColor(String),
    Align(Alignment),
    FormatBlock(BlockTag),
    InsertOrderedList,
    InsertUnorderedList,
    Indent,
    Outdent,
    CreateLink(String),
    InsertHtml(String),
    RemoveFormat,
}

impl FormatCommand {
    /// Look a command up by its stable name.
    ///
    /// Returns `None` for unknown names and for values the command rejects.
    pub fn from_name(name: &str, value: Option<&str>) -> Option<Self> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let cmd = match name.to_ascii_lowercase().as_str() {
            "bold" => FormatCommand::Bold,
            "italic" => FormatCommand::Italic,
            "underline" => FormatCommand::Underline,
            "strikethrough" | "strike" => FormatCommand::Strike,
            "fontname" => FormatCommand::FontName(value?.to_string()),
            "fontsize" => {
                let size: u8 = value?.parse().ok()?;
                if !(1..=7).contains(&size) {
                    return None;
                }
                FormatCommand::FontSize(size)
            }
            "forecolor" => FormatCommand::ForeColor(value?.to_string()),
            "hilitecolor" | "backcolor" => FormatCommand::HiliteColor(value?.to_string()),
            "justifyleft" => FormatCommand::Align(Alignment::Left),
            "justifycenter" => FormatCommand::Align(Alignment::Center),
            "justifyright" => FormatCommand::Align(Alignment::Right),
            "justifyfull" => FormatCommand::Align(Alignment::Justify),
            "formatblock" => FormatCommand::FormatBlock(BlockTag::parse(value?)?),
            "insertorderedlist" => FormatCommand::InsertOrderedList,
            "insertunorderedlist" => FormatCommand::InsertUnorderedList,
            "indent" => FormatCommand::Indent,
            "outdent" => FormatCommand::Outdent,
            "createlink" => {
                FormatCommand::CreateLink(normalize_url(value?, UrlTarget::Link).ok()?)
            }
            "inserthtml" => FormatCommand::InsertHtml(value?.to_string()),
            "removeformat" => FormatCommand::RemoveFormat,
            _ => return None,
        };
        Some(cmd)
    }

    /// Stable name of the command
    pub fn name(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::Strike => "strikeThrough",
            FormatCommand::FontName(_) => "fontName",
            FormatCommand::FontSize(_) => "fontSize",
            FormatCommand::ForeColor(_) => "foreColor",
            FormatCommand::HiliteColor(_) => "hiliteColor",
            FormatCommand::Align(Alignment::Left) => "justifyLeft",
            FormatCommand::Align(Alignment::Center) => "justifyCenter",
            FormatCommand::Align(Alignment::Right) => "justifyRight",
            FormatCommand::Align(Alignment::Justify) => "justifyFull",
            FormatCommand::FormatBlock(_) => "formatBlock",
            FormatCommand::InsertOrderedList => "insertOrderedList",
            FormatCommand::InsertUnorderedList => "insertUnorderedList",
            FormatCommand::Indent => "indent",
            FormatCommand::Outdent => "outdent",
            FormatCommand::CreateLink(_) => "createLink",
            FormatCommand::InsertHtml(_) => "insertHTML",
            FormatCommand::RemoveFormat => "removeFormat",
        }
    }

    fn is_block(&self) -> bool {
        matches!(
            self,
            FormatCommand::Align(_)
                | FormatCommand::FormatBlock(_)
                | FormatCommand::InsertOrderedList
                | FormatCommand::InsertUnorderedList
                | FormatCommand::Indent
                | FormatCommand::Outdent
        )
    }

    /// Apply the command to the selection and return the pages it changed.
    ///
    /// Focus stays on (or returns to) the page holding the caret.
    pub fn apply(&self, doc: &mut Document, ctx: &mut EditingContext) -> Vec<PageId> {
        match self {
            FormatCommand::InsertHtml(markup) => {
                let nodes = crate::markup::parse_fragment(markup);
                return editing::insert_fragment(doc, ctx, nodes).into_iter().collect();
            }
            FormatCommand::CreateLink(url) if !has_range(ctx) => {
                return editing::insert_inline(doc, ctx, vec![inline::link_node(url)])
                    .into_iter()
                    .collect();
            }
            _ => {}
        }

        let spans = spans(doc, ctx);
        let marks = SelectionMarks::capture(doc, ctx);
        let mut touched = Vec::new();

        for span in &spans {
            let Some(page) = doc.page_mut(span.page) else {
                continue;
            };
            let changed = if self.is_block() {
                block::apply(self, page, span.start, span.end)
            } else {
                inline::apply(self, page, span.start, span.end)
            };
            if changed {
                touched.push(span.page);
            }
        }

        marks.restore(doc, ctx);
        touched
    }
}

/// Apply a command by name; unknown names and bad values do nothing
pub fn apply_named(
    doc: &mut Document,
    ctx: &mut EditingContext,
    name: &str,
    value: Option<&str>,
) -> Vec<PageId> {
    match FormatCommand::from_name(name, value) {
        Some(cmd) => cmd.apply(doc, ctx),
        None => {
            tracing::debug!(name, ?value, "ignoring unsupported format command");
            Vec::new()
        }
    }
}

/// Strip inline formatting from the selection
pub fn clear_format(doc: &mut Document, ctx: &mut EditingContext) -> Vec<PageId> {
    FormatCommand::RemoveFormat.apply(doc, ctx)
}

fn has_range(ctx: &EditingContext) -> bool {
    ctx.selection.is_some_and(|s| !s.is_collapsed())
}

/// A page-local flat range
#[derive(Debug, Clone, Copy)]
struct Span {
    page: PageId,
    start: usize,
    end: usize,
}

/// Per-page ranges covered by the selection, or the caret when collapsed
fn spans(doc: &Document, ctx: &EditingContext) -> Vec<Span> {
    let selection = ctx.selection.filter(|s| !s.is_collapsed());
    let Some((start, end)) = selection.and_then(|s| editing::ordered(doc, s)) else {
        let caret = editing::caret(doc, ctx);
        let page = doc.page_or_last(caret.page);
        let at = page.flat_offset(caret.node, caret.offset);
        return vec![Span {
            page: page.id,
            start: at,
            end: at,
        }];
    };

    let (Some(first), Some(last)) = (doc.index_of(start.page), doc.index_of(end.page)) else {
        return Vec::new();
    };

    doc.pages()[first..=last]
        .iter()
        .map(|page| Span {
            page: page.id,
            start: if page.id == start.page {
                page.flat_offset(start.node, start.offset)
            } else {
                0
            },
            end: if page.id == end.page {
                page.flat_offset(end.node, end.offset)
            } else {
                page.len()
            },
        })
        .collect()
}

/// The selection as flat offsets, so it survives node restructuring
#[derive(Debug, Clone, Copy)]
struct SelectionMarks {
    anchor: Option<(PageId, usize)>,
    head: Option<(PageId, usize)>,
    anchor_first: bool,
}

impl SelectionMarks {
    fn capture(doc: &Document, ctx: &EditingContext) -> Self {
        let flat = |pos: Position| {
            doc.page(pos.page)
                .map(|p| (p.id, p.flat_offset(pos.node, pos.offset)))
        };
        let selection = ctx.selection;
        let anchor_first = selection
            .and_then(|s| editing::ordered(doc, s))
            .zip(selection)
            .map(|((start, _), s)| start == s.anchor)
            .unwrap_or(true);
        Self {
            anchor: selection.and_then(|s| flat(s.anchor)),
            head: selection.and_then(|s| flat(s.head)),
            anchor_first,
        }
    }

    fn restore(&self, doc: &Document, ctx: &mut EditingContext) {
        let (Some((ap, af)), Some((hp, hf))) = (self.anchor, self.head) else {
            return;
        };
        let (Some(anchor_page), Some(head_page)) = (doc.page(ap), doc.page(hp)) else {
            return;
        };
        if ap == hp && af == hf {
            ctx.set_caret(head_page.position_at(hf));
            return;
        }
        let resolve = |page: &crate::model::page::Page, flat: usize, is_start: bool| {
            if is_start {
                page.position_after(flat)
            } else {
                page.position_at(flat)
            }
        };
        ctx.set_selection(Selection::new(
            resolve(anchor_page, af, self.anchor_first),
            resolve(head_page, hf, !self.anchor_first),
        ));
    }
}
