//! Layout measurement
//!
//! Reflow only needs one number per page: how tall its content renders at the
//! page's content width. [`Measure`] abstracts that so tests can plug in exact
//! heights, and [`BoxMetrics`] provides a box-model approximation of how the
//! content would lay out.

use serde::{Deserialize, Serialize};

use crate::model::node::{Element, Node};

/// Font scale per heading level, h1 through h6
pub const HEADING_SCALES: [f32; 6] = [2.0, 1.5, 1.17, 1.0, 0.83, 0.67];

/// Something that can tell how tall a node sequence renders
pub trait Measure {
    /// Rendered height of `nodes` laid out at `width`
    fn extent(&self, nodes: &[Node], width: f32) -> f32;
}

/// Fixed page geometry, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Inner padding on every side
    pub padding: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 at 96 dpi with 0.75in margins
        Self {
            width: 794.0,
            height: 1123.0,
            padding: 72.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.padding).max(1.0)
    }

    /// The visual capacity of a page
    pub fn capacity(&self) -> f32 {
        (self.height - 2.0 * self.padding).max(1.0)
    }
}

/// Box-model approximation of rendered content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxMetrics {
    /// Average advance of one character at scale 1
    pub char_width: f32,
    pub line_height: f32,
    /// Vertical margin added after paragraphs, headings, lists and quotes
    pub block_spacing: f32,
    /// Horizontal indent of list items and blockquotes
    pub indent: f32,
    pub cell_padding: f32,
    /// Height used for images without known dimensions
    pub image_placeholder_height: f32,
}

impl Default for BoxMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            block_spacing: 16.0,
            indent: 40.0,
            cell_padding: 4.0,
            image_placeholder_height: 150.0,
        }
    }
}

impl Measure for BoxMetrics {
    fn extent(&self, nodes: &[Node], width: f32) -> f32 {
        self.flow(nodes, width, 1.0)
    }
}

/// Accumulates an inline formatting context until a block interrupts it
#[derive(Debug, Default)]
struct InlineRun {
    /// Characters on the open line
    chars: usize,
    /// Completed lines
    lines: usize,
    /// Height of inline images
    extra: f32,
}

impl InlineRun {
    fn is_empty(&self) -> bool {
        self.chars == 0 && self.lines == 0 && self.extra == 0.0
    }
}

impl BoxMetrics {
    fn chars_per_line(&self, width: f32, scale: f32) -> usize {
        let advance = (self.char_width * scale).max(0.1);
        ((width / advance).floor() as usize).max(1)
    }

    /// Height of a mixed sequence: inline runs between blocks become lines
    fn flow(&self, nodes: &[Node], width: f32, scale: f32) -> f32 {
        let mut height = 0.0;
        let mut run = InlineRun::default();
        for node in nodes {
            match node {
                Node::Element(el) if el.is_block() => {
                    height += self.finish_run(&mut run, width, scale);
                    height += self.block(el, width, scale);
                }
                _ => self.inline(node, &mut run, width, scale),
            }
        }
        height + self.finish_run(&mut run, width, scale)
    }

    fn inline(&self, node: &Node, run: &mut InlineRun, width: f32, scale: f32) {
        match node {
            Node::Text(text) => run.chars += text.chars().count(),
            Node::Element(el) => match el.tag.as_str() {
                "br" => {
                    let cpl = self.chars_per_line(width, scale);
                    run.lines += run.chars.div_ceil(cpl).max(1);
                    run.chars = 0;
                }
                "img" => run.extra += self.image_height(el, width),
                _ if el.is_void() => {}
                _ => {
                    for child in &el.children {
                        self.inline(child, run, width, scale);
                    }
                }
            },
        }
    }

    fn finish_run(&self, run: &mut InlineRun, width: f32, scale: f32) -> f32 {
        if run.is_empty() {
            return 0.0;
        }
        let cpl = self.chars_per_line(width, scale);
        let lines = run.lines + run.chars.div_ceil(cpl);
        let height = lines as f32 * self.line_height * scale + run.extra;
        *run = InlineRun::default();
        height
    }

    fn block(&self, el: &Element, width: f32, scale: f32) -> f32 {
        match el.tag.as_str() {
            "hr" if el.is_page_break() => 0.0,
            "hr" => self.block_spacing,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(el.tag.as_bytes()[1] - b'1');
                let s = HEADING_SCALES[level.min(5)];
                self.flow(&el.children, width, s) + self.block_spacing * s
            }
            "p" => self.flow(&el.children, width, scale) + self.block_spacing * scale,
            "ul" | "ol" => {
                self.flow(&el.children, (width - self.indent).max(1.0), scale)
                    + self.block_spacing * scale
            }
            "blockquote" => {
                self.flow(&el.children, (width - 2.0 * self.indent).max(1.0), scale)
                    + self.block_spacing * scale
            }
            "pre" => {
                let text = Node::Element(el.clone()).text_content();
                let lines = text.split('\n').count().max(1);
                lines as f32 * self.line_height * scale + self.block_spacing * scale
            }
            "table" => self.table(el, width, scale),
            _ => self.flow(&el.children, width, scale),
        }
    }

    fn table(&self, table: &Element, width: f32, scale: f32) -> f32 {
        let mut rows = Vec::new();
        collect_rows(table, &mut rows);
        rows.iter().map(|row| self.row(row, width, scale)).sum()
    }

    fn row(&self, row: &Element, width: f32, scale: f32) -> f32 {
        let cells: Vec<&Element> = row
            .children
            .iter()
            .filter_map(Node::as_element)
            .filter(|c| c.tag == "td" || c.tag == "th")
            .collect();
        if cells.is_empty() {
            return 0.0;
        }
        let cell_width = (width / cells.len() as f32 - 2.0 * self.cell_padding).max(1.0);
        let tallest = cells
            .iter()
            .map(|cell| self.flow(&cell.children, cell_width, scale))
            .fold(0.0_f32, f32::max);
        tallest.max(self.line_height * scale) + 2.0 * self.cell_padding
    }

    /// Images keep their aspect ratio and never exceed the available width
    fn image_height(&self, img: &Element, width: f32) -> f32 {
        let w = img.attr("width").and_then(parse_px);
        let h = img.attr("height").and_then(parse_px);
        match (w, h) {
            (Some(w), Some(h)) if w > width => h * width / w,
            (_, Some(h)) => h,
            _ => self.image_placeholder_height,
        }
    }
}

fn collect_rows<'a>(el: &'a Element, rows: &mut Vec<&'a Element>) {
    for child in el.children.iter().filter_map(Node::as_element) {
        match child.tag.as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows),
            _ => {}
        }
    }
}

fn parse_px(value: &str) -> Option<f32> {
    let v = value.trim().trim_end_matches("px").trim();
    v.parse::<f32>().ok().filter(|n| *n > 0.0)
}
