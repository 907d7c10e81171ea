//! Find & Replace over the text leaves of every page
//!
//! Matching is literal and case-sensitive. Only text content is searched:
//! tag names, attributes and URLs are never touched, and a match cannot span
//! two text leaves.

use crate::model::document::Document;
use crate::model::page::PageId;
use crate::model::tree;

/// Result of a replace-all pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceReport {
    pub replacements: usize,
    /// Pages whose content changed, in reading order
    pub pages_touched: Vec<PageId>,
}

/// Number of occurrences of `needle` across all pages
pub fn count_matches(doc: &Document, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    for node in doc.all_nodes() {
        node.for_each_text(&mut |text| count += text.matches(needle).count());
    }
    count
}

/// Replace every occurrence of `find` with `replace`.
///
/// Text leaves left empty are pruned. An empty `find` changes nothing.
pub fn replace_all(doc: &mut Document, find: &str, replace: &str) -> ReplaceReport {
    let mut report = ReplaceReport::default();
    if find.is_empty() {
        return report;
    }

    for page in doc.pages_mut() {
        let mut on_page = 0;
        for node in &mut page.nodes {
            node.for_each_text_mut(&mut |text| {
                let hits = text.matches(find).count();
                if hits > 0 {
                    *text = text.replace(find, replace);
                    on_page += hits;
                }
            });
        }
        if on_page > 0 {
            tree::normalize(&mut page.nodes);
            report.replacements += on_page;
            report.pages_touched.push(page.id);
        }
    }

    tracing::debug!(
        find,
        replacements = report.replacements,
        pages = report.pages_touched.len(),
        "replace all"
    );
    report
}
