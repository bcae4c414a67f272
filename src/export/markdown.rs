//! Markdown notebook export.

use crate::markdown::{render_inline_markdown, render_markdown};
use crate::model::{Document, Page};

/// Page separator: a thematic break between blank lines.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

fn page_markdown(page: &Page) -> String {
    let title = render_inline_markdown(&page.title);
    let body = render_markdown(&page.body);

    let mut out = String::new();
    if !title.is_empty() {
        out.push_str("# ");
        out.push_str(&title);
        out.push_str("\n\n");
    }
    out.push_str(&body);
    out.trim_end().to_string()
}

/// Markdown export of every non-blank page, or `None` if all are blank.
pub fn export_markdown(document: &Document) -> Option<String> {
    let pages: Vec<String> = document
        .non_blank_pages()
        .map(|(_, page)| page_markdown(page))
        .collect();

    if pages.is_empty() {
        None
    } else {
        Some(pages.join(PAGE_SEPARATOR))
    }
}
