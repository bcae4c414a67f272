//! Print-ready HTML document and the print hand-off.

use crate::Result;
use crate::model::Document;

use super::html_synth::{escape_xml, synthesize_html};

/// Separator placed between printed pages.
pub const PAGE_BREAK: &str = r#"<div style="page-break-after: always;"></div>"#;

const PRINT_STYLESHEET: &str = "\
body { font-family: 'Tiempos Text', serif; font-size: 11pt; line-height: 1.4; margin: 30px; }
.page-print { min-height: 90vh; }
h1 { font-size: 18pt; font-weight: bold; margin-top: 0; margin-bottom: 0.5em; border-bottom: 1px solid #ccc; padding-bottom: 0.3em; }
hr { border: none; border-top: 1px solid #eee; margin: 1em 0; }
@media print {
  div[style*=\"page-break-after\"] { page-break-after: always; }
  .page-print { page-break-inside: avoid; }
}";

/// Something that can render an HTML document and open a print dialog for it.
///
/// No PDF bytes are produced by the crate; the host owns that step.
pub trait PrintHost {
    fn print(&mut self, html: &str) -> Result<()>;
}

/// Build the print document for every non-blank page.
///
/// Each page becomes a `page-print` div headed by its plain title (when it
/// has one) and a rule. Returns `None` when every page is blank.
pub fn print_document(document: &Document, title: &str) -> Option<String> {
    let pages: Vec<String> = document
        .non_blank_pages()
        .map(|(_, page)| {
            let plain_title = page.plain_title();
            let heading = if plain_title.is_empty() {
                String::new()
            } else {
                format!("<h1>{}</h1><hr>", escape_xml(&plain_title))
            };
            format!(
                "<div class=\"page-print\">{}{}</div>",
                heading,
                synthesize_html(&page.body)
            )
        })
        .collect();

    if pages.is_empty() {
        return None;
    }

    Some(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>{}</body>\n</html>\n",
        escape_xml(title),
        PRINT_STYLESHEET,
        pages.join(PAGE_BREAK)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    #[test]
    fn test_print_document_structure() {
        let doc = Document::from_pages(vec![
            Page::from_html("<b>One</b>", "<p>first</p>"),
            Page::from_html("", "<p>second</p>"),
        ]);
        let html = print_document(&doc, "Notebook Export").unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Notebook Export</title>"));
        assert!(html.contains(
            "<div class=\"page-print\"><h1>One</h1><hr><p>first</p></div>"
        ));
        assert!(html.contains(&format!(
            "</div>{}<div class=\"page-print\"><p>second</p></div>",
            PAGE_BREAK
        )));
        assert_eq!(html.matches(PAGE_BREAK).count(), 1);
    }

    #[test]
    fn test_print_document_nothing() {
        assert!(print_document(&Document::new(), "x").is_none());
    }
}
