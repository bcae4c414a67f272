//! Plain-text extraction and the plain-text notebook export.

use crate::model::{Document, NodeId, RichText, Role};

/// Roles followed by a newline in plain text.
fn ends_line(role: Role) -> bool {
    matches!(
        role,
        Role::Paragraph
            | Role::Heading(_)
            | Role::Container
            | Role::ListItem
            | Role::Rule
            | Role::Break
            | Role::BlockQuote
            | Role::CodeBlock
    )
}

fn subtree_text(content: &RichText, id: NodeId, out: &mut String) {
    if let Some(node) = content.node(id)
        && node.role == Role::Text
    {
        out.push_str(content.text(node.text));
    }
    for child in content.children(id) {
        subtree_text(content, child, out);
    }
}

fn walk(content: &RichText, id: NodeId, out: &mut String) {
    let Some(node) = content.node(id) else {
        return;
    };

    match node.role {
        Role::Text => {
            out.push_str(content.text(node.text));
            return;
        }
        Role::ListItem => {
            let mut item = String::new();
            subtree_text(content, id, &mut item);
            if !item.trim().is_empty() && !item.starts_with(' ') {
                out.push(' ');
            }
        }
        _ => {}
    }

    for child in content.children(id) {
        walk(content, child, out);
    }

    // Quotes and code blocks usually end with a nested block already.
    let wraps_blocks = matches!(node.role, Role::BlockQuote | Role::CodeBlock);
    if ends_line(node.role) && !(wraps_blocks && out.ends_with('\n')) {
        out.push('\n');
    }
}

/// Extract plain text: every block ends its line, list items get a leading
/// space, whitespace-only lines are emptied and the result is trimmed.
///
/// ```
/// use folio::model::RichText;
///
/// let text = RichText::from_html("<ul><li>milk</li><li>eggs</li></ul>");
/// assert_eq!(text.plain_text(), "milk\n eggs");
/// ```
pub fn plain_text(content: &RichText) -> String {
    let mut out = String::new();
    for child in content.children(NodeId::ROOT) {
        walk(content, child, &mut out);
    }

    let cleaned: Vec<&str> = out
        .split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect();
    cleaned.join("\n").trim().to_string()
}

/// Render one non-blank page as `Title: ...`, a `---` line and the body.
fn page_text(title: &str, body: &str) -> String {
    let mut page = String::new();
    if !title.is_empty() {
        page.push_str("Title: ");
        page.push_str(title);
        page.push('\n');
    }
    page.push_str("---\n");
    page.push_str(body);
    page
}

/// Plain-text export of every non-blank page.
///
/// Pages are joined by `=== Page N ===` separators, where `N` is the
/// 1-based position in the notebook of the page that follows. Returns
/// `None` when every page is blank.
pub fn export_text(document: &Document) -> Option<String> {
    let mut output = String::new();
    let mut first = true;

    for (index, page) in document.non_blank_pages() {
        if !first {
            output.push_str(&format!("\n\n=== Page {} ===\n\n", index + 1));
        }
        first = false;
        output.push_str(&page_text(
            page.plain_title().trim(),
            page.plain_body().trim(),
        ));
    }

    if first { None } else { Some(output) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    #[test]
    fn test_blocks_become_lines() {
        let text = RichText::from_html("<h1>Hi</h1><p>World</p><div>line</div>");
        assert_eq!(plain_text(&text), "Hi\nWorld\nline");
    }

    #[test]
    fn test_breaks_and_rules() {
        let text = RichText::from_html("a<br>b<hr>c");
        assert_eq!(plain_text(&text), "a\nb\nc");
    }

    #[test]
    fn test_whitespace_only_lines_are_emptied() {
        let text = RichText::from_html("<p>a</p><p> </p><p>b</p>");
        assert_eq!(plain_text(&text), "a\n\nb");
    }

    #[test]
    fn test_list_item_already_spaced() {
        let text = RichText::from_html("<ul><li><span> </span>x</li></ul>");
        assert_eq!(plain_text(&text), "x");
    }

    #[test]
    fn test_export_text_layout() {
        let doc = Document::from_pages(vec![
            Page::from_html("Groceries", "<ul><li>milk</li></ul>"),
            Page::new(),
            Page::from_html("", "<p>untitled</p>"),
            Page::new(),
        ]);
        let text = export_text(&doc).unwrap();
        assert_eq!(
            text,
            "Title: Groceries\n---\nmilk\n\n=== Page 3 ===\n\n---\nuntitled"
        );
    }

    #[test]
    fn test_export_text_nothing() {
        assert_eq!(export_text(&Document::new()), None);
    }
}
