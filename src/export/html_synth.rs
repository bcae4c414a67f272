//! HTML synthesis from [`RichText`].
//!
//! The output is compact markup in the shape an editable surface produces:
//! no pretty-printing whitespace, `<br>`/`<hr>` as HTML void elements and
//! alignment or indentation as inline `style` declarations. Parsing the
//! output with [`compile_html`](crate::compiler::compile_html) yields an
//! equivalent tree.

use crate::compiler::INDENT_STEP_PX;
use crate::model::{Marks, Node, NodeId, RichText, Role};

/// Map a role to its tag and whether the element is void.
fn role_to_tag(role: Role) -> (&'static str, bool) {
    match role {
        Role::Paragraph => ("p", false),
        Role::Heading(1) => ("h1", false),
        Role::Heading(2) => ("h2", false),
        Role::Heading(3) => ("h3", false),
        Role::Heading(4) => ("h4", false),
        Role::Heading(5) => ("h5", false),
        Role::Heading(_) => ("h6", false),
        Role::BlockQuote => ("blockquote", false),
        Role::CodeBlock => ("pre", false),
        Role::OrderedList => ("ol", false),
        Role::UnorderedList => ("ul", false),
        Role::ListItem => ("li", false),
        Role::Link => ("a", false),
        Role::Break => ("br", true),
        Role::Rule => ("hr", true),
        Role::Inline => ("span", false),
        Role::Container | Role::Root | Role::Text => ("div", false),
    }
}

/// Inline `style` value for a block's alignment and indentation.
fn block_style(node: &Node) -> Option<String> {
    let mut declarations = Vec::new();
    if let Some(align) = node.align {
        declarations.push(format!("text-align: {};", align.as_css()));
    }
    if node.indent > 0 {
        declarations.push(format!(
            "margin-left: {}px;",
            f32::from(node.indent) * INDENT_STEP_PX
        ));
    }
    if declarations.is_empty() {
        None
    } else {
        Some(declarations.join(" "))
    }
}

fn walk_node(content: &RichText, id: NodeId, out: &mut String) {
    let Some(node) = content.node(id) else {
        return;
    };

    match node.role {
        Role::Text => {
            out.push_str(&escape_xml(content.text(node.text)));
            return;
        }
        Role::Root => {
            walk_children(content, id, out);
            return;
        }
        Role::Inline if !node.marks.is_empty() => {
            let tags: Vec<&str> = node.marks.iter().map(Marks::tag).collect();
            for tag in &tags {
                out.push('<');
                out.push_str(tag);
                out.push('>');
            }
            walk_children(content, id, out);
            for tag in tags.iter().rev() {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            return;
        }
        _ => {}
    }

    let (tag, is_void) = role_to_tag(node.role);

    out.push('<');
    out.push_str(tag);
    if node.role == Role::Link
        && let Some(href) = content.href(id)
    {
        out.push_str(&format!(" href=\"{}\"", escape_xml(href)));
    }
    if let Some(style) = block_style(node) {
        out.push_str(&format!(" style=\"{}\"", style));
    }
    out.push('>');

    if is_void {
        return;
    }

    walk_children(content, id, out);

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn walk_children(content: &RichText, id: NodeId, out: &mut String) {
    for child in content.children(id) {
        walk_node(content, child, out);
    }
}

/// Synthesize markup for `content` (a fragment, no surrounding document).
///
/// ```
/// use folio::model::RichText;
///
/// let text = RichText::from_html("<p>a <b>b</b></p>");
/// assert_eq!(text.to_html(), "<p>a <b>b</b></p>");
/// ```
pub fn synthesize_html(content: &RichText) -> String {
    let mut out = String::new();
    walk_node(content, NodeId::ROOT, &mut out);
    out
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Align;

    fn roundtrip(html: &str) -> String {
        synthesize_html(&RichText::from_html(html))
    }

    #[test]
    fn test_simple_blocks() {
        assert_eq!(roundtrip("<h2>T</h2><p>x</p>"), "<h2>T</h2><p>x</p>");
        assert_eq!(
            roundtrip("<ol><li>a</li><li>b</li></ol>"),
            "<ol><li>a</li><li>b</li></ol>"
        );
    }

    #[test]
    fn test_void_elements() {
        assert_eq!(roundtrip("<p>a<br>b</p><hr>"), "<p>a<br>b</p><hr>");
    }

    #[test]
    fn test_marks_become_nested_tags() {
        assert_eq!(
            roundtrip(r#"<span style="font-weight:bold;font-style:italic">x</span>"#),
            "<b><i>x</i></b>"
        );
        assert_eq!(roundtrip("<span>plain</span>"), "<span>plain</span>");
    }

    #[test]
    fn test_block_style_attributes() {
        let mut content = RichText::new();
        let mut para = Node::new(Role::Paragraph);
        para.align = Some(Align::Center);
        para.indent = 2;
        let id = content.push_node(NodeId::ROOT, para);
        content.push_text(id, "x");

        let html = synthesize_html(&content);
        assert_eq!(
            html,
            r#"<p style="text-align: center; margin-left: 80px;">x</p>"#
        );

        let reparsed = RichText::from_html(&html);
        let p = reparsed.children(NodeId::ROOT).next().unwrap();
        assert_eq!(reparsed.node(p).unwrap().align, Some(Align::Center));
        assert_eq!(reparsed.node(p).unwrap().indent, 2);
    }

    #[test]
    fn test_text_and_attributes_escaped() {
        assert_eq!(roundtrip("<p>a &lt; b &amp; c</p>"), "<p>a &lt; b &amp; c</p>");
        assert_eq!(
            roundtrip(r#"<a href="/x?a=1&amp;b=2">l</a>"#),
            r#"<a href="/x?a=1&amp;b=2">l</a>"#
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<\"'&>"), "&lt;&quot;&#39;&amp;&gt;");
    }
}
