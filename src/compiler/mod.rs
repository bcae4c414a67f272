//! Markup to [`RichText`] compiler.
//!
//! Page titles and bodies arrive as markup fragments, the way an editable
//! surface serializes them. Fragments are parsed with html5ever into an
//! arena DOM and then transformed into the notebook's markup tree.
//!
//! # Example
//!
//! ```
//! use folio::compiler::compile_html;
//! use folio::model::{Marks, Role};
//!
//! let text = compile_html("<p>Hello, <b>World</b>!</p>");
//! let bold = text
//!     .iter_dfs()
//!     .filter_map(|id| text.node(id))
//!     .find(|n| n.role == Role::Inline)
//!     .unwrap();
//! assert!(bold.marks.contains(Marks::BOLD));
//! ```

mod arena;
mod transform;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use transform::{INDENT_STEP_PX, MAX_INDENT, StyleHints, parse_inline_style};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::model::RichText;
use tree_sink::ArenaSink;

/// Parse markup into an arena DOM.
///
/// Fragments are wrapped in an implied `html`/`body` by the tree builder.
pub fn parse_html(html: &str) -> ArenaDom {
    parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Compile a markup fragment into a [`RichText`] tree.
///
/// Parsing never fails: malformed markup is repaired the way a browser
/// would repair it.
pub fn compile_html(html: &str) -> RichText {
    if html.trim().is_empty() {
        return RichText::new();
    }
    let dom = parse_html(html);
    transform::transform(&dom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Align, Marks, NodeId, Role};

    fn roles(text: &RichText) -> Vec<Role> {
        text.iter_dfs()
            .filter_map(|id| text.node(id))
            .map(|n| n.role)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(compile_html("").is_empty());
        assert!(compile_html(" \n ").is_empty());
    }

    #[test]
    fn test_bare_text_fragment() {
        let text = compile_html("Meeting notes");
        let child = text.children(NodeId::ROOT).next().unwrap();
        assert_eq!(text.node(child).unwrap().role, Role::Text);
        assert_eq!(text.text(text.node(child).unwrap().text), "Meeting notes");
    }

    #[test]
    fn test_block_structure() {
        let text = compile_html(
            "<h2>Plan</h2><ul><li>one</li><li>two</li></ul><blockquote>q</blockquote><pre>x  y</pre>",
        );
        let r = roles(&text);
        assert!(r.contains(&Role::Heading(2)));
        assert!(r.contains(&Role::UnorderedList));
        assert_eq!(r.iter().filter(|r| **r == Role::ListItem).count(), 2);
        assert!(r.contains(&Role::BlockQuote));
        assert!(r.contains(&Role::CodeBlock));
    }

    #[test]
    fn test_preformatted_whitespace_kept() {
        let text = compile_html("<pre>a  b\n  c</pre>");
        let pre = text.children(NodeId::ROOT).next().unwrap();
        let inner = text.children(pre).next().unwrap();
        assert_eq!(text.text(text.node(inner).unwrap().text), "a  b\n  c");
    }

    #[test]
    fn test_inter_block_whitespace_dropped() {
        let text = compile_html("<p>a</p>\n   <p>b</p>");
        assert_eq!(text.children(NodeId::ROOT).count(), 2);
    }

    #[test]
    fn test_styled_block_gets_inline_wrapper() {
        let text = compile_html(r#"<div style="text-align:right; font-weight:bold">x</div>"#);
        let div = text.children(NodeId::ROOT).next().unwrap();
        let node = text.node(div).unwrap();
        assert_eq!(node.role, Role::Container);
        assert_eq!(node.align, Some(Align::Right));

        let inner = text.children(div).next().unwrap();
        assert_eq!(text.node(inner).unwrap().role, Role::Inline);
        assert!(text.node(inner).unwrap().marks.contains(Marks::BOLD));
    }

    #[test]
    fn test_links_keep_href() {
        let text = compile_html(r#"<p><a href="https://example.com">site</a></p>"#);
        let link = text
            .iter_dfs()
            .find(|id| text.node(*id).unwrap().role == Role::Link)
            .unwrap();
        assert_eq!(text.href(link), Some("https://example.com"));
    }

    #[test]
    fn test_hidden_elements_skipped() {
        let text = compile_html("<script>alert(1)</script><style>p{}</style><p>ok</p>");
        assert_eq!(text.plain_text(), "ok");
    }

    #[test]
    fn test_legacy_align_attribute() {
        let text = compile_html(r#"<p align="center">x</p><center>y</center>"#);
        let blocks: Vec<_> = text.children(NodeId::ROOT).collect();
        assert_eq!(text.node(blocks[0]).unwrap().align, Some(Align::Center));
        assert_eq!(text.node(blocks[1]).unwrap().align, Some(Align::Center));
    }
}
