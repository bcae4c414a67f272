//! Core data model for the notebook.
//!
//! - [`RichText`]: an arena markup tree with a shared text buffer
//! - [`Node`], [`Role`], [`Marks`], [`Align`]: node payloads
//! - [`Page`] and [`Document`]: the notebook itself, grouped into two-page sets
//!
//! # Example
//!
//! ```
//! use folio::model::{RichText, Role, NodeId};
//!
//! let text = RichText::from_html("<h1>Hi</h1><p>World</p>");
//! let first = text.children(NodeId::ROOT).next().unwrap();
//! assert_eq!(text.node(first).unwrap().role, Role::Heading(1));
//! assert_eq!(text.plain_text(), "Hi\nWorld");
//! ```

mod node;
mod page;

use std::collections::HashMap;

pub use node::{Align, Marks, Node, NodeId, Role, TextRange};
pub use page::{Document, DocumentSnapshot, PAGES_PER_SET, Page, PageSnapshot};

/// Rich-text content in tree form.
///
/// The tree uses a parent-pointer / first-child / next-sibling representation.
/// Node 0 is always the root.
#[derive(Debug, Clone)]
pub struct RichText {
    /// All nodes in the tree (index 0 is always the root).
    nodes: Vec<Node>,
    /// Link targets, keyed by the `Link` node.
    hrefs: HashMap<NodeId, String>,
    /// Text buffer (nodes reference ranges into this).
    text: String,
}

impl Default for RichText {
    fn default() -> Self {
        Self::new()
    }
}

impl RichText {
    /// Create empty content with a root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Role::Root)],
            hrefs: HashMap::new(),
            text: String::new(),
        }
    }

    /// Parse markup into a tree.
    pub fn from_html(html: &str) -> Self {
        crate::compiler::compile_html(html)
    }

    /// Synthesize markup for this content (no surrounding document).
    pub fn to_html(&self) -> String {
        crate::export::synthesize_html(self)
    }

    /// Plain text with block elements separated by newlines, trimmed.
    pub fn plain_text(&self) -> String {
        crate::export::plain_text(self)
    }

    /// Content is blank when its plain text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get the number of nodes (including the root).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a new node and return its ID.
    pub fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append text to the buffer and return its range.
    pub fn append_text(&mut self, text: &str) -> TextRange {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        TextRange::new(start, text.len() as u32)
    }

    /// Get text from a range.
    pub fn text(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = range.end() as usize;
        self.text.get(start..end).unwrap_or("")
    }

    /// Get the href of a link node.
    pub fn href(&self, id: NodeId) -> Option<&str> {
        self.hrefs.get(&id).map(String::as_str)
    }

    /// Set the href of a link node.
    pub fn set_href(&mut self, id: NodeId, href: String) {
        self.hrefs.insert(id, href);
    }

    /// Allocate a text node and append it to `parent` in one step.
    pub fn push_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let range = self.append_text(text);
        let id = self.alloc_node(Node::text(range));
        self.append_child(parent, id);
        id
    }

    /// Allocate a node and append it to `parent` in one step.
    pub fn push_node(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.alloc_node(node);
        self.append_child(parent, id);
        id
    }

    /// Append a child node to a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(child_node) = self.nodes.get_mut(child.0 as usize) {
            child_node.parent = Some(parent);
        }

        let Some(parent_node) = self.nodes.get(parent.0 as usize) else {
            return;
        };

        match parent_node.first_child {
            Some(first_child) => {
                let mut current = first_child;
                while let Some(next) = self.nodes.get(current.0 as usize).and_then(|n| n.next_sibling)
                {
                    current = next;
                }
                if let Some(last_node) = self.nodes.get_mut(current.0 as usize) {
                    last_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.nodes.get_mut(parent.0 as usize) {
                    parent_node.first_child = Some(child);
                }
            }
        }
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        let first_child = self
            .nodes
            .get(parent.0 as usize)
            .and_then(|n| n.first_child);
        ChildIter {
            content: self,
            current: first_child,
        }
    }

    /// Iterate over all nodes in depth-first order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        DfsIter {
            content: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// True if the root has no children at all.
    pub fn is_empty(&self) -> bool {
        self.children(NodeId::ROOT).next().is_none()
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    content: &'a RichText,
    current: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self
            .content
            .nodes
            .get(current.0 as usize)
            .and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over all nodes.
pub struct DfsIter<'a> {
    content: &'a RichText,
    stack: Vec<NodeId>,
}

impl Iterator for DfsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.content.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_creation() {
        let content = RichText::new();
        assert_eq!(content.node_count(), 1);
        assert_eq!(content.root(), NodeId::ROOT);
        assert!(content.is_empty());

        let root = content.node(NodeId::ROOT).unwrap();
        assert_eq!(root.role, Role::Root);
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_text_buffer() {
        let mut content = RichText::new();

        let range1 = content.append_text("Hello, ");
        let range2 = content.append_text("World!");

        assert_eq!(content.text(range1), "Hello, ");
        assert_eq!(content.text(range2), "World!");
    }

    #[test]
    fn test_node_tree() {
        let mut content = RichText::new();

        let para = content.push_node(NodeId::ROOT, Node::new(Role::Paragraph));
        let text = content.push_text(para, "Test content");

        let children: Vec<_> = content.children(NodeId::ROOT).collect();
        assert_eq!(children, vec![para]);

        let text_children: Vec<_> = content.children(para).collect();
        assert_eq!(text_children, vec![text]);
        assert_eq!(content.node(text).unwrap().parent, Some(para));
    }

    #[test]
    fn test_dfs_iteration() {
        let mut content = RichText::new();

        let para1 = content.push_node(NodeId::ROOT, Node::new(Role::Paragraph));
        let para2 = content.push_node(NodeId::ROOT, Node::new(Role::Paragraph));
        let text = content.push_text(para1, "Text");

        let nodes: Vec<_> = content.iter_dfs().collect();
        assert_eq!(nodes, vec![NodeId::ROOT, para1, text, para2]);
    }

    #[test]
    fn test_link_href() {
        let mut content = RichText::new();
        let link = content.push_node(NodeId::ROOT, Node::new(Role::Link));
        content.set_href(link, "https://example.com".to_string());

        assert_eq!(content.href(link), Some("https://example.com"));
        assert_eq!(content.href(NodeId::ROOT), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(RichText::new().is_blank());
        assert!(RichText::from_html("<p>   </p><div>\n</div>").is_blank());
        assert!(RichText::from_html("<br>").is_blank());
        assert!(!RichText::from_html("<p> x </p>").is_blank());
    }
}
