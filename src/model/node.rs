//! Markup node types, roles and inline marks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node within a [`RichText`](super::RichText).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// Semantic role of a node.
///
/// Roles cover what the notebook toolbar can produce plus the handful of
/// elements that show up when markup is pasted in: headings, emphasis,
/// lists, alignment, block quotes and code blocks. Inline formatting lives
/// in [`Marks`] on `Inline` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Leaf text content. References a range in the text buffer.
    #[default]
    Text,
    /// Paragraph (`<p>`).
    Paragraph,
    /// Headings with level 1-6.
    Heading(u8),
    /// Generic block container (`<div>`, `<section>`, ...).
    ///
    /// Editable surfaces emit a `<div>` per line, so containers are treated
    /// as line blocks by every renderer.
    Container,
    /// Block quote (`<blockquote>`).
    BlockQuote,
    /// Preformatted code block (`<pre>`).
    CodeBlock,
    /// Ordered list (`<ol>`).
    OrderedList,
    /// Unordered list (`<ul>`).
    UnorderedList,
    /// Individual list items.
    ListItem,
    /// Inline formatting container (`<b>`, `<em>`, `<span style=...>`).
    Inline,
    /// Hyperlink. The href is kept in the node attributes.
    Link,
    /// Line break (`<br>`).
    Break,
    /// Horizontal rule (`<hr>`).
    Rule,
    /// Root node.
    Root,
}

impl Role {
    /// Block-level roles start on a new line in every text rendering.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Role::Paragraph
                | Role::Heading(_)
                | Role::Container
                | Role::BlockQuote
                | Role::CodeBlock
                | Role::OrderedList
                | Role::UnorderedList
                | Role::ListItem
                | Role::Rule
        )
    }
}

/// Inline formatting marks, stored as a small bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Marks(u8);

impl Marks {
    pub const NONE: Marks = Marks(0);
    pub const BOLD: Marks = Marks(1);
    pub const ITALIC: Marks = Marks(1 << 1);
    pub const UNDERLINE: Marks = Marks(1 << 2);
    pub const STRIKETHROUGH: Marks = Marks(1 << 3);
    pub const CODE: Marks = Marks(1 << 4);

    /// Every mark in a fixed emission order.
    pub const ALL: [Marks; 5] = [
        Marks::BOLD,
        Marks::ITALIC,
        Marks::UNDERLINE,
        Marks::STRIKETHROUGH,
        Marks::CODE,
    ];

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Marks) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Marks) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Marks) {
        self.0 &= !other.0;
    }

    pub fn union(self, other: Marks) -> Marks {
        Marks(self.0 | other.0)
    }

    /// Marks present in `self` but not in `other`.
    pub fn difference(self, other: Marks) -> Marks {
        Marks(self.0 & !other.0)
    }

    /// Iterate the individual marks set in this value.
    pub fn iter(self) -> impl Iterator<Item = Marks> {
        Marks::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// The HTML element used when synthesizing markup for a single mark.
    pub fn tag(self) -> &'static str {
        match self {
            Marks::BOLD => "b",
            Marks::ITALIC => "i",
            Marks::UNDERLINE => "u",
            Marks::STRIKETHROUGH => "s",
            Marks::CODE => "code",
            _ => "span",
        }
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    /// CSS `text-align` keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }
}

impl FromStr for Align {
    type Err = ();

    /// Parse a CSS `text-align` value. `start`/`end` map to left/right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" | "end" => Ok(Align::Right),
            "justify" => Ok(Align::Justify),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Range into the text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    /// Byte offset into the buffer.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl TextRange {
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// A node in the markup tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Semantic role.
    pub role: Role,
    /// Parent node (None for root).
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Next sibling node.
    pub next_sibling: Option<NodeId>,
    /// Text content range (only for Text nodes).
    pub text: TextRange,
    /// Marks introduced by this node (only for Inline nodes).
    pub marks: Marks,
    /// Explicit block alignment.
    pub align: Option<Align>,
    /// Block indentation level (one step per indent command).
    pub indent: u8,
}

impl Node {
    /// Create a new node with default values.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            parent: None,
            first_child: None,
            next_sibling: None,
            text: TextRange::default(),
            marks: Marks::NONE,
            align: None,
            indent: 0,
        }
    }

    /// Create a text node with the given range.
    pub fn text(range: TextRange) -> Self {
        Self {
            text: range,
            ..Self::new(Role::Text)
        }
    }

    /// Create an inline node carrying `marks`.
    pub fn inline(marks: Marks) -> Self {
        Self {
            marks,
            ..Self::new(Role::Inline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_set_operations() {
        let mut marks = Marks::NONE;
        assert!(marks.is_empty());

        marks.insert(Marks::BOLD);
        marks.insert(Marks::ITALIC);
        assert!(marks.contains(Marks::BOLD));
        assert!(marks.contains(Marks::ITALIC));
        assert!(!marks.contains(Marks::UNDERLINE));
        assert!(!marks.contains(Marks::NONE));

        marks.remove(Marks::BOLD);
        assert!(!marks.contains(Marks::BOLD));
        assert_eq!(marks.iter().collect::<Vec<_>>(), vec![Marks::ITALIC]);

        let both = Marks::BOLD.union(Marks::CODE);
        assert_eq!(both.difference(Marks::BOLD), Marks::CODE);
    }

    #[test]
    fn test_align_parsing() {
        assert_eq!("center".parse::<Align>(), Ok(Align::Center));
        assert_eq!(" Start ".parse::<Align>(), Ok(Align::Left));
        assert_eq!("end".parse::<Align>(), Ok(Align::Right));
        assert_eq!("justify".parse::<Align>(), Ok(Align::Justify));
        assert!("middle".parse::<Align>().is_err());
    }

    #[test]
    fn test_block_roles() {
        assert!(Role::Paragraph.is_block());
        assert!(Role::Heading(2).is_block());
        assert!(Role::ListItem.is_block());
        assert!(!Role::Inline.is_block());
        assert!(!Role::Break.is_block());
        assert!(!Role::Text.is_block());
    }
}
