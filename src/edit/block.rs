//! Blocks, runs and positions of the editing buffer.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::model::{Align, Marks};

/// A caret position: block index plus character offset within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Anchor/focus selection. Collapsed when both ends coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// The whole content; buffers clamp the far end.
    pub fn all() -> Self {
        Self {
            anchor: Position::new(0, 0),
            focus: Position::new(usize::MAX, usize::MAX),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Ordered `(start, end)`.
    pub fn range(&self) -> (Position, Position) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A bare line, as editable surfaces produce for each typed line.
    Line,
    Paragraph,
    Heading(u8),
    Quote,
    Code,
    ListItem(ListKind),
    Rule,
}

/// Target of a block-format command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Paragraph,
    Heading(u8),
    Quote,
    Code,
}

impl BlockTag {
    pub fn kind(self) -> BlockKind {
        match self {
            BlockTag::Paragraph => BlockKind::Paragraph,
            BlockTag::Heading(level) => BlockKind::Heading(level.clamp(1, 6)),
            BlockTag::Quote => BlockKind::Quote,
            BlockTag::Code => BlockKind::Code,
        }
    }

    /// The tag a block currently has, if it has one of the four.
    pub fn of(kind: BlockKind) -> Option<BlockTag> {
        match kind {
            BlockKind::Paragraph | BlockKind::Line => Some(BlockTag::Paragraph),
            BlockKind::Heading(level) => Some(BlockTag::Heading(level)),
            BlockKind::Quote => Some(BlockTag::Quote),
            BlockKind::Code => Some(BlockTag::Code),
            BlockKind::ListItem(_) | BlockKind::Rule => None,
        }
    }

    /// Same family, ignoring heading level.
    pub fn same_family(self, other: BlockTag) -> bool {
        matches!(
            (self, other),
            (BlockTag::Heading(_), BlockTag::Heading(_))
                | (BlockTag::Paragraph, BlockTag::Paragraph)
                | (BlockTag::Quote, BlockTag::Quote)
                | (BlockTag::Code, BlockTag::Code)
        )
    }
}

impl FromStr for BlockTag {
    type Err = Error;

    /// Parse an element name such as `h2`, `<blockquote>` or `pre`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .to_ascii_lowercase();
        match tag.as_str() {
            "p" | "div" => Ok(BlockTag::Paragraph),
            "blockquote" => Ok(BlockTag::Quote),
            "pre" => Ok(BlockTag::Code),
            h if h.len() == 2 && h.starts_with('h') => match h[1..].parse::<u8>() {
                Ok(level @ 1..=6) => Ok(BlockTag::Heading(level)),
                _ => Err(Error::UnknownCommand(s.to_string())),
            },
            _ => Err(Error::UnknownCommand(s.to_string())),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Paragraph => f.write_str("p"),
            BlockTag::Heading(level) => write!(f, "h{level}"),
            BlockTag::Quote => f.write_str("blockquote"),
            BlockTag::Code => f.write_str("pre"),
        }
    }
}

/// A span of text sharing the same marks and link target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub marks: Marks,
    pub href: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
            href: None,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn same_style(&self, other: &Run) -> bool {
        self.marks == other.marks && self.href == other.href
    }
}

/// Byte index of the `n`th character (or the end of the string).
fn byte_at(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len())
}

/// One block of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub align: Option<Align>,
    pub indent: u8,
    pub runs: Vec<Run>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            align: None,
            indent: 0,
            runs: Vec::new(),
        }
    }

    /// A fresh block with the same kind and layout but no text.
    pub fn empty_like(&self) -> Self {
        Self {
            kind: self.kind,
            align: self.align,
            indent: self.indent,
            runs: Vec::new(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Make `offset` fall on a run boundary; returns the index of the run
    /// starting there (`runs.len()` at the end).
    pub fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for i in 0..self.runs.len() {
            let len = self.runs[i].char_len();
            if offset == start {
                return i;
            }
            if offset < start + len {
                let at = byte_at(&self.runs[i].text, offset - start);
                let tail_text = self.runs[i].text.split_off(at);
                let tail = Run {
                    text: tail_text,
                    marks: self.runs[i].marks,
                    href: self.runs[i].href.clone(),
                };
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            start += len;
        }
        self.runs.len()
    }

    /// Run index range covering characters `from..to`.
    pub fn isolate(&mut self, from: usize, to: usize) -> std::ops::Range<usize> {
        // Splitting at `to` only inserts after the run starting at `from`.
        let start = self.split_at(from);
        let end = self.split_at(to.max(from));
        start..end
    }

    /// Marks of the character before `offset` (or after it at offset 0).
    pub fn marks_at(&self, offset: usize) -> Marks {
        let mut start = 0;
        for run in &self.runs {
            let len = run.char_len();
            if len > 0 && (offset > start && offset <= start + len || offset == 0) {
                return run.marks;
            }
            start += len;
        }
        Marks::NONE
    }

    /// Whether every character in `from..to` carries `mark`.
    pub fn range_has_mark(&self, from: usize, to: usize, mark: Marks) -> bool {
        let mut start = 0;
        for run in &self.runs {
            let len = run.char_len();
            let end = start + len;
            if len > 0 && end > from && start < to && !run.marks.contains(mark) {
                return false;
            }
            start = end;
        }
        true
    }

    /// Insert text at `offset` with the given style.
    pub fn insert(&mut self, offset: usize, text: &str, marks: Marks, href: Option<String>) {
        let index = self.split_at(offset);
        self.runs.insert(
            index,
            Run {
                text: text.to_string(),
                marks,
                href,
            },
        );
        self.normalize();
    }

    /// Remove characters `from..to`.
    pub fn remove(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let range = self.isolate(from, to);
        self.runs.drain(range);
        self.normalize();
    }

    /// Split off everything from `offset` into a new block of the same kind.
    pub fn split_off(&mut self, offset: usize) -> Block {
        let index = self.split_at(offset);
        let mut tail = self.empty_like();
        tail.runs = self.runs.split_off(index);
        self.normalize();
        tail.normalize();
        tail
    }

    /// Drop empty runs and merge neighbours with identical style.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.same_style(&run) => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled() -> Block {
        let mut block = Block::new(BlockKind::Line);
        block.runs.push(Run::new("héllo ", Marks::NONE));
        block.runs.push(Run::new("wörld", Marks::BOLD));
        block
    }

    #[test]
    fn test_split_at_char_boundaries() {
        let mut block = styled();
        let index = block.split_at(2);
        assert_eq!(index, 1);
        assert_eq!(block.runs[0].text, "hé");
        assert_eq!(block.runs[1].text, "llo ");
        assert_eq!(block.split_at(6), 2);
        assert_eq!(block.split_at(11), 3);
    }

    #[test]
    fn test_isolate_range() {
        let mut block = styled();
        let range = block.isolate(3, 8);
        let texts: Vec<_> = block.runs[range].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["lo ", "wö"]);
    }

    #[test]
    fn test_marks_queries() {
        let block = styled();
        assert_eq!(block.marks_at(0), Marks::NONE);
        assert_eq!(block.marks_at(6), Marks::NONE);
        assert_eq!(block.marks_at(7), Marks::BOLD);
        assert!(block.range_has_mark(6, 11, Marks::BOLD));
        assert!(!block.range_has_mark(5, 11, Marks::BOLD));
    }

    #[test]
    fn test_insert_remove_and_normalize() {
        let mut block = styled();
        block.insert(6, "big ", Marks::BOLD, None);
        assert_eq!(block.runs.len(), 2);
        assert_eq!(block.runs[1].text, "big wörld");

        block.remove(0, 6);
        assert_eq!(block.text(), "big wörld");
        assert_eq!(block.runs.len(), 1);
    }

    #[test]
    fn test_split_off() {
        let mut block = styled();
        block.align = Some(Align::Center);
        let tail = block.split_off(8);
        assert_eq!(block.text(), "héllo wö");
        assert_eq!(tail.text(), "rld");
        assert_eq!(tail.align, Some(Align::Center));
        assert_eq!(tail.runs[0].marks, Marks::BOLD);
    }

    #[test]
    fn test_block_tag_parsing() {
        assert_eq!("h2".parse::<BlockTag>().unwrap(), BlockTag::Heading(2));
        assert_eq!("<BLOCKQUOTE>".parse::<BlockTag>().unwrap(), BlockTag::Quote);
        assert_eq!("pre".parse::<BlockTag>().unwrap(), BlockTag::Code);
        assert!("h7".parse::<BlockTag>().is_err());
        assert!("table".parse::<BlockTag>().is_err());
        assert_eq!(BlockTag::Heading(3).to_string(), "h3");
    }
}
