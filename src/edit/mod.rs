//! Editing buffer with an explicit formatting-command interface.
//!
//! An [`EditBuffer`] holds a page region (title or body) as a flat list of
//! [`Block`]s made of styled [`Run`]s, plus a [`Selection`]. Formatting
//! commands are plain operations on the buffer:
//!
//! - mark toggles add the mark unless every selected character already has
//!   it; on a collapsed selection they toggle the marks used for the next
//!   insert
//! - block, list, alignment and indent commands apply to every block the
//!   selection touches
//! - [`EditCommand::RemoveFormat`] strips marks from the selection
//!
//! # Example
//!
//! ```
//! use folio::edit::{EditBuffer, EditCommand};
//! use folio::model::Marks;
//!
//! let mut buffer = EditBuffer::from_html("<p>hello world</p>");
//! buffer.select_all();
//! buffer.apply(EditCommand::ToggleMark(Marks::BOLD));
//! assert_eq!(buffer.to_html(), "<p><b>hello world</b></p>");
//! ```

mod block;
mod convert;

use crate::compiler::MAX_INDENT;
use crate::model::{Align, Marks, RichText};

pub use block::{Block, BlockKind, BlockTag, ListKind, Position, Run, Selection};
pub use convert::{blocks_from_rich_text, rich_text_from_blocks};

/// A formatting command understood by [`EditBuffer::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    ToggleMark(Marks),
    /// Set the block type of every touched block.
    FormatBlock(BlockTag),
    /// Turn touched blocks into list items, or back into lines if they all
    /// already are items of that kind.
    ToggleList(ListKind),
    Indent,
    Outdent,
    Align(Align),
    RemoveFormat,
}

/// Editable rich text with a selection.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    blocks: Vec<Block>,
    selection: Selection,
    /// Marks for the next insert, set by toggles on a collapsed selection.
    pending: Option<Marks>,
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditBuffer {
    /// An empty buffer: one empty line with the caret at its start.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Line)],
            selection: Selection::default(),
            pending: None,
        }
    }

    /// Load content; the caret is placed at the end.
    pub fn from_rich_text(content: &RichText) -> Self {
        let mut buffer = Self {
            blocks: blocks_from_rich_text(content),
            selection: Selection::default(),
            pending: None,
        };
        buffer.move_to_end();
        buffer
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_rich_text(&RichText::from_html(html))
    }

    pub fn to_rich_text(&self) -> RichText {
        rich_text_from_blocks(&self.blocks)
    }

    pub fn to_html(&self) -> String {
        self.to_rich_text().to_html()
    }

    /// Plain text, one line per block.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Marks the next insert will use, if toggled explicitly.
    pub fn pending_marks(&self) -> Option<Marks> {
        self.pending
    }

    fn clamp(&self, at: Position) -> Position {
        let block = at.block.min(self.blocks.len().saturating_sub(1));
        let len = self.blocks.get(block).map_or(0, Block::char_len);
        Position::new(block, at.offset.min(len))
    }

    /// Set the selection, clamping both ends into the buffer.
    pub fn select(&mut self, selection: Selection) {
        self.selection = Selection {
            anchor: self.clamp(selection.anchor),
            focus: self.clamp(selection.focus),
        };
        self.pending = None;
    }

    /// Place a collapsed caret.
    pub fn move_to(&mut self, at: Position) {
        self.select(Selection::caret(at));
    }

    pub fn move_to_end(&mut self) {
        let last = self.blocks.len().saturating_sub(1);
        let len = self.blocks.get(last).map_or(0, Block::char_len);
        self.move_to(Position::new(last, len));
    }

    pub fn select_all(&mut self) {
        let last = self.blocks.len().saturating_sub(1);
        let len = self.blocks.get(last).map_or(0, Block::char_len);
        self.select(Selection {
            anchor: Position::new(0, 0),
            focus: Position::new(last, len),
        });
    }

    /// Indices of the blocks the selection touches.
    fn touched(&self) -> std::ops::RangeInclusive<usize> {
        let (start, end) = self.selection.range();
        start.block..=end.block
    }

    /// Character span of each touched block that lies inside the selection.
    fn spans(&self) -> Vec<(usize, usize, usize)> {
        let (start, end) = self.selection.range();
        self.touched()
            .filter_map(|i| {
                let block = self.blocks.get(i)?;
                let from = if i == start.block { start.offset } else { 0 };
                let to = if i == end.block {
                    end.offset
                } else {
                    block.char_len()
                };
                Some((i, from, to))
            })
            .collect()
    }

    fn selects_text(&self) -> bool {
        self.spans().iter().any(|&(_, from, to)| to > from)
    }

    /// Replace the selection with `text`. A `'\n'` splits the block.
    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        let mut at = self.selection.focus;

        if self.blocks[at.block].kind == BlockKind::Rule {
            self.blocks.insert(at.block + 1, Block::new(BlockKind::Line));
            at = Position::new(at.block + 1, 0);
        }

        let marks = self
            .pending
            .take()
            .unwrap_or_else(|| self.blocks[at.block].marks_at(at.offset));

        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                at = self.split_block(at);
            }
            if !segment.is_empty() {
                self.blocks[at.block].insert(at.offset, segment, marks, None);
                at.offset += segment.chars().count();
            }
        }
        self.selection = Selection::caret(at);
    }

    /// Split the block at `at`; returns the start of the new block.
    fn split_block(&mut self, at: Position) -> Position {
        let block = &mut self.blocks[at.block];
        let mut tail = block.split_off(at.offset);
        // A heading ends where the line does.
        if matches!(tail.kind, BlockKind::Heading(_)) && tail.is_empty() {
            tail.kind = BlockKind::Line;
        }
        self.blocks.insert(at.block + 1, tail);
        Position::new(at.block + 1, 0)
    }

    /// Delete the selected text, joining the first and last touched blocks.
    pub fn delete_selection(&mut self) {
        if self.selection.is_collapsed() {
            return;
        }
        let (start, end) = self.selection.range();

        if start.block == end.block {
            self.blocks[start.block].remove(start.offset, end.offset);
        } else {
            let first_len = self.blocks[start.block].char_len();
            self.blocks[start.block].remove(start.offset, first_len);
            let mut last = self.blocks[end.block].clone();
            last.remove(0, end.offset);
            self.blocks.drain(start.block + 1..=end.block);

            let first = &mut self.blocks[start.block];
            if first.kind == BlockKind::Rule {
                first.kind = last.kind;
            }
            first.runs.extend(last.runs);
            first.normalize();
        }
        self.selection = Selection::caret(start);
    }

    /// Apply a formatting command to the selection.
    pub fn apply(&mut self, command: EditCommand) {
        match command {
            EditCommand::ToggleMark(mark) => self.toggle_mark(mark),
            EditCommand::FormatBlock(tag) => {
                let kind = tag.kind();
                self.for_touched(|block| block.kind = kind);
            }
            EditCommand::ToggleList(kind) => {
                let target = BlockKind::ListItem(kind);
                let all_items = self
                    .touched()
                    .filter_map(|i| self.blocks.get(i))
                    .filter(|b| b.kind != BlockKind::Rule)
                    .all(|b| b.kind == target);
                let kind = if all_items { BlockKind::Line } else { target };
                self.for_touched(|block| block.kind = kind);
            }
            EditCommand::Indent => {
                self.for_touched(|block| block.indent = (block.indent + 1).min(MAX_INDENT));
            }
            EditCommand::Outdent => {
                self.for_touched(|block| block.indent = block.indent.saturating_sub(1));
            }
            EditCommand::Align(align) => self.for_touched(|block| block.align = Some(align)),
            EditCommand::RemoveFormat => {
                if self.selects_text() {
                    self.set_marks(|_| Marks::NONE);
                } else {
                    self.pending = Some(Marks::NONE);
                }
            }
        }
    }

    fn for_touched(&mut self, mut f: impl FnMut(&mut Block)) {
        for i in self.touched() {
            if let Some(block) = self.blocks.get_mut(i)
                && block.kind != BlockKind::Rule
            {
                f(block);
            }
        }
    }

    fn toggle_mark(&mut self, mark: Marks) {
        if !self.selects_text() {
            let focus = self.selection.focus;
            let mut marks = self
                .pending
                .unwrap_or_else(|| self.blocks[focus.block].marks_at(focus.offset));
            if marks.contains(mark) {
                marks.remove(mark);
            } else {
                marks.insert(mark);
            }
            self.pending = Some(marks);
            return;
        }

        if self.mark_active(mark) {
            self.set_marks(|marks| marks.difference(mark));
        } else {
            self.set_marks(|marks| marks.union(mark));
        }
    }

    /// Rewrite the marks of every selected run.
    fn set_marks(&mut self, f: impl Fn(Marks) -> Marks) {
        for (i, from, to) in self.spans() {
            if to <= from {
                continue;
            }
            let block = &mut self.blocks[i];
            let range = block.isolate(from, to);
            for run in &mut block.runs[range] {
                run.marks = f(run.marks);
            }
            block.normalize();
        }
    }

    /// Whether `mark` applies at the selection.
    ///
    /// A collapsed selection reports the marks the next insert would get.
    pub fn mark_active(&self, mark: Marks) -> bool {
        if !self.selects_text() {
            let focus = self.selection.focus;
            let marks = self.pending.unwrap_or_else(|| {
                self.blocks
                    .get(focus.block)
                    .map_or(Marks::NONE, |b| b.marks_at(focus.offset))
            });
            return marks.contains(mark);
        }
        self.spans()
            .into_iter()
            .filter(|&(_, from, to)| to > from)
            .all(|(i, from, to)| self.blocks[i].range_has_mark(from, to, mark))
    }

    fn focus_block(&self) -> Option<&Block> {
        self.blocks.get(self.selection.focus.block)
    }

    /// Block type at the focus.
    pub fn block_tag(&self) -> Option<BlockTag> {
        self.focus_block().and_then(|b| BlockTag::of(b.kind))
    }

    pub fn list_active(&self, kind: ListKind) -> bool {
        self.focus_block()
            .is_some_and(|b| b.kind == BlockKind::ListItem(kind))
    }

    /// Effective alignment at the focus (left unless set).
    pub fn alignment(&self) -> Align {
        self.focus_block().and_then(|b| b.align).unwrap_or_default()
    }
}
