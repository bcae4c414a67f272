//! Live editing surfaces.
//!
//! A [`RichTextSurface`] is one editable region of a page (its title or its
//! body) as the editor sees it: something that takes formatting commands,
//! answers "is this format active here?" and hands its content back and
//! forth as [`RichText`]. [`MemorySurface`] implements it over an
//! [`EditBuffer`]; a browser or headless backend provides its own.

use thiserror::Error;

use crate::edit::{BlockTag, EditBuffer, EditCommand, ListKind, Selection};
use crate::editor::FormatKey;
use crate::model::{Align, Marks, RichText};

/// Faults reported by a surface's editing engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface is not attached")]
    Detached,

    #[error("command not supported by this surface: {0}")]
    Unsupported(String),

    #[error("format state is indeterminate: {0}")]
    Indeterminate(String),
}

/// Capability interface of an editable region.
pub trait RichTextSurface {
    /// Apply a formatting command to the current selection.
    fn apply_command(&mut self, command: EditCommand) -> Result<(), SurfaceError>;

    /// Whether a format is active at the current selection.
    fn query_active_command(&self, key: FormatKey) -> Result<bool, SurfaceError>;

    /// Query several formats at once.
    fn query_active_commands(
        &self,
        keys: &[FormatKey],
    ) -> Vec<(FormatKey, Result<bool, SurfaceError>)> {
        keys.iter()
            .map(|&key| (key, self.query_active_command(key)))
            .collect()
    }

    /// Block type at the selection focus.
    fn query_block(&self) -> Result<Option<BlockTag>, SurfaceError>;

    fn content(&self) -> RichText;

    fn set_content(&mut self, content: &RichText);

    /// Replace the selection with typed text.
    fn insert_text(&mut self, text: &str) -> Result<(), SurfaceError>;

    fn select(&mut self, selection: Selection) -> Result<(), SurfaceError>;

    fn focus(&mut self);

    fn blur(&mut self);

    fn has_focus(&self) -> bool;
}

/// In-memory surface backed by an [`EditBuffer`].
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    buffer: EditBuffer,
    focused: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }
}

impl RichTextSurface for MemorySurface {
    fn apply_command(&mut self, command: EditCommand) -> Result<(), SurfaceError> {
        self.buffer.apply(command);
        Ok(())
    }

    fn query_active_command(&self, key: FormatKey) -> Result<bool, SurfaceError> {
        let buffer = &self.buffer;
        Ok(match key {
            FormatKey::Bold => buffer.mark_active(Marks::BOLD),
            FormatKey::Italic => buffer.mark_active(Marks::ITALIC),
            FormatKey::Underline => buffer.mark_active(Marks::UNDERLINE),
            FormatKey::Strikethrough => buffer.mark_active(Marks::STRIKETHROUGH),
            FormatKey::Heading => matches!(buffer.block_tag(), Some(BlockTag::Heading(_))),
            FormatKey::Quote => buffer.block_tag() == Some(BlockTag::Quote),
            FormatKey::Code => buffer.block_tag() == Some(BlockTag::Code),
            FormatKey::UnorderedList => buffer.list_active(ListKind::Unordered),
            FormatKey::OrderedList => buffer.list_active(ListKind::Ordered),
            FormatKey::AlignLeft => buffer.alignment() == Align::Left,
            FormatKey::AlignCenter => buffer.alignment() == Align::Center,
            FormatKey::AlignRight => buffer.alignment() == Align::Right,
            FormatKey::AlignJustify => buffer.alignment() == Align::Justify,
        })
    }

    fn query_block(&self) -> Result<Option<BlockTag>, SurfaceError> {
        Ok(self.buffer.block_tag())
    }

    fn content(&self) -> RichText {
        self.buffer.to_rich_text()
    }

    fn set_content(&mut self, content: &RichText) {
        self.buffer = EditBuffer::from_rich_text(content);
    }

    fn insert_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.buffer.insert_text(text);
        Ok(())
    }

    fn select(&mut self, selection: Selection) -> Result<(), SurfaceError> {
        self.buffer.select(selection);
        Ok(())
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}
