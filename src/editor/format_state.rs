//! Format keys, the cached format state and the formatting command set.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::edit::{BlockTag, ListKind};
use crate::model::{Align, Marks};

/// One toolbar-visible format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatKey {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Heading,
    Quote,
    Code,
    UnorderedList,
    OrderedList,
    AlignLeft,
    AlignCenter,
    AlignRight,
    AlignJustify,
}

impl FormatKey {
    pub const ALL: [FormatKey; 13] = [
        FormatKey::Bold,
        FormatKey::Italic,
        FormatKey::Underline,
        FormatKey::Strikethrough,
        FormatKey::Heading,
        FormatKey::Quote,
        FormatKey::Code,
        FormatKey::UnorderedList,
        FormatKey::OrderedList,
        FormatKey::AlignLeft,
        FormatKey::AlignCenter,
        FormatKey::AlignRight,
        FormatKey::AlignJustify,
    ];

    /// Mutually exclusive block types.
    pub const BLOCKS: [FormatKey; 3] = [FormatKey::Heading, FormatKey::Quote, FormatKey::Code];

    pub const ALIGNMENTS: [FormatKey; 4] = [
        FormatKey::AlignLeft,
        FormatKey::AlignCenter,
        FormatKey::AlignRight,
        FormatKey::AlignJustify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKey::Bold => "bold",
            FormatKey::Italic => "italic",
            FormatKey::Underline => "underline",
            FormatKey::Strikethrough => "strikethrough",
            FormatKey::Heading => "heading",
            FormatKey::Quote => "quote",
            FormatKey::Code => "code",
            FormatKey::UnorderedList => "unordered-list",
            FormatKey::OrderedList => "ordered-list",
            FormatKey::AlignLeft => "align-left",
            FormatKey::AlignCenter => "align-center",
            FormatKey::AlignRight => "align-right",
            FormatKey::AlignJustify => "align-justify",
        }
    }

    pub fn from_align(align: Align) -> FormatKey {
        match align {
            Align::Left => FormatKey::AlignLeft,
            Align::Center => FormatKey::AlignCenter,
            Align::Right => FormatKey::AlignRight,
            Align::Justify => FormatKey::AlignJustify,
        }
    }

    /// The block-type flag for a block tag; paragraphs have none.
    pub fn from_block(tag: BlockTag) -> Option<FormatKey> {
        match tag {
            BlockTag::Heading(_) => Some(FormatKey::Heading),
            BlockTag::Quote => Some(FormatKey::Quote),
            BlockTag::Code => Some(FormatKey::Code),
            BlockTag::Paragraph => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached "is active" flags for every [`FormatKey`].
///
/// Only a cache of the focused surface: the surface stays the source of
/// truth and the editor re-syncs after commands and focus changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatState {
    flags: [bool; 13],
}

impl FormatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FormatKey) -> bool {
        self.flags[key.index()]
    }

    pub fn set(&mut self, key: FormatKey, active: bool) {
        self.flags[key.index()] = active;
    }

    pub fn clear(&mut self) {
        self.flags = [false; 13];
    }

    /// Make `align` the only active alignment.
    pub fn set_alignment(&mut self, align: Align) {
        let active = FormatKey::from_align(align);
        for key in FormatKey::ALIGNMENTS {
            self.set(key, key == active);
        }
    }

    /// Make `key` (if any) the only active block type.
    pub fn set_block(&mut self, key: Option<FormatKey>) {
        for block in FormatKey::BLOCKS {
            self.set(block, Some(block) == key);
        }
    }

    /// Keys currently active, in [`FormatKey::ALL`] order.
    pub fn active(&self) -> Vec<FormatKey> {
        FormatKey::ALL.into_iter().filter(|&k| self.get(k)).collect()
    }
}

/// The formatting commands the dispatcher accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    BlockHeading,
    BlockQuote,
    BlockCode,
    ListUnordered,
    ListOrdered,
    Indent,
    Outdent,
    AlignLeft,
    AlignCenter,
    AlignRight,
    AlignJustify,
    ClearFormatting,
}

impl FormatCommand {
    pub const ALL: [FormatCommand; 16] = [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::Strikethrough,
        FormatCommand::BlockHeading,
        FormatCommand::BlockQuote,
        FormatCommand::BlockCode,
        FormatCommand::ListUnordered,
        FormatCommand::ListOrdered,
        FormatCommand::Indent,
        FormatCommand::Outdent,
        FormatCommand::AlignLeft,
        FormatCommand::AlignCenter,
        FormatCommand::AlignRight,
        FormatCommand::AlignJustify,
        FormatCommand::ClearFormatting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::Strikethrough => "strikethrough",
            FormatCommand::BlockHeading => "block-heading",
            FormatCommand::BlockQuote => "block-quote",
            FormatCommand::BlockCode => "block-code",
            FormatCommand::ListUnordered => "list-unordered",
            FormatCommand::ListOrdered => "list-ordered",
            FormatCommand::Indent => "indent",
            FormatCommand::Outdent => "outdent",
            FormatCommand::AlignLeft => "align-left",
            FormatCommand::AlignCenter => "align-center",
            FormatCommand::AlignRight => "align-right",
            FormatCommand::AlignJustify => "align-justify",
            FormatCommand::ClearFormatting => "clear-formatting",
        }
    }

    /// Id of the toolbar button bound to this command.
    pub fn button_id(self) -> &'static str {
        match self {
            FormatCommand::Bold => "format-bold",
            FormatCommand::Italic => "format-italic",
            FormatCommand::Underline => "format-underline",
            FormatCommand::Strikethrough => "format-strikethrough",
            FormatCommand::BlockHeading => "format-heading",
            FormatCommand::BlockQuote => "format-quote",
            FormatCommand::BlockCode => "format-code",
            FormatCommand::ListUnordered => "format-list-ul",
            FormatCommand::ListOrdered => "format-list-ol",
            FormatCommand::Indent => "format-indent",
            FormatCommand::Outdent => "format-outdent",
            FormatCommand::AlignLeft => "format-align-left",
            FormatCommand::AlignCenter => "format-align-center",
            FormatCommand::AlignRight => "format-align-right",
            FormatCommand::AlignJustify => "format-align-justify",
            FormatCommand::ClearFormatting => "format-clear",
        }
    }

    /// The flag a toolbar button shows, if the command has a lasting state.
    pub fn format_key(self) -> Option<FormatKey> {
        match self {
            FormatCommand::Bold => Some(FormatKey::Bold),
            FormatCommand::Italic => Some(FormatKey::Italic),
            FormatCommand::Underline => Some(FormatKey::Underline),
            FormatCommand::Strikethrough => Some(FormatKey::Strikethrough),
            FormatCommand::BlockHeading => Some(FormatKey::Heading),
            FormatCommand::BlockQuote => Some(FormatKey::Quote),
            FormatCommand::BlockCode => Some(FormatKey::Code),
            FormatCommand::ListUnordered => Some(FormatKey::UnorderedList),
            FormatCommand::ListOrdered => Some(FormatKey::OrderedList),
            FormatCommand::AlignLeft => Some(FormatKey::AlignLeft),
            FormatCommand::AlignCenter => Some(FormatKey::AlignCenter),
            FormatCommand::AlignRight => Some(FormatKey::AlignRight),
            FormatCommand::AlignJustify => Some(FormatKey::AlignJustify),
            FormatCommand::Indent | FormatCommand::Outdent | FormatCommand::ClearFormatting => None,
        }
    }

    pub fn mark(self) -> Option<Marks> {
        match self {
            FormatCommand::Bold => Some(Marks::BOLD),
            FormatCommand::Italic => Some(Marks::ITALIC),
            FormatCommand::Underline => Some(Marks::UNDERLINE),
            FormatCommand::Strikethrough => Some(Marks::STRIKETHROUGH),
            _ => None,
        }
    }

    pub fn align(self) -> Option<Align> {
        match self {
            FormatCommand::AlignLeft => Some(Align::Left),
            FormatCommand::AlignCenter => Some(Align::Center),
            FormatCommand::AlignRight => Some(Align::Right),
            FormatCommand::AlignJustify => Some(Align::Justify),
            _ => None,
        }
    }

    /// Default target of a block command.
    pub fn block_tag(self) -> Option<BlockTag> {
        match self {
            FormatCommand::BlockHeading => Some(BlockTag::Heading(1)),
            FormatCommand::BlockQuote => Some(BlockTag::Quote),
            FormatCommand::BlockCode => Some(BlockTag::Code),
            _ => None,
        }
    }

    pub fn list_kind(self) -> Option<ListKind> {
        match self {
            FormatCommand::ListUnordered => Some(ListKind::Unordered),
            FormatCommand::ListOrdered => Some(ListKind::Ordered),
            _ => None,
        }
    }

    pub fn from_button_id(id: &str) -> Option<FormatCommand> {
        FormatCommand::ALL.into_iter().find(|c| c.button_id() == id)
    }
}

impl FromStr for FormatCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FormatCommand::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
