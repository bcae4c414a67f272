//! Formatting command dispatcher.

use crate::edit::{BlockTag, EditCommand};
use crate::model::Align;

use super::format_state::{FormatCommand, FormatKey};
use super::{PagedDocumentEditor, SurfaceId};

impl PagedDocumentEditor {
    /// Apply a formatting command to the focused (or last focused) surface
    /// and update the cached format state.
    ///
    /// `value` overrides the target of block commands. Engine faults are
    /// logged and leave the affected flags at their last known value; they
    /// never reach the caller.
    pub fn apply_format(&mut self, command: FormatCommand, value: Option<BlockTag>) {
        let target = self.ensure_focus();
        tracing::debug!(%command, ?target, "applying format");

        match command {
            FormatCommand::ClearFormatting => {
                let removed = self.run_command(target, EditCommand::RemoveFormat);
                let aligned = self.run_command(target, EditCommand::Align(Align::Left));
                if removed && aligned {
                    self.format_state.clear();
                    self.format_state.set(FormatKey::AlignLeft, true);
                } else if aligned {
                    self.format_state.set_alignment(Align::Left);
                }
            }
            FormatCommand::AlignLeft
            | FormatCommand::AlignCenter
            | FormatCommand::AlignRight
            | FormatCommand::AlignJustify => {
                let align = command.align().unwrap_or_default();
                if self.run_command(target, EditCommand::Align(align)) {
                    self.format_state.set_alignment(align);
                }
            }
            FormatCommand::BlockHeading | FormatCommand::BlockQuote | FormatCommand::BlockCode => {
                self.apply_block(target, command, value);
            }
            FormatCommand::ListUnordered | FormatCommand::ListOrdered => {
                if let Some(kind) = command.list_kind() {
                    self.run_command(target, EditCommand::ToggleList(kind));
                }
                self.requery(target, &[FormatKey::UnorderedList, FormatKey::OrderedList]);
            }
            FormatCommand::Indent => {
                self.run_command(target, EditCommand::Indent);
            }
            FormatCommand::Outdent => {
                self.run_command(target, EditCommand::Outdent);
            }
            FormatCommand::Bold
            | FormatCommand::Italic
            | FormatCommand::Underline
            | FormatCommand::Strikethrough => {
                if let Some(mark) = command.mark() {
                    self.run_command(target, EditCommand::ToggleMark(mark));
                }
                if let Some(key) = command.format_key() {
                    self.requery(target, &[key]);
                }
            }
        }

        self.toolbar.render(&self.format_state);
        self.on_input();
    }

    /// Block commands toggle: a block already of the target type goes back
    /// to a paragraph.
    fn apply_block(&mut self, target: SurfaceId, command: FormatCommand, value: Option<BlockTag>) {
        let requested = value
            .or(command.block_tag())
            .unwrap_or(BlockTag::Paragraph);

        let current = match self.surface(target).map(|s| s.query_block()) {
            Some(Ok(tag)) => tag,
            Some(Err(err)) => {
                tracing::warn!(?target, error = %err, "block query failed");
                None
            }
            None => None,
        };

        let next = match current {
            Some(tag) if requested != BlockTag::Paragraph && tag.same_family(requested) => {
                BlockTag::Paragraph
            }
            _ => requested,
        };

        if self.run_command(target, EditCommand::FormatBlock(next)) {
            self.format_state.set_block(FormatKey::from_block(next));
        }
    }

    fn run_command(&mut self, target: SurfaceId, command: EditCommand) -> bool {
        let Some(surface) = self.surface_mut(target) else {
            return false;
        };
        match surface.apply_command(command) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(?target, ?command, error = %err, "formatting command failed");
                false
            }
        }
    }

    /// Re-read flags from the surface, keeping cached values on failure.
    fn requery(&mut self, target: SurfaceId, keys: &[FormatKey]) {
        let Some(surface) = self.surface(target) else {
            return;
        };
        for (key, result) in surface.query_active_commands(keys) {
            match result {
                Ok(active) => self.format_state.set(key, active),
                Err(err) => {
                    tracing::warn!(%key, error = %err, "format query failed, keeping cached state");
                }
            }
        }
    }

    /// Resync the format state and toolbar from the focused surface.
    pub fn refresh_format_state(&mut self) {
        let Some(target) = self.focused() else {
            return;
        };
        self.requery(target, &FormatKey::ALL);
        self.toolbar.render(&self.format_state);
    }

    /// A toolbar click. Returns false for ids with no rendered button.
    pub fn click_toolbar(&mut self, id: &str) -> bool {
        let Some(command) = self.toolbar.button(id).map(|b| b.command) else {
            tracing::debug!(id, "no such toolbar button");
            return false;
        };
        self.apply_format(command, None);
        true
    }
}
