//! Toolbar and navigation chrome state.

use std::collections::BTreeMap;

use super::format_state::{FormatCommand, FormatState};

/// One formatting button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarButton {
    pub command: FormatCommand,
    pub active: bool,
}

/// Formatting buttons keyed by element id.
///
/// Only the buttons the host actually renders are present; everything
/// else about a missing button is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Toolbar {
    buttons: BTreeMap<String, ToolbarButton>,
}

impl Toolbar {
    /// Every known button.
    pub fn full() -> Self {
        Self::with_ids(FormatCommand::ALL.iter().map(|c| c.button_id()))
    }

    /// Only the given button ids; unknown ids are ignored.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let buttons = ids
            .into_iter()
            .filter_map(|id| {
                let id = id.as_ref();
                let command = FormatCommand::from_button_id(id)?;
                Some((
                    id.to_string(),
                    ToolbarButton {
                        command,
                        active: false,
                    },
                ))
            })
            .collect();
        Self { buttons }
    }

    pub fn button(&self, id: &str) -> Option<&ToolbarButton> {
        self.buttons.get(id)
    }

    /// Active flag of a button, `None` if it isn't rendered.
    pub fn is_active(&self, id: &str) -> Option<bool> {
        self.buttons.get(id).map(|b| b.active)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Set every button's active flag from the cached state. Momentary
    /// actions (indent, outdent, clear) are never active.
    pub fn render(&mut self, state: &FormatState) {
        for button in self.buttons.values_mut() {
            button.active = button.command.format_key().is_some_and(|k| state.get(k));
        }
    }
}

/// Enablement of the previous/next page buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavButtons {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// The "pages 3-4 of 6" indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageIndicator {
    pub current: String,
    pub total: usize,
}
