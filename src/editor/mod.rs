//! The paged notebook editor.
//!
//! [`PagedDocumentEditor`] owns the [`Document`], the two live pages (each a
//! title and a body [`RichTextSurface`]), the cached [`FormatState`], the
//! toolbar and navigation chrome, and the export pipeline. It is created by
//! [`PagedDocumentEditor::open`] and consumed by [`PagedDocumentEditor::close`].
//!
//! Navigation always flushes the live surfaces into the pages they are bound
//! to before the active set changes. The new set is loaded when the turn-out
//! phase of the page transition ends (immediately when the host has no page
//! containers), and input keeps writing to the old pages until then.
//!
//! ```
//! use std::time::Duration;
//! use folio::config::EditorConfig;
//! use folio::editor::{EditorCollaborators, PagedDocumentEditor, SurfaceId};
//!
//! let mut editor = PagedDocumentEditor::open(EditorConfig::default(), EditorCollaborators::default());
//! editor.type_text("Monday");
//! editor.focus(SurfaceId::body(1));
//! editor.type_text("gym");
//!
//! editor.advance();
//! editor.tick(Duration::from_secs(1));
//! assert_eq!(editor.page_indicator().current, "3-4");
//!
//! let document = editor.close();
//! assert_eq!(document.page_count(), 4);
//! assert_eq!(document.page(0).unwrap().plain_title(), "Monday");
//! assert_eq!(document.page(1).unwrap().plain_body(), "gym");
//! ```

mod dispatch;
mod export_menu;
mod format_state;
mod keys;
mod toolbar;
mod transition;

use std::time::Duration;

use crate::config::EditorConfig;
use crate::edit::Selection;
use crate::export::{Delivery, MemoryDelivery, PrintHost, Rasterizer};
use crate::model::{Document, PAGES_PER_SET};
use crate::surface::{MemorySurface, RichTextSurface};

pub use export_menu::ExportOutcome;
pub use format_state::{FormatCommand, FormatKey, FormatState};
pub use keys::{Key, KeyAction, KeyChord, shortcut};
pub use toolbar::{NavButtons, PageIndicator, Toolbar, ToolbarButton};
pub use transition::{
    Direction, Ease, FLIP_CLASS, PageAnimator, Phase, Pose, Presentation, Transition,
    TransitionCue, TransitionEvent,
};

/// Which half of a live page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Title,
    Body,
}

/// A live surface: page slot (0 = left, 1 = right) and region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub slot: usize,
    pub region: Region,
}

impl SurfaceId {
    pub const ALL: [SurfaceId; 4] = [
        SurfaceId::title(0),
        SurfaceId::body(0),
        SurfaceId::title(1),
        SurfaceId::body(1),
    ];

    pub const fn title(slot: usize) -> Self {
        Self {
            slot,
            region: Region::Title,
        }
    }

    pub const fn body(slot: usize) -> Self {
        Self {
            slot,
            region: Region::Body,
        }
    }
}

/// Title and body surfaces of one live page.
pub struct PageSurfaces {
    pub title: Box<dyn RichTextSurface>,
    pub body: Box<dyn RichTextSurface>,
}

impl PageSurfaces {
    pub fn new(title: Box<dyn RichTextSurface>, body: Box<dyn RichTextSurface>) -> Self {
        Self { title, body }
    }

    /// A page backed by two [`MemorySurface`]s.
    pub fn memory() -> Self {
        Self::new(Box::new(MemorySurface::new()), Box::new(MemorySurface::new()))
    }

    fn get(&self, region: Region) -> &dyn RichTextSurface {
        match region {
            Region::Title => self.title.as_ref(),
            Region::Body => self.body.as_ref(),
        }
    }

    fn get_mut(&mut self, region: Region) -> &mut dyn RichTextSurface {
        match region {
            Region::Title => self.title.as_mut(),
            Region::Body => self.body.as_mut(),
        }
    }
}

/// Everything the editor talks to but does not own the logic of.
pub struct EditorCollaborators {
    pub surfaces: [PageSurfaces; PAGES_PER_SET],
    /// Whether the host renders the two page containers transitions act on.
    pub page_containers: bool,
    pub toolbar: Toolbar,
    pub animator: Option<Box<dyn PageAnimator>>,
    pub rasterizer: Option<Box<dyn Rasterizer>>,
    pub print_host: Option<Box<dyn PrintHost>>,
    pub delivery: Box<dyn Delivery>,
}

impl Default for EditorCollaborators {
    fn default() -> Self {
        Self {
            surfaces: [PageSurfaces::memory(), PageSurfaces::memory()],
            page_containers: true,
            toolbar: Toolbar::full(),
            animator: None,
            rasterizer: None,
            print_host: None,
            delivery: Box::new(MemoryDelivery::new()),
        }
    }
}

impl EditorCollaborators {
    pub fn with_surfaces(mut self, surfaces: [PageSurfaces; PAGES_PER_SET]) -> Self {
        self.surfaces = surfaces;
        self
    }

    pub fn without_page_containers(mut self) -> Self {
        self.page_containers = false;
        self
    }

    pub fn with_toolbar(mut self, toolbar: Toolbar) -> Self {
        self.toolbar = toolbar;
        self
    }

    pub fn with_animator(mut self, animator: impl PageAnimator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    pub fn with_print_host(mut self, host: impl PrintHost + 'static) -> Self {
        self.print_host = Some(Box::new(host));
        self
    }

    pub fn with_delivery(mut self, delivery: impl Delivery + 'static) -> Self {
        self.delivery = Box::new(delivery);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible message (the host decides how to show it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// A page turn started; the new set loads during [`PagedDocumentEditor::tick`].
    Started,
    /// No page containers: the new set was loaded right away.
    Completed,
    /// Already on the first set.
    AtFirstSet,
    /// The navigation button is disabled.
    Disabled,
    /// A page turn is still in flight; the request was ignored.
    Busy,
}

/// The notebook editor state machine.
pub struct PagedDocumentEditor {
    config: EditorConfig,
    document: Document,
    active_set: usize,
    total_sets: usize,
    /// Set whose pages the live surfaces read from and write to.
    bound_set: usize,
    surfaces: [PageSurfaces; PAGES_PER_SET],
    last_focused: SurfaceId,
    format_state: FormatState,
    toolbar: Toolbar,
    nav: NavButtons,
    indicator: PageIndicator,
    transition: Option<Transition>,
    page_containers: bool,
    flip_class: bool,
    visible: bool,
    animator: Option<Box<dyn PageAnimator>>,
    rasterizer: Option<Box<dyn Rasterizer>>,
    print_host: Option<Box<dyn PrintHost>>,
    delivery: Box<dyn Delivery>,
    notices: Vec<Notice>,
}

impl PagedDocumentEditor {
    /// Open the editor on a fresh two-page notebook with page 1's title focused.
    pub fn open(config: EditorConfig, collaborators: EditorCollaborators) -> Self {
        let document = Document::new();
        let total_sets = document.set_count();
        let EditorCollaborators {
            surfaces,
            page_containers,
            toolbar,
            animator,
            rasterizer,
            print_host,
            delivery,
        } = collaborators;

        let mut editor = Self {
            config,
            document,
            active_set: 0,
            total_sets,
            bound_set: 0,
            surfaces,
            last_focused: SurfaceId::title(0),
            format_state: FormatState::new(),
            toolbar,
            nav: NavButtons::default(),
            indicator: PageIndicator::default(),
            transition: None,
            page_containers,
            flip_class: false,
            visible: true,
            animator,
            rasterizer,
            print_host,
            delivery,
            notices: Vec::new(),
        };
        editor.load_set(0);
        editor.focus(SurfaceId::title(0));
        tracing::debug!("notebook editor opened");
        editor
    }

    /// Flush the live pages and hand back the document.
    pub fn close(mut self) -> Document {
        self.flush();
        self.visible = false;
        tracing::debug!(pages = self.document.page_count(), "notebook editor closed");
        self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The document as of the last flush.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn active_set(&self) -> usize {
        self.active_set
    }

    pub fn total_sets(&self) -> usize {
        self.total_sets
    }

    pub fn bound_set(&self) -> usize {
        self.bound_set
    }

    pub fn format_state(&self) -> &FormatState {
        &self.format_state
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn nav_buttons(&self) -> NavButtons {
        self.nav
    }

    pub fn page_indicator(&self) -> &PageIndicator {
        &self.indicator
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the page containers carry [`FLIP_CLASS`].
    pub fn flip_animation_active(&self) -> bool {
        self.flip_class
    }

    /// Pose of the page containers while a turn is in flight.
    pub fn frame(&self) -> Option<Pose> {
        self.transition.as_ref().map(Transition::frame)
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&dyn RichTextSurface> {
        self.surfaces.get(id.slot).map(|page| page.get(id.region))
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut dyn RichTextSurface> {
        self.surfaces.get_mut(id.slot).map(|page| page.get_mut(id.region))
    }

    /// The surface holding focus, if any.
    pub fn focused(&self) -> Option<SurfaceId> {
        SurfaceId::ALL
            .into_iter()
            .find(|&id| self.surface(id).is_some_and(|s| s.has_focus()))
    }

    /// Move focus to `id` and resync the format state from it.
    pub fn focus(&mut self, id: SurfaceId) {
        if self.surface(id).is_none() {
            tracing::debug!(?id, "no such surface");
            return;
        }
        for other in SurfaceId::ALL {
            if other != id
                && let Some(surface) = self.surface_mut(other)
            {
                surface.blur();
            }
        }
        if let Some(surface) = self.surface_mut(id) {
            surface.focus();
        }
        self.last_focused = id;
        self.refresh_format_state();
    }

    /// Drop focus from every surface (e.g. a toolbar click).
    pub fn blur(&mut self) {
        for id in SurfaceId::ALL {
            if let Some(surface) = self.surface_mut(id) {
                surface.blur();
            }
        }
    }

    /// Refocus the last-focused surface if nothing holds focus.
    fn ensure_focus(&mut self) -> SurfaceId {
        if let Some(id) = self.focused() {
            return id;
        }
        let id = self.last_focused;
        tracing::debug!(?id, "refocusing last surface");
        if let Some(surface) = self.surface_mut(id) {
            surface.focus();
        }
        id
    }

    /// Type into the focused surface.
    pub fn type_text(&mut self, text: &str) {
        let id = self.ensure_focus();
        if let Some(surface) = self.surface_mut(id)
            && let Err(err) = surface.insert_text(text)
        {
            tracing::warn!(?id, error = %err, "surface rejected input");
        }
        self.on_input();
    }

    /// Change the selection in the focused surface.
    pub fn select(&mut self, selection: Selection) {
        let id = self.ensure_focus();
        if let Some(surface) = self.surface_mut(id)
            && let Err(err) = surface.select(selection)
        {
            tracing::warn!(?id, error = %err, "surface rejected selection");
        }
        self.refresh_format_state();
    }

    /// Input handler: save the live pages and re-check the next button.
    pub fn on_input(&mut self) {
        self.flush();
        self.update_nav_buttons();
    }

    /// Copy the live surfaces into the pages of the bound set.
    pub fn flush(&mut self) {
        let indices = Document::set_indices(self.bound_set);
        for (slot, index) in indices.into_iter().enumerate() {
            let Some(live) = self.surfaces.get(slot) else {
                continue;
            };
            let title = live.title.content();
            let body = live.body.content();
            if let Some(page) = self.document.page_mut(index) {
                page.title = title;
                page.body = body;
            }
        }
    }

    /// Save the bound set, then load `set` into the live surfaces and bind
    /// input to it.
    fn load_set(&mut self, set: usize) {
        self.flush();
        let indices = Document::set_indices(set);
        for (slot, index) in indices.into_iter().enumerate() {
            let Some(page) = self.document.page(index) else {
                continue;
            };
            if let Some(live) = self.surfaces.get_mut(slot) {
                live.title.set_content(&page.title);
                live.body.set_content(&page.body);
            }
        }
        self.bound_set = set;
        tracing::debug!(set, "loaded page set");
        self.update_page_indicator();
        self.update_nav_buttons();
        self.refresh_format_state();
    }

    fn update_page_indicator(&mut self) {
        let [first, second] = Document::set_indices(self.active_set);
        self.indicator = PageIndicator {
            current: format!("{}-{}", first + 1, second + 1),
            total: self.document.page_count(),
        };
    }

    fn update_nav_buttons(&mut self) {
        let on_last_set = self.active_set + 1 >= self.total_sets;
        self.nav = NavButtons {
            prev_disabled: self.active_set == 0,
            next_disabled: on_last_set && !self.document.set_has_content(self.active_set),
        };
    }

    /// Move to the next set, appending two empty pages past the end.
    pub fn advance(&mut self) -> Navigation {
        if self.transition.is_some() {
            tracing::debug!("page turn in flight, ignoring next");
            return Navigation::Busy;
        }
        self.flush();
        if self.active_set + 1 >= self.total_sets {
            self.document.append_set();
            self.total_sets += 1;
        }
        self.active_set += 1;
        self.start_transition(Direction::Forward)
    }

    /// Move to the previous set; no-op on the first.
    pub fn retreat(&mut self) -> Navigation {
        if self.transition.is_some() {
            tracing::debug!("page turn in flight, ignoring previous");
            return Navigation::Busy;
        }
        if self.active_set == 0 {
            return Navigation::AtFirstSet;
        }
        self.flush();
        self.active_set -= 1;
        self.start_transition(Direction::Backward)
    }

    /// The "next" button: honors its disabled state.
    pub fn click_next(&mut self) -> Navigation {
        if self.nav.next_disabled {
            return Navigation::Disabled;
        }
        self.advance()
    }

    /// The "previous" button.
    pub fn click_prev(&mut self) -> Navigation {
        if self.nav.prev_disabled {
            return Navigation::Disabled;
        }
        self.retreat()
    }

    fn start_transition(&mut self, direction: Direction) -> Navigation {
        if !self.page_containers {
            self.load_set(self.active_set);
            return Navigation::Completed;
        }

        let presentation = if self.animator.is_some() {
            Presentation::Animated
        } else {
            Presentation::CssFallback
        };
        let mut transition = Transition::new(direction, presentation, &self.config.transition);
        if presentation == Presentation::Animated {
            self.play_cue(&mut transition);
        }
        if transition.presentation() == Presentation::CssFallback {
            self.flip_class = true;
        }
        tracing::debug!(?direction, ?presentation, set = self.active_set, "page turn started");
        self.transition = Some(transition);
        Navigation::Started
    }

    /// Hand the current phase to the animator; on failure drop it for good
    /// and finish on the CSS path.
    fn play_cue(&mut self, transition: &mut Transition) {
        let Some(animator) = self.animator.as_mut() else {
            return;
        };
        if let Err(err) = animator.play(&transition.cue()) {
            tracing::warn!(error = %err, "animation backend failed, using CSS transitions");
            self.animator = None;
            transition.fall_back(&self.config.transition);
            self.flip_class = true;
        }
    }

    /// Advance the in-flight page turn by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };
        for event in transition.advance(elapsed) {
            match event {
                TransitionEvent::TurnedOut => {
                    self.load_set(self.active_set);
                    if transition.presentation() == Presentation::Animated {
                        self.play_cue(&mut transition);
                    }
                }
                TransitionEvent::Finished => {
                    self.flip_class = false;
                    tracing::debug!(set = self.active_set, "page turn finished");
                    return;
                }
            }
        }
        self.transition = Some(transition);
    }

    /// Handle a key press while the editor is visible. Returns true when the
    /// key was a shortcut (the host should swallow it).
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        if !self.visible {
            return false;
        }
        match shortcut(chord) {
            Some(KeyAction::NextSet) => {
                self.advance();
            }
            Some(KeyAction::PreviousSet) => {
                self.retreat();
            }
            Some(KeyAction::Format(command)) => self.apply_format(command, None),
            None => return false,
        }
        true
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Notices raised since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn open() -> PagedDocumentEditor {
        PagedDocumentEditor::open(EditorConfig::default(), EditorCollaborators::default())
    }

    fn finish(editor: &mut PagedDocumentEditor) {
        editor.tick(Duration::from_secs(1));
        assert!(!editor.is_transitioning());
    }

    #[test]
    fn test_open_state() {
        let editor = open();
        assert!(editor.is_visible());
        assert_eq!(editor.focused(), Some(SurfaceId::title(0)));
        assert_eq!(editor.document().page_count(), 2);
        assert_eq!(editor.page_indicator().current, "1-2");
        assert_eq!(editor.page_indicator().total, 2);
        assert_eq!(
            editor.nav_buttons(),
            NavButtons {
                prev_disabled: true,
                next_disabled: true
            }
        );
    }

    #[test]
    fn test_input_enables_next() {
        let mut editor = open();
        editor.type_text("a");
        assert!(!editor.nav_buttons().next_disabled);
        assert_eq!(editor.document().page(0).unwrap().plain_title(), "a");
    }

    #[test]
    fn test_retreat_at_first_set_is_noop() {
        let mut editor = open();
        assert_eq!(editor.retreat(), Navigation::AtFirstSet);
        assert!(!editor.is_transitioning());
        assert_eq!(editor.active_set(), 0);
        assert_eq!(editor.click_prev(), Navigation::Disabled);
    }

    #[test]
    fn test_css_transition_loads_after_turn_out() {
        let mut editor = open();
        editor.type_text("first");
        assert_eq!(editor.advance(), Navigation::Started);
        assert!(editor.flip_animation_active());
        assert_eq!(editor.active_set(), 1);
        assert_eq!(editor.bound_set(), 0);

        editor.tick(Duration::from_millis(349));
        assert_eq!(editor.bound_set(), 0);
        editor.tick(Duration::from_millis(1));
        assert_eq!(editor.bound_set(), 1);
        assert!(editor.surface(SurfaceId::title(0)).unwrap().content().is_blank());
        assert!(editor.flip_animation_active());

        editor.tick(Duration::from_millis(350));
        assert!(!editor.is_transitioning());
        assert!(!editor.flip_animation_active());
        assert_eq!(editor.page_indicator().current, "3-4");
    }

    #[test]
    fn test_direct_surface_edits_survive_turn_out() {
        let mut editor = open();
        editor.type_text("x");
        assert_eq!(editor.advance(), Navigation::Started);

        if let Some(surface) = editor.surface_mut(SurfaceId::body(0)) {
            surface.insert_text("mid-turn").unwrap();
        }
        editor.tick(Duration::from_millis(350));

        assert_eq!(editor.bound_set(), 1);
        assert_eq!(editor.document().page(0).unwrap().plain_body(), "mid-turn");
        assert_eq!(editor.document().page(0).unwrap().plain_title(), "x");
    }

    #[test]
    fn test_overlapping_navigation_is_ignored() {
        let mut editor = open();
        editor.advance();
        assert_eq!(editor.advance(), Navigation::Busy);
        assert_eq!(editor.retreat(), Navigation::Busy);
        finish(&mut editor);
        assert_eq!(editor.document().page_count(), 4);
        assert_eq!(editor.active_set(), 1);
    }

    #[test]
    fn test_input_during_turn_writes_old_pages() {
        let mut editor = open();
        editor.advance();
        editor.type_text("late");
        finish(&mut editor);
        assert_eq!(editor.document().page(0).unwrap().plain_title(), "late");
        assert!(editor.document().page(2).unwrap().is_blank());
    }

    #[test]
    fn test_without_containers_loads_immediately() {
        let mut editor = PagedDocumentEditor::open(
            EditorConfig::default(),
            EditorCollaborators::default().without_page_containers(),
        );
        assert_eq!(editor.advance(), Navigation::Completed);
        assert_eq!(editor.bound_set(), 1);
        assert!(!editor.is_transitioning());
    }

    #[derive(Clone, Default)]
    struct Recorder {
        cues: Rc<RefCell<Vec<TransitionCue>>>,
        fail: bool,
    }

    impl PageAnimator for Recorder {
        fn play(&mut self, cue: &TransitionCue) -> crate::Result<()> {
            if self.fail {
                return Err(Error::Animation("not loaded".to_string()));
            }
            self.cues.borrow_mut().push(*cue);
            Ok(())
        }
    }

    #[test]
    fn test_animated_transition_plays_both_phases() {
        let recorder = Recorder::default();
        let cues = recorder.cues.clone();
        let mut editor = PagedDocumentEditor::open(
            EditorConfig::default(),
            EditorCollaborators::default().with_animator(recorder),
        );
        editor.type_text("x");
        editor.advance();
        assert!(!editor.flip_animation_active());
        editor.tick(Duration::from_millis(400));
        editor.tick(Duration::from_millis(400));
        assert!(!editor.is_transitioning());

        let cues = cues.borrow();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].phase, Phase::TurnOut);
        assert_eq!(cues[0].ease, Ease::Power2In);
        assert_eq!(cues[0].to.rotation_y, -90.0);
        assert_eq!(cues[1].phase, Phase::TurnIn);
        assert_eq!(cues[1].from.rotation_y, 90.0);
        assert_eq!(cues[1].duration, Duration::from_millis(400));
    }

    #[test]
    fn test_failing_animator_falls_back_to_css() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut editor = PagedDocumentEditor::open(
            EditorConfig::default(),
            EditorCollaborators::default().with_animator(recorder),
        );
        editor.type_text("x");
        assert_eq!(editor.advance(), Navigation::Started);
        assert!(editor.flip_animation_active());
        editor.tick(Duration::from_millis(350));
        assert_eq!(editor.bound_set(), 1);
        editor.tick(Duration::from_millis(350));
        assert!(!editor.is_transitioning());
    }

    #[test]
    fn test_keys_only_while_visible() {
        let mut editor = open();
        editor.type_text("x");
        assert!(editor.handle_key(&KeyChord::alt(Key::ArrowRight)));
        assert!(editor.is_transitioning());
        finish(&mut editor);
        assert!(editor.handle_key(&KeyChord::alt(Key::ArrowLeft)));
        finish(&mut editor);
        assert_eq!(editor.active_set(), 0);
        assert!(!editor.handle_key(&KeyChord::new(Key::Char('x'))));

        editor.visible = false;
        assert!(!editor.handle_key(&KeyChord::ctrl('b')));
    }

    #[test]
    fn test_focus_moves_between_surfaces() {
        let mut editor = open();
        editor.focus(SurfaceId::body(1));
        assert_eq!(editor.focused(), Some(SurfaceId::body(1)));
        assert!(!editor.surface(SurfaceId::title(0)).unwrap().has_focus());

        editor.blur();
        assert_eq!(editor.focused(), None);
        editor.type_text("y");
        assert_eq!(editor.focused(), Some(SurfaceId::body(1)));
        assert_eq!(editor.document().page(1).unwrap().plain_body(), "y");
    }
}
