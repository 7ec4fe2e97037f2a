// Date selection
// Drag and click selection over date columns

use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use egui::{Modifiers, PointerButton, Pos2};

use super::drag::{
    DragListenerGuard, DragSession, ViewportListeners, CLICK_SUPPRESSION, DRAG_THRESHOLD,
};
use super::hit_map::DateHitMap;
use crate::models::selection::{SelectionSet, SelectionUpdate};
use crate::models::settings::GridSettings;

/// Ctrl on Windows/Linux, Cmd on macOS.
pub fn is_replace_modifier(modifiers: Modifiers) -> bool {
    modifiers.command || modifiers.ctrl || modifiers.mac_cmd
}

/// Selected dates, the optional drag session and the post-drag click
/// suppression deadline. Transitions are pure and return the next state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    pub selection: SelectionSet,
    pub drag: Option<DragSession>,
    pub suppress_clicks_until: Option<Instant>,
}

/// Result of a transition.
#[derive(Debug)]
pub struct Transition {
    pub state: SelectionState,
    pub update: Option<SelectionUpdate>,
}

impl Transition {
    fn unchanged(state: &SelectionState) -> Self {
        Self {
            state: state.clone(),
            update: None,
        }
    }
}

impl SelectionState {
    pub fn is_armed(&self) -> bool {
        self.drag.as_ref().is_some_and(|drag| drag.armed)
    }

    /// True while a click arriving right after a drag release must be ignored.
    pub fn clicks_suppressed(&self, now: Instant) -> bool {
        self.suppress_clicks_until.is_some_and(|until| now < until)
    }

    /// Press on a date-tagged header or cell. Only the primary button opens a
    /// session, and never while an inline edit is active.
    pub fn pointer_down(
        &self,
        date: NaiveDate,
        pointer: Pos2,
        button: PointerButton,
        editing_active: bool,
    ) -> SelectionState {
        if button != PointerButton::Primary || editing_active {
            return self.clone();
        }
        SelectionState {
            drag: Some(DragSession::begin(date, pointer)),
            ..self.clone()
        }
    }

    pub fn pointer_move(
        &self,
        pointer: Pos2,
        hovered: Option<NaiveDate>,
        threshold: f32,
    ) -> SelectionState {
        match &self.drag {
            Some(drag) => SelectionState {
                drag: Some(drag.moved(pointer, hovered, threshold)),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Release. An unarmed session toggles its anchor date; an armed one
    /// replaces the selection with the dragged range when the replace
    /// modifier is held, or unions the range in otherwise. The session always
    /// ends and clicks are suppressed for `suppression`.
    pub fn pointer_up(&self, modifiers: Modifiers, now: Instant, suppression: Duration) -> Transition {
        let Some(drag) = &self.drag else {
            return Transition::unchanged(self);
        };

        let mut next = SelectionState {
            selection: self.selection.clone(),
            drag: None,
            suppress_clicks_until: Some(now + suppression),
        };

        let update = if !drag.armed {
            let date = drag.anchor_date;
            next.selection.toggle(date);
            SelectionUpdate::transform(move |previous| previous.toggled(date))
        } else if is_replace_modifier(modifiers) {
            next.selection = SelectionSet::from_span(drag.span());
            SelectionUpdate::Replace(next.selection.clone())
        } else {
            let span = drag.span();
            next.selection.union_span(span);
            SelectionUpdate::transform(move |previous| previous.with_span(span))
        };

        Transition {
            state: next,
            update: Some(update),
        }
    }

    /// Click on a column header. Ignored while a drag is armed or right after
    /// a drag release; otherwise toggles the header's date.
    pub fn header_click(&self, date: NaiveDate, now: Instant) -> Transition {
        if self.is_armed() || self.clicks_suppressed(now) {
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.selection.toggle(date);
        Transition {
            state: next,
            update: Some(SelectionUpdate::transform(move |previous| previous.toggled(date))),
        }
    }

    pub fn clear(&self) -> Transition {
        if self.selection.is_empty() {
            return Transition::unchanged(self);
        }
        Transition {
            state: SelectionState {
                selection: SelectionSet::new(),
                ..self.clone()
            },
            update: Some(SelectionUpdate::Replace(SelectionSet::new())),
        }
    }

    /// Abandon the drag session without touching the selection.
    pub fn cancel_drag(&self) -> SelectionState {
        SelectionState {
            drag: None,
            ..self.clone()
        }
    }
}

type ChangeCallback = Box<dyn FnMut(SelectionUpdate)>;

/// Selection controller for one grid instance.
pub struct GridSelectionController {
    state: SelectionState,
    listeners: Rc<dyn ViewportListeners>,
    listener_guard: Option<DragListenerGuard>,
    on_change: Option<ChangeCallback>,
    drag_threshold: f32,
    click_suppression: Duration,
}

impl GridSelectionController {
    pub fn new(listeners: Rc<dyn ViewportListeners>) -> Self {
        Self {
            state: SelectionState::default(),
            listeners,
            listener_guard: None,
            on_change: None,
            drag_threshold: DRAG_THRESHOLD,
            click_suppression: CLICK_SUPPRESSION,
        }
    }

    pub fn with_settings(listeners: Rc<dyn ViewportListeners>, settings: &GridSettings) -> Self {
        Self {
            drag_threshold: settings.drag_threshold,
            click_suppression: Duration::from_millis(settings.click_suppression_ms),
            ..Self::new(listeners)
        }
    }

    /// Register the selection change listener.
    pub fn set_on_change(&mut self, callback: impl FnMut(SelectionUpdate) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.state.selection
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.state.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.drag.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    pub fn clicks_suppressed(&self, now: Instant) -> bool {
        self.state.clicks_suppressed(now)
    }

    /// Returns true when a drag session was opened.
    pub fn pointer_down(
        &mut self,
        date: NaiveDate,
        pointer: Pos2,
        button: PointerButton,
        editing_active: bool,
    ) -> bool {
        let next = self.state.pointer_down(date, pointer, button, editing_active);
        let opened = next.drag.is_some() && self.state.drag.is_none();
        self.enter(next);
        opened
    }

    pub fn pointer_move(&mut self, pointer: Pos2, hit_map: &DateHitMap) {
        if self.state.drag.is_none() {
            return;
        }
        let next = self
            .state
            .pointer_move(pointer, hit_map.resolve(pointer), self.drag_threshold);
        if next.drag != self.state.drag {
            log::debug!("Drag moved: {:?}", next.drag);
        }
        self.enter(next);
    }

    pub fn pointer_up(&mut self, modifiers: Modifiers, now: Instant) {
        let transition = self.state.pointer_up(modifiers, now, self.click_suppression);
        self.apply(transition);
    }

    pub fn header_click(&mut self, date: NaiveDate, now: Instant) -> bool {
        let transition = self.state.header_click(date, now);
        let accepted = transition.update.is_some();
        self.apply(transition);
        accepted
    }

    pub fn clear_selection(&mut self) {
        let transition = self.state.clear();
        self.apply(transition);
    }

    /// Replace the selection from outside (e.g. a "select weekends" action).
    pub fn replace_selection(&mut self, selection: SelectionSet) {
        let transition = Transition {
            state: SelectionState {
                selection: selection.clone(),
                ..self.state.clone()
            },
            update: Some(SelectionUpdate::Replace(selection)),
        };
        self.apply(transition);
    }

    pub fn cancel_drag(&mut self) {
        let next = self.state.cancel_drag();
        self.enter(next);
    }

    fn apply(&mut self, transition: Transition) {
        self.enter(transition.state);
        if let Some(update) = transition.update {
            log::debug!("Selection now holds {} dates", self.state.selection.len());
            if let Some(callback) = self.on_change.as_mut() {
                callback(update);
            }
        }
    }

    /// Install the next state, keeping viewport listeners attached exactly
    /// while a drag session exists.
    fn enter(&mut self, next: SelectionState) {
        self.state = next;
        match (self.state.drag.is_some(), self.listener_guard.is_some()) {
            (true, false) => {
                self.listener_guard = Some(DragListenerGuard::acquire(self.listeners.clone()));
            }
            (false, true) => {
                self.listener_guard = None;
            }
            _ => {}
        }
    }
}
