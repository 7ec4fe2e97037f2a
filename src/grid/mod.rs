// Grid interaction controllers
//
// Renderer-independent state machines for the pricing grid. A renderer
// registers date-tagged cell rectangles in the hit map, forwards pointer and
// keyboard input, and draws from the controller state.

pub mod drag;
pub mod editing;
pub mod hit_map;
pub mod selection;

use std::rc::Rc;
use std::time::Instant;

use chrono::NaiveDate;
use egui::{Key, Modifiers, PointerButton, Pos2};

pub use drag::{DragListenerGuard, DragSession, PolledPointer, ViewportListeners};
pub use editing::{BulkEditHandler, CellEditingController, CommitOutcome, CommittedValue, EditingError};
pub use hit_map::DateHitMap;
pub use selection::{GridSelectionController, SelectionState};

use crate::models::editing::EditingSession;
use crate::models::projection::Projection;
use crate::models::selection::SelectionSet;
use crate::models::settings::GridSettings;

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Escape closed the active edit; the selection is untouched.
    EditCancelled(EditingSession),
    SelectionCleared,
    Ignored,
}

/// Selection and editing controllers of one grid instance, plus the hit map
/// the renderer fills each frame.
pub struct GridController {
    selection: GridSelectionController,
    editing: CellEditingController,
    hit_map: DateHitMap,
}

impl GridController {
    pub fn new(listeners: Rc<dyn ViewportListeners>) -> Self {
        Self {
            selection: GridSelectionController::new(listeners),
            editing: CellEditingController::new(),
            hit_map: DateHitMap::new(),
        }
    }

    pub fn with_settings(listeners: Rc<dyn ViewportListeners>, settings: &GridSettings) -> Self {
        Self {
            selection: GridSelectionController::with_settings(listeners, settings),
            editing: CellEditingController::new(),
            hit_map: DateHitMap::new(),
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        self.selection.selection()
    }

    pub fn selection_controller(&self) -> &GridSelectionController {
        &self.selection
    }

    pub fn selection_controller_mut(&mut self) -> &mut GridSelectionController {
        &mut self.selection
    }

    pub fn editing(&self) -> &CellEditingController {
        &self.editing
    }

    pub fn editing_mut(&mut self) -> &mut CellEditingController {
        &mut self.editing
    }

    pub fn hit_map_mut(&mut self) -> &mut DateHitMap {
        &mut self.hit_map
    }

    /// Primary-button press on a date column. Ignored while editing.
    pub fn pointer_down(&mut self, date: NaiveDate, pointer: Pos2, button: PointerButton) -> bool {
        let editing_active = self.editing.is_active();
        self.selection.pointer_down(date, pointer, button, editing_active)
    }

    pub fn pointer_move(&mut self, pointer: Pos2) {
        self.selection.pointer_move(pointer, &self.hit_map);
    }

    pub fn pointer_up(&mut self, modifiers: Modifiers, now: Instant) {
        self.selection.pointer_up(modifiers, now);
    }

    pub fn header_click(&mut self, date: NaiveDate, now: Instant) -> bool {
        self.selection.header_click(date, now)
    }

    /// Escape cancels an active edit first; only without one does it clear
    /// the selection. Other keys are ignored.
    pub fn key_pressed(&mut self, key: Key) -> KeyOutcome {
        if key != Key::Escape {
            return KeyOutcome::Ignored;
        }

        if let Some(session) = self.editing.cancel() {
            log::debug!("Escape cancelled {:?} edit", session.kind());
            return KeyOutcome::EditCancelled(session);
        }

        if self.selection.selection().is_empty() {
            return KeyOutcome::Ignored;
        }
        self.selection.clear_selection();
        KeyOutcome::SelectionCleared
    }

    /// Open a price edit on a cell for `rate_type_id`, seeded from `projection`.
    pub fn start_price_edit(
        &mut self,
        accommodation_id: i64,
        date: NaiveDate,
        projection: &Projection,
        rate_type_id: Option<i64>,
    ) -> Result<&EditingSession, EditingError> {
        self.editing.start_price_edit(
            accommodation_id,
            date,
            self.selection.selection(),
            projection.cell(accommodation_id, date),
            rate_type_id,
        )
    }

    pub fn start_minimum_stay_edit(
        &mut self,
        accommodation_id: i64,
        date: NaiveDate,
        projection: &Projection,
    ) -> Result<&EditingSession, EditingError> {
        self.editing.start_minimum_stay_edit(
            accommodation_id,
            date,
            self.selection.selection(),
            projection.cell(accommodation_id, date),
        )
    }

    pub fn set_edit_input(&mut self, text: impl Into<String>) -> Result<(), EditingError> {
        self.editing.set_input(text)
    }

    pub fn commit_edit(&mut self, handler: &mut dyn BulkEditHandler) -> Result<CommitOutcome, EditingError> {
        self.editing.commit(handler)
    }
}
