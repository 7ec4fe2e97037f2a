// Integration tests for the normalize -> project -> select -> edit flow
mod fixtures;

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Datelike;
use egui::{pos2, vec2, Key, Modifiers, PointerButton, Rect};
use pretty_assertions::assert_eq;

use fixtures::dates::{leap_day_2024, march};
use fixtures::payloads;
use rate_grid::grid::{CommitOutcome, CommittedValue, GridController, KeyOutcome, ViewportListeners};
use rate_grid::models::modified::{ModifiedKey, ModifiedSet};
use rate_grid::models::projection::Projection;
use rate_grid::services::bulk_edit::BulkEditor;
use rate_grid::services::normalize::{normalize_periods, normalize_rate_type_links, normalize_units};
use rate_grid::services::projection::IntervalProjector;
use rate_grid::services::supplier::SupplierPayload;
use rate_grid::utils::date::{add_months, week_rows, DateSpan};

const CELL_WIDTH: f32 = 40.0;

#[derive(Default)]
struct CountingListeners {
    attached: Cell<usize>,
    detached: Cell<usize>,
}

impl ViewportListeners for CountingListeners {
    fn attach_drag_listeners(&self) {
        self.attached.set(self.attached.get() + 1);
    }

    fn detach_drag_listeners(&self) {
        self.detached.set(self.detached.get() + 1);
    }
}

fn load_projection() -> (SupplierPayload, Projection, usize) {
    let payload: SupplierPayload = serde_json::from_value(payloads::harbour_lofts()).unwrap();
    let normalized = normalize_periods(&payload.periods);
    let links = normalize_rate_type_links(&payload.linked_rate_types);
    let window = DateSpan::new(march(1), march(10)).unwrap();
    let projection = IntervalProjector::new().project_with_links(&normalized.periods, &links, window);
    (payload, projection, normalized.skipped.len())
}

/// Lay the window out as one row of equally wide cells.
fn register_cells(grid: &mut GridController, window: DateSpan) {
    let hit_map = grid.hit_map_mut();
    hit_map.clear();
    for (index, date) in window.days().enumerate() {
        let min = pos2(index as f32 * CELL_WIDTH, 0.0);
        hit_map.register(Rect::from_min_size(min, vec2(CELL_WIDTH, 20.0)), date);
    }
}

fn cell_center(window: DateSpan, date: chrono::NaiveDate) -> egui::Pos2 {
    let index = (date - window.start).num_days() as f32;
    pos2(index * CELL_WIDTH + CELL_WIDTH / 2.0, 10.0)
}

#[test]
fn test_payload_projection() {
    let (payload, projection, skipped) = load_projection();

    let units = normalize_units(&payload.units);
    assert_eq!(units.units.len(), 2);
    assert_eq!(units.units[1].row_label(), "Loft B");
    assert!(units.skipped.is_empty());
    assert_eq!(skipped, 1);

    // Later period overrides price and raises the stay; promotion sticks.
    let overlap = projection.cell(101, march(5)).unwrap();
    assert_eq!(overlap.price_for(1), Some(150.0));
    assert_eq!(overlap.minimum_stay, Some(4));
    assert!(overlap.has_promotion);
    // The unlabelled period contributes the catalog label, not a placeholder.
    assert_eq!(overlap.rate_type_labels, vec!["Standard".to_string()]);

    let plain = projection.cell(101, march(7)).unwrap();
    assert_eq!(plain.price_for(1), Some(110.5));
    assert_eq!(plain.minimum_stay, Some(2));
    assert!(!plain.has_promotion);
    assert_eq!(plain.rate_type_labels, vec!["Standard".to_string()]);

    assert_eq!(projection.price(102, march(4), 3), Some(80.0));
    assert!(projection.cell(102, march(3)).is_none());

    let catalog: Vec<(i64, &str)> = projection
        .rate_type_catalog
        .iter()
        .map(|rate_type| (rate_type.id, rate_type.label.as_str()))
        .collect();
    assert_eq!(catalog, vec![(1, "Standard"), (3, "Non-refundable")]);
    assert_eq!(projection.default_rate_type(), Some(1));
}

#[test]
fn test_drag_select_then_bulk_price_edit() {
    let (_, mut projection, _) = load_projection();
    let window = projection.window;
    let listeners = Rc::new(CountingListeners::default());
    let mut grid = GridController::new(listeners.clone());
    register_cells(&mut grid, window);

    // Drag from Mar 3 to Mar 6.
    let start = Instant::now();
    assert!(grid.pointer_down(march(3), cell_center(window, march(3)), PointerButton::Primary));
    assert_eq!(listeners.attached.get(), 1);
    grid.pointer_move(cell_center(window, march(6)));
    grid.pointer_up(Modifiers::NONE, start);

    assert_eq!(listeners.detached.get(), 1);
    let selected: Vec<_> = grid.selection().iter().collect();
    assert_eq!(selected, vec![march(3), march(4), march(5), march(6)]);

    // The click the browser fires after the release is swallowed.
    assert!(!grid.header_click(march(6), start + Duration::from_millis(20)));
    assert_eq!(grid.selection().len(), 4);

    // Edit the overlapping day; the seed shows the projected price.
    let rate_type = projection.default_rate_type();
    let session = grid.start_price_edit(101, march(5), &projection, rate_type).unwrap();
    assert_eq!(session.raw_input(), "150");

    // A drag cannot start while editing.
    assert!(!grid.pointer_down(march(8), cell_center(window, march(8)), PointerButton::Primary));

    grid.set_edit_input("175,5").unwrap();
    let mut modified = ModifiedSet::new();
    let units: BTreeSet<i64> = [101, 102].into_iter().collect();
    let dates = grid.selection().clone();
    let mut editor = BulkEditor::new(&mut projection, &mut modified, &units, &dates, rate_type);

    let outcome = grid.commit_edit(&mut editor).unwrap();
    assert_eq!(outcome, CommitOutcome::Applied(CommittedValue::Price(175.5)));
    assert_eq!(editor.touched(), 8);
    assert!(!grid.editing().is_active());

    for unit in [101, 102] {
        for day in 3..=6 {
            assert_eq!(projection.price(unit, march(day), 1), Some(175.5));
        }
    }
    assert_eq!(projection.price(101, march(7), 1), Some(110.5));
    assert!(modified.contains(&ModifiedKey::price(102, march(3), 1)));
    assert_eq!(modified.len(), 8);
}

#[test]
fn test_replace_drag_and_escape_priority() {
    let (_, projection, _) = load_projection();
    let window = projection.window;
    let mut grid = GridController::new(Rc::new(CountingListeners::default()));
    register_cells(&mut grid, window);
    let now = Instant::now();

    grid.header_click(march(1), now);
    grid.header_click(march(9), now);
    assert_eq!(grid.selection().len(), 2);

    // Ctrl-drag replaces, and a reversed drag still selects the whole range.
    grid.pointer_down(march(5), cell_center(window, march(5)), PointerButton::Primary);
    grid.pointer_move(cell_center(window, march(4)));
    grid.pointer_up(Modifiers::COMMAND, now);
    let selected: Vec<_> = grid.selection().iter().collect();
    assert_eq!(selected, vec![march(4), march(5)]);

    // Invalid minimum stay closes the edit without applying anything.
    grid.start_minimum_stay_edit(101, march(4), &projection).unwrap();
    grid.set_edit_input("2.5").unwrap();
    let mut modified = ModifiedSet::new();
    let mut projection = projection;
    let units: BTreeSet<i64> = [101].into_iter().collect();
    let dates = grid.selection().clone();
    let mut editor = BulkEditor::new(&mut projection, &mut modified, &units, &dates, None);
    assert_eq!(grid.commit_edit(&mut editor).unwrap(), CommitOutcome::Discarded);
    assert_eq!(editor.touched(), 0);

    grid.start_minimum_stay_edit(101, march(4), &projection).unwrap();
    assert!(matches!(grid.key_pressed(Key::Escape), KeyOutcome::EditCancelled(_)));
    assert_eq!(grid.selection().len(), 2);
    assert_eq!(grid.key_pressed(Key::Escape), KeyOutcome::SelectionCleared);
    assert!(grid.selection().is_empty());
}

#[test]
fn test_week_rows_across_leap_day() {
    let leap_day = leap_day_2024();
    assert_eq!(add_months(leap_day, 12), chrono::NaiveDate::from_ymd_opt(2025, 2, 28));

    // Thursday Feb 29 to Sunday Mar 10: a short first row, then Monday rows.
    let window = DateSpan::starting_at(leap_day, 11).unwrap();
    let rows: Vec<(u32, u32)> = week_rows(window)
        .iter()
        .map(|row| (row.start.day(), row.end.day()))
        .collect();
    assert_eq!(rows, vec![(29, 3), (4, 10)]);
}
