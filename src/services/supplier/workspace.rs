use std::collections::{BTreeMap, BTreeSet};

use super::orchestrator::{LoadOutcome, SupplierWarning};
use crate::models::accommodation::AccommodationUnit;
use crate::models::modified::ModifiedSet;
use crate::models::projection::Projection;
use crate::models::selection::{SelectionSet, SelectionUpdate};
use crate::services::bulk_edit::BulkEditor;

/// Everything the grid shows for one supplier.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierContext {
    pub supplier_id: i64,
    pub name: String,
    pub units: Vec<AccommodationUnit>,
    pub projection: Projection,
    pub skipped_records: usize,
    pub selected_units: BTreeSet<i64>,
    pub selected_dates: SelectionSet,
    pub modified: ModifiedSet,
}

impl SupplierContext {
    pub fn new(
        supplier_id: i64,
        name: String,
        units: Vec<AccommodationUnit>,
        projection: Projection,
        skipped_records: usize,
    ) -> Self {
        Self {
            supplier_id,
            name,
            units,
            projection,
            skipped_records,
            selected_units: BTreeSet::new(),
            selected_dates: SelectionSet::new(),
            modified: ModifiedSet::new(),
        }
    }

    pub fn has_unit(&self, unit_id: i64) -> bool {
        self.units.iter().any(|unit| unit.id == unit_id)
    }

    /// Toggle a unit in the unit selection. Unknown units are ignored.
    pub fn toggle_unit(&mut self, unit_id: i64) -> bool {
        if !self.has_unit(unit_id) {
            return false;
        }
        if !self.selected_units.remove(&unit_id) {
            self.selected_units.insert(unit_id);
        }
        true
    }

    pub fn select_all_units(&mut self) {
        self.selected_units = self.units.iter().map(|unit| unit.id).collect();
    }

    /// Apply a selection change published by the grid's selection controller.
    pub fn apply_selection_update(&mut self, update: SelectionUpdate) {
        self.selected_dates = update.apply(&self.selected_dates);
    }
}

/// Per-supplier grid state, updated from orchestrator results.
#[derive(Debug, Default)]
pub struct GridWorkspace {
    contexts: BTreeMap<i64, SupplierContext>,
    applied_generation: u64,
    warnings: Vec<SupplierWarning>,
}

impl GridWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }

    pub fn warnings(&self) -> &[SupplierWarning] {
        &self.warnings
    }

    pub fn context(&self, supplier_id: i64) -> Option<&SupplierContext> {
        self.contexts.get(&supplier_id)
    }

    pub fn context_mut(&mut self, supplier_id: i64) -> Option<&mut SupplierContext> {
        self.contexts.get_mut(&supplier_id)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &SupplierContext> {
        self.contexts.values()
    }

    /// Apply a load outcome. Results from a refresh older than the last one
    /// applied are dropped. Reloaded suppliers start with an empty modified
    /// set and keep the selected units and dates that still exist; suppliers
    /// that failed keep their previous context.
    ///
    /// Returns whether anything was applied.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        let report = match outcome {
            LoadOutcome::Completed(report) => report,
            LoadOutcome::Cancelled { generation } => {
                log::debug!("Refresh {} was cancelled", generation);
                return false;
            }
        };

        if report.generation <= self.applied_generation {
            log::debug!(
                "Ignoring stale refresh {} (already at {})",
                report.generation,
                self.applied_generation
            );
            return false;
        }

        for mut context in report.contexts {
            if let Some(previous) = self.contexts.get(&context.supplier_id) {
                context.selected_units = previous
                    .selected_units
                    .iter()
                    .copied()
                    .filter(|&id| context.has_unit(id))
                    .collect();
                let window = context.projection.window;
                context.selected_dates = previous
                    .selected_dates
                    .iter()
                    .filter(|date| window.contains(*date))
                    .collect();
            }
            self.contexts.insert(context.supplier_id, context);
        }

        self.applied_generation = report.generation;
        self.warnings = report.warnings;
        true
    }

    /// Bulk editor over one supplier's projection, targeting its selected
    /// units and dates.
    pub fn bulk_editor(&mut self, supplier_id: i64, active_rate_type: Option<i64>) -> Option<BulkEditor<'_>> {
        let context = self.contexts.get_mut(&supplier_id)?;
        Some(BulkEditor::new(
            &mut context.projection,
            &mut context.modified,
            &context.selected_units,
            &context.selected_dates,
            active_rate_type,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::editing::BulkEditHandler;
    use crate::services::supplier::LoadReport;
    use crate::utils::date::DateSpan;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn window() -> DateSpan {
        DateSpan::new(d(1), d(7)).unwrap()
    }

    fn context(supplier_id: i64, unit_ids: &[i64]) -> SupplierContext {
        let units = unit_ids
            .iter()
            .map(|&id| AccommodationUnit::new(id, format!("Unit {}", id)))
            .collect();
        SupplierContext::new(supplier_id, "Coastal".to_string(), units, Projection::empty(window()), 0)
    }

    fn completed(generation: u64, contexts: Vec<SupplierContext>) -> LoadOutcome {
        LoadOutcome::Completed(LoadReport {
            generation,
            window: window(),
            contexts,
            warnings: Vec::new(),
        })
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut workspace = GridWorkspace::new();
        assert!(workspace.apply(completed(2, vec![context(1, &[10])])));
        assert!(!workspace.apply(completed(1, vec![context(1, &[10, 11])])));

        assert_eq!(workspace.applied_generation(), 2);
        assert_eq!(workspace.context(1).unwrap().units.len(), 1);
    }

    #[test]
    fn test_cancelled_outcome_changes_nothing() {
        let mut workspace = GridWorkspace::new();
        assert!(!workspace.apply(LoadOutcome::Cancelled { generation: 1 }));
        assert_eq!(workspace.contexts().count(), 0);
    }

    #[test]
    fn test_reload_clears_modified_and_keeps_valid_selection() {
        let mut workspace = GridWorkspace::new();
        workspace.apply(completed(1, vec![context(1, &[10, 11])]));

        let ctx = workspace.context_mut(1).unwrap();
        ctx.select_all_units();
        ctx.apply_selection_update(SelectionUpdate::Replace([d(2)].into_iter().collect()));
        workspace
            .bulk_editor(1, None)
            .unwrap()
            .on_minimum_stay_commit(Some(3));
        assert_eq!(workspace.context(1).unwrap().modified.len(), 2);

        let mut reloaded = context(1, &[11, 12]);
        reloaded.projection = Projection::empty(DateSpan::new(d(2), d(9)).unwrap());
        workspace
            .context_mut(1)
            .unwrap()
            .apply_selection_update(SelectionUpdate::transform(|previous| previous.toggled(d(1))));
        workspace.apply(completed(2, vec![reloaded]));

        let ctx = workspace.context(1).unwrap();
        assert!(ctx.modified.is_empty());
        assert_eq!(ctx.selected_units, BTreeSet::from([11]));
        assert_eq!(ctx.selected_dates.iter().collect::<Vec<_>>(), vec![d(2)]);
    }

    #[test]
    fn test_suppliers_keep_separate_date_selections() {
        let mut workspace = GridWorkspace::new();
        workspace.apply(completed(1, vec![context(1, &[10]), context(2, &[20])]));

        for (supplier_id, day) in [(1, 3), (2, 5)] {
            let ctx = workspace.context_mut(supplier_id).unwrap();
            ctx.select_all_units();
            ctx.apply_selection_update(SelectionUpdate::transform(move |previous| previous.toggled(d(day))));
        }

        workspace.bulk_editor(1, None).unwrap().on_minimum_stay_commit(Some(2));
        workspace.bulk_editor(2, None).unwrap().on_minimum_stay_commit(Some(6));

        let first = workspace.context(1).unwrap();
        let second = workspace.context(2).unwrap();
        assert_eq!(first.selected_dates.iter().collect::<Vec<_>>(), vec![d(3)]);
        assert_eq!(second.selected_dates.iter().collect::<Vec<_>>(), vec![d(5)]);
        assert_eq!(first.projection.minimum_stay(10, d(3)), Some(2));
        assert_eq!(first.projection.minimum_stay(10, d(5)), None);
        assert_eq!(second.projection.minimum_stay(20, d(5)), Some(6));
        assert_eq!(second.projection.minimum_stay(20, d(3)), None);
    }

    #[test]
    fn test_toggle_unit() {
        let mut ctx = context(1, &[10]);
        assert!(ctx.toggle_unit(10));
        assert!(ctx.selected_units.contains(&10));
        assert!(ctx.toggle_unit(10));
        assert!(ctx.selected_units.is_empty());
        assert!(!ctx.toggle_unit(42));
    }
}
