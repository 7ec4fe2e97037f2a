// Bulk edit service
// Applies a committed value to every selected (accommodation, date) cell

use std::collections::BTreeSet;

use crate::grid::editing::BulkEditHandler;
use crate::models::modified::{ModifiedKey, ModifiedSet};
use crate::models::projection::{DailyProjection, Projection};
use crate::models::selection::SelectionSet;

/// Applies committed edits to the cross product of the selected
/// accommodations and the selected dates, recording each touched cell in the
/// modified set. Dates outside the projection window are skipped.
pub struct BulkEditor<'a> {
    projection: &'a mut Projection,
    modified: &'a mut ModifiedSet,
    accommodations: &'a BTreeSet<i64>,
    dates: &'a SelectionSet,
    active_rate_type: Option<i64>,
    touched: usize,
}

impl<'a> BulkEditor<'a> {
    pub fn new(
        projection: &'a mut Projection,
        modified: &'a mut ModifiedSet,
        accommodations: &'a BTreeSet<i64>,
        dates: &'a SelectionSet,
        active_rate_type: Option<i64>,
    ) -> Self {
        Self {
            projection,
            modified,
            accommodations,
            dates,
            active_rate_type,
            touched: 0,
        }
    }

    /// Number of cells changed by this editor so far.
    pub fn touched(&self) -> usize {
        self.touched
    }

    /// Run `apply` on every target cell and record it under `rate_type_id`.
    /// Returns the number of cells touched.
    fn apply_to_targets(
        &mut self,
        rate_type_id: Option<i64>,
        mut apply: impl FnMut(&mut DailyProjection),
    ) -> usize {
        let mut touched = 0;
        for &accommodation_id in self.accommodations {
            for date in self.dates.iter() {
                let Some(cell) = self.projection.cell_mut(accommodation_id, date) else {
                    continue;
                };
                apply(cell);
                self.modified.insert(ModifiedKey {
                    accommodation_id,
                    date,
                    rate_type_id,
                });
                touched += 1;
            }
        }
        self.touched += touched;
        touched
    }
}

impl BulkEditHandler for BulkEditor<'_> {
    fn on_price_commit(&mut self, new_price: f64) {
        let Some(rate_type_id) = self.active_rate_type else {
            log::warn!("Price commit ignored: no active rate type");
            return;
        };

        let touched = self.apply_to_targets(Some(rate_type_id), |cell| {
            cell.price_by_rate_type.insert(rate_type_id, new_price);
        });
        log::info!(
            "Set price {} for rate type {} on {} cells",
            new_price,
            rate_type_id,
            touched
        );
    }

    fn on_minimum_stay_commit(&mut self, new_value: Option<u32>) {
        let touched = self.apply_to_targets(None, |cell| {
            cell.minimum_stay = new_value;
        });
        log::info!("Set minimum stay {:?} on {} cells", new_value, touched);
    }
}
