// Projection model
// Per-day view of interval rate records

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::rate::RateType;
use crate::utils::date::DateSpan;

/// Most labels a single day keeps; later labels are dropped.
pub const MAX_LABELS_PER_DAY: usize = 2;

/// One grid cell: everything known about an accommodation on a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyProjection {
    pub price_by_rate_type: BTreeMap<i64, f64>,
    /// `None` when no contributing period defined a positive minimum.
    pub minimum_stay: Option<u32>,
    pub has_promotion: bool,
    pub rate_type_labels: Vec<String>,
}

impl DailyProjection {
    pub fn price_for(&self, rate_type_id: i64) -> Option<f64> {
        self.price_by_rate_type.get(&rate_type_id).copied()
    }
}

/// Cells of one accommodation, keyed by day.
pub type DailyGrid = BTreeMap<NaiveDate, DailyProjection>;

/// Output of the interval projector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub window: DateSpan,
    pub daily: BTreeMap<i64, DailyGrid>,
    /// Deduplicated rate types, ascending by explicit order, unordered last.
    pub rate_type_catalog: Vec<RateType>,
}

impl Projection {
    pub fn empty(window: DateSpan) -> Self {
        Self {
            window,
            daily: BTreeMap::new(),
            rate_type_catalog: Vec::new(),
        }
    }

    pub fn cell(&self, accommodation_id: i64, date: NaiveDate) -> Option<&DailyProjection> {
        self.daily.get(&accommodation_id)?.get(&date)
    }

    /// Mutable cell, created on demand. `None` outside the window, so no
    /// cell can ever exist for a day the projection was not queried for.
    pub fn cell_mut(&mut self, accommodation_id: i64, date: NaiveDate) -> Option<&mut DailyProjection> {
        if !self.window.contains(date) {
            return None;
        }
        Some(
            self.daily
                .entry(accommodation_id)
                .or_default()
                .entry(date)
                .or_default(),
        )
    }

    pub fn price(&self, accommodation_id: i64, date: NaiveDate, rate_type_id: i64) -> Option<f64> {
        self.cell(accommodation_id, date)?.price_for(rate_type_id)
    }

    pub fn minimum_stay(&self, accommodation_id: i64, date: NaiveDate) -> Option<u32> {
        self.cell(accommodation_id, date)?.minimum_stay
    }

    pub fn accommodation_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.daily.keys().copied()
    }

    pub fn rate_type(&self, id: i64) -> Option<&RateType> {
        self.rate_type_catalog.iter().find(|rate_type| rate_type.id == id)
    }

    /// First catalog entry, the default active rate type for price editing.
    pub fn default_rate_type(&self) -> Option<i64> {
        self.rate_type_catalog.first().map(|rate_type| rate_type.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_cell_mut_refuses_days_outside_window() {
        let mut projection = Projection::empty(DateSpan::new(d(1), d(10)).unwrap());
        assert!(projection.cell_mut(1, d(11)).is_none());
        assert!(projection.daily.is_empty());

        projection.cell_mut(1, d(5)).unwrap().minimum_stay = Some(3);
        assert_eq!(projection.minimum_stay(1, d(5)), Some(3));
        assert_eq!(projection.minimum_stay(1, d(6)), None);
    }
}
