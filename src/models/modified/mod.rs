// Locally modified cells
// Keys of cells changed in the grid but not yet persisted

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Composite key of a locally changed cell. `rate_type_id` is set for price
/// edits and `None` for minimum-stay edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModifiedKey {
    pub accommodation_id: i64,
    pub date: NaiveDate,
    pub rate_type_id: Option<i64>,
}

impl ModifiedKey {
    pub fn price(accommodation_id: i64, date: NaiveDate, rate_type_id: i64) -> Self {
        Self {
            accommodation_id,
            date,
            rate_type_id: Some(rate_type_id),
        }
    }

    pub fn minimum_stay(accommodation_id: i64, date: NaiveDate) -> Self {
        Self {
            accommodation_id,
            date,
            rate_type_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifiedSet {
    keys: BTreeSet<ModifiedKey>,
}

impl ModifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ModifiedKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &ModifiedKey) -> bool {
        self.keys.contains(key)
    }

    /// True when any value of the cell (price of any rate type or minimum
    /// stay) was changed.
    pub fn is_cell_modified(&self, accommodation_id: i64, date: NaiveDate) -> bool {
        self.keys
            .iter()
            .any(|key| key.accommodation_id == accommodation_id && key.date == date)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModifiedKey> {
        self.keys.iter()
    }
}
