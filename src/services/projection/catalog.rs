use std::collections::HashMap;

use crate::models::rate::{is_placeholder_label, RateType};

/// Accumulates rate types in discovery order.
///
/// An id is admitted once. Later sightings may only upgrade the entry: a
/// placeholder label is replaced by a real one, and an unset order is filled.
#[derive(Debug, Default)]
pub struct RateTypeCatalogBuilder {
    entries: Vec<RateType>,
    index: HashMap<i64, usize>,
}

impl RateTypeCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, id: i64, label: Option<&str>, order: Option<i32>) {
        let label = label.map(str::trim).filter(|label| !label.is_empty());

        match self.index.get(&id) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                if let Some(label) = label {
                    if entry.has_placeholder_label() && !is_placeholder_label(label, id) {
                        log::debug!("Rate type {} label upgraded to '{}'", id, label);
                        entry.label = label.to_string();
                    }
                }
                if entry.order.is_none() {
                    entry.order = order;
                }
            }
            None => {
                let label = label
                    .map(str::to_string)
                    .unwrap_or_else(|| RateType::placeholder_label(id));
                self.index.insert(id, self.entries.len());
                self.entries.push(RateType::new(id, label, order));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted catalog: ascending by order, unordered entries last. The sort
    /// is stable, so ties keep discovery order.
    pub fn finish(mut self) -> Vec<RateType> {
        self.entries
            .sort_by_key(|rate_type| (rate_type.order.is_none(), rate_type.order));
        self.entries
    }
}
