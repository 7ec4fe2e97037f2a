// Selection model
// Selected date columns and updates to them

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use crate::utils::date::{format_iso, parse_iso, DateSpan};

/// Set of selected dates for one supplier context. Membership is the only
/// semantics; iteration is chronological for convenience.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    dates: BTreeSet<NaiveDate>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_span(span: DateSpan) -> Self {
        span.days().collect()
    }

    /// Build from ISO strings, skipping anything unparsable.
    pub fn from_iso<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        values.into_iter().filter_map(parse_iso).collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date)
    }

    /// Add the date if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.dates.remove(&date) {
            false
        } else {
            self.dates.insert(date);
            true
        }
    }

    pub fn toggled(&self, date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.toggle(date);
        next
    }

    pub fn union_span(&mut self, span: DateSpan) {
        self.dates.extend(span.days());
    }

    pub fn with_span(&self, span: DateSpan) -> Self {
        let mut next = self.clone();
        next.union_span(span);
        next
    }

    pub fn clear(&mut self) {
        self.dates.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn iso_dates(&self) -> Vec<String> {
        self.dates.iter().map(|date| format_iso(*date)).collect()
    }
}

impl FromIterator<NaiveDate> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Selection change notification.
///
/// Listeners either receive the full next set or a function from the
/// previous set to the next one.
pub enum SelectionUpdate {
    Replace(SelectionSet),
    Transform(Box<dyn FnOnce(&SelectionSet) -> SelectionSet>),
}

impl SelectionUpdate {
    pub fn transform(f: impl FnOnce(&SelectionSet) -> SelectionSet + 'static) -> Self {
        Self::Transform(Box::new(f))
    }

    pub fn apply(self, previous: &SelectionSet) -> SelectionSet {
        match self {
            Self::Replace(next) => next,
            Self::Transform(f) => f(previous),
        }
    }
}

impl fmt::Debug for SelectionUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(set) => f.debug_tuple("Replace").field(set).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}
