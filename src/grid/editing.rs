// Cell editing
// One inline price or minimum-stay edit, committed to every selected cell

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::editing::{EditKind, EditingSession};
use crate::models::projection::DailyProjection;
use crate::models::selection::SelectionSet;
use crate::utils::number::parse_decimal;

/// Receives committed values. Implementations apply them to the externally
/// tracked selection of accommodations and dates.
#[cfg_attr(test, mockall::automock)]
pub trait BulkEditHandler {
    fn on_price_commit(&mut self, new_price: f64);
    fn on_minimum_stay_commit(&mut self, new_value: Option<u32>);
}

/// Precondition violations raised by the editing controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditingError {
    #[error("date {0} is not part of the current selection")]
    DateNotSelected(NaiveDate),

    #[error("no editing session is active")]
    NoActiveSession,
}

/// Value handed to the bulk handler on a successful commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommittedValue {
    Price(f64),
    MinimumStay(Option<u32>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    Applied(CommittedValue),
    /// Input was invalid; nothing was applied but the session closed anyway.
    Discarded,
}

/// Parse a price as typed by the user. Accepts a decimal comma but not
/// digit grouping.
pub fn parse_price(input: &str) -> Option<f64> {
    parse_decimal(input).filter(|price| *price >= 0.0)
}

/// Parse a minimum-stay input. Empty input clears the constraint
/// (`Some(None)`); a positive integer sets it; anything else is invalid.
pub fn parse_minimum_stay(input: &str) -> Option<Option<u32>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }
    input
        .parse::<u32>()
        .ok()
        .filter(|nights| *nights > 0)
        .map(Some)
}

/// Text an opening price edit starts with: the projected price rounded to
/// the nearest integer, or nothing.
pub fn seed_price_text(price: Option<f64>) -> String {
    price
        .filter(|p| p.is_finite())
        .map(|p| format!("{}", p.round() as i64))
        .unwrap_or_default()
}

pub fn seed_minimum_stay_text(minimum_stay: Option<u32>) -> String {
    minimum_stay
        .filter(|nights| *nights > 0)
        .map(|nights| nights.to_string())
        .unwrap_or_default()
}

/// At most one edit is open. Opening one kind closes the other and drops
/// its input.
#[derive(Debug, Default)]
pub struct CellEditingController {
    session: Option<EditingSession>,
}

impl CellEditingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditingSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_editing(&self, kind: EditKind, accommodation_id: i64, date: NaiveDate) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.targets(kind, accommodation_id, date))
    }

    /// Open a price edit on a selected cell, seeded from `cell`'s price for
    /// `rate_type_id`.
    pub fn start_price_edit(
        &mut self,
        accommodation_id: i64,
        date: NaiveDate,
        selection: &SelectionSet,
        cell: Option<&DailyProjection>,
        rate_type_id: Option<i64>,
    ) -> Result<&EditingSession, EditingError> {
        let price = cell.zip(rate_type_id).and_then(|(cell, id)| cell.price_for(id));
        self.open(
            EditKind::Price,
            accommodation_id,
            date,
            selection,
            seed_price_text(price),
        )
    }

    /// Open a minimum-stay edit on a selected cell.
    pub fn start_minimum_stay_edit(
        &mut self,
        accommodation_id: i64,
        date: NaiveDate,
        selection: &SelectionSet,
        cell: Option<&DailyProjection>,
    ) -> Result<&EditingSession, EditingError> {
        let current = cell.and_then(|cell| cell.minimum_stay);
        self.open(
            EditKind::MinimumStay,
            accommodation_id,
            date,
            selection,
            seed_minimum_stay_text(current),
        )
    }

    fn open(
        &mut self,
        kind: EditKind,
        accommodation_id: i64,
        date: NaiveDate,
        selection: &SelectionSet,
        seed: String,
    ) -> Result<&EditingSession, EditingError> {
        if !selection.contains(date) {
            return Err(EditingError::DateNotSelected(date));
        }

        if let Some(previous) = self.session.take() {
            log::debug!(
                "Closing {:?} edit on {} to open {:?} edit",
                previous.kind(),
                previous.date(),
                kind
            );
        }

        Ok(&*self
            .session
            .insert(EditingSession::new(kind, accommodation_id, date, seed)))
    }

    pub fn set_input(&mut self, text: impl Into<String>) -> Result<(), EditingError> {
        let session = self.session.as_mut().ok_or(EditingError::NoActiveSession)?;
        *session.raw_input_mut() = text.into();
        Ok(())
    }

    /// Commit the active session. The session closes whether or not the input
    /// was valid; invalid input invokes no callback.
    pub fn commit(&mut self, handler: &mut dyn BulkEditHandler) -> Result<CommitOutcome, EditingError> {
        let session = self.session.take().ok_or(EditingError::NoActiveSession)?;

        let outcome = match session.kind() {
            EditKind::Price => match parse_price(session.raw_input()) {
                Some(price) => {
                    handler.on_price_commit(price);
                    CommitOutcome::Applied(CommittedValue::Price(price))
                }
                None => CommitOutcome::Discarded,
            },
            EditKind::MinimumStay => match parse_minimum_stay(session.raw_input()) {
                Some(value) => {
                    handler.on_minimum_stay_commit(value);
                    CommitOutcome::Applied(CommittedValue::MinimumStay(value))
                }
                None => CommitOutcome::Discarded,
            },
        };

        if outcome == CommitOutcome::Discarded {
            log::info!(
                "Discarded invalid {:?} input '{}' for {}",
                session.kind(),
                session.raw_input(),
                session.date()
            );
        }
        Ok(outcome)
    }

    /// Focus leaving the input commits it.
    pub fn focus_lost(&mut self, handler: &mut dyn BulkEditHandler) -> Result<CommitOutcome, EditingError> {
        self.commit(handler)
    }

    /// Close the session without applying anything. Returns the discarded
    /// session, if there was one.
    pub fn cancel(&mut self) -> Option<EditingSession> {
        self.session.take()
    }
}
