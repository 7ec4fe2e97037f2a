// Edit session model
// The single inline edit a grid can have open

use chrono::NaiveDate;

/// Which value an edit session targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Price,
    MinimumStay,
}

/// The single active inline edit of a grid. Price and minimum-stay edits are
/// variants of one type, so at most one can exist at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditingSession {
    Price {
        accommodation_id: i64,
        date: NaiveDate,
        raw_input: String,
    },
    MinimumStay {
        accommodation_id: i64,
        date: NaiveDate,
        raw_input: String,
    },
}

impl EditingSession {
    pub fn new(kind: EditKind, accommodation_id: i64, date: NaiveDate, raw_input: String) -> Self {
        match kind {
            EditKind::Price => Self::Price {
                accommodation_id,
                date,
                raw_input,
            },
            EditKind::MinimumStay => Self::MinimumStay {
                accommodation_id,
                date,
                raw_input,
            },
        }
    }

    pub fn kind(&self) -> EditKind {
        match self {
            Self::Price { .. } => EditKind::Price,
            Self::MinimumStay { .. } => EditKind::MinimumStay,
        }
    }

    pub fn accommodation_id(&self) -> i64 {
        match self {
            Self::Price {
                accommodation_id, ..
            }
            | Self::MinimumStay {
                accommodation_id, ..
            } => *accommodation_id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Price { date, .. } | Self::MinimumStay { date, .. } => *date,
        }
    }

    pub fn raw_input(&self) -> &str {
        match self {
            Self::Price { raw_input, .. } | Self::MinimumStay { raw_input, .. } => raw_input,
        }
    }

    pub fn raw_input_mut(&mut self) -> &mut String {
        match self {
            Self::Price { raw_input, .. } | Self::MinimumStay { raw_input, .. } => raw_input,
        }
    }

    /// True when this session edits the given cell with the given kind.
    pub fn targets(&self, kind: EditKind, accommodation_id: i64, date: NaiveDate) -> bool {
        self.kind() == kind && self.accommodation_id() == accommodation_id && self.date() == date
    }
}
