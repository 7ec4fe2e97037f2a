// Rate models
// Rate types and interval rate periods

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date::DateSpan;

/// Occupant count whose price is preferred when a period lists several.
pub const DEFAULT_PREFERRED_OCCUPANCY: u32 = 2;

/// A named pricing category discovered from rate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateType {
    pub id: i64,
    pub label: String,
    /// Explicit display order. `None` sorts after every ordered entry.
    pub order: Option<i32>,
}

impl RateType {
    pub fn new(id: i64, label: impl Into<String>, order: Option<i32>) -> Self {
        Self {
            id,
            label: label.into(),
            order,
        }
    }

    /// Label generated when no record carried a usable name.
    pub fn placeholder_label(id: i64) -> String {
        format!("Type {}", id)
    }

    pub fn has_placeholder_label(&self) -> bool {
        is_placeholder_label(&self.label, self.id)
    }
}

/// True when `label` is empty or the generated `Type <id>` text.
pub fn is_placeholder_label(label: &str, id: i64) -> bool {
    let label = label.trim();
    label.is_empty() || label == RateType::placeholder_label(id)
}

/// Entry from an explicit "linked rate types" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTypeLink {
    pub id: i64,
    pub label: Option<String>,
    pub order: Option<i32>,
}

/// Price for a given number of occupants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyPrice {
    pub occupant_count: u32,
    pub price: Option<f64>,
}

impl OccupancyPrice {
    pub fn new(occupant_count: u32, price: f64) -> Self {
        Self {
            occupant_count,
            price: Some(price),
        }
    }
}

/// Interval-valued rate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePeriod {
    pub accommodation_id: i64,
    pub rate_type_id: Option<i64>,
    pub start_date: NaiveDate,
    /// Inclusive. May lie outside the projection window.
    pub end_date: NaiveDate,
    pub occupancy_prices: Vec<OccupancyPrice>,
    pub flat_price: Option<f64>,
    /// Positive number of nights, `None` when the period sets no constraint.
    pub minimum_stay: Option<u32>,
    pub has_promotion: bool,
    /// Richest human label the source supplied for the rate type.
    pub label: Option<String>,
}

impl RatePeriod {
    pub fn new(accommodation_id: i64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            accommodation_id,
            rate_type_id: None,
            start_date,
            end_date,
            occupancy_prices: Vec::new(),
            flat_price: None,
            minimum_stay: None,
            has_promotion: false,
            label: None,
        }
    }

    pub fn with_rate_type(mut self, rate_type_id: i64) -> Self {
        self.rate_type_id = Some(rate_type_id);
        self
    }

    pub fn with_flat_price(mut self, price: f64) -> Self {
        self.flat_price = Some(price);
        self
    }

    pub fn with_occupancy_price(mut self, occupant_count: u32, price: f64) -> Self {
        self.occupancy_prices
            .push(OccupancyPrice::new(occupant_count, price));
        self
    }

    /// Zero is treated as "no constraint".
    pub fn with_minimum_stay(mut self, nights: u32) -> Self {
        self.minimum_stay = (nights > 0).then_some(nights);
        self
    }

    pub fn with_promotion(mut self, has_promotion: bool) -> Self {
        self.has_promotion = has_promotion;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The covered span, `None` for an inverted record.
    pub fn span(&self) -> Option<DateSpan> {
        DateSpan::new(self.start_date, self.end_date)
    }

    /// Resolve the single price this period contributes.
    ///
    /// Preference order: the price for `preferred_occupancy` occupants, then
    /// the first occupancy entry carrying a price, then the flat price.
    /// Non-finite values never resolve.
    pub fn resolved_price(&self, preferred_occupancy: u32) -> Option<f64> {
        let usable = |price: Option<f64>| price.filter(|p| p.is_finite());

        if !self.occupancy_prices.is_empty() {
            let preferred = self
                .occupancy_prices
                .iter()
                .filter(|entry| entry.occupant_count == preferred_occupancy)
                .find_map(|entry| usable(entry.price));
            if let Some(price) = preferred {
                return Some(price);
            }
            if let Some(price) = self
                .occupancy_prices
                .iter()
                .find_map(|entry| usable(entry.price))
            {
                return Some(price);
            }
        }

        usable(self.flat_price)
    }

    /// Label appended to the day's label list: the supplied label, or the
    /// placeholder for the rate type when no label was supplied.
    pub fn resolved_label(&self) -> Option<String> {
        match (&self.label, self.rate_type_id) {
            (Some(label), _) if !label.trim().is_empty() => Some(label.trim().to_string()),
            (_, Some(id)) => Some(RateType::placeholder_label(id)),
            _ => None,
        }
    }
}
