// Rate record normalization
// Converts loosely shaped supplier records into strict models, one record at a time

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::accommodation::AccommodationUnit;
use crate::models::rate::{OccupancyPrice, RatePeriod, RateTypeLink};
use crate::utils::date::parse_iso;
use crate::utils::number::parse_decimal;

/// Reasons a raw record is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("record is not an object: {0}")]
    Malformed(String),

    #[error("missing accommodation id")]
    MissingAccommodation,

    #[error("missing {0}")]
    MissingDate(&'static str),

    #[error("unparsable {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
}

/// A rejected record and its position in the source listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: NormalizeError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecords {
    pub periods: Vec<RatePeriod>,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedUnits {
    pub units: Vec<AccommodationUnit>,
    pub skipped: Vec<SkippedRecord>,
}

/// Accommodation unit as received from a supplier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAccommodationUnit {
    #[serde(alias = "accommodationId", alias = "unitId", alias = "unit_id")]
    pub id: Option<Value>,
    #[serde(alias = "displayName", alias = "display_name", alias = "title")]
    pub name: Option<String>,
}

impl RawAccommodationUnit {
    /// A unit needs an id; a missing name falls back to the row label.
    pub fn normalize(&self) -> Result<AccommodationUnit, NormalizeError> {
        let id = self
            .id
            .as_ref()
            .and_then(value_as_i64)
            .ok_or(NormalizeError::MissingAccommodation)?;
        Ok(AccommodationUnit::new(id, self.name.as_deref().unwrap_or("").trim()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOccupancyPrice {
    #[serde(alias = "occupantCount", alias = "occupants", alias = "persons", alias = "occupancy")]
    pub occupant_count: Option<Value>,
    #[serde(alias = "amount", alias = "value")]
    pub price: Option<Value>,
}

/// Rate period as received from a supplier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRatePeriod {
    #[serde(alias = "accommodationId", alias = "unitId", alias = "unit_id")]
    pub accommodation_id: Option<Value>,
    #[serde(alias = "rateTypeId", alias = "rateId", alias = "rate_id")]
    pub rate_type_id: Option<Value>,
    #[serde(alias = "startDate", alias = "dateFrom", alias = "from")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate", alias = "dateTo", alias = "to", alias = "until")]
    pub end_date: Option<String>,
    #[serde(alias = "occupancyPrices", alias = "prices")]
    pub occupancy_prices: Option<Vec<RawOccupancyPrice>>,
    #[serde(alias = "flatPrice", alias = "price", alias = "basePrice")]
    pub flat_price: Option<Value>,
    #[serde(alias = "minimumStay", alias = "minStay", alias = "min_stay", alias = "minNights")]
    pub minimum_stay: Option<Value>,
    #[serde(alias = "hasPromotion", alias = "promotion", alias = "isPromotion")]
    pub has_promotion: Option<Value>,
    #[serde(alias = "localizedLabel", alias = "rateTypeLabel", alias = "label")]
    pub localized_label: Option<String>,
    #[serde(alias = "rateTypeName", alias = "name")]
    pub rate_type_name: Option<String>,
    #[serde(alias = "rateTypeCode", alias = "code")]
    pub rate_type_code: Option<String>,
}

/// Linked rate type as received from a supplier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRateTypeLink {
    #[serde(alias = "rateTypeId", alias = "rate_type_id")]
    pub id: Option<Value>,
    #[serde(alias = "localizedLabel", alias = "label")]
    pub localized_label: Option<String>,
    #[serde(alias = "rateTypeName")]
    pub name: Option<String>,
    #[serde(alias = "rateTypeCode")]
    pub code: Option<String>,
    #[serde(alias = "sortOrder", alias = "position")]
    pub order: Option<Value>,
}

impl RawRatePeriod {
    /// Richest label available: localized text, then name, then code.
    pub fn resolved_label(&self) -> Option<String> {
        richest_label([
            self.localized_label.as_deref(),
            self.rate_type_name.as_deref(),
            self.rate_type_code.as_deref(),
        ])
    }

    pub fn normalize(&self) -> Result<RatePeriod, NormalizeError> {
        let accommodation_id = self
            .accommodation_id
            .as_ref()
            .and_then(value_as_i64)
            .ok_or(NormalizeError::MissingAccommodation)?;

        let start_date = required_date(self.start_date.as_deref(), "start date")?;
        let end_date = required_date(self.end_date.as_deref(), "end date")?;
        if start_date > end_date {
            return Err(NormalizeError::InvertedRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        let occupancy_prices = self
            .occupancy_prices
            .iter()
            .flatten()
            .filter_map(|entry| {
                let occupant_count = entry.occupant_count.as_ref().and_then(value_as_i64)?;
                Some(OccupancyPrice {
                    occupant_count: u32::try_from(occupant_count).ok()?,
                    price: entry.price.as_ref().and_then(value_as_f64),
                })
            })
            .collect();

        let minimum_stay = self
            .minimum_stay
            .as_ref()
            .and_then(value_as_i64)
            .and_then(|nights| u32::try_from(nights).ok())
            .filter(|nights| *nights > 0);

        Ok(RatePeriod {
            accommodation_id,
            rate_type_id: self.rate_type_id.as_ref().and_then(value_as_i64),
            start_date,
            end_date,
            occupancy_prices,
            flat_price: self.flat_price.as_ref().and_then(value_as_f64),
            minimum_stay,
            has_promotion: self.has_promotion.as_ref().map(value_as_bool).unwrap_or(false),
            label: self.resolved_label(),
        })
    }
}

impl RawRateTypeLink {
    pub fn normalize(&self) -> Option<RateTypeLink> {
        let id = self.id.as_ref().and_then(value_as_i64)?;
        Some(RateTypeLink {
            id,
            label: richest_label([
                self.localized_label.as_deref(),
                self.name.as_deref(),
                self.code.as_deref(),
            ]),
            order: self
                .order
                .as_ref()
                .and_then(value_as_i64)
                .and_then(|order| i32::try_from(order).ok()),
        })
    }
}

/// Normalize a listing of raw period records, keeping input order.
pub fn normalize_periods(records: &[Value]) -> NormalizedRecords {
    let mut result = NormalizedRecords::default();

    for (index, record) in records.iter().enumerate() {
        let normalized = RawRatePeriod::deserialize(record)
            .map_err(|err| NormalizeError::Malformed(err.to_string()))
            .and_then(|raw| raw.normalize());

        match normalized {
            Ok(period) => result.periods.push(period),
            Err(reason) => {
                log::warn!("Skipping rate record #{}: {}", index, reason);
                result.skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    result
}

/// Normalize a listing of raw accommodation units, keeping input order.
pub fn normalize_units(records: &[Value]) -> NormalizedUnits {
    let mut result = NormalizedUnits::default();

    for (index, record) in records.iter().enumerate() {
        let normalized = RawAccommodationUnit::deserialize(record)
            .map_err(|err| NormalizeError::Malformed(err.to_string()))
            .and_then(|raw| raw.normalize());

        match normalized {
            Ok(unit) => result.units.push(unit),
            Err(reason) => {
                log::warn!("Skipping accommodation unit #{}: {}", index, reason);
                result.skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    result
}

/// Normalize a linked rate-type listing. Entries without an id are dropped.
pub fn normalize_rate_type_links(records: &[Value]) -> Vec<RateTypeLink> {
    records
        .iter()
        .filter_map(|record| match RawRateTypeLink::deserialize(record) {
            Ok(raw) => raw.normalize(),
            Err(err) => {
                log::warn!("Skipping linked rate type: {}", err);
                None
            }
        })
        .collect()
}

fn richest_label<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|label| !label.is_empty())
        .map(str::to_string)
}

fn required_date(
    value: Option<&str>,
    field: &'static str,
) -> Result<chrono::NaiveDate, NormalizeError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(NormalizeError::MissingDate(field))?;
    parse_iso(value).ok_or_else(|| NormalizeError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    };
    number.filter(|n: &f64| n.is_finite())
}

fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}
