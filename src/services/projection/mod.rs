// Interval projection service
// Flattens interval rate records into a per-day grid

pub mod catalog;

use std::collections::{BTreeMap, HashMap};

use crate::models::projection::{DailyGrid, DailyProjection, Projection, MAX_LABELS_PER_DAY};
use crate::models::rate::{RatePeriod, RateTypeLink, DEFAULT_PREFERRED_OCCUPANCY};
use crate::models::settings::GridSettings;
use crate::utils::date::DateSpan;

pub use catalog::RateTypeCatalogBuilder;

/// Projects interval rate records onto individual days.
///
/// Records are applied in input order. For the same day and rate type the
/// last record wins; promotion flags accumulate with OR; minimum stays
/// accumulate as the maximum; labels are kept first-seen, up to a cap.
#[derive(Debug, Clone)]
pub struct IntervalProjector {
    preferred_occupancy: u32,
    max_labels_per_day: usize,
}

impl Default for IntervalProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalProjector {
    pub fn new() -> Self {
        Self {
            preferred_occupancy: DEFAULT_PREFERRED_OCCUPANCY,
            max_labels_per_day: MAX_LABELS_PER_DAY,
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            preferred_occupancy: settings.preferred_occupancy,
            max_labels_per_day: settings.max_labels_per_day,
        }
    }

    pub fn project(&self, periods: &[RatePeriod], window: DateSpan) -> Projection {
        self.project_with_links(periods, &[], window)
    }

    /// Project `periods` over `window`, seeding the rate-type catalog with an
    /// explicit linked rate-type listing.
    pub fn project_with_links(
        &self,
        periods: &[RatePeriod],
        links: &[RateTypeLink],
        window: DateSpan,
    ) -> Projection {
        let mut projection = Projection::empty(window);
        let mut catalog = RateTypeCatalogBuilder::new();

        for link in links {
            catalog.admit(link.id, link.label.as_deref(), link.order);
        }
        for period in periods {
            if let Some(rate_type_id) = period.rate_type_id {
                catalog.admit(rate_type_id, period.label.as_deref(), None);
            }
        }
        projection.rate_type_catalog = catalog.finish();

        // A rate type shows up in the day labels once, under its catalog label.
        let catalog_labels: HashMap<i64, &str> = projection
            .rate_type_catalog
            .iter()
            .map(|rate_type| (rate_type.id, rate_type.label.as_str()))
            .collect();

        let mut daily = BTreeMap::new();
        let mut applied = 0usize;
        for period in periods {
            let Some(span) = period.span() else {
                log::warn!(
                    "Skipping rate period for accommodation {}: start {} after end {}",
                    period.accommodation_id,
                    period.start_date,
                    period.end_date
                );
                continue;
            };
            let Some(clipped) = span.intersect(&window) else {
                continue;
            };

            let label = match period.rate_type_id {
                Some(id) => catalog_labels.get(&id).map(|label| label.to_string()),
                None => period.resolved_label(),
            };
            let grid: &mut DailyGrid = daily.entry(period.accommodation_id).or_default();
            self.apply_period(grid, period, clipped, label);
            applied += 1;
        }
        projection.daily = daily;
        log::debug!(
            "Projected {} of {} rate periods over {}..{} ({} rate types)",
            applied,
            periods.len(),
            window.start,
            window.end,
            projection.rate_type_catalog.len()
        );
        projection
    }

    fn apply_period(
        &self,
        grid: &mut DailyGrid,
        period: &RatePeriod,
        clipped: DateSpan,
        label: Option<String>,
    ) {
        let price = period
            .rate_type_id
            .zip(period.resolved_price(self.preferred_occupancy));
        let minimum_stay = period.minimum_stay.filter(|nights| *nights > 0);

        for day in clipped.days() {
            let cell = grid.entry(day).or_insert_with(DailyProjection::default);

            if let Some((rate_type_id, price)) = price {
                cell.price_by_rate_type.insert(rate_type_id, price);
            }

            if period.has_promotion {
                cell.has_promotion = true;
            }

            if let Some(label) = &label {
                if cell.rate_type_labels.len() < self.max_labels_per_day
                    && !cell.rate_type_labels.contains(label)
                {
                    cell.rate_type_labels.push(label.clone());
                }
            }

            if let Some(nights) = minimum_stay {
                cell.minimum_stay = Some(cell.minimum_stay.map_or(nights, |current| current.max(nights)));
            }
        }
    }
}
