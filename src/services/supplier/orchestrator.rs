use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use super::workspace::SupplierContext;
use super::{SupplierPayload, SupplierSource};
use crate::models::settings::SupplierConfig;
use crate::services::normalize::{normalize_periods, normalize_rate_type_links, normalize_units};
use crate::services::projection::IntervalProjector;
use crate::utils::date::DateSpan;

/// Handle for one refresh. Starting a newer refresh cancels it.
#[derive(Debug, Clone)]
pub struct RefreshTicket {
    generation: u64,
    token: CancellationToken,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn cancelled_outcome(&self) -> LoadOutcome {
        LoadOutcome::Cancelled {
            generation: self.generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierWarning {
    pub supplier_id: i64,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub generation: u64,
    pub window: DateSpan,
    pub contexts: Vec<SupplierContext>,
    pub warnings: Vec<SupplierWarning>,
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Completed(LoadReport),
    /// A newer refresh started or the load was cancelled explicitly.
    Cancelled { generation: u64 },
}

/// Loads every configured supplier in turn and projects its rate periods.
///
/// Each call to [`begin_refresh`](Self::begin_refresh) cancels the refresh
/// before it, so at most one load produces results that are still current.
pub struct SupplierDataOrchestrator<S> {
    source: S,
    projector: IntervalProjector,
    generation: AtomicU64,
    active: Mutex<Option<CancellationToken>>,
}

impl<S: SupplierSource> SupplierDataOrchestrator<S> {
    pub fn new(source: S, projector: IntervalProjector) -> Self {
        Self {
            source,
            projector,
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        let token = CancellationToken::new();
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = active.replace(token.clone()) {
            previous.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Starting supplier refresh {}", generation);

        RefreshTicket { generation, token }
    }

    /// Cancel the refresh in flight, if any.
    pub fn cancel(&self) {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(token) = active.take() {
            token.cancel();
        }
    }

    pub async fn load(
        &self,
        ticket: &RefreshTicket,
        suppliers: &[SupplierConfig],
        window: DateSpan,
    ) -> LoadOutcome {
        let mut contexts = Vec::with_capacity(suppliers.len());
        let mut warnings = Vec::new();

        for supplier in suppliers {
            if ticket.is_cancelled() {
                return ticket.cancelled_outcome();
            }

            let result = tokio::select! {
                _ = ticket.token.cancelled() => return ticket.cancelled_outcome(),
                result = self.source.fetch(supplier, window) => result,
            };

            match result {
                Ok(payload) => contexts.push(self.build_context(supplier, payload, window)),
                Err(err) => {
                    log::warn!("Failed to load supplier '{}' ({}): {}", supplier.name, supplier.id, err);
                    warnings.push(SupplierWarning {
                        supplier_id: supplier.id,
                        message: err.to_string(),
                    });
                }
            }
        }

        if ticket.is_cancelled() {
            return ticket.cancelled_outcome();
        }

        log::info!(
            "Supplier refresh {} loaded {} of {} suppliers",
            ticket.generation,
            contexts.len(),
            suppliers.len()
        );
        LoadOutcome::Completed(LoadReport {
            generation: ticket.generation,
            window,
            contexts,
            warnings,
        })
    }

    fn build_context(
        &self,
        supplier: &SupplierConfig,
        payload: SupplierPayload,
        window: DateSpan,
    ) -> SupplierContext {
        let units = normalize_units(&payload.units);
        let normalized = normalize_periods(&payload.periods);
        let links = normalize_rate_type_links(&payload.linked_rate_types);
        let projection = self
            .projector
            .project_with_links(&normalized.periods, &links, window);

        let skipped = units.skipped.len() + normalized.skipped.len();
        if skipped > 0 {
            log::warn!(
                "Supplier '{}' sent {} unusable units and {} unusable rate periods",
                supplier.name,
                units.skipped.len(),
                normalized.skipped.len()
            );
        }

        SupplierContext::new(supplier.id, supplier.name.clone(), units.units, projection, skipped)
    }
}
