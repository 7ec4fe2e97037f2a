// Supplier data loading
// Fetches per-supplier payloads, normalizes and projects them

pub mod fetcher;
pub mod orchestrator;
pub mod workspace;

use std::future::Future;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::settings::SupplierConfig;
use crate::utils::date::DateSpan;

pub use fetcher::HttpSupplierSource;
pub use orchestrator::{LoadOutcome, LoadReport, RefreshTicket, SupplierDataOrchestrator, SupplierWarning};
pub use workspace::{GridWorkspace, SupplierContext};

/// Raw payload returned by a supplier. Unit, period and rate-type records
/// stay loosely typed until normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupplierPayload {
    #[serde(alias = "accommodations")]
    pub units: Vec<Value>,
    #[serde(alias = "ratePeriods", alias = "rates")]
    pub periods: Vec<Value>,
    #[serde(alias = "linkedRateTypes")]
    pub linked_rate_types: Vec<Value>,
}

#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("supplier responded with HTTP status {0}")]
    Status(u16),

    #[error("response too large ({size} bytes > {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
}

/// Source of supplier payloads.
pub trait SupplierSource {
    fn fetch(
        &self,
        supplier: &SupplierConfig,
        window: DateSpan,
    ) -> impl Future<Output = Result<SupplierPayload, SupplierError>> + Send;
}
