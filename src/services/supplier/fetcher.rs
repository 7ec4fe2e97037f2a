use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};

use super::{SupplierError, SupplierPayload, SupplierSource};
use crate::models::settings::SupplierConfig;
use crate::utils::date::{format_iso, DateSpan};

/// Fetches supplier payloads over HTTP as JSON. The requested window is sent
/// as `from`/`to` query parameters.
pub struct HttpSupplierSource {
    client: Client,
    max_response_bytes: usize,
}

impl HttpSupplierSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build supplier HTTP client")?;

        Ok(Self {
            client,
            max_response_bytes: 20 * 1024 * 1024,
        })
    }

    fn redact_endpoint(endpoint: &str) -> String {
        match endpoint.split_once('?') {
            Some((base, _)) => format!("{}?***redacted***", base),
            None => endpoint.to_string(),
        }
    }
}

impl SupplierSource for HttpSupplierSource {
    fn fetch(
        &self,
        supplier: &SupplierConfig,
        window: DateSpan,
    ) -> impl Future<Output = Result<SupplierPayload, SupplierError>> + Send {
        let endpoint = supplier.endpoint.clone();
        let request = self.client.get(&supplier.endpoint).query(&[
            ("from", format_iso(window.start)),
            ("to", format_iso(window.end)),
        ]);
        let limit = self.max_response_bytes;

        async move {
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(SupplierError::InvalidEndpoint(endpoint));
            }

            log::debug!("Fetching supplier data from {}", Self::redact_endpoint(&endpoint));
            let response = request.send().await?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(SupplierError::Status(status.as_u16()));
            }

            if let Some(length) = response.content_length() {
                if length as usize > limit {
                    return Err(SupplierError::TooLarge {
                        size: length as usize,
                        limit,
                    });
                }
            }

            let bytes = response.bytes().await?;
            if bytes.len() > limit {
                return Err(SupplierError::TooLarge {
                    size: bytes.len(),
                    limit,
                });
            }

            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}
