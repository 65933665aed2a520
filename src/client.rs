//! Calculation client
//!
//! Thin HTTP wrapper around `POST /api/calc`. One request/response cycle per
//! call, no retries. At most one calculation may be pending per client (and
//! its clones): a submit issued while another is in flight is refused with
//! [`EstimatorError::SubmitInFlight`] before anything is sent.

use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{EstimatorError, Result};
use crate::models::{CalculationRequest, CalculationResult};

/// HTTP client for the pricing backend
#[derive(Clone)]
pub struct CalculationClient {
    client: Client,
    url: String,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the submission ends, however it ends
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CalculationClient {
    /// Create a client for the given endpoint URL
    ///
    /// # Arguments
    /// * `url` - Full URL of the calculation endpoint (e.g. "http://localhost:5000/api/calc")
    /// * `timeout` - Optional request timeout; `None` waits indefinitely
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url,
            in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a submission is currently pending
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit rows for pricing
    ///
    /// # Errors
    /// Returns an error if:
    /// - Another submission is still pending
    /// - Network request fails
    /// - Response status is not successful (2xx)
    /// - Response body is not a calculation result
    pub async fn submit(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Calculation already in progress, ignoring submit");
            return Err(EstimatorError::SubmitInFlight);
        };

        tracing::info!(
            url = %self.url,
            resources = request.resources.len(),
            "Submitting calculation"
        );

        let result = self.send(request).await;
        match &result {
            Ok(result) => tracing::info!(
                items = result.items.len(),
                has_summary = result.ai_summary.is_some(),
                "Calculation completed"
            ),
            Err(e) => tracing::warn!(error = %e, kind = e.kind(), "Calculation failed"),
        }
        result
    }

    async fn send(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EstimatorError::UpstreamStatus { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
