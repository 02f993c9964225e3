//! Caller side of the advice boundary: guard, invoke, log, map failures.

use saldo_core::Transaction;

use crate::error::AdviceError;
use crate::gateway::AdviceGateway;
use crate::request::{AdviceRequest, AdviceResponse, DEFAULT_TIME_PERIOD};

#[derive(Debug)]
pub struct Advisor<G> {
    gateway: G,
    time_period: String,
}

impl<G: AdviceGateway> Advisor<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            time_period: DEFAULT_TIME_PERIOD.to_string(),
        }
    }

    pub fn with_time_period(mut self, label: impl Into<String>) -> Self {
        self.time_period = label.into();
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Build and check the request without touching the gateway.
    pub fn prepare(
        &self,
        transactions: &[Transaction],
        goals: &str,
    ) -> Result<AdviceRequest, AdviceError> {
        AdviceRequest::from_transactions(transactions, goals, &self.time_period)
            .inspect_err(|e| tracing::info!(error = %e, "advice request rejected"))
    }

    /// Send an already checked request. No retries.
    pub async fn submit(&self, request: AdviceRequest) -> Result<AdviceResponse, AdviceError> {
        match self.gateway.get_advice(&request).await {
            Ok(advice) => {
                tracing::info!(suggestions = advice.suggestions.len(), "advice received");
                Ok(advice)
            }
            Err(e) => {
                tracing::warn!(error = %e, "advice gateway failed");
                Err(AdviceError::Gateway(e))
            }
        }
    }

    /// Ask for advice on `transactions`, which should be the full set.
    ///
    /// The request is built from the slice up front, so callers that spawn
    /// [`Advisor::submit`] on their own keep the store free while it runs.
    /// The gateway is not called when the guard in
    /// [`AdviceRequest::from_transactions`] rejects the input.
    pub async fn advise(
        &self,
        transactions: &[Transaction],
        goals: &str,
    ) -> Result<AdviceResponse, AdviceError> {
        let request = self.prepare(transactions, goals)?;
        self.submit(request).await
    }
}
