//! The advice boundary as a trait, plus a canned implementation for tests
//! and offline runs.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::GatewayError;
use crate::request::{AdviceRequest, AdviceResponse};

/// Remote text generation with a fixed request/response schema.
pub trait AdviceGateway: Send + Sync {
    fn get_advice(
        &self,
        request: &AdviceRequest,
    ) -> impl Future<Output = Result<AdviceResponse, GatewayError>> + Send;
}

/// Answers every request with the same result and remembers what it saw.
#[derive(Debug)]
pub struct CannedGateway {
    reply: Result<AdviceResponse, GatewayError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<AdviceRequest>>,
}

impl CannedGateway {
    pub fn replying(response: AdviceResponse) -> Self {
        Self::with_reply(Ok(response))
    }

    pub fn failing(error: GatewayError) -> Self {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: Result<AdviceResponse, GatewayError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<AdviceRequest> {
        self.last_request
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl AdviceGateway for CannedGateway {
    async fn get_advice(&self, request: &AdviceRequest) -> Result<AdviceResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        self.reply.clone()
    }
}
