use {
    std::{future::Future, pin::Pin, time::Duration},
    thiserror::Error,
};

/// One outbound POST to the provider.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub authorization: String,
    pub body: OutboundBody,
    pub idempotency_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    /// `application/x-www-form-urlencoded`
    Form(String),
    Json(serde_json::Value),
}

/// Status and body as received; classification is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The call never produced a response (connect failure, timeout, ...).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

pub trait ProviderTransport: Send + Sync {
    fn post(
        &self,
        request: OutboundRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>>;
}
