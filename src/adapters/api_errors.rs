use crate::domain::error::GatewayError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Newtype so the domain error can be turned into an axum response.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

/// Failure half of the response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Configuration(_)
            | GatewayError::UpstreamAuth { .. }
            | GatewayError::UpstreamOrder { .. }
            | GatewayError::UpstreamCapture { .. }
            | GatewayError::Protocol { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let code = self.0.kind();
        match &self.0 {
            GatewayError::Validation(msg) => ErrorBody::new(msg.clone(), code),
            GatewayError::Configuration(missing) => {
                ErrorBody::new("Missing PayPal credentials on server", code)
                    .with_details(serde_json::Value::String(missing.clone()))
            }
            GatewayError::UpstreamAuth { body, .. } => {
                ErrorBody::new("Failed to get access token", code).with_details(raw_details(body))
            }
            GatewayError::UpstreamOrder { body, .. } => {
                ErrorBody::new("Failed to create PayPal order", code)
                    .with_details(raw_details(body))
            }
            GatewayError::UpstreamCapture { body, .. } => {
                ErrorBody::new("Failed to capture order", code).with_details(raw_details(body))
            }
            GatewayError::Protocol { message, body } => {
                ErrorBody::new(message.clone(), code).with_details(raw_details(body))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            GatewayError::Validation(msg) => tracing::warn!("rejected request: {msg}"),
            other => tracing::error!(code = other.kind(), "request failed: {other}"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

/// Provider bodies are usually JSON; keep them structured when they are.
fn raw_details(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}
