use {
    super::error::GatewayError,
    derive_more::Display,
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

pub const MISSING_ORDER_ID: &str = "Missing orderId";

/// Provider order identifier, as handed back to us by the client.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: Option<String>) -> Result<Self, GatewayError> {
        let id = id.map(|v| v.trim().to_string()).unwrap_or_default();
        if id.is_empty() {
            return Err(GatewayError::Validation(MISSING_ORDER_ID.into()));
        }
        // ends up as a single path segment in the capture URL
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(GatewayError::Validation(format!(
                "orderId contains invalid characters: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Value sent as `PayPal-Request-Id` so the provider can collapse retries
/// of one capture intent into a single settlement.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Caller-supplied key. Blank keys are ignored so a fresh one is generated.
    pub fn from_caller(key: Option<&str>) -> Result<Option<Self>, GatewayError> {
        let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        if key.len() > 108 || !key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(GatewayError::Validation(
                "idempotencyKey must be at most 108 printable ASCII characters".into(),
            ));
        }
        Ok(Some(Self(key.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Settlement result, passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub status_code: u16,
    pub body: serde_json::Value,
}

impl CaptureResult {
    pub fn from_response(status_code: u16, body: &str) -> Self {
        let body = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
        Self { status_code, body }
    }

    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(|v| v.as_str())
    }
}
