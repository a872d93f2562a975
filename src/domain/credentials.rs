use {
    super::error::GatewayError,
    base64::{Engine, engine::general_purpose::STANDARD},
    std::fmt,
};

/// Provider client credentials. Supplied by configuration, never persisted.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Both halves must be present and non-empty; the error names which
    /// setting is missing without echoing anything it holds.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self, GatewayError> {
        let client_id = non_empty(client_id)
            .ok_or_else(|| GatewayError::Configuration("PAYPAL_CLIENT_ID is not set".into()))?;
        let client_secret = non_empty(client_secret)
            .ok_or_else(|| GatewayError::Configuration("PAYPAL_CLIENT_SECRET is not set".into()))?;
        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `Basic base64(id:secret)`, ready for the `Authorization` header.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// Short, log-safe form of the client id.
    pub fn masked_client_id(&self) -> String {
        let prefix: String = self.client_id.chars().take(4).collect();
        format!("{prefix}…")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.masked_client_id())
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
