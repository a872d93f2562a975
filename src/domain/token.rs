use {
    super::error::GatewayError,
    serde::Deserialize,
    std::fmt,
};

/// Bearer token for one request (or one cache lifetime when caching is on).
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    token_type: String,
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
}

impl AccessToken {
    /// Parse a 2xx token-endpoint body. A body that is not JSON, or that has
    /// no usable `access_token`, is an auth failure carrying the raw text.
    pub fn from_response(status: u16, body: &str) -> Result<Self, GatewayError> {
        let auth_error = || GatewayError::UpstreamAuth {
            status: Some(status),
            body: body.to_string(),
        };

        let parsed: TokenResponse = serde_json::from_str(body).map_err(|_| auth_error())?;
        let value = parsed
            .access_token
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(auth_error)?;

        Ok(Self {
            value,
            token_type: parsed.token_type.unwrap_or_else(|| "Bearer".into()),
            expires_in: parsed.expires_in,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
