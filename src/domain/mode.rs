use {
    derive_more::Display,
    serde::{Deserialize, Serialize},
};

pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";
pub const LIVE_BASE_URL: &str = "https://api-m.paypal.com";

/// Provider environment. `Test` never moves real money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[display("test")]
    Test,
    #[display("production")]
    Production,
}

impl Mode {
    /// Resolve the mode flag from configuration. Anything that is not an
    /// explicit production value falls back to `Test`.
    pub fn resolve(flag: Option<&str>) -> Self {
        match flag.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("live" | "production" | "prod") => Self::Production,
            _ => Self::Test,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// The two URLs every request needs once the mode is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub token_url: String,
    pub orders_url: String,
}

impl ProviderEndpoints {
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            token_url: format!("{base}/v1/oauth2/token"),
            orders_url: format!("{base}/v2/checkout/orders"),
        }
    }

    pub fn capture_url(&self, order_id: &str) -> String {
        format!("{}/{order_id}/capture", self.orders_url)
    }
}
