use {
    crate::domain::{
        credentials::Credentials,
        error::GatewayError,
        mode::{LIVE_BASE_URL, Mode, ProviderEndpoints, SANDBOX_BASE_URL},
        order::CheckoutContext,
    },
    std::{env, fmt, time::Duration},
};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Everything a single request reads from configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub mode_flag: Option<String>,
    pub sandbox_base_url: String,
    pub live_base_url: String,
    pub checkout: CheckoutContext,
    pub idempotency: bool,
    pub token_cache: bool,
    pub http_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            mode_flag: None,
            sandbox_base_url: SANDBOX_BASE_URL.into(),
            live_base_url: LIVE_BASE_URL.into(),
            checkout: CheckoutContext::default(),
            idempotency: true,
            token_cache: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: var("PAYPAL_CLIENT_ID"),
            client_secret: var("PAYPAL_CLIENT_SECRET"),
            mode_flag: var("PAYPAL_MODE"),
            sandbox_base_url: var("PAYPAL_SANDBOX_BASE_URL").unwrap_or(defaults.sandbox_base_url),
            live_base_url: var("PAYPAL_LIVE_BASE_URL").unwrap_or(defaults.live_base_url),
            checkout: CheckoutContext {
                brand_name: var("PAYPAL_BRAND_NAME"),
                return_url: var("PAYPAL_RETURN_URL"),
                cancel_url: var("PAYPAL_CANCEL_URL"),
            },
            idempotency: flag("PAYPAL_IDEMPOTENCY").unwrap_or(defaults.idempotency),
            token_cache: flag("PAYPAL_TOKEN_CACHE").unwrap_or(defaults.token_cache),
            http_timeout: secs("PAYPAL_HTTP_TIMEOUT_SECS").unwrap_or(defaults.http_timeout),
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::resolve(self.mode_flag.as_deref())
    }

    pub fn endpoints(&self, mode: Mode) -> ProviderEndpoints {
        match mode {
            Mode::Test => ProviderEndpoints::from_base(&self.sandbox_base_url),
            Mode::Production => ProviderEndpoints::from_base(&self.live_base_url),
        }
    }

    pub fn credentials(&self) -> Result<Credentials, GatewayError> {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("client_id_set", &self.client_id.is_some())
            .field("client_secret_set", &self.client_secret.is_some())
            .field("mode", &self.mode())
            .field("sandbox_base_url", &self.sandbox_base_url)
            .field("live_base_url", &self.live_base_url)
            .field("checkout", &self.checkout)
            .field("idempotency", &self.idempotency)
            .field("token_cache", &self.token_cache)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Where handlers get their configuration from, once per request.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> GatewayConfig;
}

/// Re-reads the process environment on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn load(&self) -> GatewayConfig {
        GatewayConfig::from_env()
    }
}

/// Fixed configuration, for tests and embedding.
impl ConfigSource for GatewayConfig {
    fn load(&self) -> GatewayConfig {
        self.clone()
    }
}

/// Settings only read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_body_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            request_body_timeout: secs("REQUEST_BODY_TIMEOUT_SECS")
                .unwrap_or(Duration::from_secs(15)),
            connect_timeout: secs("PAYPAL_CONNECT_TIMEOUT_SECS")
                .unwrap_or(Duration::from_secs(10)),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag(key: &str) -> Option<bool> {
    let raw = var(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(key, value = other, "unrecognised boolean setting, using default");
            None
        }
    }
}

fn secs(key: &str) -> Option<Duration> {
    let raw = var(key)?;
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Some(Duration::from_secs(n)),
        _ => {
            tracing::warn!(key, value = %raw, "invalid duration setting, using default");
            None
        }
    }
}
