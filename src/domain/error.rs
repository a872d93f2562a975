use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation: {0}")]
    Validation(String),

    /// Names the missing setting, never its value.
    #[error("configuration: {0}")]
    Configuration(String),

    #[error("upstream auth rejected ({}): {body}", status_label(.status))]
    UpstreamAuth { status: Option<u16>, body: String },

    #[error("upstream order rejected ({}): {body}", status_label(.status))]
    UpstreamOrder { status: Option<u16>, body: String },

    #[error("upstream capture rejected ({}): {body}", status_label(.status))]
    UpstreamCapture { status: Option<u16>, body: String },

    /// Provider answered 2xx but the body broke the expected contract.
    #[error("protocol: {message}")]
    Protocol { message: String, body: String },
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Configuration(_) => "configuration_error",
            Self::UpstreamAuth { .. } => "upstream_auth_error",
            Self::UpstreamOrder { .. } => "upstream_order_error",
            Self::UpstreamCapture { .. } => "upstream_capture_error",
            Self::Protocol { .. } => "protocol_error",
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}
