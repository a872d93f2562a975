use {
    crate::{
        AppState,
        adapters::api_errors::{ApiError, ErrorBody},
        domain::{error::GatewayError, mode::Mode},
    },
    axum::{
        Json,
        body::Bytes,
        extract::{State, rejection::BytesRejection},
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
    },
    serde::{Deserialize, Serialize, de::DeserializeOwned},
};

const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderBody {
    pub amount: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderBody {
    pub order_id: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub approval_url: String,
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderResponse {
    pub success: bool,
    pub message: &'static str,
    pub order_id: String,
    pub details: serde_json::Value,
    pub mode: Mode,
}

#[tracing::instrument(
    name = "create_order",
    skip_all,
    fields(mode = tracing::field::Empty, order_id = tracing::field::Empty)
)]
pub async fn create_order_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let input: CreateOrderBody = parse_body(body)?;
    let config = state.config.load();
    tracing::Span::current().record("mode", config.mode().as_str());

    let created = state
        .checkout
        .process_create_order(&config, input.amount, input.currency)
        .await?;

    tracing::Span::current().record("order_id", created.order.order_id.as_str());
    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: created.order.order_id,
        approval_url: created.order.approval_url,
        mode: created.mode,
    }))
}

#[tracing::instrument(
    name = "capture_order",
    skip_all,
    fields(mode = tracing::field::Empty, order_id = tracing::field::Empty)
)]
pub async fn capture_order_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CaptureOrderResponse>, ApiError> {
    let input: CaptureOrderBody = parse_body(body)?;
    let config = state.config.load();
    tracing::Span::current().record("mode", config.mode().as_str());
    if let Some(order_id) = input.order_id.as_deref() {
        tracing::Span::current().record("order_id", order_id);
    }

    // body wins over header when both are sent
    let caller_key = input.idempotency_key.as_deref().or_else(|| {
        headers
            .get(IDEMPOTENCY_HEADER)
            .and_then(|v| v.to_str().ok())
    });

    let captured = state
        .checkout
        .process_capture_order(&config, input.order_id, caller_key)
        .await?;

    Ok(Json(CaptureOrderResponse {
        success: true,
        message: "Order captured successfully",
        order_id: captured.order_id.as_str().to_string(),
        details: captured.result.body,
        mode: captured.mode,
    }))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ErrorBody::new("Method not allowed", "method_not_allowed")),
    )
}

/// An empty body reads as `{}` so missing fields surface as validation errors.
/// Oversized or stalled bodies come back through the envelope like any other
/// bad input.
fn parse_body<T: DeserializeOwned + Default>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, GatewayError> {
    let body = body.map_err(|rejection| {
        GatewayError::Validation(format!(
            "Request body could not be read: {}",
            rejection.body_text()
        ))
    })?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&body)
        .map_err(|e| GatewayError::Validation(format!("Request body must be a JSON object: {e}")))
}
