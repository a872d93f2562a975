use {
    crate::{
        config::GatewayConfig,
        domain::{
            capture::{CaptureResult, IdempotencyKey, OrderId},
            credentials::Credentials,
            error::GatewayError,
            mode::{Mode, ProviderEndpoints},
            order::{CheckoutContext, CreatedOrder, OrderPayload, OrderRequest},
            provider::{OutboundBody, OutboundRequest, ProviderTransport},
            token::AccessToken,
        },
        services::{token::acquire_token, token_cache::TokenCache},
    },
    std::{sync::Arc, time::Duration},
};

/// Submit a new order and pull out its approval link.
///
/// The provider creates a real order object on success; callers must not
/// blindly retry this.
pub async fn create_order(
    transport: &dyn ProviderTransport,
    request: &OrderRequest,
    context: &CheckoutContext,
    token: &AccessToken,
    endpoints: &ProviderEndpoints,
    timeout: Duration,
) -> Result<CreatedOrder, GatewayError> {
    let payload = serde_json::json!(OrderPayload::new(request, context));

    let response = transport
        .post(OutboundRequest {
            url: endpoints.orders_url.clone(),
            authorization: token.bearer_header(),
            body: OutboundBody::Json(payload),
            idempotency_key: None,
            timeout,
        })
        .await
        .map_err(|e| GatewayError::UpstreamOrder {
            status: None,
            body: e.to_string(),
        })?;

    if !response.is_success() {
        tracing::error!(
            status = response.status,
            body = %response.body,
            "create order rejected"
        );
        return Err(GatewayError::UpstreamOrder {
            status: Some(response.status),
            body: response.body,
        });
    }

    CreatedOrder::from_response(&response.body).inspect_err(|e| {
        tracing::error!(error = %e, body = %response.body, "create order response unusable");
    })
}

/// Finalize payment for an approved order. Never retried here: a second
/// attempt is only safe when it carries the same idempotency key.
pub async fn capture_order(
    transport: &dyn ProviderTransport,
    order_id: &OrderId,
    token: &AccessToken,
    endpoints: &ProviderEndpoints,
    idempotency_key: Option<&IdempotencyKey>,
    timeout: Duration,
) -> Result<CaptureResult, GatewayError> {
    let response = transport
        .post(OutboundRequest {
            url: endpoints.capture_url(order_id.as_str()),
            authorization: token.bearer_header(),
            body: OutboundBody::Json(serde_json::json!({})),
            idempotency_key: idempotency_key.map(|k| k.as_str().to_string()),
            timeout,
        })
        .await
        .map_err(|e| GatewayError::UpstreamCapture {
            status: None,
            body: e.to_string(),
        })?;

    if !response.is_success() {
        tracing::error!(
            %order_id,
            status = response.status,
            body = %response.body,
            "capture rejected"
        );
        return Err(GatewayError::UpstreamCapture {
            status: Some(response.status),
            body: response.body,
        });
    }

    Ok(CaptureResult::from_response(response.status, &response.body))
}

#[derive(Debug, Clone)]
pub struct OrderCreated {
    pub order: CreatedOrder,
    pub mode: Mode,
}

#[derive(Debug, Clone)]
pub struct OrderCaptured {
    pub order_id: OrderId,
    pub result: CaptureResult,
    pub mode: Mode,
}

/// Per-request orchestration: validate, resolve mode, get a token, then make
/// the one order call. Holds no per-request state of its own.
#[derive(Clone)]
pub struct CheckoutService {
    transport: Arc<dyn ProviderTransport>,
    tokens: Arc<TokenCache>,
}

impl CheckoutService {
    pub fn new(transport: Arc<dyn ProviderTransport>) -> Self {
        Self {
            transport,
            tokens: Arc::new(TokenCache::new()),
        }
    }

    pub fn with_token_cache(mut self, tokens: Arc<TokenCache>) -> Self {
        self.tokens = tokens;
        self
    }

    pub async fn process_create_order(
        &self,
        config: &GatewayConfig,
        amount: Option<String>,
        currency: Option<String>,
    ) -> Result<OrderCreated, GatewayError> {
        let request = OrderRequest::new(amount, currency)?;
        let credentials = config.credentials()?;
        let mode = config.mode();
        let endpoints = config.endpoints(mode);

        let token = self.token(config, &credentials, mode, &endpoints).await?;
        let result = create_order(
            &*self.transport,
            &request,
            &config.checkout,
            &token,
            &endpoints,
            config.http_timeout,
        )
        .await;
        self.forget_rejected_token(config, &credentials, mode, &result);

        let order = result?;
        tracing::info!(
            order_id = %order.order_id,
            order_status = order.status.as_deref().unwrap_or("unknown"),
            %mode,
            currency = request.currency(),
            amount = request.amount(),
            "order created"
        );
        Ok(OrderCreated { order, mode })
    }

    pub async fn process_capture_order(
        &self,
        config: &GatewayConfig,
        order_id: Option<String>,
        caller_key: Option<&str>,
    ) -> Result<OrderCaptured, GatewayError> {
        let order_id = OrderId::new(order_id)?;
        let caller_key = IdempotencyKey::from_caller(caller_key)?;
        let credentials = config.credentials()?;
        let mode = config.mode();
        let endpoints = config.endpoints(mode);

        let idempotency_key = if config.idempotency {
            Some(caller_key.unwrap_or_else(IdempotencyKey::generate))
        } else {
            if caller_key.is_some() {
                tracing::debug!("idempotency disabled, ignoring caller key");
            }
            None
        };

        let token = self.token(config, &credentials, mode, &endpoints).await?;
        let result = capture_order(
            &*self.transport,
            &order_id,
            &token,
            &endpoints,
            idempotency_key.as_ref(),
            config.http_timeout,
        )
        .await;
        self.forget_rejected_token(config, &credentials, mode, &result);

        let result = result?;
        tracing::info!(
            %order_id,
            %mode,
            status_code = result.status_code,
            capture_status = result.status().unwrap_or("unknown"),
            request_id = idempotency_key.as_ref().map(IdempotencyKey::as_str),
            "order captured"
        );
        Ok(OrderCaptured {
            order_id,
            result,
            mode,
        })
    }

    async fn token(
        &self,
        config: &GatewayConfig,
        credentials: &Credentials,
        mode: Mode,
        endpoints: &ProviderEndpoints,
    ) -> Result<AccessToken, GatewayError> {
        let acquire = || acquire_token(&*self.transport, credentials, endpoints, config.http_timeout);
        if config.token_cache {
            self.tokens.get_or_acquire(credentials, mode, acquire).await
        } else {
            acquire().await
        }
    }

    fn forget_rejected_token<T>(
        &self,
        config: &GatewayConfig,
        credentials: &Credentials,
        mode: Mode,
        result: &Result<T, GatewayError>,
    ) {
        let rejected = matches!(
            result,
            Err(GatewayError::UpstreamOrder { status: Some(401), .. }
                | GatewayError::UpstreamCapture { status: Some(401), .. })
        );
        if config.token_cache && rejected {
            self.tokens.invalidate(credentials, mode);
        }
    }
}
