#![allow(dead_code)]

use axum::{Router, body::Body, http::Request};
use checkout_relay::{
    AppState,
    config::GatewayConfig,
    domain::provider::{OutboundRequest, ProviderTransport, RawResponse, TransportError},
    services::checkout::CheckoutService,
};
use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};
use tower::ServiceExt;

pub const BASE_URL: &str = "https://sandbox.paypal.test";
pub const LIVE_URL: &str = "https://live.paypal.test";
pub const CLIENT_ID: &str = "client-abc";
pub const CLIENT_SECRET: &str = "s3cr3t-value";

/// Config pointing at fake hosts, with credentials set and caching off.
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        client_id: Some(CLIENT_ID.into()),
        client_secret: Some(CLIENT_SECRET.into()),
        sandbox_base_url: BASE_URL.into(),
        live_base_url: LIVE_URL.into(),
        ..GatewayConfig::default()
    }
}

/// Replays scripted responses in order and records every request it saw.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(self: &Arc<Self>, status: u16, body: impl Into<String>) -> Arc<Self> {
        self.responses.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: body.into(),
        }));
        Arc::clone(self)
    }

    pub fn fail(self: &Arc<Self>, message: &str) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        Arc::clone(self)
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProviderTransport for FakeTransport {
    fn post(
        &self,
        request: OutboundRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response left".into()));
        Box::pin(async move { next.map_err(TransportError) })
    }
}

/// Wraps a [`FakeTransport`] so every provider call takes `delay` to answer.
pub struct SlowTransport {
    inner: Arc<FakeTransport>,
    delay: Duration,
    completed: Mutex<usize>,
}

impl SlowTransport {
    pub fn new(inner: Arc<FakeTransport>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner,
            delay,
            completed: Mutex::new(0),
        })
    }

    pub fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }
}

impl ProviderTransport for SlowTransport {
    fn post(
        &self,
        request: OutboundRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>> {
        let call = self.inner.post(request);
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            let response = call.await;
            *self.completed.lock().unwrap() += 1;
            response
        })
    }
}

/// Minimal provider that issues tokens and settles captures, honouring
/// `PayPal-Request-Id` the way the real API does when it is sent.
#[derive(Default)]
pub struct SettlingProvider {
    token_calls: Mutex<usize>,
    settlements: Mutex<HashMap<String, usize>>,
    seen_request_ids: Mutex<HashMap<String, RawResponse>>,
}

impl SettlingProvider {
    pub fn token_calls(&self) -> usize {
        *self.token_calls.lock().unwrap()
    }

    pub fn settlements(&self, order_id: &str) -> usize {
        self.settlements
            .lock()
            .unwrap()
            .get(order_id)
            .copied()
            .unwrap_or(0)
    }

    fn handle(&self, request: &OutboundRequest) -> RawResponse {
        if request.url.ends_with("/v1/oauth2/token") {
            *self.token_calls.lock().unwrap() += 1;
            return RawResponse {
                status: 200,
                body: token_body("tok", Some(32400)),
            };
        }

        let order_id = request
            .url
            .trim_end_matches("/capture")
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        if let Some(key) = &request.idempotency_key
            && let Some(previous) = self.seen_request_ids.lock().unwrap().get(key)
        {
            return previous.clone();
        }

        *self
            .settlements
            .lock()
            .unwrap()
            .entry(order_id.clone())
            .or_default() += 1;
        let response = RawResponse {
            status: 201,
            body: capture_body(&order_id),
        };
        if let Some(key) = &request.idempotency_key {
            self.seen_request_ids
                .lock()
                .unwrap()
                .insert(key.clone(), response.clone());
        }
        response
    }
}

impl ProviderTransport for SettlingProvider {
    fn post(
        &self,
        request: OutboundRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>> {
        let response = self.handle(&request);
        Box::pin(async move { Ok(response) })
    }
}

pub fn token_body(token: &str, expires_in: Option<u64>) -> String {
    let mut body = serde_json::json!({
        "scope": "https://uri.paypal.com/services/payments/payment",
        "access_token": token,
        "token_type": "Bearer",
        "app_id": "APP-80W284485P519543T",
    });
    if let Some(secs) = expires_in {
        body["expires_in"] = serde_json::json!(secs);
    }
    body.to_string()
}

pub fn order_body(order_id: &str) -> String {
    serde_json::json!({
        "id": order_id,
        "status": "CREATED",
        "links": [
            {"href": format!("https://provider/v2/checkout/orders/{order_id}"), "rel": "self", "method": "GET"},
            {"href": format!("https://provider/approve?token={order_id}"), "rel": "approve", "method": "GET"},
            {"href": format!("https://provider/v2/checkout/orders/{order_id}/capture"), "rel": "capture", "method": "POST"},
        ],
    })
    .to_string()
}

pub fn capture_body(order_id: &str) -> String {
    serde_json::json!({
        "id": order_id,
        "status": "COMPLETED",
        "purchase_units": [{
            "payments": {"captures": [{"id": "CAP-1", "status": "COMPLETED"}]}
        }],
    })
    .to_string()
}

pub fn app(transport: Arc<dyn ProviderTransport>, config: GatewayConfig) -> Router {
    checkout_relay::router(AppState {
        checkout: CheckoutService::new(transport),
        config: Arc::new(config),
    })
}

/// The router with the server layers `main` adds.
pub fn served_app(
    transport: Arc<dyn ProviderTransport>,
    config: GatewayConfig,
    body_timeout: Duration,
) -> Router {
    checkout_relay::app(
        AppState {
            checkout: CheckoutService::new(transport),
            config: Arc::new(config),
        },
        body_timeout,
    )
}

/// Send one request through the router and decode the JSON reply.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: &str,
) -> (axum::http::StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
