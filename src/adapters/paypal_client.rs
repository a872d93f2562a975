use {
    crate::domain::provider::{
        OutboundBody, OutboundRequest, ProviderTransport, RawResponse, TransportError,
    },
    reqwest::{
        Client,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    std::{future::Future, pin::Pin, time::Duration},
};

const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

/// reqwest-backed transport to the PayPal REST API.
#[derive(Debug, Clone)]
pub struct PayPalTransport {
    client: Client,
}

impl PayPalTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .use_rustls_tls()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| TransportError(format!("http client: {e}")))?;
        Ok(Self { client })
    }

    async fn post_inner(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .header(AUTHORIZATION, &request.authorization)
            .header(ACCEPT, "application/json");

        builder = match request.body {
            OutboundBody::Form(form) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(form),
            OutboundBody::Json(value) => builder.json(&value),
        };

        if let Some(key) = &request.idempotency_key {
            builder = builder.header(REQUEST_ID_HEADER, key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "provider call failed");
            TransportError(describe(&e))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("reading provider response: {e}")))?;

        tracing::debug!(url = %request.url, status, "provider responded");
        Ok(RawResponse { status, body })
    }
}

impl ProviderTransport for PayPalTransport {
    fn post(
        &self,
        request: OutboundRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>> {
        Box::pin(self.post_inner(request))
    }
}

// reqwest's Display includes the URL, which never carries credentials here.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("provider call timed out: {err}")
    } else if err.is_connect() {
        format!("could not connect to provider: {err}")
    } else {
        format!("provider call failed: {err}")
    }
}
