use {
    crate::domain::{
        credentials::Credentials,
        error::GatewayError,
        mode::ProviderEndpoints,
        provider::{OutboundBody, OutboundRequest, ProviderTransport},
        token::AccessToken,
    },
    std::time::Duration,
};

/// Client-credentials grant against the token endpoint. One attempt, no retry.
pub async fn acquire_token(
    transport: &dyn ProviderTransport,
    credentials: &Credentials,
    endpoints: &ProviderEndpoints,
    timeout: Duration,
) -> Result<AccessToken, GatewayError> {
    let request = OutboundRequest {
        url: endpoints.token_url.clone(),
        authorization: credentials.basic_auth_header(),
        body: OutboundBody::Form("grant_type=client_credentials".into()),
        idempotency_key: None,
        timeout,
    };

    let response = transport
        .post(request)
        .await
        .map_err(|e| GatewayError::UpstreamAuth {
            status: None,
            body: e.to_string(),
        })?;

    if !response.is_success() {
        tracing::error!(
            status = response.status,
            body = %response.body,
            client_id = %credentials.masked_client_id(),
            "token exchange rejected"
        );
        return Err(GatewayError::UpstreamAuth {
            status: Some(response.status),
            body: response.body,
        });
    }

    let token = AccessToken::from_response(response.status, &response.body)?;
    tracing::debug!(
        token_type = token.token_type(),
        expires_in = ?token.expires_in(),
        "access token acquired"
    );
    Ok(token)
}
