//! Axum middleware for bearer authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::api::error::ApiError;
use crate::auth::gateway::AuthenticationGateway;

pub type GatewayState = Arc<AuthenticationGateway>;

/// Middleware entry point that authenticates requests using the configured
/// [`AuthenticationGateway`]. On success the verified [`SessionClaims`] are
/// inserted into request extensions for handlers to consume.
///
/// [`SessionClaims`]: crate::auth::token_service::SessionClaims
pub async fn authenticate(
    State(gateway): State<GatewayState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // CORS preflight never carries credentials.
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let header =
        request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()).unwrap_or("");

    match gateway.authorize(header) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(err) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                error = %err,
                "authentication failed"
            );
            Err(err.into())
        }
    }
}
