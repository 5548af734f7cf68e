//! HTTP handlers for the authentication endpoints.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::auth::models::{CreateAccountRequest, LoginRequest, RefreshRequest};
use crate::auth::token_service::SessionClaims;

/// Generic message-only response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful login body. `jwtToken` keeps the wire spelling existing
/// clients already parse.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub jwt_token: String,
    pub refresh_token: String,
}

/// Successful refresh body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: String,
    pub jwt_token: String,
}

/// Authenticate with username and password.
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Validation failure or bad credentials"),
        (status = 500, description = "Signing or storage failure"),
    )
)]
pub async fn login_handler(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let tokens = state.gateway.login(&payload).await?;

    Ok(Json(LoginResponse {
        message: "successfully login".to_string(),
        jwt_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Create a new administrative account (requires authentication).
#[utoipa::path(
    post,
    path = "/admin/User",
    tag = "admin",
    security(("bearerAuth" = [])),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Validation failure or duplicate account"),
        (status = 401, description = "Missing or invalid bearer token"),
    )
)]
pub async fn create_user_handler(
    State(state): State<ApiState>,
    Extension(claims): Extension<SessionClaims>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.gateway.create_account(&claims, payload).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse { message: "user created".to_string() })))
}

/// End the caller's session (requires authentication).
#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn logout_handler(
    State(state): State<ApiState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.gateway.logout(&claims).await?;

    Ok(Json(MessageResponse { message: "logout successfully".to_string() }))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/admin/refresh",
    tag = "admin",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token issued", body = RefreshResponse),
        (status = 401, description = "Refresh token invalid, expired, or cleared"),
    )
)]
pub async fn refresh_handler(
    State(state): State<ApiState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let access_token = state.gateway.refresh_session(&payload.refresh_token).await?;

    Ok(Json(RefreshResponse {
        message: "token refreshed".to_string(),
        jwt_token: access_token,
    }))
}
