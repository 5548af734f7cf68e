//! Router assembly: public endpoints, bearer-protected endpoints, and the
//! Swagger UI.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    http::Method,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth_handlers::{
    create_user_handler, login_handler, logout_handler, refresh_handler, MessageResponse,
};
use super::college_handlers::{
    create_college_handler, delete_college_handler, list_colleges_handler, update_college_handler,
};
use super::docs;
use super::error::ApiError;
use crate::auth::gateway::AuthenticationGateway;
use crate::auth::middleware::authenticate;
use crate::config::ServerConfig;
use crate::storage::{self, CollegeRecordRepository, DbPool};

#[derive(Clone)]
pub struct ApiState {
    pub gateway: Arc<AuthenticationGateway>,
    pub colleges: Arc<CollegeRecordRepository>,
    pub pool: DbPool,
}

pub fn build_router(state: ApiState, config: &ServerConfig) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.gateway.clone(), authenticate);

    let public = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/admin/login", post(login_handler))
        .route("/admin/refresh", post(refresh_handler));

    let protected = Router::new()
        .route("/admin/User", post(create_user_handler))
        .route("/admin/logout", post(logout_handler))
        .route(
            "/admin/college",
            get(list_colleges_handler)
                .post(create_college_handler)
                .patch(update_college_handler)
                .delete(delete_college_handler),
        )
        .route_layer(auth_layer);

    let router = Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(docs::docs_router())
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                    Method::PATCH,
                ])
                .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
                .max_age(std::time::Duration::from_secs(300)),
        )
    } else {
        router
    }
}

async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse { message: "warden admin service is live".to_string() })
}

async fn health_handler(State(state): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    storage::check_connection(&state.pool).await?;
    Ok(Json(MessageResponse { message: "It's healthy".to_string() }))
}
