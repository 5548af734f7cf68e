//! HTTP handlers for the college directory (all bearer-protected).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::auth_handlers::MessageResponse;
use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::errors::WardenError;
use crate::storage::repositories::college::{
    CollegeRecord, CollegeRecordFilter, NewCollegeRecord, UpdateCollegeRecord,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CollegeListQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
    /// Filter by pin code
    pub pin_code: Option<String>,
    /// Include soft-deleted records
    pub mark_as_deleted: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCollegeRequest {
    #[validate(length(min = 3, max = 60, message = "name must be 3-60 characters"))]
    pub name: String,
    #[validate(length(min = 3, max = 60, message = "unique_name must be 3-60 characters"))]
    pub unique_name: String,
    #[validate(length(min = 3, max = 120, message = "address must be 3-120 characters"))]
    pub address: String,
    #[validate(length(min = 3, max = 10, message = "pin_code must be 3-10 characters"))]
    pub pin_code: String,
    #[serde(default)]
    pub icon: String,
    #[validate(range(min = 1, message = "strength must be positive"))]
    pub strength: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCollegeRequest {
    pub unique_name: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub icon: Option<String>,
    pub strength: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeleteCollegeRequest {
    #[validate(length(min = 3, max = 60, message = "unique_name must be 3-60 characters"))]
    pub unique_name: String,
}

/// Fetch a filtered page of college records.
#[utoipa::path(
    get,
    path = "/admin/college",
    tag = "admin",
    security(("bearerAuth" = [])),
    params(CollegeListQuery),
    responses(
        (status = 200, description = "College records", body = [CollegeRecord]),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Storage failure"),
    )
)]
pub async fn list_colleges_handler(
    State(state): State<ApiState>,
    Query(query): Query<CollegeListQuery>,
) -> Result<Json<Vec<CollegeRecord>>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let filter = CollegeRecordFilter {
        pin_code: query.pin_code.filter(|p| !p.is_empty()),
        include_deleted: query.mark_as_deleted.unwrap_or(false),
        limit,
        offset: (page - 1) * limit,
    };

    let records = state.colleges.list(&filter).await?;
    Ok(Json(records))
}

/// Add a college record.
#[utoipa::path(
    post,
    path = "/admin/college",
    tag = "admin",
    security(("bearerAuth" = [])),
    request_body = CreateCollegeRequest,
    responses(
        (status = 201, description = "College created", body = MessageResponse),
        (status = 400, description = "Validation failure or duplicate college"),
        (status = 401, description = "Missing or invalid bearer token"),
    )
)]
pub async fn create_college_handler(
    State(state): State<ApiState>,
    Json(payload): Json<CreateCollegeRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    payload.validate().map_err(WardenError::from)?;

    state
        .colleges
        .create(NewCollegeRecord {
            name: payload.name,
            unique_name: payload.unique_name,
            address: payload.address,
            pin_code: payload.pin_code,
            icon: payload.icon,
            strength: payload.strength,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse { message: "college created".to_string() })))
}

/// Update an existing college record selected by its unique name.
#[utoipa::path(
    patch,
    path = "/admin/college",
    tag = "admin",
    security(("bearerAuth" = [])),
    request_body = UpdateCollegeRequest,
    responses(
        (status = 200, description = "College updated", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Unknown unique name"),
    )
)]
pub async fn update_college_handler(
    State(state): State<ApiState>,
    Json(payload): Json<UpdateCollegeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .colleges
        .update(
            &payload.unique_name,
            UpdateCollegeRecord {
                name: payload.name,
                address: payload.address,
                pin_code: payload.pin_code,
                icon: payload.icon,
                strength: payload.strength,
            },
        )
        .await?;

    Ok(Json(MessageResponse { message: "college updated".to_string() }))
}

/// Soft-delete a college record.
#[utoipa::path(
    delete,
    path = "/admin/college",
    tag = "admin",
    security(("bearerAuth" = [])),
    request_body = DeleteCollegeRequest,
    responses(
        (status = 200, description = "College deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Unknown unique name"),
    )
)]
pub async fn delete_college_handler(
    State(state): State<ApiState>,
    Json(payload): Json<DeleteCollegeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate().map_err(WardenError::from)?;

    state.colleges.soft_delete(&payload.unique_name).await?;

    Ok(Json(MessageResponse { message: "college deleted".to_string() }))
}
