//! Account API handlers
//!
//! Thin wrappers over [`AccountDirectory`]; all rules live there.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    AccountIdResponse, ExistsParams, ExistsResponse, RegisterRequest, UpdateProfileRequest,
};
use crate::application::identity::AccountDirectory;
use crate::infrastructure::database::repositories::SeaOrmUserStore;
use crate::interfaces::http::common::{domain_error_response, ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Account handler state, concrete over the SeaORM store for Axum.
#[derive(Clone)]
pub struct AccountHandlerState {
    pub directory: AccountDirectory<SeaOrmUserStore>,
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/exists",
    tag = "Accounts",
    params(ExistsParams),
    responses(
        (status = 200, description = "Whether the username is taken", body = ApiResponse<ExistsResponse>)
    )
)]
pub async fn exists_by_username(
    State(state): State<AccountHandlerState>,
    Query(params): Query<ExistsParams>,
) -> Result<Json<ApiResponse<ExistsResponse>>, ApiError<ExistsResponse>> {
    let exists = state
        .directory
        .exists_by_username(&params.username)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ExistsResponse {
        username: params.username,
        exists,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountIdResponse>),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AccountHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountIdResponse>>), ApiError<AccountIdResponse>> {
    let id = state
        .directory
        .register(request.into())
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountIdResponse { id })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<AccountIdResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Target is not the caller's account"),
        (status = 404, description = "No login-eligible account with that username")
    )
)]
pub async fn update_profile(
    State(state): State<AccountHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountIdResponse>>, ApiError<AccountIdResponse>> {
    let id = state
        .directory
        .update_profile(&user.username, request.into())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(AccountIdResponse { id })))
}
