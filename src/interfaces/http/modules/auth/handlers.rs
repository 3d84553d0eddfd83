//! Login handler

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, LoginResponse};
use crate::application::identity::Authenticator;
use crate::infrastructure::database::repositories::SeaOrmUserStore;
use crate::interfaces::http::common::{domain_error_response, ApiError, ApiResponse, ValidatedJson};

#[derive(Clone)]
pub struct AuthHandlerState {
    pub authenticator: Arc<Authenticator<SeaOrmUserStore>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError<LoginResponse>> {
    let result = state
        .authenticator
        .login(&request.username, &request.password)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(result.into())))
}
