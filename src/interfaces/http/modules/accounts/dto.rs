//! Account DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{RegisterAccountDto, UpdateProfileDto};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExistsParams {
    /// Username to look up (exact, case-sensitive)
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExistsResponse {
    pub username: String,
    pub exists: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 4, max = 128, message = "password must be 4-128 characters"))]
    pub password: String,
    #[validate(length(max = 50, message = "nickname must be at most 50 characters"))]
    pub nickname: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
}

impl From<RegisterRequest> for RegisterAccountDto {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
            nickname: r.nickname,
            email: r.email,
        }
    }
}

/// Profile update. Omitted fields are left as they are.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    /// Account to update; must be the caller's own username
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(max = 50, message = "nickname must be at most 50 characters"))]
    pub nickname: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileDto {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            username: r.username,
            nickname: r.nickname,
            email: r.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountIdResponse {
    pub id: i64,
}
