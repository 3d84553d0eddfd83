//! Bearer-token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::domain::AccountRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing bearer token",
            AuthError::InvalidToken => "invalid token",
            AuthError::ExpiredToken => "token expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(self.message())),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// The principal of the current request, taken from the token's `sub`.
///
/// Inserted into request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: AccountRole,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            role: claims.role.parse().unwrap_or_default(),
            username: claims.sub,
        }
    }
}

fn extract_bearer(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return AuthError::MissingToken.into_response();
    };

    let Some(token) = extract_bearer(value) else {
        return AuthError::InvalidToken.into_response();
    };

    let claims = match verify_token(token, &auth.jwt_config) {
        Ok(claims) if claims.is_expired() => return AuthError::ExpiredToken.into_response(),
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return AuthError::InvalidToken.into_response();
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from_claims(claims));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        format!("{}:{}", user.username, user.role)
    }

    fn app(config: &JwtConfig) -> Router {
        Router::new().route("/me", get(whoami)).layer(middleware::from_fn_with_state(
            AuthState {
                jwt_config: config.clone(),
            },
            auth_middleware,
        ))
    }

    async fn call(config: &JwtConfig, authorization: Option<String>) -> (StatusCode, String) {
        let mut req = Request::get("/me");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        let resp = app(config)
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn valid_token_exposes_principal() {
        let config = JwtConfig::new("mw-secret", 1);
        let token = create_token("carol", AccountRole::User, &config).unwrap();

        let (status, body) = call(&config, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "carol:USER");
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let config = JwtConfig::new("mw-secret", 1);
        let (status, body) = call(&config, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing bearer token"));
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_401() {
        let config = JwtConfig::new("mw-secret", 1);
        let token = create_token("carol", AccountRole::User, &JwtConfig::new("other", 1)).unwrap();

        let (status, _) = call(&config, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_401() {
        let config = JwtConfig::new("mw-secret", 1);
        let (status, _) = call(&config, Some("Basic Y2Fyb2w6cHc=".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
