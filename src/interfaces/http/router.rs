//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::middleware::{auth_middleware, AuthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{accounts, auth, health};
use crate::application::identity::{AccountDirectory, Authenticator};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmUserStore;

/// Everything the HTTP layer needs from the running service.
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub directory: AccountDirectory<SeaOrmUserStore>,
    pub jwt_config: JwtConfig,
    pub metrics: PrometheusHandle,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        accounts::exists_by_username,
        accounts::register,
        accounts::update_profile,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::DatabaseHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            accounts::ExistsResponse,
            accounts::RegisterRequest,
            accounts::UpdateProfileRequest,
            accounts::AccountIdResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Authentication", description = "Password login issuing JWT bearer tokens"),
        (name = "Accounts", description = "Registration, username lookup and own-profile updates"),
    ),
    info(
        title = "Account Service API",
        version = "1.0.0",
        description = "User account registration, credential lookup and self-service profile updates",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };

    let authenticator = Arc::new(Authenticator::new(
        ctx.directory.clone(),
        ctx.jwt_config.clone(),
    ));

    // Only the update needs a principal; lookup and registration are public.
    let update_route = put(accounts::update_profile).route_layer(middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let account_routes = Router::new()
        .route(
            "/api/v1/accounts",
            post(accounts::register).merge(update_route),
        )
        .route("/api/v1/accounts/exists", get(accounts::exists_by_username))
        .with_state(accounts::AccountHandlerState {
            directory: ctx.directory,
        });

    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .with_state(auth::AuthHandlerState { authenticator });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: ctx.metrics,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(auth_routes)
        .merge(account_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
