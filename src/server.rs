//! Account service runtime
//!
//! [`ServerHandle`] owns the service lifecycle: database connection,
//! migrations, the REST API listener and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::identity::AccountDirectory;
use crate::config::AppConfig;
use crate::domain::PasswordHasher;
use crate::infrastructure::crypto::password::BcryptHasher;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, SeaOrmUserStore};
use crate::interfaces::{create_api_router, ApiContext};
use crate::shared::errors::{AppError, InfraError};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Apply pending migrations before serving (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// The process-wide Prometheus recorder. Installed on first use and reused
/// on every later start within the same process.
fn prometheus_handle() -> Result<PrometheusHandle, AppError> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Startup(format!("metrics recorder: {}", e)))?;
    info!("Prometheus metrics recorder installed");
    Ok(HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running account service.
pub struct ServerHandle {
    pub config: AppConfig,
    /// Port the API is actually bound to (differs from config when it was 0).
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let config = opts.config;
        let metrics = prometheus_handle()?;

        let db = init_database(&config.database_config())
            .await
            .map_err(InfraError::from)?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await.map_err(InfraError::from)?;
            info!("Database migrations completed");
        } else {
            warn!("Skipping database migrations");
        }

        if config.uses_default_secret() {
            warn!("security.jwt_secret is the built-in default; set JWT_SECRET in production");
        }

        let store = Arc::new(SeaOrmUserStore::new(db.clone()));
        let hasher: Arc<dyn PasswordHasher> =
            Arc::new(BcryptHasher::new(config.security.bcrypt_cost));
        let directory = AccountDirectory::new(store, hasher);

        let router = create_api_router(ApiContext {
            db: db.clone(),
            directory,
            jwt_config: config.jwt_config(),
            metrics,
        });

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(config.api_address()).await?;
        let local = listener.local_addr()?;
        info!("REST API listening on http://{}", local);
        info!("Swagger UI available at http://{}/docs/", local);

        let api_task = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    signal.wait().await;
                    info!("REST API received shutdown signal");
                })
                .await;
            if let Err(e) = served {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config,
            api_port: local.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGINT / SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Wait for the API task to stop, then close the database, all within
    /// `server.shutdown_timeout`.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let completed = shutdown
            .run_cleanup(async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API task panicked: {}", e),
                }
                match db.close().await {
                    Ok(()) => info!("Database connection closed"),
                    Err(e) => warn!("Error closing database connection: {}", e),
                }
            })
            .await;

        if completed {
            info!("Account service shutdown complete");
        }
    }
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over
/// `logging.level`; `logging.format = "json"` selects JSON lines.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
