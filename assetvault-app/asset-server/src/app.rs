// ============================================================================
// Asset Server - Application lifecycle
// File: assetvault-app/asset-server/src/app.rs
// ============================================================================

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use asset_api::{build_router, AppState};
use asset_core::services::{AssetService, CredentialService, SessionManager, SessionSweeper};
use asset_infrastructure::{
    create_pool, run_migrations, PgAssetRepository, PgSessionRepository, PgUserRepository,
};
use asset_shared::config::AppConfig;

/// Everything the process owns: pool, services, router and bound listener.
pub struct Application {
    config: AppConfig,
    pool: PgPool,
    sessions: Arc<SessionManager>,
    router: Router,
    listener: TcpListener,
}

impl Application {
    pub async fn build(config: AppConfig) -> anyhow::Result<Self> {
        info!("Connecting to database...");
        let pool = create_pool(&config.database)
            .await
            .context("failed to connect to database")?;
        info!("Database connection established.");

        if config.database.run_migrations {
            run_migrations(&pool)
                .await
                .context("failed to apply migrations")?;
        }

        let credentials = Arc::new(CredentialService::new(Arc::new(PgUserRepository::new(
            pool.clone(),
        ))));
        let sessions = Arc::new(SessionManager::new(
            credentials.clone(),
            Arc::new(PgSessionRepository::new(pool.clone())),
            chrono::Duration::seconds(config.session.ttl_seconds),
        ));
        let assets = Arc::new(AssetService::new(Arc::new(PgAssetRepository::new(
            pool.clone(),
        ))));

        let state = AppState {
            credentials,
            sessions: sessions.clone(),
            assets,
            upload_limit: config.upload.max_bytes,
        };
        let router = build_router(
            state,
            Duration::from_secs(config.app.request_timeout_seconds),
        );

        let host: IpAddr = config
            .app
            .host
            .parse()
            .with_context(|| format!("invalid app.host '{}'", config.app.host))?;
        let addr = SocketAddr::from((host, config.app.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            pool,
            sessions,
            router,
            listener,
        })
    }

    /// Serve until `shutdown` fires, then drain for at most the grace period.
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let sweeper = SessionSweeper::spawn(
            self.sessions.clone(),
            Duration::from_secs(self.config.session.sweep_interval_seconds),
            &shutdown,
        );

        let signal = shutdown.clone();
        let serve = axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { signal.cancelled().await });
        let mut server = tokio::spawn(async move { serve.await });

        let grace = Duration::from_secs(self.config.app.shutdown_grace_seconds);
        let finished = tokio::select! {
            result = &mut server => Some(result),
            _ = shutdown.cancelled() => None,
        };
        let outcome = match finished {
            Some(result) => result,
            None => {
                info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
                match tokio::time::timeout(grace, &mut server).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Grace period elapsed, abandoning in-flight requests");
                        server.abort();
                        Ok(Ok(()))
                    }
                }
            }
        };

        sweeper.stop().await;
        self.pool.close().await;
        info!("Server stopped");

        outcome.context("server task failed")??;
        Ok(())
    }
}
