//! EcoFuelConnect - a waste-to-fuel coordination backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecofuelconnect::{
    api::{self, AppState},
    cache::StatsCache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxContentRepository, SqlxFuelRequestRepository, SqlxMessageRepository,
            SqlxSessionRepository, SqlxStatsRepository, SqlxUserRepository,
            SqlxWasteEntryRepository,
        },
    },
    services::{
        ContentService, DashboardService, FuelService, HttpGoogleVerifier, LoginRateLimiter,
        MessageService, UserService, WasteService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecofuelconnect=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EcoFuelConnect backend...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected");

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let waste_repo = SqlxWasteEntryRepository::boxed(pool.clone());
    let fuel_repo = SqlxFuelRequestRepository::boxed(pool.clone());
    let message_repo = SqlxMessageRepository::boxed(pool.clone());
    let content_repo = SqlxContentRepository::boxed(pool.clone());
    let stats_repo = SqlxStatsRepository::boxed(pool.clone());

    // Initialize services
    let rate_limiter = Arc::new(LoginRateLimiter::new());
    let google_verifier = Arc::new(HttpGoogleVerifier::new(
        config.auth.google_client_id.clone(),
    ));
    let user_service = Arc::new(
        UserService::new(
            user_repo.clone(),
            session_repo,
            rate_limiter.clone(),
            google_verifier,
        )
        .with_session_days(config.auth.session_days),
    );
    let waste_service = Arc::new(WasteService::new(waste_repo, user_repo.clone()));
    let fuel_service = Arc::new(FuelService::new(fuel_repo));
    let message_service = Arc::new(MessageService::new(message_repo.clone(), user_repo));
    let content_service = Arc::new(ContentService::new(content_repo));

    let stats_cache = StatsCache::new(Duration::from_secs(config.cache.stats_ttl_seconds));
    let dashboard_service = Arc::new(DashboardService::new(
        stats_repo,
        message_repo,
        stats_cache.clone(),
    ));

    // Build application state
    let state = AppState {
        pool,
        user_service: user_service.clone(),
        waste_service,
        fuel_service,
        message_service,
        content_service,
        dashboard_service,
        stats_cache,
    };

    // Rate limiter cleanup task (runs every 5 minutes)
    {
        let limiter = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }

    // Expired session sweep (runs hourly)
    {
        let service = user_service.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600));
            loop {
                interval.tick().await;
                if let Err(e) = service.cleanup_expired_sessions().await {
                    tracing::warn!(error = %e, "Session sweep failed");
                }
            }
        });
    }

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
