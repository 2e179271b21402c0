//! Freelance Hub API
//!
//! Backend for a freelance marketplace: proposals, earnings, conversations
//! and the analytics dashboard built from them.
//!
//! Records live in the hosted Postgres; callers authenticate with the JWT
//! issued by the hosted auth layer.

mod analytics;
mod auth;
mod config;
mod conversations;
mod db;
mod error;
mod generator;
mod models;
mod notifications;
mod routes;
mod state;

use crate::config::{LogFormat, Settings};
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log format can be chosen from it
    let settings = Settings::load()?;

    init_tracing(settings.log_format);

    info!("🚀 Starting Freelance Hub API...");
    info!("📋 Configuration loaded successfully");

    if settings.using_default_jwt_secret {
        warn!("⚠️  JWT_SECRET not set, using default (INSECURE - set in production!)");
    }
    if settings.generator.api_key.is_none() {
        warn!("⚠️  GROQ_API_KEY not set, proposal generation is disabled");
    }

    let pool = db::create_pool(&settings.database)?;
    if let Err(e) = db::verify_connection(&pool).await {
        error!("❌ FATAL: Failed to connect to database: {}", e);
        error!("DATABASE_URL must be set in .env and database must be accessible");
        return Err(e.into());
    }
    info!(
        "✅ Database connection successful (TLS: {})",
        settings.database.use_tls
    );

    if settings.database.bootstrap_schema {
        if let Err(e) = db::bootstrap_schema(&pool).await {
            warn!("⚠️  Warning creating tables: {}", e);
        }
    }

    let state = Arc::new(AppState::new(pool, &settings)?);
    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET   /health                     - Health check");
    info!("");
    info!("   ─── Analytics ───");
    info!("   POST  /api/analytics/compute      - Report from supplied records");
    info!("   GET   /api/analytics/dashboard    - Report from stored records");
    info!("");
    info!("   ─── Proposals ───");
    info!("   GET   /api/proposals              - List proposals");
    info!("   PATCH /api/proposals/{{id}}         - Update status and values");
    info!("   POST  /api/proposals/generate     - Generate a proposal draft");
    info!("");
    info!("   ─── Earnings ───");
    info!("   GET   /api/earnings               - List earnings");
    info!("   POST  /api/earnings               - Record an earning");
    info!("   PATCH /api/earnings/{{id}}/status   - Change earning status");
    info!("");
    info!("   ─── Messaging ───");
    info!("   GET   /api/conversations          - Conversation partners");
    info!("   GET   /api/messages/{{partner_id}}  - Thread with one partner");
    info!("   POST  /api/messages               - Send a message");
    info!("   GET   /api/notifications          - Notifications and unread count");
    info!("   POST  /api/notifications/read     - Mark all as read");
    info!("");
    info!("   ─── Admin ───");
    info!("   GET   /api/admin/stats            - Platform totals (Admin only)");
    info!("");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,freelance_hub_api=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
