//! ODR Lab Platform API
//!
//! The entry point for all external API requests.
//! Handles:
//! - Authentication and session issuance
//! - Idea submission and moderation
//! - Discussion (comments and likes)
//! - Collaboration and mentorship
//! - Video-room token issuance
//! - Observability (logging, metrics, tracing)

mod extract;
mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use odrlab_common::{
    auth::JwtManager, config::AppConfig, db::DbPool, errors::AppError, metrics,
    video::JaasTokenIssuer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn, Level};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub jwt: Arc<JwtManager>,
    /// Absent when the video provider is not configured for this deployment
    pub video: Option<Arc<JaasTokenIssuer>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting ODR Lab API v{}", odrlab_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Session signing is mandatory; refuse to serve unauthenticated tokens.
    let session_secret = config
        .auth
        .session_secret
        .as_deref()
        .ok_or(AppError::Configuration {
            message: "auth.session_secret is not configured".to_string(),
        })?;
    let jwt = Arc::new(JwtManager::new(session_secret, config.auth.session_ttl_secs));

    // The video provider is optional; token issuance reports the gap per request.
    let video = match JaasTokenIssuer::from_config(&config.video) {
        Ok(issuer) => Some(Arc::new(issuer)),
        Err(e) => {
            warn!(error = %e, "Video provider not configured; meeting tokens disabled");
            None
        }
    };

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port > 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Metrics listener on {}", metrics_addr);
    }

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Apply pending schema migrations
    sqlx::migrate!("../../migrations")
        .run(db.primary.get_postgres_connection_pool())
        .await?;

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        jwt,
        video,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        // Credential and session endpoints
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/session", get(handlers::auth::session))
        // Profile endpoints
        .route("/users/me", get(handlers::profile::get_me))
        .route("/users/me", put(handlers::profile::update_me))
        // Submission endpoints
        .route("/submit-idea", post(handlers::submissions::submit_idea))
        .route("/submissions/mine", get(handlers::submissions::my_submissions))
        // Moderation endpoints
        .route("/admin/ideas/pending", get(handlers::moderation::pending_submissions))
        .route("/admin/approve-idea", post(handlers::moderation::approve_submission))
        .route("/admin/reject-idea", post(handlers::moderation::reject_submission))
        // Legacy direct-approval alias; same transition underneath
        .route("/admin/ideas/{id}/approve", post(handlers::moderation::approve_idea_direct))
        // Published idea endpoints
        .route("/ideas/approved", get(handlers::ideas::list_approved))
        .route("/ideas/{id}", get(handlers::ideas::get_idea))
        .route("/ideas/{id}", put(handlers::ideas::update_idea))
        .route("/ideas/{id}", delete(handlers::ideas::delete_idea))
        // Discussion endpoints
        .route(
            "/ideas/{id}/comments",
            get(handlers::comments::list_comments).post(handlers::comments::post_comment),
        )
        .route("/ideas/{id}/like", post(handlers::likes::toggle_idea_like))
        .route("/ideas/{id}/like/check", get(handlers::likes::check_idea_like))
        .route("/comments/{id}/like", post(handlers::likes::toggle_comment_like))
        // Collaboration endpoints
        .route(
            "/collaboration/{idea_id}/join-collaborator",
            post(handlers::collaboration::join_collaborator),
        )
        .route(
            "/collaboration/{idea_id}/leave-collaborator",
            delete(handlers::collaboration::leave_collaborator),
        )
        .route(
            "/collaboration/{idea_id}/request-mentor",
            post(handlers::collaboration::request_mentor),
        )
        .route(
            "/collaboration/{idea_id}/leave-mentor",
            delete(handlers::collaboration::leave_mentor),
        )
        // Meeting endpoints
        .route("/meetings/{id}/jaas-token", get(handlers::meetings::jaas_token))
        .route(
            "/ideas/{id}/meetings",
            get(handlers::meetings::list_meetings).post(handlers::meetings::schedule_meeting),
        );

    // Compose the app
    routes
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
