//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `submission::AppError`.

use anyhow::Context;
use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use platform::mail::{SmtpMailer, SmtpSettings};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use submission::presentation::middleware::EDIT_TOKEN_HEADER;
use submission::{
    MailNotifier, PgSubmissionStore, ReconcileUseCase, SubmissionConfig, SubmissionKind,
    submission_router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Read a base64 32-byte secret; debug builds fall back to a random one
fn load_secret(name: &str) -> anyhow::Result<[u8; 32]> {
    let Ok(secret_b64) = env::var(name) else {
        if cfg!(debug_assertions) {
            tracing::warn!(variable = name, "Secret not set, using a random one");
            return Ok(platform::crypto::random_secret());
        }
        anyhow::bail!("{name} must be set in production");
    };

    let bytes = platform::crypto::from_base64(secret_b64.trim())
        .with_context(|| format!("{name} is not valid base64"))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("{name} must decode to exactly 32 bytes"))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{name} has an invalid value")),
        Err(_) => Ok(None),
    }
}

fn load_submission_config() -> anyhow::Result<SubmissionConfig> {
    let defaults = SubmissionConfig::default();
    let days = |d: u64| Duration::from_secs(d * 24 * 3600);

    Ok(SubmissionConfig {
        edit_token_secret: load_secret("EDIT_TOKEN_SECRET")?,
        account_token_secret: load_secret("ACCOUNT_TOKEN_SECRET")?,
        edit_token_ttl: env_parse("EDIT_TOKEN_TTL_DAYS")?
            .map(days)
            .unwrap_or(defaults.edit_token_ttl),
        min_content_chars: env_parse("MIN_CONTENT_CHARS")?.unwrap_or(defaults.min_content_chars),
        sponsored_min_budget: env_parse("SPONSORED_MIN_BUDGET")?
            .unwrap_or(defaults.sponsored_min_budget),
        sponsored_approval_window: env_parse("SPONSORED_APPROVAL_WINDOW_DAYS")?
            .map(days)
            .unwrap_or(defaults.sponsored_approval_window),
        site_url: env::var("SITE_URL").unwrap_or(defaults.site_url),
        blocked_link_hosts: env::var("BLOCKED_LINK_HOSTS")
            .map(|hosts| {
                hosts
                    .split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        default_rejection_reason: env::var("DEFAULT_REJECTION_REASON")
            .ok()
            .filter(|r| !r.trim().is_empty()),
        ..defaults
    })
}

fn load_notifier() -> anyhow::Result<MailNotifier> {
    let Ok(host) = env::var("SMTP_HOST") else {
        tracing::warn!("SMTP_HOST not set, notifications will only be logged");
        return Ok(MailNotifier::LogOnly);
    };

    let settings = SmtpSettings {
        host,
        port: env_parse("SMTP_PORT")?.unwrap_or(587),
        username: env::var("SMTP_USERNAME").ok(),
        password: env::var("SMTP_PASSWORD").ok(),
        encryption: env::var("SMTP_ENCRYPTION").unwrap_or_else(|_| "starttls".to_string()),
        from: env::var("MAIL_FROM").context("MAIL_FROM must be set when SMTP_HOST is")?,
    };
    Ok(MailNotifier::Smtp(SmtpMailer::new(&settings)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,submission=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let config = load_submission_config()?;
    let notifier = load_notifier()?;
    let store = PgSubmissionStore::new(pool.clone());

    // Startup repair: link interrupted publishes, expire stale sponsored approvals.
    // Errors here should not prevent server startup
    let reconcile = ReconcileUseCase::new(Arc::new(store.clone()), Arc::new(config.clone()));
    match reconcile.execute().await {
        Ok(report) => {
            tracing::info!(
                relinked = report.relinked,
                expired = report.expired,
                "Submission reconciliation completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Submission reconciliation failed, continuing anyway"
            );
        }
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(EDIT_TOKEN_HEADER),
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/guest-posts",
            submission_router(
                SubmissionKind::Guest,
                store.clone(),
                notifier.clone(),
                config.clone(),
            ),
        )
        .nest(
            "/api/sponsored-posts",
            submission_router(SubmissionKind::Sponsored, store, notifier, config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr =
        env_parse("BIND_ADDR")?.unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 31113)));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
