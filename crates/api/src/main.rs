use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use insights_core::domain::insight::Insight;
use insights_core::llm::InsightAnalyzer;
use insights_core::news::HeadlineSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = insights_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState {
        headlines: insights_core::news::source_from_settings(&settings)?,
        analyzer: insights_core::llm::analyzer_from_settings(&settings)?,
    };

    tracing::info!(
        headline_source = state.headlines.source_name(),
        analyzer = state.analyzer.provider_name(),
        "resolved upstream clients"
    );

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    // Wide open for local frontend development; restrict the allowed origins
    // before any production deployment.
    Router::new()
        .route("/", get(health))
        .route("/analyze", post(analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

#[derive(Clone)]
struct AppState {
    headlines: Arc<dyn HeadlineSource>,
    analyzer: Arc<dyn InsightAnalyzer>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        message: "AI Trading Insights API",
    })
}

async fn analyze(State(state): State<AppState>) -> Result<Json<Vec<Insight>>, ApiError> {
    let headlines = state
        .headlines
        .fetch_headlines()
        .await
        .context("failed to fetch headlines")?;

    if headlines.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let insights = state
        .analyzer
        .analyze_headlines(&headlines)
        .await
        .context("headline analysis failed")?;

    Ok(Json(insights))
}

/// Any pipeline failure becomes a 500 with the error's context chain as the
/// `detail` string.
#[derive(Debug)]
struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        sentry_anyhow::capture_anyhow(&self.0);
        tracing::error!(error = %self.0, "analyze request failed");
        let body = ErrorBody {
            detail: format!("{:#}", self.0),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &insights_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
