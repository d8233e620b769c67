use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use services::{http_client, HttpFeatureService, HttpGeocoder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{env_var_string, env_var_u64, ViewerConfig};

mod api;
mod downloads;
mod error;
mod sessions;

use sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ViewerConfig>,
    pub sessions: Arc<SessionStore>,
    pub features: Arc<HttpFeatureService>,
    pub geocoder: Arc<HttpGeocoder>,
    pub http: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ViewerConfig::from_env();
    let addr: SocketAddr = env_var_string("VIEWER_ADDR", "127.0.0.1:5000").parse()?;
    let frontend_dir = PathBuf::from(env_var_string("FRONTEND_DIR", "frontend"));
    let session_idle = Duration::from_secs(env_var_u64("SESSION_IDLE_SECS", 1800));

    let http = http_client(config.request_timeout)?;
    let state = AppState {
        features: Arc::new(HttpFeatureService::new(http.clone(), config.wfs_url.clone())),
        geocoder: Arc::new(HttpGeocoder::new(http.clone(), config.geocoder_url.clone())),
        config: Arc::new(config),
        sessions: Arc::new(SessionStore::new()),
        http,
    };

    tokio::spawn(sweep_sessions(Arc::clone(&state.sessions), session_idle));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    let app = router(state.clone())
        .fallback_service(ServeDir::new(&frontend_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    info!(
        wfs = %state.config.wfs_url,
        frontend = %frontend_dir.display(),
        "viewer server listening on http://{addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/config", get(api::get_config))
        .route("/api/legend", get(api::get_legend))
        .route("/api/register", post(api::register))
        .route("/api/download/:layer/:format", get(downloads::download_layer))
        .route("/api/sessions", post(api::create_session))
        .route(
            "/api/sessions/:id",
            get(api::get_session).delete(api::delete_session),
        )
        .route("/api/sessions/:id/tool", post(api::set_tool))
        .route("/api/sessions/:id/events", post(api::post_event))
        .route("/api/sessions/:id/layers", post(api::set_layers))
        .route("/api/sessions/:id/basemap", post(api::set_basemap))
        .route("/api/sessions/:id/view", post(api::change_view))
        .route("/api/sessions/:id/search", post(api::search))
        .route(
            "/api/sessions/:id/search/select",
            post(api::select_search_result),
        )
        .route("/api/sessions/:id/goto", post(api::go_to))
        .route("/api/sessions/:id/locate", post(api::locate))
        .route("/api/sessions/:id/clear", post(api::clear_map))
        .route(
            "/api/sessions/:id/selection/clear",
            post(api::clear_selection),
        )
        .route("/api/sessions/:id/attributes", get(api::get_attributes))
        .route("/api/sessions/:id/notices", get(api::get_notices))
        .with_state(state)
}

/// Evicts sessions whose tab went away without a `DELETE`.
async fn sweep_sessions(sessions: Arc<SessionStore>, max_idle: Duration) {
    let mut ticker = tokio::time::interval((max_idle / 4).max(Duration::from_secs(1)));
    loop {
        ticker.tick().await;
        let evicted = sessions.evict_idle(max_idle, Instant::now());
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "idle sessions evicted");
        }
    }
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}
