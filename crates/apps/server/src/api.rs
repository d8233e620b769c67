//! JSON API driving the per-tab sessions.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use foundation::GeoBounds;
use layers::{Basemap, GeologyFilter, LayerId, LayerVisibility, Legend, WmsLayer};
use runtime::Notice;
use scene::{AttributeTable, MapEvent, ToolMode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use services::{FeatureService, Geocoder};
use uuid::Uuid;
use viewer::{
    BasemapView, GeolocationOptions, LocationReport, Registration, SessionSnapshot,
};

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct ClientConfig {
    pub wms_url: String,
    pub wfs_url: String,
    pub bounds: GeoBounds,
    pub layers: Vec<WmsLayer>,
    pub basemaps: Vec<BasemapView>,
    pub geolocation: GeolocationOptions,
    pub tools: Vec<ToolButton>,
}

#[derive(Debug, Serialize)]
pub struct ToolButton {
    pub mode: ToolMode,
    pub buttons: &'static [&'static str],
}

pub async fn get_config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(ClientConfig {
        wms_url: state.config.wms_url.clone(),
        wfs_url: state.config.wfs_url.clone(),
        bounds: GeoBounds::NAMIBIA,
        layers: LayerId::ALL.into_iter().map(WmsLayer::for_layer).collect(),
        basemaps: Basemap::ALL.into_iter().map(BasemapView::of).collect(),
        geolocation: GeolocationOptions::default(),
        tools: ToolMode::ALL
            .into_iter()
            .filter(|m| *m != ToolMode::None)
            .map(|mode| ToolButton {
                mode,
                buttons: mode.indicators(),
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct LegendQuery {
    /// Comma-separated layer ids.
    #[serde(default)]
    pub layers: String,
    #[serde(default)]
    pub geology: Option<String>,
}

/// Stateless legend projection for arbitrary visibility flags.
pub async fn get_legend(Query(q): Query<LegendQuery>) -> ApiResult<Legend> {
    let mut visibility = LayerVisibility::default();
    for name in q.layers.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id: LayerId = name
            .parse()
            .map_err(|e: layers::UnknownName| ApiError::BadRequest(e.to_string()))?;
        visibility.set(id, true);
    }
    let filter = match q.geology.as_deref() {
        Some(raw) => raw
            .parse()
            .map_err(|e: layers::UnknownName| ApiError::BadRequest(e.to_string()))?,
        None => GeologyFilter::All,
    };
    Ok(Json(layers::legend::render(&visibility, filter)))
}

#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub id: Uuid,
    pub session: SessionSnapshot,
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<CreatedSession>) {
    let features: Arc<dyn FeatureService> = state.features.clone();
    let geocoder: Arc<dyn Geocoder> = state.geocoder.clone();
    let (id, session) = state.sessions.create(&state.config, features, geocoder);
    let snapshot = session.lock().await.snapshot(Instant::now());
    (
        StatusCode::CREATED,
        Json(CreatedSession {
            id,
            session: snapshot,
        }),
    )
}

pub async fn get_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let s = session.lock().await;
    Ok(Json(s.snapshot(Instant::now())))
}

pub async fn delete_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

#[derive(Debug, Deserialize)]
pub struct ToolRequest {
    pub mode: ToolMode,
}

pub async fn set_tool(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<ToolRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.activate_tool(req.mode);
    Ok(Json(s.snapshot(Instant::now())))
}

pub async fn post_event(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(event): Json<MapEvent>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.handle_event(event).await;
    Ok(Json(s.snapshot(Instant::now())))
}

#[derive(Debug, Deserialize)]
pub struct LayerRequest {
    pub layer: Option<LayerId>,
    pub visible: Option<bool>,
    pub geology_filter: Option<GeologyFilter>,
}

pub async fn set_layers(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<LayerRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    match (req.layer, req.visible) {
        (Some(layer), Some(visible)) => s.set_layer_visible(layer, visible).await,
        (None, None) => {}
        _ => {
            return Err(ApiError::BadRequest(
                "layer and visible must be given together".to_string(),
            ))
        }
    }
    if let Some(filter) = req.geology_filter {
        s.set_geology_filter(filter);
    }
    Ok(Json(s.snapshot(Instant::now())))
}

#[derive(Debug, Deserialize)]
pub struct BasemapRequest {
    pub basemap: Basemap,
}

pub async fn set_basemap(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<BasemapRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.set_basemap(req.basemap);
    Ok(Json(s.snapshot(Instant::now())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAction {
    ZoomIn,
    ZoomOut,
    FullExtent,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub action: ViewAction,
}

pub async fn change_view(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<ViewRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    match req.action {
        ViewAction::ZoomIn => s.zoom_in(),
        ViewAction::ZoomOut => s.zoom_out(),
        ViewAction::FullExtent => s.full_extent(),
    }
    Ok(Json(s.snapshot(Instant::now())))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

pub async fn search(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.search(&req.query).await;
    Ok(Json(s.snapshot(Instant::now())))
}

#[derive(Debug, Deserialize)]
pub struct SearchSelectRequest {
    pub index: usize,
}

pub async fn select_search_result(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<SearchSelectRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    let now = Instant::now();
    if s.select_search_result(req.index, now).is_none() {
        return Err(ApiError::BadRequest(format!(
            "no search result at index {}",
            req.index
        )));
    }
    Ok(Json(s.snapshot(now)))
}

/// Form fields arrive as typed text, but numbers are accepted too.
#[derive(Debug, Deserialize)]
pub struct GotoRequest {
    pub lat: Value,
    pub lng: Value,
}

fn field_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub async fn go_to(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<GotoRequest>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    // A rejected target is reported as a notice, not an HTTP error.
    let _ = s.go_to(&field_text(&req.lat), &field_text(&req.lng));
    Ok(Json(s.snapshot(Instant::now())))
}

pub async fn locate(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(report): Json<LocationReport>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.report_location(report);
    Ok(Json(s.snapshot(Instant::now())))
}

pub async fn clear_map(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.clear_map();
    Ok(Json(s.snapshot(Instant::now())))
}

pub async fn clear_selection(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<SessionSnapshot> {
    let session = state.sessions.get(id)?;
    let mut s = session.lock().await;
    s.clear_selection();
    Ok(Json(s.snapshot(Instant::now())))
}

pub async fn get_attributes(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> ApiResult<Option<AttributeTable>> {
    let session = state.sessions.get(id)?;
    let s = session.lock().await;
    Ok(Json(s.attribute_table()))
}

#[derive(Debug, Deserialize)]
pub struct NoticesQuery {
    #[serde(default)]
    pub since: u64,
}

pub async fn get_notices(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Query(q): Query<NoticesQuery>,
) -> ApiResult<Vec<Notice>> {
    let session = state.sessions.get(id)?;
    let s = session.lock().await;
    Ok(Json(s.notices_since(q.since).to_vec()))
}

pub async fn register(Json(form): Json<Registration>) -> impl IntoResponse {
    match form.validate() {
        Ok(message) => (StatusCode::OK, Json(json!({ "message": message }))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

#[cfg(test)]
mod tests {
    use super::{field_text, get_legend, LegendQuery};
    use axum::extract::Query;
    use serde_json::json;

    #[test]
    fn goto_fields_accept_text_and_numbers() {
        assert_eq!(field_text(&json!("-22.5")), "-22.5");
        assert_eq!(field_text(&json!(17.0)), "17.0");
    }

    #[tokio::test]
    async fn legend_from_query() {
        let legend = get_legend(Query(LegendQuery {
            layers: "geology, roads".to_string(),
            geology: Some("faults".to_string()),
        }))
        .await
        .unwrap();
        let labels: Vec<&str> = legend.0.entries.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Roads", "Faults and Lineaments"]);
    }

    #[tokio::test]
    async fn legend_rejects_unknown_layer() {
        let err = get_legend(Query(LegendQuery {
            layers: "lakes".to_string(),
            geology: None,
        }))
        .await
        .unwrap_err();
        assert!(err.to_string().contains("lakes"));
    }
}
