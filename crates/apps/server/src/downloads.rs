//! Whole-layer exports proxied from the WFS endpoint.

use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use layers::{DownloadFormat, LayerDownload, LayerId};
use services::FeatureService;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

pub fn parse_download(layer: &str, format: &str) -> Result<LayerDownload, ApiError> {
    let layer: LayerId = layer
        .parse()
        .map_err(|e: layers::UnknownName| ApiError::BadRequest(e.to_string()))?;
    let format: DownloadFormat = format
        .parse()
        .map_err(|e: layers::UnknownName| ApiError::BadRequest(e.to_string()))?;
    Ok(LayerDownload::new(layer, format))
}

pub async fn download_layer(
    State(state): State<AppState>,
    AxumPath((layer, format)): AxumPath<(String, String)>,
) -> Result<Response, ApiError> {
    let download = parse_download(&layer, &format)?;
    let url = state.features.request_url(&download.request());
    info!(%url, "layer download");

    let resp = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        warn!("download upstream returned {status}");
        return Err(ApiError::Upstream(format!("GeoServer returned {status}")));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static(download.format.content_type()),
    );
    let disposition = format!("attachment; filename=\"{}\"", download.file_name());
    if let Ok(v) = HeaderValue::from_str(&disposition) {
        headers.insert(http::header::CONTENT_DISPOSITION, v);
    }
    // Exports can be large; relay the upstream body as it arrives.
    let body = Body::from_stream(resp.bytes_stream());
    Ok((StatusCode::OK, headers, body).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path as AxumPath, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use layers::{DownloadFormat, LayerId};
    use services::{HttpFeatureService, HttpGeocoder};
    use viewer::ViewerConfig;

    use super::{download_layer, parse_download};
    use crate::error::ApiError;
    use crate::sessions::SessionStore;
    use crate::AppState;

    fn state(wfs_url: String) -> AppState {
        let http = reqwest::Client::new();
        AppState {
            config: Arc::new(ViewerConfig::default()),
            sessions: Arc::new(SessionStore::new()),
            features: Arc::new(HttpFeatureService::new(http.clone(), wfs_url)),
            geocoder: Arc::new(HttpGeocoder::new(http.clone(), "http://127.0.0.1:9/search")),
            http,
        }
    }

    #[test]
    fn parses_path_segments() {
        let d = parse_download("regions", "csv").unwrap();
        assert_eq!(d.layer, LayerId::Regions);
        assert_eq!(d.format, DownloadFormat::Csv);
        assert_eq!(d.file_name(), "regions_data.csv");
    }

    #[test]
    fn unknown_format_is_bad_request() {
        assert!(matches!(
            parse_download("regions", "kml"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn export_is_relayed_as_attachment() {
        let upstream = Router::new().route("/wfs", get(|| async { "id,name\n1,Khomas\n" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, upstream).await });

        let resp = download_layer(
            State(state(format!("http://{addr}/wfs"))),
            AxumPath(("regions".to_string(), "csv".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            resp.headers()[http::header::CONTENT_DISPOSITION],
            "attachment; filename=\"regions_data.csv\""
        );
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"id,name\n1,Khomas\n");
    }
}
