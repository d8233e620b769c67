//! Selection query engine: selection geometry in, rendered selection out.

use std::sync::Arc;

use runtime::{LoadingIndicator, NoticeBus};
use scene::{SelectionGeometry, SelectionLayer};
use services::{
    FeatureRecord, FeatureService, GetFeature, ResponseError, ServiceError,
    parse_feature_collection,
};
use tracing::{debug, info, warn};

pub const QUERY_FAILED: &str = "Error querying data from GeoServer. Please try again.";

const NOTICE_KIND: &str = "selection";

/// Why a feature query produced no features.
#[derive(Debug)]
pub enum QueryError {
    /// The service could not be reached or its body could not be read.
    Service(ServiceError),
    /// The service answered with something other than features.
    Response(ResponseError),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Service(e) => write!(f, "feature service request failed: {e}"),
            QueryError::Response(e) => write!(f, "feature service response rejected: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Service(e) => Some(e),
            QueryError::Response(e) => Some(e),
        }
    }
}

impl From<ServiceError> for QueryError {
    fn from(e: ServiceError) -> Self {
        QueryError::Service(e)
    }
}

impl From<ResponseError> for QueryError {
    fn from(e: ResponseError) -> Self {
        QueryError::Response(e)
    }
}

/// Issues `request` and decodes the features it returns.
pub async fn fetch_features(
    service: &dyn FeatureService,
    request: &GetFeature,
) -> Result<Vec<FeatureRecord>, QueryError> {
    let body = service.get_feature(request).await?;
    Ok(parse_feature_collection(&body)?)
}

/// Runs polygon and point selections against one WFS feature type.
#[derive(Clone)]
pub struct SelectionEngine {
    service: Arc<dyn FeatureService>,
    type_name: String,
    loading: LoadingIndicator,
}

impl SelectionEngine {
    pub fn new(
        service: Arc<dyn FeatureService>,
        type_name: impl Into<String>,
        loading: LoadingIndicator,
    ) -> Self {
        Self {
            service,
            type_name: type_name.into(),
            loading,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// `None` when the geometry has no extent to query.
    pub fn request_for(&self, geometry: &SelectionGeometry) -> Option<GetFeature> {
        let bbox = geometry.bbox()?;
        Some(GetFeature::geojson(self.type_name.clone()).with_bbox(bbox))
    }

    pub async fn select_by_polygon(
        &self,
        ring: Vec<foundation::LatLng>,
        notices: &mut NoticeBus,
    ) -> SelectionLayer {
        self.select(SelectionGeometry::polygon(ring), notices).await
    }

    pub async fn select_by_point(
        &self,
        point: foundation::LatLng,
        notices: &mut NoticeBus,
    ) -> SelectionLayer {
        self.select(SelectionGeometry::point(point), notices).await
    }

    /// Queries the features inside `geometry`'s bounding box.
    ///
    /// Every failure is reported on `notices` and yields a layer with no
    /// features, so the caller always has something to render.
    pub async fn select(
        &self,
        geometry: SelectionGeometry,
        notices: &mut NoticeBus,
    ) -> SelectionLayer {
        let Some(request) = self.request_for(&geometry) else {
            warn!("selection geometry has no extent; skipping query");
            return SelectionLayer::build(geometry, Vec::new());
        };

        let _loading = self.loading.acquire();
        debug!(url = %self.service.request_url(&request), "selection query");

        let features = match fetch_features(self.service.as_ref(), &request).await {
            Ok(features) => features,
            Err(QueryError::Service(e)) => {
                warn!("selection query failed: {e}");
                notices.error(NOTICE_KIND, QUERY_FAILED);
                Vec::new()
            }
            Err(QueryError::Response(e @ ResponseError::Malformed(_))) => {
                notices.warn(NOTICE_KIND, e.user_message());
                Vec::new()
            }
            Err(QueryError::Response(e)) => {
                notices.error(NOTICE_KIND, e.user_message());
                Vec::new()
            }
        };

        info!(count = features.len(), "selection returned features");
        SelectionLayer::build(geometry, features)
    }
}
