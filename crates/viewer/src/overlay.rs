//! Vector overlay of mineral occurrences, drawn on top of the minerals WMS
//! layer so individual occurrences can be clicked.

use foundation::LatLng;
use layers::{LayerId, MINERAL_TYPE, MarkerStyle, mineral_marker_style, mineral_popup_rows};
use runtime::{LoadingIndicator, NoticeBus};
use serde::Serialize;
use services::{FeatureRecord, FeatureService, GetFeature};
use tracing::{info, warn};

use crate::engine::fetch_features;

pub const MINERALS_LOAD_FAILED: &str =
    "Error loading mineral occurrences data. Please check if GeoServer is running.";

pub const MINERAL_POPUP_TITLE: &str = "Mineral Occurrence";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineralMarker {
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: Vec<(&'static str, String)>,
}

impl MineralMarker {
    pub fn from_feature(feature: &FeatureRecord) -> Option<Self> {
        let position = feature.representative_point()?;
        let mineral_type = feature.display_value(MINERAL_TYPE);
        Some(Self {
            position,
            style: mineral_marker_style(mineral_type.as_deref()),
            popup: mineral_popup_rows(feature),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MineralsOverlay {
    pub markers: Vec<MineralMarker>,
}

impl MineralsOverlay {
    pub fn from_features(features: &[FeatureRecord]) -> Self {
        Self {
            markers: features.iter().filter_map(MineralMarker::from_feature).collect(),
        }
    }

    pub fn request() -> GetFeature {
        GetFeature::geojson(LayerId::Minerals.type_name())
    }

    /// Fetches every mineral occurrence. On failure a notice is raised and
    /// `None` is returned.
    pub async fn load(
        service: &dyn FeatureService,
        loading: &LoadingIndicator,
        notices: &mut NoticeBus,
    ) -> Option<Self> {
        let _loading = loading.acquire();
        match fetch_features(service, &Self::request()).await {
            Ok(features) => {
                let overlay = Self::from_features(&features);
                info!(markers = overlay.markers.len(), "minerals overlay loaded");
                Some(overlay)
            }
            Err(e) => {
                warn!("minerals overlay failed: {e}");
                notices.error("minerals", MINERALS_LOAD_FAILED);
                None
            }
        }
    }
}
