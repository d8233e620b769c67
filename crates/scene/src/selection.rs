//! Rendered result of a feature selection.

use foundation::{GeoBounds, LatLng};
use serde::{Deserialize, Serialize};
use services::FeatureRecord;

use crate::attributes::AttributeTable;

/// Half-width of the box queried around a clicked point, in degrees.
pub const POINT_BUFFER_DEG: f64 = 0.01;
/// Radius of the circle drawn around a clicked point, in meters.
pub const POINT_HIGHLIGHT_RADIUS_M: f64 = 500.0;

/// Area a selection query covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionGeometry {
    Polygon { ring: Vec<LatLng> },
    Point { center: LatLng, buffer_deg: f64 },
}

impl SelectionGeometry {
    pub fn polygon(ring: Vec<LatLng>) -> Self {
        SelectionGeometry::Polygon { ring }
    }

    pub fn point(center: LatLng) -> Self {
        SelectionGeometry::Point {
            center,
            buffer_deg: POINT_BUFFER_DEG,
        }
    }

    /// Query box. `None` for a polygon without vertices.
    pub fn bbox(&self) -> Option<GeoBounds> {
        match self {
            SelectionGeometry::Polygon { ring } => GeoBounds::from_points(ring),
            SelectionGeometry::Point { center, buffer_deg } => {
                Some(GeoBounds::around(*center, *buffer_deg))
            }
        }
    }

    pub fn highlight(&self) -> Highlight {
        match self {
            SelectionGeometry::Polygon { ring } => Highlight::Polygon { ring: ring.clone() },
            SelectionGeometry::Point { center, .. } => Highlight::Circle {
                center: *center,
                radius_m: POINT_HIGHLIGHT_RADIUS_M,
            },
        }
    }
}

/// Shape drawn to show where the user selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Highlight {
    Polygon { ring: Vec<LatLng> },
    Circle { center: LatLng, radius_m: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMarker {
    pub position: LatLng,
    /// `(key, value)` rows; only attributes with a displayable value.
    pub popup: Vec<(String, String)>,
    /// Index into the selection's feature list.
    pub feature_index: usize,
}

/// Highlight, markers and attribute data of one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionLayer {
    pub geometry: SelectionGeometry,
    pub highlight: Highlight,
    pub markers: Vec<FeatureMarker>,
    #[serde(skip)]
    pub features: Vec<FeatureRecord>,
}

impl SelectionLayer {
    /// Features without a usable geometry are counted and tabulated but get
    /// no marker.
    pub fn build(geometry: SelectionGeometry, features: Vec<FeatureRecord>) -> Self {
        let markers = features
            .iter()
            .enumerate()
            .filter_map(|(feature_index, f)| {
                let position = f.representative_point()?;
                Some(FeatureMarker {
                    position,
                    popup: f.display_properties(),
                    feature_index,
                })
            })
            .collect();

        Self {
            highlight: geometry.highlight(),
            geometry,
            markers,
            features,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn summary(&self) -> String {
        summary(self.feature_count())
    }

    pub fn attribute_table(&self) -> AttributeTable {
        AttributeTable::from_features(&self.features)
    }
}

pub fn summary(count: usize) -> String {
    format!("Features Found: {count}")
}
