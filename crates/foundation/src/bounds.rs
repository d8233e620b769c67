use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;

/// Axis-aligned lat/lng bounding box.
///
/// Bounds are inclusive on every edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Extent of Namibia used to clamp the map and validate user coordinates.
    pub const NAMIBIA: GeoBounds = GeoBounds {
        south: -28.965186,
        west: 11.747095,
        north: -16.956243,
        east: 25.264435,
    };

    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Minimal box enclosing every point. `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Self::new(first.lat, first.lng, first.lat, first.lng);
        for p in it {
            b.south = b.south.min(p.lat);
            b.north = b.north.max(p.lat);
            b.west = b.west.min(p.lng);
            b.east = b.east.max(p.lng);
        }
        Some(b)
    }

    /// Square box of `buffer_deg` degrees on each side of `center`.
    pub fn around(center: LatLng, buffer_deg: f64) -> Self {
        Self::new(
            center.lat - buffer_deg,
            center.lng - buffer_deg,
            center.lat + buffer_deg,
            center.lng + buffer_deg,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) * 0.5,
            (self.west + self.east) * 0.5,
        )
    }

    /// WFS 1.0.0 `bbox` parameter value in south,west,north,east axis order.
    pub fn wfs_bbox(&self) -> String {
        format!(
            "{},{},{},{},EPSG:4326",
            self.south, self.west, self.north, self.east
        )
    }

    /// Geocoder `viewbox` parameter value (west,south,east,north).
    pub fn viewbox(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}
