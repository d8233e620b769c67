use foundation::LatLng;
use foundation::math::{METERS_PER_KM, SQ_METERS_PER_SQ_KM, geodesic_area_m2, path_length_m};
use serde::Serialize;

use crate::surface::ShapeKind;

/// Result of measuring a drawn shape.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measurement {
    Area { km2: f64 },
    Distance { km: f64 },
}

impl Measurement {
    pub fn of_shape(shape: ShapeKind, vertices: &[LatLng]) -> Self {
        match shape {
            ShapeKind::Polygon => Measurement::Area {
                km2: geodesic_area_m2(vertices) / SQ_METERS_PER_SQ_KM,
            },
            ShapeKind::Polyline => Measurement::Distance {
                km: path_length_m(vertices) / METERS_PER_KM,
            },
        }
    }

    /// The measure control reports an area once the path closes at least
    /// three points, a distance otherwise.
    pub fn of_measure_path(points: &[LatLng]) -> Self {
        if points.len() >= 3 {
            Self::of_shape(ShapeKind::Polygon, points)
        } else {
            Self::of_shape(ShapeKind::Polyline, points)
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Measurement::Area { km2 } => write!(f, "Area: {km2:.2} km²"),
            Measurement::Distance { km } => write!(f, "Distance: {km:.2} km"),
        }
    }
}

/// Text box showing the latest measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementReadout {
    pub visible: bool,
    pub text: String,
}

impl MeasurementReadout {
    pub const MEASURING: &'static str = "Measuring...";

    /// Shown empty when the measure tool is switched on.
    pub fn open(&mut self) {
        self.visible = true;
        self.text.clear();
    }

    pub fn show_measuring(&mut self) {
        self.visible = true;
        self.text = Self::MEASURING.to_string();
    }

    pub fn show(&mut self, measurement: Measurement) {
        self.visible = true;
        self.text = measurement.to_string();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.text.clear();
    }
}
