//! Markers placed by search, "go to" and geolocation.

use std::time::{Duration, Instant};

use foundation::{CoordinateError, GeoBounds, LatLng};
use serde::{Deserialize, Serialize};
use services::Place;

pub const SEARCH_HIGHLIGHT_RADIUS_M: f64 = 5_000.0;
pub const SEARCH_HIGHLIGHT_TTL: Duration = Duration::from_secs(5);
pub const CUSTOM_LOCATION: &str = "Custom Location";

pub const QUERY_TOO_SHORT: &str = "Please enter a place name to search";
pub const NO_RESULTS: &str = "No results found";
pub const COORDINATES_OUT_OF_RANGE: &str = "Please enter valid coordinates within Namibia:\n\
     Latitude between -28.965186 and -16.956243\n\
     Longitude between 11.747095 and 25.264435";

/// Marker for a chosen search result or typed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMarker {
    pub position: LatLng,
    pub title: String,
    pub kind: Option<String>,
    highlight_until: Option<Instant>,
}

impl SearchMarker {
    /// Search results get a highlight circle that expires after
    /// [`SEARCH_HIGHLIGHT_TTL`].
    pub fn for_place(place: &Place, now: Instant) -> Self {
        Self {
            position: place.position(),
            title: place.display_name.clone(),
            kind: place.kind.clone(),
            highlight_until: Some(now + SEARCH_HIGHLIGHT_TTL),
        }
    }

    pub fn custom(position: LatLng) -> Self {
        Self {
            position,
            title: CUSTOM_LOCATION.to_string(),
            kind: None,
            highlight_until: None,
        }
    }

    pub fn highlight_visible(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }

    pub fn popup_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            format!("Latitude: {:.6}", self.position.lat),
            format!("Longitude: {:.6}", self.position.lng),
        ];
        if let Some(kind) = &self.kind {
            lines.push(format!("Type: {kind}"));
        }
        lines
    }

    pub fn snapshot(&self, now: Instant) -> SearchMarkerView {
        SearchMarkerView {
            position: self.position,
            popup: self.popup_lines(),
            highlight_radius_m: self
                .highlight_visible(now)
                .then_some(SEARCH_HIGHLIGHT_RADIUS_M),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMarkerView {
    pub position: LatLng,
    pub popup: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_radius_m: Option<f64>,
}

/// Parses "go to" input and checks it against the Namibia extent.
pub fn parse_target(lat: &str, lng: &str) -> Result<LatLng, CoordinateError> {
    let p = LatLng::parse(lat, lng)?;
    if GeoBounds::NAMIBIA.contains(p) {
        Ok(p)
    } else {
        Err(CoordinateError::OutOfBounds(p))
    }
}

/// Options passed to the browser's geolocation request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    /// Milliseconds.
    pub timeout: u64,
    /// Milliseconds.
    pub maximum_age: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: 10_000,
            maximum_age: 60_000,
        }
    }
}

pub const MIN_ACCURACY_RADIUS_M: f64 = 100.0;
pub const OUTSIDE_NAMIBIA: &str =
    "Your location is outside Namibia. The app is focused on Namibia only.";

/// What the browser's geolocation request produced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationReport {
    Fix {
        lat: f64,
        lng: f64,
        accuracy_m: f64,
    },
    Error {
        message: String,
    },
    Unsupported,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LocationMarker {
    pub position: LatLng,
    pub accuracy_m: f64,
}

impl LocationMarker {
    pub fn new(position: LatLng, accuracy_m: f64) -> Self {
        Self {
            position,
            accuracy_m,
        }
    }

    pub fn circle_radius_m(&self) -> f64 {
        self.accuracy_m.max(MIN_ACCURACY_RADIUS_M)
    }

    pub fn popup(&self) -> String {
        format!("Your location (Accuracy: {}m)", self.accuracy_m.round())
    }
}
