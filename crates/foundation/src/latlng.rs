use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees (WGS84 / EPSG:4326).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON positions are `[x, y]`, i.e. `[lng, lat]`.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Self::new(*y, *x)),
            _ => None,
        }
    }

    /// Parses free-text coordinate input (e.g. the "go to" form fields).
    pub fn parse(lat: &str, lng: &str) -> Result<Self, CoordinateError> {
        let lat_v = parse_degrees(lat)?;
        let lng_v = parse_degrees(lng)?;
        Ok(Self::new(lat_v, lng_v))
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lat: {:.4}, Lng: {:.4}", self.lat, self.lng)
    }
}

fn parse_degrees(raw: &str) -> Result<f64, CoordinateError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoordinateError::Unparseable(trimmed.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateError {
    Unparseable(String),
    OutOfBounds(LatLng),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::Unparseable(raw) => write!(f, "not a coordinate: {raw:?}"),
            CoordinateError::OutOfBounds(p) => {
                write!(f, "coordinate ({}, {}) is outside the map extent", p.lat, p.lng)
            }
        }
    }
}

impl std::error::Error for CoordinateError {}
