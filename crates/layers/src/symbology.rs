use serde::{Deserialize, Serialize};
use services::FeatureRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Hexagon,
}

/// Marker appearance for a point feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub shape: PointShape,
    pub size_px: u8,
}

impl MarkerStyle {
    pub const fn new(color: &'static str, shape: PointShape) -> Self {
        Self {
            color,
            shape,
            size_px: 12,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::new("#000000", PointShape::Circle)
    }
}

/// Property carrying the free-text mineral classification.
pub const MINERAL_TYPE: &str = "MINERAL_TYPE";

/// Picks a marker style from a `MINERAL_TYPE` value by keyword.
///
/// The first matching group wins, so "gold-copper" styles as gold.
pub fn mineral_marker_style(mineral_type: Option<&str>) -> MarkerStyle {
    let Some(raw) = mineral_type else {
        return MarkerStyle::default();
    };
    let t = raw.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| t.contains(w));

    if has(&["gold", "precious"]) {
        MarkerStyle::new("#ffd700", PointShape::Star)
    } else if has(&["copper", "base"]) {
        MarkerStyle::new("#ff9900", PointShape::Square)
    } else if has(&["diamond", "gem"]) {
        MarkerStyle::new("#00ffff", PointShape::Diamond)
    } else if has(&["uranium", "nuclear"]) {
        MarkerStyle::new("#00ff00", PointShape::Hexagon)
    } else {
        MarkerStyle::default()
    }
}

/// Attribute keys shown in a mineral occurrence popup, with their labels.
pub const MINERAL_POPUP_FIELDS: [(&str, &str); 8] = [
    ("MINERAL_TYPE", "Mineral Type"),
    ("DEPOSIT_TYPE", "Deposit Type"),
    ("COMMODITY", "Commodity"),
    ("STATUS", "Status"),
    ("REGION", "Region"),
    ("DISTRICT", "District"),
    ("LOCATION", "Location"),
    ("COMMENTS", "Comments"),
];

/// `(label, value)` rows of a mineral occurrence popup; empty fields are left out.
pub fn mineral_popup_rows(feature: &FeatureRecord) -> Vec<(&'static str, String)> {
    MINERAL_POPUP_FIELDS
        .iter()
        .filter_map(|(key, label)| feature.display_value(key).map(|v| (*label, v)))
        .collect()
}
