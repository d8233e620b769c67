//! Place search against a Nominatim-compatible geocoder.

use foundation::{GeoBounds, LatLng};
use serde::{Deserialize, Deserializer, Serialize};

/// Queries shorter than this (after trimming) are not sent.
pub const MIN_QUERY_CHARS: usize = 2;

/// A geocoding candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    #[serde(deserialize_with = "de_degrees")]
    pub lat: f64,
    #[serde(deserialize_with = "de_degrees")]
    pub lon: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Place {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

/// Nominatim sends coordinates as strings; other services send numbers.
fn de_degrees<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Degrees::deserialize(d)? {
        Degrees::Number(v) => Ok(v),
        Degrees::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Returns the trimmed query if it is long enough to search for.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let q = raw.trim();
    (q.chars().count() >= MIN_QUERY_CHARS).then_some(q)
}

/// A bounded free-text place search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearch {
    pub query: String,
    pub viewbox: GeoBounds,
    pub country_codes: String,
    pub limit: u32,
}

impl PlaceSearch {
    pub fn namibia(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            viewbox: GeoBounds::NAMIBIA,
            country_codes: "na".to_string(),
            limit: 10,
        }
    }

    /// Query-string parameters, unencoded.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "json".to_string()),
            ("q", self.query.clone()),
            ("viewbox", self.viewbox.viewbox()),
            ("bounded", "1".to_string()),
            ("countrycodes", self.country_codes.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

pub fn parse_places(body: &str) -> Result<Vec<Place>, serde_json::Error> {
    serde_json::from_str(body)
}

struct GazetteerEntry {
    name: &'static str,
    lat: f64,
    lon: f64,
    kind: &'static str,
}

const fn entry(name: &'static str, lat: f64, lon: f64, kind: &'static str) -> GazetteerEntry {
    GazetteerEntry {
        name,
        lat,
        lon,
        kind,
    }
}

/// Major places, used when the geocoder is unreachable.
const GAZETTEER: &[GazetteerEntry] = &[
    entry("Windhoek, Namibia", -22.5609, 17.0658, "capital"),
    entry("Swakopmund, Namibia", -22.6708, 14.5686, "city"),
    entry("Walvis Bay, Namibia", -22.9576, 14.5053, "city"),
    entry("Rundu, Namibia", -17.9333, 19.7667, "city"),
    entry("Oshakati, Namibia", -17.7833, 15.6833, "town"),
    entry("Katima Mulilo, Namibia", -17.5000, 24.2667, "town"),
    entry("Etosha National Park, Namibia", -18.9667, 15.9000, "park"),
    entry("Sossusvlei, Namibia", -24.7333, 15.3667, "attraction"),
    entry("Fish River Canyon, Namibia", -27.5833, 17.5833, "attraction"),
    entry("Lüderitz, Namibia", -26.6478, 15.1539, "town"),
    entry("Tsumeb, Namibia", -19.2500, 17.7167, "town"),
    entry("Grootfontein, Namibia", -19.5667, 18.1167, "town"),
    entry("Keetmanshoop, Namibia", -26.5769, 18.1456, "town"),
    entry("Otjiwarongo, Namibia", -20.4639, 16.6478, "town"),
    entry("Okahandja, Namibia", -21.9833, 16.9167, "town"),
    entry("Rehoboth, Namibia", -23.3167, 17.0833, "town"),
    entry("Gobabis, Namibia", -22.4500, 18.9667, "town"),
    entry("Mariental, Namibia", -24.6333, 17.9667, "town"),
    entry("Opuwo, Namibia", -18.0500, 13.8333, "town"),
    entry("Outjo, Namibia", -20.1167, 16.1500, "town"),
];

/// Case-insensitive substring search over the embedded gazetteer.
pub fn fallback_search(query: &str) -> Vec<Place> {
    let needle = query.to_lowercase();
    GAZETTEER
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .map(|e| Place {
            display_name: e.name.to_string(),
            lat: e.lat,
            lon: e.lon,
            kind: Some(e.kind.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PlaceSearch, fallback_search, normalize_query, parse_places};
    use pretty_assertions::assert_eq;

    #[test]
    fn nominatim_string_coordinates() {
        let body = r#"[{"place_id":1,"display_name":"Windhoek, Khomas Region, Namibia",
            "lat":"-22.5749","lon":"17.0805","type":"city","importance":0.7}]"#;
        let places = parse_places(body).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].lat, -22.5749);
        assert_eq!(places[0].lon, 17.0805);
        assert_eq!(places[0].kind.as_deref(), Some("city"));
    }

    #[test]
    fn numeric_coordinates_and_missing_type() {
        let places = parse_places(r#"[{"display_name":"X","lat":-20.0,"lon":15}]"#).unwrap();
        assert_eq!(places[0].lon, 15.0);
        assert_eq!(places[0].kind, None);
    }

    #[test]
    fn fallback_is_case_insensitive_substring() {
        let names: Vec<String> = fallback_search("WALVIS")
            .into_iter()
            .map(|p| p.display_name)
            .collect();
        assert_eq!(names, vec!["Walvis Bay, Namibia".to_string()]);

        assert_eq!(fallback_search("lüd").len(), 1);
        assert_eq!(fallback_search("namibia").len(), 20);
        assert!(fallback_search("paris").is_empty());
    }

    #[test]
    fn short_queries_are_rejected() {
        assert_eq!(normalize_query("  w "), None);
        assert_eq!(normalize_query(" Tsumeb "), Some("Tsumeb"));
        assert_eq!(normalize_query("Lü"), Some("Lü"));
    }

    #[test]
    fn bounded_search_params() {
        let params = PlaceSearch::namibia("Tsumeb").params();
        assert_eq!(
            params,
            vec![
                ("format", "json".to_string()),
                ("q", "Tsumeb".to_string()),
                ("viewbox", "11.747095,-28.965186,25.264435,-16.956243".to_string()),
                ("bounded", "1".to_string()),
                ("countrycodes", "na".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }
}
