use foundation::LatLng;
use geojson::{GeoJson, Geometry, JsonObject, JsonValue, Value as GeometryValue};
use serde::Serialize;

/// Property key GeoServer uses for the raw geometry column. It is never shown
/// as an attribute.
pub const GEOMETRY_PROPERTY: &str = "geom";

/// One feature of a feature-service response.
///
/// Properties keep the order in which the service sent them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub id: Option<String>,
    pub properties: JsonObject,
    pub geometry: Option<Geometry>,
}

impl FeatureRecord {
    pub fn new(properties: JsonObject, geometry: Option<Geometry>) -> Self {
        Self {
            id: None,
            properties,
            geometry,
        }
    }

    pub fn from_feature(feature: geojson::Feature) -> Self {
        let id = feature.id.map(|id| match id {
            geojson::feature::Id::String(s) => s,
            geojson::feature::Id::Number(n) => n.to_string(),
        });
        Self {
            id,
            properties: feature.properties.unwrap_or_default(),
            geometry: feature.geometry,
        }
    }

    pub fn property(&self, key: &str) -> Option<&JsonValue> {
        self.properties.get(key)
    }

    /// Display text for `key`, or `None` when the value is missing or falsy
    /// (`null`, `false`, `0`, `""`).
    pub fn display_value(&self, key: &str) -> Option<String> {
        self.property(key).and_then(display_value)
    }

    /// Attribute keys in service order, excluding the geometry column.
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties
            .keys()
            .map(String::as_str)
            .filter(|k| *k != GEOMETRY_PROPERTY)
    }

    /// `(key, text)` pairs for every attribute with a displayable value.
    pub fn display_properties(&self) -> Vec<(String, String)> {
        self.properties
            .iter()
            .filter(|(k, _)| k.as_str() != GEOMETRY_PROPERTY)
            .filter_map(|(k, v)| display_value(v).map(|text| (k.clone(), text)))
            .collect()
    }

    /// Point used to place this feature's marker.
    ///
    /// Points use their own coordinate. Anything else uses the arithmetic mean
    /// of its first ring or line, without the closing duplicate vertex. This
    /// is a vertex mean, not an area-weighted centroid.
    pub fn representative_point(&self) -> Option<LatLng> {
        let geometry = self.geometry.as_ref()?;
        representative_point(&geometry.value)
    }
}

fn representative_point(value: &GeometryValue) -> Option<LatLng> {
    match value {
        GeometryValue::Point(p) => LatLng::from_position(p),
        GeometryValue::MultiPoint(line) | GeometryValue::LineString(line) => vertex_mean(line),
        GeometryValue::MultiLineString(lines) => lines.first().and_then(|l| vertex_mean(l)),
        GeometryValue::Polygon(rings) => rings.first().and_then(|r| vertex_mean(r)),
        GeometryValue::MultiPolygon(polys) => polys
            .first()
            .and_then(|rings| rings.first())
            .and_then(|r| vertex_mean(r)),
        GeometryValue::GeometryCollection(members) => members
            .iter()
            .find_map(|g| representative_point(&g.value)),
    }
}

fn vertex_mean(vertices: &[Vec<f64>]) -> Option<LatLng> {
    let open = match vertices {
        [first, .., last] if first == last => &vertices[..vertices.len() - 1],
        _ => vertices,
    };

    let mut n = 0usize;
    let (mut sum_lat, mut sum_lng) = (0.0, 0.0);
    for p in open.iter().filter_map(|v| LatLng::from_position(v)) {
        sum_lat += p.lat;
        sum_lng += p.lng;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(LatLng::new(sum_lat / n as f64, sum_lng / n as f64))
}

/// Renders a property value for popups and tables.
pub fn display_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(false) => None,
        JsonValue::Bool(true) => Some("true".to_string()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return (i != 0).then(|| i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return (u != 0).then(|| u.to_string());
            }
            let v = n.as_f64()?;
            if v == 0.0 {
                None
            } else if v.fract() == 0.0 && v.abs() < 1e15 {
                Some(format!("{}", v as i64))
            } else {
                Some(v.to_string())
            }
        }
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Why a feature-service body could not be turned into features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// XML payload carrying a `ServiceException` message.
    ServiceException(String),
    /// XML payload without a recognisable exception element.
    UnexpectedXml,
    /// Not XML, but not a decodable feature collection either.
    Malformed(String),
}

impl ResponseError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ResponseError::ServiceException(msg) => format!("GeoServer error: {msg}"),
            ResponseError::UnexpectedXml => {
                "Unexpected response format from GeoServer. Please check server configuration."
                    .to_string()
            }
            ResponseError::Malformed(_) => {
                "Could not read the feature data returned by GeoServer.".to_string()
            }
        }
    }
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseError::ServiceException(msg) => write!(f, "service exception: {msg}"),
            ResponseError::UnexpectedXml => write!(f, "unexpected XML response"),
            ResponseError::Malformed(msg) => write!(f, "malformed feature collection: {msg}"),
        }
    }
}

impl std::error::Error for ResponseError {}

/// Decodes a `GetFeature` response body.
///
/// Any body whose first non-whitespace character is `<` is treated as a
/// service error and never parsed as features. A JSON object without a
/// `features` member decodes to an empty list.
pub fn parse_feature_collection(body: &str) -> Result<Vec<FeatureRecord>, ResponseError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        return Err(match service_exception_text(trimmed) {
            Some(msg) => ResponseError::ServiceException(msg),
            None => ResponseError::UnexpectedXml,
        });
    }

    let value: JsonValue =
        serde_json::from_str(trimmed).map_err(|e| ResponseError::Malformed(e.to_string()))?;

    let JsonValue::Object(obj) = &value else {
        return Err(ResponseError::Malformed(
            "expected a JSON object".to_string(),
        ));
    };
    if matches!(obj.get("features"), None | Some(JsonValue::Null)) {
        return Ok(Vec::new());
    }
    if !obj.contains_key("type") {
        // A bare `{"features": [...]}` without the collection wrapper.
        let Some(JsonValue::Array(items)) = obj.get("features") else {
            return Err(ResponseError::Malformed(
                "`features` is not an array".to_string(),
            ));
        };
        return items
            .iter()
            .cloned()
            .map(|item| {
                geojson::Feature::from_json_value(item)
                    .map(FeatureRecord::from_feature)
                    .map_err(|e| ResponseError::Malformed(e.to_string()))
            })
            .collect();
    }

    let geojson =
        GeoJson::from_json_value(value).map_err(|e| ResponseError::Malformed(e.to_string()))?;
    Ok(match geojson {
        GeoJson::FeatureCollection(fc) => {
            fc.features.into_iter().map(FeatureRecord::from_feature).collect()
        }
        GeoJson::Feature(f) => vec![FeatureRecord::from_feature(f)],
        GeoJson::Geometry(_) => Vec::new(),
    })
}

/// Extracts the text of the first `ServiceException` (or OWS `ExceptionText`)
/// element of an exception report.
pub fn service_exception_text(xml: &str) -> Option<String> {
    ["ServiceException", "ExceptionText"]
        .iter()
        .find_map(|name| element_text(xml, name))
}

fn element_text(xml: &str, local_name: &str) -> Option<String> {
    let mut rest = xml;
    while let Some(lt) = rest.find('<') {
        let tag = &rest[lt + 1..];
        let end = tag.find('>')?;
        let head = &tag[..end];
        rest = &tag[end + 1..];

        if head.starts_with('/') || head.starts_with('?') || head.starts_with('!') {
            continue;
        }
        let qname = head
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");
        let name = qname.rsplit(':').next().unwrap_or(qname);
        if name != local_name {
            continue;
        }
        if head.ends_with('/') {
            return None;
        }

        let close = format!("</{qname}>");
        let body = &rest[..rest.find(&close)?];
        let text = unescape(strip_cdata(body).trim());
        return (!text.is_empty()).then_some(text);
    }
    None
}

fn strip_cdata(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("<![CDATA[")
        .and_then(|inner| inner.strip_suffix("]]>"))
        .unwrap_or(s)
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
