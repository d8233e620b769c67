//! WFS 1.0.0 `GetFeature` requests.

use foundation::GeoBounds;

pub const WFS_VERSION: &str = "1.0.0";
pub const OUTPUT_GEOJSON: &str = "application/json";

/// A `GetFeature` request against one feature type.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeature {
    pub type_name: String,
    pub bbox: Option<GeoBounds>,
    pub output_format: String,
}

impl GetFeature {
    /// Whole-layer request encoded as GeoJSON.
    pub fn geojson(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            bbox: None,
            output_format: OUTPUT_GEOJSON.to_string(),
        }
    }

    pub fn with_bbox(mut self, bbox: GeoBounds) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_output_format(mut self, output_format: impl Into<String>) -> Self {
        self.output_format = output_format.into();
        self
    }

    /// Full request URL for the WFS endpoint at `base_url`.
    ///
    /// Parameter values are emitted verbatim; GeoServer expects the bbox
    /// commas and CRS colon unescaped.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{base_url}?service=WFS&version={WFS_VERSION}&request=GetFeature&typeName={}",
            self.type_name
        );
        if let Some(bbox) = self.bbox {
            url.push_str("&bbox=");
            url.push_str(&bbox.wfs_bbox());
        }
        url.push_str("&outputFormat=");
        url.push_str(&self.output_format);
        url
    }
}
