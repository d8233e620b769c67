use serde::{Deserialize, Serialize};
use services::GetFeature;

use crate::layer::{LayerId, UnknownName};

/// Export formats offered for layer downloads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    Shp,
    Gml,
    Csv,
    GeoJson,
}

impl DownloadFormat {
    pub const ALL: [DownloadFormat; 4] = [
        DownloadFormat::Shp,
        DownloadFormat::Gml,
        DownloadFormat::Csv,
        DownloadFormat::GeoJson,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DownloadFormat::Shp => "shp",
            DownloadFormat::Gml => "gml",
            DownloadFormat::Csv => "csv",
            DownloadFormat::GeoJson => "geojson",
        }
    }

    /// WFS `outputFormat` value.
    pub fn output_format(self) -> &'static str {
        match self {
            DownloadFormat::Shp => "shape-zip",
            DownloadFormat::Gml => "GML2",
            DownloadFormat::Csv => "csv",
            DownloadFormat::GeoJson => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DownloadFormat::Shp => "zip",
            DownloadFormat::Gml => "gml",
            DownloadFormat::Csv => "csv",
            DownloadFormat::GeoJson => "geojson",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DownloadFormat::Shp => "application/zip",
            DownloadFormat::Gml => "application/gml+xml",
            DownloadFormat::Csv => "text/csv",
            DownloadFormat::GeoJson => "application/geo+json",
        }
    }
}

impl std::str::FromStr for DownloadFormat {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DownloadFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownName::new("download format", s))
    }
}

/// A whole-layer export.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerDownload {
    pub layer: LayerId,
    pub format: DownloadFormat,
}

impl LayerDownload {
    pub fn new(layer: LayerId, format: DownloadFormat) -> Self {
        Self { layer, format }
    }

    pub fn request(&self) -> GetFeature {
        GetFeature::geojson(self.layer.type_name()).with_output_format(self.format.output_format())
    }

    pub fn file_name(&self) -> String {
        format!("{}_data.{}", self.layer.as_str(), self.format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::{DownloadFormat, LayerDownload};
    use crate::layer::LayerId;

    #[test]
    fn shapefile_download() {
        let d = LayerDownload::new(LayerId::TownsVillages, DownloadFormat::Shp);
        assert_eq!(d.file_name(), "towns_villages_data.zip");
        let req = d.request();
        assert_eq!(req.type_name, "mme:towns_villages");
        assert_eq!(req.output_format, "shape-zip");
        assert!(req.bbox.is_none());
    }

    #[test]
    fn format_names() {
        assert_eq!("gml".parse::<DownloadFormat>(), Ok(DownloadFormat::Gml));
        assert_eq!(DownloadFormat::Gml.output_format(), "GML2");
        assert_eq!(DownloadFormat::GeoJson.extension(), "geojson");
        assert!("kml".parse::<DownloadFormat>().is_err());
    }
}
