use serde::{Deserialize, Serialize};

use crate::layer::UnknownName;

/// Background tile layers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basemap {
    #[default]
    Osm,
    Satellite,
    Terrain,
}

impl Basemap {
    pub const ALL: [Basemap; 3] = [Basemap::Osm, Basemap::Satellite, Basemap::Terrain];

    pub fn as_str(self) -> &'static str {
        match self {
            Basemap::Osm => "osm",
            Basemap::Satellite => "satellite",
            Basemap::Terrain => "terrain",
        }
    }

    pub fn url_template(self) -> &'static str {
        match self {
            Basemap::Osm => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            Basemap::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            Basemap::Terrain => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        }
    }

    pub fn max_zoom(self) -> u8 {
        match self {
            Basemap::Osm | Basemap::Satellite => 18,
            Basemap::Terrain => 17,
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            Basemap::Osm => "&copy; OpenStreetMap contributors",
            Basemap::Satellite => {
                "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, \
                 Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community"
            }
            Basemap::Terrain => {
                "Map data: &copy; OpenStreetMap contributors, SRTM | Map style: &copy; OpenTopoMap (CC-BY-SA)"
            }
        }
    }
}

impl std::str::FromStr for Basemap {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Basemap::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UnknownName::new("basemap", s))
    }
}

#[cfg(test)]
mod tests {
    use super::Basemap;

    #[test]
    fn terrain_has_lower_max_zoom() {
        assert_eq!(Basemap::Osm.max_zoom(), 18);
        assert_eq!(Basemap::Terrain.max_zoom(), 17);
    }

    #[test]
    fn parses_selector_values() {
        assert_eq!("satellite".parse::<Basemap>(), Ok(Basemap::Satellite));
        assert!("bing".parse::<Basemap>().is_err());
        assert_eq!(Basemap::default(), Basemap::Osm);
    }
}
