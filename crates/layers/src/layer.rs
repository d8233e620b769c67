use serde::{Deserialize, Serialize};

pub const ATTRIBUTION: &str = "Geological Survey of Namibia";

/// Overlay layers published by the survey's GeoServer workspace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Geology,
    Minerals,
    Roads,
    Districts,
    TownsVillages,
    Regions,
    Country,
}

impl LayerId {
    pub const ALL: [LayerId; 7] = [
        LayerId::Geology,
        LayerId::Minerals,
        LayerId::Roads,
        LayerId::Districts,
        LayerId::TownsVillages,
        LayerId::Regions,
        LayerId::Country,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::Geology => "geology",
            LayerId::Minerals => "minerals",
            LayerId::Roads => "roads",
            LayerId::Districts => "districts",
            LayerId::TownsVillages => "towns_villages",
            LayerId::Regions => "regions",
            LayerId::Country => "country",
        }
    }

    /// Qualified GeoServer layer / feature type name.
    pub fn type_name(self) -> &'static str {
        match self {
            LayerId::Geology => "mme:geology_1m",
            LayerId::Minerals => "mme:minerals",
            LayerId::Roads => "mme:roads",
            LayerId::Districts => "mme:districts",
            LayerId::TownsVillages => "mme:towns_villages",
            LayerId::Regions => "mme:regions",
            LayerId::Country => "mme:country",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LayerId::Geology => "Geology 1:1M",
            LayerId::Minerals => "Mineral Occurrences",
            LayerId::Roads => "Roads",
            LayerId::Districts => "Districts",
            LayerId::TownsVillages => "Towns and Villages",
            LayerId::Regions => "Regions",
            LayerId::Country => "Country",
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerId {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownName::new("layer", s))
    }
}

/// A name that does not match any known layer, basemap, format or filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName {
    pub what: &'static str,
    pub name: String,
}

impl UnknownName {
    pub fn new(what: &'static str, name: &str) -> Self {
        Self {
            what,
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for UnknownName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: {:?}", self.what, self.name)
    }
}

impl std::error::Error for UnknownName {}

/// WMS `GetMap` parameters for an overlay layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WmsLayer {
    pub id: LayerId,
    pub layers: &'static str,
    pub format: &'static str,
    pub transparent: bool,
    pub attribution: &'static str,
}

impl WmsLayer {
    pub fn for_layer(id: LayerId) -> Self {
        Self {
            id,
            layers: id.type_name(),
            format: "image/png",
            transparent: true,
            attribution: ATTRIBUTION,
        }
    }
}

/// Which overlay layers are switched on.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerVisibility {
    pub geology: bool,
    pub minerals: bool,
    pub roads: bool,
    pub districts: bool,
    pub towns_villages: bool,
    pub regions: bool,
    pub country: bool,
}

impl LayerVisibility {
    pub fn is_visible(&self, id: LayerId) -> bool {
        match id {
            LayerId::Geology => self.geology,
            LayerId::Minerals => self.minerals,
            LayerId::Roads => self.roads,
            LayerId::Districts => self.districts,
            LayerId::TownsVillages => self.towns_villages,
            LayerId::Regions => self.regions,
            LayerId::Country => self.country,
        }
    }

    /// Sets one flag. Returns `true` if the flag changed.
    pub fn set(&mut self, id: LayerId, visible: bool) -> bool {
        let slot = match id {
            LayerId::Geology => &mut self.geology,
            LayerId::Minerals => &mut self.minerals,
            LayerId::Roads => &mut self.roads,
            LayerId::Districts => &mut self.districts,
            LayerId::TownsVillages => &mut self.towns_villages,
            LayerId::Regions => &mut self.regions,
            LayerId::Country => &mut self.country,
        };
        let changed = *slot != visible;
        *slot = visible;
        changed
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        LayerId::ALL.into_iter().filter(|id| self.is_visible(*id))
    }

    pub fn any(&self) -> bool {
        self.visible_layers().next().is_some()
    }

    /// The geology-type selector is offered while geology or minerals is on.
    pub fn geology_type_selector_visible(&self) -> bool {
        self.geology || self.minerals
    }
}
