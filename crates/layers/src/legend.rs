//! Legend projection.
//!
//! The legend is a pure function of the layer visibility flags and the
//! geology-type filter. It keeps no state of its own.

use serde::{Deserialize, Serialize};

use crate::layer::{LayerVisibility, UnknownName};
use crate::symbology::PointShape;

/// Geology-type selector value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeologyFilter {
    #[default]
    All,
    Igneous,
    Sedimentary,
    Metamorphic,
    Faults,
}

impl GeologyFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            GeologyFilter::All => "all",
            GeologyFilter::Igneous => "igneous",
            GeologyFilter::Sedimentary => "sedimentary",
            GeologyFilter::Metamorphic => "metamorphic",
            GeologyFilter::Faults => "faults",
        }
    }

    fn admits(self, class: GeologyFilter) -> bool {
        self == GeologyFilter::All || self == class
    }
}

impl std::str::FromStr for GeologyFilter {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            GeologyFilter::All,
            GeologyFilter::Igneous,
            GeologyFilter::Sedimentary,
            GeologyFilter::Metamorphic,
            GeologyFilter::Faults,
        ]
        .into_iter()
        .find(|f| f.as_str() == s)
        .ok_or_else(|| UnknownName::new("geology type", s))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LegendSymbol {
    Box,
    Line {
        width: u8,
        style: LineStyle,
    },
    Point {
        shape: PointShape,
        size: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<&'static str>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub symbol: LegendSymbol,
    pub color: &'static str,
    pub label: &'static str,
}

const fn line(color: &'static str, label: &'static str, width: u8, style: LineStyle) -> LegendEntry {
    LegendEntry {
        symbol: LegendSymbol::Line { width, style },
        color,
        label,
    }
}

const fn point(
    color: &'static str,
    label: &'static str,
    shape: PointShape,
    size: u8,
    stroke: Option<&'static str>,
) -> LegendEntry {
    LegendEntry {
        symbol: LegendSymbol::Point {
            shape,
            size,
            stroke,
        },
        color,
        label,
    }
}

const fn swatch(color: &'static str, label: &'static str) -> LegendEntry {
    LegendEntry {
        symbol: LegendSymbol::Box,
        color,
        label,
    }
}

const ROADS: LegendEntry = line("#ff0000", "Roads", 2, LineStyle::Solid);
const DISTRICTS: LegendEntry = line("#00aaff", "Districts", 1, LineStyle::Dashed);
const TOWNS_VILLAGES: LegendEntry =
    point("#ff9900", "Towns and Villages", PointShape::Circle, 12, None);
const REGIONS: LegendEntry = line("#ff00aa", "Regions", 2, LineStyle::Solid);
const COUNTRY: LegendEntry = line("#000000", "Country Boundary", 3, LineStyle::Solid);

/// Static mineral legend: one entry per commodity class, whatever the data holds.
pub const MINERAL_CLASSES: [LegendEntry; 7] = [
    point("#000000", "Base and Rare Metals", PointShape::Circle, 8, Some("#ffffff")),
    point("#ff0000", "Industrial Minerals", PointShape::Square, 8, Some("#000000")),
    point("#ffd700", "Precious Metals", PointShape::Triangle, 10, Some("#000000")),
    point("#0000ff", "Precious Stones", PointShape::Diamond, 10, Some("#000000")),
    point("#800080", "Semi-Precious Stones", PointShape::Star, 10, Some("#000000")),
    point("#00ff00", "Nuclear Fuel Minerals", PointShape::Hexagon, 10, Some("#000000")),
    point("#a52a2a", "Dimension Stone", PointShape::Square, 8, Some("#000000")),
];

const GEOLOGY_CLASSES: [(GeologyFilter, LegendEntry); 4] = [
    (GeologyFilter::Igneous, swatch("#e74c3c", "Igneous Rocks")),
    (GeologyFilter::Sedimentary, swatch("#2ecc71", "Sedimentary Rocks")),
    (GeologyFilter::Metamorphic, swatch("#3498db", "Metamorphic Rocks")),
    (
        GeologyFilter::Faults,
        line("#000000", "Faults and Lineaments", 1, LineStyle::Solid),
    ),
];

/// Rendered legend. An empty legend is hidden rather than shown empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty()
    }
}

pub fn render(visibility: &LayerVisibility, geology: GeologyFilter) -> Legend {
    let mut entries = Vec::new();

    for (on, entry) in [
        (visibility.roads, ROADS),
        (visibility.districts, DISTRICTS),
        (visibility.towns_villages, TOWNS_VILLAGES),
        (visibility.regions, REGIONS),
        (visibility.country, COUNTRY),
    ] {
        if on {
            entries.push(entry);
        }
    }

    if visibility.minerals {
        entries.extend(MINERAL_CLASSES);
    }

    if visibility.geology {
        entries.extend(
            GEOLOGY_CLASSES
                .iter()
                .filter(|(class, _)| geology.admits(*class))
                .map(|(_, entry)| *entry),
        );
    }

    Legend { entries }
}
