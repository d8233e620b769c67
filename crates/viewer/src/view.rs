use foundation::{GeoBounds, LatLng};
use layers::Basemap;
use serde::Serialize;

/// Zoom level that frames the whole of Namibia.
pub const FULL_EXTENT_ZOOM: u8 = 6;
pub const MIN_ZOOM: u8 = 0;
/// Zoom used when centering on a search result or typed coordinates.
pub const PLACE_ZOOM: u8 = 12;
/// Zoom used when centering on the user's location.
pub const LOCATION_ZOOM: u8 = 15;

/// Center and zoom of the map.
///
/// The map never leaves the Namibia extent: centers outside it are clamped
/// onto its edge, and zoom never exceeds the basemap's maximum.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub max_zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self::full_extent(Basemap::default())
    }
}

impl MapView {
    pub fn full_extent(basemap: Basemap) -> Self {
        Self {
            center: GeoBounds::NAMIBIA.center(),
            zoom: FULL_EXTENT_ZOOM,
            max_zoom: basemap.max_zoom(),
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::NAMIBIA
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        let b = GeoBounds::NAMIBIA;
        self.center = LatLng::new(
            center.lat.clamp(b.south, b.north),
            center.lng.clamp(b.west, b.east),
        );
        self.zoom = zoom.clamp(MIN_ZOOM, self.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(self.max_zoom);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    pub fn reset(&mut self) {
        let max_zoom = self.max_zoom;
        *self = Self {
            max_zoom,
            ..Self::full_extent(Basemap::default())
        };
    }

    /// Switching basemap keeps the view but lowers the zoom if the new
    /// basemap does not go as deep.
    pub fn apply_basemap(&mut self, basemap: Basemap) {
        self.max_zoom = basemap.max_zoom();
        self.zoom = self.zoom.min(self.max_zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::{FULL_EXTENT_ZOOM, MapView};
    use foundation::{GeoBounds, LatLng};
    use layers::Basemap;

    #[test]
    fn zoom_is_clamped_to_basemap() {
        let mut v = MapView::default();
        v.set_view(LatLng::new(-22.5, 17.0), 30);
        assert_eq!(v.zoom, 18);
        v.zoom_in();
        assert_eq!(v.zoom, 18);

        v.apply_basemap(Basemap::Terrain);
        assert_eq!(v.zoom, 17);
        v.zoom_out();
        assert_eq!(v.zoom, 16);
    }

    #[test]
    fn center_stays_inside_namibia() {
        let mut v = MapView::default();
        v.set_view(LatLng::new(-10.0, 30.0), 8);
        assert!(GeoBounds::NAMIBIA.contains(v.center));
        assert_eq!(v.center.lat, GeoBounds::NAMIBIA.north);
    }

    #[test]
    fn reset_returns_to_full_extent() {
        let mut v = MapView::full_extent(Basemap::Terrain);
        v.set_view(LatLng::new(-22.5, 17.0), 12);
        v.reset();
        assert_eq!(v.zoom, FULL_EXTENT_ZOOM);
        assert_eq!(v.max_zoom, 17);
        assert_eq!(v.center, GeoBounds::NAMIBIA.center());
    }
}
