//! Per-tab session state.
//!
//! Every user action goes through `&mut Session`, so two selections started
//! back to back are applied in the order they were issued.

use std::sync::Arc;
use std::time::Instant;

use foundation::{CoordinateError, LatLng};
use layers::{Basemap, GeologyFilter, LayerId, LayerVisibility, Legend};
use runtime::{LoadingIndicator, Notice, NoticeBus};
use scene::{
    AttributeTable, Control, Handler, MapEvent, MapEventKind, MapSurface, Measurement,
    MeasurementReadout, SelectionLayer, ShapeKind, Surface, ToolCoordinator, ToolMode, Transition,
};
use serde::Serialize;
use services::{FeatureService, Geocoder, Place, PlaceSearch, fallback_search, normalize_query};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::engine::SelectionEngine;
use crate::overlay::MineralsOverlay;
use crate::places::{
    COORDINATES_OUT_OF_RANGE, LocationMarker, LocationReport, NO_RESULTS, OUTSIDE_NAMIBIA,
    QUERY_TOO_SHORT, SearchMarker, SearchMarkerView, parse_target,
};
use crate::view::{LOCATION_ZOOM, MapView, PLACE_ZOOM};

pub const MAP_CLEARED: &str = "Map has been cleared of all drawings, measurements, and markers.";

/// A shape left on the map by a draw or select-by-polygon tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawnShape {
    pub shape: ShapeKind,
    pub vertices: Vec<LatLng>,
    pub measurement: Measurement,
}

pub struct Session {
    coordinator: ToolCoordinator,
    surface: Surface,
    engine: SelectionEngine,
    features: Arc<dyn FeatureService>,
    geocoder: Arc<dyn Geocoder>,
    loading: LoadingIndicator,
    notices: NoticeBus,

    readout: MeasurementReadout,
    cursor: Option<LatLng>,
    drawn: Vec<DrawnShape>,
    selection: Option<SelectionLayer>,

    visibility: LayerVisibility,
    geology_filter: GeologyFilter,
    minerals: Option<MineralsOverlay>,
    basemap: Basemap,
    view: MapView,

    search_results: Vec<Place>,
    search_marker: Option<SearchMarker>,
    location: Option<LocationMarker>,
}

impl Session {
    pub fn new(
        config: &ViewerConfig,
        features: Arc<dyn FeatureService>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let loading = LoadingIndicator::new();
        let engine = SelectionEngine::new(
            Arc::clone(&features),
            config.selection_type_name.clone(),
            loading.clone(),
        );

        let mut surface = Surface::new();
        // Always on, whatever tool is active.
        surface.on(MapEventKind::MouseMove, Handler::CoordinateReadout);

        Self {
            coordinator: ToolCoordinator::new(),
            surface,
            engine,
            features,
            geocoder,
            loading,
            notices: NoticeBus::new(),
            readout: MeasurementReadout::default(),
            cursor: None,
            drawn: Vec::new(),
            selection: None,
            visibility: LayerVisibility::default(),
            geology_filter: GeologyFilter::default(),
            minerals: None,
            basemap: Basemap::default(),
            view: MapView::default(),
            search_results: Vec::new(),
            search_marker: None,
            location: None,
        }
    }

    // ---- tools -------------------------------------------------------------

    pub fn tool(&self) -> ToolMode {
        self.coordinator.active()
    }

    pub fn activate_tool(&mut self, mode: ToolMode) -> Transition {
        let transition = self.coordinator.activate(mode, &mut self.surface);
        self.after_transition(transition);
        transition
    }

    pub fn deactivate_tool(&mut self) -> Transition {
        let transition = self.coordinator.deactivate(&mut self.surface);
        self.after_transition(transition);
        transition
    }

    fn after_transition(&mut self, transition: Transition) {
        if transition.deactivated == Some(ToolMode::Measure) {
            self.readout.hide();
        }
        if transition.activated == Some(ToolMode::Measure) {
            self.readout.open();
        }
        if !transition.is_noop() {
            debug!(?transition, "tool changed");
        }
    }

    /// Feeds one map event through the listeners currently attached.
    pub async fn handle_event(&mut self, event: MapEvent) {
        let handlers = self.surface.dispatch(&event);
        if handlers.is_empty() {
            return;
        }

        for handler in handlers {
            match (handler, &event) {
                (Handler::CoordinateReadout, MapEvent::MouseMove { at }) => {
                    self.cursor = Some(*at);
                }
                (Handler::MeasureProgress, MapEvent::MeasureStart) => {
                    self.readout.show_measuring();
                }
                (Handler::MeasureResult, MapEvent::MeasureFinish { points }) => {
                    self.readout.show(Measurement::of_measure_path(points));
                }
                (Handler::ShapeMeasurement(kind), MapEvent::ShapeCreated { shape, vertices })
                    if *shape == kind =>
                {
                    let measurement = Measurement::of_shape(kind, vertices);
                    self.readout.show(measurement);
                    self.drawn.push(DrawnShape {
                        shape: kind,
                        vertices: vertices.clone(),
                        measurement,
                    });
                }
                (
                    Handler::PolygonSelection,
                    MapEvent::ShapeCreated {
                        shape: ShapeKind::Polygon,
                        vertices,
                    },
                ) => {
                    self.selection = None;
                    let layer = self
                        .engine
                        .select_by_polygon(vertices.clone(), &mut self.notices)
                        .await;
                    self.selection = Some(layer);
                }
                (Handler::PointSelection, MapEvent::Click { at }) => {
                    self.selection = None;
                    let layer = self.engine.select_by_point(*at, &mut self.notices).await;
                    self.selection = Some(layer);
                }
                (handler, event) => {
                    debug!(?handler, kind = ?event.kind(), "handler ignores event");
                }
            }
        }
    }

    // ---- selection ---------------------------------------------------------

    pub fn selection(&self) -> Option<&SelectionLayer> {
        self.selection.as_ref()
    }

    pub fn attribute_table(&self) -> Option<AttributeTable> {
        self.selection.as_ref().map(SelectionLayer::attribute_table)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ---- layers ------------------------------------------------------------

    pub fn visibility(&self) -> &LayerVisibility {
        &self.visibility
    }

    /// Switching minerals on loads its vector overlay (once); switching it
    /// off drops the overlay.
    pub async fn set_layer_visible(&mut self, id: LayerId, visible: bool) {
        self.visibility.set(id, visible);
        if id != LayerId::Minerals {
            return;
        }
        if visible && self.minerals.is_none() {
            self.minerals =
                MineralsOverlay::load(self.features.as_ref(), &self.loading, &mut self.notices)
                    .await;
        } else if !visible {
            self.minerals = None;
        }
    }

    pub fn minerals(&self) -> Option<&MineralsOverlay> {
        self.minerals.as_ref()
    }

    pub fn set_geology_filter(&mut self, filter: GeologyFilter) {
        self.geology_filter = filter;
    }

    pub fn legend(&self) -> Legend {
        layers::legend::render(&self.visibility, self.geology_filter)
    }

    // ---- basemap and view --------------------------------------------------

    /// Returns `false` if `basemap` was already shown.
    pub fn set_basemap(&mut self, basemap: Basemap) -> bool {
        if basemap == self.basemap {
            return false;
        }
        self.basemap = basemap;
        self.view.apply_basemap(basemap);
        true
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn full_extent(&mut self) {
        self.view.reset();
    }

    // ---- search, coordinates, location ------------------------------------

    pub async fn search(&mut self, raw_query: &str) -> &[Place] {
        self.search_results.clear();
        let Some(query) = normalize_query(raw_query) else {
            self.notices.warn("search", QUERY_TOO_SHORT);
            return &self.search_results;
        };

        let results = {
            let _loading = self.loading.acquire();
            match self.geocoder.search(&PlaceSearch::namibia(query)).await {
                Ok(places) => places,
                Err(e) => {
                    warn!("geocoder failed, using gazetteer: {e}");
                    fallback_search(query)
                }
            }
        };

        if results.is_empty() {
            self.notices.info("search", NO_RESULTS);
        }
        info!(query, count = results.len(), "place search");
        self.search_results = results;
        &self.search_results
    }

    pub fn search_results(&self) -> &[Place] {
        &self.search_results
    }

    /// Centers on the `index`-th search result and marks it.
    pub fn select_search_result(&mut self, index: usize, now: Instant) -> Option<&SearchMarker> {
        let place = self.search_results.get(index)?;
        let marker = SearchMarker::for_place(place, now);
        self.view.set_view(marker.position, PLACE_ZOOM);
        self.search_results.clear();
        self.search_marker = Some(marker);
        self.search_marker.as_ref()
    }

    pub fn go_to(&mut self, lat: &str, lng: &str) -> Result<LatLng, CoordinateError> {
        match parse_target(lat, lng) {
            Ok(p) => {
                self.view.set_view(p, PLACE_ZOOM);
                self.search_marker = Some(SearchMarker::custom(p));
                Ok(p)
            }
            Err(e) => {
                self.notices.warn("coordinates", COORDINATES_OUT_OF_RANGE);
                Err(e)
            }
        }
    }

    pub fn report_location(&mut self, report: LocationReport) -> Option<&LocationMarker> {
        match report {
            LocationReport::Fix {
                lat,
                lng,
                accuracy_m,
            } => {
                let p = LatLng::new(lat, lng);
                if !foundation::GeoBounds::NAMIBIA.contains(p) {
                    self.notices.warn("location", OUTSIDE_NAMIBIA);
                    return None;
                }
                self.view.set_view(p, LOCATION_ZOOM);
                self.location = Some(LocationMarker::new(p, accuracy_m));
                self.location.as_ref()
            }
            LocationReport::Error { message } => {
                self.notices
                    .error("location", format!("Error getting your location: {message}"));
                None
            }
            LocationReport::Unsupported => {
                self.notices
                    .error("location", "Geolocation is not supported by this browser.");
                None
            }
        }
    }

    // ---- clearing ----------------------------------------------------------

    /// Removes drawings, measurements, the selection, and the search and
    /// location markers, and switches the active tool off.
    pub fn clear_map(&mut self) {
        self.drawn.clear();
        self.readout.hide();
        self.selection = None;
        self.search_marker = None;
        self.location = None;
        self.deactivate_tool();
        self.notices.info("map", MAP_CLEARED);
    }

    // ---- notices -----------------------------------------------------------

    pub fn notices(&self) -> &[Notice] {
        self.notices.notices()
    }

    pub fn notices_since(&self, seq: u64) -> &[Notice] {
        self.notices.since(seq)
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            tool: self.coordinator.active(),
            active_buttons: self.coordinator.indicators(),
            controls: self.surface.controls().to_vec(),
            measurement: self.readout.clone(),
            coordinates: self.cursor.map(|p| p.to_string()),
            drawn: self.drawn.clone(),
            selection: self.selection.as_ref().map(|layer| SelectionView {
                summary: layer.summary(),
                layer: layer.clone(),
            }),
            layers: self.visibility,
            geology_filter: self.geology_filter,
            geology_selector_visible: self.visibility.geology_type_selector_visible(),
            legend: self.legend(),
            minerals: self.minerals.clone(),
            basemap: BasemapView::of(self.basemap),
            view: self.view,
            search_results: self.search_results.clone(),
            search_marker: self.search_marker.as_ref().map(|m| m.snapshot(now)),
            location: self.location.map(LocationView::of),
            loading: self.loading.is_visible(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub summary: String,
    #[serde(flatten)]
    pub layer: SelectionLayer,
}

#[derive(Debug, Clone, Serialize)]
pub struct BasemapView {
    pub id: Basemap,
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

impl BasemapView {
    pub fn of(basemap: Basemap) -> Self {
        Self {
            id: basemap,
            url_template: basemap.url_template(),
            attribution: basemap.attribution(),
            max_zoom: basemap.max_zoom(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    pub position: LatLng,
    pub radius_m: f64,
    pub popup: String,
}

impl LocationView {
    fn of(marker: LocationMarker) -> Self {
        Self {
            position: marker.position,
            radius_m: marker.circle_radius_m(),
            popup: marker.popup(),
        }
    }
}

/// Everything the front end needs to redraw the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub tool: ToolMode,
    pub active_buttons: &'static [&'static str],
    pub controls: Vec<Control>,
    pub measurement: MeasurementReadout,
    pub coordinates: Option<String>,
    pub drawn: Vec<DrawnShape>,
    pub selection: Option<SelectionView>,
    pub layers: LayerVisibility,
    pub geology_filter: GeologyFilter,
    pub geology_selector_visible: bool,
    pub legend: Legend,
    pub minerals: Option<MineralsOverlay>,
    pub basemap: BasemapView,
    pub view: MapView,
    pub search_results: Vec<Place>,
    pub search_marker: Option<SearchMarkerView>,
    pub location: Option<LocationView>,
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use super::{MAP_CLEARED, Session};
    use crate::config::ViewerConfig;
    use crate::engine::tests::{GOLD_POINT, StubService};
    use crate::places::{LocationReport, NO_RESULTS, OUTSIDE_NAMIBIA, QUERY_TOO_SHORT};
    use crate::view::{FULL_EXTENT_ZOOM, LOCATION_ZOOM, PLACE_ZOOM};
    use foundation::LatLng;
    use layers::{Basemap, LayerId};
    use pretty_assertions::assert_eq;
    use runtime::NoticeLevel;
    use scene::{MapEvent, ShapeKind, ToolMode};
    use services::{BoxFuture, Geocoder, Place, PlaceSearch, ServiceError};

    struct StubGeocoder(Result<Vec<Place>, String>);

    impl Geocoder for StubGeocoder {
        fn search(&self, _search: &PlaceSearch) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>> {
            let out = self.0.clone().map_err(ServiceError::new);
            Box::pin(async move { out })
        }
    }

    fn session_with(service: StubService, geocoder: StubGeocoder) -> Session {
        Session::new(
            &ViewerConfig::default(),
            Arc::new(service),
            Arc::new(geocoder),
        )
    }

    fn session(body: &str) -> Session {
        session_with(StubService::ok(body), StubGeocoder(Ok(Vec::new())))
    }

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(-22.0, 16.5),
            LatLng::new(-22.0, 17.5),
            LatLng::new(-23.0, 17.5),
            LatLng::new(-23.0, 16.5),
        ]
    }

    fn polygon_drawn() -> MapEvent {
        MapEvent::ShapeCreated {
            shape: ShapeKind::Polygon,
            vertices: square(),
        }
    }

    #[tokio::test]
    async fn select_by_polygon_end_to_end() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::SelectByPolygon);
        s.handle_event(polygon_drawn()).await;

        let layer = s.selection().unwrap();
        assert_eq!(layer.summary(), "Features Found: 1");
        assert_eq!(layer.markers[0].position, LatLng::new(-22.5, 17.0));
        assert!(s.snapshot(Instant::now()).measurement.text.starts_with("Area: "));
        assert_eq!(s.attribute_table().unwrap().headers, vec!["MINERAL_TYPE"]);
        assert!(!s.loading().is_visible());
    }

    #[tokio::test]
    async fn switched_off_tool_no_longer_reacts() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::SelectByPolygon);
        s.activate_tool(ToolMode::SelectByPoint);
        s.handle_event(polygon_drawn()).await;
        assert!(s.selection().is_none());
        assert!(s.snapshot(Instant::now()).drawn.is_empty());

        s.handle_event(MapEvent::Click {
            at: LatLng::new(-22.5, 17.0),
        })
        .await;
        assert_eq!(s.selection().unwrap().feature_count(), 1);
    }

    #[tokio::test]
    async fn draw_polyline_shows_distance_without_selecting() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::DrawPolyline);
        s.handle_event(MapEvent::ShapeCreated {
            shape: ShapeKind::Polyline,
            vertices: vec![LatLng::new(-22.0, 17.0), LatLng::new(-23.0, 17.0)],
        })
        .await;

        let snap = s.snapshot(Instant::now());
        assert_eq!(snap.measurement.text, "Distance: 111.19 km");
        assert_eq!(snap.drawn.len(), 1);
        assert!(snap.selection.is_none());
    }

    #[tokio::test]
    async fn draw_tools_reject_the_other_shape_kind() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::DrawPolyline);
        s.handle_event(polygon_drawn()).await;
        let snap = s.snapshot(Instant::now());
        assert!(!snap.measurement.visible);
        assert!(snap.drawn.is_empty());

        s.activate_tool(ToolMode::SelectByPolygon);
        s.handle_event(MapEvent::ShapeCreated {
            shape: ShapeKind::Polyline,
            vertices: vec![LatLng::new(-22.0, 17.0), LatLng::new(-23.0, 17.0)],
        })
        .await;
        let snap = s.snapshot(Instant::now());
        assert!(!snap.measurement.visible);
        assert!(snap.drawn.is_empty());
        assert!(snap.selection.is_none());

        s.activate_tool(ToolMode::DrawPolygon);
        s.handle_event(MapEvent::ShapeCreated {
            shape: ShapeKind::Polyline,
            vertices: vec![LatLng::new(-22.0, 17.0), LatLng::new(-23.0, 17.0)],
        })
        .await;
        assert!(s.snapshot(Instant::now()).drawn.is_empty());
    }

    #[tokio::test]
    async fn measure_readout_follows_tool() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::Measure);
        assert!(s.snapshot(Instant::now()).measurement.visible);

        s.handle_event(MapEvent::MeasureStart).await;
        assert_eq!(s.snapshot(Instant::now()).measurement.text, "Measuring...");

        s.activate_tool(ToolMode::DrawPolygon);
        assert!(!s.snapshot(Instant::now()).measurement.visible);
        s.handle_event(MapEvent::MeasureStart).await;
        assert!(!s.snapshot(Instant::now()).measurement.visible);
    }

    #[tokio::test]
    async fn coordinate_readout_ignores_tool() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::Measure);
        s.activate_tool(ToolMode::None);
        s.handle_event(MapEvent::MouseMove {
            at: LatLng::new(-22.56789, 17.06543),
        })
        .await;
        assert_eq!(
            s.snapshot(Instant::now()).coordinates.as_deref(),
            Some("Lat: -22.5679, Lng: 17.0654")
        );
    }

    #[tokio::test]
    async fn new_selection_replaces_previous() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::SelectByPoint);
        for _ in 0..2 {
            s.handle_event(MapEvent::Click {
                at: LatLng::new(-22.5, 17.0),
            })
            .await;
        }
        assert_eq!(s.selection().unwrap().feature_count(), 1);
        s.clear_selection();
        assert!(s.attribute_table().is_none());
    }

    #[tokio::test]
    async fn minerals_overlay_follows_layer_toggle() {
        let mut s = session(GOLD_POINT);
        s.set_layer_visible(LayerId::Minerals, true).await;
        assert_eq!(s.minerals().unwrap().markers.len(), 1);
        assert!(s.snapshot(Instant::now()).geology_selector_visible);
        assert_eq!(s.legend().entries.len(), 7);

        s.set_layer_visible(LayerId::Minerals, false).await;
        assert!(s.minerals().is_none());
        assert!(!s.legend().is_visible());
    }

    #[tokio::test]
    async fn minerals_failure_leaves_layer_on_without_overlay() {
        let mut s = session_with(StubService::down(), StubGeocoder(Ok(Vec::new())));
        s.set_layer_visible(LayerId::Minerals, true).await;
        assert!(s.visibility().minerals);
        assert!(s.minerals().is_none());
        assert_eq!(s.notices().len(), 1);
    }

    #[tokio::test]
    async fn short_query_is_not_sent() {
        let mut s = session(GOLD_POINT);
        assert!(s.search(" W ").await.is_empty());
        assert_eq!(s.notices()[0].message, QUERY_TOO_SHORT);
    }

    #[tokio::test]
    async fn geocoder_failure_falls_back_to_gazetteer() {
        let mut s = session_with(
            StubService::ok(GOLD_POINT),
            StubGeocoder(Err("dns failure".to_string())),
        );
        let names: Vec<String> = s
            .search("walvis")
            .await
            .iter()
            .map(|p| p.display_name.clone())
            .collect();
        assert_eq!(names, vec!["Walvis Bay, Namibia"]);

        let marker = s.select_search_result(0, Instant::now()).unwrap();
        assert_eq!(marker.title, "Walvis Bay, Namibia");
        assert_eq!(s.view().zoom, PLACE_ZOOM);
        assert!(s.search_results().is_empty());
    }

    #[tokio::test]
    async fn empty_search_raises_notice() {
        let mut s = session(GOLD_POINT);
        s.search("atlantis").await;
        assert_eq!(s.notices().last().unwrap().message, NO_RESULTS);
    }

    #[test]
    fn go_to_inside_and_outside() {
        let mut s = session(GOLD_POINT);
        assert_eq!(s.go_to("-22.5", "17.0"), Ok(LatLng::new(-22.5, 17.0)));
        assert_eq!(s.view().center, LatLng::new(-22.5, 17.0));
        assert_eq!(s.view().zoom, PLACE_ZOOM);

        let before = *s.view();
        assert!(s.go_to("-10.0", "17.0").is_err());
        assert_eq!(*s.view(), before);
        assert_eq!(s.notices().last().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn location_inside_outside_and_error() {
        let mut s = session(GOLD_POINT);
        let marker = s
            .report_location(LocationReport::Fix {
                lat: -22.5,
                lng: 17.0,
                accuracy_m: 12.0,
            })
            .copied()
            .unwrap();
        assert_eq!(marker.circle_radius_m(), 100.0);
        assert_eq!(s.view().zoom, LOCATION_ZOOM);

        assert!(
            s.report_location(LocationReport::Fix {
                lat: 51.5,
                lng: -0.1,
                accuracy_m: 12.0
            })
            .is_none()
        );
        assert_eq!(s.notices().last().unwrap().message, OUTSIDE_NAMIBIA);

        s.report_location(LocationReport::Error {
            message: "User denied Geolocation".to_string(),
        });
        assert_eq!(
            s.notices().last().unwrap().message,
            "Error getting your location: User denied Geolocation"
        );
    }

    #[test]
    fn basemap_switch_is_noop_when_unchanged() {
        let mut s = session(GOLD_POINT);
        assert!(!s.set_basemap(Basemap::Osm));
        assert!(s.set_basemap(Basemap::Terrain));
        for _ in 0..20 {
            s.zoom_in();
        }
        assert_eq!(s.view().zoom, 17);
        s.full_extent();
        assert_eq!(s.view().zoom, FULL_EXTENT_ZOOM);
    }

    #[tokio::test]
    async fn clear_map_resets_everything() {
        let mut s = session(GOLD_POINT);
        s.activate_tool(ToolMode::SelectByPolygon);
        s.handle_event(polygon_drawn()).await;
        s.go_to("-22.5", "17.0").unwrap();

        s.clear_map();
        let snap = s.snapshot(Instant::now());
        assert_eq!(snap.tool, ToolMode::None);
        assert!(snap.drawn.is_empty());
        assert!(snap.selection.is_none());
        assert!(snap.search_marker.is_none());
        assert!(!snap.measurement.visible);
        assert!(snap.controls.is_empty());
        assert_eq!(s.notices().last().unwrap().message, MAP_CLEARED);
    }
}
