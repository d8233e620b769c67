//! Exclusive interactive tool modes.
//!
//! There is one entry point, [`ToolCoordinator::activate`]. Activating a mode
//! first tears down whatever mode is current, so listeners and controls from
//! an earlier mode can never outlive it.

use serde::{Deserialize, Serialize};

use crate::surface::{Control, Handler, ListenerId, MapEventKind, MapSurface, ShapeKind};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    #[default]
    None,
    Measure,
    DrawPolygon,
    DrawPolyline,
    SelectByPolygon,
    SelectByPoint,
}

impl ToolMode {
    pub const ALL: [ToolMode; 6] = [
        ToolMode::None,
        ToolMode::Measure,
        ToolMode::DrawPolygon,
        ToolMode::DrawPolyline,
        ToolMode::SelectByPolygon,
        ToolMode::SelectByPoint,
    ];

    pub fn control(self) -> Option<Control> {
        match self {
            ToolMode::None | ToolMode::SelectByPoint => None,
            ToolMode::Measure => Some(Control::Measure),
            ToolMode::DrawPolygon | ToolMode::SelectByPolygon => {
                Some(Control::Draw(ShapeKind::Polygon))
            }
            ToolMode::DrawPolyline => Some(Control::Draw(ShapeKind::Polyline)),
        }
    }

    pub fn listeners(self) -> &'static [(MapEventKind, Handler)] {
        match self {
            ToolMode::None => &[],
            ToolMode::Measure => &[
                (MapEventKind::MeasureStart, Handler::MeasureProgress),
                (MapEventKind::MeasureFinish, Handler::MeasureResult),
            ],
            ToolMode::DrawPolygon => &[(
                MapEventKind::ShapeCreated,
                Handler::ShapeMeasurement(ShapeKind::Polygon),
            )],
            ToolMode::DrawPolyline => &[(
                MapEventKind::ShapeCreated,
                Handler::ShapeMeasurement(ShapeKind::Polyline),
            )],
            ToolMode::SelectByPolygon => &[
                (
                    MapEventKind::ShapeCreated,
                    Handler::ShapeMeasurement(ShapeKind::Polygon),
                ),
                (MapEventKind::ShapeCreated, Handler::PolygonSelection),
            ],
            ToolMode::SelectByPoint => &[(MapEventKind::Click, Handler::PointSelection)],
        }
    }

    /// Ids of the toolbar buttons shown as active for this mode.
    pub fn indicators(self) -> &'static [&'static str] {
        match self {
            ToolMode::None => &[],
            ToolMode::Measure => &["measureTool", "activateMeasure"],
            ToolMode::DrawPolygon => &["drawPolygon", "activateDrawing"],
            ToolMode::DrawPolyline => &["drawPolyline", "activateDrawing"],
            ToolMode::SelectByPolygon => &["selectByPolygon", "activateSelectPolygon"],
            ToolMode::SelectByPoint => &["selectByPoint", "activateSelectPoint"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolMode::None => "none",
            ToolMode::Measure => "measure",
            ToolMode::DrawPolygon => "draw_polygon",
            ToolMode::DrawPolyline => "draw_polyline",
            ToolMode::SelectByPolygon => "select_by_polygon",
            ToolMode::SelectByPoint => "select_by_point",
        }
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a mode change.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub deactivated: Option<ToolMode>,
    pub activated: Option<ToolMode>,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.deactivated.is_none() && self.activated.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ToolCoordinator {
    active: ToolMode,
    attached: Vec<ListenerId>,
}

impl ToolCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ToolMode {
        self.active
    }

    pub fn indicators(&self) -> &'static [&'static str] {
        self.active.indicators()
    }

    /// Switches to `mode`. Activating the mode that is already active turns
    /// it off.
    pub fn activate(&mut self, mode: ToolMode, surface: &mut impl MapSurface) -> Transition {
        if mode == self.active {
            return self.deactivate(surface);
        }

        let mut transition = self.deactivate(surface);
        if mode == ToolMode::None {
            return transition;
        }

        if let Some(control) = mode.control() {
            surface.add_control(control);
        }
        for (event, handler) in mode.listeners() {
            self.attached.push(surface.on(*event, *handler));
        }
        self.active = mode;
        transition.activated = Some(mode);
        transition
    }

    /// Tears down the active mode. Calling it with nothing active does nothing.
    pub fn deactivate(&mut self, surface: &mut impl MapSurface) -> Transition {
        if self.active == ToolMode::None {
            return Transition::default();
        }

        for id in self.attached.drain(..) {
            surface.off(id);
        }
        if let Some(control) = self.active.control() {
            surface.remove_control(control);
        }
        let previous = std::mem::take(&mut self.active);
        Transition {
            deactivated: Some(previous),
            activated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ToolCoordinator, ToolMode, Transition};
    use crate::surface::{Control, Handler, MapEvent, MapEventKind, MapSurface, ShapeKind, Surface};
    use foundation::LatLng;
    use pretty_assertions::assert_eq;

    fn shape(kind: ShapeKind) -> MapEvent {
        MapEvent::ShapeCreated {
            shape: kind,
            vertices: vec![
                LatLng::new(-22.0, 17.0),
                LatLng::new(-22.0, 18.0),
                LatLng::new(-23.0, 18.0),
            ],
        }
    }

    #[test]
    fn starts_with_nothing_active() {
        let coordinator = ToolCoordinator::new();
        assert_eq!(coordinator.active(), ToolMode::None);
        assert!(coordinator.indicators().is_empty());
    }

    #[test]
    fn activating_twice_toggles_off() {
        let mut surface = Surface::new();
        let mut c = ToolCoordinator::new();
        c.activate(ToolMode::Measure, &mut surface);
        assert_eq!(surface.controls(), &[Control::Measure]);

        let t = c.activate(ToolMode::Measure, &mut surface);
        assert_eq!(
            t,
            Transition {
                deactivated: Some(ToolMode::Measure),
                activated: None
            }
        );
        assert_eq!(c.active(), ToolMode::None);
        assert!(surface.controls().is_empty());
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn switching_modes_detaches_previous_listeners() {
        let mut surface = Surface::new();
        let mut c = ToolCoordinator::new();
        c.activate(ToolMode::DrawPolyline, &mut surface);
        let t = c.activate(ToolMode::SelectByPoint, &mut surface);
        assert_eq!(t.deactivated, Some(ToolMode::DrawPolyline));
        assert_eq!(t.activated, Some(ToolMode::SelectByPoint));

        assert!(surface.dispatch(&shape(ShapeKind::Polyline)).is_empty());
        assert!(surface.controls().is_empty());
        assert_eq!(
            surface.dispatch(&MapEvent::Click {
                at: LatLng::new(-22.5, 17.0)
            }),
            vec![Handler::PointSelection]
        );
        assert_eq!(c.indicators(), &["selectByPoint", "activateSelectPoint"]);
    }

    #[test]
    fn select_by_polygon_measures_then_selects() {
        let mut surface = Surface::new();
        let mut c = ToolCoordinator::new();
        c.activate(ToolMode::SelectByPolygon, &mut surface);
        assert_eq!(
            surface.dispatch(&shape(ShapeKind::Polygon)),
            vec![
                Handler::ShapeMeasurement(ShapeKind::Polygon),
                Handler::PolygonSelection
            ]
        );
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut surface = Surface::new();
        let mut c = ToolCoordinator::new();
        assert!(c.deactivate(&mut surface).is_noop());
        c.activate(ToolMode::DrawPolygon, &mut surface);
        assert!(!c.deactivate(&mut surface).is_noop());
        assert!(c.deactivate(&mut surface).is_noop());
    }

    #[test]
    fn at_most_one_mode_after_any_sequence() {
        let mut surface = Surface::new();
        let mut c = ToolCoordinator::new();
        let unrelated = surface.on(MapEventKind::MouseMove, Handler::CoordinateReadout);

        let sequence = [
            ToolMode::Measure,
            ToolMode::DrawPolygon,
            ToolMode::DrawPolygon,
            ToolMode::SelectByPolygon,
            ToolMode::None,
            ToolMode::SelectByPoint,
            ToolMode::DrawPolyline,
            ToolMode::Measure,
        ];
        for mode in sequence {
            c.activate(mode, &mut surface);
            let expected = c.active().listeners().len() + 1;
            assert_eq!(surface.listener_count(), expected, "after {mode}");
            assert!(surface.controls().len() <= 1);
            assert_eq!(surface.controls().first().copied(), c.active().control());
        }

        assert_eq!(c.active(), ToolMode::Measure);
        assert!(surface.off(unrelated));
    }
}
