//! Map surface: the controls and event listeners attached to the map.
//!
//! Listeners are plain values (`Handler`) rather than closures. Dispatching an
//! event returns the handlers currently attached for it, and the session
//! decides what each one does.

use foundation::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Polygon,
    Polyline,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapEventKind {
    MouseMove,
    Click,
    MeasureStart,
    MeasureFinish,
    ShapeCreated,
}

/// Input coming from the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    MouseMove { at: LatLng },
    Click { at: LatLng },
    MeasureStart,
    MeasureFinish { points: Vec<LatLng> },
    ShapeCreated { shape: ShapeKind, vertices: Vec<LatLng> },
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::MouseMove { .. } => MapEventKind::MouseMove,
            MapEvent::Click { .. } => MapEventKind::Click,
            MapEvent::MeasureStart => MapEventKind::MeasureStart,
            MapEvent::MeasureFinish { .. } => MapEventKind::MeasureFinish,
            MapEvent::ShapeCreated { .. } => MapEventKind::ShapeCreated,
        }
    }
}

/// Interactive controls that can be added to the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "control", content = "shape", rename_all = "snake_case")]
pub enum Control {
    Measure,
    Draw(ShapeKind),
}

/// What a listener does when its event fires.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handler {
    /// Updates the cursor coordinate readout.
    CoordinateReadout,
    /// Shows "Measuring..." while a measurement is in progress.
    MeasureProgress,
    /// Shows the finished measurement.
    MeasureResult,
    /// Shows the area or length of a drawn shape of the given kind.
    ShapeMeasurement(ShapeKind),
    /// Runs a feature selection over a drawn polygon.
    PolygonSelection,
    /// Runs a feature selection around a clicked point.
    PointSelection,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ListenerId(pub u64);

pub trait MapSurface {
    fn add_control(&mut self, control: Control);

    /// Returns `true` if the control was attached.
    fn remove_control(&mut self, control: Control) -> bool;

    fn on(&mut self, event: MapEventKind, handler: Handler) -> ListenerId;

    /// Returns `true` if the listener was attached.
    fn off(&mut self, id: ListenerId) -> bool;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Listener {
    id: ListenerId,
    event: MapEventKind,
    handler: Handler,
}

/// In-process map surface.
///
/// Ordering contract: handlers are dispatched in attachment order.
#[derive(Debug, Default)]
pub struct Surface {
    next_id: u64,
    controls: Vec<Control>,
    listeners: Vec<Listener>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn handlers_for(&self, event: MapEventKind) -> Vec<Handler> {
        self.listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.handler)
            .collect()
    }

    /// Handlers that fire for `event`, in attachment order.
    pub fn dispatch(&self, event: &MapEvent) -> Vec<Handler> {
        self.handlers_for(event.kind())
    }
}

impl MapSurface for Surface {
    fn add_control(&mut self, control: Control) {
        if !self.controls.contains(&control) {
            self.controls.push(control);
        }
    }

    fn remove_control(&mut self, control: Control) -> bool {
        let before = self.controls.len();
        self.controls.retain(|c| *c != control);
        self.controls.len() != before
    }

    fn on(&mut self, event: MapEventKind, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, event, handler });
        id
    }

    fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::{Control, Handler, MapEvent, MapEventKind, MapSurface, ShapeKind, Surface};
    use foundation::LatLng;

    #[test]
    fn on_off_and_dispatch() {
        let mut s = Surface::new();
        let a = s.on(MapEventKind::Click, Handler::PointSelection);
        let b = s.on(MapEventKind::MouseMove, Handler::CoordinateReadout);
        assert_ne!(a, b);

        let click = MapEvent::Click {
            at: LatLng::new(-22.5, 17.0),
        };
        assert_eq!(s.dispatch(&click), vec![Handler::PointSelection]);

        assert!(s.off(a));
        assert!(!s.off(a));
        assert!(s.dispatch(&click).is_empty());
        assert_eq!(s.listener_count(), 1);
    }

    #[test]
    fn controls_are_unique() {
        let mut s = Surface::new();
        s.add_control(Control::Draw(ShapeKind::Polygon));
        s.add_control(Control::Draw(ShapeKind::Polygon));
        assert_eq!(s.controls().len(), 1);
        assert!(s.remove_control(Control::Draw(ShapeKind::Polygon)));
        assert!(!s.remove_control(Control::Draw(ShapeKind::Polygon)));
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let ev: MapEvent = serde_json::from_str(
            r#"{"type":"shape_created","shape":"polyline","vertices":[{"lat":-22.0,"lng":17.0}]}"#,
        )
        .unwrap();
        assert_eq!(ev.kind(), MapEventKind::ShapeCreated);
    }
}
