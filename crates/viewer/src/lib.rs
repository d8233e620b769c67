//! Session core of the map viewer.
//!
//! A [`Session`] owns everything one browser tab sees: the active tool, the
//! selection result, layer and basemap state, search and location markers,
//! and the notices raised along the way.

pub mod config;
pub mod engine;
pub mod forms;
pub mod overlay;
pub mod places;
pub mod session;
pub mod view;

pub use config::*;
pub use engine::*;
pub use forms::*;
pub use overlay::*;
pub use places::*;
pub use session::*;
pub use view::*;
