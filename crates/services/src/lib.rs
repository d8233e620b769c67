//! Remote service protocols used by the viewer.
//!
//! - WFS `GetFeature` request building and response decoding
//! - Place search (geocoder) requests, responses and the offline gazetteer
//! - Async client traits with reqwest-backed implementations

pub mod client;
pub mod error;
pub mod feature;
pub mod geocode;
pub mod wfs;

pub use client::*;
pub use error::*;
pub use feature::*;
pub use geocode::*;
pub use wfs::*;
