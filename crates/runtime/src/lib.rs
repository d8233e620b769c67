pub mod loading;
pub mod notice;

pub use loading::*;
pub use notice::*;
