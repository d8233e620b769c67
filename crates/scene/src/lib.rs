pub mod attributes;
pub mod measure;
pub mod selection;
pub mod surface;
pub mod tool;

pub use attributes::*;
pub use measure::*;
pub use selection::*;
pub use surface::*;
pub use tool::*;
