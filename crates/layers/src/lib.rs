pub mod basemap;
pub mod download;
pub mod layer;
pub mod legend;
pub mod symbology;

pub use basemap::*;
pub use download::*;
pub use layer::*;
pub use legend::*;
pub use symbology::*;
