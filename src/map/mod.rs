mod basemap;
mod geometry;
mod markers;
mod projection;
mod renderer;

pub use basemap::load_basemap;
pub use markers::country_markers;
pub use renderer::{DisplaySettings, LineString, Lod, MapLayers, MapRenderer, Marker};
