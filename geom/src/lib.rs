//! Geometry primitives for working with OSM data in GPS space.

#[macro_use]
extern crate anyhow;

mod distance;
mod gps;
mod polyline;
mod ring;
mod tile;

pub use crate::distance::Distance;
pub use crate::gps::{HashableLonLat, LonLat};
pub use crate::polyline::PolyLine;
pub use crate::ring::Ring;
pub use crate::tile::SlippyTile;
