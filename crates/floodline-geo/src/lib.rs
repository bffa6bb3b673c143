//! Floodline Geo - CRS detection, reprojection, and planar spatial operations
//!
//! Everything here works on `geo` geometries in a single CRS; distance
//! operations (buffers) are only meaningful after reprojecting into the UTM
//! zone `utm::utm_epsg` picks.

pub mod spatial;
pub mod transform;
pub mod utm;
