//! UTM zone auto-detection
//!
//! Picks a locally accurate projected CRS from a geographic coordinate. The
//! zone is taken from the longitude alone, which assumes the input is
//! geographically compact; there is no special handling near zone boundaries
//! or the poles.

use floodline_core::error::{FloodlineError, Result};
use floodline_core::models::Crs;
use geo::Centroid;

/// EPSG code of the UTM zone containing the given geographic coordinate.
///
/// Zone = `floor((lon + 180) / 6) + 1`, clamped to 1..=60; northern
/// hemisphere zones live at 32600 + zone, southern at 32700 + zone.
pub fn utm_epsg(lon: f64, lat: f64) -> u32 {
    let zone = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
    if lat >= 0.0 {
        32600 + zone
    } else {
        32700 + zone
    }
}

/// Auto-detect the UTM CRS for a geometry's centroid, which must be in
/// geographic coordinates.
pub fn utm_crs_for(geometry: &geo::Geometry<f64>) -> Result<Crs> {
    let centroid = geometry.centroid().ok_or_else(|| FloodlineError::EmptyLayer {
        layer: "centroid target".to_string(),
    })?;
    Ok(Crs::new(utm_epsg(centroid.x(), centroid.y())))
}
