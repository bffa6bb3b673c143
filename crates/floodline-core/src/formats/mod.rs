//! Vector file formats
//!
//! Stages exchange data as whole files. Inputs may be GeoJSON or ESRI
//! Shapefile; every output is GeoJSON in WGS 84.

pub mod geojson;
pub mod shapefile;

use crate::error::{FloodlineError, Result};
use crate::models::VectorLayer;
use std::path::Path;

/// Read a vector layer, dispatching on the file extension.
pub fn read_vector_layer(path: &Path) -> Result<VectorLayer> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "geojson" | "json" => geojson::read_layer(path),
        "shp" => shapefile::read_layer(path),
        _ => Err(FloodlineError::UnsupportedFormat { path: path.to_path_buf() }),
    }
}

/// Write a layer to `path` as a GeoJSON FeatureCollection, replacing any
/// existing file.
pub fn write_geojson_layer(layer: &VectorLayer, path: &Path) -> Result<()> {
    geojson::write_layer(layer, path)
}
