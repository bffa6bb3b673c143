//! Stage 2: filter footprints by river proximity
//!
//! Buffers the river network by a fixed distance in an auto-detected UTM CRS
//! and keeps the footprint portions inside that buffer.

use std::path::Path;

use floodline_core::config::{PipelineConfig, MILE_IN_METERS};
use floodline_core::error::{FloodlineError, Result};
use floodline_core::formats;
use floodline_core::models::{Crs, Feature, VectorLayer};
use floodline_geo::{spatial, transform, utm};
use geo::Geometry;
use tracing::info;

/// Filter the footprints at `footprints_path` to those within the configured
/// buffer distance of the rivers at `rivers_path`; write the survivors to
/// `out_path`. Returns the written feature count.
pub fn filter_by_river_proximity(
    rivers_path: &Path,
    footprints_path: &Path,
    out_path: &Path,
    config: &PipelineConfig,
) -> Result<usize> {
    info!("Loading layers");
    let rivers = formats::read_vector_layer(rivers_path)?;
    let footprints = formats::read_vector_layer(footprints_path)?;

    let buffer_meters = config.proximity.buffer_miles * MILE_IN_METERS;
    let filtered = proximity_filter(&rivers, &footprints, buffer_meters)?;

    formats::write_geojson_layer(&filtered, out_path)?;
    info!(count = filtered.len(), path = %out_path.display(), "Saved footprints near rivers");
    Ok(filtered.len())
}

/// In-memory proximity filter: footprint portions within `buffer_meters` of
/// any river geometry, returned in WGS 84.
pub fn proximity_filter(
    rivers: &VectorLayer,
    footprints: &VectorLayer,
    buffer_meters: f64,
) -> Result<VectorLayer> {
    if rivers.crs.is_none() {
        return Err(FloodlineError::MissingCrs { layer: rivers.name.clone() });
    }

    // Normalize both layers to geographic coordinates before zone detection.
    let rivers = transform::reproject_layer(rivers, Crs::wgs84())?;
    let footprints = transform::reproject_layer(footprints, Crs::wgs84())?;

    let river_collection = Geometry::GeometryCollection(geo::GeometryCollection::new_from(
        rivers.geometries().cloned().collect(),
    ));
    let utm_crs = utm::utm_crs_for(&river_collection)?;
    info!(zone = %utm_crs, "Auto-detected UTM zone");

    let rivers_utm = transform::reproject_layer(&rivers, utm_crs)?;
    let footprints_utm = transform::reproject_layer(&footprints, utm_crs)?;

    info!(meters = buffer_meters, "Buffering river network");
    let river_geoms: Vec<Geometry<f64>> = rivers_utm.geometries().cloned().collect();
    let river_buffer = spatial::buffer_union(&river_geoms, buffer_meters);

    let kept: Vec<Feature> = footprints_utm
        .features
        .iter()
        .filter_map(|f| {
            spatial::clip(&f.geometry, &river_buffer).map(|geometry| Feature {
                geometry,
                properties: f.properties.clone(),
            })
        })
        .collect();

    let clipped = VectorLayer::new(footprints.name.clone(), Some(utm_crs), kept);
    transform::reproject_layer(&clipped, Crs::wgs84())
}
