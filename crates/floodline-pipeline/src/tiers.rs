//! Stage 3: tiered buffers around the filtered footprints
//!
//! Unions all footprints in an auto-detected UTM CRS and emits one labeled
//! buffer polygon per configured tier, in tier order.

use std::path::Path;

use floodline_core::config::{PipelineConfig, TierSpec};
use floodline_core::error::{FloodlineError, Result};
use floodline_core::formats;
use floodline_core::models::{Crs, Feature, VectorLayer};
use floodline_geo::{spatial, transform, utm};
use geo::Geometry;
use tracing::info;

/// Generate the configured buffer tiers around the footprints at
/// `footprints_path` and write them to `out_path`. Returns the written
/// feature count (one per tier).
pub fn generate_tiered_buffers(
    footprints_path: &Path,
    out_path: &Path,
    config: &PipelineConfig,
) -> Result<usize> {
    info!("Loading footprints");
    let footprints = formats::read_vector_layer(footprints_path)?;

    let buffers = tiered_buffers(&footprints, &config.tiers)?;

    formats::write_geojson_layer(&buffers, out_path)?;
    info!(count = buffers.len(), path = %out_path.display(), "Saved tiered buffers");
    Ok(buffers.len())
}

/// In-memory tier generation: one feature per tier, each carrying a `tier`
/// property, in the order the tiers were configured. Returned in WGS 84.
pub fn tiered_buffers(footprints: &VectorLayer, tiers: &[TierSpec]) -> Result<VectorLayer> {
    if footprints.crs.is_none() {
        return Err(FloodlineError::MissingCrs { layer: footprints.name.clone() });
    }

    let footprints = transform::reproject_layer(footprints, Crs::wgs84())?;

    let polygons: Vec<geo::Polygon<f64>> = footprints
        .geometries()
        .flat_map(spatial::flatten_polygons)
        .collect();
    if polygons.is_empty() {
        return Err(FloodlineError::EmptyLayer { layer: footprints.name.clone() });
    }

    let union_wgs84 = spatial::union_all(&polygons);
    let utm_crs = utm::utm_crs_for(&Geometry::MultiPolygon(union_wgs84))?;
    info!(zone = %utm_crs, "Auto-detected UTM zone");

    let footprints_utm = transform::reproject_layer(&footprints, utm_crs)?;
    let union_utm = spatial::union_all(
        &footprints_utm
            .geometries()
            .flat_map(spatial::flatten_polygons)
            .collect::<Vec<_>>(),
    );

    let features: Vec<Feature> = tiers
        .iter()
        .map(|tier| {
            let buffered = spatial::buffer(&Geometry::MultiPolygon(union_utm.clone()), tier.meters());
            Feature::new(Geometry::MultiPolygon(buffered))
                .with_property("tier", tier.label.clone().into())
        })
        .collect();

    let layer = VectorLayer::new("tiered_buffers", Some(utm_crs), features);
    transform::reproject_layer(&layer, Crs::wgs84())
}
