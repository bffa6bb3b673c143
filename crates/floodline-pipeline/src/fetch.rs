//! Stage 1: fetch building footprints for an area of interest
//!
//! Loads the AOI, queries Overpass for buildings inside its bounding box,
//! clips the returned footprints to the AOI shape, and writes them as
//! GeoJSON in WGS 84.

use std::path::Path;

use floodline_core::config::PipelineConfig;
use floodline_core::error::{FloodlineError, Result};
use floodline_core::formats;
use floodline_core::models::{Crs, Feature, VectorLayer};
use floodline_core::overpass::{parse_footprints, OverpassClient, ParsedFootprints};
use floodline_geo::{spatial, transform};
use geo::{BoundingRect, HasDimensions, MultiPolygon, Rect};
use tracing::{info, warn};

/// Outcome of a fetch run.
#[derive(Debug, Clone, Copy)]
pub struct FetchReport {
    /// Features written to the output file.
    pub written: usize,
    /// Overpass elements skipped because their geometry was malformed.
    pub skipped: usize,
}

/// Fetch building footprints inside the AOI at `aoi_path` and write them to
/// `out_path`.
pub async fn fetch_footprints(
    aoi_path: &Path,
    out_path: &Path,
    config: &PipelineConfig,
) -> Result<FetchReport> {
    let aoi = formats::read_vector_layer(aoi_path)?;
    info!(layer = %aoi.name, features = aoi.len(), "Loaded AOI");

    let (mask, bbox) = prepare_aoi(&aoi)?;

    info!("Downloading OSM buildings from Overpass");
    let client = OverpassClient::new(&config.overpass)?;
    let response = client.fetch_buildings(&bbox).await?;

    let parsed = parse_footprints(&response);
    if parsed.skipped > 0 {
        warn!(skipped = parsed.skipped, "Skipped Overpass elements with malformed geometry");
    }

    let footprints = clip_to_aoi(&parsed, &mask);
    formats::write_geojson_layer(&footprints, out_path)?;
    info!(count = footprints.len(), path = %out_path.display(), "Saved buildings");

    Ok(FetchReport { written: footprints.len(), skipped: parsed.skipped })
}

/// Normalize the AOI to WGS 84, drop empty geometries, repair the rest, and
/// return the clip mask together with its bounding box.
pub fn prepare_aoi(aoi: &VectorLayer) -> Result<(MultiPolygon<f64>, Rect<f64>)> {
    let aoi = transform::reproject_layer(aoi, Crs::wgs84())?;

    let polygons: Vec<geo::Polygon<f64>> = aoi
        .geometries()
        .filter(|g| !g.is_empty())
        .flat_map(spatial::flatten_polygons)
        .flat_map(|p| spatial::repair(&p).0)
        .collect();

    let mask = spatial::union_all(&polygons);
    let bbox = mask.bounding_rect().ok_or_else(|| FloodlineError::EmptyLayer {
        layer: aoi.name.clone(),
    })?;

    Ok((mask, bbox))
}

/// Clip fetched footprints to the AOI mask, keeping only intersecting
/// portions. The result is a WGS 84 layer of attribute-less polygons.
pub fn clip_to_aoi(parsed: &ParsedFootprints, mask: &MultiPolygon<f64>) -> VectorLayer {
    let features: Vec<Feature> = parsed
        .polygons
        .iter()
        .filter_map(|polygon| spatial::clip(&geo::Geometry::Polygon(polygon.clone()), mask))
        .map(Feature::new)
        .collect();

    VectorLayer::new("buildings", Some(Crs::wgs84()), features)
}
