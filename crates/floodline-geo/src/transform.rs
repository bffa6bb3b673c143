//! CRS transformation

use floodline_core::error::{FloodlineError, Result};
use floodline_core::models::{Crs, Feature, VectorLayer};
use geo::MapCoords;
use proj::Proj;
use tracing::debug;

/// Reproject a geometry between two CRS. A no-op when the codes match.
pub fn reproject_geometry(
    geometry: &geo::Geometry<f64>,
    from: Crs,
    to: Crs,
) -> Result<geo::Geometry<f64>> {
    if from == to {
        return Ok(geometry.clone());
    }

    let proj = projection(from, to)?;
    geometry.try_map_coords(|coord| {
        proj.convert((coord.x, coord.y))
            .map(|(x, y)| geo::Coord { x, y })
            .map_err(|e| FloodlineError::Projection {
                reason: format!("{} -> {}: {}", from, to, e),
            })
    })
}

/// Reproject every feature of a layer, producing a new layer tagged with the
/// target CRS. Fails fast when the layer has no CRS.
pub fn reproject_layer(layer: &VectorLayer, to: Crs) -> Result<VectorLayer> {
    let from = layer.crs.ok_or_else(|| FloodlineError::MissingCrs {
        layer: layer.name.clone(),
    })?;

    if from == to {
        return Ok(layer.clone());
    }

    debug!(layer = %layer.name, %from, %to, "Reprojecting layer");
    let features = layer
        .features
        .iter()
        .map(|f| {
            reproject_geometry(&f.geometry, from, to).map(|geometry| Feature {
                geometry,
                properties: f.properties.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(VectorLayer::new(layer.name.clone(), Some(to), features))
}

fn projection(from: Crs, to: Crs) -> Result<Proj> {
    Proj::new_known_crs(&from.to_string(), &to.to_string(), None).map_err(|e| {
        FloodlineError::Projection {
            reason: format!("Cannot build transform {} -> {}: {}", from, to, e),
        }
    })
}
