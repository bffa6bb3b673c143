//! ESRI Shapefile reading
//!
//! A shapefile is a bundle of component files (.shp, .shx, .dbf, optional
//! .prj). The CRS comes from the `.prj` WKT; when it is absent the layer is
//! returned with no CRS and downstream stages decide whether that is fatal.

use shapefile::dbase::FieldValue;
use shapefile::{Reader, Shape};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{FloodlineError, Result};
use crate::models::{Crs, Feature, VectorLayer};

/// Read a `.shp` file (plus its component files) into a layer.
pub fn read_layer(path: &Path) -> Result<VectorLayer> {
    verify_components(path)?;

    let mut reader = Reader::from_path(path).map_err(|e| FloodlineError::Format {
        format: "Shapefile".to_string(),
        message: format!("Failed to open {}: {}", path.display(), e),
    })?;

    let crs = extract_crs(path)?;
    let mut features = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| FloodlineError::Format {
            format: "Shapefile".to_string(),
            message: format!("Failed to read feature: {}", e),
        })?;

        let Some(geometry) = convert_shape(shape) else {
            continue;
        };

        let mut properties = geojson::JsonObject::new();
        for (field, value) in record {
            properties.insert(field, field_to_json(value));
        }

        features.push(Feature { geometry, properties });
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();

    Ok(VectorLayer::new(name, crs, features))
}

/// All required component files must sit next to the `.shp`.
fn verify_components(path: &Path) -> Result<()> {
    let base = shapefile_base(path)?;
    let missing: Vec<String> = ["shp", "shx", "dbf"]
        .iter()
        .filter(|ext| !base.with_extension(ext).exists())
        .map(|ext| format!(".{}", ext))
        .collect();

    if !missing.is_empty() {
        return Err(FloodlineError::Format {
            format: "Shapefile".to_string(),
            message: format!(
                "{}: missing required component files: {}",
                path.display(),
                missing.join(", ")
            ),
        });
    }
    Ok(())
}

fn shapefile_base(path: &Path) -> Result<PathBuf> {
    let is_shp = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("shp"))
        .unwrap_or(false);

    if !is_shp {
        return Err(FloodlineError::UnsupportedFormat { path: path.to_path_buf() });
    }
    Ok(path.with_extension(""))
}

/// Extract the CRS from the `.prj` WKT, if one is present and carries an
/// EPSG authority code.
fn extract_crs(path: &Path) -> Result<Option<Crs>> {
    let prj_path = shapefile_base(path)?.with_extension("prj");
    if !prj_path.exists() {
        return Ok(None);
    }

    let wkt = fs::read_to_string(&prj_path)?;
    if let Some(epsg) = parse_epsg_from_wkt(&wkt) {
        return Ok(Some(Crs::new(epsg)));
    }

    // Common WGS 84 .prj files omit the AUTHORITY clause.
    if wkt.contains("GCS_WGS_1984") || wkt.contains("WGS 84") {
        return Ok(Some(Crs::wgs84()));
    }

    warn!(prj = %prj_path.display(), "Could not determine an EPSG code from .prj");
    Ok(None)
}

/// Look for the last `AUTHORITY["EPSG","<code>"]` clause; the outermost
/// authority appears last in well-formed WKT.
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    let start = wkt.rfind("AUTHORITY[\"EPSG\",\"")?;
    let code = &wkt[start + "AUTHORITY[\"EPSG\",\"".len()..];
    let end = code.find('"')?;
    code[..end].parse().ok()
}

fn convert_shape(shape: Shape) -> Option<geo::Geometry<f64>> {
    match shape {
        Shape::Point(p) => Some(geo::Geometry::Point(geo::Point::from(p))),
        Shape::Multipoint(mp) => Some(geo::Geometry::MultiPoint(mp.into())),
        Shape::Polyline(pl) => Some(geo::Geometry::MultiLineString(pl.into())),
        Shape::Polygon(pg) => Some(geo::Geometry::MultiPolygon(pg.into())),
        Shape::NullShape => None,
        _ => {
            warn!("Skipping unsupported shape type");
            None
        }
    }
}

fn field_to_json(value: FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Character(Some(s)) => serde_json::Value::String(s),
        FieldValue::Numeric(Some(n)) => serde_json::json!(n),
        FieldValue::Float(Some(f)) => serde_json::json!(f),
        FieldValue::Integer(i) => serde_json::json!(i),
        FieldValue::Double(d) => serde_json::json!(d),
        FieldValue::Logical(Some(b)) => serde_json::Value::Bool(b),
        FieldValue::Date(Some(d)) => {
            serde_json::Value::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        }
        _ => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_parsed_from_authority_clause() {
        let wkt = r#"PROJCS["WGS 84 / UTM zone 12N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],AUTHORITY["EPSG","4326"]],AUTHORITY["EPSG","32612"]]"#;
        assert_eq!(parse_epsg_from_wkt(wkt), Some(32612));
    }

    #[test]
    fn esri_wgs84_recognized_without_authority() {
        let wkt = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["Degree",0.0174532925199433]]"#;
        assert_eq!(parse_epsg_from_wkt(wkt), None);
        assert!(wkt.contains("GCS_WGS_1984"));
    }

    #[test]
    fn non_shp_extension_is_rejected() {
        assert!(matches!(
            read_layer(Path::new("rivers.gpkg")),
            Err(FloodlineError::UnsupportedFormat { .. })
        ));
    }
}
