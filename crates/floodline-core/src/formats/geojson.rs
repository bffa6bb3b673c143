//! GeoJSON reading and writing

use std::fs;
use std::path::Path;

use crate::error::{FloodlineError, Result};
use crate::models::{Crs, Feature, VectorLayer};

/// Read a GeoJSON file into a layer.
///
/// Features without a geometry are dropped. The CRS defaults to EPSG:4326
/// per RFC 7946 unless a legacy `crs` foreign member names another code.
pub fn read_layer(path: &Path) -> Result<VectorLayer> {
    let content = fs::read_to_string(path)?;

    let geojson: geojson::GeoJson =
        content.parse().map_err(|e| FloodlineError::Format {
            format: "GeoJSON".to_string(),
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;

    let name = layer_name(path);
    let (features, crs) = match geojson {
        geojson::GeoJson::FeatureCollection(fc) => {
            let crs = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .unwrap_or(4326);
            let features = fc
                .features
                .into_iter()
                .filter_map(convert_feature)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            (features, crs)
        }
        geojson::GeoJson::Feature(feature) => {
            let features = convert_feature(feature).into_iter().collect::<std::result::Result<Vec<_>, _>>()?;
            (features, 4326)
        }
        geojson::GeoJson::Geometry(geometry) => {
            let geom = geo::Geometry::<f64>::try_from(geometry.value).map_err(geometry_error)?;
            (vec![Feature::new(geom)], 4326)
        }
    };

    Ok(VectorLayer::new(name, Some(Crs::new(crs)), features))
}

/// Write a layer as a GeoJSON FeatureCollection, overwriting `path`.
pub fn write_layer(layer: &VectorLayer, path: &Path) -> Result<()> {
    let features = layer
        .features
        .iter()
        .map(|f| geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&f.geometry))),
            id: None,
            properties: if f.properties.is_empty() {
                None
            } else {
                Some(f.properties.clone())
            },
            foreign_members: None,
        })
        .collect();

    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    fs::write(path, geojson::GeoJson::from(collection).to_string())?;
    Ok(())
}

fn convert_feature(feature: geojson::Feature) -> Option<Result<Feature>> {
    let geometry = feature.geometry?;
    let properties = feature.properties.unwrap_or_default();
    Some(
        geo::Geometry::<f64>::try_from(geometry.value)
            .map_err(geometry_error)
            .map(|geom| Feature { geometry: geom, properties }),
    )
}

fn geometry_error(e: geojson::Error) -> FloodlineError {
    FloodlineError::Format {
        format: "GeoJSON".to_string(),
        message: format!("Unsupported geometry: {}", e),
    }
}

/// Extract an EPSG code from a legacy `crs` member such as
/// `{"type": "name", "properties": {"name": "EPSG:3857"}}`.
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;
    let code = name.rsplit(':').next()?;
    code.parse().ok()
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_collection_defaults_to_wgs84() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("houses.geojson");
        fs::write(
            &path,
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "geometry": {"type": "Point", "coordinates": [-111.0, 45.7]},
                        "properties": {"tier": "a"}
                    },
                    {
                        "type": "Feature",
                        "geometry": null,
                        "properties": {}
                    }
                ]
            }"#,
        )
        .unwrap();

        let layer = read_layer(&path).unwrap();
        assert_eq!(layer.crs, Some(Crs::wgs84()));
        assert_eq!(layer.len(), 1, "null-geometry features are dropped");
        assert_eq!(layer.features[0].properties["tier"], "a");
    }

    #[test]
    fn read_legacy_crs_member() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projected.geojson");
        fs::write(
            &path,
            r#"{
                "type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": "EPSG:32612"}},
                "features": []
            }"#,
        )
        .unwrap();

        let layer = read_layer(&path).unwrap();
        assert_eq!(layer.crs, Some(Crs::new(32612)));
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.geojson");

        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let layer = VectorLayer::new(
            "out",
            Some(Crs::wgs84()),
            vec![Feature::new(geo::Geometry::Polygon(polygon)).with_property("tier", "buffer_0_15mi".into())],
        );

        write_layer(&layer, &path).unwrap();
        let read_back = read_layer(&path).unwrap();
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back.features[0].properties["tier"], "buffer_0_15mi");
        assert!(matches!(read_back.features[0].geometry, geo::Geometry::Polygon(_)));
    }

    #[test]
    fn overwrite_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.geojson");

        let point = |x: f64| {
            Feature::new(geo::Geometry::Point(geo::Point::new(x, 0.0)))
        };

        let two = VectorLayer::new("out", Some(Crs::wgs84()), vec![point(1.0), point(2.0)]);
        write_layer(&two, &path).unwrap();
        let one = VectorLayer::new("out", Some(Crs::wgs84()), vec![point(3.0)]);
        write_layer(&one, &path).unwrap();

        assert_eq!(read_layer(&path).unwrap().len(), 1);
    }
}
