//! Canonical layer and CRS models passed between pipeline stages.

use geojson::JsonObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate reference system identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
}

impl Crs {
    pub fn new(epsg: u32) -> Self {
        Self { epsg }
    }

    /// WGS 84 geographic coordinates, the interchange CRS of every stage.
    pub fn wgs84() -> Self {
        Self { epsg: 4326 }
    }

    /// A UTM zone CRS. `north` selects the hemisphere band.
    pub fn utm(zone: u32, north: bool) -> Self {
        let base = if north { 32600 } else { 32700 };
        Self { epsg: base + zone }
    }

    pub fn is_geographic(&self) -> bool {
        self.epsg == 4326
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// One record of a vector layer: a geometry plus its GeoJSON-style
/// property map.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: geo::Geometry<f64>,
    pub properties: JsonObject,
}

impl Feature {
    pub fn new(geometry: geo::Geometry<f64>) -> Self {
        Self { geometry, properties: JsonObject::new() }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// An in-memory vector layer as read from (or about to be written to) a file.
///
/// `crs` is `None` when the source file carries no CRS information (a
/// shapefile without a `.prj`); stages that need one fail fast on `None`.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    pub name: String,
    pub crs: Option<Crs>,
    pub features: Vec<Feature>,
}

impl VectorLayer {
    pub fn new(name: impl Into<String>, crs: Option<Crs>, features: Vec<Feature>) -> Self {
        Self { name: name.into(), crs, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over the layer's geometries.
    pub fn geometries(&self) -> impl Iterator<Item = &geo::Geometry<f64>> {
        self.features.iter().map(|f| &f.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_crs_codes() {
        assert_eq!(Crs::utm(12, true).epsg, 32612);
        assert_eq!(Crs::utm(33, false).epsg, 32733);
        assert!(Crs::wgs84().is_geographic());
        assert!(!Crs::utm(12, true).is_geographic());
    }

    #[test]
    fn crs_display() {
        assert_eq!(Crs::wgs84().to_string(), "EPSG:4326");
    }
}
