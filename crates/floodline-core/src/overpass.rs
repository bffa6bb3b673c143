//! Overpass API client
//!
//! One GET per pipeline run: building footprints ("way" and "relation"
//! features with full geometry) inside a bounding box. The response's
//! `elements` array is kept as raw JSON so a single malformed element can be
//! skipped without failing the whole fetch.

use geo::Rect;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::OverpassConfig;
use crate::error::Result;

/// Overpass API client.
pub struct OverpassClient {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

/// Raw Overpass response body.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
}

/// Result of converting Overpass elements to footprint polygons.
///
/// Malformed elements are counted rather than silently dropped so the caller
/// can report how many were skipped.
#[derive(Debug, Default)]
pub struct ParsedFootprints {
    pub polygons: Vec<geo::Polygon<f64>>,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct ElementGeometry {
    geometry: Vec<LonLat>,
}

#[derive(Debug, Deserialize)]
struct LonLat {
    lon: f64,
    lat: f64,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    /// Overpass QL query for building ways and relations inside `bbox`
    /// (geographic coordinates), with full geometry output.
    pub fn building_query(&self, bbox: &Rect<f64>) -> String {
        let (west, south) = (bbox.min().x, bbox.min().y);
        let (east, north) = (bbox.max().x, bbox.max().y);
        format!(
            "[out:json][timeout:{t}];\n(\n  way[\"building\"]({s},{w},{n},{e});\n  relation[\"building\"]({s},{w},{n},{e});\n);\nout geom;",
            t = self.timeout_secs,
            s = south,
            w = west,
            n = north,
            e = east,
        )
    }

    /// Fetch building footprints for `bbox`. A non-success HTTP status is
    /// fatal; there is no retry.
    pub async fn fetch_buildings(&self, bbox: &Rect<f64>) -> Result<OverpassResponse> {
        let query = self.building_query(bbox);
        debug!(endpoint = %self.endpoint, "Querying Overpass");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

/// Convert Overpass elements into closed-ring footprint polygons.
///
/// Elements without a `geometry` key are ignored. Elements whose geometry
/// fails to parse (a point missing `lon`/`lat`, or fewer than three points)
/// are counted in `skipped` and processing continues.
pub fn parse_footprints(response: &OverpassResponse) -> ParsedFootprints {
    let mut parsed = ParsedFootprints::default();

    for element in &response.elements {
        if element.get("geometry").is_none() {
            continue;
        }

        match serde_json::from_value::<ElementGeometry>(element.clone()) {
            Ok(el) if el.geometry.len() >= 3 => {
                let ring: Vec<(f64, f64)> =
                    el.geometry.iter().map(|p| (p.lon, p.lat)).collect();
                // geo closes the exterior ring if the source did not.
                parsed
                    .polygons
                    .push(geo::Polygon::new(geo::LineString::from(ring), vec![]));
            }
            _ => parsed.skipped += 1,
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square_element(x: f64, y: f64) -> serde_json::Value {
        json!({
            "type": "way",
            "id": 1,
            "geometry": [
                {"lon": x, "lat": y},
                {"lon": x + 0.001, "lat": y},
                {"lon": x + 0.001, "lat": y + 0.001},
                {"lon": x, "lat": y + 0.001},
                {"lon": x, "lat": y}
            ]
        })
    }

    #[test]
    fn malformed_element_is_skipped_not_fatal() {
        let response = OverpassResponse {
            elements: vec![
                square_element(-111.0, 45.7),
                // Missing "lat" key on one point
                json!({"type": "way", "id": 2, "geometry": [
                    {"lon": -111.0, "lat": 45.7},
                    {"lon": -111.0},
                    {"lon": -111.1, "lat": 45.8}
                ]}),
                // No geometry key at all: ignored, not counted
                json!({"type": "way", "id": 3, "tags": {"building": "yes"}}),
            ],
        };

        let parsed = parse_footprints(&response);
        assert_eq!(parsed.polygons.len(), 1);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn degenerate_ring_is_skipped() {
        let response = OverpassResponse {
            elements: vec![json!({"geometry": [
                {"lon": 0.0, "lat": 0.0},
                {"lon": 1.0, "lat": 1.0}
            ]})],
        };

        let parsed = parse_footprints(&response);
        assert!(parsed.polygons.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn query_uses_south_west_north_east_order() {
        let client = OverpassClient::new(&crate::config::OverpassConfig::default()).unwrap();
        let bbox = Rect::new(geo::coord! { x: -111.2, y: 45.6 }, geo::coord! { x: -111.0, y: 45.8 });
        let query = client.building_query(&bbox);

        assert!(query.starts_with("[out:json][timeout:60];"));
        assert!(query.contains("way[\"building\"](45.6,-111.2,45.8,-111)"));
        assert!(query.contains("relation[\"building\"]"));
        assert!(query.ends_with("out geom;"));
    }
}
