// src/geo.rs
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

// Static boundary dataset for the choropleth: a GeoJSON FeatureCollection of
// region outlines, read once at startup and never mutated. Only the outer
// rings are kept; holes are irrelevant at dashboard zoom.

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    // One closed ring per polygon, [lon, lat] order as in the source file.
    pub rings: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone)]
pub struct BoundarySet {
    pub regions: Vec<Region>,
}

impl BoundarySet {
    // Lon/lat bounds across every ring, for fitting the projection to the
    // panel rect.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        let mut seen = false;
        for region in &self.regions {
            for ring in &region.rings {
                for point in ring {
                    seen = true;
                    min[0] = min[0].min(point[0]);
                    min[1] = min[1].min(point[1]);
                    max[0] = max[0].max(point[0]);
                    max[1] = max[1].max(point[1]);
                }
            }
        }
        seen.then_some((min, max))
    }
}

pub fn load_boundaries(path: &Path) -> Result<BoundarySet> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read boundary file {}", path.display()))?;
    parse_boundaries(&bytes)
}

pub fn parse_boundaries(bytes: &[u8]) -> Result<BoundarySet> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse boundary GeoJSON")?;
    let mut regions = Vec::new();

    if let Some(features) = value["features"].as_array() {
        for feature in features {
            let Some(name) = feature_name(feature) else {
                continue;
            };
            let geometry = &feature["geometry"];
            let rings = match geometry["type"].as_str() {
                Some("Polygon") => polygon_outer_ring(&geometry["coordinates"])
                    .into_iter()
                    .collect(),
                Some("MultiPolygon") => geometry["coordinates"]
                    .as_array()
                    .map(|polygons| {
                        polygons
                            .iter()
                            .filter_map(polygon_outer_ring)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
            if !rings.is_empty() {
                regions.push(Region { name, rings });
            }
        }
    }

    Ok(BoundarySet { regions })
}

fn feature_name(feature: &Value) -> Option<String> {
    let properties = feature["properties"].as_object()?;
    for key in ["NAME_1", "name"] {
        if let Some(name) = properties.get(key).and_then(Value::as_str) {
            return Some(name.to_string());
        }
    }
    None
}

// coordinates = [outer_ring, hole, hole, ...]; ring = [[lon, lat], ...]
fn polygon_outer_ring(coordinates: &Value) -> Option<Vec<[f64; 2]>> {
    let outer = coordinates.as_array()?.first()?.as_array()?;
    let ring: Vec<[f64; 2]> = outer
        .iter()
        .filter_map(|point| {
            let pair = point.as_array()?;
            Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
        })
        .collect();
    (ring.len() >= 3).then_some(ring)
}

// Ray-cast point-in-polygon over the outer rings; used for hover hit tests.
pub fn region_contains(region: &Region, lon: f64, lat: f64) -> bool {
    region.rings.iter().any(|ring| ring_contains(ring, lon, lat))
}

fn ring_contains(ring: &[[f64; 2]], lon: f64, lat: f64) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if ((yi > lat) != (yj > lat))
            && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"NAME_1": "West_Bengal"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[86.0, 21.5], [89.0, 21.5], [89.0, 27.0], [86.0, 27.0], [86.0, 21.5]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"NAME_1": "Kerala"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[74.8, 8.2], [77.4, 8.2], [77.4, 12.8], [74.8, 12.8], [74.8, 8.2]]],
                        [[[72.0, 10.0], [72.2, 10.0], [72.2, 10.2], [72.0, 10.2], [72.0, 10.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let set = parse_boundaries(SAMPLE.as_bytes()).unwrap();
        assert_eq!(set.regions.len(), 2);
        assert_eq!(set.regions[0].name, "West_Bengal");
        assert_eq!(set.regions[0].rings.len(), 1);
        assert_eq!(set.regions[1].rings.len(), 2);
    }

    #[test]
    fn bounds_cover_all_rings() {
        let set = parse_boundaries(SAMPLE.as_bytes()).unwrap();
        let (min, max) = set.bounds().unwrap();
        assert!(min[0] <= 72.0 && max[0] >= 89.0);
        assert!(min[1] <= 8.2 && max[1] >= 27.0);
    }

    #[test]
    fn hit_test_inside_and_outside() {
        let set = parse_boundaries(SAMPLE.as_bytes()).unwrap();
        let bengal = &set.regions[0];
        assert!(region_contains(bengal, 87.5, 24.0));
        assert!(!region_contains(bengal, 70.0, 24.0));
    }

    #[test]
    fn malformed_file_is_an_error_not_a_panic() {
        assert!(parse_boundaries(b"not json").is_err());
        let empty = parse_boundaries(b"{}").unwrap();
        assert!(empty.regions.is_empty());
        assert!(empty.bounds().is_none());
    }
}
