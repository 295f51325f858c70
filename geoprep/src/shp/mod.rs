use std::path::Path;

use geo::GeodesicArea;
use geo_types::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use log::warn;
use shapefile::{PolygonRing, Shape, ShapeReader};

use crate::models::{Crs, PropertyInfo};
use crate::reproject::Reprojector;

/// Converts claim-boundary shapefiles into GeoJSON property features.
///
/// Survey shapefiles usually arrive in a projected CRS (UTM Zone 9N for the
/// Golden Triangle claims); pass that CRS as `source` and every ring is
/// reprojected to WGS84 on the way out. Records in the companion `.dbf` are
/// ignored: property names come from the caller or the file stem, which is
/// how the claim packages are organized on disk.
pub struct ShpConverter {
    reprojector: Option<Reprojector>,
}

impl ShpConverter {
    pub fn new(source: Option<&Crs>) -> anyhow::Result<Self> {
        let reprojector = match source {
            Some(crs) if !crs.is_geographic() => Some(Reprojector::new(crs, &Crs::Wgs84)?),
            _ => None,
        };
        Ok(Self { reprojector })
    }

    /// Converts one shapefile into features, one per polygon shape.
    pub fn convert<P: AsRef<Path>>(
        &self,
        path: P,
        name: Option<&str>,
    ) -> anyhow::Result<Vec<Feature>> {
        let path = path.as_ref();
        let property_name = match name {
            Some(n) => n.to_string(),
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_uppercase())
                .ok_or_else(|| anyhow!("Cannot derive a property name from {:?}", path))?,
        };

        let mut reader = ShapeReader::from_path(path)?;
        let mut features = Vec::new();
        for shape in reader.iter_shapes() {
            match shape? {
                Shape::Polygon(polygon) => {
                    features.push(self.polygon_to_feature(&polygon, &property_name)?);
                }
                other => {
                    warn!(
                        "{}: skipping unsupported shape type {}",
                        property_name, other
                    );
                }
            }
        }
        if features.is_empty() {
            bail!("No polygon shapes found in {:?}", path);
        }
        Ok(features)
    }

    /// Converts many shapefiles into one FeatureCollection.
    pub fn convert_all(
        &self,
        inputs: &[(Option<String>, String)],
    ) -> anyhow::Result<FeatureCollection> {
        let mut features = Vec::new();
        for (name, path) in inputs {
            features.extend(self.convert(path, name.as_deref())?);
        }
        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    fn polygon_to_feature(
        &self,
        polygon: &shapefile::Polygon,
        name: &str,
    ) -> anyhow::Result<Feature> {
        let mut rings: Vec<Vec<Vec<f64>>> = Vec::new();
        for ring in polygon.rings() {
            let mut coords = Vec::with_capacity(ring.points().len());
            for point in ring.points() {
                let (x, y) = match &self.reprojector {
                    Some(reprojector) => reprojector.transform_coord(point.x, point.y)?,
                    None => (point.x, point.y),
                };
                coords.push(vec![x, y]);
            }
            close_ring(&mut coords);
            // GeoJSON wants the outer ring first; shapefiles interleave.
            match ring {
                PolygonRing::Outer(_) => rings.insert(0, coords),
                PolygonRing::Inner(_) => rings.push(coords),
            }
        }
        if rings.is_empty() {
            bail!("{}: polygon has no rings", name);
        }

        let info = PropertyInfo {
            name: name.to_string(),
            company: None,
            hectares: hectares(&rings),
            center: ring_center(&rings[0]),
        };
        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), info.name.clone().into());
        properties.insert("hectares".to_string(), info.hectares.into());
        properties.insert(
            "center".to_string(),
            serde_json::json!([info.center[0], info.center[1]]),
        );

        Ok(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(rings))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
    }
}

fn close_ring(coords: &mut Vec<Vec<f64>>) {
    if let (Some(first), Some(last)) = (coords.first().cloned(), coords.last()) {
        if first != *last {
            coords.push(first);
        }
    }
}

/// Mean of the outer-ring vertices. Crude, but it matches where the front
/// end already places its labels.
fn ring_center(ring: &[Vec<f64>]) -> [f64; 2] {
    let n = ring.len() as f64;
    let (sum_x, sum_y) = ring
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sum_x / n, sum_y / n]
}

fn hectares(rings: &[Vec<Vec<f64>>]) -> f64 {
    let to_line = |ring: &Vec<Vec<f64>>| {
        LineString::from(
            ring.iter()
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect::<Vec<_>>(),
        )
    };
    let exterior = to_line(&rings[0]);
    let interiors: Vec<LineString<f64>> = rings[1..].iter().map(to_line).collect();
    let polygon = Polygon::new(exterior, interiors);
    polygon.geodesic_area_unsigned() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::Point;

    fn utm_square() -> shapefile::Polygon {
        // 1 km x 1 km on the UTM 9N central meridian.
        shapefile::Polygon::new(PolygonRing::Outer(vec![
            Point::new(500000.0, 6200000.0),
            Point::new(501000.0, 6200000.0),
            Point::new(501000.0, 6201000.0),
            Point::new(500000.0, 6201000.0),
            Point::new(500000.0, 6200000.0),
        ]))
    }

    #[test]
    fn test_polygon_to_feature_reprojects() {
        let converter =
            ShpConverter::new(Some(&Crs::Utm { zone: 9, north: true })).unwrap();
        let feature = converter.polygon_to_feature(&utm_square(), "FIJI").unwrap();

        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props.get("name").unwrap(), "FIJI");
        // A 1 km square is about 100 ha on the ground (UTM scale factor
        // makes it slightly more).
        let hectares = props.get("hectares").unwrap().as_f64().unwrap();
        assert!((hectares - 100.0).abs() < 1.0, "hectares {}", hectares);

        match &feature.geometry.as_ref().unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                for position in &rings[0] {
                    assert!(position[0] > -129.1 && position[0] < -128.9);
                    assert!(position[1] > 55.5 && position[1] < 56.3);
                }
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_center_is_ring_mean() {
        let converter = ShpConverter::new(None).unwrap();
        let feature = converter.polygon_to_feature(&utm_square(), "RAM").unwrap();
        let props = feature.properties.unwrap();
        let center = props.get("center").unwrap().as_array().unwrap();
        // Closed ring repeats the first vertex, which skews the mean; that
        // is exactly what the site has always shown.
        assert!(center[0].as_f64().unwrap() > 500000.0);
        assert!(center[1].as_f64().unwrap() > 6200000.0);
    }

    #[test]
    fn test_ring_closure() {
        let mut coords = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        close_ring(&mut coords);
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[0], coords[3]);
    }
}
