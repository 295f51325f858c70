use geojson::{FeatureCollection, Value};
use log::debug;
use proj4rs::Proj;

use crate::models::Crs;

/// Transforms coordinates between two CRSs.
///
/// Wraps a pair of `proj4rs` projections. proj4rs works in radians for
/// geographic systems, so degree conversion happens at the boundary and
/// callers only ever see degrees (for WGS84) or meters (for projected CRSs).
pub struct Reprojector {
    from: Proj,
    to: Proj,
    from_geographic: bool,
    to_geographic: bool,
}

impl Reprojector {
    pub fn new(from: &Crs, to: &Crs) -> anyhow::Result<Self> {
        debug!("building reprojector {} -> {}", from, to);
        Ok(Self {
            from: Proj::from_proj_string(&from.proj_string())?,
            to: Proj::from_proj_string(&to.proj_string())?,
            from_geographic: from.is_geographic(),
            to_geographic: to.is_geographic(),
        })
    }

    /// Transforms a single coordinate pair.
    pub fn transform_coord(&self, x: f64, y: f64) -> anyhow::Result<(f64, f64)> {
        let mut point = if self.from_geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };
        proj4rs::transform::transform(&self.from, &self.to, &mut point)?;
        if self.to_geographic {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok((point.0, point.1))
        }
    }

    fn transform_position(&self, position: &mut Vec<f64>) -> anyhow::Result<()> {
        if position.len() < 2 {
            bail!("position with fewer than two ordinates");
        }
        let (x, y) = self.transform_coord(position[0], position[1])?;
        position[0] = x;
        position[1] = y;
        Ok(())
    }

    /// Transforms every geometry in a FeatureCollection in place. Properties
    /// are left untouched.
    pub fn transform_collection(&self, collection: &mut FeatureCollection) -> anyhow::Result<()> {
        for feature in collection.features.iter_mut() {
            let geometry = match feature.geometry.as_mut() {
                Some(g) => g,
                None => continue,
            };
            match &mut geometry.value {
                Value::Point(position) => self.transform_position(position)?,
                Value::MultiPoint(positions) | Value::LineString(positions) => {
                    for position in positions {
                        self.transform_position(position)?;
                    }
                }
                Value::MultiLineString(lines) | Value::Polygon(lines) => {
                    for line in lines {
                        for position in line {
                            self.transform_position(position)?;
                        }
                    }
                }
                Value::MultiPolygon(polygons) => {
                    for polygon in polygons {
                        for ring in polygon {
                            for position in ring {
                                self.transform_position(position)?;
                            }
                        }
                    }
                }
                Value::GeometryCollection(_) => {
                    bail!("GeometryCollection features are not supported")
                }
            }
        }
        Ok(())
    }
}
