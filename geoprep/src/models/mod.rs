use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coordinate reference systems the site data moves between.
///
/// Survey shapefiles arrive in a UTM zone, scanned regional maps are
/// georeferenced in Web Mercator, and the web front end wants everything in
/// WGS84 longitude/latitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crs {
    Wgs84,
    WebMercator,
    Utm { zone: u8, north: bool },
}

impl Crs {
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::Utm { zone, north } => {
                let base = if *north { 32600 } else { 32700 };
                base + *zone as u32
            }
        }
    }

    /// Proj4 init string understood by `proj4rs`.
    pub fn proj_string(&self) -> String {
        match self {
            Crs::Wgs84 => "+proj=longlat +datum=WGS84 +no_defs".to_string(),
            Crs::WebMercator => {
                "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs"
                    .to_string()
            }
            Crs::Utm { zone, north } => {
                let south = if *north { "" } else { " +south" };
                format!("+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs", zone, south)
            }
        }
    }

    /// True when coordinates are degrees rather than meters.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Wgs84)
    }
}

impl FromStr for Crs {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        let code = code.strip_prefix("epsg:").unwrap_or(&code);
        match code {
            "4326" | "wgs84" => Ok(Crs::Wgs84),
            "3857" | "webmercator" | "mercator" => Ok(Crs::WebMercator),
            _ => {
                if let Some(zone) = code.strip_prefix("utm").and_then(parse_utm_zone) {
                    return Ok(zone);
                }
                if let Ok(epsg) = code.parse::<u32>() {
                    if (32601..=32660).contains(&epsg) {
                        return Ok(Crs::Utm {
                            zone: (epsg - 32600) as u8,
                            north: true,
                        });
                    }
                    if (32701..=32760).contains(&epsg) {
                        return Ok(Crs::Utm {
                            zone: (epsg - 32700) as u8,
                            north: false,
                        });
                    }
                }
                Err(anyhow!("Unsupported CRS: {}", s))
            }
        }
    }
}

fn parse_utm_zone(s: &str) -> Option<Crs> {
    let (digits, hemi) = s.split_at(s.len().checked_sub(1)?);
    let north = match hemi {
        "n" => true,
        "s" => false,
        _ => return None,
    };
    let zone: u8 = digits.parse().ok()?;
    if (1..=60).contains(&zone) {
        Some(Crs::Utm { zone, north })
    } else {
        None
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Properties attached to a converted claim-boundary feature. The front end
/// reads these for map labels and the property detail pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub hectares: f64,
    /// [longitude, latitude] of the rough polygon center.
    pub center: [f64; 2],
}

/// Per-segment report for a LineString feature, printed by the CLI after
/// every clean-up step so the result can be eyeballed against the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub index: usize,
    pub points: usize,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub center: [f64; 2],
    /// Pixel area of the source contour, when the segment came from a scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_from_str() {
        assert_eq!(Crs::from_str("4326").unwrap(), Crs::Wgs84);
        assert_eq!(Crs::from_str("EPSG:3857").unwrap(), Crs::WebMercator);
        assert_eq!(
            Crs::from_str("utm9n").unwrap(),
            Crs::Utm { zone: 9, north: true }
        );
        assert_eq!(
            Crs::from_str("32609").unwrap(),
            Crs::Utm { zone: 9, north: true }
        );
        assert_eq!(
            Crs::from_str("32709").unwrap(),
            Crs::Utm { zone: 9, north: false }
        );
        assert!(Crs::from_str("utm61n").is_err());
        assert!(Crs::from_str("nonsense").is_err());
    }

    #[test]
    fn test_crs_epsg_roundtrip() {
        let crs = Crs::Utm { zone: 9, north: true };
        assert_eq!(crs.epsg(), 32609);
        assert_eq!(crs.to_string(), "EPSG:32609");
        assert!(crs.proj_string().contains("+zone=9"));
        assert!(!crs.proj_string().contains("+south"));
    }
}
