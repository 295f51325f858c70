//! This crate provides functionality for preparing geospatial data for a
//! mining-property web map.
//!
//! It covers the whole path from raw survey data to the GeoJSON consumed by
//! the front end: converting claim-boundary shapefiles, reprojecting between
//! coordinate reference systems, extracting colored line work from scanned
//! raster maps, and a set of vector clean-up operations (gap connection,
//! spike removal, smoothing, centerline reconstruction) for line data that
//! came out of a scan looking rough.
//!
//! # Modules
//!
//! * `models` - CRS identifiers and the property/segment records written into
//!   feature properties.
//! * `io` - Reading and writing GeoJSON FeatureCollections.
//! * `shp` - Shapefile to GeoJSON conversion.
//! * `reproject` - Coordinate transformation between CRSs.
//! * `raster` - Color-threshold line extraction from GeoTIFF scans.
//! * `ops` - Vector clean-up operations over extracted line segments.
//!
//! # Example
//!
//! Reproject a GeoJSON file from UTM Zone 9N to WGS84:
//!
//! ```rust,no_run
//! use geoprep::models::Crs;
//! use geoprep::reproject::Reprojector;
//!
//! let mut collection = geoprep::io::read_collection("claims.geojson").unwrap();
//! let reprojector = Reprojector::new(&Crs::Utm { zone: 9, north: true }, &Crs::Wgs84).unwrap();
//! reprojector.transform_collection(&mut collection).unwrap();
//! geoprep::io::write_collection("claims-wgs84.geojson", &collection).unwrap();
//! ```

pub mod io;
pub mod models;
pub mod ops;
pub mod raster;
pub mod reproject;
pub mod shp;

#[macro_use]
extern crate anyhow;
