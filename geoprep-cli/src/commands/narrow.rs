use std::convert::TryFrom;

use clap::Args;
use geo_types::{MultiPolygon, Polygon};
use geojson::{Geometry, Value};

use geoprep::io::{read_collection, write_collection};
use geoprep::ops::{narrow_v_turn, NarrowOptions};

#[derive(Args)]
pub struct NarrowCommand {
    /// input GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// index of the polygon feature to patch
    #[clap(long, value_parser, default_value_t = 0)]
    feature: usize,

    /// vertices south of this latitude belong to the turn region
    #[clap(long, value_parser, default_value_t = 56.32)]
    lat_threshold: f64,

    /// how far south (degrees) to move inner-edge vertices
    #[clap(long, value_parser, default_value_t = 0.0015)]
    adjustment: f64,

    /// margin above the southernmost vertex marking the inner edge
    #[clap(long, value_parser, default_value_t = 0.0005)]
    north_margin: f64,
}

impl NarrowCommand {
    pub fn run(self) {
        blue!("Narrowing V-turn in ");
        dark_yellow!("{} ", self.file);
        blue!("feature ");
        dark_yellow!("{}", self.feature);
        println!(" ...");

        let mut collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        let feature = collection
            .features
            .get_mut(self.feature)
            .expect("no such feature");
        let geometry = feature.geometry.as_ref().expect("feature has no geometry");

        let options = NarrowOptions {
            lat_threshold: self.lat_threshold,
            north_margin: self.north_margin,
            adjustment: self.adjustment,
        };
        let mut moved = 0;
        let value = match &geometry.value {
            Value::Polygon(_) => {
                let mut polygon = Polygon::<f64>::try_from(geometry.value.clone())
                    .expect("malformed Polygon");
                polygon.exterior_mut(|ring| moved = narrow_v_turn(ring, &options));
                Value::from(&polygon)
            }
            Value::MultiPolygon(_) => {
                let mut multi = MultiPolygon::<f64>::try_from(geometry.value.clone())
                    .expect("malformed MultiPolygon");
                for polygon in multi.0.iter_mut() {
                    polygon.exterior_mut(|ring| moved += narrow_v_turn(ring, &options));
                }
                Value::from(&multi)
            }
            other => panic!("feature is not a Polygon or MultiPolygon: {:?}", other),
        };
        feature.geometry = Some(Geometry::new(value));

        println!("{} vertices moved", moved);
        write_collection(&self.output, &collection).expect("write failed");
    }
}
