use std::str::FromStr;

use clap::Args;

use geoprep::io::{read_collection, summarize, write_collection};
use geoprep::models::Crs;
use geoprep::reproject::Reprojector;

#[derive(Args)]
pub struct ReprojectCommand {
    /// input GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// source CRS
    #[clap(long, value_parser, default_value = "EPSG:3857")]
    from: String,

    /// target CRS
    #[clap(long, value_parser, default_value = "EPSG:4326")]
    to: String,
}

impl ReprojectCommand {
    pub fn run(self) {
        let from = Crs::from_str(&self.from).expect("Unrecognized source CRS");
        let to = Crs::from_str(&self.to).expect("Unrecognized target CRS");

        blue!("Reprojecting ");
        dark_yellow!("{} ", self.file);
        blue!("from ");
        dark_yellow!("{} ", from);
        blue!("to ");
        dark_yellow!("{}", to);
        println!(" ...");

        let mut collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        let reprojector = Reprojector::new(&from, &to).expect("CRS setup failed");
        reprojector
            .transform_collection(&mut collection)
            .expect("reprojection failed");

        for summary in summarize(&collection) {
            println!(
                "segment {}: {} points, start [{:.6}, {:.6}], end [{:.6}, {:.6}]",
                summary.index,
                summary.points,
                summary.start[0],
                summary.start[1],
                summary.end[0],
                summary.end[1]
            );
        }
        write_collection(&self.output, &collection).expect("write failed");
    }
}
