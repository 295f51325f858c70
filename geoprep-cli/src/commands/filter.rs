use clap::Args;

use geoprep::io::{read_collection, write_collection};
use geoprep::ops::keep_main_segments;

#[derive(Args)]
pub struct FilterCommand {
    /// input GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// number of segments to keep
    #[clap(short, long, value_parser, default_value_t = 8)]
    keep: usize,
}

impl FilterCommand {
    pub fn run(self) {
        blue!("Filtering ");
        dark_yellow!("{}", self.file);
        println!(" ...");

        let collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        let filtered = keep_main_segments(&collection, self.keep);
        println!(
            "{} segments in, {} kept",
            collection.features.len(),
            filtered.features.len()
        );
        write_collection(&self.output, &filtered).expect("write failed");
    }
}
