use clap::Args;
use colored_json::prelude::*;

use geoprep::io::{read_collection, summarize};

#[derive(Args)]
pub struct InfoCommand {
    /// GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,
}

impl InfoCommand {
    pub fn run(self) {
        blue!("Summarizing ");
        dark_yellow!("{}", self.file);
        println!(" ...");

        let collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        let summaries = summarize(&collection);
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries)
                .unwrap()
                .to_colored_json_auto()
                .unwrap()
        );
        println!(
            "{} features, {} line segments",
            collection.features.len(),
            summaries.len()
        );
    }
}
