use clap::Args;

use geoprep::io::{read_collection, write_collection};
use geoprep::ops::{clean_collection, CleanOptions};

#[derive(Args)]
pub struct CleanCommand {
    /// input GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// direction change (degrees) above which a vertex is a spike
    #[clap(long, value_parser, default_value_t = 150.0)]
    spike_turn: f64,

    /// outlier tolerance as a multiple of the local vertex spacing
    #[clap(long, value_parser, default_value_t = 2.0)]
    outlier_factor: f64,

    /// moving-average window for the main smoothing pass
    #[clap(long, value_parser, default_value_t = 7)]
    smooth_window: usize,

    /// Douglas-Peucker epsilon in degrees
    #[clap(long, value_parser, default_value_t = 0.0002)]
    epsilon: f64,

    /// moving-average window for the final light pass
    #[clap(long, value_parser, default_value_t = 3)]
    final_window: usize,
}

impl CleanCommand {
    pub fn run(self) {
        blue!("Cleaning ");
        dark_yellow!("{}", self.file);
        println!(" ...");

        let mut collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        let options = CleanOptions {
            spike_turn: self.spike_turn,
            outlier_factor: self.outlier_factor,
            smooth_window: self.smooth_window,
            epsilon: self.epsilon,
            final_window: self.final_window,
        };
        let report = clean_collection(&mut collection, &options);

        for (index, (before, after)) in report.iter().enumerate() {
            println!("segment {}: {} -> {} points", index, before, after);
        }
        write_collection(&self.output, &collection).expect("write failed");
    }
}
