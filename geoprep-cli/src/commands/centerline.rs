use clap::Args;

use geoprep::io::{line_strings, read_collection, set_line, write_collection};
use geoprep::ops::{moving_average, reconstruct_centerline};

#[derive(Args)]
pub struct CenterlineCommand {
    /// input GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// only rebuild segments with more vertices than this
    #[clap(long, value_parser, default_value_t = 100)]
    min_points: usize,

    /// smoothing window applied while rebuilding
    #[clap(long, value_parser, default_value_t = 5)]
    window: usize,
}

impl CenterlineCommand {
    pub fn run(self) {
        blue!("Rebuilding centerlines in ");
        dark_yellow!("{}", self.file);
        println!(" ...");

        let mut collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        for (index, line) in line_strings(&collection) {
            let rebuilt = if line.0.len() > self.min_points {
                reconstruct_centerline(&line, self.window)
            } else {
                moving_average(&line, 3)
            };
            println!(
                "segment {}: {} -> {} points",
                index,
                line.0.len(),
                rebuilt.0.len()
            );
            set_line(&mut collection.features[index], &rebuilt);
        }
        write_collection(&self.output, &collection).expect("write failed");
    }
}
