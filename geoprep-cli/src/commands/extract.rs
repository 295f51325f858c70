use std::str::FromStr;

use clap::Args;

use geoprep::io::write_collection;
use geoprep::models::Crs;
use geoprep::raster::{ExtractOptions, LineExtractor};

#[derive(Args)]
pub struct ExtractCommand {
    /// input GeoTIFF path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// CRS the raster is georeferenced in
    #[clap(long, value_parser, default_value = "EPSG:3857")]
    source_crs: String,

    /// sensitive mode: wider color ranges, keeps short stub segments
    #[clap(long, action)]
    precise: bool,

    /// drop contours with fewer traced pixels than this
    #[clap(long, value_parser)]
    min_points: Option<usize>,

    /// keep small contours whose pixel area clears this bar
    #[clap(long, value_parser)]
    min_area: Option<f64>,

    /// Douglas-Peucker epsilon in pixels
    #[clap(long, value_parser)]
    epsilon: Option<f64>,

    /// map bounds west,south,east,north for scans without GeoTIFF tags
    #[clap(long, value_parser)]
    bounds: Option<String>,

    /// write the thresholded mask to this PNG for inspection
    #[clap(long, value_parser)]
    mask_out: Option<String>,
}

impl ExtractCommand {
    pub fn run(self) {
        blue!("Extracting line work from ");
        dark_yellow!("{}", self.file);
        println!(" ...");

        let mut options = if self.precise {
            ExtractOptions::precise()
        } else {
            ExtractOptions::default()
        };
        options.source_crs = Crs::from_str(&self.source_crs).expect("Unrecognized source CRS");
        if let Some(min_points) = self.min_points {
            options.min_points = min_points;
        }
        if let Some(min_area) = self.min_area {
            options.min_area = min_area;
        }
        if let Some(epsilon) = self.epsilon {
            options.epsilon = epsilon;
        }
        if let Some(bounds) = &self.bounds {
            let parts: Vec<f64> = bounds
                .split(',')
                .map(|p| p.trim().parse().expect("bounds must be four numbers"))
                .collect();
            if parts.len() != 4 {
                panic!("bounds must be west,south,east,north");
            }
            options.bounds = Some([parts[0], parts[1], parts[2], parts[3]]);
        }

        let extractor = LineExtractor::new(options);
        let collection = extractor
            .extract_with_mask(&self.file, self.mask_out.as_deref())
            .expect("extraction failed");

        for feature in &collection.features {
            let props = feature.properties.as_ref().unwrap();
            println!(
                "{}: area {:.0}",
                props.get("name").unwrap(),
                props.get("area").and_then(|v| v.as_f64()).unwrap_or(0.0)
            );
        }
        write_collection(&self.output, &collection).expect("write failed");
        println!("{} segments written", collection.features.len());
    }
}
