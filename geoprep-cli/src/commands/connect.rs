use clap::Args;
use geojson::FeatureCollection;

use geoprep::io::{line_strings, read_collection, set_line, write_collection};
use geoprep::ops::SegmentConnector;

#[derive(Args)]
pub struct ConnectCommand {
    /// input GeoJSON path
    #[clap(short, long, value_parser)]
    file: String,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// endpoints closer than this (degrees) get connected
    #[clap(long, value_parser, default_value_t = 0.035)]
    max_distance: f64,

    /// maximum spacing (degrees) of the bridge points filling a gap
    #[clap(long, value_parser, default_value_t = 0.005)]
    max_gap: f64,
}

impl ConnectCommand {
    pub fn run(self) {
        blue!("Connecting segments in ");
        dark_yellow!("{}", self.file);
        println!(" ...");

        let collection =
            read_collection(&self.file).expect(&format!("No such file: {}", self.file));
        let lines = line_strings(&collection);
        let segments: Vec<_> = lines.iter().map(|(_, line)| line.clone()).collect();

        let connector = SegmentConnector::new(self.max_distance, self.max_gap);
        let connected = connector.connect(&segments);

        let mut features = Vec::with_capacity(connected.len());
        for (position, segment) in connected.iter().enumerate() {
            // Properties come from the first input segment of the run.
            let base_index = lines[segment.merged_from[0]].0;
            let mut feature = collection.features[base_index].clone();
            set_line(&mut feature, &segment.line);
            let props = feature.properties.get_or_insert_with(Default::default);
            props.insert("FID".to_string(), position.into());
            props.insert(
                "name".to_string(),
                format!("Line Segment {}", position + 1).into(),
            );
            if segment.merged_from.len() > 1 {
                let sources: Vec<i64> =
                    segment.merged_from.iter().map(|i| *i as i64 + 1).collect();
                props.insert("connected_segments".to_string(), sources.into());
                println!(
                    "segment {}: merged from {} inputs, {} points",
                    position + 1,
                    segment.merged_from.len(),
                    segment.line.0.len()
                );
            }
            features.push(feature);
        }

        println!("{} segments in, {} out", segments.len(), features.len());
        let result = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        write_collection(&self.output, &result).expect("write failed");
    }
}
