use std::str::FromStr;

use clap::Args;

use geoprep::io::write_collection;
use geoprep::models::Crs;
use geoprep::shp::ShpConverter;

#[derive(Args)]
pub struct ConvertCommand {
    /// shapefile input, either PATH or NAME=PATH; may be repeated
    #[clap(short, long, value_parser, required = true)]
    input: Vec<String>,

    /// output GeoJSON path
    #[clap(short, long, value_parser)]
    output: String,

    /// CRS the shapefile coordinates are in, e.g. utm9n or EPSG:32609
    #[clap(long, value_parser)]
    source_crs: Option<String>,
}

impl ConvertCommand {
    pub fn run(self) {
        blue!("Converting ");
        dark_yellow!("{} ", self.input.join(", "));
        blue!("to ");
        dark_yellow!("{}", self.output);
        println!(" ...");

        let source_crs = self
            .source_crs
            .map(|s| Crs::from_str(&s).expect("Unrecognized source CRS"));
        let inputs: Vec<(Option<String>, String)> = self
            .input
            .iter()
            .map(|spec| match spec.split_once('=') {
                Some((name, path)) => (Some(name.to_string()), path.to_string()),
                None => (None, spec.clone()),
            })
            .collect();

        let converter = ShpConverter::new(source_crs.as_ref()).expect("CRS setup failed");
        let collection = converter.convert_all(&inputs).expect("conversion failed");

        for feature in &collection.features {
            let props = feature.properties.as_ref().unwrap();
            println!(
                "{}: {:.1} ha, center {}",
                props.get("name").unwrap(),
                props.get("hectares").and_then(|v| v.as_f64()).unwrap_or(0.0),
                props.get("center").unwrap()
            );
        }
        write_collection(&self.output, &collection).expect("write failed");
        println!("{} properties written", collection.features.len());
    }
}
