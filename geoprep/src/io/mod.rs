use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use geo_types::LineString;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use log::warn;

use crate::models::SegmentSummary;

/// Reads a GeoJSON FeatureCollection from a file.
pub fn read_collection<P: AsRef<Path>>(path: P) -> anyhow::Result<FeatureCollection> {
    let f = File::open(path.as_ref())?;
    let mut reader = BufReader::new(f);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    let geojson: GeoJson = contents.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;
    Ok(collection)
}

/// Writes a FeatureCollection as pretty-printed GeoJSON. The map front end
/// diffs these files in version control, so stable indented output matters.
pub fn write_collection<P: AsRef<Path>>(
    path: P,
    collection: &FeatureCollection,
) -> anyhow::Result<()> {
    let f = File::create(path.as_ref())?;
    let writer = BufWriter::new(f);
    serde_json::to_writer_pretty(writer, collection)?;
    Ok(())
}

/// Pulls every LineString geometry out of a collection, paired with its
/// feature index. Features with other geometry types or no geometry at all
/// are skipped with a warning.
pub fn line_strings(collection: &FeatureCollection) -> Vec<(usize, LineString<f64>)> {
    let mut lines = Vec::new();
    for (index, feature) in collection.features.iter().enumerate() {
        match &feature.geometry {
            Some(geometry) => match LineString::<f64>::try_from(geometry.value.clone()) {
                Ok(line) => lines.push((index, line)),
                Err(_) => warn!("feature {} is not a LineString, skipping", index),
            },
            None => warn!("feature {} has no geometry, skipping", index),
        }
    }
    lines
}

/// Replaces the geometry of a feature with the given line, keeping its
/// properties.
pub fn set_line(feature: &mut Feature, line: &LineString<f64>) {
    feature.geometry = Some(Geometry::new(Value::from(line)));
}

/// Builds a LineString feature with the given properties.
pub fn line_feature(line: &LineString<f64>, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Summarizes each LineString feature for reporting.
pub fn summarize(collection: &FeatureCollection) -> Vec<SegmentSummary> {
    line_strings(collection)
        .into_iter()
        .filter_map(|(index, line)| {
            let count = line.0.len();
            if count == 0 {
                warn!("feature {} has an empty line, skipping", index);
                return None;
            }
            let (mut sum_x, mut sum_y) = (0.0, 0.0);
            for coord in &line.0 {
                sum_x += coord.x;
                sum_y += coord.y;
            }
            let area = collection.features[index]
                .properties
                .as_ref()
                .and_then(|props| props.get("area"))
                .and_then(|v| v.as_f64());
            Some(SegmentSummary {
                index,
                points: count,
                start: [line.0[0].x, line.0[0].y],
                end: [line.0[count - 1].x, line.0[count - 1].y],
                center: [sum_x / count as f64, sum_y / count as f64],
                area,
            })
        })
        .collect()
}
