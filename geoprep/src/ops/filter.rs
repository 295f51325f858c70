use geojson::FeatureCollection;
use log::info;

use crate::io::line_strings;

/// Keeps the `keep` most significant line segments of a collection, ordered
/// north to south and renumbered.
///
/// Significance is the source-contour pixel area when the extraction
/// recorded one, otherwise the vertex count. The scanned map yields dozens
/// of contours and only a handful belong to the actual line; everything the
/// map legend, labels and scale bar contributed ranks far below them.
pub fn keep_main_segments(collection: &FeatureCollection, keep: usize) -> FeatureCollection {
    let lines = line_strings(collection);

    let mut ranked: Vec<(usize, f64, f64)> = lines
        .iter()
        .map(|(index, line)| {
            let score = collection.features[*index]
                .properties
                .as_ref()
                .and_then(|props| props.get("area"))
                .and_then(|v| v.as_f64())
                .unwrap_or(line.0.len() as f64);
            let max_lat = line.0.iter().map(|c| c.y).fold(f64::MIN, f64::max);
            (*index, score, max_lat)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(keep);
    // North to south, the order the property pages list them in.
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));
    info!("kept {} of {} segments", ranked.len(), lines.len());

    let features = ranked
        .iter()
        .enumerate()
        .map(|(position, (index, _, _))| {
            let mut feature = collection.features[*index].clone();
            let props = feature.properties.get_or_insert_with(Default::default);
            props.insert("FID".to_string(), position.into());
            props.insert(
                "name".to_string(),
                format!("Line Segment {}", position + 1).into(),
            );
            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::line_feature;
    use geo_types::line_string;
    use geojson::JsonObject;

    fn collection() -> FeatureCollection {
        let mut features = Vec::new();
        for (area, lat) in [(50.0, 55.0), (500.0, 56.0), (200.0, 57.0)] {
            let line = line_string![(x: -129.0, y: lat), (x: -129.1, y: lat + 0.1)];
            let mut props = JsonObject::new();
            props.insert("area".to_string(), area.into());
            features.push(line_feature(&line, props));
        }
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    #[test]
    fn test_keeps_largest_sorted_north_to_south() {
        let filtered = keep_main_segments(&collection(), 2);
        assert_eq!(filtered.features.len(), 2);
        // Areas 500 and 200 survive; 200 is further north so it comes first.
        let areas: Vec<f64> = filtered
            .features
            .iter()
            .map(|f| {
                f.properties
                    .as_ref()
                    .unwrap()
                    .get("area")
                    .unwrap()
                    .as_f64()
                    .unwrap()
            })
            .collect();
        assert_eq!(areas, vec![200.0, 500.0]);

        let names: Vec<String> = filtered
            .features
            .iter()
            .map(|f| {
                f.properties
                    .as_ref()
                    .unwrap()
                    .get("name")
                    .unwrap()
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(names, vec!["Line Segment 1", "Line Segment 2"]);
    }

    #[test]
    fn test_keep_more_than_available() {
        let filtered = keep_main_segments(&collection(), 10);
        assert_eq!(filtered.features.len(), 3);
    }

    #[test]
    fn test_score_falls_back_to_vertex_count() {
        let long_line: geo_types::LineString<f64> =
            geo_types::LineString::from((0..100).map(|i| (i as f64, 50.0)).collect::<Vec<_>>());
        let short_line = line_string![(x: 0.0, y: 60.0), (x: 1.0, y: 60.0)];
        let features = vec![
            line_feature(&short_line, JsonObject::new()),
            line_feature(&long_line, JsonObject::new()),
        ];
        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        let filtered = keep_main_segments(&collection, 1);
        assert_eq!(filtered.features.len(), 1);
        match &filtered.features[0].geometry.as_ref().unwrap().value {
            geojson::Value::LineString(coords) => assert_eq!(coords.len(), 100),
            other => panic!("unexpected geometry: {:?}", other),
        }
    }
}
