use geo_types::{Coord, LineString};

/// Center-weighted moving-average smoothing. Window vertices are weighted
/// `1 / (1 + 0.5 * distance_from_center)`, so the vertex itself dominates
/// and the line does not shrink toward its centroid as hard as a flat
/// average would.
pub fn moving_average(line: &LineString<f64>, window: usize) -> LineString<f64> {
    let coords = &line.0;
    if window < 2 || coords.len() <= window {
        return line.clone();
    }
    let half = window / 2;

    let mut smoothed = Vec::with_capacity(coords.len());
    for i in 0..coords.len() {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(coords.len());
        let slice = &coords[start..end];
        let center = slice.len() / 2;

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut total_weight = 0.0;
        for (j, coord) in slice.iter().enumerate() {
            let offset = j.abs_diff(center) as f64;
            let weight = 1.0 / (1.0 + offset * 0.5);
            sum_x += coord.x * weight;
            sum_y += coord.y * weight;
            total_weight += weight;
        }
        smoothed.push(Coord {
            x: sum_x / total_weight,
            y: sum_y / total_weight,
        });
    }
    LineString::from(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::line_string;

    #[test]
    fn test_straight_line_unchanged() {
        let line: LineString<f64> =
            LineString::from((0..20).map(|i| (i as f64, 2.0)).collect::<Vec<_>>());
        let smoothed = moving_average(&line, 5);
        assert_eq!(smoothed.0.len(), line.0.len());
        for coord in &smoothed.0 {
            assert!((coord.y - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zigzag_flattens() {
        let line: LineString<f64> = LineString::from(
            (0..21)
                .map(|i| (i as f64, if i % 2 == 0 { 0.0 } else { 1.0 }))
                .collect::<Vec<_>>(),
        );
        let smoothed = moving_average(&line, 5);
        let amplitude = |l: &LineString<f64>| {
            let ys: Vec<f64> = l.0.iter().map(|c| c.y).collect();
            ys.iter().cloned().fold(f64::MIN, f64::max)
                - ys.iter().cloned().fold(f64::MAX, f64::min)
        };
        assert!(amplitude(&smoothed) < amplitude(&line) * 0.7);
    }

    #[test]
    fn test_short_line_untouched() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 5.0), (x: 2.0, y: 0.0)];
        let smoothed = moving_average(&line, 5);
        assert_eq!(smoothed, line);
    }
}
