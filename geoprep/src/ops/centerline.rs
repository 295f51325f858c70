use geo_types::{Coord, LineString};
use log::debug;

use super::{distance, moving_average, resample};

/// Rebuilds a single centerline from a contour that traced both edges of a
/// drawn stroke.
///
/// Border tracing of a line several pixels wide walks out along one edge
/// and back along the other, so the coordinate sequence contains one large
/// jump where the trace crossed over. Detect jumps (over three times the
/// mean vertex spacing), split there, and when that leaves exactly two runs,
/// orient them the same way, resample to a common vertex count and average
/// them pairwise. Anything else just gets smoothed.
pub fn reconstruct_centerline(line: &LineString<f64>, smooth_window: usize) -> LineString<f64> {
    let coords = &line.0;
    if coords.len() < 10 {
        return moving_average(line, smooth_window);
    }

    let gaps: Vec<f64> = coords.windows(2).map(|w| distance(w[0], w[1])).collect();
    let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;

    let mut runs: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut current: Vec<Coord<f64>> = vec![coords[0]];
    for (i, gap) in gaps.iter().enumerate() {
        if *gap > mean_gap * 3.0 {
            if current.len() > 5 {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
        current.push(coords[i + 1]);
    }
    if current.len() > 5 {
        runs.push(current);
    }
    debug!("centerline: split into {} runs", runs.len());

    if runs.len() != 2 {
        return moving_average(line, smooth_window);
    }

    let first = LineString::from(runs[0].clone());
    let mut second = runs[1].clone();

    // Edges traced in opposite directions pair start-to-end; flip the
    // second run when that alignment is tighter.
    let forward = distance(runs[0][0], second[0])
        + distance(runs[0][runs[0].len() - 1], second[second.len() - 1]);
    let reversed = distance(runs[0][0], second[second.len() - 1])
        + distance(runs[0][runs[0].len() - 1], second[0]);
    if reversed < forward {
        second.reverse();
    }
    let second = LineString::from(second);

    let num_points = first.0.len().max(second.0.len());
    let first = resample(&first, num_points);
    let second = resample(&second, num_points);

    let centerline: Vec<Coord<f64>> = first
        .0
        .iter()
        .zip(second.0.iter())
        .map(|(a, b)| Coord {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        })
        .collect();
    LineString::from(centerline)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stroke traced out along y=0 and back along y=1.
    fn parallel_edges() -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> =
            (0..20).map(|i| Coord { x: i as f64 * 0.1, y: 0.0 }).collect();
        coords.extend((0..20).rev().map(|i| Coord { x: i as f64 * 0.1, y: 1.0 }));
        LineString::from(coords)
    }

    #[test]
    fn test_parallel_edges_average_to_center() {
        let centerline = reconstruct_centerline(&parallel_edges(), 5);
        assert_eq!(centerline.0.len(), 20);
        for coord in &centerline.0 {
            assert!((coord.y - 0.5).abs() < 1e-9, "off-center: {:?}", coord);
        }
        // Runs in opposite directions were re-aligned, so x still spans
        // the full stroke.
        assert!((centerline.0[0].x - 0.0).abs() < 1e-9);
        assert!((centerline.0[19].x - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_plain_line_is_smoothed() {
        let line: LineString<f64> =
            LineString::from((0..30).map(|i| (i as f64 * 0.1, 0.0)).collect::<Vec<_>>());
        let result = reconstruct_centerline(&line, 5);
        assert_eq!(result.0.len(), 30);
        for coord in &result.0 {
            assert!(coord.y.abs() < 1e-9);
        }
    }

    #[test]
    fn test_short_line_untouched() {
        let line: LineString<f64> =
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let result = reconstruct_centerline(&line, 5);
        assert_eq!(result.0.len(), 3);
    }
}
