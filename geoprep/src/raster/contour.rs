use geo::Simplify;
use geo_types::{Coord, LineString};

use super::mask::Mask;

// Eight neighbors in clockwise order (image coordinates, y down).
const DIRS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Traces external contours of a binary mask using Moore-neighbor border
/// following with Jacob's stopping criterion.
///
/// One-pixel-wide strokes produce a contour that runs out along one side of
/// the stroke and back along the other, which is exactly the parallel-edge
/// shape the centerline reconstruction in `ops::centerline` expects.
pub fn trace_external(mask: &Mask) -> Vec<Vec<(f64, f64)>> {
    let mut traced = vec![false; mask.width * mask.height];
    let mut contours = Vec::new();

    for row in 0..mask.height as i64 {
        for col in 0..mask.width as i64 {
            if !mask.get(col, row) || traced[row as usize * mask.width + col as usize] {
                continue;
            }
            // A border trace starts on a pixel entered from the west.
            if mask.get(col - 1, row) {
                continue;
            }
            contours.push(trace_from(mask, &mut traced, (col, row)));
        }
    }
    contours
}

fn trace_from(mask: &Mask, traced: &mut [bool], start: (i64, i64)) -> Vec<(f64, f64)> {
    let mark = |traced: &mut [bool], p: (i64, i64)| {
        traced[p.1 as usize * mask.width + p.0 as usize] = true;
    };

    let mut contour = vec![(start.0 as f64, start.1 as f64)];
    mark(traced, start);

    let mut current = start;
    let mut backtrack = (start.0 - 1, start.1);
    // The walk is deterministic in (current, backtrack), so the first
    // repeated state closes the border. Plain Jacob's criterion loops on
    // one-pixel-wide strokes, which these scans are full of.
    let mut seen = std::collections::HashSet::new();
    seen.insert((current, backtrack));
    let max_steps = 4 * mask.width * mask.height;

    for _ in 0..max_steps {
        let scan_from = direction_of(current, backtrack);
        let mut found = None;
        for i in 1..=8 {
            let dir = (scan_from + i) % 8;
            let neighbor = (current.0 + DIRS[dir].0, current.1 + DIRS[dir].1);
            if mask.get(neighbor.0, neighbor.1) {
                let prev_dir = (scan_from + i - 1) % 8;
                let prev = (current.0 + DIRS[prev_dir].0, current.1 + DIRS[prev_dir].1);
                found = Some((neighbor, prev));
                break;
            }
        }
        let Some((next, prev)) = found else {
            break; // isolated pixel
        };
        backtrack = prev;
        current = next;
        if !seen.insert((current, backtrack)) {
            break;
        }
        contour.push((current.0 as f64, current.1 as f64));
        mark(traced, current);
    }

    contour
}

fn direction_of(from: (i64, i64), to: (i64, i64)) -> usize {
    let delta = (to.0 - from.0, to.1 - from.1);
    DIRS.iter()
        .position(|&d| d == delta)
        .expect("backtrack pixel is always an 8-neighbor")
}

/// Signed shoelace area of a pixel contour, absolute value. Comparable to
/// OpenCV's contourArea, which the original size thresholds were tuned on.
pub fn contour_area(contour: &[(f64, f64)]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..contour.len() {
        let (x0, y0) = contour[i];
        let (x1, y1) = contour[(i + 1) % contour.len()];
        sum += x0 * y1 - x1 * y0;
    }
    sum.abs() / 2.0
}

/// Douglas-Peucker approximation of a contour, epsilon in pixels.
pub fn simplify_contour(contour: &[(f64, f64)], epsilon: f64) -> Vec<(f64, f64)> {
    if contour.len() <= 2 {
        return contour.to_vec();
    }
    let line = LineString::from(
        contour
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>(),
    );
    line.simplify(&epsilon)
        .0
        .into_iter()
        .map(|c| (c.x, c.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_mask(blocks: &[(usize, usize, usize, usize)]) -> Mask {
        let mut mask = Mask::new(20, 20);
        for &(col, row, w, h) in blocks {
            for r in row..row + h {
                for c in col..col + w {
                    mask.set(c, r, true);
                }
            }
        }
        mask
    }

    #[test]
    fn test_trace_rectangle() {
        let mask = block_mask(&[(3, 4, 5, 3)]);
        let contours = trace_external(&mask);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        // Border of a 5x3 block has 2*(5+3)-4 = 12 pixels.
        assert_eq!(contour.len(), 12);
        for &(x, y) in contour {
            assert!((3.0..=7.0).contains(&x));
            assert!((4.0..=6.0).contains(&y));
        }
        // contourArea of a w x h pixel block is (w-1)*(h-1).
        assert!((contour_area(contour) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_trace_two_blobs() {
        let mask = block_mask(&[(1, 1, 3, 3), (10, 10, 4, 2)]);
        let contours = trace_external(&mask);
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_trace_isolated_pixel() {
        let mask = block_mask(&[(5, 5, 1, 1)]);
        let contours = trace_external(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0], vec![(5.0, 5.0)]);
    }

    #[test]
    fn test_trace_thin_line_doubles_back() {
        let mask = block_mask(&[(2, 5, 10, 1)]);
        let contours = trace_external(&mask);
        assert_eq!(contours.len(), 1);
        // Out along the stroke and back: interior pixels appear twice, and
        // the start pixel is revisited once before the walk state repeats.
        assert_eq!(contours[0].len(), 19);
    }

    #[test]
    fn test_simplify_contour() {
        let contour: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 0.0)).collect();
        let simplified = simplify_contour(&contour, 0.5);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], (0.0, 0.0));
        assert_eq!(simplified[1], (9.0, 0.0));
    }
}
