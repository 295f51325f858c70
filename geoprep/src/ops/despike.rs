use geo_types::{Coord, LineString};

use super::distance;

/// Direction change at `b` when walking `a -> b -> c`, in degrees.
/// 0 means straight on, 180 means a full reversal.
fn turn_degrees(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    let v1 = (b.x - a.x, b.y - a.y);
    let v2 = (c.x - b.x, c.y - b.y);
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }
    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Removes spike vertices: points where the line turns back on itself by
/// more than `max_turn` degrees. Contour tracing around a scanning artifact
/// leaves these one-point excursions all over the extracted line work.
/// First and last vertices always survive.
pub fn remove_spikes(line: &LineString<f64>, max_turn: f64) -> LineString<f64> {
    let coords = &line.0;
    if coords.len() < 3 {
        return line.clone();
    }

    let mut cleaned: Vec<Coord<f64>> = vec![coords[0]];
    for i in 1..coords.len() - 1 {
        let prev = *cleaned.last().unwrap();
        if turn_degrees(prev, coords[i], coords[i + 1]) <= max_turn {
            cleaned.push(coords[i]);
        }
    }
    cleaned.push(coords[coords.len() - 1]);
    LineString::from(cleaned)
}

/// Removes vertices that stray too far from the midpoint of their
/// neighbors: deviation beyond `factor` times half the neighbor distance
/// drops the vertex. Endpoints always survive.
pub fn remove_outliers(line: &LineString<f64>, factor: f64) -> LineString<f64> {
    let coords = &line.0;
    if coords.len() < 5 {
        return line.clone();
    }

    let mut cleaned: Vec<Coord<f64>> = vec![coords[0]];
    for i in 1..coords.len() - 1 {
        let prev = *cleaned.last().unwrap();
        let next = coords[i + 1];
        let expected = Coord {
            x: (prev.x + next.x) / 2.0,
            y: (prev.y + next.y) / 2.0,
        };
        let deviation = distance(coords[i], expected);
        let half_gap = distance(prev, next) / 2.0;
        if deviation < half_gap * factor {
            cleaned.push(coords[i]);
        }
    }
    cleaned.push(coords[coords.len() - 1]);
    LineString::from(cleaned)
}
