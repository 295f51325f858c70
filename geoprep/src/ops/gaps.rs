use geo_types::{Coord, LineString};
use log::info;

use super::distance;

/// A merged run of input segments.
#[derive(Debug, Clone)]
pub struct ConnectedSegment {
    pub line: LineString<f64>,
    /// Indices of the input segments this run was stitched from.
    pub merged_from: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pairing {
    EndToStart,
    EndToEnd,
    StartToStart,
    StartToEnd,
}

/// Stitches line segments whose endpoints sit within `max_distance` of each
/// other, bridging each gap with interpolated points no further than
/// `max_gap` apart.
///
/// The scanned red line broke into dozens of pieces wherever it crossed a
/// label or a claim boundary; the defaults (0.035 degrees, roughly 3-4 km
/// at this latitude) were tuned to close those breaks without gluing
/// unrelated lines together.
pub struct SegmentConnector {
    max_distance: f64,
    max_gap: f64,
}

impl SegmentConnector {
    pub fn new(max_distance: f64, max_gap: f64) -> Self {
        Self {
            max_distance,
            max_gap,
        }
    }

    pub fn connect(&self, segments: &[LineString<f64>]) -> Vec<ConnectedSegment> {
        let mut used = vec![false; segments.len()];
        let mut connected = Vec::new();

        for i in 0..segments.len() {
            if used[i] || segments[i].0.is_empty() {
                continue;
            }
            used[i] = true;
            let mut combined = segments[i].0.clone();
            let mut merged_from = vec![i];

            // Keep scanning until no remaining segment reaches the current
            // run; each merge moves the run's endpoints.
            let mut extended = true;
            while extended {
                extended = false;
                for j in 0..segments.len() {
                    if used[j] || segments[j].0.is_empty() {
                        continue;
                    }
                    let other = &segments[j].0;
                    let head = combined[0];
                    let tail = combined[combined.len() - 1];
                    let candidates = [
                        (distance(tail, other[0]), Pairing::EndToStart),
                        (distance(tail, other[other.len() - 1]), Pairing::EndToEnd),
                        (distance(head, other[0]), Pairing::StartToStart),
                        (distance(head, other[other.len() - 1]), Pairing::StartToEnd),
                    ];
                    let (best_distance, pairing) = candidates
                        .into_iter()
                        .min_by(|a, b| a.0.total_cmp(&b.0))
                        .unwrap();
                    if best_distance >= self.max_distance {
                        continue;
                    }

                    info!(
                        "connecting segment {} to {} ({:?}, gap {:.6})",
                        j + 1,
                        i + 1,
                        pairing,
                        best_distance
                    );
                    combined = self.splice(combined, other, pairing);
                    used[j] = true;
                    merged_from.push(j);
                    extended = true;
                }
            }

            connected.push(ConnectedSegment {
                line: LineString::from(combined),
                merged_from,
            });
        }
        connected
    }

    fn splice(
        &self,
        combined: Vec<Coord<f64>>,
        other: &[Coord<f64>],
        pairing: Pairing,
    ) -> Vec<Coord<f64>> {
        let head = combined[0];
        let tail = combined[combined.len() - 1];
        match pairing {
            Pairing::EndToStart => {
                let mut out = combined;
                out.extend(self.bridge(tail, other[0]));
                out.extend_from_slice(other);
                out
            }
            Pairing::EndToEnd => {
                let mut out = combined;
                out.extend(self.bridge(tail, other[other.len() - 1]));
                out.extend(other.iter().rev());
                out
            }
            Pairing::StartToStart => {
                let mut out: Vec<Coord<f64>> = other.iter().rev().cloned().collect();
                out.extend(self.bridge(other[0], head));
                out.extend(combined);
                out
            }
            Pairing::StartToEnd => {
                let mut out = other.to_vec();
                out.extend(self.bridge(other[other.len() - 1], head));
                out.extend(combined);
                out
            }
        }
    }

    /// Interior points bridging a gap, spaced at most `max_gap` apart.
    fn bridge(&self, from: Coord<f64>, to: Coord<f64>) -> Vec<Coord<f64>> {
        let gap = distance(from, to);
        let pieces = ((gap / self.max_gap).ceil() as usize).max(2);
        (1..pieces)
            .map(|i| {
                let t = i as f64 / pieces as f64;
                Coord {
                    x: from.x + (to.x - from.x) * t,
                    y: from.y + (to.y - from.y) * t,
                }
            })
            .collect()
    }
}
