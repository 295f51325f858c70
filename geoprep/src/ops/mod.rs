//! Clean-up operations for line work extracted from scanned maps.
//!
//! Each operation started life as a one-off patch applied to the extracted
//! transmission-line data until it looked right on the map; the hand-tuned
//! thresholds survive here as parameters with those values as defaults.

mod centerline;
mod despike;
mod filter;
mod gaps;
mod narrow;
mod smooth;

pub use centerline::reconstruct_centerline;
pub use despike::{remove_outliers, remove_spikes};
pub use filter::keep_main_segments;
pub use gaps::{ConnectedSegment, SegmentConnector};
pub use narrow::{narrow_v_turn, NarrowOptions};
pub use smooth::moving_average;

use geo::Simplify;
use geo_types::{Coord, LineString};
use geojson::FeatureCollection;
use rayon::prelude::*;

pub(crate) fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Resamples a line to exactly `num_points` vertices, evenly spaced by arc
/// length. Endpoints are preserved.
pub fn resample(line: &LineString<f64>, num_points: usize) -> LineString<f64> {
    let coords = &line.0;
    if coords.len() < 2 || num_points < 2 || coords.len() == num_points {
        return line.clone();
    }

    let mut cumulative = Vec::with_capacity(coords.len());
    cumulative.push(0.0);
    for i in 1..coords.len() {
        cumulative.push(cumulative[i - 1] + distance(coords[i - 1], coords[i]));
    }
    let total = *cumulative.last().unwrap();
    if total == 0.0 {
        return line.clone();
    }

    let mut resampled = Vec::with_capacity(num_points);
    let mut segment = 0;
    for i in 0..num_points {
        let target = total * i as f64 / (num_points - 1) as f64;
        while segment + 2 < cumulative.len() && cumulative[segment + 1] < target {
            segment += 1;
        }
        let span = cumulative[segment + 1] - cumulative[segment];
        let t = if span > 0.0 {
            (target - cumulative[segment]) / span
        } else {
            0.0
        };
        let a = coords[segment];
        let b = coords[segment + 1];
        resampled.push(Coord {
            x: a.x + t * (b.x - a.x),
            y: a.y + t * (b.y - a.y),
        });
    }
    LineString::from(resampled)
}

/// Full clean-up pipeline for one segment: despike, drop outliers, smooth,
/// simplify, then a light final smoothing pass.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Direction change (degrees) above which a vertex is a spike.
    pub spike_turn: f64,
    /// Outlier tolerance as a multiple of the local vertex spacing.
    pub outlier_factor: f64,
    pub smooth_window: usize,
    /// Douglas-Peucker epsilon in degrees.
    pub epsilon: f64,
    pub final_window: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            spike_turn: 150.0,
            outlier_factor: 2.0,
            smooth_window: 7,
            epsilon: 0.0002,
            final_window: 3,
        }
    }
}

pub fn clean_line(line: &LineString<f64>, options: &CleanOptions) -> LineString<f64> {
    let despiked = remove_spikes(line, options.spike_turn);
    let no_outliers = remove_outliers(&despiked, options.outlier_factor);
    let smoothed = moving_average(&no_outliers, options.smooth_window);
    let simplified = smoothed.simplify(&options.epsilon);
    moving_average(&simplified, options.final_window)
}

/// Cleans every LineString feature of a collection in parallel, returning
/// (before, after) vertex counts per cleaned feature for reporting.
pub fn clean_collection(
    collection: &mut FeatureCollection,
    options: &CleanOptions,
) -> Vec<(usize, usize)> {
    let lines = crate::io::line_strings(collection);
    let cleaned: Vec<(usize, LineString<f64>, usize, usize)> = lines
        .into_par_iter()
        .map(|(index, line)| {
            let before = line.0.len();
            let cleaned = clean_line(&line, options);
            let after = cleaned.0.len();
            (index, cleaned, before, after)
        })
        .collect();

    let mut report = Vec::with_capacity(cleaned.len());
    for (index, line, before, after) in cleaned {
        crate::io::set_line(&mut collection.features[index], &line);
        report.push((before, after));
    }
    report
}
