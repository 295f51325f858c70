use geo_types::LineString;
use log::info;

/// Parameters for the V-turn narrowing patch.
///
/// The eastern boundary polygon doubles back on itself at its southern end,
/// and on the rendered map the two edges of that V sat visibly too far
/// apart. The patch pulls the inner edge south to close the gap.
#[derive(Debug, Clone)]
pub struct NarrowOptions {
    /// Vertices south of this latitude belong to the turn region.
    pub lat_threshold: f64,
    /// A turn-region vertex this much north of the southernmost vertex is
    /// on the inner edge.
    pub north_margin: f64,
    /// How far south (degrees) to move inner-edge vertices.
    pub adjustment: f64,
}

impl Default for NarrowOptions {
    fn default() -> Self {
        Self {
            lat_threshold: 56.32,
            north_margin: 0.0005,
            adjustment: 0.0015,
        }
    }
}

/// Narrows the V-turn at the southern end of a boundary ring by shifting
/// inner-edge vertices south. Returns how many vertices moved.
pub fn narrow_v_turn(ring: &mut LineString<f64>, options: &NarrowOptions) -> usize {
    let turn: Vec<usize> = ring
        .0
        .iter()
        .enumerate()
        .filter(|(_, c)| c.y < options.lat_threshold)
        .map(|(i, _)| i)
        .collect();
    let (Some(&turn_start), Some(&turn_end)) = (turn.first(), turn.last()) else {
        info!("no vertices below {}, nothing to narrow", options.lat_threshold);
        return 0;
    };

    let southernmost = ring.0[turn_start..=turn_end]
        .iter()
        .map(|c| c.y)
        .fold(f64::MAX, f64::min);

    let mut moved = 0;
    for i in turn_start..=turn_end {
        if ring.0[i].y - southernmost > options.north_margin {
            ring.0[i].y -= options.adjustment;
            moved += 1;
        }
    }
    info!(
        "narrowed V-turn: moved {} of {} turn vertices",
        moved,
        turn_end - turn_start + 1
    );
    moved
}
