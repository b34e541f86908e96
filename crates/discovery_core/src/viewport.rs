//! Viewport framing: pick the map region that keeps the rider and the
//! nearest candidates visible.

use serde::{Deserialize, Serialize};

use crate::geo::{BoundingBox, Coordinate};

/// How many nearest candidates are framed alongside the rider.
pub const FRAMED_CANDIDATES: usize = 3;

/// Additive per-axis margin in degrees. Keeps both spans strictly positive
/// even when every framed point coincides.
pub const VIEWPORT_MARGIN_DEG: f64 = 0.1;

/// The visible map region: a center point plus per-axis angular spans.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

/// Frame the rider and the nearest candidate coordinates.
///
/// Nearness is planar degree-space distance to the rider. Returns `None`
/// when there are no candidates; the presentation layer treats that as a
/// loading state rather than rendering a degenerate box. The destination is
/// accepted for signature stability but deliberately not folded into the
/// box.
pub fn frame_viewport(
    rider: Coordinate,
    candidates: &[Coordinate],
    _destination: Option<Coordinate>,
) -> Option<Viewport> {
    if candidates.is_empty() {
        return None;
    }

    let mut by_distance: Vec<Coordinate> = candidates.to_vec();
    by_distance.sort_by(|a, b| {
        rider
            .planar_distance_deg(a)
            .total_cmp(&rider.planar_distance_deg(b))
    });

    let mut bounds = BoundingBox::from_point(rider);
    for candidate in by_distance.iter().take(FRAMED_CANDIDATES) {
        bounds.extend(*candidate);
    }

    Some(Viewport {
        center: bounds.center(),
        latitude_span: bounds.latitude_span() + VIEWPORT_MARGIN_DEG,
        longitude_span: bounds.longitude_span() + VIEWPORT_MARGIN_DEG,
    })
}
