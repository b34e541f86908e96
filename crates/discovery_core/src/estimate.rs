//! Fare/ETA aggregation: annotate each marker with a quote composed from two
//! routing legs.
//!
//! The drop-off leg (rider to destination) is identical for every driver and
//! is resolved once per batch. Pickup legs (marker to rider) fan out in
//! parallel; the collect is the join barrier, and input order is preserved
//! for UI stability. A failed leg costs that driver its annotation, never
//! the batch.

use rayon::prelude::*;

use crate::geo::Coordinate;
use crate::markers::{DriverMarker, TripEstimate};
use crate::pricing::FareSchedule;
use crate::routing::{RouteProvider, RouteQuery};

/// Annotate `markers` with per-driver trip estimates.
///
/// Returns the input unchanged when rider or destination is missing; that is
/// the "not enough information yet" state, not a failure. Repeated calls
/// with identical routing answers produce identical annotations.
pub fn annotate_markers(
    markers: Vec<DriverMarker>,
    rider: Option<Coordinate>,
    destination: Option<Coordinate>,
    provider: &dyn RouteProvider,
    fares: &FareSchedule,
) -> Vec<DriverMarker> {
    let (rider, destination) = match (rider, destination) {
        (Some(rider), Some(destination)) => (rider, destination),
        _ => return markers,
    };

    // One drop-off leg per batch; every driver's quote depends on it
    let dropoff = match provider.route(RouteQuery {
        origin: rider,
        destination,
    }) {
        Ok(summary) => summary,
        Err(err) => {
            tracing::warn!(%err, "drop-off leg failed, batch left unannotated");
            return clear_estimates(markers);
        }
    };

    markers
        .into_par_iter()
        .map(|marker| {
            let pickup = provider.route(RouteQuery {
                origin: marker.coordinate,
                destination: rider,
            });
            match pickup {
                Ok(summary) => {
                    let trip_seconds = summary.duration_secs + dropoff.duration_secs;
                    DriverMarker {
                        estimate: Some(TripEstimate {
                            trip_seconds,
                            price: fares.quote(trip_seconds),
                        }),
                        ..marker
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        driver_id = marker.driver.id.0,
                        %err,
                        "pickup leg failed, driver left unannotated"
                    );
                    DriverMarker {
                        estimate: None,
                        ..marker
                    }
                }
            }
        })
        .collect()
}

fn clear_estimates(markers: Vec<DriverMarker>) -> Vec<DriverMarker> {
    markers
        .into_iter()
        .map(|marker| DriverMarker {
            estimate: None,
            ..marker
        })
        .collect()
}
