//! Run one full discovery cycle offline and print the annotated markers.
//!
//! Uses a static fleet and a fixed route table, so no network access or
//! API key is needed.
//!
//! Run with: cargo run -p discovery_core --example discovery_run

use std::sync::Arc;
use std::time::Duration;

use discovery_core::discovery::{DiscoveryConfig, DiscoveryEngine};
use discovery_core::drivers::StaticDriverDirectory;
use discovery_core::geo::Coordinate;
use discovery_core::markers::FixedJitter;
use discovery_core::routing::{FixedRouteTable, RouteProvider, RouteSummary};
use discovery_core::test_helpers::{
    positioned_driver, sample_destination, sample_rider, unpositioned_driver,
};

fn leg(duration_secs: f64, distance_m: f64) -> RouteSummary {
    RouteSummary {
        duration_secs,
        distance_m: Some(distance_m),
    }
}

fn main() {
    let rider = sample_rider();
    let destination = sample_destination();

    // Fixed jitter keeps placeholder placement deterministic, so the
    // placeholder pickup leg can be registered in the table up front.
    let jitter = FixedJitter {
        latitude_offset_deg: 0.003,
        longitude_offset_deg: -0.002,
    };
    let placed = Coordinate {
        latitude: rider.latitude + 0.003,
        longitude: rider.longitude - 0.002,
    };

    let mut table = FixedRouteTable::new();
    table.insert(rider, destination, leg(1_260.0, 11_200.0));
    table.insert(Coordinate { latitude: 6.528, longitude: 3.37 }, rider, leg(420.0, 2_300.0));
    table.insert(Coordinate { latitude: 6.5301, longitude: 3.3841 }, rider, leg(540.0, 3_100.0));
    table.insert(placed, rider, leg(300.0, 1_700.0));
    let provider: Arc<dyn RouteProvider> = Arc::new(table);

    let directory = StaticDriverDirectory::new(vec![
        positioned_driver(1, 6.528, 3.37),
        positioned_driver(2, 6.5301, 3.3841),
        unpositioned_driver(3),
        unpositioned_driver(4),
    ]);

    let config = DiscoveryConfig::default().with_jitter(Box::new(jitter));
    let mut engine = DiscoveryEngine::new(Arc::new(directory), Some(provider), config);

    engine.set_rider_position(Some(rider));
    engine.refresh_drivers();
    engine.set_destination(Some(destination));
    engine.wait_for_estimates(Duration::from_secs(5));

    let snapshot = engine.snapshot();
    println!(
        "--- Discovery cycle ({} drivers, fixed route table) ---",
        snapshot.markers.len()
    );
    println!("phase: {:?}", snapshot.phase);
    if let Some(viewport) = snapshot.viewport {
        println!(
            "viewport: center ({:.4}, {:.4}), spans {:.4} x {:.4}",
            viewport.center.latitude,
            viewport.center.longitude,
            viewport.latitude_span,
            viewport.longitude_span
        );
    }
    for marker in &snapshot.markers {
        match marker.estimate {
            Some(estimate) => println!(
                "  #{} {} at ({:.4}, {:.4})  trip {:.0} min  ${:.2}",
                marker.driver.id.0,
                marker.title,
                marker.coordinate.latitude,
                marker.coordinate.longitude,
                estimate.trip_seconds / 60.0,
                estimate.price
            ),
            None => println!(
                "  #{} {} at ({:.4}, {:.4})  no estimate",
                marker.driver.id.0,
                marker.title,
                marker.coordinate.latitude,
                marker.coordinate.longitude
            ),
        }
    }
}
