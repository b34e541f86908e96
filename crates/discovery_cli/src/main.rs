//! Command-line front end for the discovery engine.
//!
//! Fetches a driver list, places markers around the rider, frames a
//! viewport over the nearest drivers, and, when a directions API key is
//! configured, annotates every marker with a trip time and fare.

use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use discovery_core::discovery::{DiscoveryConfig, DiscoveryEngine, DiscoverySnapshot};
use discovery_core::drivers::{
    DriverDirectory, DriverId, HttpDriverDirectory, RawDriver, StaticDriverDirectory,
};
use discovery_core::geo::Coordinate;
use discovery_core::routing::{CachedRouteProvider, DirectionsClient, RouteProvider};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "discovery",
    about = "Driver discovery and fare estimation around a rider position"
)]
struct Cli {
    /// Rider latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    rider_lat: f64,
    /// Rider longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    rider_lng: f64,
    /// Destination latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    dest_lat: Option<f64>,
    /// Destination longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    dest_lng: Option<f64>,
    /// Fleet service base URL; omit to use the bundled sample fleet
    #[arg(long)]
    directory: Option<String>,
    /// Directions service base URL
    #[arg(
        long,
        default_value = "https://maps.googleapis.com/maps/api/directions"
    )]
    directions: String,
    /// Directions API key; without one, markers render without estimates
    #[arg(long, env = "DIRECTIONS_API_KEY")]
    api_key: Option<String>,
    /// How long to wait for estimates before printing, in seconds
    #[arg(long, default_value_t = 10)]
    wait_secs: u64,
    /// Print the snapshot as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

// ── logging ────────────────────────────────────────────────────────

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "discovery_core=debug,info"
    } else {
        "discovery_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

// ── sample fleet ───────────────────────────────────────────────────

fn sample_driver(
    id: u64,
    first_name: &str,
    last_name: &str,
    rating: f64,
    position: Option<Coordinate>,
) -> RawDriver {
    RawDriver {
        id: DriverId(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        profile_image_url: format!(
            "https://ui-avatars.com/api/?name={}+{}",
            first_name, last_name
        ),
        car_image_url: format!("https://cdn.example.com/cars/{}.png", id),
        car_seats: 4,
        rating,
        position,
    }
}

/// Small fleet around Lagos Mainland for running without a fleet service.
fn sample_fleet() -> Vec<RawDriver> {
    vec![
        sample_driver(
            1,
            "James",
            "Wilson",
            4.8,
            Some(Coordinate {
                latitude: 6.5244,
                longitude: 3.3792,
            }),
        ),
        sample_driver(
            2,
            "David",
            "Brown",
            4.6,
            Some(Coordinate {
                latitude: 6.528,
                longitude: 3.37,
            }),
        ),
        sample_driver(3, "Amina", "Bello", 4.9, None),
        sample_driver(4, "Michael", "Johnson", 4.2, None),
    ]
}

// ── output ─────────────────────────────────────────────────────────

fn print_snapshot(snapshot: &DiscoverySnapshot) {
    println!(
        "phase: {:?} (generation {})",
        snapshot.phase, snapshot.generation
    );
    if let Some(error) = &snapshot.error {
        println!("error: {error}");
    }
    if let Some(viewport) = snapshot.viewport {
        println!(
            "viewport: center ({:.4}, {:.4}), spans {:.4} x {:.4}",
            viewport.center.latitude,
            viewport.center.longitude,
            viewport.latitude_span,
            viewport.longitude_span
        );
    }
    if snapshot.markers.is_empty() {
        println!("no drivers");
        return;
    }
    for marker in &snapshot.markers {
        let estimate = match marker.estimate {
            Some(estimate) => format!(
                "{:.1} min, ${:.2}",
                estimate.trip_seconds / 60.0,
                estimate.price
            ),
            None => "no estimate".to_string(),
        };
        println!(
            "  #{} {} at ({:.4}, {:.4}) - {}",
            marker.driver.id.0,
            marker.title,
            marker.coordinate.latitude,
            marker.coordinate.longitude,
            estimate
        );
    }
}

// ── main ───────────────────────────────────────────────────────────

fn parse_coordinate(latitude: f64, longitude: f64, label: &str) -> Coordinate {
    match Coordinate::new(latitude, longitude) {
        Ok(coordinate) => coordinate,
        Err(err) => {
            eprintln!("invalid {label}: {err}");
            exit(2);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let rider = parse_coordinate(cli.rider_lat, cli.rider_lng, "rider position");
    let destination = match (cli.dest_lat, cli.dest_lng) {
        (Some(latitude), Some(longitude)) => {
            Some(parse_coordinate(latitude, longitude, "destination"))
        }
        (None, None) => None,
        _ => {
            eprintln!("destination needs both --dest-lat and --dest-lng");
            exit(2);
        }
    };

    let directory: Arc<dyn DriverDirectory> = match &cli.directory {
        Some(endpoint) => Arc::new(HttpDriverDirectory::new(endpoint)),
        None => {
            tracing::info!("no fleet service configured, using the bundled sample fleet");
            Arc::new(StaticDriverDirectory::new(sample_fleet()))
        }
    };

    let provider: Option<Arc<dyn RouteProvider>> = match &cli.api_key {
        Some(key) => Some(Arc::new(CachedRouteProvider::with_default_capacity(
            Box::new(DirectionsClient::new(&cli.directions, key)),
        ))),
        None => {
            tracing::warn!("no directions API key, markers will render without estimates");
            None
        }
    };

    let mut engine = DiscoveryEngine::new(directory, provider, DiscoveryConfig::default());
    engine.set_rider_position(Some(rider));
    engine.refresh_drivers();
    engine.set_destination(destination);

    if !engine.wait_for_estimates(Duration::from_secs(cli.wait_secs)) {
        tracing::warn!(
            wait_secs = cli.wait_secs,
            "estimates still in flight, printing what we have"
        );
    }

    let snapshot = engine.snapshot();
    if cli.json {
        match serde_json::to_string_pretty(&*snapshot) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("failed to render snapshot: {err}");
                exit(1);
            }
        }
    } else {
        print_snapshot(&snapshot);
    }

    if snapshot.error.is_some() {
        exit(1);
    }
}
