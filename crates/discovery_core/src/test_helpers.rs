//! Test helpers for common test setup and utilities.
//!
//! This module provides shared fixtures to reduce duplication across test
//! files. Coordinates are in the Lagos area, matching the sample deployment.

use crate::drivers::{DriverId, RawDriver};
use crate::geo::Coordinate;

/// Rider position used across test files for consistency (Lagos Mainland).
pub fn sample_rider() -> Coordinate {
    Coordinate {
        latitude: 6.5244,
        longitude: 3.3792,
    }
}

/// A destination a few kilometres from [`sample_rider`] (Victoria Island).
pub fn sample_destination() -> Coordinate {
    Coordinate {
        latitude: 6.4281,
        longitude: 3.4219,
    }
}

/// Driver row carrying an authoritative position.
pub fn positioned_driver(id: u64, latitude: f64, longitude: f64) -> RawDriver {
    RawDriver {
        position: Some(Coordinate {
            latitude,
            longitude,
        }),
        ..unpositioned_driver(id)
    }
}

/// Driver row the feed reports without a live position.
pub fn unpositioned_driver(id: u64) -> RawDriver {
    RawDriver {
        id: DriverId(id),
        first_name: format!("First{}", id),
        last_name: format!("Last{}", id),
        profile_image_url: format!("https://cdn.example.com/profiles/{}.png", id),
        car_image_url: format!("https://cdn.example.com/cars/{}.png", id),
        car_seats: 4,
        rating: 4.5,
        position: None,
    }
}
