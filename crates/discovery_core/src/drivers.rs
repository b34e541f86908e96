//! Upstream driver records and the directory boundary that lists them.
//!
//! The engine never mutates driver rows; it reads whatever the directory
//! returns and rebuilds its own marker set from scratch each cycle. A listing
//! failure means "zero drivers available", surfaced with an error message,
//! never a crash.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Upstream identifier for a driver.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct DriverId(pub u64);

/// A driver as the directory reports one: identity, display fields, and an
/// authoritative position if the feed knows it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDriver {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,
    pub car_image_url: String,
    pub car_seats: u32,
    pub rating: f64,
    /// Live position, when the feed carries a usable one.
    pub position: Option<Coordinate>,
}

impl RawDriver {
    /// Display name shown on the driver's marker.
    pub fn title(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Errors from the driver directory.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Transport failure or a non-success status from the fleet service.
    #[error("driver listing request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered but the payload did not match the expected shape.
    #[error("driver listing payload malformed: {0}")]
    Payload(#[from] serde_json::Error),
    /// Catch-all for non-HTTP directory implementations.
    #[error("driver directory unavailable: {0}")]
    Unavailable(String),
}

/// Source of candidate drivers. Implementations must be `Send + Sync` so the
/// orchestrator can share one directory across refreshes.
pub trait DriverDirectory: Send + Sync {
    /// List the currently available drivers.
    fn list_drivers(&self) -> Result<Vec<RawDriver>, ListingError>;
}

// ---------------------------------------------------------------------------
// Static directory
// ---------------------------------------------------------------------------

/// Fixed in-memory directory (useful for tests and offline demos).
#[derive(Clone, Debug, Default)]
pub struct StaticDriverDirectory {
    drivers: Vec<RawDriver>,
}

impl StaticDriverDirectory {
    pub fn new(drivers: Vec<RawDriver>) -> Self {
        Self { drivers }
    }
}

impl DriverDirectory for StaticDriverDirectory {
    fn list_drivers(&self) -> Result<Vec<RawDriver>, ListingError> {
        Ok(self.drivers.clone())
    }
}

// ---------------------------------------------------------------------------
// HTTP directory
// ---------------------------------------------------------------------------

/// Directory backed by the fleet service's `GET {endpoint}/drivers` route.
#[derive(Debug, Clone)]
pub struct HttpDriverDirectory {
    client: Client,
    endpoint: String,
}

impl HttpDriverDirectory {
    /// Create a directory client for the given service root
    /// (e.g. `http://localhost:3000/api`).
    pub fn new(endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build directory client");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

impl DriverDirectory for HttpDriverDirectory {
    fn list_drivers(&self) -> Result<Vec<RawDriver>, ListingError> {
        let url = format!("{}/drivers", self.endpoint);
        let response = self.client.get(&url).send()?.error_for_status()?;
        let body = response.text()?;
        let payload: DriversResponse = serde_json::from_str(&body)?;

        tracing::debug!(driver_count = payload.data.len(), "driver listing fetched");
        Ok(payload
            .data
            .into_iter()
            .map(DriverRow::into_raw_driver)
            .collect())
    }
}

/// The fleet service wraps its rows in a `data` envelope.
#[derive(Deserialize)]
struct DriversResponse {
    data: Vec<DriverRow>,
}

/// One wire row. Display fields default to empty rather than failing the
/// whole listing when the feed omits them.
#[derive(Deserialize)]
struct DriverRow {
    id: u64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    profile_image_url: String,
    #[serde(default)]
    car_image_url: String,
    #[serde(default)]
    car_seats: u32,
    #[serde(default)]
    rating: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl DriverRow {
    /// Rows with malformed coordinates are kept without a position, so the
    /// marker synthesizer places them instead of the row being dropped.
    fn into_raw_driver(self) -> RawDriver {
        let position = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => match Coordinate::new(latitude, longitude) {
                Ok(coordinate) => Some(coordinate),
                Err(err) => {
                    tracing::warn!(driver_id = self.id, %err, "ignoring malformed driver position");
                    None
                }
            },
            _ => None,
        };

        RawDriver {
            id: DriverId(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            profile_image_url: self.profile_image_url,
            car_image_url: self.car_image_url,
            car_seats: self.car_seats,
            rating: self.rating,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Vec<RawDriver> {
        let payload: DriversResponse = serde_json::from_str(json).expect("fixture JSON");
        payload
            .data
            .into_iter()
            .map(DriverRow::into_raw_driver)
            .collect()
    }

    #[test]
    fn full_row_decodes_with_position() {
        let drivers = decode(
            r#"{
                "data": [
                    {
                        "id": 1,
                        "first_name": "James",
                        "last_name": "Wilson",
                        "profile_image_url": "https://cdn.example.com/p/1.png",
                        "car_image_url": "https://cdn.example.com/c/1.png",
                        "car_seats": 4,
                        "rating": 4.8,
                        "latitude": 6.5244,
                        "longitude": 3.3792
                    }
                ]
            }"#,
        );

        assert_eq!(drivers.len(), 1);
        let driver = &drivers[0];
        assert_eq!(driver.id, DriverId(1));
        assert_eq!(driver.title(), "James Wilson");
        assert_eq!(driver.car_seats, 4);
        assert_eq!(
            driver.position,
            Some(Coordinate {
                latitude: 6.5244,
                longitude: 3.3792,
            })
        );
    }

    #[test]
    fn missing_coordinates_leave_position_unset() {
        let drivers = decode(
            r#"{
                "data": [
                    { "id": 2, "first_name": "Sarah", "last_name": "Scott" }
                ]
            }"#,
        );

        assert_eq!(drivers[0].position, None);
    }

    #[test]
    fn malformed_coordinates_degrade_to_unpositioned() {
        let drivers = decode(
            r#"{
                "data": [
                    { "id": 3, "first_name": "Michael", "last_name": "Johnson",
                      "latitude": 123.0, "longitude": 3.37 }
                ]
            }"#,
        );

        // Out-of-range latitude: the row survives, the position does not
        assert_eq!(drivers[0].id, DriverId(3));
        assert_eq!(drivers[0].position, None);
    }

    #[test]
    fn partial_coordinates_count_as_missing() {
        let drivers = decode(
            r#"{
                "data": [
                    { "id": 4, "first_name": "David", "last_name": "Brown",
                      "latitude": 6.5244 }
                ]
            }"#,
        );

        assert_eq!(drivers[0].position, None);
    }

    #[test]
    fn static_directory_returns_fixture() {
        let directory = StaticDriverDirectory::new(vec![RawDriver {
            id: DriverId(7),
            first_name: "Amina".to_string(),
            last_name: "Bello".to_string(),
            profile_image_url: String::new(),
            car_image_url: String::new(),
            car_seats: 4,
            rating: 4.9,
            position: None,
        }]);

        let drivers = directory.list_drivers().expect("static listing");
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].id, DriverId(7));
    }
}
