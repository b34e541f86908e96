//! Geographic primitives shared by every stage of the discovery pipeline.
//!
//! Coordinates are plain WGS84 degree pairs. Nearest-candidate comparisons
//! use planar degree-space Euclidean distance, a deliberate city-scale
//! approximation (not great-circle distance).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when validating geographic input.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate component is not finite")]
    NotFinite,
}

/// A WGS84 coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Re-check the invariants on a possibly hand-built value.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeoError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    /// Planar degree-space distance to `other`.
    ///
    /// Not a ground distance; only meaningful for comparing which of two
    /// points lies closer, and only at city scale.
    pub fn planar_distance_deg(&self, other: &Coordinate) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlng = other.longitude - self.longitude;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

/// Axis-aligned bounding box accumulated over a set of coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Start a box containing a single point.
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            min_latitude: point.latitude,
            max_latitude: point.latitude,
            min_longitude: point.longitude,
            max_longitude: point.longitude,
        }
    }

    /// Grow the box to contain `point`.
    pub fn extend(&mut self, point: Coordinate) {
        self.min_latitude = self.min_latitude.min(point.latitude);
        self.max_latitude = self.max_latitude.max(point.latitude);
        self.min_longitude = self.min_longitude.min(point.longitude);
        self.max_longitude = self.max_longitude.max(point.longitude);
    }

    /// Box midpoint.
    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.min_latitude + self.max_latitude) / 2.0,
            longitude: (self.min_longitude + self.max_longitude) / 2.0,
        }
    }

    pub fn latitude_span(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    pub fn longitude_span(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_valid_ranges() {
        assert!(Coordinate::new(6.5244, 3.3792).is_ok());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
        assert!(Coordinate::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(GeoError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn new_rejects_non_finite() {
        assert_eq!(Coordinate::new(f64::NAN, 0.0), Err(GeoError::NotFinite));
        assert_eq!(
            Coordinate::new(0.0, f64::INFINITY),
            Err(GeoError::NotFinite)
        );
    }

    #[test]
    fn planar_distance_matches_euclidean() {
        let origin = Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        };
        let point = Coordinate {
            latitude: 3.0,
            longitude: 4.0,
        };
        assert!((origin.planar_distance_deg(&point) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_grows_to_contain_points() {
        let mut bounds = BoundingBox::from_point(Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        });
        bounds.extend(Coordinate {
            latitude: 0.01,
            longitude: -0.02,
        });
        bounds.extend(Coordinate {
            latitude: -0.005,
            longitude: 0.03,
        });

        assert!((bounds.latitude_span() - 0.015).abs() < 1e-12);
        assert!((bounds.longitude_span() - 0.05).abs() < 1e-12);
        let center = bounds.center();
        assert!((center.latitude - 0.0025).abs() < 1e-12);
        assert!((center.longitude - 0.005).abs() < 1e-12);
    }
}
