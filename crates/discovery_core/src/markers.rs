//! Marker synthesis: projecting driver rows onto map coordinates.
//!
//! Drivers whose feed row carries no live position get a placeholder
//! placement near the rider. The placement is display-only and is never used
//! for dispatch decisions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::drivers::RawDriver;
use crate::geo::Coordinate;

/// Largest placeholder offset applied per axis, in degrees
/// (up to ~550 m at the equator).
pub const MAX_JITTER_DEG: f64 = 0.005;

/// Fare/ETA annotation attached by the estimate stage.
///
/// Both fields are always produced together, so a marker either carries a
/// complete estimate or none at all.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripEstimate {
    /// Pickup leg plus drop-off leg, in seconds.
    pub trip_seconds: f64,
    /// Quoted fare in currency units, rounded to cents.
    pub price: f64,
}

/// A driver placed on the map.
///
/// Markers are regenerated wholesale each discovery cycle; an annotation
/// never survives a rider or destination change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverMarker {
    pub driver: RawDriver,
    /// Authoritative position when known, placeholder placement otherwise.
    pub coordinate: Coordinate,
    /// Display name ("First Last").
    pub title: String,
    pub estimate: Option<TripEstimate>,
}

/// Source of placeholder offsets. Implementations must be `Send + Sync` so
/// synthesis can run wherever the orchestrator does.
pub trait JitterDistribution: Send + Sync + std::fmt::Debug {
    /// Offset in degrees applied to the rider position for the driver at
    /// `ordinal`. Returns `(latitude_offset, longitude_offset)`.
    fn offset_deg(&self, ordinal: u64) -> (f64, f64);
}

/// Uniform jitter in `[-max_offset_deg, +max_offset_deg)` per axis.
#[derive(Clone, Debug)]
pub struct UniformJitter {
    pub max_offset_deg: f64,
    /// Seed for the RNG (for reproducibility).
    pub seed: u64,
}

impl UniformJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            max_offset_deg: MAX_JITTER_DEG,
            seed,
        }
    }

    /// Seed from OS entropy, so each cycle places placeholders anew.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl JitterDistribution for UniformJitter {
    fn offset_deg(&self, ordinal: u64) -> (f64, f64) {
        if self.max_offset_deg <= 0.0 {
            return (0.0, 0.0);
        }
        // Seeded per driver so one seed reproduces a whole batch
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(ordinal));
        let latitude_offset = rng.gen_range(-self.max_offset_deg..self.max_offset_deg);
        let longitude_offset = rng.gen_range(-self.max_offset_deg..self.max_offset_deg);
        (latitude_offset, longitude_offset)
    }
}

/// Fixed offsets for exact-value tests.
#[derive(Clone, Debug)]
pub struct FixedJitter {
    pub latitude_offset_deg: f64,
    pub longitude_offset_deg: f64,
}

impl JitterDistribution for FixedJitter {
    fn offset_deg(&self, _ordinal: u64) -> (f64, f64) {
        (self.latitude_offset_deg, self.longitude_offset_deg)
    }
}

/// Project every driver onto the map.
///
/// Drivers with an authoritative position keep it; the rest are placed at
/// the rider position plus a per-driver jitter offset. Output order and
/// length always match the input; nothing is filtered here.
pub fn synthesize_markers(
    rider: Coordinate,
    drivers: &[RawDriver],
    jitter: &dyn JitterDistribution,
) -> Vec<DriverMarker> {
    drivers
        .iter()
        .enumerate()
        .map(|(ordinal, driver)| {
            let coordinate = match driver.position {
                Some(position) => position,
                None => {
                    let (dlat, dlng) = jitter.offset_deg(ordinal as u64);
                    Coordinate {
                        latitude: rider.latitude + dlat,
                        longitude: rider.longitude + dlng,
                    }
                }
            };
            DriverMarker {
                title: driver.title(),
                coordinate,
                estimate: None,
                driver: driver.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::DriverId;

    fn rider() -> Coordinate {
        Coordinate {
            latitude: 6.5244,
            longitude: 3.3792,
        }
    }

    fn driver(id: u64, position: Option<Coordinate>) -> RawDriver {
        RawDriver {
            id: DriverId(id),
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            profile_image_url: String::new(),
            car_image_url: String::new(),
            car_seats: 4,
            rating: 4.5,
            position,
        }
    }

    #[test]
    fn authoritative_positions_pass_through_unchanged() {
        let position = Coordinate {
            latitude: 6.528,
            longitude: 3.37,
        };
        let drivers = vec![driver(1, Some(position)), driver(2, Some(position))];
        let jitter = UniformJitter::new(42);

        let first = synthesize_markers(rider(), &drivers, &jitter);
        let second = synthesize_markers(rider(), &drivers, &jitter);

        assert_eq!(first.len(), drivers.len());
        assert_eq!(first[0].coordinate, position);
        assert_eq!(first[1].coordinate, position);
        // Identity property: no placeholder drivers, so repeat calls agree
        assert_eq!(first, second);
    }

    #[test]
    fn placeholders_stay_within_jitter_bounds() {
        let drivers: Vec<RawDriver> = (0..50).map(|id| driver(id, None)).collect();
        let jitter = UniformJitter::new(7);

        let markers = synthesize_markers(rider(), &drivers, &jitter);

        assert_eq!(markers.len(), drivers.len());
        for marker in &markers {
            let dlat = (marker.coordinate.latitude - rider().latitude).abs();
            let dlng = (marker.coordinate.longitude - rider().longitude).abs();
            assert!(dlat <= MAX_JITTER_DEG, "latitude offset {} too large", dlat);
            assert!(dlng <= MAX_JITTER_DEG, "longitude offset {} too large", dlng);
        }
    }

    #[test]
    fn fixed_jitter_places_exactly() {
        let drivers = vec![driver(1, None)];
        let jitter = FixedJitter {
            latitude_offset_deg: 0.002,
            longitude_offset_deg: -0.003,
        };

        let markers = synthesize_markers(rider(), &drivers, &jitter);

        assert!((markers[0].coordinate.latitude - 6.5264).abs() < 1e-12);
        assert!((markers[0].coordinate.longitude - 3.3762).abs() < 1e-12);
    }

    #[test]
    fn markers_keep_input_order_and_titles() {
        let drivers = vec![driver(3, None), driver(1, None), driver(2, None)];
        let jitter = UniformJitter::new(1);

        let markers = synthesize_markers(rider(), &drivers, &jitter);

        let ids: Vec<u64> = markers.iter().map(|m| m.driver.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(markers[0].title, "First3 Last3");
        assert!(markers.iter().all(|m| m.estimate.is_none()));
    }

    #[test]
    fn same_seed_reproduces_a_batch() {
        let drivers: Vec<RawDriver> = (0..5).map(|id| driver(id, None)).collect();

        let first = synthesize_markers(rider(), &drivers, &UniformJitter::new(99));
        let second = synthesize_markers(rider(), &drivers, &UniformJitter::new(99));
        let other_seed = synthesize_markers(rider(), &drivers, &UniformJitter::new(100));

        assert_eq!(first, second);
        assert_ne!(first, other_seed);
    }
}
