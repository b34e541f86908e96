//! Pluggable route providers: trait abstraction for routing backends.
//!
//! Three pieces, composable behind [`RouteProvider`]:
//!
//! - **`DirectionsClient`** (`directions` submodule): blocking HTTP client for
//!   a hosted directions service.
//! - **`FixedRouteTable`**: in-memory table keyed by quantized coordinate
//!   pairs (useful for tests and offline demos).
//! - **`CachedRouteProvider`**: LRU wrapper memoizing stable outcomes of any
//!   inner provider.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{Coordinate, GeoError};

pub mod directions;

pub use directions::DirectionsClient;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// A single point-to-point routing question.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Result of a successful route lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Expected travel time in seconds, from the primary route's first leg.
    pub duration_secs: f64,
    /// Road distance in metres, when the backend reports one.
    pub distance_m: Option<f64>,
}

/// Errors from a single route lookup.
///
/// `NoRoute` is permanent for a coordinate pair and is never retried;
/// `Unavailable` is transient and may succeed on a later cycle.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RoutingError {
    /// One of the query endpoints violates the coordinate invariants.
    /// Checked before any network call is issued.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] GeoError),
    /// The backend answered but found no route between the endpoints.
    #[error("no route between the requested endpoints")]
    NoRoute,
    /// Transport failure or a malformed/denied response.
    #[error("routing backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait for routing backends. Implementations must be `Send + Sync` so a
/// shared provider can serve concurrent estimate workers.
pub trait RouteProvider: Send + Sync {
    /// Answer a single routing query.
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError>;
}

// ---------------------------------------------------------------------------
// Coordinate quantization
// ---------------------------------------------------------------------------

/// Quantized directional coordinate pair used as a table/cache key.
/// Microdegree resolution (~11 cm) is far below any jitter or GPS noise.
type PairKey = ((i64, i64), (i64, i64));

fn quantize(coordinate: Coordinate) -> (i64, i64) {
    (
        (coordinate.latitude * 1e6).round() as i64,
        (coordinate.longitude * 1e6).round() as i64,
    )
}

fn pair_key(query: RouteQuery) -> PairKey {
    (quantize(query.origin), quantize(query.destination))
}

// ---------------------------------------------------------------------------
// Fixed table provider
// ---------------------------------------------------------------------------

/// In-memory route table. Unknown pairs answer `NoRoute`.
#[derive(Debug, Default)]
pub struct FixedRouteTable {
    table: HashMap<PairKey, RouteSummary>,
}

impl FixedRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the summary returned for `origin -> destination`.
    /// Routes are directional; register both ways if both are needed.
    pub fn insert(&mut self, origin: Coordinate, destination: Coordinate, summary: RouteSummary) {
        self.table.insert(
            pair_key(RouteQuery {
                origin,
                destination,
            }),
            summary,
        );
    }
}

impl RouteProvider for FixedRouteTable {
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError> {
        query.origin.validate()?;
        query.destination.validate()?;
        self.table
            .get(&pair_key(query))
            .copied()
            .ok_or(RoutingError::NoRoute)
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

/// Default route cache capacity.
const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 2_048;

/// LRU-cached wrapper around any [`RouteProvider`].
///
/// The key is the quantized directional coordinate pair. Found routes and
/// `NoRoute` answers are memoized; `Unavailable` and validation failures are
/// passed through uncached so the next query retries the backend.
pub struct CachedRouteProvider {
    inner: Box<dyn RouteProvider>,
    cache: Mutex<LruCache<PairKey, Result<RouteSummary, RoutingError>>>,
}

impl CachedRouteProvider {
    /// Create a caching wrapper with the given capacity.
    pub fn new(inner: Box<dyn RouteProvider>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }

    pub fn with_default_capacity(inner: Box<dyn RouteProvider>) -> Self {
        Self::new(inner, DEFAULT_ROUTE_CACHE_CAPACITY)
    }
}

impl RouteProvider for CachedRouteProvider {
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError> {
        let key = pair_key(query);

        // Fast path: cache hit
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return cached.clone();
            }
        }

        // Slow path: query inner provider
        let result = self.inner.route(query);

        // Memoize stable outcomes only
        match &result {
            Ok(_) | Err(RoutingError::NoRoute) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(key, result.clone());
                }
            }
            Err(_) => {}
        }

        result
    }
}
