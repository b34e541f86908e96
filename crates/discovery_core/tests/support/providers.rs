#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use discovery_core::drivers::{DriverDirectory, ListingError, RawDriver, StaticDriverDirectory};
use discovery_core::geo::Coordinate;
use discovery_core::routing::{
    FixedRouteTable, RouteProvider, RouteQuery, RouteSummary, RoutingError,
};

pub fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate {
        latitude,
        longitude,
    }
}

pub fn summary(duration_secs: f64) -> RouteSummary {
    RouteSummary {
        duration_secs,
        distance_m: None,
    }
}

/// Records every query passed through to the inner table.
pub struct CountingProvider {
    inner: FixedRouteTable,
    queries: Mutex<Vec<RouteQuery>>,
}

impl CountingProvider {
    pub fn new(inner: FixedRouteTable) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn total_queries(&self) -> usize {
        self.queries.lock().expect("queries lock").len()
    }

    pub fn queries_for(&self, origin: Coordinate, destination: Coordinate) -> usize {
        self.queries
            .lock()
            .expect("queries lock")
            .iter()
            .filter(|q| q.origin == origin && q.destination == destination)
            .count()
    }
}

impl RouteProvider for CountingProvider {
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError> {
        self.queries.lock().expect("queries lock").push(query);
        self.inner.route(query)
    }
}

/// Blocks every query until the shared gate opens, so a test can hold an
/// entire estimate batch in flight while it changes the engine's inputs.
pub struct GatedProvider {
    inner: FixedRouteTable,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl GatedProvider {
    pub fn new(inner: FixedRouteTable) -> (Self, GateHandle) {
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        let handle = GateHandle(Arc::clone(&gate));
        (Self { inner, gate }, handle)
    }
}

pub struct GateHandle(Arc<(Mutex<bool>, Condvar)>);

impl GateHandle {
    /// Release every blocked query and all future ones.
    pub fn open(&self) {
        let (lock, condvar) = &*self.0;
        let mut open = lock.lock().expect("gate lock");
        *open = true;
        condvar.notify_all();
    }
}

impl RouteProvider for GatedProvider {
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError> {
        let (lock, condvar) = &*self.gate;
        let mut open = lock.lock().expect("gate lock");
        while !*open {
            open = condvar.wait(open).expect("gate wait");
        }
        drop(open);
        self.inner.route(query)
    }
}

/// Fails selected queries with a fixed error; everything else delegates.
pub struct SelectiveFailProvider {
    inner: FixedRouteTable,
    failing: Vec<RouteQuery>,
    error: RoutingError,
}

impl SelectiveFailProvider {
    pub fn new(inner: FixedRouteTable, failing: Vec<RouteQuery>, error: RoutingError) -> Self {
        Self {
            inner,
            failing,
            error,
        }
    }
}

impl RouteProvider for SelectiveFailProvider {
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError> {
        if self.failing.contains(&query) {
            return Err(self.error.clone());
        }
        self.inner.route(query)
    }
}

/// Directory that always fails, for empty-state tests.
pub struct FailingDirectory {
    pub message: String,
}

impl DriverDirectory for FailingDirectory {
    fn list_drivers(&self) -> Result<Vec<RawDriver>, ListingError> {
        Err(ListingError::Unavailable(self.message.clone()))
    }
}

/// Fails the first `fail_first` listings, then delegates to the fixture.
pub struct FlakyDirectory {
    inner: StaticDriverDirectory,
    calls: AtomicUsize,
    fail_first: usize,
}

impl FlakyDirectory {
    pub fn new(drivers: Vec<RawDriver>, fail_first: usize) -> Self {
        Self {
            inner: StaticDriverDirectory::new(drivers),
            calls: AtomicUsize::new(0),
            fail_first,
        }
    }
}

impl DriverDirectory for FlakyDirectory {
    fn list_drivers(&self) -> Result<Vec<RawDriver>, ListingError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(ListingError::Unavailable("fleet service offline".to_string()));
        }
        self.inner.list_drivers()
    }
}
