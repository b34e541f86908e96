//! Discovery orchestration: the composition root that turns rider input and
//! a driver feed into one coherent map snapshot per cycle.
//!
//! The engine is owned by a single hosting thread. Estimation fans out on a
//! background thread per cycle and reports back over a channel; results
//! carry the generation token they were spawned with, and anything stale is
//! discarded on receipt rather than cancelled in flight. Consumers only ever
//! see whole snapshots, never a half-updated cycle.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::drivers::{DriverDirectory, DriverId, RawDriver};
use crate::estimate::annotate_markers;
use crate::geo::Coordinate;
use crate::markers::{synthesize_markers, DriverMarker, JitterDistribution, UniformJitter};
use crate::pricing::FareSchedule;
use crate::routing::RouteProvider;
use crate::viewport::{frame_viewport, Viewport};

/// Where the current discovery cycle stands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum DiscoveryPhase {
    /// Nothing fetched yet, or not enough input to place markers.
    #[default]
    Idle,
    /// Waiting on the driver directory.
    DriversLoading,
    /// The marker set (possibly empty) and viewport are published;
    /// estimates may still be in flight.
    MarkersReady,
    /// The current generation's estimates have been folded in.
    EstimatesReady,
}

/// One coherent, immutable view of discovery state.
///
/// Published wholesale as a shared value; the engine never mutates a
/// snapshot a consumer might be holding.
#[derive(Clone, Debug, Serialize)]
pub struct DiscoverySnapshot {
    pub markers: Vec<DriverMarker>,
    pub viewport: Option<Viewport>,
    pub phase: DiscoveryPhase,
    /// True while an estimate batch is in flight for the current generation.
    pub loading: bool,
    /// Human-readable listing failure, if the last refresh failed.
    pub error: Option<String>,
    pub selected_driver: Option<DriverId>,
    pub generation: u64,
}

/// How placeholder jitter is seeded each cycle.
#[derive(Debug)]
pub enum JitterPolicy {
    /// Fresh entropy per cycle: placeholder placements differ between
    /// refreshes.
    FreshPerCycle,
    /// One fixed distribution for every cycle (tests).
    Fixed(Box<dyn JitterDistribution>),
}

/// Tunable knobs for the discovery engine.
#[derive(Debug)]
pub struct DiscoveryConfig {
    pub jitter: JitterPolicy,
    pub fares: FareSchedule,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            jitter: JitterPolicy::FreshPerCycle,
            fares: FareSchedule::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Pin placeholder placement to a fixed distribution.
    pub fn with_jitter(mut self, jitter: Box<dyn JitterDistribution>) -> Self {
        self.jitter = JitterPolicy::Fixed(jitter);
        self
    }

    pub fn with_fares(mut self, fares: FareSchedule) -> Self {
        self.fares = fares;
        self
    }
}

/// Result message from a background estimate batch.
struct EstimateBatch {
    generation: u64,
    markers: Vec<DriverMarker>,
}

/// The discovery engine. Owns the current generation of markers and
/// viewport; everything downstream reads snapshots.
pub struct DiscoveryEngine {
    directory: Arc<dyn DriverDirectory>,
    /// Absent provider = degraded mode: markers render, annotation skipped.
    provider: Option<Arc<dyn RouteProvider>>,
    config: DiscoveryConfig,

    drivers: Vec<RawDriver>,
    rider: Option<Coordinate>,
    destination: Option<Coordinate>,
    selected: Option<DriverId>,

    markers: Vec<DriverMarker>,
    viewport: Option<Viewport>,
    phase: DiscoveryPhase,
    loading: bool,
    error: Option<String>,
    generation: u64,
    snapshot: Arc<DiscoverySnapshot>,

    sender: Sender<EstimateBatch>,
    receiver: Receiver<EstimateBatch>,
}

impl DiscoveryEngine {
    pub fn new(
        directory: Arc<dyn DriverDirectory>,
        provider: Option<Arc<dyn RouteProvider>>,
        config: DiscoveryConfig,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            directory,
            provider,
            config,
            drivers: Vec::new(),
            rider: None,
            destination: None,
            selected: None,
            markers: Vec::new(),
            viewport: None,
            phase: DiscoveryPhase::Idle,
            loading: false,
            error: None,
            generation: 0,
            snapshot: Arc::new(DiscoverySnapshot {
                markers: Vec::new(),
                viewport: None,
                phase: DiscoveryPhase::Idle,
                loading: false,
                error: None,
                selected_driver: None,
                generation: 0,
            }),
            sender,
            receiver,
        }
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<DiscoverySnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Re-fetch the driver list and start a new cycle.
    ///
    /// A listing failure publishes the empty state with a visible error;
    /// it never panics and never leaves stale markers behind.
    pub fn refresh_drivers(&mut self) {
        self.phase = DiscoveryPhase::DriversLoading;
        self.loading = true;
        self.error = None;
        self.publish();

        match self.directory.list_drivers() {
            Ok(drivers) => {
                tracing::debug!(driver_count = drivers.len(), "driver directory refreshed");
                self.drivers = drivers;
                // The driver set changed; an old selection may point nowhere
                self.selected = None;
                self.recompute_cycle();
            }
            Err(err) => {
                tracing::warn!(%err, "driver listing failed");
                self.drivers.clear();
                self.selected = None;
                self.markers.clear();
                self.viewport = None;
                // Invalidate any in-flight estimates for the old driver set
                self.generation += 1;
                self.phase = DiscoveryPhase::Idle;
                self.loading = false;
                self.error = Some(err.to_string());
                self.publish();
            }
        }
    }

    /// Update the rider position. Any actual change starts a new cycle.
    pub fn set_rider_position(&mut self, rider: Option<Coordinate>) {
        if self.rider == rider {
            return;
        }
        self.rider = rider;
        self.recompute_cycle();
    }

    /// Update the destination. Any actual change starts a new cycle.
    pub fn set_destination(&mut self, destination: Option<Coordinate>) {
        if self.destination == destination {
            return;
        }
        self.destination = destination;
        self.recompute_cycle();
    }

    /// Record the rider's driver selection.
    ///
    /// An id that is not in the current marker set clears the selection, so
    /// a stale pick from a superseded cycle cannot stick.
    pub fn select_driver(&mut self, driver: Option<DriverId>) {
        self.selected = driver.filter(|id| self.markers.iter().any(|m| m.driver.id == *id));
        self.publish();
    }

    /// Fold any completed estimate batches into the current state.
    ///
    /// Batches from superseded generations are discarded, never merged.
    /// Returns true when a new snapshot was published.
    pub fn poll_estimates(&mut self) -> bool {
        let mut changed = false;
        while let Ok(batch) = self.receiver.try_recv() {
            changed |= self.apply_batch(batch);
        }
        changed
    }

    /// Block until the current generation's estimates land, up to `timeout`.
    ///
    /// Returns true when nothing is (or remains) in flight; false on
    /// timeout. Stale batches received while waiting are discarded exactly
    /// as in [`poll_estimates`](Self::poll_estimates).
    pub fn wait_for_estimates(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.receiver.recv_timeout(remaining) {
                Ok(batch) => {
                    self.apply_batch(batch);
                }
                Err(_) => return false,
            }
        }
        true
    }

    fn apply_batch(&mut self, batch: EstimateBatch) -> bool {
        if batch.generation != self.generation {
            tracing::debug!(
                batch_generation = batch.generation,
                current_generation = self.generation,
                "discarding stale estimate batch"
            );
            return false;
        }
        self.markers = batch.markers;
        self.phase = DiscoveryPhase::EstimatesReady;
        self.loading = false;
        self.publish();
        true
    }

    /// Rebuild markers and viewport for the latest inputs and, when
    /// possible, kick off estimation. Every call supersedes anything still
    /// in flight.
    fn recompute_cycle(&mut self) {
        self.generation += 1;

        let rider = match self.rider {
            Some(rider) => rider,
            None => {
                // Not enough input to place markers yet
                self.markers.clear();
                self.viewport = None;
                self.phase = DiscoveryPhase::Idle;
                self.loading = false;
                self.publish();
                return;
            }
        };

        self.markers = match &self.config.jitter {
            JitterPolicy::FreshPerCycle => {
                let jitter = UniformJitter::from_entropy();
                synthesize_markers(rider, &self.drivers, &jitter)
            }
            JitterPolicy::Fixed(jitter) => synthesize_markers(rider, &self.drivers, jitter.as_ref()),
        };

        let coordinates: Vec<Coordinate> = self.markers.iter().map(|m| m.coordinate).collect();
        self.viewport = frame_viewport(rider, &coordinates, self.destination);
        self.phase = DiscoveryPhase::MarkersReady;
        self.loading = self.spawn_estimates(rider);
        self.publish();
    }

    /// Fan out the estimate batch for the current generation. Returns
    /// whether a batch was actually started.
    fn spawn_estimates(&self, rider: Coordinate) -> bool {
        let destination = match self.destination {
            Some(destination) => destination,
            None => return false,
        };
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                tracing::debug!("no route provider configured, markers stay unannotated");
                return false;
            }
        };
        if self.markers.is_empty() {
            return false;
        }

        let generation = self.generation;
        let markers = self.markers.clone();
        let fares = self.config.fares;
        let sender = self.sender.clone();

        thread::spawn(move || {
            let annotated = annotate_markers(
                markers,
                Some(rider),
                Some(destination),
                provider.as_ref(),
                &fares,
            );
            // Receiver gone means the engine was dropped; nothing to do
            let _ = sender.send(EstimateBatch {
                generation,
                markers: annotated,
            });
        });

        true
    }

    fn publish(&mut self) {
        self.snapshot = Arc::new(DiscoverySnapshot {
            markers: self.markers.clone(),
            viewport: self.viewport,
            phase: self.phase,
            loading: self.loading,
            error: self.error.clone(),
            selected_driver: self.selected,
            generation: self.generation,
        });
    }
}
