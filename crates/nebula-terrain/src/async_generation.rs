//! Background terrain mesh generation on a worker pool.
//!
//! Mesh building is a pure function of its parameters, so requests can run on
//! any thread. Completed meshes are delivered through a bounded channel and
//! collected by the caller, typically once per frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::biome::BiomeRuleSet;
use crate::error::ConfigurationError;
use crate::mesh::{TerrainMesh, TerrainMeshBuilder, TerrainParams};

/// A request to build one terrain mesh.
#[derive(Clone, Debug)]
pub struct TerrainRequest {
    /// Caller-chosen identifier, echoed back in the result.
    pub id: u64,
    /// Build parameters.
    pub params: TerrainParams,
}

/// The outcome of a background build.
#[derive(Debug)]
pub struct GeneratedTerrain {
    /// Identifier of the originating request.
    pub id: u64,
    /// The mesh, or the configuration error that prevented it.
    pub mesh: Result<TerrainMesh, ConfigurationError>,
    /// Build time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Internal wrapper that carries the request and its cancellation flag.
struct QueuedRequest {
    request: TerrainRequest,
    cancelled: Arc<AtomicBool>,
}

/// Runs [`TerrainMeshBuilder::build`] on background threads.
pub struct AsyncTerrainBuilder {
    /// Sender for submitting requests.
    task_sender: Sender<QueuedRequest>,
    /// Receiver for collecting completed meshes.
    result_receiver: Receiver<GeneratedTerrain>,
    /// Cancellation flag per request ID.
    active_tasks: Arc<DashMap<u64, Arc<AtomicBool>>>,
    /// Current number of in-flight requests.
    in_flight: Arc<AtomicU64>,
}

impl AsyncTerrainBuilder {
    /// Create a pool of `thread_count` workers sharing one builder.
    ///
    /// - `max_concurrent`: queue depth; excess submissions are rejected.
    /// - `result_capacity`: bounded channel capacity for completed meshes.
    ///
    /// Workers that fail to spawn are logged and skipped.
    pub fn new(
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
        rules: Arc<BiomeRuleSet>,
    ) -> Self {
        let (task_sender, task_receiver) = bounded::<QueuedRequest>(max_concurrent.max(1));
        let (result_sender, result_receiver) = bounded::<GeneratedTerrain>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));
        let builder = Arc::new(TerrainMeshBuilder::new(rules));

        for worker in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let builder = Arc::clone(&builder);

            let spawned = std::thread::Builder::new()
                .name(format!("terrain-gen-{worker}"))
                .spawn(move || {
                    // Exits once every sender is dropped.
                    while let Ok(queued) = receiver.recv() {
                        // Check cancellation before starting work.
                        if queued.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let mesh = builder.build(&queued.request.params);
                        let elapsed = start.elapsed().as_micros() as u64;

                        // Check cancellation after generation.
                        if !queued.cancelled.load(Ordering::Relaxed) {
                            // Receiver gone means the pool was dropped; nothing to deliver to.
                            let _ = sender.send(GeneratedTerrain {
                                id: queued.request.id,
                                mesh,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                });
            if let Err(err) = spawned {
                tracing::error!(worker, %err, "failed to spawn terrain worker");
            }
        }

        Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        }
    }

    /// Create a pool sized to the machine, leaving headroom for the main thread.
    pub fn with_defaults(rules: Arc<BiomeRuleSet>) -> Self {
        let threads = num_cpus::get().saturating_sub(1).max(1); // leave the caller a core
        Self::new(threads, 16, 16, rules)
    }

    /// Queue a request.
    ///
    /// Returns `Err(request)` if the queue is full or a request with the same
    /// `id` is still pending. An id becomes free again once its result is
    /// drained or it is cancelled.
    #[allow(clippy::result_large_err)]
    pub fn submit(&self, request: TerrainRequest) -> Result<(), TerrainRequest> {
        let cancelled = Arc::new(AtomicBool::new(false));
        match self.active_tasks.entry(request.id) {
            Entry::Occupied(_) => return Err(request), // ids key the cancel flags
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&cancelled));
            }
        }
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedRequest { request, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let queued = e.into_inner();
                self.active_tasks.remove(&queued.request.id);
                queued.request
            })
    }

    /// Cancel a pending or running request. No-op if it already finished.
    pub fn cancel(&self, id: u64) {
        if let Some((_, cancelled)) = self.active_tasks.remove(&id) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Drain all completed meshes without blocking.
    pub fn drain_results(&self) -> Vec<GeneratedTerrain> {
        let mut results = Vec::new();
        while let Ok(done) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&done.id);
            results.push(done);
        }
        results
    }

    /// Number of requests queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a request with this ID is pending.
    pub fn is_pending(&self, id: u64) -> bool {
        self.active_tasks.contains_key(&id)
    }
}
