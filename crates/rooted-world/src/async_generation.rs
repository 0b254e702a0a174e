//! Background chunk classification on a worker pool.
//!
//! Tile classification is a pure function of the chunk index and the
//! classifier, so it can run on any thread. Everything that depends on
//! global state (rocks, air regions, water) stays on the owning thread and
//! happens in [`WorldGenerator::integrate`](crate::WorldGenerator::integrate).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use glam::IVec2;

use crate::chunk::Chunk;
use crate::error::WorldError;
use crate::terrain::TerrainClassifier;

/// A request to classify one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifyTask {
    /// Chunk index to classify.
    pub index: IVec2,
    /// Squared chunk distance to the focus. Workers drain tasks in submission
    /// order, so callers submit lower values first.
    pub priority: u64,
}

/// A classified chunk ready for integration.
#[derive(Debug)]
pub struct GeneratedChunk {
    /// Index of the submitted task.
    pub index: IVec2,
    /// Classified tiles.
    pub chunk: Chunk,
    /// Classification time in microseconds.
    pub generation_time_us: u64,
}

struct PendingTask {
    task: ClassifyTask,
    cancelled: Arc<AtomicBool>,
}

/// Classifies chunks on background threads and hands results back over a
/// bounded channel.
pub struct AsyncChunkGenerator {
    task_sender: Sender<PendingTask>,
    result_receiver: Receiver<GeneratedChunk>,
    active_tasks: Arc<DashMap<IVec2, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl AsyncChunkGenerator {
    /// Starts `thread_count` workers sharing `classifier`.
    ///
    /// At most `max_concurrent * 2` tasks can wait in the queue; at most
    /// `result_capacity` finished chunks are buffered before workers block.
    pub fn new(
        classifier: Arc<TerrainClassifier>,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> Result<Self, WorldError> {
        let (task_sender, task_receiver) = bounded::<PendingTask>(max_concurrent.max(1) * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for worker in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let classifier = Arc::clone(&classifier);

            std::thread::Builder::new()
                .name(format!("chunk-worker-{worker}"))
                .spawn(move || {
                    while let Ok(pending) = receiver.recv() {
                        if pending.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let chunk = classifier.classify_chunk(pending.task.index);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !pending.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedChunk {
                                index: pending.task.index,
                                chunk,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .map_err(WorldError::WorkerSpawn)?;
        }

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Starts a generator sized to the machine, leaving two cores free.
    pub fn with_defaults(classifier: Arc<TerrainClassifier>) -> Result<Self, WorldError> {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(classifier, threads, 64, 128)
    }

    /// Queues a chunk for classification.
    ///
    /// Returns `Err(task)` if the queue is full.
    pub fn submit(&self, task: ClassifyTask) -> Result<(), ClassifyTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(task.index, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(PendingTask { task, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let task = e.into_inner().task;
                self.active_tasks.remove(&task.index);
                task
            })
    }

    /// Cancels a pending or running task. No-op if it already finished.
    pub fn cancel(&self, index: &IVec2) {
        if let Some((_, cancelled)) = self.active_tasks.remove(index) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Drains every finished chunk. Call once per tick on the owning thread.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(generated) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&generated.index);
            results.push(generated);
        }
        results
    }

    /// Tasks queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a task for `index` is pending.
    pub fn is_pending(&self, index: &IVec2) -> bool {
        self.active_tasks.contains_key(index)
    }
}
