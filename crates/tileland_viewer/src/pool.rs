//! # Chunk Generator Pool
//!
//! Worker threads that turn chunk requests into fully generated detached
//! chunks. Workers hold only the generator - never the world - so generation
//! runs in parallel with rendering and adoption.
//!
//! Duplicate requests are allowed; deduplication is the caller's business
//! via its pending set, and the adoption step drops redundant results.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tileland_world::{Chunk, ChunkCoord, TerrainGenerator};

/// Shared-nothing worker pool for chunk generation.
pub struct ChunkGeneratorPool {
    request_tx: Sender<ChunkCoord>,
    stop_tx: Option<Sender<()>>,
    finished: Arc<Mutex<Vec<Chunk>>>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkGeneratorPool {
    /// Starts the pool.
    ///
    /// `worker_count` defaults to hardware concurrency minus one, at least
    /// one worker.
    #[must_use]
    pub fn new(generator: Arc<dyn TerrainGenerator>, worker_count: Option<usize>) -> Self {
        let count = worker_count.unwrap_or_else(default_worker_count).max(1);
        let (request_tx, request_rx) = unbounded::<ChunkCoord>();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let finished = Arc::new(Mutex::new(Vec::new()));

        tracing::info!(workers = count, "starting chunk generator pool");

        let workers = (0..count)
            .map(|i| {
                let request_rx = request_rx.clone();
                let stop_rx = stop_rx.clone();
                let finished = Arc::clone(&finished);
                let generator = Arc::clone(&generator);
                std::thread::Builder::new()
                    .name(format!("chunk-gen-{i}"))
                    .spawn(move || worker_loop(&request_rx, &stop_rx, &finished, &generator))
                    .expect("spawning chunk generator worker")
            })
            .collect();

        Self {
            request_tx,
            stop_tx: Some(stop_tx),
            finished,
            workers,
        }
    }

    /// Enqueues a generation request. Non-blocking; requests sent after
    /// shutdown are silently dropped.
    pub fn request_chunk(&self, coord: ChunkCoord) {
        let _ = self.request_tx.send(coord);
    }

    /// Takes all completed chunks, leaving the finished list empty.
    #[must_use]
    pub fn drain_finished(&self) -> Vec<Chunk> {
        std::mem::take(&mut *self.finished.lock())
    }

    /// Current request queue depth.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.request_tx.len()
    }

    /// Stops the workers and joins them, abandoning queued requests.
    ///
    /// In-flight generations finish and land in the finished list.
    /// Idempotent: a second call is a no-op.
    pub fn stop(&mut self) {
        if self.stop_tx.take().is_none() {
            return;
        }
        // Dropping the stop sender wakes every worker's select.
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("chunk generator worker panicked during shutdown");
            }
        }
        tracing::info!("chunk generator pool stopped");
    }
}

impl Drop for ChunkGeneratorPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

fn worker_loop(
    request_rx: &Receiver<ChunkCoord>,
    stop_rx: &Receiver<()>,
    finished: &Mutex<Vec<Chunk>>,
    generator: &Arc<dyn TerrainGenerator>,
) {
    loop {
        crossbeam_channel::select! {
            recv(stop_rx) -> _ => break,
            recv(request_rx) -> msg => {
                let Ok(coord) = msg else { break };
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    let mut chunk = Chunk::new(coord);
                    generator.generate(&mut chunk);
                    chunk
                }));
                match result {
                    Ok(chunk) => finished.lock().push(chunk),
                    Err(_) => {
                        tracing::error!(
                            cx = coord.cx,
                            cy = coord.cy,
                            cz = coord.cz,
                            "generator panicked, skipping chunk"
                        );
                    }
                }
            }
        }
    }
}
