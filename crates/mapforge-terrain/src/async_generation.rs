//! Background generation on a worker thread.
//!
//! Generation itself is synchronous and has no suspension points. Callers that
//! need to stay responsive hand the whole run to a worker and take ownership
//! of the finished world once it arrives over a bounded channel.

use std::any::Any;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use image::RgbaImage;
use tracing::warn;

use crate::config::TerrainConfig;
use crate::error::TerrainError;
use crate::generator::{GeneratedWorld, TerrainGenerator};
use crate::seed::WorldSeed;

type GenerationResult = Result<GeneratedWorld, TerrainError>;

/// Handle to a single in-flight generation.
///
/// Dropping the handle blocks until the worker has finished.
pub struct BackgroundGeneration {
    result_receiver: Receiver<GenerationResult>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl BackgroundGeneration {
    /// Validate `config` on the calling thread, then start generating on a
    /// worker thread.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned immediately, as is a failure to
    /// spawn the worker.
    pub fn spawn(
        config: TerrainConfig,
        seed: WorldSeed,
        grid_size: u32,
        feature_sprite: Option<RgbaImage>,
    ) -> Result<Self, TerrainError> {
        let mut generator = TerrainGenerator::new(config)?;
        Self::spawn_job(move || generator.generate(seed, grid_size, feature_sprite.as_ref()))
    }

    fn spawn_job<F>(job: F) -> Result<Self, TerrainError>
    where
        F: FnOnce() -> GenerationResult + Send + 'static,
    {
        let (result_sender, result_receiver) = bounded(1);

        let worker = std::thread::Builder::new()
            .name("terrain-gen-worker".into())
            .spawn(move || {
                // The receiver may already be gone; nobody wants the world then.
                let _ = result_sender.send(job());
            })
            .map_err(TerrainError::WorkerSpawn)?;

        Ok(Self {
            result_receiver,
            worker: Some(worker),
        })
    }

    /// Take the world if it is ready.
    ///
    /// Returns `None` while the worker is still running.
    pub fn try_take(&mut self) -> Option<GenerationResult> {
        match self.result_receiver.try_recv() {
            Ok(result) => {
                self.join_worker();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.lost_worker())),
        }
    }

    /// Block until the world is ready.
    pub fn wait(mut self) -> GenerationResult {
        match self.result_receiver.recv() {
            Ok(result) => {
                self.join_worker();
                result
            }
            Err(_) => Err(self.lost_worker()),
        }
    }

    /// Join the worker, returning its panic message if it panicked.
    fn join_worker(&mut self) -> Option<String> {
        let worker = self.worker.take()?;
        worker.join().err().map(|payload| panic_message(payload.as_ref()))
    }

    fn lost_worker(&mut self) -> TerrainError {
        let cause = self
            .join_worker()
            .unwrap_or_else(|| "worker dropped its result channel".to_string());
        warn!(cause = %cause, "terrain generation worker lost");
        TerrainError::WorkerLost(cause)
    }
}

impl Drop for BackgroundGeneration {
    fn drop(&mut self) {
        if let Some(message) = self.join_worker() {
            warn!(cause = %message, "terrain generation worker panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
