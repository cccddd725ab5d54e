use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::SchedulerConfig;
use crate::engine::Engines;
use crate::error::{Result, SchedulerError};
use crate::job::{JobDescriptor, JobKey};
use crate::progress::{JobStatus, ProgressStore};
use crate::stats::{SchedulerStats, StatsSnapshot};
use crate::worker::{QueuedJob, Worker};

/// The scheduler façade
///
/// Owns the bounded job queue, the progress store and the single
/// worker task. Submitting never waits for execution; polling never
/// blocks on the worker.
#[derive(Debug)]
pub struct Scheduler {
	queue_tx: mpsc::Sender<QueuedJob>,
	progress: Arc<ProgressStore>,
	stats: Arc<SchedulerStats>,
	capacity: usize,
	cancel_token: CancellationToken,
	worker_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Scheduler {
	/// Create a scheduler over the given engine collaborators and spawn
	/// its worker.
	///
	/// Must be called inside a tokio runtime; the worker occupies one
	/// blocking thread for the scheduler's lifetime.
	///
	/// # Errors
	/// `InvalidConfig` when the configuration fails validation.
	pub fn new(config: SchedulerConfig, engines: Engines) -> Result<Self> {
		config.validate().map_err(SchedulerError::InvalidConfig)?;

		let capacity = config.queue_capacity;
		let (queue_tx, queue_rx) = mpsc::channel(capacity);
		let progress = Arc::new(ProgressStore::new());
		let stats = SchedulerStats::new();
		let cancel_token = CancellationToken::new();

		let worker = Worker::new(queue_rx, engines, config, Arc::clone(&progress), Arc::clone(&stats), cancel_token.clone());
		let worker_handle = tokio::task::spawn_blocking(move || worker.run());

		info!(capacity, "Scheduler started");

		Ok(Self {
			queue_tx,
			progress,
			stats,
			capacity,
			cancel_token,
			worker_handle: Arc::new(Mutex::new(Some(worker_handle))),
		})
	}

	/// Validate, register progress and enqueue. Returns the derived key
	/// without waiting for execution.
	///
	/// # Errors
	/// `InvalidDescriptor` for blank required fields, `QueueFull` when
	/// the bounded queue is at capacity, `Stopped` after shutdown.
	pub fn submit(&self, descriptor: JobDescriptor) -> Result<JobKey> {
		if self.cancel_token.is_cancelled() {
			self.stats.increment_rejected();
			return Err(SchedulerError::Stopped);
		}

		if let Err(err) = descriptor.validate() {
			self.stats.increment_rejected();
			return Err(err);
		}

		let key = descriptor.key();

		let permit = match self.queue_tx.try_reserve() {
			Ok(permit) => permit,
			Err(mpsc::error::TrySendError::Full(())) => {
				self.stats.increment_rejected();
				return Err(SchedulerError::QueueFull(self.capacity));
			}
			Err(mpsc::error::TrySendError::Closed(())) => {
				self.stats.increment_rejected();
				return Err(SchedulerError::Stopped);
			}
		};

		// Register the entry and bump the gauges before handing the job
		// over: the reserved permit cannot fail, and the worker may
		// dequeue (and decrement the depth) the instant the job lands.
		self.progress.begin(&key);
		self.stats.increment_enqueued();
		self.stats.increment_queue_depth();
		permit.send(QueuedJob {
			key: key.clone(),
			descriptor,
		});

		info!(key = %key, "Job enqueued");
		Ok(key)
	}

	/// Snapshot the state of a submitted job.
	///
	/// # Errors
	/// `UnknownKey` when the key was never submitted.
	pub fn poll(&self, key: &JobKey) -> Result<JobStatus> {
		self.progress.status(key).ok_or_else(|| SchedulerError::UnknownKey(key.to_string()))
	}

	/// Current counter snapshot.
	#[must_use]
	pub fn stats(&self) -> StatsSnapshot {
		self.stats.snapshot()
	}

	/// Stop accepting submissions and join the worker.
	///
	/// A job already running finishes first. Jobs still queued behind
	/// it are abandoned; their progress entries stay in-flight.
	pub async fn shutdown(&self) {
		info!("Scheduler shutting down");
		self.cancel_token.cancel();
		if let Some(handle) = self.worker_handle.lock().await.take() {
			let _ = handle.await;
		}
	}
}
