use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared counters describing scheduler activity
#[derive(Debug)]
pub struct SchedulerStats {
	// Submission metrics
	pub jobs_enqueued: AtomicU64,
	pub jobs_rejected: AtomicU64,

	// Worker metrics
	pub jobs_completed: AtomicU64,
	pub jobs_failed: AtomicU64,

	// Model cache metrics
	pub models_loaded: AtomicU64,
	pub models_evicted: AtomicU64,
	pub cached_models: AtomicUsize,

	// Queue state
	pub queue_depth: AtomicUsize,

	// Worker state
	pub is_busy: AtomicBool,
}

impl Default for SchedulerStats {
	fn default() -> Self {
		Self {
			jobs_enqueued: AtomicU64::new(0),
			jobs_rejected: AtomicU64::new(0),
			jobs_completed: AtomicU64::new(0),
			jobs_failed: AtomicU64::new(0),
			models_loaded: AtomicU64::new(0),
			models_evicted: AtomicU64::new(0),
			cached_models: AtomicUsize::new(0),
			queue_depth: AtomicUsize::new(0),
			is_busy: AtomicBool::new(false),
		}
	}
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
	pub jobs_enqueued: u64,
	pub jobs_rejected: u64,
	pub jobs_completed: u64,
	pub jobs_failed: u64,
	pub models_loaded: u64,
	pub models_evicted: u64,
	pub cached_models: usize,
	pub queue_depth: usize,
	pub worker_busy: bool,
}

impl SchedulerStats {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	// Convenience methods
	pub fn set_busy(&self, value: bool) {
		self.is_busy.store(value, Ordering::Relaxed);
	}

	pub fn is_busy(&self) -> bool {
		self.is_busy.load(Ordering::Relaxed)
	}

	pub fn increment_enqueued(&self) {
		self.jobs_enqueued.fetch_add(1, Ordering::Relaxed);
	}

	pub fn increment_rejected(&self) {
		self.jobs_rejected.fetch_add(1, Ordering::Relaxed);
	}

	pub fn increment_completed(&self) {
		self.jobs_completed.fetch_add(1, Ordering::Relaxed);
	}

	pub fn increment_failed(&self) {
		self.jobs_failed.fetch_add(1, Ordering::Relaxed);
	}

	pub fn increment_queue_depth(&self) {
		self.queue_depth.fetch_add(1, Ordering::Relaxed);
	}

	pub fn decrement_queue_depth(&self) {
		self.queue_depth.fetch_sub(1, Ordering::Relaxed);
	}

	pub fn record_model_loaded(&self, cached: usize) {
		self.models_loaded.fetch_add(1, Ordering::Relaxed);
		self.cached_models.store(cached, Ordering::Relaxed);
	}

	pub fn record_eviction(&self, evicted: usize) {
		self.models_evicted.fetch_add(evicted as u64, Ordering::Relaxed);
		self.cached_models.store(0, Ordering::Relaxed);
	}

	pub fn snapshot(&self) -> StatsSnapshot {
		StatsSnapshot {
			jobs_enqueued: self.jobs_enqueued.load(Ordering::Relaxed),
			jobs_rejected: self.jobs_rejected.load(Ordering::Relaxed),
			jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
			jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
			models_loaded: self.models_loaded.load(Ordering::Relaxed),
			models_evicted: self.models_evicted.load(Ordering::Relaxed),
			cached_models: self.cached_models.load(Ordering::Relaxed),
			queue_depth: self.queue_depth.load(Ordering::Relaxed),
			worker_busy: self.is_busy.load(Ordering::Relaxed),
		}
	}
}
