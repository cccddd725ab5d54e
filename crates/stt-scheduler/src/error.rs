use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors surfaced synchronously to submitters and pollers.
#[derive(Debug, Error)]
pub enum SchedulerError {
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("Invalid job descriptor: {0}")]
	InvalidDescriptor(String),

	#[error("Job queue is full (capacity {0})")]
	QueueFull(usize),

	#[error("Unknown job key: {0}")]
	UnknownKey(String),

	#[error("Scheduler is stopped")]
	Stopped,
}

impl SchedulerError {
	/// Whether retrying the same call later can succeed.
	#[must_use]
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::QueueFull(_))
	}
}

/// Errors raised by the engine collaborators while a job runs.
///
/// These never cross the submit/poll boundary directly; the worker
/// records them as the failed job's terminal error string.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Model load failed: {0}")]
	ModelLoad(String),

	#[error("Audio source unavailable: {0}")]
	AudioSource(String),

	#[error("Inference failed: {0}")]
	Inference(String),
}
