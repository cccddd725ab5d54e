use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use std::sync::Arc;

use crate::align::{assign_speaker, display_label};
use crate::cache::ModelCache;
use crate::config::SchedulerConfig;
use crate::engine::{AudioClip, DiarizationMap, Engines, TranscriptSegment};
use crate::error::EngineError;
use crate::format::{self, TranscriptOutput};
use crate::job::{JobDescriptor, JobKey};
use crate::progress::ProgressStore;
use crate::stats::SchedulerStats;

/// One dequeued unit of work.
#[derive(Debug, Clone)]
pub(crate) struct QueuedJob {
	pub(crate) key: JobKey,
	pub(crate) descriptor: JobDescriptor,
}

/// The single consumer loop
///
/// Exactly one worker exists per scheduler. It runs in a dedicated
/// blocking task, processes jobs strictly in submission order, and
/// only touches async primitives to park on an empty queue. A failed
/// job is recorded and skipped; the loop never halts on job errors.
pub(crate) struct Worker {
	rx: mpsc::Receiver<QueuedJob>,
	engines: Engines,
	config: SchedulerConfig,
	progress: Arc<ProgressStore>,
	stats: Arc<SchedulerStats>,
	cache: ModelCache,
	cancel_token: CancellationToken,
}

impl Worker {
	pub(crate) fn new(
		rx: mpsc::Receiver<QueuedJob>,
		engines: Engines,
		config: SchedulerConfig,
		progress: Arc<ProgressStore>,
		stats: Arc<SchedulerStats>,
		cancel_token: CancellationToken,
	) -> Self {
		let cache = ModelCache::new(Arc::clone(&stats));
		Self {
			rx,
			engines,
			config,
			progress,
			stats,
			cache,
			cancel_token,
		}
	}

	/// Blocking loop body; runs inside `spawn_blocking`.
	pub(crate) fn run(mut self) {
		info!("Worker loop started, waiting for jobs");
		let handle = Handle::current();

		loop {
			// Check for shutdown before the next dequeue
			if self.cancel_token.is_cancelled() {
				info!("Worker shutting down (cancellation requested)");
				break;
			}

			// Drain eagerly; only a truly empty queue counts as idle.
			let job = match self.rx.try_recv() {
				Ok(job) => Some(job),
				Err(mpsc::error::TryRecvError::Empty) => {
					self.cache.evict_all();
					self.park(&handle)
				}
				Err(mpsc::error::TryRecvError::Disconnected) => None,
			};

			let Some(job) = job else {
				if self.cancel_token.is_cancelled() {
					info!("Worker shutting down (cancellation requested)");
				} else {
					info!("Worker shutting down (queue closed)");
				}
				break;
			};

			self.stats.decrement_queue_depth();
			self.stats.set_busy(true);
			self.process(job);
			self.stats.set_busy(false);
		}

		// Whatever the last job loaded is released with the worker.
		self.cache.evict_all();
		info!("Worker exiting");
	}

	/// Park on the channel until a job or shutdown arrives.
	fn park(&mut self, handle: &Handle) -> Option<QueuedJob> {
		handle.block_on(async {
			tokio::select! {
				() = self.cancel_token.cancelled() => None,
				job = self.rx.recv() => job,
			}
		})
	}

	fn process(&mut self, job: QueuedJob) {
		let QueuedJob { key, descriptor } = job;
		info!(key = %key, model = %descriptor.model, format = %descriptor.format, "Processing transcription job");

		// A resubmitted key may still hold the previous run's outcome.
		self.progress.begin(&key);

		match self.transcribe(&key, &descriptor) {
			Ok(output) => {
				self.progress.complete(&key, output);
				self.stats.increment_completed();
				info!(key = %key, "Transcription job completed");
			}
			Err(err) => {
				error!(key = %key, error = %err, "Transcription job failed");
				self.progress.fail(&key, err.to_string());
				self.stats.increment_failed();
			}
		}
	}

	/// Run one job through the pipeline: resolve model and audio, run
	/// inference, attach speaker labels, render.
	fn transcribe(&mut self, key: &JobKey, descriptor: &JobDescriptor) -> Result<TranscriptOutput, EngineError> {
		let recognizer = self.cache.resolve(&descriptor.model, self.config.device, self.engines.loader.as_ref())?;
		let clip = self.engines.resolver.resolve(&descriptor.audio)?;

		let mut on_progress = |fraction: f32| self.progress.update(key, fraction);
		let transcript = recognizer.transcribe(&clip, descriptor.language.as_code(), &self.config.decode, &mut on_progress)?;

		let diarization = if descriptor.diarize { self.diarize(&clip) } else { None };

		let mut segments = Vec::with_capacity(transcript.segments.len());
		for segment in transcript.segments {
			let text = format::clean_text(&segment.text);
			if format::is_spurious(&text) {
				continue;
			}

			let speaker = diarization.as_ref().and_then(|map| assign_speaker(segment.span, map)).map(display_label);
			segments.push(TranscriptSegment {
				span: segment.span,
				text,
				speaker,
			});
		}

		Ok(format::render(descriptor.format, &segments))
	}

	/// Speaker separation is best-effort: a missing or failing diarizer
	/// degrades the job to unlabeled output instead of failing it.
	fn diarize(&self, clip: &AudioClip) -> Option<DiarizationMap> {
		let diarizer = self.engines.diarizer.as_ref()?;
		match diarizer.diarize(clip) {
			Ok(map) => Some(map),
			Err(err) => {
				warn!(error = %err, "Diarization failed, continuing without speaker labels");
				None
			}
		}
	}
}
