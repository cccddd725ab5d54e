use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::config::Device;
use crate::engine::{ModelLoader, SpeechRecognizer};
use crate::error::EngineError;
use crate::stats::SchedulerStats;

/// Worker-private cache of loaded recognition models.
///
/// At most one instance exists per (model, device) key. Distinct models
/// accumulate while the queue is busy; the worker clears the whole
/// cache once the queue drains, trading reload latency on the next job
/// for bounded idle memory. Only the worker touches this, so there is
/// no locking; other threads observe cache activity through the stats
/// counters.
pub(crate) struct ModelCache {
	models: HashMap<(String, Device), Arc<dyn SpeechRecognizer>>,
	stats: Arc<SchedulerStats>,
}

impl ModelCache {
	pub(crate) fn new(stats: Arc<SchedulerStats>) -> Self {
		Self { models: HashMap::new(), stats }
	}

	/// Return the cached instance for (model, device), loading on miss.
	pub(crate) fn resolve(&mut self, model: &str, device: Device, loader: &dyn ModelLoader) -> Result<Arc<dyn SpeechRecognizer>, EngineError> {
		let key = (model.to_string(), device);
		if let Some(recognizer) = self.models.get(&key) {
			return Ok(Arc::clone(recognizer));
		}

		info!(model, device = %device, "Loading recognition model");
		let recognizer = loader.load(model, device)?;
		self.models.insert(key, Arc::clone(&recognizer));
		self.stats.record_model_loaded(self.models.len());
		Ok(recognizer)
	}

	/// Drop every cached model. Runs when the worker goes idle.
	pub(crate) fn evict_all(&mut self) {
		if self.models.is_empty() {
			return;
		}

		let evicted = self.models.len();
		self.models.clear();
		self.stats.record_eviction(evicted);
		info!(evicted, "Evicted idle recognition models");
	}
}
