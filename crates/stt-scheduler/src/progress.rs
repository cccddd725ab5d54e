use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::format::TranscriptOutput;
use crate::job::JobKey;

/// In-flight updates never reach 1.0; the full fraction is written only
/// together with an outcome, so `fraction == 1.0` always means terminal.
const INFLIGHT_CAP: f32 = 0.99;

#[derive(Debug, Clone)]
enum Outcome {
	Completed(TranscriptOutput),
	Failed(String),
}

#[derive(Debug, Clone)]
struct Entry {
	fraction: f32,
	outcome: Option<Outcome>,
}

/// Snapshot of one job as seen by pollers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
	InProgress { fraction: f32 },
	Completed { output: TranscriptOutput },
	Failed { error: String },
}

impl JobStatus {
	#[must_use]
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::InProgress { .. })
	}

	#[must_use]
	pub fn fraction(&self) -> f32 {
		match self {
			Self::InProgress { fraction } => *fraction,
			Self::Completed { .. } | Self::Failed { .. } => 1.0,
		}
	}
}

/// Shared progress/result map, keyed by [`JobKey`].
///
/// Producers register entries, the worker mutates them, pollers read
/// snapshots. Entries are never purged; identical resubmissions reuse
/// their key and overwrite the stored outcome.
#[derive(Debug, Default)]
pub struct ProgressStore {
	entries: Mutex<HashMap<JobKey, Entry>>,
}

impl ProgressStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `key`, or reset it to the start of a fresh run.
	pub fn begin(&self, key: &JobKey) {
		let mut entries = self.entries.lock().unwrap();
		entries.insert(key.clone(), Entry { fraction: 0.0, outcome: None });
	}

	/// Record in-flight progress. Non-monotonic and out-of-range values
	/// are ignored, as are updates against terminal or unknown entries.
	pub fn update(&self, key: &JobKey, fraction: f32) {
		let clamped = fraction.clamp(0.0, INFLIGHT_CAP);
		let mut entries = self.entries.lock().unwrap();
		if let Some(entry) = entries.get_mut(key) {
			if entry.outcome.is_none() && clamped > entry.fraction {
				entry.fraction = clamped;
			}
		}
	}

	/// Terminal success: fraction 1.0 and the rendered output, one write.
	pub fn complete(&self, key: &JobKey, output: TranscriptOutput) {
		let mut entries = self.entries.lock().unwrap();
		entries.insert(key.clone(), Entry { fraction: 1.0, outcome: Some(Outcome::Completed(output)) });
	}

	/// Terminal failure: fraction 1.0 and the cause, one write.
	pub fn fail(&self, key: &JobKey, error: impl Into<String>) {
		let mut entries = self.entries.lock().unwrap();
		entries.insert(key.clone(), Entry { fraction: 1.0, outcome: Some(Outcome::Failed(error.into())) });
	}

	/// `None` when the key was never registered.
	#[must_use]
	pub fn status(&self, key: &JobKey) -> Option<JobStatus> {
		let entries = self.entries.lock().unwrap();
		entries.get(key).map(|entry| match &entry.outcome {
			None => JobStatus::InProgress { fraction: entry.fraction },
			Some(Outcome::Completed(output)) => JobStatus::Completed { output: output.clone() },
			Some(Outcome::Failed(error)) => JobStatus::Failed { error: error.clone() },
		})
	}
}
