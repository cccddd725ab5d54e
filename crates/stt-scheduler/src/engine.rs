use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{DecodeOptions, Device};
use crate::error::EngineError;

/// Integer milliseconds from the start of the audio clip.
///
/// All segment arithmetic stays in integer space so overlap comparisons
/// cannot drift the way floating-point seconds do.
pub type TimeMs = u64;

/// Half-open time range `[start, end)` in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
	pub start: TimeMs,
	pub end: TimeMs,
}

impl Interval {
	#[must_use]
	pub const fn new(start: TimeMs, end: TimeMs) -> Self {
		Self { start, end }
	}

	#[must_use]
	pub const fn duration(&self) -> TimeMs {
		self.end.saturating_sub(self.start)
	}

	/// Length of the intersection with `other`, zero when disjoint.
	#[must_use]
	pub const fn overlap(&self, other: &Self) -> TimeMs {
		let lo = if self.start > other.start { self.start } else { other.start };
		let hi = if self.end < other.end { self.end } else { other.end };
		hi.saturating_sub(lo)
	}
}

/// One unit of recognized text
///
/// Produced by the recognition engine in increasing start order; the
/// speaker tag is absent until alignment fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
	pub span: Interval,
	pub text: String,
	pub speaker: Option<String>,
}

impl TranscriptSegment {
	pub fn new(start: TimeMs, end: TimeMs, text: impl Into<String>) -> Self {
		Self {
			span: Interval::new(start, end),
			text: text.into(),
			speaker: None,
		}
	}
}

/// Full recognition output for one clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
	pub segments: Vec<TranscriptSegment>,
	pub duration_ms: TimeMs,
}

/// One speaker-attributed interval from the diarization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerTurn {
	pub span: Interval,
	pub speaker: String,
}

impl SpeakerTurn {
	pub fn new(start: TimeMs, end: TimeMs, speaker: impl Into<String>) -> Self {
		Self {
			span: Interval::new(start, end),
			speaker: speaker.into(),
		}
	}
}

/// Disjoint speaker turns covering one clip, scoped to a single job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiarizationMap {
	pub turns: Vec<SpeakerTurn>,
}

impl DiarizationMap {
	#[must_use]
	pub fn new(turns: Vec<SpeakerTurn>) -> Self {
		Self { turns }
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.turns.is_empty()
	}
}

/// Decoded audio ready for inference: mono PCM at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
	pub samples: Vec<f32>,
	pub sample_rate: u32,
}

impl AudioClip {
	#[must_use]
	pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
		Self { samples, sample_rate }
	}

	#[must_use]
	pub fn duration_ms(&self) -> TimeMs {
		if self.sample_rate == 0 {
			return 0;
		}
		(self.samples.len() as u64).saturating_mul(1000) / u64::from(self.sample_rate)
	}
}

/// Resolves a stored audio handle into a decoded clip.
///
/// Implementations are expected to hand back mono PCM at the sample
/// rate the recognition models were trained on, typically 16 kHz.
pub trait AudioResolver: Send + Sync {
	/// # Errors
	/// Fails when the handle does not exist or cannot be decoded.
	fn resolve(&self, source: &str) -> Result<AudioClip, EngineError>;
}

/// A loaded recognition model.
///
/// Implementations report progress through `on_progress` as the fraction
/// of the clip processed so far, in `[0.0, 1.0]`.
pub trait SpeechRecognizer: Send + Sync {
	/// # Errors
	/// Fails when inference aborts mid-clip.
	fn transcribe(&self, clip: &AudioClip, language: Option<&str>, options: &DecodeOptions, on_progress: &mut dyn FnMut(f32)) -> Result<Transcript, EngineError>;
}

impl std::fmt::Debug for dyn SpeechRecognizer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("dyn SpeechRecognizer")
	}
}

/// Materializes recognition models on demand.
pub trait ModelLoader: Send + Sync {
	/// # Errors
	/// Fails when the identifier is unknown or the weights cannot be fetched.
	fn load(&self, model: &str, device: Device) -> Result<Arc<dyn SpeechRecognizer>, EngineError>;
}

/// Splits a clip into speaker-attributed turns.
pub trait SpeakerDiarizer: Send + Sync {
	/// # Errors
	/// Fails when the separation model cannot process the clip.
	fn diarize(&self, clip: &AudioClip) -> Result<DiarizationMap, EngineError>;
}

/// The collaborator bundle a scheduler is constructed over.
///
/// The diarizer is optional; jobs requesting speaker labels degrade to
/// unlabeled output when none is installed.
#[derive(Clone)]
pub struct Engines {
	pub loader: Arc<dyn ModelLoader>,
	pub resolver: Arc<dyn AudioResolver>,
	pub diarizer: Option<Arc<dyn SpeakerDiarizer>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn interval_duration_and_overlap() {
		let a = Interval::new(1000, 3000);
		assert_eq!(a.duration(), 2000);

		assert_eq!(a.overlap(&Interval::new(0, 2000)), 1000);
		assert_eq!(a.overlap(&Interval::new(2000, 4000)), 1000);
		assert_eq!(a.overlap(&Interval::new(0, 500)), 0);
		assert_eq!(a.overlap(&Interval::new(3000, 4000)), 0);
		assert_eq!(a.overlap(&a), 2000);
	}

	#[test]
	fn clip_duration_is_integer_ms() {
		let clip = AudioClip::new(vec![0.0; 16_000], 16_000);
		assert_eq!(clip.duration_ms(), 1000);

		let clip = AudioClip::new(vec![0.0; 8_000], 16_000);
		assert_eq!(clip.duration_ms(), 500);

		let clip = AudioClip::new(Vec::new(), 0);
		assert_eq!(clip.duration_ms(), 0);
	}
}
