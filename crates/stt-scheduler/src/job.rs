use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SchedulerError};

/// Source language of the audio, or automatic detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LanguageHint {
	#[default]
	Auto,
	Code(String),
}

impl LanguageHint {
	/// Blank and `"auto"` collapse to automatic detection.
	pub fn code(code: impl Into<String>) -> Self {
		let code = code.into();
		let trimmed = code.trim();
		if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
			Self::Auto
		} else {
			Self::Code(trimmed.to_string())
		}
	}

	#[must_use]
	pub fn as_code(&self) -> Option<&str> {
		match self {
			Self::Auto => None,
			Self::Code(code) => Some(code),
		}
	}
}

impl From<String> for LanguageHint {
	fn from(code: String) -> Self {
		Self::code(code)
	}
}

impl From<&str> for LanguageHint {
	fn from(code: &str) -> Self {
		Self::code(code)
	}
}

impl From<LanguageHint> for String {
	fn from(hint: LanguageHint) -> Self {
		hint.to_string()
	}
}

impl fmt::Display for LanguageHint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Auto => write!(f, "auto"),
			Self::Code(code) => write!(f, "{code}"),
		}
	}
}

/// Rendering selected for the finished transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	Structured,
	Text,
	Readable,
	Subtitle,
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Structured => write!(f, "structured"),
			Self::Text => write!(f, "text"),
			Self::Readable => write!(f, "readable"),
			Self::Subtitle => write!(f, "subtitle"),
		}
	}
}

/// Deterministic identity of a submission.
///
/// Derived from the full parameter tuple: resubmitting identical
/// parameters yields the same key, so pollers can re-attach to a job
/// already in flight. The flip side is deliberate: a second run with
/// the same parameters overwrites the first run's stored outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobKey(String);

impl JobKey {
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for JobKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// One transcription request, immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
	/// Handle to the stored audio (path or object key), resolved by the
	/// audio collaborator.
	pub audio: String,
	/// Recognition model identifier.
	pub model: String,
	pub language: LanguageHint,
	pub format: OutputFormat,
	/// Whether to run speaker separation and label segments.
	pub diarize: bool,
}

impl JobDescriptor {
	pub fn new(audio: impl Into<String>, model: impl Into<String>) -> Self {
		Self {
			audio: audio.into(),
			model: model.into(),
			language: LanguageHint::Auto,
			format: OutputFormat::Structured,
			diarize: false,
		}
	}

	#[must_use]
	pub fn with_language(mut self, language: LanguageHint) -> Self {
		self.language = language;
		self
	}

	#[must_use]
	pub fn with_format(mut self, format: OutputFormat) -> Self {
		self.format = format;
		self
	}

	#[must_use]
	pub fn with_diarization(mut self, diarize: bool) -> Self {
		self.diarize = diarize;
		self
	}

	/// # Errors
	/// Rejects descriptors with a blank audio handle or model identifier.
	pub fn validate(&self) -> Result<()> {
		if self.audio.trim().is_empty() {
			return Err(SchedulerError::InvalidDescriptor("audio source is empty".to_string()));
		}
		if self.model.trim().is_empty() {
			return Err(SchedulerError::InvalidDescriptor("model identifier is empty".to_string()));
		}
		Ok(())
	}

	/// Derive the progress-store key for this descriptor.
	#[must_use]
	pub fn key(&self) -> JobKey {
		JobKey(format!("{}|{}|{}|{}|{}", self.audio, self.model, self.language, self.format, self.diarize))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identical_parameters_share_a_key() {
		let a = JobDescriptor::new("meeting.wav", "small").with_language(LanguageHint::code("en"));
		let b = JobDescriptor::new("meeting.wav", "small").with_language(LanguageHint::code("en"));
		assert_eq!(a.key(), b.key());
	}

	#[test]
	fn every_field_participates_in_the_key() {
		let base = JobDescriptor::new("meeting.wav", "small");
		let key = base.key();

		assert_ne!(JobDescriptor::new("other.wav", "small").key(), key);
		assert_ne!(JobDescriptor::new("meeting.wav", "large").key(), key);
		assert_ne!(base.clone().with_language(LanguageHint::code("en")).key(), key);
		assert_ne!(base.clone().with_format(OutputFormat::Subtitle).key(), key);
		assert_ne!(base.clone().with_diarization(true).key(), key);
	}

	#[test]
	fn validate_rejects_blank_fields() {
		assert!(JobDescriptor::new("", "small").validate().is_err());
		assert!(JobDescriptor::new("  ", "small").validate().is_err());
		assert!(JobDescriptor::new("meeting.wav", "").validate().is_err());
		assert!(JobDescriptor::new("meeting.wav", "small").validate().is_ok());
	}

	#[test]
	fn language_hint_normalizes_auto() {
		assert_eq!(LanguageHint::code("auto"), LanguageHint::Auto);
		assert_eq!(LanguageHint::code("AUTO"), LanguageHint::Auto);
		assert_eq!(LanguageHint::code("  "), LanguageHint::Auto);
		assert_eq!(LanguageHint::code("zh"), LanguageHint::Code("zh".to_string()));
		assert_eq!(LanguageHint::code("zh").as_code(), Some("zh"));
		assert_eq!(LanguageHint::Auto.as_code(), None);
	}

	#[test]
	fn language_hint_serde_uses_plain_strings() {
		let auto: LanguageHint = serde_json::from_str("\"auto\"").unwrap();
		assert_eq!(auto, LanguageHint::Auto);

		let en: LanguageHint = serde_json::from_str("\"en\"").unwrap();
		assert_eq!(en, LanguageHint::Code("en".to_string()));

		assert_eq!(serde_json::to_string(&LanguageHint::Auto).unwrap(), "\"auto\"");
		assert_eq!(serde_json::to_string(&en).unwrap(), "\"en\"");
	}

	#[test]
	fn output_format_serde_is_lowercase() {
		assert_eq!(serde_json::to_string(&OutputFormat::Subtitle).unwrap(), "\"subtitle\"");
		let format: OutputFormat = serde_json::from_str("\"readable\"").unwrap();
		assert_eq!(format, OutputFormat::Readable);
	}
}
