use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::engine::{TimeMs, TranscriptSegment};
use crate::job::OutputFormat;

/// Numeric HTML entities the recognizer occasionally leaks into text.
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#\d+;").unwrap());

/// Segments made of nothing but punctuation, digits and whitespace
/// (ASCII and fullwidth alike) carry no speech content.
static NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^[，。、？‘’“”；：（｛｝【】）:;"'\s\d`!@#$%^&*()_+=.,?/\\-]*$"#).unwrap());

/// Subtitle-style timestamp, `HH:MM:SS,mmm`.
#[must_use]
pub fn format_timestamp(ms: TimeMs) -> String {
	let hours = ms / 3_600_000;
	let minutes = ms % 3_600_000 / 60_000;
	let seconds = ms % 60_000 / 1000;
	let millis = ms % 1000;
	format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Wall-clock style timestamp, `HH:MM:SS`.
#[must_use]
pub fn format_clock(ms: TimeMs) -> String {
	let hours = ms / 3_600_000;
	let minutes = ms % 3_600_000 / 60_000;
	let seconds = ms % 60_000 / 1000;
	format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Trim recognizer text and scrub leaked HTML entities.
///
/// `&#39;` is restored to an apostrophe; any other numeric entity is
/// dropped outright.
#[must_use]
pub fn clean_text(raw: &str) -> String {
	let text = raw.trim().replace("&#39;", "'");
	ENTITY.replace_all(&text, "").into_owned()
}

/// Whether a cleaned segment should be dropped before rendering.
#[must_use]
pub fn is_spurious(text: &str) -> bool {
	text.is_empty() || text.chars().count() <= 1 || NOISE.is_match(text)
}

/// One record of the structured output variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredLine {
	pub line: usize,
	pub start_time: String,
	pub end_time: String,
	pub text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub speaker: Option<String>,
}

/// A finished rendering, either record-shaped or flat text.
///
/// Serializes untagged: the structured variant becomes a JSON array,
/// everything else a plain string, matching what pollers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptOutput {
	Structured(Vec<StructuredLine>),
	Text(String),
}

impl TranscriptOutput {
	/// # Errors
	/// Fails only if serialization itself does, which the derived
	/// implementations here cannot.
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}

fn speaker_prefix(segment: &TranscriptSegment) -> String {
	segment.speaker.as_deref().map_or_else(String::new, |label| format!("Speaker {label}: "))
}

/// Render filtered, speaker-labeled segments into the selected variant.
///
/// Rendering is pure: the same segments and selector always produce
/// byte-identical output.
#[must_use]
pub fn render(format: OutputFormat, segments: &[TranscriptSegment]) -> TranscriptOutput {
	match format {
		OutputFormat::Structured => {
			let lines = segments
				.iter()
				.enumerate()
				.map(|(idx, segment)| StructuredLine {
					line: idx + 1,
					start_time: format_timestamp(segment.span.start),
					end_time: format_timestamp(segment.span.end),
					text: segment.text.clone(),
					speaker: segment.speaker.as_deref().map(|label| format!("Speaker {label}")),
				})
				.collect();
			TranscriptOutput::Structured(lines)
		}
		OutputFormat::Text => {
			let lines: Vec<String> = segments.iter().map(|segment| format!("{}{}", speaker_prefix(segment), segment.text)).collect();
			TranscriptOutput::Text(lines.join("\n"))
		}
		OutputFormat::Readable => {
			let blocks: Vec<String> = segments
				.iter()
				.map(|segment| {
					let start = format_clock(segment.span.start);
					let end = format_clock(segment.span.end);
					match segment.speaker.as_deref() {
						Some(label) => format!("Speaker {label}   {start} - {end}   {}", segment.text),
						None => format!("{start} - {end}\n{}", segment.text),
					}
				})
				.collect();
			TranscriptOutput::Text(blocks.join("\n"))
		}
		OutputFormat::Subtitle => {
			let blocks: Vec<String> = segments
				.iter()
				.enumerate()
				.map(|(idx, segment)| {
					format!(
						"{}\n{} --> {}\n{}{}\n",
						idx + 1,
						format_timestamp(segment.span.start),
						format_timestamp(segment.span.end),
						speaker_prefix(segment),
						segment.text
					)
				})
				.collect();
			TranscriptOutput::Text(blocks.join("\n"))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// ==== fixtures ====

	fn labeled(start: TimeMs, end: TimeMs, text: &str, speaker: Option<&str>) -> TranscriptSegment {
		let mut segment = TranscriptSegment::new(start, end, text);
		segment.speaker = speaker.map(ToString::to_string);
		segment
	}

	fn hello_world() -> Vec<TranscriptSegment> {
		vec![labeled(0, 1500, "hello", None), labeled(1500, 3000, "world", Some("A"))]
	}

	// ==== timestamps ====

	#[test]
	fn timestamps_render_zero_padded() {
		assert_eq!(format_timestamp(0), "00:00:00,000");
		assert_eq!(format_timestamp(1500), "00:00:01,500");
		assert_eq!(format_timestamp(3_723_456), "01:02:03,456");
		assert_eq!(format_clock(3_723_456), "01:02:03");
		assert_eq!(format_clock(59_999), "00:00:59");
	}

	// ==== text scrubbing ====

	#[test]
	fn clean_text_restores_apostrophes_and_drops_entities() {
		assert_eq!(clean_text("  it&#39;s fine&#160;  "), "it's fine");
		assert_eq!(clean_text("no entities"), "no entities");
		assert_eq!(clean_text("&#8230;"), "");
	}

	#[test]
	fn spurious_segments_are_detected() {
		assert!(is_spurious(""));
		assert!(is_spurious("a"));
		assert!(is_spurious("..."));
		assert!(is_spurious("12 34"));
		assert!(is_spurious("，。、"));
		assert!(is_spurious("- - -"));

		assert!(!is_spurious("hi"));
		assert!(!is_spurious("你好"));
		assert!(!is_spurious("well, ok"));
	}

	// ==== rendering ====

	#[test]
	fn subtitle_blocks_are_numbered_and_speaker_prefixed() {
		let output = render(OutputFormat::Subtitle, &hello_world());
		let expected = "1\n00:00:00,000 --> 00:00:01,500\nhello\n\n2\n00:00:01,500 --> 00:00:03,000\nSpeaker A: world\n";
		assert_eq!(output, TranscriptOutput::Text(expected.to_string()));
	}

	#[test]
	fn text_variant_joins_lines() {
		let output = render(OutputFormat::Text, &hello_world());
		assert_eq!(output, TranscriptOutput::Text("hello\nSpeaker A: world".to_string()));
	}

	#[test]
	fn readable_variant_switches_shape_on_speaker() {
		let output = render(OutputFormat::Readable, &hello_world());
		let expected = "00:00:00 - 00:00:01\nhello\nSpeaker A   00:00:01 - 00:00:03   world";
		assert_eq!(output, TranscriptOutput::Text(expected.to_string()));
	}

	#[test]
	fn structured_variant_serializes_to_records() {
		let output = render(OutputFormat::Structured, &hello_world());
		let json = output.to_json().unwrap();
		assert_eq!(
			json,
			"[{\"line\":1,\"start_time\":\"00:00:00,000\",\"end_time\":\"00:00:01,500\",\"text\":\"hello\"},\
			 {\"line\":2,\"start_time\":\"00:00:01,500\",\"end_time\":\"00:00:03,000\",\"text\":\"world\",\"speaker\":\"Speaker A\"}]"
		);
	}

	#[test]
	fn rendering_is_idempotent() {
		let segments = hello_world();
		for format in [OutputFormat::Structured, OutputFormat::Text, OutputFormat::Readable, OutputFormat::Subtitle] {
			assert_eq!(render(format, &segments), render(format, &segments));
		}
	}

	#[test]
	fn empty_input_renders_empty_output() {
		assert_eq!(render(OutputFormat::Subtitle, &[]), TranscriptOutput::Text(String::new()));
		assert_eq!(render(OutputFormat::Structured, &[]), TranscriptOutput::Structured(Vec::new()));
	}
}
