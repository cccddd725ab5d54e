use clap::{Args, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compute device the recognition models are loaded onto.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Device {
	#[default]
	Cpu,
	Cuda,
}

impl fmt::Display for Device {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Cpu => write!(f, "cpu"),
			Self::Cuda => write!(f, "cuda"),
		}
	}
}

/// Decoding parameters handed opaquely to the recognition engine.
#[derive(Args, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodeOptions {
	#[arg(long, env = "STT_BEAM_SIZE", default_value = "5", help = "Beam width used during decoding")]
	pub beam_size: usize,

	#[arg(long, env = "STT_BEST_OF", default_value = "5", help = "Number of candidates sampled per segment")]
	pub best_of: usize,

	#[arg(long, env = "STT_TEMPERATURE", default_value = "0.0", help = "Sampling temperature (0 disables sampling)")]
	pub temperature: f32,

	#[arg(long, env = "STT_VAD_FILTER", help = "Skip silent regions with voice activity detection")]
	pub vad_filter: bool,

	#[arg(long, env = "STT_CONDITION_ON_PREVIOUS_TEXT", help = "Feed the previous segment back in as decoding context")]
	pub condition_on_previous_text: bool,

	#[arg(long, env = "STT_INITIAL_PROMPT", help = "Prompt biasing the first decoded segment")]
	pub initial_prompt: Option<String>,
}

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct SchedulerConfig {
	#[arg(long, env = "STT_DEVICE", default_value = "cpu", help = "Device models are loaded onto")]
	pub device: Device,

	#[arg(long, env = "STT_QUEUE_CAPACITY", default_value = "64", help = "Maximum number of queued jobs before submissions are rejected")]
	pub queue_capacity: usize,

	#[command(flatten)]
	#[serde(flatten)]
	pub decode: DecodeOptions,
}

impl SchedulerConfig {
	pub fn new() -> Self {
		Self::parse()
	}

	pub fn default() -> Self {
		Self {
			device: Device::Cpu,
			queue_capacity: 64,
			decode: DecodeOptions {
				beam_size: 5,
				best_of: 5,
				temperature: 0.0,
				vad_filter: false,
				condition_on_previous_text: false,
				initial_prompt: None,
			},
		}
	}

	#[cfg(test)]
	pub fn test() -> Self {
		Self {
			queue_capacity: 4,
			..Self::default()
		}
	}

	/// Validate configuration values
	///
	/// # Errors
	/// Returns a human-readable message for the first invalid field.
	pub fn validate(&self) -> Result<(), String> {
		if self.queue_capacity == 0 {
			return Err("queue_capacity must be at least 1".to_string());
		}

		if self.decode.beam_size == 0 {
			return Err("beam_size must be at least 1".to_string());
		}

		if self.decode.best_of == 0 {
			return Err("best_of must be at least 1".to_string());
		}

		if !(0.0..=1.0).contains(&self.decode.temperature) {
			return Err("temperature must be within 0.0..=1.0".to_string());
		}

		Ok(())
	}
}
