use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use stt_scheduler::{
	AudioClip, AudioResolver, DecodeOptions, Device, DiarizationMap, EngineError, Engines, JobDescriptor, JobStatus, LanguageHint, ModelLoader, OutputFormat,
	Scheduler, SchedulerConfig, SpeakerDiarizer, SpeakerTurn, SpeechRecognizer, Transcript, TranscriptSegment,
};

/// Toy recognizer that "hears" a fixed sentence in any clip.
struct DemoRecognizer;

impl SpeechRecognizer for DemoRecognizer {
	fn transcribe(&self, clip: &AudioClip, _language: Option<&str>, _options: &DecodeOptions, on_progress: &mut dyn FnMut(f32)) -> Result<Transcript, EngineError> {
		for step in [0.25, 0.5, 0.75, 1.0] {
			std::thread::sleep(Duration::from_millis(100));
			on_progress(step);
		}

		Ok(Transcript {
			segments: vec![
				TranscriptSegment::new(0, 1800, "Good morning everyone"),
				TranscriptSegment::new(1800, 3600, "let's get started"),
			],
			duration_ms: clip.duration_ms(),
		})
	}
}

struct DemoLoader;

impl ModelLoader for DemoLoader {
	fn load(&self, model: &str, device: Device) -> Result<Arc<dyn SpeechRecognizer>, EngineError> {
		println!("loading model {model} on {device}");
		Ok(Arc::new(DemoRecognizer))
	}
}

struct DemoResolver;

impl AudioResolver for DemoResolver {
	fn resolve(&self, source: &str) -> Result<AudioClip, EngineError> {
		println!("decoding {source}");
		Ok(AudioClip::new(vec![0.0; 57_600], 16_000))
	}
}

struct DemoDiarizer;

impl SpeakerDiarizer for DemoDiarizer {
	fn diarize(&self, _clip: &AudioClip) -> Result<DiarizationMap, EngineError> {
		Ok(DiarizationMap::new(vec![
			SpeakerTurn::new(0, 1800, "SPEAKER_00"),
			SpeakerTurn::new(1800, 3600, "SPEAKER_01"),
		]))
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

	let engines = Engines {
		loader: Arc::new(DemoLoader),
		resolver: Arc::new(DemoResolver),
		diarizer: Some(Arc::new(DemoDiarizer)),
	};

	let scheduler = Scheduler::new(SchedulerConfig::default(), engines)?;

	let descriptor = JobDescriptor::new("standup.wav", "small")
		.with_language(LanguageHint::code("en"))
		.with_format(OutputFormat::Subtitle)
		.with_diarization(true);

	let key = scheduler.submit(descriptor)?;
	println!("submitted job {key}");

	loop {
		match scheduler.poll(&key)? {
			JobStatus::InProgress { fraction } => {
				println!("progress: {:.0}%", fraction * 100.0);
				tokio::time::sleep(Duration::from_millis(100)).await;
			}
			JobStatus::Completed { output } => {
				println!("--- result ---\n{}", output.to_json()?);
				break;
			}
			JobStatus::Failed { error } => {
				println!("job failed: {error}");
				break;
			}
		}
	}

	println!("stats: {:?}", scheduler.stats());
	scheduler.shutdown().await;
	Ok(())
}
