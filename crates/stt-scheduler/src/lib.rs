//! Transcription job scheduling for speech-to-text services.
//!
//! One [`Scheduler`] owns a bounded FIFO job queue, a single blocking
//! worker, an idle-evicting model cache and a progress/result store.
//! Recognition, audio decoding and speaker diarization are injected
//! through the trait seams in [`engine`].

pub mod align;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod job;
pub mod progress;
pub mod scheduler;
pub mod stats;

mod cache;
mod worker;

pub use config::{DecodeOptions, Device, SchedulerConfig};
pub use engine::{AudioClip, AudioResolver, DiarizationMap, Engines, Interval, ModelLoader, SpeakerDiarizer, SpeakerTurn, SpeechRecognizer, TimeMs, Transcript, TranscriptSegment};
pub use error::{EngineError, Result, SchedulerError};
pub use format::{StructuredLine, TranscriptOutput};
pub use job::{JobDescriptor, JobKey, LanguageHint, OutputFormat};
pub use progress::JobStatus;
pub use scheduler::Scheduler;
pub use stats::StatsSnapshot;
