//! Cancellable dual-codec compression pipeline.
//!
//! A [`runner::EncodeRunner`] encodes one decoded image with every registered
//! [`codec::CodecAdapter`] (JPEG and HEIC by default) on a background pool and
//! reports size and latency to a completion sink. Each submit starts a new
//! generation; results of older generations are never delivered.

pub mod codec;
pub mod config;
pub mod debounce;
pub mod error;
pub mod format;
pub mod job;
pub mod quality;
pub mod runner;
pub mod session;
pub mod source;

pub use codec::{CodecAdapter, HeicAdapter, JpegAdapter, default_adapters};
pub use config::RunnerConfig;
pub use error::{EncodeError, ErrorKind, QualityError, RunnerError};
pub use format::EncodeFormat;
pub use job::{Completion, EncodeOutput, GenerationId};
pub use quality::Quality;
pub use runner::{CompletionSink, EncodeRunner};
pub use session::CompressionSession;
pub use source::{PixelLayout, SourceImage};
