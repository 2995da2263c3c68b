use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::codec::CodecAdapter;
use crate::error::EncodeError;
use crate::format::EncodeFormat;
use crate::quality::Quality;
use crate::source::SourceImage;

/// Identifier of one batch of jobs submitted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationId(u64);

impl GenerationId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared generation counter plus cancellation watermark.
///
/// A job is live while its generation is both the latest one and above the
/// watermark. Advancing the counter is a single atomic step, so every job of
/// an older generation is invalidated before any job of the new one exists.
#[derive(Debug, Default)]
pub struct Generations {
    current: AtomicU64,
    cancelled_through: AtomicU64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self) -> GenerationId {
        GenerationId(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> GenerationId {
        GenerationId(self.current.load(Ordering::SeqCst))
    }

    /// Invalidate every generation issued so far without starting a new one.
    pub fn cancel_all(&self) {
        let current = self.current.load(Ordering::SeqCst);
        self.cancelled_through.fetch_max(current, Ordering::SeqCst);
    }

    pub fn is_current(&self, generation: GenerationId) -> bool {
        generation.0 == self.current.load(Ordering::SeqCst)
            && generation.0 > self.cancelled_through.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutput {
    pub bytes: Vec<u8>,
    /// Time since the job was submitted, queue wait included
    pub elapsed: Duration,
    /// Time spent inside the codec adapter
    pub encode_time: Duration,
}

/// Result of one job, handed to the completion sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub generation: GenerationId,
    pub format: EncodeFormat,
    pub quality: Quality,
    pub result: Result<EncodeOutput, EncodeError>,
}

impl Completion {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    /// Superseded before the encode started; the adapter never ran.
    Skipped,
    /// Superseded while encoding; the result was thrown away.
    Stale,
    Finished(Completion),
}

pub struct EncodeJob {
    pub format: EncodeFormat,
    pub image: Arc<SourceImage>,
    pub quality: Quality,
    pub submitted_at: Instant,
    pub generation: GenerationId,
    adapter: Arc<dyn CodecAdapter>,
    generations: Arc<Generations>,
}

impl EncodeJob {
    pub fn new(
        adapter: Arc<dyn CodecAdapter>,
        image: Arc<SourceImage>,
        quality: Quality,
        generation: GenerationId,
        submitted_at: Instant,
        generations: Arc<Generations>,
    ) -> Self {
        Self {
            format: adapter.format(),
            image,
            quality,
            submitted_at,
            generation,
            adapter,
            generations,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        !self.generations.is_current(self.generation)
    }

    pub fn run(self) -> JobOutcome {
        if self.is_cancelled() {
            log::debug!(
                "skipping {} job of generation {} (superseded before start)",
                self.format,
                self.generation
            );
            return JobOutcome::Skipped;
        }

        let started = Instant::now();
        let result = self.adapter.encode(&self.image, self.quality);
        let encode_time = started.elapsed();
        let elapsed = self.submitted_at.elapsed();

        if self.is_cancelled() {
            log::debug!(
                "dropping {} result of generation {} (superseded during encode)",
                self.format,
                self.generation
            );
            return JobOutcome::Stale;
        }

        let result = match result {
            Ok(bytes) if bytes.is_empty() => Err(EncodeError::EncodeFailed(format!(
                "{} encoder produced no data",
                self.format
            ))),
            Ok(bytes) => {
                log::trace!(
                    "{} generation {}: {} bytes, encode {:?}, total {:?}",
                    self.format,
                    self.generation,
                    bytes.len(),
                    encode_time,
                    elapsed
                );
                Ok(EncodeOutput {
                    bytes,
                    elapsed,
                    encode_time,
                })
            }
            Err(e) => Err(e),
        };

        if let Err(ref e) = result {
            log::warn!(
                "{} encode failed for generation {}: {}",
                self.format,
                self.generation,
                e
            );
        }

        JobOutcome::Finished(Completion {
            generation: self.generation,
            format: self.format,
            quality: self.quality,
            result,
        })
    }
}
