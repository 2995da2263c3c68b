use std::sync::Arc;

use crate::codec::default_adapters;
use crate::config::RunnerConfig;
use crate::debounce::QualityDebouncer;
use crate::error::RunnerError;
use crate::job::{Completion, GenerationId};
use crate::quality::Quality;
use crate::runner::{CompletionSink, EncodeRunner};
use crate::source::SourceImage;

/// Host-facing trigger surface: one image, one quality control, one runner.
///
/// Every trigger that gets past the debouncer starts a new generation, which
/// supersedes whatever the runner was still working on.
pub struct CompressionSession {
    runner: EncodeRunner,
    image: Arc<SourceImage>,
    quality: Quality,
    debouncer: QualityDebouncer,
}

impl CompressionSession {
    /// Build a runner with the default adapters and submit the initial load.
    pub fn new<S: CompletionSink>(
        image: SourceImage,
        sink: S,
        config: &RunnerConfig,
    ) -> Result<Self, RunnerError> {
        let runner = EncodeRunner::new(default_adapters(), sink, config)?;
        Ok(Self::with_runner(runner, image, config))
    }

    pub fn with_runner(runner: EncodeRunner, image: SourceImage, config: &RunnerConfig) -> Self {
        let quality = Quality::saturating(config.initial_quality);
        let session = Self {
            runner,
            image: Arc::new(image),
            quality,
            debouncer: QualityDebouncer::new(config.debounce_threshold, quality),
        };
        session.runner.submit(session.image.clone(), quality);
        session
    }

    /// A new image was picked; encode it at the current quality.
    pub fn load(&mut self, image: SourceImage) -> GenerationId {
        self.image = Arc::new(image);
        self.trigger()
    }

    /// The control moved but is still being dragged.
    pub fn quality_changed(&mut self, value: f32) -> Option<GenerationId> {
        let quality = self.debouncer.on_change(value)?;
        self.quality = quality;
        Some(self.trigger())
    }

    /// The control was released.
    pub fn quality_settled(&mut self, value: f32) -> GenerationId {
        self.quality = self.debouncer.on_settle(value);
        self.trigger()
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn runner(&self) -> &EncodeRunner {
        &self.runner
    }

    pub fn is_current(&self, completion: &Completion) -> bool {
        self.runner.is_current(completion.generation)
    }

    pub fn shutdown(self) {
        self.runner.shutdown();
    }

    fn trigger(&self) -> GenerationId {
        self.runner.submit(self.image.clone(), self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use crate::codec::testing::gradient;
    use crate::codec::{CodecAdapter, JpegAdapter};

    const WAIT: Duration = Duration::from_secs(10);

    fn jpeg_session() -> (CompressionSession, mpsc::Receiver<Completion>) {
        let (tx, rx) = mpsc::channel();
        let config = RunnerConfig::default();
        let runner = EncodeRunner::new(
            vec![Arc::new(JpegAdapter) as Arc<dyn CodecAdapter>],
            tx,
            &config,
        )
        .unwrap();
        (CompressionSession::with_runner(runner, gradient(32, 32), &config), rx)
    }

    #[test]
    fn test_initial_load_submits() {
        let (session, rx) = jpeg_session();
        let completion = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(completion.generation, session.runner().current_generation());
        assert_eq!(completion.quality, Quality::saturating(0.5));
    }

    #[test]
    fn test_drag_is_debounced() {
        let (mut session, _rx) = jpeg_session();
        let start = session.runner().current_generation();

        assert_eq!(session.quality_changed(0.55), None);
        assert_eq!(session.runner().current_generation(), start);

        let moved = session.quality_changed(0.8).unwrap();
        assert!(moved > start);
        assert_eq!(session.quality(), Quality::saturating(0.8));
    }

    #[test]
    fn test_settle_delivers_latest_quality() {
        let (mut session, rx) = jpeg_session();
        let settled = session.quality_settled(0.9);

        let completion = loop {
            let c = rx.recv_timeout(WAIT).unwrap();
            if c.generation == settled {
                break c;
            }
        };
        assert!(session.is_current(&completion));
        assert_eq!(completion.quality, Quality::saturating(0.9));
    }

    #[test]
    fn test_load_replaces_image() {
        let (mut session, rx) = jpeg_session();
        let generation = session.load(SourceImage::without_pixels(10, 10));
        assert!(!session.image().has_pixels());

        let completion = loop {
            let c = rx.recv_timeout(WAIT).unwrap();
            if c.generation == generation {
                break c;
            }
        };
        assert!(completion.result.is_err());
    }
}
