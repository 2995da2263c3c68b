use std::fs;
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use compressor_core::{Completion, GenerationId, SourceImage};

use crate::error::HostError;

/// Read and decode an image file into a source raster.
pub fn load_image(path: &Path) -> Result<SourceImage, HostError> {
    let data = fs::read(path).map_err(|e| HostError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let img = image::load_from_memory(&data).map_err(|e| HostError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!(
        "loaded {}: {}x{} {:?}",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(SourceImage::new(img))
}

/// Wait until `expected` completions of `generation` arrived.
/// Completions of other generations are ignored.
pub fn collect_generation(
    results: &Receiver<Completion>,
    generation: GenerationId,
    expected: usize,
    timeout: Duration,
) -> Result<Vec<Completion>, HostError> {
    let deadline = Instant::now() + timeout;
    let mut completions = Vec::with_capacity(expected);

    while completions.len() < expected {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match results.recv_timeout(remaining) {
            Ok(completion) if completion.generation == generation => completions.push(completion),
            Ok(completion) => {
                log::debug!(
                    "ignoring {} result of generation {}",
                    completion.format,
                    completion.generation
                );
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(HostError::Timeout {
                    generation: generation.get(),
                    missing: expected - completions.len(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(HostError::Disconnected {
                    generation: generation.get(),
                });
            }
        }
    }

    Ok(completions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, mpsc};

    use compressor_core::{
        CodecAdapter, EncodeRunner, JpegAdapter, Quality, RunnerConfig,
    };
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_load_missing_file() {
        let err = load_image(Path::new("/nonexistent/picture.png")).unwrap_err();
        assert!(matches!(err, HostError::ReadFile { .. }));
    }

    #[test]
    fn test_load_garbage_file() {
        let path = std::env::temp_dir().join(format!("compressor-garbage-{}.bin", std::process::id()));
        fs::write(&path, b"definitely not an image").unwrap();
        let err = load_image(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, HostError::Decode { .. }));
    }

    #[test]
    fn test_load_png_round_trip() {
        let path = std::env::temp_dir().join(format!("compressor-load-{}.png", std::process::id()));
        DynamicImage::ImageRgb8(RgbImage::new(12, 7)).save(&path).unwrap();
        let img = load_image(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!((img.width(), img.height()), (12, 7));
        assert!(img.has_pixels());
    }

    #[test]
    fn test_collect_generation_keeps_only_requested() {
        let (tx, rx) = mpsc::channel();
        let runner = EncodeRunner::new(
            vec![Arc::new(JpegAdapter) as Arc<dyn CodecAdapter>],
            tx,
            &RunnerConfig::default(),
        )
        .unwrap();
        let image = Arc::new(SourceImage::new(DynamicImage::ImageRgb8(RgbImage::new(8, 8))));

        runner.submit(image.clone(), Quality::MIN);
        let last = runner.submit(image, Quality::MAX);

        let completions = collect_generation(&rx, last, 1, Duration::from_secs(10)).unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].generation, last);
    }

    #[test]
    fn test_collect_generation_reports_disconnect() {
        let (tx, rx) = mpsc::channel::<Completion>();
        let runner = EncodeRunner::new(Vec::new(), tx, &RunnerConfig::default()).unwrap();
        let generation = runner.submit(Arc::new(SourceImage::without_pixels(1, 1)), Quality::MIN);
        runner.shutdown();

        let err = collect_generation(&rx, generation, 2, Duration::from_secs(10)).unwrap_err();
        assert!(matches!(err, HostError::Disconnected { .. }));
    }
}
