use serde::Serialize;

use compressor_core::{Completion, EncodeFormat, GenerationId, Quality};

/// Outcome of one format in the final generation.
#[derive(Debug, Clone, Serialize)]
pub struct FormatResult {
    pub format: &'static str,
    pub bytes: Option<usize>,
    pub elapsed_ms: Option<f64>,
    pub encode_ms: Option<f64>,
    pub error: Option<String>,
}

impl FormatResult {
    fn from_completion(completion: &Completion) -> Self {
        match &completion.result {
            Ok(output) => Self {
                format: completion.format.as_str(),
                bytes: Some(output.bytes.len()),
                elapsed_ms: Some(output.elapsed.as_secs_f64() * 1000.0),
                encode_ms: Some(output.encode_time.as_secs_f64() * 1000.0),
                error: None,
            },
            Err(e) => Self {
                format: completion.format.as_str(),
                bytes: None,
                elapsed_ms: None,
                encode_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Side-by-side comparison for one generation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generation: u64,
    pub quality: f32,
    pub generations_submitted: u64,
    pub results: Vec<FormatResult>,
}

impl Report {
    pub fn new(
        generation: GenerationId,
        quality: Quality,
        generations_submitted: u64,
        mut completions: Vec<Completion>,
    ) -> Self {
        completions.sort_by_key(|c| c.format);
        Self {
            generation: generation.get(),
            quality: quality.value(),
            generations_submitted,
            results: completions.iter().map(FormatResult::from_completion).collect(),
        }
    }

    pub fn get(&self, format: EncodeFormat) -> Option<&FormatResult> {
        self.results.iter().find(|r| r.format == format.as_str())
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_none()).count()
    }

    pub fn print_summary(&self) {
        println!(
            "\n--- Generation {} (quality {:.2}, {} submitted) ---",
            self.generation, self.quality, self.generations_submitted
        );
        println!("{:<6} {:>12} {:>12} {:>12}", "format", "bytes", "elapsed ms", "encode ms");

        for r in &self.results {
            match (&r.error, r.bytes, r.elapsed_ms, r.encode_ms) {
                (None, Some(bytes), Some(elapsed), Some(encode)) => {
                    println!("{:<6} {:>12} {:>12.1} {:>12.1}", r.format, bytes, elapsed, encode);
                }
                (err, ..) => {
                    println!(
                        "{:<6} {:>12} {:>12} {:>12}  {}",
                        r.format,
                        "--",
                        "--",
                        "--",
                        err.as_deref().unwrap_or("no result")
                    );
                }
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    use compressor_core::{EncodeRunner, SourceImage};
    use image::{DynamicImage, RgbImage};

    use crate::io::collect_generation;

    fn default_report() -> Report {
        let (tx, rx) = mpsc::channel();
        let runner = EncodeRunner::with_defaults(tx).unwrap();
        let image = SourceImage::new(DynamicImage::ImageRgb8(RgbImage::new(16, 16)));
        let quality = Quality::saturating(0.5);
        let generation = runner.submit(Arc::new(image), quality);
        let completions = collect_generation(&rx, generation, 2, Duration::from_secs(10)).unwrap();
        Report::new(generation, quality, generation.get(), completions)
    }

    #[test]
    fn test_rows_sorted_by_format() {
        let report = default_report();
        let formats: Vec<_> = report.results.iter().map(|r| r.format).collect();
        assert_eq!(formats, vec!["JPEG", "HEIC"]);
    }

    #[test]
    fn test_jpeg_row_has_measurements() {
        let report = default_report();
        let jpeg = report.get(EncodeFormat::Jpeg).unwrap();
        assert!(jpeg.error.is_none());
        assert!(jpeg.bytes.unwrap() > 0);
        assert!(jpeg.elapsed_ms.unwrap() >= jpeg.encode_ms.unwrap());
        assert!(report.success_count() >= 1);
    }

    #[test]
    fn test_json_output() {
        let json = default_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["generation"], 1);
        assert_eq!(value["results"][0]["format"], "JPEG");
    }
}
