pub mod heic;
pub mod jpeg;

use std::sync::Arc;

use crate::error::EncodeError;
use crate::format::EncodeFormat;
use crate::quality::Quality;
use crate::source::SourceImage;

pub use heic::HeicAdapter;
pub use jpeg::JpegAdapter;

/// Stateless `(image, quality) -> bytes` transformation for one format.
///
/// Implementations borrow the image for the duration of the call only and are
/// invoked concurrently from several worker threads.
pub trait CodecAdapter: Send + Sync {
    fn format(&self) -> EncodeFormat;
    fn encode(&self, image: &SourceImage, quality: Quality) -> Result<Vec<u8>, EncodeError>;
}

/// One adapter per supported format, JPEG first.
pub fn default_adapters() -> Vec<Arc<dyn CodecAdapter>> {
    vec![Arc::new(JpegAdapter), Arc::new(HeicAdapter)]
}

#[cfg(test)]
pub(crate) mod testing {
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    use crate::source::SourceImage;

    /// Smooth gradient with some high-frequency detail so quality changes size.
    pub fn gradient(width: u32, height: u32) -> SourceImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let noise = ((x * 31 + y * 17) % 23) as u8;
            Rgb([
                (x * 255 / width.max(1)) as u8 ^ noise,
                (y * 255 / height.max(1)) as u8,
                ((x + y) % 256) as u8,
            ])
        });
        SourceImage::new(DynamicImage::ImageRgb8(img))
    }

    pub fn translucent(width: u32, height: u32) -> SourceImage {
        let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 128, 64]));
        SourceImage::new(DynamicImage::ImageRgba8(img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_adapters_cover_all_formats() {
        let formats: Vec<_> = default_adapters().iter().map(|a| a.format()).collect();
        assert_eq!(formats, EncodeFormat::ALL.to_vec());
    }
}
