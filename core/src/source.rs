use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgb, Rgba};

use crate::error::EncodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Luma8,
    Rgb8,
    Rgba8,
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Luma8 => 1,
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }
}

/// Decoded, immutable raster handed to the codec adapters.
///
/// Shared read-only between the jobs of a generation (wrap it in an `Arc`).
/// An image may exist without a readable pixel buffer, in which case every
/// adapter reports [`EncodeError::InvalidSource`].
#[derive(Debug, Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Option<DynamicImage>,
}

impl SourceImage {
    pub fn new(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: Some(image),
        }
    }

    /// Wrap a raw interleaved buffer. A buffer whose length does not match
    /// `width * height * channels` leaves the image without pixels.
    pub fn from_raw(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Self {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layout.channels()));

        let pixels = if expected == Some(data.len()) {
            match layout {
                PixelLayout::Luma8 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, data)
                    .map(DynamicImage::ImageLuma8),
                PixelLayout::Rgb8 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data)
                    .map(DynamicImage::ImageRgb8),
                PixelLayout::Rgba8 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, data)
                    .map(DynamicImage::ImageRgba8),
            }
        } else {
            log::debug!(
                "raw buffer of {} bytes does not fit {}x{} {:?}",
                data.len(),
                width,
                height,
                layout
            );
            None
        };

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn without_pixels(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }

    /// The compressible raster, or `InvalidSource` when there is nothing to encode.
    pub fn raster(&self) -> Result<&DynamicImage, EncodeError> {
        let img = self
            .pixels
            .as_ref()
            .ok_or_else(|| EncodeError::InvalidSource("image has no pixel buffer".into()))?;

        if self.width == 0 || self.height == 0 {
            return Err(EncodeError::InvalidSource(format!(
                "image has empty dimensions {}x{}",
                self.width, self.height
            )));
        }

        Ok(img)
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}
