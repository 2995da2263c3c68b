use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::codec::CodecAdapter;
use crate::error::EncodeError;
use crate::format::EncodeFormat;
use crate::quality::Quality;
use crate::source::SourceImage;

pub struct JpegAdapter;

impl CodecAdapter for JpegAdapter {
    fn format(&self) -> EncodeFormat {
        EncodeFormat::Jpeg
    }

    fn encode(&self, image: &SourceImage, quality: Quality) -> Result<Vec<u8>, EncodeError> {
        let img = image.raster()?;

        // JPEG has no alpha channel
        let rgb = img.to_rgb8();

        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, quality.to_percent());

        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| EncodeError::EncodeFailed(format!("JPEG: {e}")))?;

        Ok(output)
    }
}
