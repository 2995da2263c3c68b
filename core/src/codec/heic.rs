use crate::codec::CodecAdapter;
use crate::error::EncodeError;
use crate::format::EncodeFormat;
use crate::quality::Quality;
use crate::source::SourceImage;

/// HEIC (HEVC in HEIF) adapter backed by libheif.
///
/// Built without the `heic` feature, or linked against a libheif without an
/// HEVC encoder, every call ends in [`EncodeError::UnsupportedFormat`] once the
/// source has been validated.
pub struct HeicAdapter;

impl CodecAdapter for HeicAdapter {
    fn format(&self) -> EncodeFormat {
        EncodeFormat::Heic
    }

    fn encode(&self, image: &SourceImage, quality: Quality) -> Result<Vec<u8>, EncodeError> {
        let img = image.raster()?;
        encode_heic(img, quality)
    }
}

#[cfg(feature = "heic")]
fn encode_heic(img: &image::DynamicImage, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    use libheif_rs::{
        Channel, ColorSpace, CompressionFormat, EncoderQuality, HeifContext, Image, LibHeif,
        RgbChroma,
    };

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let failed = |e: libheif_rs::HeifError| EncodeError::EncodeFailed(format!("HEIC: {e}"));

    let mut heif_image =
        Image::new(width, height, ColorSpace::Rgb(RgbChroma::C444)).map_err(failed)?;
    heif_image.create_plane(Channel::R, width, height, 8).map_err(failed)?;
    heif_image.create_plane(Channel::G, width, height, 8).map_err(failed)?;
    heif_image.create_plane(Channel::B, width, height, 8).map_err(failed)?;

    {
        let planes = heif_image.planes_mut();
        let (Some(mut r), Some(mut g), Some(mut b)) = (planes.r, planes.g, planes.b) else {
            return Err(EncodeError::EncodeFailed("HEIC: missing RGB planes".into()));
        };

        for (y, row) in rgb.rows().enumerate() {
            for (x, px) in row.enumerate() {
                r.data[y * r.stride + x] = px[0];
                g.data[y * g.stride + x] = px[1];
                b.data[y * b.stride + x] = px[2];
            }
        }
    }

    let lib_heif = LibHeif::new();
    let mut encoder = lib_heif
        .encoder_for_format(CompressionFormat::Hevc)
        .map_err(|e| EncodeError::UnsupportedFormat(format!("no HEVC encoder available: {e}")))?;
    encoder
        .set_quality(EncoderQuality::Lossy(quality.to_percent()))
        .map_err(failed)?;

    let mut context = HeifContext::new().map_err(failed)?;
    context
        .encode_image(&heif_image, &mut encoder, None)
        .map_err(failed)?;

    context.write_to_bytes().map_err(failed)
}

#[cfg(not(feature = "heic"))]
fn encode_heic(_img: &image::DynamicImage, _quality: Quality) -> Result<Vec<u8>, EncodeError> {
    Err(EncodeError::UnsupportedFormat(
        "HEIC encoding is not available in this build".into(),
    ))
}
