//! Output encoding of the finished canvas.

use crate::{MicrographyError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

pub const DEFAULT_JPEG_QUALITY: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: DEFAULT_JPEG_QUALITY }
    }
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Encoded micrography plus the text it was drawn with.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub text: String,
}

impl OutputArtifact {
    /// Self-contained `data:` URI, embeddable in an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime(), STANDARD.encode(&self.bytes))
    }
}

pub fn encode(canvas: &RgbImage, format: OutputFormat, text: String) -> Result<OutputArtifact> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg { quality } => {
            JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
                .encode_image(canvas)
                .map_err(|e| MicrographyError::Render(format!("jpeg encoding failed: {e}")))?;
        }
        OutputFormat::Png => {
            canvas
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| MicrographyError::Render(format!("png encoding failed: {e}")))?;
        }
    }
    Ok(OutputArtifact { bytes, format, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn canvas() -> RgbImage {
        RgbImage::from_pixel(20, 10, Rgb([120, 120, 120]))
    }

    #[test]
    fn jpeg_output_decodes_to_the_same_size() {
        let art = encode(&canvas(), OutputFormat::default(), "AB".into()).unwrap();
        assert_eq!(&art.bytes[..2], &[0xFF, 0xD8]);
        let back = image::load_from_memory(&art.bytes).unwrap();
        assert_eq!((back.width(), back.height()), (20, 10));
        assert_eq!(art.text, "AB");
    }

    #[test]
    fn png_output_is_lossless() {
        let art = encode(&canvas(), OutputFormat::Png, "x".into()).unwrap();
        let back = image::load_from_memory(&art.bytes).unwrap().to_rgb8();
        assert_eq!(back, canvas());
    }

    #[test]
    fn data_uri_carries_mime_and_payload() {
        let art = OutputArtifact { bytes: vec![1, 2, 3], format: OutputFormat::Png, text: String::new() };
        assert_eq!(art.data_uri(), "data:image/png;base64,AQID");
        let jpeg = OutputArtifact { format: OutputFormat::default(), ..art };
        assert!(jpeg.data_uri().starts_with("data:image/jpeg;base64,"));
    }
}
