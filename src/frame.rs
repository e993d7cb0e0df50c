use crate::error::{ComposeError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Number of channels in a raw frame (RGBA)
pub const CHANNELS: usize = 4;

/// A rectangular RGBA pixel buffer, 8 bits per channel.
///
/// This is the working currency of the capture and composition pipelines:
/// the camera seam produces it, the filter engine transforms it, and the
/// flatten step renders into it.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Create a frame from raw RGBA bytes, validating the buffer size
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(ComposeError::BufferSize {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an opaque single-color frame
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the RGBA channel values at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    fn to_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            ComposeError::BufferSize {
                expected: self.width as usize * self.height as usize * CHANNELS,
                actual: self.data.len(),
            }
            .into()
        })
    }

    /// Encode to PNG bytes
    pub fn encode_png(&self) -> Result<EncodedImage> {
        let img = self.to_image()?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| ComposeError::Encode {
                details: format!("PNG encode failed: {}", e),
            })?;
        Ok(EncodedImage {
            format: ImageEncoding::Png,
            bytes,
        })
    }

    /// Encode to JPEG bytes at the given quality (alpha is dropped)
    pub fn encode_jpeg(&self, quality: u8) -> Result<EncodedImage> {
        let img = self.to_image()?;
        let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(quality))
            .map_err(|e| ComposeError::Encode {
                details: format!("JPEG encode failed: {}", e),
            })?;
        Ok(EncodedImage {
            format: ImageEncoding::Jpeg,
            bytes,
        })
    }
}

/// Supported payload encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "image/png",
            ImageEncoding::Jpeg => "image/jpeg",
        }
    }
}

/// An opaque encoded raster payload (PNG or JPEG bytes).
///
/// Memories carry these as self-contained `data:` URIs so the store never
/// references external files; the payload therefore grows with image size,
/// which is an accepted operational constraint of the design.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub format: ImageEncoding,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Render as a `data:<mime>;base64,<payload>` URI
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            BASE64.encode(&self.bytes)
        )
    }

    /// Parse a `data:` URI produced by [`EncodedImage::to_data_uri`]
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| ComposeError::Decode {
            details: "not a data URI".to_string(),
        })?;
        let (mime, payload) = rest.split_once(";base64,").ok_or_else(|| ComposeError::Decode {
            details: "missing base64 payload".to_string(),
        })?;
        let format = match mime {
            "image/png" => ImageEncoding::Png,
            "image/jpeg" => ImageEncoding::Jpeg,
            other => {
                return Err(ComposeError::Decode {
                    details: format!("unsupported mime type: {}", other),
                }
                .into())
            }
        };
        let bytes = BASE64.decode(payload).map_err(|e| ComposeError::Decode {
            details: format!("base64 decode failed: {}", e),
        })?;
        Ok(Self { format, bytes })
    }

    /// Decode the payload back into an RGBA frame
    pub fn decode(&self) -> Result<RgbaFrame> {
        let img = image::load_from_memory(&self.bytes).map_err(|e| ComposeError::Decode {
            details: format!("image decode failed: {}", e),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(RgbaFrame {
            width,
            height,
            data: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_validation() {
        assert!(RgbaFrame::new(4, 4, vec![0u8; 64]).is_ok());
        assert!(RgbaFrame::new(4, 4, vec![0u8; 63]).is_err());
    }

    #[test]
    fn test_filled_frame_pixels() {
        let frame = RgbaFrame::filled(8, 8, [10, 20, 30, 255]);
        assert_eq!(frame.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(frame.pixel(7, 7), [10, 20, 30, 255]);
        assert_eq!(frame.pixel_count(), 64);
    }

    #[test]
    fn test_png_data_uri_round_trip() {
        let frame = RgbaFrame::filled(16, 8, [200, 100, 50, 255]);
        let encoded = frame.encode_png().unwrap();

        let uri = encoded.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let parsed = EncodedImage::from_data_uri(&uri).unwrap();
        let decoded = parsed.decode().unwrap();
        assert_eq!(decoded.width, 16);
        assert_eq!(decoded.height, 8);
        // PNG is lossless
        assert_eq!(decoded.pixel(3, 3), [200, 100, 50, 255]);
    }

    #[test]
    fn test_jpeg_encode_has_dimensions() {
        let frame = RgbaFrame::filled(32, 32, [128, 128, 128, 255]);
        let encoded = frame.encode_jpeg(70).unwrap();
        assert_eq!(encoded.format, ImageEncoding::Jpeg);

        let decoded = encoded.decode().unwrap();
        assert_eq!(decoded.width, 32);
        assert_eq!(decoded.height, 32);
    }

    #[test]
    fn test_bad_data_uri_rejected() {
        assert!(EncodedImage::from_data_uri("http://example.com/x.png").is_err());
        assert!(EncodedImage::from_data_uri("data:image/png,notbase64").is_err());
        assert!(EncodedImage::from_data_uri("data:text/plain;base64,aGk=").is_err());
    }
}
