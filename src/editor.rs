//! Manual photo adjustment applied between capture and save.
//!
//! Mirrors the booth's edit step: rotation in 90-degree increments,
//! brightness / contrast / saturation as percentage controls where 100 is
//! the identity, and an optional crop rectangle expressed in percent
//! coordinates of the rendered image. The output overwrites the pending
//! photo payload before it becomes a Memory; this is the only sanctioned
//! mutation of an image payload.

use crate::error::{ComposeError, Result};
use crate::frame::RgbaFrame;
use image::{imageops, RgbaImage};
use tracing::debug;

/// Crop rectangle in percent coordinates (0-100 on each axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One edit pass over a captured still
#[derive(Debug, Clone, PartialEq)]
pub struct EditSettings {
    /// Clockwise rotation in degrees; normalized to 0/90/180/270
    pub rotation_deg: u32,
    /// Brightness percent, 100 = identity
    pub brightness: f32,
    /// Contrast percent, 100 = identity
    pub contrast: f32,
    /// Saturation percent, 100 = identity
    pub saturation: f32,
    pub crop: Option<CropRect>,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            rotation_deg: 0,
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            crop: None,
        }
    }
}

impl EditSettings {
    pub fn is_identity(&self) -> bool {
        self.rotation_deg % 360 == 0
            && (self.brightness - 100.0).abs() < f32::EPSILON
            && (self.contrast - 100.0).abs() < f32::EPSILON
            && (self.saturation - 100.0).abs() < f32::EPSILON
            && self.crop.is_none()
    }

    /// Advance rotation by a quarter turn, as the edit surface does
    pub fn rotate_quarter_turn(&mut self) {
        self.rotation_deg = (self.rotation_deg + 90) % 360;
    }
}

/// Apply an edit pass, producing a new frame
pub fn apply_edit(frame: &RgbaFrame, settings: &EditSettings) -> Result<RgbaFrame> {
    if settings.is_identity() {
        return Ok(frame.clone());
    }

    let img = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or(
        ComposeError::BufferSize {
            expected: frame.width as usize * frame.height as usize * 4,
            actual: frame.data.len(),
        },
    )?;

    let mut img = match settings.rotation_deg % 360 {
        90 => imageops::rotate90(&img),
        180 => imageops::rotate180(&img),
        270 => imageops::rotate270(&img),
        _ => img,
    };

    adjust_colors(
        &mut img,
        settings.brightness / 100.0,
        settings.contrast / 100.0,
        settings.saturation / 100.0,
    );

    if let Some(crop) = settings.crop {
        img = apply_crop(&img, crop);
    }

    let (width, height) = img.dimensions();
    debug!(
        "Edit applied: rotation {}°, output {}x{}",
        settings.rotation_deg % 360,
        width,
        height
    );

    RgbaFrame::new(width, height, img.into_raw())
}

fn adjust_colors(img: &mut RgbaImage, brightness: f32, contrast: f32, saturation: f32) {
    if (brightness - 1.0).abs() < f32::EPSILON
        && (contrast - 1.0).abs() < f32::EPSILON
        && (saturation - 1.0).abs() < f32::EPSILON
    {
        return;
    }

    for px in img.pixels_mut() {
        let mut r = px.0[0] as f32;
        let mut g = px.0[1] as f32;
        let mut b = px.0[2] as f32;

        // Brightness scales channels directly
        r *= brightness;
        g *= brightness;
        b *= brightness;

        // Contrast pivots around mid-gray
        r = (r - 128.0) * contrast + 128.0;
        g = (g - 128.0) * contrast + 128.0;
        b = (b - 128.0) * contrast + 128.0;

        // Saturation interpolates against Rec.709 luminance
        let lum = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        r = lum + (r - lum) * saturation;
        g = lum + (g - lum) * saturation;
        b = lum + (b - lum) * saturation;

        px.0[0] = r.clamp(0.0, 255.0) as u8;
        px.0[1] = g.clamp(0.0, 255.0) as u8;
        px.0[2] = b.clamp(0.0, 255.0) as u8;
    }
}

fn apply_crop(img: &RgbaImage, crop: CropRect) -> RgbaImage {
    let (width, height) = img.dimensions();
    let scale_x = width as f32 / 100.0;
    let scale_y = height as f32 / 100.0;

    let x = (crop.x.max(0.0) * scale_x) as u32;
    let y = (crop.y.max(0.0) * scale_y) as u32;
    let w = ((crop.width * scale_x) as u32).clamp(1, width.saturating_sub(x).max(1));
    let h = ((crop.height * scale_y) as u32).clamp(1, height.saturating_sub(y).max(1));

    imageops::crop_imm(img, x.min(width - 1), y.min(height - 1), w, h).to_image()
}
