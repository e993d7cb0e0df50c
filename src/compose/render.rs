//! Rendering backends for the composition surface.
//!
//! [`RenderBackend`] decouples flatten/export from any particular raster
//! implementation; the built-in [`RasterBackend`] draws into an RGBA
//! buffer with `image`/`imageproc` and renders glyph stickers through a
//! TrueType font. A missing font degrades glyph rendering to a warning,
//! never a failed flatten.

use super::{ItemContent, SceneGraph};
use crate::error::{ComposeError, Result};
use crate::frame::RgbaFrame;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rusttype::{Font, Scale};
use std::path::Path;
use tracing::{debug, warn};

/// Ink color for glyph stickers
const GLYPH_COLOR: Rgba<u8> = Rgba([92, 64, 77, 255]);

/// Renders a scene to a single raster
pub trait RenderBackend {
    fn render(&self, scene: &SceneGraph, multiplier: u32) -> Result<RgbaFrame>;
}

/// CPU raster backend
pub struct RasterBackend {
    font: Option<Font<'static>>,
}

impl RasterBackend {
    /// Backend without glyph support
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Backend with a TrueType font loaded from disk; failure to load
    /// logs a warning and falls back to [`RasterBackend::new`] behavior
    pub fn with_font_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let font = match std::fs::read(path) {
            Ok(bytes) => match Font::try_from_vec(bytes) {
                Some(font) => Some(font),
                None => {
                    warn!("Font file {} is not a usable TrueType face", path.display());
                    None
                }
            },
            Err(e) => {
                warn!("Could not read font file {}: {}", path.display(), e);
                None
            }
        };
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn draw_image_item(
        canvas: &mut RgbaImage,
        frame: &RgbaFrame,
        x: f32,
        y: f32,
        scale: f32,
        rotation_deg: f32,
        multiplier: u32,
    ) -> Result<()> {
        let m = multiplier as f32;
        let target_w = ((frame.width as f32 * scale * m) as u32).max(1);
        let target_h = ((frame.height as f32 * scale * m) as u32).max(1);

        let src = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or(
            ComposeError::BufferSize {
                expected: frame.width as usize * frame.height as usize * 4,
                actual: frame.data.len(),
            },
        )?;

        let mut scaled = imageops::resize(&src, target_w, target_h, FilterType::Triangle);

        if rotation_deg.abs() > f32::EPSILON {
            let theta = rotation_deg.to_radians();
            scaled = rotate_about_center(
                &scaled,
                theta,
                Interpolation::Bilinear,
                Rgba([0, 0, 0, 0]),
            );
        }

        imageops::overlay(canvas, &scaled, (x * m) as i64, (y * m) as i64);
        Ok(())
    }

    fn draw_glyph_item(
        &self,
        canvas: &mut RgbaImage,
        glyph: &str,
        x: f32,
        y: f32,
        font_size: f32,
        rotation_deg: f32,
        multiplier: u32,
    ) {
        let Some(font) = &self.font else {
            warn!("No font loaded; skipping glyph sticker '{}'", glyph);
            return;
        };

        let m = multiplier as f32;
        let size = font_size * m;

        // Draw into a transparent patch so rotation can be baked in
        let side = (size * 2.0).ceil() as u32;
        let inset = (size / 2.0) as i32;
        let mut patch = RgbaImage::from_pixel(side, side, Rgba([0, 0, 0, 0]));
        imageproc::drawing::draw_text_mut(
            &mut patch,
            GLYPH_COLOR,
            inset,
            inset,
            Scale::uniform(size),
            font,
            glyph,
        );

        if rotation_deg.abs() > f32::EPSILON {
            patch = rotate_about_center(
                &patch,
                rotation_deg.to_radians(),
                Interpolation::Bilinear,
                Rgba([0, 0, 0, 0]),
            );
        }

        let dest_x = (x * m) as i64 - inset as i64;
        let dest_y = (y * m) as i64 - inset as i64;
        imageops::overlay(canvas, &patch, dest_x, dest_y);
    }
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for RasterBackend {
    fn render(&self, scene: &SceneGraph, multiplier: u32) -> Result<RgbaFrame> {
        let width = scene.width() * multiplier;
        let height = scene.height() * multiplier;
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(scene.background()));

        for item in scene.items() {
            match &item.content {
                ItemContent::Image(frame) => {
                    Self::draw_image_item(
                        &mut canvas,
                        frame,
                        item.x,
                        item.y,
                        item.scale,
                        item.rotation_deg,
                        multiplier,
                    )?;
                }
                ItemContent::Glyph { glyph, font_size } => {
                    self.draw_glyph_item(
                        &mut canvas,
                        glyph,
                        item.x,
                        item.y,
                        *font_size,
                        item.rotation_deg,
                        multiplier,
                    );
                }
            }
        }

        debug!(
            "Flattened {} items to {}x{} raster",
            scene.item_count(),
            width,
            height
        );

        RgbaFrame::new(width, height, canvas.into_raw())
    }
}
