//! Themed vertical photo-strip rendering.
//!
//! A strip stacks a session's photos into one tall raster: themed
//! gradient background, white polaroid frames, a caption band under each
//! photo and glyph decorations. The geometry matches the booth's export
//! (800 px wide, 600 px photos, 80 px caption band, 40 px padding).

use crate::error::{ComposeError, Result};
use crate::frame::RgbaFrame;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub const STRIP_WIDTH: u32 = 800;
pub const PHOTO_HEIGHT: u32 = 600;
pub const PADDING: u32 = 40;
pub const CAPTION_HEIGHT: u32 = 80;

const CAPTION_SIZE: f32 = 24.0;
const WATERMARK_SIZE: f32 = 40.0;
const CAPTION_COLOR: Rgba<u8> = Rgba([0x8b, 0x5a, 0x6b, 255]);
const FRAME_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DOODLE_COLOR: Rgba<u8> = Rgba([0xf4, 0xa6, 0xc1, 255]);

/// Bouquet themes carried over from the booth's strip designer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripTheme {
    VintageRose,
    LavenderDreams,
    Wildflower,
    GardenParty,
    CherryBlossom,
}

impl StripTheme {
    pub const ALL: [StripTheme; 5] = [
        StripTheme::VintageRose,
        StripTheme::LavenderDreams,
        StripTheme::Wildflower,
        StripTheme::GardenParty,
        StripTheme::CherryBlossom,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vintage-rose" => Some(StripTheme::VintageRose),
            "lavender-dreams" => Some(StripTheme::LavenderDreams),
            "wildflower" => Some(StripTheme::Wildflower),
            "garden-party" => Some(StripTheme::GardenParty),
            "cherry-blossom" => Some(StripTheme::CherryBlossom),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StripTheme::VintageRose => "vintage-rose",
            StripTheme::LavenderDreams => "lavender-dreams",
            StripTheme::Wildflower => "wildflower",
            StripTheme::GardenParty => "garden-party",
            StripTheme::CherryBlossom => "cherry-blossom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StripTheme::VintageRose => "Vintage Rose",
            StripTheme::LavenderDreams => "Lavender Dreams",
            StripTheme::Wildflower => "Wildflower",
            StripTheme::GardenParty => "Garden Party",
            StripTheme::CherryBlossom => "Cherry Blossom",
        }
    }

    /// Decorative glyph stamped in the strip corners
    pub fn glyph(&self) -> &'static str {
        match self {
            StripTheme::VintageRose => "❀",
            StripTheme::LavenderDreams => "✿",
            StripTheme::Wildflower => "✼",
            StripTheme::GardenParty => "❁",
            StripTheme::CherryBlossom => "✾",
        }
    }

    /// Background gradient (top, bottom)
    pub fn gradient(&self) -> ([u8; 4], [u8; 4]) {
        match self {
            StripTheme::VintageRose => ([0xff, 0xf5, 0xf5, 255], [0xff, 0xe4, 0xe6, 255]),
            StripTheme::LavenderDreams => ([0xfa, 0xf5, 0xff, 255], [0xf3, 0xe8, 0xff, 255]),
            StripTheme::Wildflower => ([0xff, 0xfb, 0xeb, 255], [0xfe, 0xf3, 0xc7, 255]),
            StripTheme::GardenParty => ([0xfd, 0xf4, 0xff, 255], [0xfa, 0xe8, 0xff, 255]),
            StripTheme::CherryBlossom => ([0xfc, 0xe7, 0xf3, 255], [0xfb, 0xcf, 0xe8, 255]),
        }
    }

    pub fn caption_suggestions(&self) -> &'static [&'static str] {
        match self {
            StripTheme::VintageRose => &[
                "like a rose in bloom",
                "timeless beauty",
                "vintage hearts forever",
                "romantic memories",
                "in full bloom",
            ],
            StripTheme::LavenderDreams => &[
                "dreaming in lavender",
                "soft purple haze",
                "ethereal moments",
                "gentle dreams",
                "lavender fields forever",
            ],
            StripTheme::Wildflower => &[
                "wild & free",
                "sunshine moments",
                "golden hour magic",
                "blooming beautiful",
                "free spirit energy",
            ],
            StripTheme::GardenParty => &[
                "garden of dreams",
                "floral fantasy",
                "blooming together",
                "petal perfect",
                "in the garden",
            ],
            StripTheme::CherryBlossom => &[
                "cherry blossom dreams",
                "sakura season",
                "fleeting beauty",
                "spring forever",
                "under the blossoms",
            ],
        }
    }
}

/// One photo slot in the strip
#[derive(Debug, Clone)]
pub struct StripPhoto {
    pub frame: Arc<RgbaFrame>,
    pub caption: String,
}

/// Renders photo strips; glyphs and captions need a font, and degrade to
/// a warning without one
pub struct StripRenderer {
    font: Option<Font<'static>>,
}

impl StripRenderer {
    pub fn new() -> Self {
        Self { font: None }
    }

    pub fn with_font_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let font = match std::fs::read(path) {
            Ok(bytes) => Font::try_from_vec(bytes),
            Err(e) => {
                warn!("Could not read font file {}: {}", path.display(), e);
                None
            }
        };
        if font.is_none() {
            warn!("Strip captions disabled; no usable font");
        }
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Expected raster height for a photo count
    pub fn strip_height(photo_count: usize) -> u32 {
        photo_count as u32 * (PHOTO_HEIGHT + CAPTION_HEIGHT + PADDING) + PADDING
    }

    /// Render the full strip
    pub fn render(&self, photos: &[StripPhoto], theme: StripTheme) -> Result<RgbaFrame> {
        let height = Self::strip_height(photos.len());
        let mut canvas = RgbaImage::new(STRIP_WIDTH, height);

        let (top, bottom) = theme.gradient();
        fill_vertical_gradient(&mut canvas, top, bottom);

        self.draw_corner_watermarks(&mut canvas, theme, height);

        for (index, photo) in photos.iter().enumerate() {
            let y = PADDING + index as u32 * (PHOTO_HEIGHT + CAPTION_HEIGHT + PADDING);
            self.draw_slot(&mut canvas, photo, y)?;
        }

        debug!(
            "Rendered {} strip with {} photos ({}x{})",
            theme.name(),
            photos.len(),
            STRIP_WIDTH,
            height
        );

        RgbaFrame::new(STRIP_WIDTH, height, canvas.into_raw())
    }

    fn draw_slot(&self, canvas: &mut RgbaImage, photo: &StripPhoto, y: u32) -> Result<()> {
        // White polaroid frame
        let frame_x = PADDING / 2;
        let frame_w = STRIP_WIDTH - PADDING;
        let frame_h = PHOTO_HEIGHT + CAPTION_HEIGHT;
        fill_rect(canvas, frame_x, y, frame_w, frame_h, FRAME_COLOR);

        // The photo fills the frame minus a 10 px inner margin
        let photo_w = frame_w - 20;
        let photo_h = PHOTO_HEIGHT - 20;
        let src = RgbaImage::from_raw(
            photo.frame.width,
            photo.frame.height,
            photo.frame.data.clone(),
        )
        .ok_or(ComposeError::BufferSize {
            expected: photo.frame.width as usize * photo.frame.height as usize * 4,
            actual: photo.frame.data.len(),
        })?;
        let scaled = imageops::resize(&src, photo_w, photo_h, FilterType::Triangle);
        imageops::overlay(canvas, &scaled, (frame_x + 10) as i64, (y + 10) as i64);

        // Doodle ring in the frame corner
        imageproc::drawing::draw_hollow_circle_mut(
            canvas,
            ((frame_x + 25) as i32, (y + 25) as i32),
            8,
            DOODLE_COLOR,
        );

        if let Some(font) = &self.font {
            let caption_y = (y + PHOTO_HEIGHT + 45) as i32;
            draw_centered_text(
                canvas,
                font,
                &photo.caption,
                CAPTION_COLOR,
                Scale::uniform(CAPTION_SIZE),
                STRIP_WIDTH,
                caption_y,
            );

            // Small hearts flanking the caption
            let heart_scale = Scale::uniform(18.0);
            imageproc::drawing::draw_text_mut(
                canvas,
                DOODLE_COLOR,
                (STRIP_WIDTH / 2 - 150) as i32,
                caption_y,
                heart_scale,
                font,
                "♥",
            );
            imageproc::drawing::draw_text_mut(
                canvas,
                DOODLE_COLOR,
                (STRIP_WIDTH / 2 + 140) as i32,
                caption_y,
                heart_scale,
                font,
                "♥",
            );
        }

        Ok(())
    }

    fn draw_corner_watermarks(&self, canvas: &mut RgbaImage, theme: StripTheme, height: u32) {
        let Some(font) = &self.font else {
            return;
        };

        // Approximate the 15% opacity watermark by tinting toward the
        // gradient's top color
        let (top, _) = theme.gradient();
        let ink = Rgba([
            blend_channel(top[0], 0x8b, 0.15),
            blend_channel(top[1], 0x5a, 0.15),
            blend_channel(top[2], 0x6b, 0.15),
            255,
        ]);

        let scale = Scale::uniform(WATERMARK_SIZE);
        let glyph = theme.glyph();
        let bottom_y = height.saturating_sub(60) as i32;
        let corners = [
            (20, 10),
            ((STRIP_WIDTH - 60) as i32, 10),
            (20, bottom_y),
            ((STRIP_WIDTH - 60) as i32, bottom_y),
        ];
        for (x, y) in corners {
            imageproc::drawing::draw_text_mut(canvas, ink, x, y, scale, font, glyph);
        }
    }
}

impl Default for StripRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn blend_channel(base: u8, ink: u8, alpha: f32) -> u8 {
    (base as f32 * (1.0 - alpha) + ink as f32 * alpha) as u8
}

fn fill_vertical_gradient(canvas: &mut RgbaImage, top: [u8; 4], bottom: [u8; 4]) {
    let height = canvas.height().max(1);
    for y in 0..canvas.height() {
        let t = y as f32 / height as f32;
        let color = Rgba([
            blend_channel(top[0], bottom[0], t),
            blend_channel(top[1], bottom[1], t),
            blend_channel(top[2], bottom[2], t),
            255,
        ]);
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = (x + w).min(canvas.width());
    let y_end = (y + h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn draw_centered_text(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    text: &str,
    color: Rgba<u8>,
    scale: Scale,
    span_width: u32,
    y: i32,
) {
    let text_width: f32 = font
        .layout(text, scale, point(0.0, 0.0))
        .map(|g| g.unpositioned().h_metrics().advance_width)
        .sum();
    let x = ((span_width as f32 - text_width) / 2.0).max(0.0) as i32;
    imageproc::drawing::draw_text_mut(canvas, color, x, y, scale, font, text);
}
