//! Composition surface: a scene graph of positioned items flattened to a
//! single raster.
//!
//! Items (photos and glyph stickers) carry position, scale, rotation and
//! an implicit z-order (insertion order). Layout templates re-place a
//! working set into fixed arrangements; `flatten` renders the scene
//! through a backend-agnostic [`RenderBackend`] at a configurable
//! resolution multiplier. The scene itself owns no rendering state, so
//! the flatten step works against any backend.

mod layout;
mod render;
#[cfg(test)]
mod tests;

pub use layout::LayoutKind;
pub use render::{RasterBackend, RenderBackend};

use crate::error::Result;
use crate::frame::RgbaFrame;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

pub type ItemId = u64;

/// Default scale for images placed without an explicit scale
pub const DEFAULT_IMAGE_SCALE: f32 = 0.3;
/// Font size for glyph stickers
pub const STICKER_FONT_SIZE: f32 = 60.0;
/// Rotation applied per transform step
pub const ROTATE_STEP_DEG: f32 = 15.0;

/// Glyphs offered on the sticker shelf; all coverable by a regular
/// TrueType face, so the raster backend can draw them
pub const STICKER_GLYPHS: [&str; 12] = [
    "♥", "★", "✶", "✿", "☾", "☀", "♡", "❀", "✧", "♪", "☁", "✼",
];

/// What a scene item draws
#[derive(Debug, Clone)]
pub enum ItemContent {
    Image(Arc<RgbaFrame>),
    Glyph { glyph: String, font_size: f32 },
}

/// One positioned item on the composition surface
#[derive(Debug, Clone)]
pub struct SceneItem {
    pub id: ItemId,
    pub content: ItemContent,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation_deg: f32,
}

impl SceneItem {
    /// Axis-aligned bounds (x, y, w, h); rotation is ignored for hit
    /// testing, which matches the coarse pointer targets the surface needs
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        match &self.content {
            ItemContent::Image(frame) => (
                self.x,
                self.y,
                frame.width as f32 * self.scale,
                frame.height as f32 * self.scale,
            ),
            ItemContent::Glyph { font_size, .. } => (self.x, self.y, *font_size, *font_size),
        }
    }
}

/// Operations on the currently selected item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    RotateStep,
    Delete,
}

/// Result of a transform request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    Applied,
    NothingSelected,
}

/// Flatten parameters
#[derive(Debug, Clone, Copy)]
pub struct FlattenOptions {
    /// Output resolution multiplier relative to the on-screen canvas
    pub multiplier: u32,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self { multiplier: 2 }
    }
}

/// The transient composition session state
pub struct SceneGraph {
    width: u32,
    height: u32,
    background: [u8; 4],
    items: Vec<SceneItem>,
    active: Option<ItemId>,
    next_id: ItemId,
}

impl SceneGraph {
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            width,
            height,
            background,
            items: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> [u8; 4] {
        self.background
    }

    /// Items in z-order, bottom first
    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn active_id(&self) -> Option<ItemId> {
        self.active
    }

    /// Place an image item. Omitted position scatters it inside the
    /// central band so stacked items don't fully overlap; omitted scale
    /// uses [`DEFAULT_IMAGE_SCALE`]. The new item becomes selected.
    pub fn add_image(
        &mut self,
        frame: Arc<RgbaFrame>,
        position: Option<(f32, f32)>,
        scale: Option<f32>,
    ) -> ItemId {
        let (x, y) = position.unwrap_or_else(|| self.scatter_position());
        let scale = scale.unwrap_or(DEFAULT_IMAGE_SCALE);
        self.push_item(ItemContent::Image(frame), x, y, scale, 0.0)
    }

    /// Place a glyph sticker near the canvas center with small jitter
    pub fn add_sticker(&mut self, glyph: &str) -> ItemId {
        let mut rng = rand::thread_rng();
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;
        let x = cx + rng.gen::<f32>() * 100.0 - 50.0;
        let y = cy + rng.gen::<f32>() * 100.0 - 50.0;
        self.push_item(
            ItemContent::Glyph {
                glyph: glyph.to_string(),
                font_size: STICKER_FONT_SIZE,
            },
            x,
            y,
            1.0,
            0.0,
        )
    }

    fn push_item(
        &mut self,
        content: ItemContent,
        x: f32,
        y: f32,
        scale: f32,
        rotation_deg: f32,
    ) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(SceneItem {
            id,
            content,
            x,
            y,
            scale,
            rotation_deg,
        });
        self.active = Some(id);
        id
    }

    fn scatter_position(&self) -> (f32, f32) {
        let mut rng = rand::thread_rng();
        let margin = self.width as f32 / 8.0;
        let band = self.width as f32 / 2.0;
        (
            margin + rng.gen::<f32>() * band,
            margin + rng.gen::<f32>() * band,
        )
    }

    /// Clear the canvas and re-place the given frames per the template.
    /// Frames beyond a grid's capacity are silently dropped. Returns the
    /// number of items placed.
    pub fn apply_layout(&mut self, kind: LayoutKind, frames: &[Arc<RgbaFrame>]) -> usize {
        self.clear();

        let placements = layout::placements(kind, self.width, self.height, frames.len());
        let placed = placements.len();

        for (frame, p) in frames.iter().zip(placements) {
            self.push_item(
                ItemContent::Image(Arc::clone(frame)),
                p.x,
                p.y,
                p.scale,
                p.rotation_deg,
            );
        }
        self.active = None;

        if placed < frames.len() {
            debug!(
                "Layout {} holds {} items; dropped {}",
                kind.name(),
                placed,
                frames.len() - placed
            );
        }

        placed
    }

    /// Apply a layout by wire name; an unknown name leaves the canvas
    /// unchanged rather than failing
    pub fn apply_layout_named(&mut self, name: &str, frames: &[Arc<RgbaFrame>]) -> usize {
        match LayoutKind::from_name(name) {
            Some(kind) => self.apply_layout(kind, frames),
            None => {
                debug!("Unknown layout '{}'; canvas unchanged", name);
                self.items.len()
            }
        }
    }

    /// Select the topmost item containing the point, if any
    pub fn select_at(&mut self, x: f32, y: f32) -> Option<ItemId> {
        let hit = self.hit_test(x, y);
        self.active = hit;
        hit
    }

    /// Topmost item whose bounds contain the point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ItemId> {
        self.items.iter().rev().find_map(|item| {
            let (ix, iy, w, h) = item.bounds();
            if x >= ix && x < ix + w && y >= iy && y < iy + h {
                Some(item.id)
            } else {
                None
            }
        })
    }

    pub fn select(&mut self, id: ItemId) -> bool {
        if self.items.iter().any(|i| i.id == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.active = None;
    }

    /// Rotate or delete the selected item; reports when nothing is
    /// selected so the caller can surface a notice
    pub fn transform_active(&mut self, op: TransformOp) -> TransformOutcome {
        let Some(active) = self.active else {
            return TransformOutcome::NothingSelected;
        };

        match op {
            TransformOp::RotateStep => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id == active) {
                    item.rotation_deg = (item.rotation_deg + ROTATE_STEP_DEG) % 360.0;
                }
            }
            TransformOp::Delete => {
                self.items.retain(|i| i.id != active);
                self.active = None;
            }
        }

        TransformOutcome::Applied
    }

    /// Remove all items and reset selection; the background stays
    pub fn clear(&mut self) {
        self.items.clear();
        self.active = None;
    }

    /// Deselect and render the whole composition to one raster.
    ///
    /// Deselection happens first so selection state can never leak into
    /// the output; this is the only operation producing a persistable
    /// image.
    pub fn flatten(
        &mut self,
        backend: &dyn RenderBackend,
        options: FlattenOptions,
    ) -> Result<RgbaFrame> {
        self.deselect();
        backend.render(self, options.multiplier.max(1))
    }
}
