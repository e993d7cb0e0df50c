//! Fixed layout templates.
//!
//! Cell coordinates are derived arithmetically from the canvas size (for
//! the reference 800x800 canvas: padding 50, 2x2 cells of 350, 3x3 cells
//! of 233). The small, known capacities make fixed cells sufficient; no
//! packing algorithm is involved.

use rand::Rng;

/// Scrapbook tilt angles, cycled per item index
const SCRAPBOOK_ROTATIONS: [f32; 8] = [-8.0, 5.0, -3.0, 7.0, -5.0, 4.0, -6.0, 3.0];

const GRID2_SCALE: f32 = 0.42;
const GRID3_SCALE: f32 = 0.27;
const SCRAPBOOK_BASE_SCALE: f32 = 0.25;
const SCRAPBOOK_SCALE_BAND: f32 = 0.15;

/// Layout template selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Freeform,
    Grid2x2,
    Grid3x3,
    Scrapbook,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Freeform,
        LayoutKind::Grid2x2,
        LayoutKind::Grid3x3,
        LayoutKind::Scrapbook,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "freeform" => Some(LayoutKind::Freeform),
            "grid2x2" => Some(LayoutKind::Grid2x2),
            "grid3x3" => Some(LayoutKind::Grid3x3),
            "scrapbook" => Some(LayoutKind::Scrapbook),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Freeform => "freeform",
            LayoutKind::Grid2x2 => "grid2x2",
            LayoutKind::Grid3x3 => "grid3x3",
            LayoutKind::Scrapbook => "scrapbook",
        }
    }

    /// Maximum items the template can hold; unbounded templates return None
    pub fn capacity(&self) -> Option<usize> {
        match self {
            LayoutKind::Grid2x2 => Some(4),
            LayoutKind::Grid3x3 => Some(9),
            LayoutKind::Freeform | LayoutKind::Scrapbook => None,
        }
    }
}

/// A computed slot for one item
pub(super) struct Placement {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation_deg: f32,
}

/// Compute placements for `count` items on a `width` x `height` canvas.
/// Grid templates return at most their capacity.
pub(super) fn placements(
    kind: LayoutKind,
    width: u32,
    height: u32,
    count: usize,
) -> Vec<Placement> {
    let w = width as f32;
    let h = height as f32;
    let padding = w / 16.0;

    match kind {
        LayoutKind::Freeform => {
            let mut rng = rand::thread_rng();
            let margin = w / 8.0;
            let band = w / 2.0;
            (0..count)
                .map(|_| Placement {
                    x: margin + rng.gen::<f32>() * band,
                    y: margin + rng.gen::<f32>() * band,
                    scale: super::DEFAULT_IMAGE_SCALE,
                    rotation_deg: 0.0,
                })
                .collect()
        }

        LayoutKind::Grid2x2 => {
            let cell = (w - 2.0 * padding) / 2.0;
            let cells = [
                (padding, padding),
                (padding + cell, padding),
                (padding, padding + cell),
                (padding + cell, padding + cell),
            ];
            cells
                .iter()
                .take(count.min(4))
                .map(|&(x, y)| Placement {
                    x,
                    y,
                    scale: GRID2_SCALE,
                    rotation_deg: 0.0,
                })
                .collect()
        }

        LayoutKind::Grid3x3 => {
            let cell = ((w - 2.0 * padding) / 3.0).floor();
            let mut cells = Vec::with_capacity(9);
            for row in 0..3 {
                for col in 0..3 {
                    cells.push((padding + cell * col as f32, padding + cell * row as f32));
                }
            }
            cells
                .iter()
                .take(count.min(9))
                .map(|&(x, y)| Placement {
                    x,
                    y,
                    scale: GRID3_SCALE,
                    rotation_deg: 0.0,
                })
                .collect()
        }

        LayoutKind::Scrapbook => {
            let mut rng = rand::thread_rng();
            let margin = w / 8.0;
            let band_x = w * 5.0 / 8.0;
            let band_y = h * 5.0 / 8.0;
            (0..count)
                .map(|i| Placement {
                    x: margin + rng.gen::<f32>() * band_x,
                    y: margin + rng.gen::<f32>() * band_y,
                    scale: SCRAPBOOK_BASE_SCALE + rng.gen::<f32>() * SCRAPBOOK_SCALE_BAND,
                    rotation_deg: SCRAPBOOK_ROTATIONS[i % SCRAPBOOK_ROTATIONS.len()],
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_name_round_trip() {
        for kind in LayoutKind::ALL {
            assert_eq!(LayoutKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(LayoutKind::from_name("mosaic"), None);
    }

    #[test]
    fn test_grid_capacities() {
        assert_eq!(LayoutKind::Grid2x2.capacity(), Some(4));
        assert_eq!(LayoutKind::Grid3x3.capacity(), Some(9));
        assert_eq!(LayoutKind::Freeform.capacity(), None);
    }

    #[test]
    fn test_grid2x2_reference_cells() {
        let slots = placements(LayoutKind::Grid2x2, 800, 800, 4);
        assert_eq!(slots.len(), 4);
        assert_eq!((slots[0].x, slots[0].y), (50.0, 50.0));
        assert_eq!((slots[1].x, slots[1].y), (400.0, 50.0));
        assert_eq!((slots[2].x, slots[2].y), (50.0, 400.0));
        assert_eq!((slots[3].x, slots[3].y), (400.0, 400.0));
        assert!(slots.iter().all(|s| s.scale == GRID2_SCALE));
    }

    #[test]
    fn test_grid3x3_reference_cells() {
        let slots = placements(LayoutKind::Grid3x3, 800, 800, 9);
        assert_eq!(slots.len(), 9);
        assert_eq!((slots[0].x, slots[0].y), (50.0, 50.0));
        assert_eq!((slots[1].x, slots[1].y), (283.0, 50.0));
        assert_eq!((slots[8].x, slots[8].y), (516.0, 516.0));
    }

    #[test]
    fn test_scrapbook_rotations_cycle() {
        let slots = placements(LayoutKind::Scrapbook, 800, 800, 10);
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0].rotation_deg, -8.0);
        assert_eq!(slots[7].rotation_deg, 3.0);
        // Ninth item wraps back to the first tilt
        assert_eq!(slots[8].rotation_deg, -8.0);
        for s in &slots {
            assert!(s.scale >= SCRAPBOOK_BASE_SCALE);
            assert!(s.scale <= SCRAPBOOK_BASE_SCALE + SCRAPBOOK_SCALE_BAND);
        }
    }
}
