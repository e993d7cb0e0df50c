//! The per-pixel arithmetic behind each filter.
//!
//! Recipes operate on raw RGBA bytes in place. Channel math is done in
//! f32 with an explicit clamp back to [0, 255] at every store, so extreme
//! inputs can never wrap.

use super::FilterKind;
use rand::Rng;

#[inline]
fn clamp(v: f32) -> f32 {
    v.clamp(0.0, 255.0)
}

pub(super) fn run(kind: FilterKind, data: &mut [u8]) {
    match kind {
        FilterKind::GoldenHour => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.25 + 25.0) as u8;
                px[1] = clamp(px[1] as f32 * 1.15 + 15.0) as u8;
                px[2] = clamp(px[2] as f32 * 0.75) as u8;
            }
        }

        FilterKind::SoftDream => {
            // Lift all channels, then soften contrast toward the average
            for px in data.chunks_exact_mut(4) {
                let r = clamp(px[0] as f32 * 1.1 + 30.0);
                let g = clamp(px[1] as f32 * 1.08 + 25.0);
                let b = clamp(px[2] as f32 * 1.05 + 20.0);
                let avg = (r + g + b) / 3.0;
                px[0] = clamp(r * 0.7 + avg * 0.3) as u8;
                px[1] = clamp(g * 0.7 + avg * 0.3) as u8;
                px[2] = clamp(b * 0.7 + avg * 0.3) as u8;
            }
        }

        FilterKind::BlueVelvet => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 0.85) as u8;
                px[1] = clamp(px[1] as f32 * 0.95 + 10.0) as u8;
                px[2] = clamp(px[2] as f32 * 1.2 + 20.0) as u8;
            }
        }

        FilterKind::DustyFilm => {
            // Desaturate toward a warmed average, then add shared grain
            let mut rng = rand::thread_rng();
            for px in data.chunks_exact_mut(4) {
                let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
                let noise = (rng.gen::<f32>() - 0.5) * 25.0;
                px[0] = clamp(avg * 1.1 + 15.0 + noise) as u8;
                px[1] = clamp(avg + 10.0 + noise) as u8;
                px[2] = clamp(avg * 0.85 + noise) as u8;
            }
        }

        FilterKind::RoseGlow => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.2 + 30.0) as u8;
                px[1] = clamp(px[1] as f32 + 10.0) as u8;
                px[2] = clamp(px[2] as f32 * 1.05 + 15.0) as u8;
            }
        }

        FilterKind::Dreamy => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.12 + 20.0) as u8;
                px[1] = clamp(px[1] as f32 * 1.05 + 12.0) as u8;
                px[2] = clamp(px[2] as f32 * 0.95 + 8.0) as u8;
            }
        }

        FilterKind::WarmFilm => {
            for px in data.chunks_exact_mut(4) {
                let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
                px[0] = clamp(avg * 1.15 + 20.0) as u8;
                px[1] = clamp(avg + 10.0) as u8;
                px[2] = clamp(avg * 0.8) as u8;
            }
        }

        FilterKind::PinkHaze => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.25 + 35.0) as u8;
                px[1] = clamp(px[1] as f32 * 0.95 + 5.0) as u8;
                px[2] = clamp(px[2] as f32 * 1.1 + 20.0) as u8;
            }
        }

        FilterKind::VintageGrain => {
            let mut rng = rand::thread_rng();
            for px in data.chunks_exact_mut(4) {
                let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
                let grain = (rng.gen::<f32>() - 0.5) * 30.0;
                px[0] = clamp(avg * 1.05 + grain) as u8;
                px[1] = clamp(avg * 0.95 + grain) as u8;
                px[2] = clamp(avg * 0.85 + grain) as u8;
            }
        }

        FilterKind::AngelGlow => {
            for px in data.chunks_exact_mut(4) {
                let r = clamp(px[0] as f32 * 1.3 + 40.0);
                let g = clamp(px[1] as f32 * 1.25 + 35.0);
                let b = clamp(px[2] as f32 * 1.2 + 30.0);
                let avg = (r + g + b) / 3.0;
                px[0] = clamp(r * 0.6 + avg * 0.4) as u8;
                px[1] = clamp(g * 0.6 + avg * 0.4) as u8;
                px[2] = clamp(b * 0.6 + avg * 0.4) as u8;
            }
        }

        FilterKind::MoodyBlue => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 0.7) as u8;
                px[1] = clamp(px[1] as f32 * 0.9 + 5.0) as u8;
                px[2] = clamp(px[2] as f32 * 1.3 + 25.0) as u8;
            }
        }

        FilterKind::LavenderDream => {
            for px in data.chunks_exact_mut(4) {
                let r = clamp(px[0] as f32 * 1.15 + 25.0);
                let g = clamp(px[1] as f32 + 10.0);
                let b = clamp(px[2] as f32 * 1.25 + 35.0);
                let avg = (r + g + b) / 3.0;
                px[0] = clamp(r * 0.75 + avg * 0.25) as u8;
                px[1] = clamp(g * 0.75 + avg * 0.25) as u8;
                px[2] = clamp(b * 0.75 + avg * 0.25) as u8;
            }
        }

        FilterKind::PeachCream => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.2 + 30.0) as u8;
                px[1] = clamp(px[1] as f32 * 1.1 + 20.0) as u8;
                px[2] = clamp(px[2] as f32 * 0.9 + 5.0) as u8;
            }
        }

        FilterKind::MintFrost => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 0.95 + 10.0) as u8;
                px[1] = clamp(px[1] as f32 * 1.15 + 20.0) as u8;
                px[2] = clamp(px[2] as f32 * 1.1 + 15.0) as u8;
            }
        }

        FilterKind::SunsetAmber => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.3 + 35.0) as u8;
                px[1] = clamp(px[1] as f32 * 1.15 + 20.0) as u8;
                px[2] = clamp(px[2] as f32 * 0.6) as u8;
            }
        }

        FilterKind::VelvetNoir => {
            // Darken, then split contrast on the darkened luminance
            for px in data.chunks_exact_mut(4) {
                let r = clamp(px[0] as f32 * 0.6);
                let g = clamp(px[1] as f32 * 0.65);
                let b = clamp(px[2] as f32 * 0.7 + 10.0);
                let avg = (r + g + b) / 3.0;
                let gain = if avg > 128.0 { 1.1 } else { 0.8 };
                px[0] = clamp(r * gain) as u8;
                px[1] = clamp(g * gain) as u8;
                px[2] = clamp(b * gain) as u8;
            }
        }

        FilterKind::PearlShimmer => {
            // Phase runs over the byte offset, giving a slow iridescent band
            for (p, px) in data.chunks_exact_mut(4).enumerate() {
                let shimmer = ((p * 4) as f32 * 0.01).sin() * 15.0;
                px[0] = clamp(clamp(px[0] as f32 * 1.25 + 30.0) + shimmer) as u8;
                px[1] = clamp(clamp(px[1] as f32 * 1.2 + 28.0) + shimmer) as u8;
                px[2] = clamp(clamp(px[2] as f32 * 1.18 + 25.0) + shimmer) as u8;
            }
        }

        FilterKind::CherryBlossom => {
            for px in data.chunks_exact_mut(4) {
                px[0] = clamp(px[0] as f32 * 1.18 + 28.0) as u8;
                px[1] = clamp(px[1] as f32 * 1.05 + 15.0) as u8;
                px[2] = clamp(px[2] as f32 * 1.12 + 20.0) as u8;
            }
        }
    }
}
