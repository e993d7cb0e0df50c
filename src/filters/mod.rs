//! Per-pixel color filter engine.
//!
//! Every filter is a fixed single-pass arithmetic recipe over (R, G, B);
//! alpha always passes through unchanged and every output channel is
//! clamped to [0, 255]. Filters are stateless and repeatable, with two
//! documented exceptions: [`FilterKind::DustyFilm`] and
//! [`FilterKind::VintageGrain`] inject per-pixel random grain and are
//! therefore exempt from the byte-identical repeatability guarantee.
//!
//! Unknown filter names degrade to the identity transform rather than
//! failing; a bad selection is a low-stakes cosmetic choice, not a
//! structural contract.

mod recipes;

use crate::frame::RgbaFrame;
use tracing::debug;

/// Named filter recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    GoldenHour,
    SoftDream,
    BlueVelvet,
    DustyFilm,
    RoseGlow,
    Dreamy,
    WarmFilm,
    PinkHaze,
    VintageGrain,
    AngelGlow,
    MoodyBlue,
    LavenderDream,
    PeachCream,
    MintFrost,
    SunsetAmber,
    VelvetNoir,
    PearlShimmer,
    CherryBlossom,
}

impl FilterKind {
    pub const ALL: [FilterKind; 18] = [
        FilterKind::GoldenHour,
        FilterKind::SoftDream,
        FilterKind::BlueVelvet,
        FilterKind::DustyFilm,
        FilterKind::RoseGlow,
        FilterKind::Dreamy,
        FilterKind::WarmFilm,
        FilterKind::PinkHaze,
        FilterKind::VintageGrain,
        FilterKind::AngelGlow,
        FilterKind::MoodyBlue,
        FilterKind::LavenderDream,
        FilterKind::PeachCream,
        FilterKind::MintFrost,
        FilterKind::SunsetAmber,
        FilterKind::VelvetNoir,
        FilterKind::PearlShimmer,
        FilterKind::CherryBlossom,
    ];

    /// Look up a filter by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Stable wire name used in configuration and session state
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::GoldenHour => "golden-hour",
            FilterKind::SoftDream => "soft-dream",
            FilterKind::BlueVelvet => "blue-velvet",
            FilterKind::DustyFilm => "dusty-film",
            FilterKind::RoseGlow => "rose-glow",
            FilterKind::Dreamy => "dreamy",
            FilterKind::WarmFilm => "warm-film",
            FilterKind::PinkHaze => "pink-haze",
            FilterKind::VintageGrain => "vintage-grain",
            FilterKind::AngelGlow => "angel-glow",
            FilterKind::MoodyBlue => "moody-blue",
            FilterKind::LavenderDream => "lavender-dream",
            FilterKind::PeachCream => "peach-cream",
            FilterKind::MintFrost => "mint-frost",
            FilterKind::SunsetAmber => "sunset-amber",
            FilterKind::VelvetNoir => "velvet-noir",
            FilterKind::PearlShimmer => "pearl-shimmer",
            FilterKind::CherryBlossom => "cherry-blossom",
        }
    }

    /// Human-facing filter name
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterKind::GoldenHour => "Golden Hour",
            FilterKind::SoftDream => "Soft Dream",
            FilterKind::BlueVelvet => "Blue Velvet",
            FilterKind::DustyFilm => "Dusty Film",
            FilterKind::RoseGlow => "Rose Glow",
            FilterKind::Dreamy => "Dreamy Soft",
            FilterKind::WarmFilm => "Warm Vintage",
            FilterKind::PinkHaze => "Soft Pink",
            FilterKind::VintageGrain => "Film Grain",
            FilterKind::AngelGlow => "Angel Glow",
            FilterKind::MoodyBlue => "Moody Blue",
            FilterKind::LavenderDream => "Lavender Dream",
            FilterKind::PeachCream => "Peach Cream",
            FilterKind::MintFrost => "Mint Frost",
            FilterKind::SunsetAmber => "Sunset Amber",
            FilterKind::VelvetNoir => "Velvet Noir",
            FilterKind::PearlShimmer => "Pearl Shimmer",
            FilterKind::CherryBlossom => "Cherry Blossom",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FilterKind::GoldenHour => "Warm glowing sunset tone",
            FilterKind::SoftDream => "Creamy blur with haze",
            FilterKind::BlueVelvet => "Cool moody lighting",
            FilterKind::DustyFilm => "Vintage fade with grain",
            FilterKind::RoseGlow => "Soft pink highlight",
            FilterKind::Dreamy => "Ethereal romantic glow",
            FilterKind::WarmFilm => "Sepia autumn warmth",
            FilterKind::PinkHaze => "Dreamy pink filter",
            FilterKind::VintageGrain => "Classic film texture",
            FilterKind::AngelGlow => "Heavenly soft light",
            FilterKind::MoodyBlue => "Deep blue atmosphere",
            FilterKind::LavenderDream => "Soft purple romantic haze",
            FilterKind::PeachCream => "Warm peachy glow",
            FilterKind::MintFrost => "Cool mint fresh tone",
            FilterKind::SunsetAmber => "Rich golden amber glow",
            FilterKind::VelvetNoir => "Dramatic dark elegance",
            FilterKind::PearlShimmer => "Iridescent pearl effect",
            FilterKind::CherryBlossom => "Delicate spring pink",
        }
    }

    /// Whether repeated application to identical input is byte-identical.
    /// The grain filters inject per-pixel noise and are exempt.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, FilterKind::DustyFilm | FilterKind::VintageGrain)
    }
}

/// Apply a named filter to a frame; unknown names are the identity transform
pub fn apply_named(frame: &RgbaFrame, name: &str) -> RgbaFrame {
    match FilterKind::from_name(name) {
        Some(kind) => apply(kind, frame),
        None => {
            debug!("Unknown filter '{}'; passing frame through unchanged", name);
            frame.clone()
        }
    }
}

/// Apply a filter, producing a new frame with identical dimensions
pub fn apply(kind: FilterKind, frame: &RgbaFrame) -> RgbaFrame {
    let mut out = frame.clone();
    recipes::run(kind, &mut out.data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RgbaFrame;

    fn extremes_frame() -> RgbaFrame {
        // Alternate all-zero and all-max pixels to probe both channel extremes
        let mut data = Vec::new();
        for i in 0..64 {
            if i % 2 == 0 {
                data.extend_from_slice(&[0, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[255, 255, 255, 255]);
            }
        }
        RgbaFrame::new(8, 8, data).unwrap()
    }

    #[test]
    fn test_all_filters_clamp_at_extremes() {
        let frame = extremes_frame();
        for kind in FilterKind::ALL {
            let out = apply(kind, &frame);
            assert_eq!(out.width, frame.width);
            assert_eq!(out.height, frame.height);
            // u8 storage already bounds the channels; the meaningful check
            // is that dark pixels stay dark-ish and bright pixels stay
            // bright-ish, i.e. no wrap-around artifacts.
            for (i, px) in out.data.chunks_exact(4).enumerate() {
                let input_was_black = i % 2 == 0;
                for c in &px[..3] {
                    if input_was_black {
                        assert!(*c <= 64, "{}: black wrapped to {}", kind.name(), c);
                    } else {
                        assert!(*c >= 128, "{}: white wrapped to {}", kind.name(), c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_alpha_passes_through() {
        let mut data = vec![0u8; 16 * 4];
        for (i, px) in data.chunks_exact_mut(4).enumerate() {
            px[0] = 200;
            px[1] = 120;
            px[2] = 40;
            px[3] = (i * 16) as u8;
        }
        let frame = RgbaFrame::new(4, 4, data).unwrap();

        for kind in FilterKind::ALL {
            let out = apply(kind, &frame);
            for (a, b) in frame
                .data
                .chunks_exact(4)
                .zip(out.data.chunks_exact(4))
            {
                assert_eq!(a[3], b[3], "{} touched alpha", kind.name());
            }
        }
    }

    #[test]
    fn test_deterministic_filters_are_repeatable() {
        let frame = extremes_frame();
        for kind in FilterKind::ALL.iter().filter(|k| k.is_deterministic()) {
            let first = apply(*kind, &frame);
            let second = apply(*kind, &frame);
            assert_eq!(first.data, second.data, "{} not repeatable", kind.name());
        }
    }

    #[test]
    fn test_unknown_filter_is_identity() {
        let frame = extremes_frame();
        let out = apply_named(&frame, "no-such-filter");
        assert_eq!(out.data, frame.data);
    }

    #[test]
    fn test_known_filter_changes_midtones() {
        let frame = RgbaFrame::filled(8, 8, [100, 100, 100, 255]);
        let out = apply_named(&frame, "golden-hour");
        // 100 * 1.25 + 25 = 150
        assert_eq!(out.pixel(0, 0)[0], 150);
        // 100 * 0.75 = 75
        assert_eq!(out.pixel(0, 0)[2], 75);
    }

    #[test]
    fn test_filter_name_round_trip() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FilterKind::from_name("sparkle-pony"), None);
    }
}
