use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BoothConfig {
    pub camera: CameraConfig,
    pub session: SessionConfig,
    pub canvas: CanvasConfig,
    pub strip: StripConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Preferred capture width in pixels (resolution hint, not a guarantee)
    #[serde(default = "default_camera_width")]
    pub width: u32,

    /// Preferred capture height in pixels
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Number of shots per capture session
    #[serde(default = "default_session_shots")]
    pub shots: u32,

    /// Countdown ticks before each shot
    #[serde(default = "default_countdown_ticks")]
    pub countdown_ticks: u32,

    /// Countdown tick cadence in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Settle pause after each shot in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Pause between shots in milliseconds
    #[serde(default = "default_inter_shot_pause_ms")]
    pub inter_shot_pause_ms: u64,

    /// Default filter applied to captured frames
    #[serde(default = "default_filter")]
    pub filter: String,

    /// JPEG quality for captured stills (1-100)
    #[serde(default = "default_still_jpeg_quality")]
    pub still_jpeg_quality: u8,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CanvasConfig {
    /// Composition canvas width in pixels
    #[serde(default = "default_canvas_size")]
    pub width: u32,

    /// Composition canvas height in pixels
    #[serde(default = "default_canvas_size")]
    pub height: u32,

    /// Canvas background color as #rrggbb hex
    #[serde(default = "default_canvas_background")]
    pub background: String,

    /// Resolution multiplier applied when flattening for export
    #[serde(default = "default_export_multiplier")]
    pub export_multiplier: u32,

    /// Path to a TrueType font for sticker glyphs and captions
    #[serde(default = "default_font_path")]
    pub font_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripConfig {
    /// Default strip theme name
    #[serde(default = "default_strip_theme")]
    pub theme: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Path to the embedded memory database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Path to the persisted animation preferences file
    #[serde(default = "default_prefs_path")]
    pub prefs_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportConfig {
    /// Directory for downloaded exports
    #[serde(default = "default_export_dir")]
    pub dir: String,

    /// JPEG quality for the share path (1-100)
    #[serde(default = "default_share_jpeg_quality")]
    pub share_jpeg_quality: u8,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

impl BoothConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("photobooth.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("camera.width", default_camera_width())?
            .set_default("camera.height", default_camera_height())?
            .set_default("session.shots", default_session_shots())?
            .set_default("session.countdown_ticks", default_countdown_ticks())?
            .set_default("session.tick_interval_ms", default_tick_interval_ms())?
            .set_default("session.settle_ms", default_settle_ms())?
            .set_default(
                "session.inter_shot_pause_ms",
                default_inter_shot_pause_ms(),
            )?
            .set_default("session.filter", default_filter())?
            .set_default(
                "session.still_jpeg_quality",
                default_still_jpeg_quality() as i64,
            )?
            .set_default("canvas.width", default_canvas_size())?
            .set_default("canvas.height", default_canvas_size())?
            .set_default("canvas.background", default_canvas_background())?
            .set_default("canvas.export_multiplier", default_export_multiplier())?
            .set_default("canvas.font_path", default_font_path())?
            .set_default("strip.theme", default_strip_theme())?
            .set_default("storage.database_path", default_database_path())?
            .set_default("storage.prefs_path", default_prefs_path())?
            .set_default("export.dir", default_export_dir())?
            .set_default(
                "export.share_jpeg_quality",
                default_share_jpeg_quality() as i64,
            )?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            .add_source(File::with_name(&path_str).required(false))
            .add_source(Environment::with_prefix("PHOTOBOOTH").separator("_"))
            .build()?;

        let config: BoothConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::Message(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if self.session.shots == 0 {
            return Err(ConfigError::Message(
                "Session shot count must be greater than 0".to_string(),
            ));
        }

        if self.session.countdown_ticks == 0 {
            return Err(ConfigError::Message(
                "Countdown tick count must be greater than 0".to_string(),
            ));
        }

        if self.session.still_jpeg_quality == 0 || self.session.still_jpeg_quality > 100 {
            return Err(ConfigError::Message(
                "Still JPEG quality must be in 1..=100".to_string(),
            ));
        }

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Message(
                "Canvas dimensions must be greater than 0".to_string(),
            ));
        }

        if self.canvas.export_multiplier == 0 {
            return Err(ConfigError::Message(
                "Export multiplier must be greater than 0".to_string(),
            ));
        }

        if parse_hex_color(&self.canvas.background).is_none() {
            return Err(ConfigError::Message(format!(
                "Canvas background '{}' is not a #rrggbb color",
                self.canvas.background
            )));
        }

        if self.export.share_jpeg_quality == 0 || self.export.share_jpeg_quality > 100 {
            return Err(ConfigError::Message(
                "Share JPEG quality must be in 1..=100".to_string(),
            ));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                width: default_camera_width(),
                height: default_camera_height(),
            },
            session: SessionConfig {
                shots: default_session_shots(),
                countdown_ticks: default_countdown_ticks(),
                tick_interval_ms: default_tick_interval_ms(),
                settle_ms: default_settle_ms(),
                inter_shot_pause_ms: default_inter_shot_pause_ms(),
                filter: default_filter(),
                still_jpeg_quality: default_still_jpeg_quality(),
            },
            canvas: CanvasConfig {
                width: default_canvas_size(),
                height: default_canvas_size(),
                background: default_canvas_background(),
                export_multiplier: default_export_multiplier(),
                font_path: default_font_path(),
            },
            strip: StripConfig {
                theme: default_strip_theme(),
            },
            storage: StorageConfig {
                database_path: default_database_path(),
                prefs_path: default_prefs_path(),
            },
            export: ExportConfig {
                dir: default_export_dir(),
                share_jpeg_quality: default_share_jpeg_quality(),
            },
            system: SystemConfig {
                event_bus_capacity: default_event_bus_capacity(),
            },
        }
    }
}

/// Parse a #rrggbb hex string into RGBA bytes (alpha forced opaque).
pub fn parse_hex_color(hex: &str) -> Option<[u8; 4]> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b, 255])
}

/// Process-wide decorative-animation preferences, persisted across runs.
///
/// Decorative consumers receive this by injection; the speed multiplier
/// stays within [0.1, 3.0] and `adjust_duration` collapses to zero whenever
/// animation is effectively off.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnimationPrefs {
    #[serde(default = "default_animation_enabled")]
    pub enabled: bool,

    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f32,

    #[serde(default = "default_respect_reduced_motion")]
    pub respect_reduced_motion: bool,
}

impl Default for AnimationPrefs {
    fn default() -> Self {
        Self {
            enabled: default_animation_enabled(),
            speed_multiplier: default_speed_multiplier(),
            respect_reduced_motion: default_respect_reduced_motion(),
        }
    }
}

impl AnimationPrefs {
    /// Load preferences from a TOML file; a missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "No animation preferences at {}; using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut prefs: AnimationPrefs = toml::from_str(&raw)?;
        prefs.speed_multiplier = prefs.speed_multiplier.clamp(0.1, 3.0);
        Ok(prefs)
    }

    /// Persist preferences; tied to application shutdown.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        debug!("Saved animation preferences to {}", path.display());
        Ok(())
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.clamp(0.1, 3.0);
    }

    /// Whether decorative animation should run given the host's
    /// reduced-motion preference.
    pub fn should_animate(&self, prefers_reduced_motion: bool) -> bool {
        self.enabled && !(self.respect_reduced_motion && prefers_reduced_motion)
    }

    /// Scale a duration by the speed multiplier; zero when animation is off.
    pub fn adjust_duration(&self, duration_ms: u64, prefers_reduced_motion: bool) -> u64 {
        if !self.should_animate(prefers_reduced_motion) {
            return 0;
        }
        (duration_ms as f32 / self.speed_multiplier).round() as u64
    }

    /// Scale a delay by the speed multiplier; zero when animation is off.
    pub fn adjust_delay(&self, delay_ms: u64, prefers_reduced_motion: bool) -> u64 {
        self.adjust_duration(delay_ms, prefers_reduced_motion)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
        warn!("Animation preferences reset to defaults");
    }
}

// Default value functions
fn default_camera_width() -> u32 {
    1280
}
fn default_camera_height() -> u32 {
    720
}

fn default_session_shots() -> u32 {
    4
}
fn default_countdown_ticks() -> u32 {
    3
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_settle_ms() -> u64 {
    500
}
fn default_inter_shot_pause_ms() -> u64 {
    1000
}
fn default_filter() -> String {
    "dreamy".to_string()
}
fn default_still_jpeg_quality() -> u8 {
    70
}

fn default_canvas_size() -> u32 {
    800
}
fn default_canvas_background() -> String {
    "#e8dcd9".to_string()
}
fn default_export_multiplier() -> u32 {
    2
}
fn default_font_path() -> String {
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string()
}

fn default_strip_theme() -> String {
    "vintage-rose".to_string()
}

fn default_database_path() -> String {
    "./booth-data/memories.db".to_string()
}
fn default_prefs_path() -> String {
    "./booth-data/animation.toml".to_string()
}

fn default_export_dir() -> String {
    "./exports".to_string()
}
fn default_share_jpeg_quality() -> u8 {
    90
}

fn default_event_bus_capacity() -> usize {
    100
}

fn default_animation_enabled() -> bool {
    true
}
fn default_speed_multiplier() -> f32 {
    1.0
}
fn default_respect_reduced_motion() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = BoothConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = BoothConfig::default();
        config.session.shots = 0;
        assert!(config.validate().is_err());

        config.session.shots = 4;
        config.canvas.background = "e8dcd9".to_string();
        assert!(config.validate().is_err());

        config.canvas.background = "#e8dcd9".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#e8dcd9"), Some([0xe8, 0xdc, 0xd9, 255]));
        assert_eq!(parse_hex_color("#ffffff"), Some([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("ffffff"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn test_animation_prefs_clamping() {
        let mut prefs = AnimationPrefs::default();
        prefs.set_speed_multiplier(10.0);
        assert_eq!(prefs.speed_multiplier, 3.0);
        prefs.set_speed_multiplier(0.0);
        assert_eq!(prefs.speed_multiplier, 0.1);
    }

    #[test]
    fn test_animation_adjust_duration() {
        let mut prefs = AnimationPrefs::default();
        prefs.set_speed_multiplier(2.0);
        assert_eq!(prefs.adjust_duration(1000, false), 500);

        // Reduced motion wins when respected
        assert_eq!(prefs.adjust_duration(1000, true), 0);

        prefs.respect_reduced_motion = false;
        assert_eq!(prefs.adjust_duration(1000, true), 500);

        prefs.enabled = false;
        assert_eq!(prefs.adjust_duration(1000, false), 0);
    }

    #[test]
    fn test_animation_prefs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("animation.toml");

        let mut prefs = AnimationPrefs::default();
        prefs.enabled = false;
        prefs.set_speed_multiplier(1.5);
        prefs.save(&path).unwrap();

        let loaded = AnimationPrefs::load(&path).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_animation_prefs_missing_file_defaults() {
        let loaded = AnimationPrefs::load("/nonexistent/animation.toml").unwrap();
        assert_eq!(loaded, AnimationPrefs::default());
    }
}
