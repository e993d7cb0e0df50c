pub mod config;
pub mod error;
pub mod events;
pub mod frame;
pub mod filters;
pub mod camera;
pub mod sequencer;
pub mod editor;
pub mod compose;
pub mod strip;
pub mod store;
pub mod gallery;
pub mod export;
pub mod ambient;
pub mod app;

pub use config::{AnimationPrefs, BoothConfig};
pub use error::{BoothError, Result};
pub use events::{BoothEvent, EventBus};
pub use frame::{EncodedImage, ImageEncoding, RgbaFrame};
pub use filters::FilterKind;
pub use camera::{FrameSource, ResolutionHint, SyntheticCamera};
pub use sequencer::{CaptureSequencer, Clock, ManualClock, SessionState, TokioClock};
pub use editor::{apply_edit, CropRect, EditSettings};
pub use compose::{
    FlattenOptions, ItemContent, LayoutKind, RasterBackend, RenderBackend, SceneGraph, SceneItem,
    TransformOp, TransformOutcome,
};
pub use strip::{StripPhoto, StripRenderer, StripTheme};
pub use store::{Memory, MemoryPatch, MemoryStore, Mood};
pub use gallery::{GalleryFilter, GallerySummary};
pub use export::{ExportOutcome, Exporter, NoShareSink, ShareSink};
pub use ambient::{AffirmationRotator, CuePlayer, SoundCue, TracingCuePlayer};
pub use app::{BoothOrchestrator, ComponentState, PendingPhoto};
