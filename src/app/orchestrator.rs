use super::types::{ComponentState, PendingPhoto};
use crate::camera::{FrameSource, ResolutionHint};
use crate::compose::{FlattenOptions, LayoutKind, RasterBackend, SceneGraph, TransformOutcome};
use crate::editor::{apply_edit, EditSettings};
use crate::config::{parse_hex_color, AnimationPrefs, BoothConfig};
use crate::error::Result;
use crate::events::{BoothEvent, EventBus};
use crate::export::{ExportOutcome, Exporter, ShareSink};
use crate::frame::RgbaFrame;
use crate::gallery::{self, GalleryFilter, GallerySummary};
use crate::sequencer::{CaptureSequencer, Clock};
use crate::store::{Memory, MemoryPatch, MemoryStore, Mood};
use crate::strip::{StripPhoto, StripRenderer, StripTheme};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Coordinates the booth components: capture sessions, composition,
/// persistence and export.
///
/// The orchestrator keeps an in-memory projection of the store for the
/// gallery views. The projection is only mutated after a store operation
/// confirms success, so a failed save or delete can never surface phantom
/// records.
pub struct BoothOrchestrator {
    config: BoothConfig,
    event_bus: Arc<EventBus>,
    store: MemoryStore,
    prefs: RwLock<AnimationPrefs>,
    memories: RwLock<Vec<Memory>>,
    component_states: Arc<Mutex<HashMap<String, ComponentState>>>,
}

impl BoothOrchestrator {
    /// Create an orchestrator backed by the configured database path
    pub fn new(config: BoothConfig) -> Result<Self> {
        let store = MemoryStore::open(&config.storage.database_path)?;
        Self::with_store(config, store)
    }

    /// Create an orchestrator over an explicit store (tests use an
    /// in-memory one)
    pub fn with_store(config: BoothConfig, store: MemoryStore) -> Result<Self> {
        let prefs = AnimationPrefs::load(&config.storage.prefs_path)?;
        let event_bus = Arc::new(EventBus::new(config.system.event_bus_capacity));

        Ok(Self {
            config,
            event_bus,
            store,
            prefs: RwLock::new(prefs),
            memories: RwLock::new(Vec::new()),
            component_states: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn config(&self) -> &BoothConfig {
        &self.config
    }

    pub async fn animation_prefs(&self) -> AnimationPrefs {
        self.prefs.read().await.clone()
    }

    pub async fn set_animation_prefs(&self, prefs: AnimationPrefs) {
        *self.prefs.write().await = prefs;
    }

    /// Load the gallery projection from the store
    pub async fn initialize(&self) -> Result<()> {
        self.set_component_state("store", ComponentState::Starting)
            .await;

        let memories = self.store.load_all().await?;
        info!("Loaded {} memories from the store", memories.len());
        *self.memories.write().await = memories;

        self.set_component_state("store", ComponentState::Running)
            .await;
        Ok(())
    }

    /// Run one capture session against the given frame source, returning
    /// the filtered stills in shot order
    pub async fn run_capture_session(
        &self,
        source: Box<dyn FrameSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Vec<crate::frame::EncodedImage>> {
        self.set_component_state("capture", ComponentState::Running)
            .await;

        let hint = ResolutionHint {
            width: self.config.camera.width,
            height: self.config.camera.height,
        };
        let mut sequencer = CaptureSequencer::new(
            self.config.session.clone(),
            hint,
            source,
            clock,
            Arc::clone(&self.event_bus),
        );

        let result = sequencer.run().await;

        let state = if result.is_ok() {
            ComponentState::Stopped
        } else {
            ComponentState::Failed
        };
        self.set_component_state("capture", state).await;

        result
    }

    /// Persist pending photos as memories. The projection is updated only
    /// after the batch commits.
    pub async fn save_photos(&self, photos: Vec<PendingPhoto>) -> Result<Vec<Memory>> {
        let mut records = Vec::with_capacity(photos.len());
        for photo in photos {
            let mut memory = Memory::new(photo.image.to_data_uri(), photo.caption);
            memory.reflection = photo.reflection;
            memory.mood = photo.mood;
            records.push(memory);
        }

        self.store.save_all(records.clone()).await?;

        {
            let mut cache = self.memories.write().await;
            for record in records.iter().rev() {
                cache.insert(0, record.clone());
            }
        }

        self.event_bus.publish(BoothEvent::MemoriesSaved {
            count: records.len(),
            timestamp: SystemTime::now(),
        });

        Ok(records)
    }

    /// Render the session stills as a themed strip and export it
    pub async fn export_strip(
        &self,
        stills: &[crate::frame::EncodedImage],
        captions: &[String],
        exporter: &Exporter,
    ) -> Result<std::path::PathBuf> {
        let theme =
            StripTheme::from_name(&self.config.strip.theme).unwrap_or(StripTheme::VintageRose);

        let suggestions = theme.caption_suggestions();
        let mut photos = Vec::with_capacity(stills.len());
        for (i, still) in stills.iter().enumerate() {
            let caption = captions
                .get(i)
                .cloned()
                .unwrap_or_else(|| suggestions[i % suggestions.len()].to_string());
            photos.push(StripPhoto {
                frame: Arc::new(still.decode()?),
                caption,
            });
        }

        let renderer = StripRenderer::with_font_file(&self.config.canvas.font_path);
        let strip = renderer.render(&photos, theme)?;
        let encoded = strip.encode_png()?;
        let path = exporter.download(&encoded, "memories").await?;

        self.event_bus.publish(BoothEvent::ExportCompleted {
            path: path.display().to_string(),
            timestamp: SystemTime::now(),
        });

        Ok(path)
    }

    /// Build a collage from stored memories, flatten it, persist it as a
    /// new memory and offer it to the share sink
    pub async fn make_collage(
        &self,
        memory_ids: &[String],
        layout: &str,
        stickers: &[&str],
        sink: &dyn ShareSink,
        exporter: &Exporter,
    ) -> Result<(Memory, ExportOutcome)> {
        let background = parse_hex_color(&self.config.canvas.background)
            .unwrap_or([0xe8, 0xdc, 0xd9, 255]);
        let mut scene = SceneGraph::new(
            self.config.canvas.width,
            self.config.canvas.height,
            background,
        );

        let frames = {
            let cache = self.memories.read().await;
            let mut frames = Vec::new();
            for id in memory_ids {
                let Some(memory) = cache.iter().find(|m| &m.id == id) else {
                    warn!("Collage selection skipped missing memory {}", id);
                    continue;
                };
                let encoded = crate::frame::EncodedImage::from_data_uri(&memory.image)?;
                frames.push(Arc::new(encoded.decode()?));
            }
            frames
        };

        match LayoutKind::from_name(layout) {
            Some(kind) => {
                scene.apply_layout(kind, &frames);
            }
            None => {
                debug!("Unknown layout '{}'; placing freeform", layout);
                for frame in &frames {
                    scene.add_image(Arc::clone(frame), None, None);
                }
            }
        }

        for sticker in stickers {
            scene.add_sticker(sticker);
        }

        let backend = RasterBackend::with_font_file(&self.config.canvas.font_path);
        let raster = scene.flatten(
            &backend,
            FlattenOptions {
                multiplier: self.config.canvas.export_multiplier,
            },
        )?;

        let encoded = raster.encode_png()?;
        let share_payload = raster.encode_jpeg(self.config.export.share_jpeg_quality)?;

        let mut memory = Memory::new(encoded.to_data_uri(), "My Beautiful Collage");
        memory.reflection = Some("Created with the collage maker".to_string());
        self.store.save_all(vec![memory.clone()]).await?;
        {
            let mut cache = self.memories.write().await;
            cache.insert(0, memory.clone());
        }
        self.event_bus.publish(BoothEvent::MemoriesSaved {
            count: 1,
            timestamp: SystemTime::now(),
        });

        let outcome = exporter
            .share_or_download(sink, &share_payload, "My Memory Collage", "collage")
            .await?;
        if let ExportOutcome::Downloaded(path) = &outcome {
            self.event_bus.publish(BoothEvent::ExportCompleted {
                path: path.display().to_string(),
                timestamp: SystemTime::now(),
            });
        }

        Ok((memory, outcome))
    }

    /// Apply an edit pass to a pending photo before it becomes a memory;
    /// the only sanctioned mutation of an image payload
    pub fn edit_pending(&self, photo: &mut PendingPhoto, settings: &EditSettings) -> Result<()> {
        let frame = photo.image.decode()?;
        let edited = apply_edit(&frame, settings)?;
        photo.image = edited.encode_jpeg(self.config.session.still_jpeg_quality)?;
        Ok(())
    }

    /// Relay a composition-surface transform outcome; a transform with no
    /// selection surfaces a notice instead of erroring
    pub fn report_transform(&self, outcome: TransformOutcome) {
        if outcome == TransformOutcome::NothingSelected {
            self.event_bus.publish(BoothEvent::CanvasNotice {
                message: "Select an item first".to_string(),
            });
        }
    }

    /// Toggle a memory's favorite flag, confirming with the store before
    /// touching the projection
    pub async fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let current = {
            let cache = self.memories.read().await;
            cache
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.is_favorite)
                .unwrap_or(false)
        };
        let target = !current;

        let updated = self
            .store
            .update_fields(id, MemoryPatch::favorite(target))
            .await?;

        {
            let mut cache = self.memories.write().await;
            if let Some(memory) = cache.iter_mut().find(|m| m.id == id) {
                *memory = updated.clone();
            }
        }

        self.event_bus.publish(BoothEvent::FavoriteToggled {
            id: id.to_string(),
            is_favorite: target,
        });

        Ok(target)
    }

    /// Update caption/reflection/mood on a memory
    pub async fn update_memory(&self, id: &str, patch: MemoryPatch) -> Result<Memory> {
        let updated = self.store.update_fields(id, patch).await?;
        {
            let mut cache = self.memories.write().await;
            if let Some(memory) = cache.iter_mut().find(|m| m.id == id) {
                *memory = updated.clone();
            }
        }
        Ok(updated)
    }

    /// Delete a memory; the projection drops the record only after the
    /// store confirms
    pub async fn delete_memory(&self, id: &str) -> Result<()> {
        self.store.delete_one(id).await?;

        {
            let mut cache = self.memories.write().await;
            cache.retain(|m| m.id != id);
        }

        self.event_bus.publish(BoothEvent::MemoryDeleted {
            id: id.to_string(),
        });
        Ok(())
    }

    /// Journal projection over the cached memories
    pub async fn journal(&self, filter: GalleryFilter, mood: Option<Mood>) -> Vec<Memory> {
        let cache = self.memories.read().await;
        gallery::project(&cache, filter, mood)
    }

    pub async fn summary(&self) -> GallerySummary {
        let cache = self.memories.read().await;
        gallery::summarize(&cache)
    }

    /// Persist preferences and mark components stopped
    pub async fn shutdown(&self) -> Result<()> {
        let prefs = self.prefs.read().await.clone();
        if let Err(e) = prefs.save(&self.config.storage.prefs_path) {
            warn!("Could not persist animation preferences: {}", e);
        }

        self.set_component_state("store", ComponentState::Stopped)
            .await;
        info!("Booth shut down");
        Ok(())
    }

    /// Update component state
    pub async fn set_component_state(&self, component: &str, state: ComponentState) {
        let mut states = self.component_states.lock().await;
        debug!("Component '{}' state changed to: {:?}", component, state);
        states.insert(component.to_string(), state);
    }

    /// Get component state
    pub async fn get_component_state(&self, component: &str) -> Option<ComponentState> {
        let states = self.component_states.lock().await;
        states.get(component).cloned()
    }
}

/// Decode a stored memory image back into a frame, for the edit pass
pub fn decode_memory_image(memory: &Memory) -> Result<RgbaFrame> {
    crate::frame::EncodedImage::from_data_uri(&memory.image)?.decode()
}

impl std::fmt::Debug for BoothOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoothOrchestrator")
            .field("database", &self.config.storage.database_path)
            .finish()
    }
}
