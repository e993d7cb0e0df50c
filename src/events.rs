use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events that can occur in the photo booth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BoothEvent {
    /// A countdown tick before a shot
    CountdownTick {
        shot: u32,
        tick: u32,
        timestamp: SystemTime,
    },
    /// The shutter fired for a shot
    ShutterFired { shot: u32, timestamp: SystemTime },
    /// A filtered still was captured
    ShotCaptured {
        shot: u32,
        total: u32,
        timestamp: SystemTime,
    },
    /// A capture session completed all its shots
    SessionFinished { shots: u32, timestamp: SystemTime },
    /// A capture session failed or was cancelled
    SessionFailed { reason: String, timestamp: SystemTime },
    /// Camera acquisition status changed
    CameraStatusChanged {
        acquired: bool,
        timestamp: SystemTime,
    },
    /// One or more memories were persisted
    MemoriesSaved { count: usize, timestamp: SystemTime },
    /// A memory was deleted from the store
    MemoryDeleted { id: String },
    /// A memory's favorite flag changed
    FavoriteToggled { id: String, is_favorite: bool },
    /// A user-facing notice from the composition surface
    CanvasNotice { message: String },
    /// A flattened composition was exported
    ExportCompleted { path: String, timestamp: SystemTime },
}

impl BoothEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> SystemTime {
        match self {
            BoothEvent::CountdownTick { timestamp, .. } => *timestamp,
            BoothEvent::ShutterFired { timestamp, .. } => *timestamp,
            BoothEvent::ShotCaptured { timestamp, .. } => *timestamp,
            BoothEvent::SessionFinished { timestamp, .. } => *timestamp,
            BoothEvent::SessionFailed { timestamp, .. } => *timestamp,
            BoothEvent::CameraStatusChanged { timestamp, .. } => *timestamp,
            BoothEvent::MemoriesSaved { timestamp, .. } => *timestamp,
            BoothEvent::MemoryDeleted { .. } => SystemTime::now(),
            BoothEvent::FavoriteToggled { .. } => SystemTime::now(),
            BoothEvent::CanvasNotice { .. } => SystemTime::now(),
            BoothEvent::ExportCompleted { timestamp, .. } => *timestamp,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            BoothEvent::CountdownTick { shot, tick, .. } => {
                format!("Countdown for shot {}: {}", shot, tick)
            }
            BoothEvent::ShutterFired { shot, .. } => format!("Shutter fired for shot {}", shot),
            BoothEvent::ShotCaptured { shot, total, .. } => {
                format!("Captured shot {} of {}", shot, total)
            }
            BoothEvent::SessionFinished { shots, .. } => {
                format!("Session finished with {} shots", shots)
            }
            BoothEvent::SessionFailed { reason, .. } => format!("Session failed: {}", reason),
            BoothEvent::CameraStatusChanged { acquired, .. } => {
                format!(
                    "Camera {}",
                    if *acquired { "acquired" } else { "released" }
                )
            }
            BoothEvent::MemoriesSaved { count, .. } => format!("Saved {} memories", count),
            BoothEvent::MemoryDeleted { id } => format!("Deleted memory {}", id),
            BoothEvent::FavoriteToggled { id, is_favorite } => {
                format!(
                    "Memory {} {}",
                    id,
                    if *is_favorite { "favorited" } else { "unfavorited" }
                )
            }
            BoothEvent::CanvasNotice { message } => format!("Canvas notice: {}", message),
            BoothEvent::ExportCompleted { path, .. } => format!("Export completed: {}", path),
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            BoothEvent::CountdownTick { .. } => "countdown_tick",
            BoothEvent::ShutterFired { .. } => "shutter_fired",
            BoothEvent::ShotCaptured { .. } => "shot_captured",
            BoothEvent::SessionFinished { .. } => "session_finished",
            BoothEvent::SessionFailed { .. } => "session_failed",
            BoothEvent::CameraStatusChanged { .. } => "camera_status_changed",
            BoothEvent::MemoriesSaved { .. } => "memories_saved",
            BoothEvent::MemoryDeleted { .. } => "memory_deleted",
            BoothEvent::FavoriteToggled { .. } => "favorite_toggled",
            BoothEvent::CanvasNotice { .. } => "canvas_notice",
            BoothEvent::ExportCompleted { .. } => "export_completed",
        }
    }
}

/// Async event bus for component coordination using broadcast channels.
///
/// Decorative collaborators (sound cues, saved-badge animations) subscribe
/// here; publishing never blocks on them and a bus without subscribers is
/// not an error.
pub struct EventBus {
    sender: broadcast::Sender<BoothEvent>,
    debug_logging: bool,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: false,
        }
    }

    /// Create a new event bus with debug logging enabled
    pub fn with_debug_logging(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: true,
        }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<BoothEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of receivers; a closed or empty bus is reported
    /// as zero rather than an error, since decorative observers are
    /// optional.
    pub fn publish(&self, event: BoothEvent) -> usize {
        if self.debug_logging {
            match serde_json::to_string(&event) {
                Ok(json) => debug!("Publishing event: {}", json),
                Err(_) => debug!("Publishing event: {}", event.description()),
            }
        }

        match &event {
            BoothEvent::SessionFailed { reason, .. } => {
                error!("Capture session failed: {}", reason);
            }
            BoothEvent::SessionFinished { shots, .. } => {
                info!("Capture session finished ({} shots)", shots);
            }
            BoothEvent::CameraStatusChanged { acquired, .. } => {
                if *acquired {
                    info!("Camera acquired");
                } else {
                    info!("Camera released");
                }
            }
            BoothEvent::MemoriesSaved { count, .. } => {
                info!("Saved {} memories", count);
            }
            BoothEvent::CanvasNotice { message } => {
                warn!("Canvas notice: {}", message);
            }
            _ => {
                if self.debug_logging {
                    debug!("Event: {}", event.description());
                }
            }
        }

        self.sender.send(event).unwrap_or(0)
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if there are any active subscribers
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(BoothEvent::MemoryDeleted {
            id: "m1".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "memory_deleted");
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new(16);
        let delivered = bus.publish(BoothEvent::CanvasNotice {
            message: "Select an item first".to_string(),
        });
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_event_descriptions() {
        let event = BoothEvent::ShotCaptured {
            shot: 2,
            total: 4,
            timestamp: SystemTime::now(),
        };
        assert_eq!(event.description(), "Captured shot 2 of 4");
        assert_eq!(event.event_type(), "shot_captured");
    }
}
