//! Decorative collaborators: sound cues, saved-badge animation triggers
//! and affirmation rotation.
//!
//! Everything here is a downstream observer of the event bus. Nothing in
//! the core depends on this module, and a cue that fails to play is
//! swallowed locally — decorative failures carry no correctness weight.

use crate::config::AnimationPrefs;
use crate::events::{BoothEvent, EventBus};
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, trace};

/// Envelope parameters for a synthesized cue tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub gain: f32,
}

/// Shutter tone played on every frame grab
pub const SHUTTER_CUE: SoundCue = SoundCue {
    frequency_hz: 800.0,
    duration_ms: 100,
    gain: 0.3,
};

/// Soft click for selections and button presses
pub const CLICK_CUE: SoundCue = SoundCue {
    frequency_hz: 1200.0,
    duration_ms: 30,
    gain: 0.3,
};

/// Confirmation chime after a successful save or export
pub const SUCCESS_CUE: SoundCue = SoundCue {
    frequency_hz: 520.0,
    duration_ms: 350,
    gain: 0.4,
};

/// Plays cue tones; the default implementation only traces, which is the
/// headless host's "speaker"
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: SoundCue);
}

/// Headless cue player
pub struct TracingCuePlayer;

impl CuePlayer for TracingCuePlayer {
    fn play(&self, cue: SoundCue) {
        trace!(
            "cue {:.0} Hz for {} ms at gain {:.2}",
            cue.frequency_hz,
            cue.duration_ms,
            cue.gain
        );
    }
}

/// Subscribes to the bus and fires decorative reactions until the bus
/// closes. Spawn-and-forget; dropping the handle abandons the observer.
pub fn spawn_observer(
    bus: &EventBus,
    player: Arc<dyn CuePlayer>,
    prefs: AnimationPrefs,
) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => react(&event, player.as_ref(), &prefs),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Ambient observer lagged by {} events; continuing", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn react(event: &BoothEvent, player: &dyn CuePlayer, prefs: &AnimationPrefs) {
    match event {
        BoothEvent::ShutterFired { .. } => player.play(SHUTTER_CUE),
        BoothEvent::CountdownTick { .. } => player.play(CLICK_CUE),
        BoothEvent::MemoriesSaved { count, .. } => {
            player.play(SUCCESS_CUE);
            // The saved-badge animation runs for 3 s at normal speed
            let duration = prefs.adjust_duration(3000, false);
            debug!(
                "memory-saved badge for {} records ({} ms)",
                count, duration
            );
        }
        BoothEvent::ExportCompleted { .. } => player.play(SUCCESS_CUE),
        BoothEvent::FavoriteToggled { .. } | BoothEvent::CanvasNotice { .. } => {
            player.play(CLICK_CUE)
        }
        _ => {}
    }
}

const AFFIRMATIONS: [&str; 6] = [
    "You are art.",
    "You are allowed to be both soft and strong.",
    "The way you love yourself teaches the world how to love you.",
    "Even broken things reflect light.",
    "Healing is not linear but it's beautiful.",
    "You are becoming someone you'd be proud to know.",
];

const DAILY_PROMPTS: [&str; 7] = [
    "What made you smile today?",
    "What are you proud of right now?",
    "What does your heart need today?",
    "What are you grateful for in this moment?",
    "How did you show yourself love today?",
    "What beauty did you notice today?",
    "What would you tell your younger self?",
];

/// Deterministic day-indexed rotation through the affirmation and prompt
/// tables, so each day shows a consistent pair
pub struct AffirmationRotator;

impl AffirmationRotator {
    /// Affirmation for an arbitrary rotation index
    pub fn affirmation(index: usize) -> &'static str {
        AFFIRMATIONS[index % AFFIRMATIONS.len()]
    }

    /// Prompt for a given day-of-year
    pub fn prompt_for_day(day_of_year: usize) -> &'static str {
        DAILY_PROMPTS[day_of_year % DAILY_PROMPTS.len()]
    }

    /// Today's journal prompt
    pub fn todays_prompt() -> &'static str {
        Self::prompt_for_day(Utc::now().ordinal() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct RecordingPlayer {
        cues: Mutex<Vec<SoundCue>>,
    }

    impl CuePlayer for RecordingPlayer {
        fn play(&self, cue: SoundCue) {
            self.cues.lock().push(cue);
        }
    }

    #[test]
    fn test_shutter_event_plays_shutter_cue() {
        let player = RecordingPlayer {
            cues: Mutex::new(Vec::new()),
        };
        react(
            &BoothEvent::ShutterFired {
                shot: 1,
                timestamp: std::time::SystemTime::now(),
            },
            &player,
            &AnimationPrefs::default(),
        );
        assert_eq!(player.cues.lock().as_slice(), &[SHUTTER_CUE]);
    }

    #[test]
    fn test_save_event_plays_success_cue() {
        let player = RecordingPlayer {
            cues: Mutex::new(Vec::new()),
        };
        react(
            &BoothEvent::MemoriesSaved {
                count: 4,
                timestamp: std::time::SystemTime::now(),
            },
            &player,
            &AnimationPrefs::default(),
        );
        assert_eq!(player.cues.lock().as_slice(), &[SUCCESS_CUE]);
    }

    #[test]
    fn test_prompt_rotation_is_deterministic() {
        assert_eq!(
            AffirmationRotator::prompt_for_day(0),
            AffirmationRotator::prompt_for_day(7)
        );
        assert_ne!(
            AffirmationRotator::prompt_for_day(0),
            AffirmationRotator::prompt_for_day(3)
        );
    }

    #[tokio::test]
    async fn test_observer_survives_uninteresting_events() {
        let bus = EventBus::new(16);
        let handle = spawn_observer(
            &bus,
            Arc::new(TracingCuePlayer),
            AnimationPrefs::default(),
        );

        bus.publish(BoothEvent::MemoryDeleted {
            id: "m1".to_string(),
        });
        tokio::task::yield_now().await;

        assert!(!handle.is_finished());
        handle.abort();
    }
}
