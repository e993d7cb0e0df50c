use super::*;
use crate::camera::{FrameSource, ResolutionHint};
use crate::config::SessionConfig;
use crate::error::{BoothError, CameraError, SessionError};
use crate::events::{BoothEvent, EventBus};
use crate::frame::RgbaFrame;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn test_session_config() -> SessionConfig {
    SessionConfig {
        shots: 4,
        countdown_ticks: 3,
        tick_interval_ms: 1000,
        settle_ms: 500,
        inter_shot_pause_ms: 1000,
        filter: "dreamy".to_string(),
        still_jpeg_quality: 70,
    }
}

/// Frame source that counts grabs and releases
struct CountingSource {
    grabs: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    fail_acquire: bool,
    acquired: bool,
}

impl CountingSource {
    fn new(grabs: Arc<AtomicUsize>, releases: Arc<AtomicUsize>) -> Self {
        Self {
            grabs,
            releases,
            fail_acquire: false,
            acquired: false,
        }
    }

    fn failing(grabs: Arc<AtomicUsize>, releases: Arc<AtomicUsize>) -> Self {
        Self {
            grabs,
            releases,
            fail_acquire: true,
            acquired: false,
        }
    }
}

#[async_trait]
impl FrameSource for CountingSource {
    async fn acquire(&mut self, _hint: ResolutionHint) -> crate::error::Result<()> {
        if self.fail_acquire {
            return Err(CameraError::PermissionDenied {
                details: "denied by test".to_string(),
            }
            .into());
        }
        self.acquired = true;
        Ok(())
    }

    async fn grab_frame(&mut self) -> crate::error::Result<RgbaFrame> {
        self.grabs.fetch_add(1, Ordering::SeqCst);
        Ok(RgbaFrame::filled(8, 8, [120, 80, 40, 255]))
    }

    async fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.acquired = false;
    }

    fn is_acquired(&self) -> bool {
        self.acquired
    }
}

fn build_sequencer(
    source: CountingSource,
    clock: Arc<ManualClock>,
    bus: Arc<EventBus>,
) -> CaptureSequencer {
    CaptureSequencer::new(
        test_session_config(),
        ResolutionHint::default(),
        Box::new(source),
        clock,
        bus,
    )
}

#[tokio::test]
async fn test_full_session_grabs_exactly_four_frames() {
    let grabs = Arc::new(AtomicUsize::new(0));
    let releases = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(256));

    let mut sequencer = build_sequencer(
        CountingSource::new(Arc::clone(&grabs), Arc::clone(&releases)),
        Arc::clone(&clock),
        Arc::clone(&bus),
    );

    let stills = sequencer.run().await.unwrap();

    assert_eq!(stills.len(), 4);
    assert_eq!(grabs.load(Ordering::SeqCst), 4);
    assert_eq!(sequencer.state(), SessionState::Finished);
    assert_eq!(releases.load(Ordering::SeqCst), 1);

    // 4 shots x (3 ticks + settle) + 3 inter-shot pauses
    assert_eq!(clock.sleep_count(), 4 * 4 + 3);
}

#[tokio::test]
async fn test_cancel_after_two_shots_releases_device_once() {
    let grabs = Arc::new(AtomicUsize::new(0));
    let releases = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(256));
    let mut rx = bus.subscribe();

    let mut sequencer = build_sequencer(
        CountingSource::new(Arc::clone(&grabs), Arc::clone(&releases)),
        Arc::clone(&clock),
        Arc::clone(&bus),
    );

    // Shots 1 and 2 consume 5 sleeps each (3 ticks + settle + pause);
    // cancelling on the 10th sleep tears down before shot 3 begins.
    clock.cancel_after_sleeps(10, sequencer.cancellation_token());

    let result = sequencer.run().await;

    assert!(matches!(
        result,
        Err(BoothError::Session(SessionError::Cancelled))
    ));
    assert_eq!(grabs.load(Ordering::SeqCst), 2);
    assert_eq!(releases.load(Ordering::SeqCst), 1);

    // No countdown tick for shot 3 was ever published
    while let Ok(event) = rx.try_recv() {
        if let BoothEvent::CountdownTick { shot, .. } = event {
            assert!(shot <= 2, "countdown tick for shot {} after cancel", shot);
        }
    }
}

#[tokio::test]
async fn test_acquisition_failure_is_reported_not_retried() {
    let grabs = Arc::new(AtomicUsize::new(0));
    let releases = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(256));
    let mut rx = bus.subscribe();

    let mut sequencer = build_sequencer(
        CountingSource::failing(Arc::clone(&grabs), Arc::clone(&releases)),
        Arc::clone(&clock),
        Arc::clone(&bus),
    );

    let result = sequencer.run().await;

    assert!(matches!(result, Err(BoothError::Camera(_))));
    assert_eq!(sequencer.state(), SessionState::Failed);
    assert_eq!(grabs.load(Ordering::SeqCst), 0);
    // Device never acquired, so never released
    assert_eq!(releases.load(Ordering::SeqCst), 0);

    let mut saw_failure = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, BoothEvent::SessionFailed { .. }) {
            saw_failure = true;
        }
    }
    assert!(saw_failure);
}

#[tokio::test]
async fn test_unknown_filter_does_not_fail_the_session() {
    let grabs = Arc::new(AtomicUsize::new(0));
    let releases = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(256));

    let mut config = test_session_config();
    config.filter = "definitely-not-a-filter".to_string();

    let clock: Arc<dyn Clock> = clock;
    let mut sequencer = CaptureSequencer::new(
        config,
        ResolutionHint::default(),
        Box::new(CountingSource::new(Arc::clone(&grabs), Arc::clone(&releases))),
        Arc::clone(&clock),
        Arc::clone(&bus),
    );

    let stills = sequencer.run().await.unwrap();
    assert_eq!(stills.len(), 4);
}

#[tokio::test]
async fn test_rerun_of_finished_session_is_rejected() {
    let grabs = Arc::new(AtomicUsize::new(0));
    let releases = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(ManualClock::new());
    let bus = Arc::new(EventBus::new(256));

    let mut sequencer = build_sequencer(
        CountingSource::new(Arc::clone(&grabs), Arc::clone(&releases)),
        Arc::clone(&clock),
        Arc::clone(&bus),
    );

    sequencer.run().await.unwrap();
    let second = sequencer.run().await;
    assert!(matches!(
        second,
        Err(BoothError::Session(SessionError::AlreadyRunning))
    ));
}
