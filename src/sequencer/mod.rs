//! Timed multi-shot capture sessions.
//!
//! A session walks `Idle → RequestingDevice → Live → (CountingDown →
//! Shuttering → Captured) × N → Finished`, grabbing one frame per shot
//! from the [`FrameSource`], passing it through the filter engine and
//! JPEG-encoding the still. Device acquisition failure lands in the
//! terminal `Failed` state; cancellation at any tick releases the device
//! immediately and exactly once.

mod clock;
#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, TokioClock};

use crate::camera::{FrameSource, ResolutionHint};
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::events::{BoothEvent, EventBus};
use crate::filters;
use crate::frame::EncodedImage;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capture session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    RequestingDevice,
    Live,
    CountingDown { shot: u32, tick: u32 },
    Shuttering { shot: u32 },
    Captured { shot: u32 },
    Finished,
    Failed,
}

/// Drives one fixed-length photo session against a frame source
pub struct CaptureSequencer {
    config: SessionConfig,
    hint: ResolutionHint,
    source: Box<dyn FrameSource>,
    clock: Arc<dyn Clock>,
    event_bus: Arc<EventBus>,
    cancel: CancellationToken,
    state: SessionState,
    acquired: bool,
    released: bool,
}

impl CaptureSequencer {
    pub fn new(
        config: SessionConfig,
        hint: ResolutionHint,
        source: Box<dyn FrameSource>,
        clock: Arc<dyn Clock>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            hint,
            source,
            clock,
            event_bus,
            cancel: CancellationToken::new(),
            state: SessionState::Idle,
            acquired: false,
            released: false,
        }
    }

    /// Token that tears the session down from outside; cancelling it
    /// releases the camera regardless of which tick the countdown is on.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to completion, returning the filtered stills in
    /// shot order. The device is released on every exit path.
    pub async fn run(&mut self) -> Result<Vec<EncodedImage>> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyRunning.into());
        }

        let result = self.run_inner().await;

        self.release_device().await;

        if let Err(e) = &result {
            self.event_bus.publish(BoothEvent::SessionFailed {
                reason: e.to_string(),
                timestamp: SystemTime::now(),
            });
        }

        result
    }

    async fn run_inner(&mut self) -> Result<Vec<EncodedImage>> {
        self.state = SessionState::RequestingDevice;
        info!(
            "Requesting camera at {}x{} for {} shots",
            self.hint.width, self.hint.height, self.config.shots
        );

        if let Err(e) = self.source.acquire(self.hint).await {
            self.state = SessionState::Failed;
            warn!("Camera acquisition failed: {}", e);
            return Err(e);
        }
        self.acquired = true;
        self.event_bus.publish(BoothEvent::CameraStatusChanged {
            acquired: true,
            timestamp: SystemTime::now(),
        });

        self.state = SessionState::Live;

        let mut stills = Vec::with_capacity(self.config.shots as usize);

        for shot in 1..=self.config.shots {
            self.check_cancelled()?;

            for tick in (1..=self.config.countdown_ticks).rev() {
                self.check_cancelled()?;
                self.state = SessionState::CountingDown { shot, tick };
                self.event_bus.publish(BoothEvent::CountdownTick {
                    shot,
                    tick,
                    timestamp: SystemTime::now(),
                });
                self.sleep_cancellable(Duration::from_millis(self.config.tick_interval_ms))
                    .await?;
            }

            self.state = SessionState::Shuttering { shot };
            self.event_bus.publish(BoothEvent::ShutterFired {
                shot,
                timestamp: SystemTime::now(),
            });

            let raw = match self.source.grab_frame().await {
                Ok(frame) => frame,
                Err(e) => {
                    self.state = SessionState::Failed;
                    return Err(e);
                }
            };

            let filtered = filters::apply_named(&raw, &self.config.filter);
            let still = filtered.encode_jpeg(self.config.still_jpeg_quality)?;
            stills.push(still);

            self.state = SessionState::Captured { shot };
            self.event_bus.publish(BoothEvent::ShotCaptured {
                shot,
                total: self.config.shots,
                timestamp: SystemTime::now(),
            });
            debug!("Shot {} of {} captured", shot, self.config.shots);

            self.sleep_cancellable(Duration::from_millis(self.config.settle_ms))
                .await?;

            if shot < self.config.shots {
                self.sleep_cancellable(Duration::from_millis(self.config.inter_shot_pause_ms))
                    .await?;
            }
        }

        self.state = SessionState::Finished;
        self.event_bus.publish(BoothEvent::SessionFinished {
            shots: self.config.shots,
            timestamp: SystemTime::now(),
        });

        Ok(stills)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(SessionError::Cancelled.into())
        } else {
            Ok(())
        }
    }

    async fn sleep_cancellable(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(SessionError::Cancelled.into()),
            _ = self.clock.sleep(duration) => Ok(()),
        }
    }

    /// Release the device at most once per session
    async fn release_device(&mut self) {
        if self.acquired && !self.released {
            self.source.release().await;
            self.released = true;
            self.event_bus.publish(BoothEvent::CameraStatusChanged {
                acquired: false,
                timestamp: SystemTime::now(),
            });
        }
    }
}
