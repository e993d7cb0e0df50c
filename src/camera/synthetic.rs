use super::{FrameSource, ResolutionHint};
use crate::error::{CameraError, Result};
use crate::frame::{RgbaFrame, CHANNELS};
use async_trait::async_trait;
use tracing::{debug, info};

/// Deterministic gradient frame source for headless runs and tests.
///
/// Produces a diagonal color ramp whose phase advances with every grab,
/// so successive shots in a session are distinguishable.
pub struct SyntheticCamera {
    resolution: ResolutionHint,
    acquired: bool,
    frame_counter: u64,
}

impl SyntheticCamera {
    pub fn new() -> Self {
        Self {
            resolution: ResolutionHint::default(),
            acquired: false,
            frame_counter: 0,
        }
    }

    pub fn frames_grabbed(&self) -> u64 {
        self.frame_counter
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameSource for SyntheticCamera {
    async fn acquire(&mut self, hint: ResolutionHint) -> Result<()> {
        if hint.width == 0 || hint.height == 0 {
            return Err(CameraError::Acquisition {
                details: format!("invalid resolution hint {}x{}", hint.width, hint.height),
            }
            .into());
        }
        self.resolution = hint;
        self.acquired = true;
        info!(
            "Synthetic camera acquired at {}x{}",
            hint.width, hint.height
        );
        Ok(())
    }

    async fn grab_frame(&mut self) -> Result<RgbaFrame> {
        if !self.acquired {
            return Err(CameraError::NotAcquired.into());
        }

        let (width, height) = (self.resolution.width, self.resolution.height);
        let phase = (self.frame_counter * 16) as u32;
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);

        for y in 0..height {
            for x in 0..width {
                let r = (((x + phase) * 255) / width.max(1)) as u8;
                let g = ((y * 255) / height.max(1)) as u8;
                let b = (((x + y) * 255) / (width + height).max(1)) as u8;
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }

        self.frame_counter += 1;
        debug!("Synthetic frame {} grabbed", self.frame_counter);

        RgbaFrame::new(width, height, data)
    }

    async fn release(&mut self) {
        if self.acquired {
            self.acquired = false;
            info!("Synthetic camera released");
        }
    }

    fn is_acquired(&self) -> bool {
        self.acquired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_grab_requires_acquisition() {
        let mut camera = SyntheticCamera::new();
        assert!(camera.grab_frame().await.is_err());

        camera.acquire(ResolutionHint::default()).await.unwrap();
        let frame = camera.grab_frame().await.unwrap();
        assert_eq!(frame.width, 1280);
        assert_eq!(frame.height, 720);
    }

    #[tokio::test]
    async fn test_successive_frames_differ() {
        let mut camera = SyntheticCamera::new();
        camera
            .acquire(ResolutionHint {
                width: 64,
                height: 48,
            })
            .await
            .unwrap();

        let first = camera.grab_frame().await.unwrap();
        let second = camera.grab_frame().await.unwrap();
        assert_ne!(first.data, second.data);
        assert_eq!(camera.frames_grabbed(), 2);
    }

    #[tokio::test]
    async fn test_release_idempotent() {
        let mut camera = SyntheticCamera::new();
        camera.acquire(ResolutionHint::default()).await.unwrap();
        camera.release().await;
        camera.release().await;
        assert!(!camera.is_acquired());
    }
}
