//! Camera device seam.
//!
//! The booth core never talks to a physical device directly; it consumes
//! a [`FrameSource`], acquired with a resolution hint and released when a
//! session finishes or is torn down. Acquisition failure is a capability
//! error reported to the caller, never a crash, and permission denial is
//! not retried automatically.

mod synthetic;

pub use synthetic::SyntheticCamera;

use crate::error::Result;
use crate::frame::RgbaFrame;
use async_trait::async_trait;

/// Preferred capture resolution; the device may deliver something else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionHint {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionHint {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// A live video frame source held exclusively by one capture session
#[async_trait]
pub trait FrameSource: Send {
    /// Acquire the underlying device. Fails with a
    /// [`crate::error::CameraError`] on permission denial or missing
    /// hardware.
    async fn acquire(&mut self, hint: ResolutionHint) -> Result<()>;

    /// Grab one frame from the live feed
    async fn grab_frame(&mut self) -> Result<RgbaFrame>;

    /// Release the device. Implementations should tolerate release of an
    /// unacquired device; callers guarantee at most one release per
    /// acquisition.
    async fn release(&mut self);

    fn is_acquired(&self) -> bool;
}
