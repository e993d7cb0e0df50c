//! Export and share sink.
//!
//! Flattened rasters leave the core either through a host-provided
//! [`ShareSink`] (native share surface) or as a direct file download.
//! When the sink reports itself unsupported, the exporter falls back to
//! the download path instead of failing — share availability is a
//! capability, not a requirement.

use crate::error::{ExportError, Result};
use crate::frame::{EncodedImage, ImageEncoding};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where an export ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Shared,
    Downloaded(PathBuf),
}

/// Native share surface seam
#[async_trait]
pub trait ShareSink: Send + Sync {
    /// Whether the host offers a native share surface
    fn is_supported(&self) -> bool;

    async fn share(&self, image: &EncodedImage, title: &str) -> Result<()>;
}

/// Host without a native share surface; every share attempt reports the
/// capability as unsupported
pub struct NoShareSink;

#[async_trait]
impl ShareSink for NoShareSink {
    fn is_supported(&self) -> bool {
        false
    }

    async fn share(&self, _image: &EncodedImage, _title: &str) -> Result<()> {
        Err(ExportError::ShareUnsupported {
            details: "no native share surface on this host".to_string(),
        }
        .into())
    }
}

/// Writes exports as timestamped files in a fixed directory
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Write the image as `<stem>-<epoch_ms>.<ext>` and return the path
    pub async fn download(&self, image: &EncodedImage, stem: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExportError::Write {
                path: self.dir.display().to_string(),
                source: e,
            })?;

        let ext = match image.format {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg => "jpg",
        };
        let filename = format!("{}-{}.{}", stem, Utc::now().timestamp_millis(), ext);
        let path = self.dir.join(filename);

        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| ExportError::Write {
                path: path.display().to_string(),
                source: e,
            })?;

        info!("Export written to {}", path.display());
        Ok(path)
    }

    /// Offer the image through the native share surface, falling back to
    /// a direct download when share is unsupported
    pub async fn share_or_download(
        &self,
        sink: &dyn ShareSink,
        image: &EncodedImage,
        title: &str,
        stem: &str,
    ) -> Result<ExportOutcome> {
        if sink.is_supported() {
            sink.share(image, title).await?;
            debug!("Shared '{}' through the native surface", title);
            return Ok(ExportOutcome::Shared);
        }

        debug!("Native share unavailable; falling back to download");
        let path = self.download(image, stem).await?;
        Ok(ExportOutcome::Downloaded(path))
    }
}
