use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoothError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Capture session error: {0}")]
    Session(#[from] SessionError),

    #[error("Composition error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl BoothError {
    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Errors from the embedded memory store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Memory not found: {id}")]
    NotFound { id: String },

    #[error("Storage unavailable: {details}")]
    Unavailable { details: String },
}

/// Capability errors from the camera device seam.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera permission denied: {details}")]
    PermissionDenied { details: String },

    #[error("Camera acquisition failed: {details}")]
    Acquisition { details: String },

    #[error("Frame grab failed: {details}")]
    FrameGrab { details: String },

    #[error("Camera not acquired")]
    NotAcquired,
}

/// Errors from a running capture session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Capture session is already running")]
    AlreadyRunning,

    #[error("Capture session cancelled")]
    Cancelled,

    #[error("Capture session failed: {details}")]
    Failed { details: String },
}

/// Errors from the composition/flatten pipeline.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Image decode failed: {details}")]
    Decode { details: String },

    #[error("Raster encode failed: {details}")]
    Encode { details: String },

    #[error("Invalid pixel buffer: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

/// Errors from the export/share sink.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Native share unsupported: {details}")]
    ShareUnsupported { details: String },

    #[error("Failed to write export file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BoothError>;
