/// Component lifecycle states
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

/// A captured still waiting to become a memory, after the optional edit
/// pass and caption step
#[derive(Debug, Clone)]
pub struct PendingPhoto {
    pub image: crate::frame::EncodedImage,
    pub caption: String,
    pub reflection: Option<String>,
    pub mood: Option<crate::store::Mood>,
}
