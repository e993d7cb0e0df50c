//! Gallery and journal projections.
//!
//! Pure, read-only views over the store's `load_all` output. Nothing here
//! mutates state; favorite toggles and deletes go back through the store.

use crate::store::{Memory, Mood};

/// Journal filter tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryFilter {
    All,
    Favorites,
    Reflections,
}

impl GalleryFilter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(GalleryFilter::All),
            "favorites" => Some(GalleryFilter::Favorites),
            "reflections" => Some(GalleryFilter::Reflections),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GalleryFilter::All => "all",
            GalleryFilter::Favorites => "favorites",
            GalleryFilter::Reflections => "reflections",
        }
    }
}

/// Project memories through a filter tab and an optional mood intersect,
/// newest first
pub fn project(memories: &[Memory], filter: GalleryFilter, mood: Option<Mood>) -> Vec<Memory> {
    let mut selected: Vec<Memory> = memories
        .iter()
        .filter(|m| match filter {
            GalleryFilter::All => true,
            GalleryFilter::Favorites => m.is_favorite,
            GalleryFilter::Reflections => m
                .reflection
                .as_deref()
                .map(|r| !r.trim().is_empty())
                .unwrap_or(false),
        })
        .filter(|m| match mood {
            None => true,
            Some(mood) => m.mood == Some(mood),
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    selected
}

/// Counts shown on the journal header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GallerySummary {
    pub total: usize,
    pub favorites: usize,
    pub with_reflections: usize,
}

pub fn summarize(memories: &[Memory]) -> GallerySummary {
    GallerySummary {
        total: memories.len(),
        favorites: memories.iter().filter(|m| m.is_favorite).count(),
        with_reflections: memories
            .iter()
            .filter(|m| {
                m.reflection
                    .as_deref()
                    .map(|r| !r.trim().is_empty())
                    .unwrap_or(false)
            })
            .count(),
    }
}
