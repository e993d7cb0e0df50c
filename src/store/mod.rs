//! Durable memory records in an embedded on-device database.
//!
//! A single `memories` table keyed by id holds every saved photo and
//! collage, image payload included, so the store is fully self-contained.
//! Batch saves run inside one transaction (the batch commits or the call
//! errors); reads always come back newest-first. The store serializes its
//! own writes behind a connection mutex, so callers never need external
//! locking. The async surface wraps the blocking database work in
//! `spawn_blocking` so store waits never stall the event loop.

#[cfg(test)]
mod tests;

use crate::error::{BoothError, Result, StorageError};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Caption applied when a memory is created without one
pub const DEFAULT_CAPTION: &str = "a beautiful moment";

/// Fixed mood vocabulary for journal filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Joyful,
    Nostalgic,
    Peaceful,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Calm, Mood::Joyful, Mood::Nostalgic, Mood::Peaceful];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "calm" => Some(Mood::Calm),
            "joyful" => Some(Mood::Joyful),
            "nostalgic" => Some(Mood::Nostalgic),
            "peaceful" => Some(Mood::Peaceful),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Joyful => "joyful",
            Mood::Nostalgic => "nostalgic",
            Mood::Peaceful => "peaceful",
        }
    }
}

/// One saved photo or collage.
///
/// `image` is a self-contained data-URI payload; storing it inline keeps
/// the database free of external file references at the cost of row size,
/// an accepted operational constraint. `id` and `timestamp` are set at
/// creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub image: String,
    pub caption: String,
    pub reflection: Option<String>,
    pub mood: Option<Mood>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation time in epoch milliseconds; the default sort key
    pub timestamp: i64,
}

impl Memory {
    /// Create a memory with a fresh id and creation timestamp
    pub fn new(image: String, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        let caption = if caption.trim().is_empty() {
            DEFAULT_CAPTION.to_string()
        } else {
            caption
        };
        let now = Utc::now().timestamp_millis();
        Self {
            id: format!("{}-{}", now, Uuid::new_v4().simple()),
            image,
            caption,
            reflection: None,
            mood: None,
            is_favorite: false,
            timestamp: now,
        }
    }
}

/// A partial update; only the present fields are merged into the record.
/// The image payload and timestamp are never part of a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPatch {
    pub caption: Option<String>,
    pub reflection: Option<String>,
    pub mood: Option<Mood>,
    pub is_favorite: Option<bool>,
}

impl MemoryPatch {
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Default::default()
        }
    }

    pub fn caption(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.caption.is_none()
            && self.reflection.is_none()
            && self.mood.is_none()
            && self.is_favorite.is_none()
    }
}

/// Embedded CRUD store for [`Memory`] records
#[derive(Clone)]
pub struct MemoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl MemoryStore {
    /// Open (or create) the database at the given path. Schema creation
    /// is implicit and idempotent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BoothError::Storage(StorageError::Unavailable {
                        details: format!(
                            "cannot create storage directory {}: {}",
                            parent.display(),
                            e
                        ),
                    })
                })?;
            }
        }

        let conn = Connection::open(path).map_err(StorageError::from)?;
        Self::init_schema(&conn).map_err(StorageError::from)?;
        info!("Memory store opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Self::init_schema(&conn).map_err(StorageError::from)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS memories (
                id          TEXT PRIMARY KEY,
                image       TEXT NOT NULL,
                caption     TEXT NOT NULL,
                reflection  TEXT,
                mood        TEXT,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                timestamp   INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_memories_timestamp
                ON memories (timestamp DESC);",
        )
    }

    /// Upsert a batch of memories in one transaction. Records carrying a
    /// zero timestamp are stamped with the current time. The whole batch
    /// commits or the call returns an error.
    pub async fn save_all(&self, mut memories: Vec<Memory>) -> Result<()> {
        if memories.is_empty() {
            return Ok(());
        }

        let now = Utc::now().timestamp_millis();
        for memory in &mut memories {
            if memory.timestamp == 0 {
                memory.timestamp = now;
            }
        }

        let conn = Arc::clone(&self.conn);
        let count = memories.len();
        self.run_blocking(move || {
            let mut conn = conn.lock();
            let tx = conn.transaction()?;
            for m in &memories {
                tx.execute(
                    "INSERT OR REPLACE INTO memories
                        (id, image, caption, reflection, mood, is_favorite, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        m.id,
                        m.image,
                        m.caption,
                        m.reflection,
                        m.mood.map(|mood| mood.name()),
                        m.is_favorite as i64,
                        m.timestamp,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?;

        debug!("Committed batch of {} memories", count);
        Ok(())
    }

    /// Load every memory, newest first. An empty or freshly created store
    /// yields an empty list, never an error.
    pub async fn load_all(&self) -> Result<Vec<Memory>> {
        let conn = Arc::clone(&self.conn);
        let memories = self
            .run_blocking(move || {
                let conn = conn.lock();
                let mut stmt = conn.prepare(
                    "SELECT id, image, caption, reflection, mood, is_favorite, timestamp
                     FROM memories ORDER BY timestamp DESC",
                )?;
                let rows = stmt.query_map([], row_to_memory)?;
                let mut memories = Vec::new();
                for row in rows {
                    memories.push(row?);
                }
                Ok(memories)
            })
            .await?;
        Ok(memories)
    }

    /// Delete a memory by id. Deleting a missing id is a no-op, so the
    /// operation is idempotent.
    pub async fn delete_one(&self, id: &str) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let id = id.to_string();
        self.run_blocking(move || {
            let conn = conn.lock();
            let affected = conn.execute("DELETE FROM memories WHERE id = ?1", params![id])?;
            if affected == 0 {
                debug!("Delete of missing memory {} ignored", id);
            }
            Ok(())
        })
        .await
    }

    /// Merge the patch's fields into an existing record and return the
    /// updated memory. Fails with [`StorageError::NotFound`] when the id
    /// does not exist; silently dropping an edit would be surprising.
    pub async fn update_fields(&self, id: &str, patch: MemoryPatch) -> Result<Memory> {
        let conn = Arc::clone(&self.conn);
        let id = id.to_string();
        self.run_blocking(move || {
            let conn = conn.lock();
            let existing = conn
                .query_row(
                    "SELECT id, image, caption, reflection, mood, is_favorite, timestamp
                     FROM memories WHERE id = ?1",
                    params![id],
                    row_to_memory,
                )
                .optional()?;

            let mut memory = existing.ok_or_else(|| StorageError::NotFound { id: id.clone() })?;

            if let Some(caption) = patch.caption {
                memory.caption = caption;
            }
            if let Some(reflection) = patch.reflection {
                memory.reflection = Some(reflection);
            }
            if let Some(mood) = patch.mood {
                memory.mood = Some(mood);
            }
            if let Some(is_favorite) = patch.is_favorite {
                memory.is_favorite = is_favorite;
            }

            conn.execute(
                "UPDATE memories
                 SET caption = ?2, reflection = ?3, mood = ?4, is_favorite = ?5
                 WHERE id = ?1",
                params![
                    memory.id,
                    memory.caption,
                    memory.reflection,
                    memory.mood.map(|mood| mood.name()),
                    memory.is_favorite as i64,
                ],
            )?;

            Ok(memory)
        })
        .await
    }

    /// Number of stored memories
    pub async fn count(&self) -> Result<usize> {
        let conn = Arc::clone(&self.conn);
        self.run_blocking(move || {
            let conn = conn.lock();
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM memories", [], |r| r.get(0))?;
            Ok(count as usize)
        })
        .await
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> std::result::Result<T, StorageError> + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| {
                BoothError::Storage(StorageError::Unavailable {
                    details: format!("storage task failed: {}", e),
                })
            })?
            .map_err(BoothError::Storage)
    }
}

fn row_to_memory(row: &rusqlite::Row<'_>) -> rusqlite::Result<Memory> {
    let mood: Option<String> = row.get(4)?;
    Ok(Memory {
        id: row.get(0)?,
        image: row.get(1)?,
        caption: row.get(2)?,
        reflection: row.get(3)?,
        mood: mood.as_deref().and_then(Mood::from_name),
        is_favorite: row.get::<_, i64>(5)? != 0,
        timestamp: row.get(6)?,
    })
}
