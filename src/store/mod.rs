mod backend;


use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use self::backend::{KeyValueStore, StorageError};

#[cfg(test)]
pub(crate) use self::backend::MemoryStore;

pub const STORAGE_KEY: &str = "continueWatching";
pub const MAX_ENTRIES: usize = 12;
pub const DEFAULT_PROGRESS: u8 = 30;

/// One remembered in-progress movie.
///
/// Field names follow the persisted camelCase layout; the snake_case aliases
/// let lists written by the web client load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "poster_path", skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, alias = "vote_average", skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, alias = "release_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default = "default_progress", deserialize_with = "lenient_progress")]
    pub progress: u8,
    #[serde(default)]
    pub timestamp: i64,
}

fn default_progress() -> u8 {
    DEFAULT_PROGRESS
}

// Null falls back to the default; any other number is clamped into 0..=100.
fn lenient_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<f64>::deserialize(deserializer)? {
        Some(value) => value.round().clamp(0.0, 100.0) as u8,
        None => DEFAULT_PROGRESS,
    })
}

impl WatchEntry {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// Minimal movie record accepted by [`ContinueWatchingStore::upsert`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieCandidate {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

impl MovieCandidate {
    #[cfg(test)]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The stored list could not be read, so nothing was written over it.
    #[error("failed to read continue-watching list: {0}")]
    Read(#[source] StorageError),
    /// The mutation was applied in memory but the substrate refused the write.
    #[error("failed to persist continue-watching list: {source}")]
    Persist {
        entries: Vec<WatchEntry>,
        #[source]
        source: StorageError,
    },
}

impl StoreError {
    /// The intended post-mutation list, if the failure happened after the
    /// mutation was computed.
    pub fn into_entries(self) -> Option<Vec<WatchEntry>> {
        match self {
            Self::Persist { entries, .. } => Some(entries),
            Self::InvalidArgument(_) | Self::Read(_) => None,
        }
    }
}

type Clock = Box<dyn Fn() -> i64>;

/// Continue-watching shelf over a [`KeyValueStore`].
///
/// Every operation is a fresh read-modify-write against the substrate; there
/// is no in-memory cache between calls, so two interleaved writers resolve
/// last-writer-wins.
pub struct ContinueWatchingStore<S> {
    backend: S,
    clock: Clock,
}

impl<S: KeyValueStore> ContinueWatchingStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_clock(backend, || Utc::now().timestamp_millis())
    }

    pub fn with_clock(backend: S, clock: impl Fn() -> i64 + 'static) -> Self {
        Self {
            backend,
            clock: Box::new(clock),
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads the shelf. Never fails: a missing or unreadable value yields an
    /// empty list, and a corrupt value is erased.
    pub fn load(&self) -> Vec<WatchEntry> {
        self.read_entries().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read continue-watching list");
            Vec::new()
        })
    }

    // Substrate errors surface; corrupt data is erased and reads as empty.
    fn read_entries(&self) -> Result<Vec<WatchEntry>, StorageError> {
        let Some(raw) = self.backend.get(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<WatchEntry>>(&raw) {
            Ok(entries) => Ok(normalize(entries)),
            Err(err) => {
                warn!(error = %err, "discarding corrupt continue-watching list");
                if let Err(err) = self.backend.delete(STORAGE_KEY) {
                    warn!(error = %err, "failed to erase corrupt continue-watching list");
                }
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<WatchEntry> {
        self.load().into_iter().find(|entry| entry.id == id)
    }

    /// Moves `candidate` to the front of the shelf, creating it if needed.
    ///
    /// An existing entry keeps its progress; a new one starts at
    /// [`DEFAULT_PROGRESS`]. The tail beyond [`MAX_ENTRIES`] is dropped.
    pub fn upsert(&self, candidate: &MovieCandidate) -> Result<Vec<WatchEntry>, StoreError> {
        let id = candidate
            .id
            .ok_or(StoreError::InvalidArgument("movie id is required"))?;

        let mut entries = self.read_entries().map_err(StoreError::Read)?;
        let position = entries.iter().position(|entry| entry.id == id);
        let previous = position.map(|idx| entries.remove(idx));

        let now = (self.clock)();
        let (progress, timestamp) = match &previous {
            Some(prev) => (prev.progress, now.max(prev.timestamp)),
            None => (DEFAULT_PROGRESS, now),
        };

        entries.insert(
            0,
            WatchEntry {
                id,
                title: candidate.title.clone(),
                poster_path: candidate.poster_path.clone(),
                vote_average: candidate.vote_average,
                release_date: candidate.release_date.clone(),
                progress,
                timestamp,
            },
        );
        entries.truncate(MAX_ENTRIES);

        debug!(
            id,
            existed = previous.is_some(),
            len = entries.len(),
            "upserted continue-watching entry"
        );
        self.persist(entries)
    }

    /// Drops the entry with `id`. Absent ids are a no-op, but the list is
    /// still written back.
    pub fn remove(&self, id: u64) -> Result<Vec<WatchEntry>, StoreError> {
        let mut entries = self.read_entries().map_err(StoreError::Read)?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        debug!(
            id,
            removed = before != entries.len(),
            "removed continue-watching entry"
        );
        self.persist(entries)
    }

    fn persist(&self, entries: Vec<WatchEntry>) -> Result<Vec<WatchEntry>, StoreError> {
        let result = serde_json::to_string(&entries)
            .map_err(|source| StorageError::Encode {
                key: STORAGE_KEY.to_string(),
                source,
            })
            .and_then(|raw| self.backend.set(STORAGE_KEY, &raw));

        match result {
            Ok(()) => Ok(entries),
            Err(source) => Err(StoreError::Persist { entries, source }),
        }
    }
}

fn normalize(entries: Vec<WatchEntry>) -> Vec<WatchEntry> {
    let total = entries.len();
    let mut seen = HashSet::new();
    let out: Vec<WatchEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id))
        .take(MAX_ENTRIES)
        .collect();
    if out.len() != total {
        debug!(
            stored = total,
            kept = out.len(),
            "normalized stored continue-watching list"
        );
    }
    out
}
