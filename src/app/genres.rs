// src/app/genres.rs: persisted genre id → name index with a weekly refresh
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::app::error::{MediaError, MediaResult};
use crate::app::types::Genre;

pub const GENRE_REFRESH_DAYS: i64 = 7;
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

pub type GenreMap = HashMap<u32, String>;

#[async_trait]
pub trait GenreSource: Send + Sync {
    async fn genre_catalog(&self) -> MediaResult<Vec<Genre>>;
}

/// Durable home of the genre index. Writes replace the whole copy.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn read_genre_index(&self) -> MediaResult<Option<(GenreMap, DateTime<Utc>)>>;
    async fn write_genre_index(&self, genres: &GenreMap, refreshed_at: DateTime<Utc>)
        -> MediaResult<()>;
}

pub trait ClockSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryGenreStore {
    slot: Mutex<Option<(GenreMap, DateTime<Utc>)>>,
}

impl MemoryGenreStore {
    pub fn with_contents(genres: GenreMap, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            slot: Mutex::new(Some((genres, refreshed_at))),
        }
    }
}

#[async_trait]
impl DurableStore for MemoryGenreStore {
    async fn read_genre_index(&self) -> MediaResult<Option<(GenreMap, DateTime<Utc>)>> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| MediaError::Storage(format!("genre slot poisoned: {e}")))?;
        Ok(guard.clone())
    }

    async fn write_genre_index(
        &self,
        genres: &GenreMap,
        refreshed_at: DateTime<Utc>,
    ) -> MediaResult<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| MediaError::Storage(format!("genre slot poisoned: {e}")))?;
        *guard = Some((genres.clone(), refreshed_at));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct IndexState {
    names: GenreMap,
    refreshed_at: Option<DateTime<Utc>>,
}

pub struct GenreIndex {
    state: RwLock<IndexState>,
    source: Arc<dyn GenreSource>,
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn ClockSource>,
    max_age: Duration,
}

impl GenreIndex {
    /// Build the index from whatever the durable store holds. An unreadable
    /// store starts empty, which makes the first `refresh_if_stale` fetch.
    pub async fn load(
        source: Arc<dyn GenreSource>,
        store: Arc<dyn DurableStore>,
        clock: Arc<dyn ClockSource>,
        refresh_days: i64,
    ) -> Self {
        let state = match store.read_genre_index().await {
            Ok(Some((names, refreshed_at))) => {
                debug!("loaded {} genres (refreshed {refreshed_at})", names.len());
                IndexState {
                    names,
                    refreshed_at: Some(refreshed_at),
                }
            }
            Ok(None) => IndexState::default(),
            Err(e) => {
                warn!("genre store unreadable, starting empty: {e}");
                IndexState::default()
            }
        };

        Self {
            state: RwLock::new(state),
            source,
            store,
            clock,
            max_age: Duration::days(refresh_days.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.read(|s| s.names.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.read(|s| s.refreshed_at)
    }

    pub fn is_stale(&self) -> bool {
        let now = self.clock.now();
        self.read(|s| match s.refreshed_at {
            _ if s.names.is_empty() => true,
            Some(at) => now - at > self.max_age,
            None => true,
        })
    }

    /// Fetch the catalog when the index is empty or older than the refresh window.
    ///
    /// Returns true when a new catalog was installed. Failures are logged and
    /// leave both the mapping and the timestamp untouched.
    pub async fn refresh_if_stale(&self) -> bool {
        if !self.is_stale() {
            return false;
        }

        let catalog = match self.source.genre_catalog().await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                warn!("genre catalog came back empty; keeping previous index");
                return false;
            }
            Err(e) => {
                warn!("failed to refresh genres: {e}");
                return false;
            }
        };

        let names: GenreMap = catalog.into_iter().map(|g| (g.id, g.name)).collect();
        let refreshed_at = self.clock.now();

        if let Err(e) = self.store.write_genre_index(&names, refreshed_at).await {
            warn!("failed to persist genre index: {e}");
        }

        let count = names.len();
        match self.state.write() {
            Ok(mut guard) => {
                *guard = IndexState {
                    names,
                    refreshed_at: Some(refreshed_at),
                }
            }
            Err(poisoned) => {
                *poisoned.into_inner() = IndexState {
                    names,
                    refreshed_at: Some(refreshed_at),
                }
            }
        }
        info!("genres refreshed from API ({count} entries)");
        true
    }

    /// Resolve ids to names, dropping unknown ones. Never returns an empty list:
    /// nothing resolved means `[UNKNOWN_GENRE]`.
    pub fn lookup(&self, ids: &[u32]) -> Vec<String> {
        let names: Vec<String> =
            self.read(|s| ids.iter().filter_map(|id| s.names.get(id).cloned()).collect());
        if names.is_empty() {
            vec![UNKNOWN_GENRE.to_string()]
        } else {
            names
        }
    }

    fn read<R>(&self, f: impl FnOnce(&IndexState) -> R) -> R {
        match self.state.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}
