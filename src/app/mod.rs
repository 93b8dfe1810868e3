// src/app/mod.rs: services wiring: search, genre index, image cache, detail aggregation

// ---- Standard lib imports ----
use std::sync::Arc;
use std::time::Duration;

// ---- Crates ----
use async_trait::async_trait;
use tracing::{info, warn};

// ---- Local modules ----
pub mod cache;
pub mod carousel;
pub mod detail;
pub mod display;
pub mod error;
pub mod genres;
pub mod keyed_cache;
pub mod loader;
pub mod slot;
pub mod store;
pub mod tmdb;
pub mod types;
pub(crate) mod utils;

use crate::app::cache::{ImageCache, ImageDecoder};
use crate::app::detail::DetailAggregator;
use crate::app::display::DisplayModel;
use crate::app::error::{MediaError, MediaResult};
use crate::app::genres::{DurableStore, GenreIndex, MemoryGenreStore, SystemClock};
use crate::app::store::SqliteGenreStore;
use crate::app::tmdb::TmdbClient;
use crate::app::types::MediaReference;
use crate::config::AppConfig;

pub const NO_RESULTS: &str = "No results found";

#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search_multi(&self, query: &str) -> MediaResult<Vec<MediaReference>>;
}

#[async_trait]
impl SearchSource for TmdbClient {
    async fn search_multi(&self, query: &str) -> MediaResult<Vec<MediaReference>> {
        TmdbClient::search_multi(self, query).await
    }
}

/// Blank queries never hit the network; an empty result set is a hard error.
pub async fn search_catalog(
    source: &dyn SearchSource,
    query: &str,
) -> MediaResult<Vec<MediaReference>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let results = source.search_multi(query).await?;
    if results.is_empty() {
        return Err(MediaError::NotFound(NO_RESULTS.to_string()));
    }
    info!("search `{query}`: {} results", results.len());
    Ok(results)
}

/// Everything a screen needs, built once at startup and shared by reference.
pub struct MediaContext {
    search: Arc<dyn SearchSource>,
    images: Arc<ImageCache>,
    genres: Arc<GenreIndex>,
    aggregator: DetailAggregator,
}

impl MediaContext {
    pub fn from_parts(
        search: Arc<dyn SearchSource>,
        images: Arc<ImageCache>,
        genres: Arc<GenreIndex>,
        aggregator: DetailAggregator,
    ) -> Self {
        Self {
            search,
            images,
            genres,
            aggregator,
        }
    }

    /// Wire the TMDB client, SQLite genre store and image cache from config,
    /// then refresh the genre index if it is stale.
    pub async fn build(cfg: &AppConfig) -> Result<Self, String> {
        let token = cfg.api_token()?;
        let client = TmdbClient::new(
            token,
            &cfg.language,
            Duration::from_secs(cfg.request_timeout_secs),
        )
        .map_err(|e| format!("tmdb client: {e}"))?;
        let client = Arc::new(client);

        let db_path = cfg.genre_db_path();
        let store: Arc<dyn DurableStore> = match SqliteGenreStore::open(&db_path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("genre db unavailable at {} ({e}); genres kept in memory", db_path.display());
                Arc::new(MemoryGenreStore::default())
            }
        };

        let clock = Arc::new(SystemClock);
        let genres = Arc::new(
            GenreIndex::load(client.clone(), store, clock.clone(), cfg.genre_refresh_days).await,
        );
        genres.refresh_if_stale().await;

        let images = Arc::new(ImageCache::new(
            cfg.image_cache_capacity,
            client.clone(),
            Arc::new(ImageDecoder),
        ));
        let aggregator =
            DetailAggregator::new(client.clone(), images.clone(), genres.clone(), clock);

        info!(
            "media context ready ({} genres, image cache {})",
            genres.len(),
            cfg.image_cache_capacity
        );
        Ok(Self::from_parts(client, images, genres, aggregator))
    }

    pub async fn search(&self, query: &str) -> MediaResult<Vec<MediaReference>> {
        search_catalog(self.search.as_ref(), query).await
    }

    pub async fn build_display_model(&self, reference: MediaReference) -> DisplayModel {
        self.aggregator.build_display_model(reference).await
    }

    pub fn genre_names(&self, ids: &[u32]) -> Vec<String> {
        self.genres.lookup(ids)
    }

    pub async fn refresh_genres(&self) -> bool {
        self.genres.refresh_if_stale().await
    }

    pub fn images(&self) -> &Arc<ImageCache> {
        &self.images
    }

    pub fn genres(&self) -> &Arc<GenreIndex> {
        &self.genres
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{search_catalog, SearchSource, NO_RESULTS};
    use crate::app::error::{MediaError, MediaResult};
    use crate::app::types::{MediaKind, MediaReference};

    struct FakeSearch {
        calls: AtomicUsize,
        answer: MediaResult<Vec<MediaReference>>,
    }

    impl FakeSearch {
        fn new(answer: MediaResult<Vec<MediaReference>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer,
            })
        }
    }

    #[async_trait]
    impl SearchSource for FakeSearch {
        async fn search_multi(&self, _query: &str) -> MediaResult<Vec<MediaReference>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    #[tokio::test]
    async fn blank_query_skips_the_network() {
        let source = FakeSearch::new(Ok(Vec::new()));
        assert_eq!(search_catalog(source.as_ref(), "   ").await, Ok(Vec::new()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_results_is_a_hard_error() {
        let source = FakeSearch::new(Ok(Vec::new()));
        assert_eq!(
            search_catalog(source.as_ref(), "zzzz").await,
            Err(MediaError::NotFound(NO_RESULTS.to_string()))
        );
    }

    #[tokio::test]
    async fn results_and_failures_pass_through() {
        let hit = MediaReference::new(Some(550), MediaKind::Movie);
        let source = FakeSearch::new(Ok(vec![hit.clone()]));
        assert_eq!(search_catalog(source.as_ref(), "fight").await, Ok(vec![hit]));

        let down = FakeSearch::new(Err(MediaError::Unauthorized));
        assert_eq!(
            search_catalog(down.as_ref(), "fight").await,
            Err(MediaError::Unauthorized)
        );
    }
}
