// src/app/detail.rs: builds one detail screen from several independent lookups
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::app::cache::{Image, ImageCache};
use crate::app::display::{
    prefer, prefer_opt, rating_presentation, CastDisplayItem, DisplayModel, MediaFacts,
    NO_BIOGRAPHY, NO_OVERVIEW, UNKNOWN_TITLE,
};
use crate::app::error::MediaResult;
use crate::app::genres::{ClockSource, GenreIndex};
use crate::app::types::{
    CastMember, CreditsResponse, Genre, ImageItem, ImageSize, ImagesResponse, MediaKind,
    MediaReference, MovieDetail, PersonDetail, PersonImagesResponse, SeriesDetail,
};
use crate::app::utils;

// ---- Tunables ----
pub const MAX_CAST: usize = 20;
pub const MAX_BACKDROPS: usize = 15;
pub const MAX_PROFILE_IMAGES: usize = 20;

/// Remote lookups the aggregator fans out to. Every call may fail independently.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn movie_detail(&self, id: u64) -> MediaResult<MovieDetail>;
    async fn series_detail(&self, id: u64) -> MediaResult<SeriesDetail>;
    async fn person_detail(&self, id: u64) -> MediaResult<PersonDetail>;
    async fn credits(&self, kind: MediaKind, id: u64) -> MediaResult<CreditsResponse>;
    async fn images(&self, kind: MediaKind, id: u64) -> MediaResult<ImagesResponse>;
    async fn person_images(&self, id: u64) -> MediaResult<PersonImagesResponse>;

    /// Full locator for a catalog image path at the given width.
    fn image_locator(&self, path: &str, size: ImageSize) -> String;
}

/// Which auxiliary sequences to fetch alongside the detail record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregateOptions {
    pub cast: bool,
    pub gallery: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            cast: true,
            gallery: true,
        }
    }
}

/// Await a sub-fetch and fold any failure into "absent".
async fn settled<T>(what: &str, id: u64, fut: impl Future<Output = MediaResult<T>>) -> Option<T> {
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{what} for {id} unavailable: {e}");
            None
        }
    }
}

fn genre_names(genres: Option<&[Genre]>) -> Option<Vec<String>> {
    let genres = genres.filter(|g| !g.is_empty())?;
    Some(genres.iter().map(|g| g.name.clone()).collect())
}

/// Stable sort by vote average (highest first), capped. Items without a path are skipped.
fn best_image_paths(items: Vec<ImageItem>, cap: usize) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| {
            let path = item.file_path.filter(|p| !p.trim().is_empty())?;
            Some((item.vote_average.unwrap_or(0.0), path))
        })
        .sorted_by(|a, b| b.0.total_cmp(&a.0))
        .take(cap)
        .map(|(_, path)| path)
        .collect()
}

/// Billing order first; members without an order keep source order at the end.
fn top_billed(cast: Vec<CastMember>, cap: usize) -> Vec<CastMember> {
    cast.into_iter()
        .sorted_by_key(|m| m.order.unwrap_or(i32::MAX))
        .take(cap)
        .collect()
}

pub struct DetailAggregator {
    fetcher: Arc<dyn DetailFetcher>,
    images: Arc<ImageCache>,
    genres: Arc<GenreIndex>,
    clock: Arc<dyn ClockSource>,
    options: AggregateOptions,
}

impl DetailAggregator {
    pub fn new(
        fetcher: Arc<dyn DetailFetcher>,
        images: Arc<ImageCache>,
        genres: Arc<GenreIndex>,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        Self {
            fetcher,
            images,
            genres,
            clock,
            options: AggregateOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the display record for `reference`.
    ///
    /// Never fails: every lookup that errors is treated as absent and the
    /// reference (then a placeholder) fills the gap. Returns once every
    /// launched lookup has settled.
    pub async fn build_display_model(&self, reference: MediaReference) -> DisplayModel {
        debug!(
            "building {} display model for {:?}",
            reference.kind.as_str(),
            reference.id
        );
        match reference.kind {
            MediaKind::Movie => self.build_movie(reference).await,
            MediaKind::Series => self.build_series(reference).await,
            MediaKind::Person => self.build_person(reference).await,
        }
    }

    async fn build_movie(&self, reference: MediaReference) -> DisplayModel {
        let (detail, cast, gallery) = match reference.id {
            Some(id) => {
                futures::join!(
                    settled("movie detail", id, self.fetcher.movie_detail(id)),
                    self.cast(MediaKind::Movie, id),
                    self.backdrops(MediaKind::Movie, id),
                )
            }
            None => (None, Vec::new(), Vec::new()),
        };
        let detail = detail.unwrap_or_default();

        let genres = self.resolve_genres(detail.genres.as_deref(), &reference);
        let image = self
            .poster(detail.poster_path.as_deref(), &reference, ImageSize::Poster)
            .await;
        let (rating_text, rating_tier) = rating_presentation(reference.kind, reference.rating);

        DisplayModel {
            kind: reference.kind,
            title: prefer(
                detail.title.as_deref(),
                reference.title_fallback.as_deref(),
                UNKNOWN_TITLE,
            ),
            overview: prefer(
                detail.overview.as_deref(),
                reference.overview_fallback.as_deref(),
                NO_OVERVIEW,
            ),
            genres,
            rating: reference.rating,
            rating_text,
            rating_tier,
            image,
            facts: MediaFacts::Movie {
                runtime: detail.runtime.and_then(utils::format_runtime),
                release_date: detail
                    .release_date
                    .as_deref()
                    .and_then(utils::format_long_date),
            },
            cast,
            gallery,
        }
    }

    async fn build_series(&self, reference: MediaReference) -> DisplayModel {
        let (detail, cast, gallery) = match reference.id {
            Some(id) => {
                futures::join!(
                    settled("series detail", id, self.fetcher.series_detail(id)),
                    self.cast(MediaKind::Series, id),
                    self.backdrops(MediaKind::Series, id),
                )
            }
            None => (None, Vec::new(), Vec::new()),
        };
        let detail = detail.unwrap_or_default();

        let genres = self.resolve_genres(detail.genres.as_deref(), &reference);
        let image = self
            .poster(detail.poster_path.as_deref(), &reference, ImageSize::Poster)
            .await;
        let (rating_text, rating_tier) = rating_presentation(reference.kind, reference.rating);

        DisplayModel {
            kind: reference.kind,
            title: prefer(
                detail.name.as_deref(),
                reference.title_fallback.as_deref(),
                UNKNOWN_TITLE,
            ),
            overview: prefer(
                detail.overview.as_deref(),
                reference.overview_fallback.as_deref(),
                NO_OVERVIEW,
            ),
            genres,
            rating: reference.rating,
            rating_text,
            rating_tier,
            image,
            facts: MediaFacts::Series {
                status: prefer_opt(detail.status.as_deref(), None),
                year_range: utils::format_year_range(
                    detail.first_air_date.as_deref(),
                    detail.last_air_date.as_deref(),
                    detail.in_production,
                ),
                season_episode_text: utils::format_season_episodes(
                    detail.number_of_seasons,
                    detail.number_of_episodes,
                ),
            },
            cast,
            gallery,
        }
    }

    async fn build_person(&self, reference: MediaReference) -> DisplayModel {
        let (detail, gallery) = match reference.id {
            Some(id) => {
                futures::join!(
                    settled("person detail", id, self.fetcher.person_detail(id)),
                    self.profile_gallery(id),
                )
            }
            None => (None, Vec::new()),
        };
        let detail = detail.unwrap_or_default();

        let image = self
            .poster(detail.profile_path.as_deref(), &reference, ImageSize::Poster)
            .await;
        let today = self.clock.now().date_naive();

        DisplayModel {
            kind: reference.kind,
            title: prefer(
                detail.name.as_deref(),
                reference.title_fallback.as_deref(),
                UNKNOWN_TITLE,
            ),
            overview: prefer(
                detail.biography.as_deref(),
                reference.overview_fallback.as_deref(),
                NO_BIOGRAPHY,
            ),
            genres: Vec::new(),
            rating: None,
            rating_text: String::new(),
            rating_tier: None,
            image,
            facts: MediaFacts::Person {
                known_for_department: prefer_opt(
                    detail.known_for_department.as_deref(),
                    reference.known_for_department.as_deref(),
                ),
                birth_info: utils::format_birth_info(
                    detail.birthday.as_deref(),
                    detail.place_of_birth.as_deref(),
                ),
                age_text: utils::format_age(
                    detail.birthday.as_deref(),
                    detail.deathday.as_deref(),
                    today,
                ),
                deathday: detail.deathday.as_deref().and_then(utils::format_long_date),
            },
            cast: Vec::new(),
            gallery,
        }
    }

    /// Detail-sourced genre names win outright; the id lookup is only the fallback.
    fn resolve_genres(&self, detail: Option<&[Genre]>, reference: &MediaReference) -> Vec<String> {
        genre_names(detail).unwrap_or_else(|| self.genres.lookup(&reference.genre_ids))
    }

    async fn poster(
        &self,
        detail_path: Option<&str>,
        reference: &MediaReference,
        size: ImageSize,
    ) -> Option<Image> {
        let locator = detail_path
            .filter(|p| !p.trim().is_empty())
            .map(|p| self.fetcher.image_locator(p, size))
            .or_else(|| reference.poster_locator.clone())?;
        self.images.load(&locator).await
    }

    async fn cast(&self, kind: MediaKind, id: u64) -> Vec<CastDisplayItem> {
        if !self.options.cast {
            return Vec::new();
        }
        let Some(credits) = settled("credits", id, self.fetcher.credits(kind, id)).await else {
            return Vec::new();
        };

        let members = top_billed(credits.cast, MAX_CAST);
        let loads = members.iter().map(|m| async move {
            match m.profile_path.as_deref().filter(|p| !p.trim().is_empty()) {
                Some(path) => {
                    let locator = self.fetcher.image_locator(path, ImageSize::Thumb);
                    self.images.load(&locator).await
                }
                None => None,
            }
        });
        let images = join_all(loads).await;

        members
            .into_iter()
            .zip(images)
            .map(|(m, image)| CastDisplayItem {
                id: m.id,
                name: m.name,
                character: m.character.filter(|c| !c.trim().is_empty()),
                image,
            })
            .collect()
    }

    async fn backdrops(&self, kind: MediaKind, id: u64) -> Vec<String> {
        if !self.options.gallery {
            return Vec::new();
        }
        let Some(resp) = settled("images", id, self.fetcher.images(kind, id)).await else {
            return Vec::new();
        };
        best_image_paths(resp.backdrops, MAX_BACKDROPS)
            .iter()
            .map(|p| self.fetcher.image_locator(p, ImageSize::Gallery))
            .collect()
    }

    async fn profile_gallery(&self, id: u64) -> Vec<String> {
        if !self.options.gallery {
            return Vec::new();
        }
        let Some(resp) = settled("person images", id, self.fetcher.person_images(id)).await
        else {
            return Vec::new();
        };
        best_image_paths(resp.profiles, MAX_PROFILE_IMAGES)
            .iter()
            .map(|p| self.fetcher.image_locator(p, ImageSize::Gallery))
            .collect()
    }
}
