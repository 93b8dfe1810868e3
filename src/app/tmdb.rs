// src/app/tmdb.rs: TMDB v3 client: detail lookups, genre catalog, image bytes, search
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::app::cache::ByteFetcher;
use crate::app::detail::DetailFetcher;
use crate::app::error::{MediaError, MediaResult};
use crate::app::genres::GenreSource;
use crate::app::types::{
    CreditsResponse, Genre, GenreResponse, ImageSize, ImagesResponse, MediaKind, MediaReference,
    MovieDetail, PersonDetail, PersonImagesResponse, SearchResponse, SeriesDetail,
};

pub const API_BASE: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// `https://image.tmdb.org/t/p/w500/abc.jpg`
pub fn image_url(path: &str, size: ImageSize) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        format!("{IMAGE_BASE}/{}{path}", size.as_str())
    } else {
        format!("{IMAGE_BASE}/{}/{path}", size.as_str())
    }
}

/// Error for a non-success status, `None` for 2xx.
fn status_error(status: StatusCode, what: &str) -> Option<MediaError> {
    if status.is_success() {
        return None;
    }
    Some(match status.as_u16() {
        401 | 403 => MediaError::Unauthorized,
        404 => MediaError::NotFound(what.to_string()),
        s => MediaError::Transport(format!("HTTP {s} for {what}")),
    })
}

fn transport(e: reqwest::Error) -> MediaError {
    MediaError::Transport(e.to_string())
}

#[derive(Clone, Debug)]
pub struct TmdbClient {
    http: Client,
    images: Client,
    language: String,
}

impl TmdbClient {
    pub fn new(token: &str, language: &str, timeout: Duration) -> MediaResult<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| MediaError::Transport(format!("invalid API token: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent("marquee/api")
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| MediaError::Transport(format!("reqwest client build: {e}")))?;

        // image host takes no auth header
        let images = Client::builder()
            .user_agent("marquee/images")
            .timeout(timeout)
            .pool_max_idle_per_host(16)
            .default_headers({
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
            .map_err(|e| MediaError::Transport(format!("reqwest client build: {e}")))?;

        let language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        };

        Ok(Self {
            http,
            images,
            language,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{API_BASE}{path}?language={}",
            urlencoding::encode(&self.language)
        );
        for (k, v) in params {
            url.push('&');
            url.push_str(k);
            url.push('=');
            url.push_str(&urlencoding::encode(v));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> MediaResult<T> {
        let url = self.endpoint(path, params);
        debug!("GET {path}");
        let resp = self.http.get(&url).send().await.map_err(transport)?;
        if let Some(err) = status_error(resp.status(), path) {
            return Err(err);
        }
        let body = resp.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body)
            .map_err(|e| MediaError::MalformedResponse(format!("{path}: {e}")))
    }

    /// Multi-search over films, series and people. Items of any other media
    /// type are skipped; zero results is a normal empty list here.
    pub async fn search_multi(&self, query: &str) -> MediaResult<Vec<MediaReference>> {
        let resp: SearchResponse = self
            .get_json("/search/multi", &[("query", query), ("include_adult", "false")])
            .await?;
        Ok(resp
            .results
            .into_iter()
            .filter_map(|item| item.into_reference(|p| image_url(p, ImageSize::Poster)))
            .collect())
    }
}

#[async_trait]
impl DetailFetcher for TmdbClient {
    async fn movie_detail(&self, id: u64) -> MediaResult<MovieDetail> {
        self.get_json(&format!("/movie/{id}"), &[]).await
    }

    async fn series_detail(&self, id: u64) -> MediaResult<SeriesDetail> {
        self.get_json(&format!("/tv/{id}"), &[]).await
    }

    async fn person_detail(&self, id: u64) -> MediaResult<PersonDetail> {
        self.get_json(&format!("/person/{id}"), &[]).await
    }

    async fn credits(&self, kind: MediaKind, id: u64) -> MediaResult<CreditsResponse> {
        self.get_json(&format!("/{}/{id}/credits", kind.api_segment()), &[])
            .await
    }

    async fn images(&self, kind: MediaKind, id: u64) -> MediaResult<ImagesResponse> {
        // backdrops are mostly untagged; a language filter would hide them
        self.get_json(
            &format!("/{}/{id}/images", kind.api_segment()),
            &[("include_image_language", "en,null")],
        )
        .await
    }

    async fn person_images(&self, id: u64) -> MediaResult<PersonImagesResponse> {
        self.get_json(&format!("/person/{id}/images"), &[]).await
    }

    fn image_locator(&self, path: &str, size: ImageSize) -> String {
        image_url(path, size)
    }
}

/// The movie list is required; the TV list only adds to it. TV names win on
/// id clashes (same names in practice).
fn merge_genre_lists(
    movie: MediaResult<GenreResponse>,
    tv: MediaResult<GenreResponse>,
) -> MediaResult<Vec<Genre>> {
    let mut genres = movie?.genres;
    let tv = match tv {
        Ok(resp) => resp.genres,
        Err(e) => {
            warn!("tv genre list unavailable, using movie genres only: {e}");
            return Ok(genres);
        }
    };
    for g in tv {
        match genres.iter_mut().find(|existing| existing.id == g.id) {
            Some(existing) => *existing = g,
            None => genres.push(g),
        }
    }
    Ok(genres)
}

#[async_trait]
impl GenreSource for TmdbClient {
    /// One refresh asks for both the movie and the TV genre lists.
    async fn genre_catalog(&self) -> MediaResult<Vec<Genre>> {
        let (movie, tv) = futures::join!(
            self.get_json::<GenreResponse>("/genre/movie/list", &[]),
            self.get_json::<GenreResponse>("/genre/tv/list", &[]),
        );
        merge_genre_lists(movie, tv)
    }
}

#[async_trait]
impl ByteFetcher for TmdbClient {
    async fn fetch(&self, locator: &str) -> MediaResult<Vec<u8>> {
        let resp = self.images.get(locator).send().await.map_err(transport)?;
        if let Some(err) = status_error(resp.status(), locator) {
            return Err(err);
        }
        let bytes = resp.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}
