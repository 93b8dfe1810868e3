// src/app/types.rs
use serde::Deserialize;

// ---- identity ----
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Series,
    Person,
}

impl MediaKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Person => "person",
        }
    }

    /// Path segment used by the catalog API.
    pub const fn api_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
            Self::Person => "person",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Some(Self::Movie),
            "tv" | "series" | "show" => Some(Self::Series),
            "person" | "people" => Some(Self::Person),
            _ => None,
        }
    }
}

/// Rendition widths requested from the image host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSize {
    /// Posters and profile pictures on detail pages.
    Poster,
    /// Cast thumbnails.
    Thumb,
    /// Backdrop and profile galleries.
    Gallery,
}

impl ImageSize {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "w500",
            Self::Thumb => "w185",
            Self::Gallery => "w780",
        }
    }
}

/// Minimal handle on a catalog entry, as produced by a search result.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaReference {
    pub id: Option<u64>,
    pub kind: MediaKind,
    pub title_fallback: Option<String>,
    pub overview_fallback: Option<String>,
    pub poster_locator: Option<String>,
    pub genre_ids: Vec<u32>,
    pub rating: Option<f32>,
    pub known_for_department: Option<String>,
}

impl MediaReference {
    pub fn new(id: Option<u64>, kind: MediaKind) -> Self {
        Self {
            id,
            kind,
            title_fallback: None,
            overview_fallback: None,
            poster_locator: None,
            genre_ids: Vec::new(),
            rating: None,
            known_for_department: None,
        }
    }
}

// ---- genres ----
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreResponse {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

// ---- detail records: every field optional, absence is a normal outcome ----
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieDetail {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub runtime: Option<i32>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub genres: Option<Vec<Genre>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SeriesDetail {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub number_of_seasons: Option<i32>,
    pub number_of_episodes: Option<i32>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub in_production: Option<bool>,
    pub poster_path: Option<String>,
    pub genres: Option<Vec<Genre>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PersonDetail {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
}

// ---- auxiliary sequences ----
#[derive(Clone, Debug, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImageItem {
    pub file_path: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vote_average: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub backdrops: Vec<ImageItem>,
    #[serde(default)]
    pub posters: Vec<ImageItem>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PersonImagesResponse {
    #[serde(default)]
    pub profiles: Vec<ImageItem>,
}

// ---- search ----
#[derive(Clone, Debug, Deserialize)]
pub struct SearchItem {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub media_type: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub profile_path: Option<String>,
    pub vote_average: Option<f32>,
    pub genre_ids: Option<Vec<u32>>,
    pub known_for_department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchItem>,
}

impl SearchItem {
    /// Items with an unknown media type are skipped by search.
    pub fn into_reference(self, poster_base: impl Fn(&str) -> String) -> Option<MediaReference> {
        let kind = MediaKind::from_str(self.media_type.as_deref()?)?;
        let image_path = self.poster_path.or(self.profile_path);
        Some(MediaReference {
            id: self.id,
            kind,
            title_fallback: self.title.or(self.name),
            overview_fallback: self.overview,
            poster_locator: image_path.as_deref().map(poster_base),
            genre_ids: self.genre_ids.unwrap_or_default(),
            rating: self.vote_average,
            known_for_department: self.known_for_department,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaKind, MovieDetail, SearchResponse};

    #[test]
    fn search_items_map_to_references() {
        let raw = r#"{"results":[
            {"id":550,"media_type":"movie","title":"Fight Club","poster_path":"/p.jpg","genre_ids":[18],"vote_average":8.4},
            {"id":287,"media_type":"person","name":"Brad Pitt","profile_path":"/b.jpg","known_for_department":"Acting"},
            {"id":1,"media_type":"collection","name":"skip me"}
        ]}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        let refs: Vec<_> = parsed
            .results
            .into_iter()
            .filter_map(|item| item.into_reference(|p| format!("img:{p}")))
            .collect();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].kind, MediaKind::Movie);
        assert_eq!(refs[0].title_fallback.as_deref(), Some("Fight Club"));
        assert_eq!(refs[0].poster_locator.as_deref(), Some("img:/p.jpg"));
        assert_eq!(refs[0].genre_ids, vec![18]);
        assert_eq!(refs[1].kind, MediaKind::Person);
        assert_eq!(refs[1].title_fallback.as_deref(), Some("Brad Pitt"));
        assert_eq!(refs[1].known_for_department.as_deref(), Some("Acting"));
    }

    #[test]
    fn detail_records_tolerate_missing_fields() {
        let detail: MovieDetail = serde_json::from_str("{}").unwrap();
        assert!(detail.title.is_none());
        assert!(detail.genres.is_none());
    }

    #[test]
    fn kind_parsing_accepts_api_names() {
        assert_eq!(MediaKind::from_str("tv"), Some(MediaKind::Series));
        assert_eq!(MediaKind::from_str(" Movie "), Some(MediaKind::Movie));
        assert_eq!(MediaKind::from_str("episode"), None);
        assert_eq!(MediaKind::Series.api_segment(), "tv");
    }
}
