// src/app/display.rs: merged, render-ready records
use crate::app::cache::Image;
use crate::app::types::MediaKind;

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const NO_OVERVIEW: &str = "No description available";
pub const NO_BIOGRAPHY: &str = "No biography available";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingTier {
    High,
    Medium,
    Low,
}

impl RatingTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 7.0 {
            Self::High
        } else if score >= 5.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Kind-specific extras. Everything here is optional; the view hides what's missing.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaFacts {
    Movie {
        runtime: Option<String>,
        release_date: Option<String>,
    },
    Series {
        status: Option<String>,
        year_range: Option<String>,
        season_episode_text: Option<String>,
    },
    Person {
        known_for_department: Option<String>,
        birth_info: Option<String>,
        age_text: Option<String>,
        deathday: Option<String>,
    },
}

#[derive(Clone, Debug)]
pub struct CastDisplayItem {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub image: Option<Image>,
}

/// One detail screen's worth of data. Built once, rendered once.
#[derive(Clone, Debug)]
pub struct DisplayModel {
    pub kind: MediaKind,
    pub title: String,
    /// Overview for titles, biography for people.
    pub overview: String,
    pub genres: Vec<String>,
    pub rating: Option<f32>,
    pub rating_text: String,
    pub rating_tier: Option<RatingTier>,
    pub image: Option<Image>,
    pub facts: MediaFacts,
    pub cast: Vec<CastDisplayItem>,
    /// Gallery image locators, best first.
    pub gallery: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// The one merge rule: detail value if it has content, else the reference's,
/// else the fixed placeholder.
pub fn prefer(detail: Option<&str>, reference: Option<&str>, placeholder: &str) -> String {
    non_empty(detail)
        .or_else(|| non_empty(reference))
        .unwrap_or(placeholder)
        .to_string()
}

/// Same rule without a placeholder, for fields that may stay absent.
pub fn prefer_opt(detail: Option<&str>, reference: Option<&str>) -> Option<String> {
    non_empty(detail)
        .or_else(|| non_empty(reference))
        .map(str::to_string)
}

/// People carry no score, so no text and no tier.
pub fn rating_presentation(kind: MediaKind, rating: Option<f32>) -> (String, Option<RatingTier>) {
    if kind == MediaKind::Person {
        return (String::new(), None);
    }
    let score = rating.unwrap_or(0.0);
    (format!("{score:.1}"), Some(RatingTier::from_score(score)))
}

#[cfg(test)]
mod tests {
    use super::{prefer, prefer_opt, rating_presentation, RatingTier};
    use crate::app::types::MediaKind;

    #[test]
    fn prefer_walks_detail_reference_placeholder() {
        assert_eq!(prefer(Some("D"), Some("R"), "P"), "D");
        assert_eq!(prefer(Some(""), Some("R"), "P"), "R");
        assert_eq!(prefer(None, Some("R"), "P"), "R");
        assert_eq!(prefer(Some("  "), None, "P"), "P");
        assert_eq!(prefer_opt(None, Some("")), None);
        assert_eq!(prefer_opt(None, Some("Acting")).as_deref(), Some("Acting"));
    }

    #[test]
    fn rating_tiers() {
        assert_eq!(RatingTier::from_score(7.0), RatingTier::High);
        assert_eq!(RatingTier::from_score(6.9), RatingTier::Medium);
        assert_eq!(RatingTier::from_score(5.0), RatingTier::Medium);
        assert_eq!(RatingTier::from_score(4.99), RatingTier::Low);

        let (text, tier) = rating_presentation(MediaKind::Movie, Some(8.44));
        assert_eq!(text, "8.4");
        assert_eq!(tier, Some(RatingTier::High));

        let (text, tier) = rating_presentation(MediaKind::Series, None);
        assert_eq!(text, "0.0");
        assert_eq!(tier, Some(RatingTier::Low));

        let (text, tier) = rating_presentation(MediaKind::Person, Some(9.0));
        assert!(text.is_empty());
        assert_eq!(tier, None);
    }
}
