use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::anime::domain::value_objects::{AnimeStatus, AnimeType, Season};
use crate::shared::config::TagCase;
use crate::shared::errors::AppResult;
use crate::shared::utils::Validator;

/// A catalog entry with its tag set.
///
/// `version` is the optimistic-concurrency token: it starts at 1 and grows by
/// exactly one per committed update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: i64,
    pub title: String,
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub season: Option<Season>,
    pub year: Option<i32>,
    /// Minutes per episode
    pub duration: Option<i32>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl Anime {
    /// Validate the writable fields and return the normalized tag set.
    pub fn validate(&self, tag_case: TagCase) -> AppResult<Vec<String>> {
        validate_fields(
            &self.title,
            self.episodes,
            self.status,
            self.year,
            self.duration,
            &self.tags,
            tag_case,
        )
    }
}

/// Input for Create. Identity, `created_at` and `version` come from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnime {
    pub title: String,
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub duration: Option<i32>,
    pub tags: Vec<String>,
}

impl NewAnime {
    pub fn new(title: impl Into<String>, anime_type: AnimeType, status: AnimeStatus) -> Self {
        Self {
            title: title.into(),
            anime_type,
            episodes: None,
            status,
            season: None,
            year: None,
            duration: None,
            tags: Vec::new(),
        }
    }

    pub fn validate(&self, tag_case: TagCase) -> AppResult<Vec<String>> {
        validate_fields(
            &self.title,
            self.episodes,
            self.status,
            self.year,
            self.duration,
            &self.tags,
            tag_case,
        )
    }
}

fn validate_fields(
    title: &str,
    episodes: Option<i32>,
    status: AnimeStatus,
    year: Option<i32>,
    duration: Option<i32>,
    tags: &[String],
    tag_case: TagCase,
) -> AppResult<Vec<String>> {
    Validator::validate_anime_title(title)?;
    Validator::validate_positive("episodes", episodes)?;
    Validator::validate_positive("duration", duration)?;
    Validator::validate_year(year, status.is_upcoming())?;
    Validator::validate_tags(tags, tag_case)
}

/// Partial update for an anime.
///
/// `None` leaves a field untouched. For nullable columns the inner option
/// distinguishes "clear the value" (`Some(None)`) from "keep it" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimePatch {
    pub title: Option<String>,
    pub anime_type: Option<AnimeType>,
    pub episodes: Option<Option<i32>>,
    pub status: Option<AnimeStatus>,
    pub season: Option<Option<Season>>,
    pub year: Option<Option<i32>>,
    pub duration: Option<Option<i32>>,
    pub tags: Option<Vec<String>>,
}

impl AnimePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the present fields onto a previously read entity. Identity,
    /// `created_at` and `version` are never touched.
    pub fn apply_to(self, mut anime: Anime) -> Anime {
        if let Some(title) = self.title {
            anime.title = title;
        }
        if let Some(anime_type) = self.anime_type {
            anime.anime_type = anime_type;
        }
        if let Some(episodes) = self.episodes {
            anime.episodes = episodes;
        }
        if let Some(status) = self.status {
            anime.status = status;
        }
        if let Some(season) = self.season {
            anime.season = season;
        }
        if let Some(year) = self.year {
            anime.year = year;
        }
        if let Some(duration) = self.duration {
            anime.duration = duration;
        }
        if let Some(tags) = self.tags {
            anime.tags = tags;
        }
        anime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moana() -> Anime {
        Anime {
            id: 7,
            title: "Moana".to_string(),
            anime_type: AnimeType::Movie,
            episodes: Some(1),
            status: AnimeStatus::Finished,
            season: Some(Season::Fall),
            year: Some(2016),
            duration: Some(107),
            tags: vec!["Adventure".to_string(), "Animation".to_string()],
            created_at: Utc::now(),
            version: 3,
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let original = moana();
        assert!(AnimePatch::default().is_empty());
        assert_eq!(AnimePatch::default().apply_to(original.clone()), original);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let original = moana();
        let patch = AnimePatch {
            year: Some(Some(2015)),
            season: Some(None),
            tags: Some(vec!["Adventure".to_string()]),
            ..Default::default()
        };

        let merged = patch.apply_to(original.clone());
        assert_eq!(merged.year, Some(2015));
        assert_eq!(merged.season, None);
        assert_eq!(merged.tags, vec!["Adventure".to_string()]);
        assert_eq!(merged.title, original.title);
        assert_eq!(merged.duration, original.duration);
        assert_eq!(merged.version, original.version);
        assert_eq!(merged.created_at, original.created_at);
    }

    #[test]
    fn validation_normalizes_tags() {
        let mut draft = NewAnime::new("Moana", AnimeType::Movie, AnimeStatus::Finished);
        draft.tags = vec!["animation".to_string(), "  adventure ".to_string()];
        assert_eq!(
            draft.validate(TagCase::Title).unwrap(),
            vec!["Adventure".to_string(), "Animation".to_string()]
        );
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut draft = NewAnime::new("Moana", AnimeType::Movie, AnimeStatus::Finished);
        draft.tags = vec!["Animation".to_string()];
        draft.episodes = Some(0);
        assert!(draft.validate(TagCase::Title).is_err());

        draft.episodes = None;
        draft.tags.clear();
        assert!(draft.validate(TagCase::Title).is_err());
    }
}
