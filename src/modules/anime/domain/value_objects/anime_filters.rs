use serde::{Deserialize, Serialize};

use super::{AnimeStatus, AnimeType, Season};

/// Optional filters for the anime listing. All present filters must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeFilters {
    /// Full-text match against the title; blank means no filter
    pub title: Option<String>,
    pub status: Option<AnimeStatus>,
    pub season: Option<Season>,
    pub anime_type: Option<AnimeType>,
    /// Anime must carry every one of these tags
    pub tags: Vec<String>,
}

impl AnimeFilters {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: AnimeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_type(mut self, anime_type: AnimeType) -> Self {
        self.anime_type = Some(anime_type);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Title text to search for, `None` when absent or blank
    pub fn title_query(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }
}
