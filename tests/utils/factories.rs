//! Test data factories using builder pattern
//!
//! Provides convenient methods to create test data with sensible defaults
use anidex::{AnimeStatus, AnimeType, NewAnime, Season};

pub struct AnimeFactory {
    anime: NewAnime,
}

impl Default for AnimeFactory {
    fn default() -> Self {
        let mut anime = NewAnime::new(
            format!("Test Anime {}", rand::random::<u32>()),
            AnimeType::Tv,
            AnimeStatus::Finished,
        );
        anime.episodes = Some(12);
        anime.year = Some(2020);
        anime.duration = Some(24);
        anime.tags = vec!["Action".to_string()];

        Self { anime }
    }
}

impl AnimeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.anime.title = title.to_string();
        self
    }

    pub fn anime_type(mut self, anime_type: AnimeType) -> Self {
        self.anime.anime_type = anime_type;
        self
    }

    pub fn status(mut self, status: AnimeStatus) -> Self {
        self.anime.status = status;
        self
    }

    pub fn season(mut self, season: Season) -> Self {
        self.anime.season = Some(season);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.anime.year = Some(year);
        self
    }

    pub fn episodes(mut self, episodes: Option<i32>) -> Self {
        self.anime.episodes = episodes;
        self
    }

    pub fn duration(mut self, duration: i32) -> Self {
        self.anime.duration = Some(duration);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.anime.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn build(self) -> NewAnime {
        self.anime
    }
}
