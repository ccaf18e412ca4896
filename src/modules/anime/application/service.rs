use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::super::domain::{
    entities::{Anime, AnimePatch, NewAnime},
    repositories::AnimeRepository,
    value_objects::{AnimeFilters, AnimeStatus, AnimeType, Season, SortOrder},
};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info};

/// Raw listing request as it arrives from a caller: every field optional,
/// enums and the sort token still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAnimeQuery {
    pub title: Option<String>,
    pub status: Option<String>,
    pub season: Option<String>,
    pub anime_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListAnimeQuery {
    /// Decode into typed filters. Fails before any SQL is built when a value
    /// or the sort token is not recognised.
    pub fn parse(&self) -> AppResult<(AnimeFilters, SortOrder, PaginationParams)> {
        let defaults = PaginationParams::default();
        let page = PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )?;

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(token) => token.parse()?,
        };

        let filters = AnimeFilters {
            title: self.title.clone(),
            status: parse_optional::<AnimeStatus>(&self.status)?,
            season: parse_optional::<Season>(&self.season)?,
            anime_type: parse_optional::<AnimeType>(&self.anime_type)?,
            tags: self.tags.clone(),
        };

        Ok((filters, sort, page))
    }
}

fn parse_optional<T>(value: &Option<String>) -> AppResult<Option<T>>
where
    T: std::str::FromStr<Err = AppError>,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}

/// Application entry point for the anime catalog
pub struct AnimeService {
    anime_repo: Arc<dyn AnimeRepository>,
}

impl AnimeService {
    pub fn new(anime_repo: Arc<dyn AnimeRepository>) -> Self {
        Self { anime_repo }
    }

    pub async fn create(&self, anime: NewAnime) -> AppResult<Anime> {
        self.anime_repo.create(&anime).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Anime> {
        self.anime_repo.read(id).await
    }

    /// Full replace; `anime.version` must be the version last read.
    pub async fn replace(&self, anime: Anime) -> AppResult<Anime> {
        self.anime_repo.update(&anime).await
    }

    /// Read, merge the present fields of `patch`, write back.
    ///
    /// When `expected_version` is given and no longer matches the stored
    /// row, nothing is written and `EditConflict` is returned.
    pub async fn patch(
        &self,
        id: i64,
        expected_version: Option<i32>,
        patch: AnimePatch,
    ) -> AppResult<Anime> {
        let current = self.anime_repo.read(id).await?;

        if let Some(expected) = expected_version {
            if expected != current.version {
                return Err(AppError::EditConflict(format!(
                    "anime {} is at version {}, not {}",
                    id, current.version, expected
                )));
            }
        }

        if patch.is_empty() {
            log_debug!("Empty patch for anime {}, nothing to write", id);
            return Ok(current);
        }

        let merged = patch.apply_to(current);
        self.anime_repo.update(&merged).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.anime_repo.delete(id).await
    }

    pub async fn list(&self, query: &ListAnimeQuery) -> AppResult<PaginatedResult<Anime>> {
        let (filters, sort, page) = query.parse()?;
        let result = self.anime_repo.list(&filters, sort, page).await?;

        log_info!(
            "Listed {} anime (page {} of {}, {} total)",
            result.items.len(),
            result.metadata.current_page,
            result.metadata.last_page,
            result.metadata.total_records
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::anime::domain::repositories::anime_repository::MockAnimeRepository;
    use crate::modules::anime::domain::value_objects::{SortColumn, SortDirection};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored(version: i32) -> Anime {
        Anime {
            id: 1,
            title: "Moana".to_string(),
            anime_type: AnimeType::Movie,
            episodes: Some(1),
            status: AnimeStatus::Finished,
            season: None,
            year: Some(2015),
            duration: Some(107),
            tags: vec!["Adventure".to_string(), "Animation".to_string()],
            created_at: Utc::now(),
            version,
        }
    }

    #[tokio::test]
    async fn patch_merges_onto_current_entity() {
        let mut repo = MockAnimeRepository::new();
        repo.expect_read()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(stored(1)));
        repo.expect_update()
            .withf(|anime: &Anime| {
                anime.version == 1
                    && anime.tags == vec!["Adventure".to_string()]
                    && anime.title == "Moana"
            })
            .times(1)
            .returning(|anime| {
                let mut updated = anime.clone();
                updated.version += 1;
                Ok(updated)
            });

        let service = AnimeService::new(Arc::new(repo));
        let patch = AnimePatch {
            tags: Some(vec!["Adventure".to_string()]),
            ..Default::default()
        };

        let updated = service.patch(1, Some(1), patch).await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.tags, vec!["Adventure".to_string()]);
    }

    #[tokio::test]
    async fn patch_with_stale_version_never_writes() {
        let mut repo = MockAnimeRepository::new();
        repo.expect_read().returning(|_| Ok(stored(4)));
        repo.expect_update().times(0);

        let service = AnimeService::new(Arc::new(repo));
        let patch = AnimePatch {
            year: Some(Some(2016)),
            ..Default::default()
        };

        let err = service.patch(1, Some(3), patch).await.unwrap_err();
        assert!(err.is_edit_conflict());
    }

    #[tokio::test]
    async fn empty_patch_returns_current_entity() {
        let mut repo = MockAnimeRepository::new();
        repo.expect_read().returning(|_| Ok(stored(2)));
        repo.expect_update().times(0);

        let service = AnimeService::new(Arc::new(repo));
        let anime = service
            .patch(1, None, AnimePatch::default())
            .await
            .unwrap();
        assert_eq!(anime.version, 2);
    }

    #[tokio::test]
    async fn patch_of_missing_anime_is_not_found() {
        let mut repo = MockAnimeRepository::new();
        repo.expect_read()
            .returning(|id| Err(AppError::NotFound(format!("anime {}", id))));
        repo.expect_update().times(0);

        let service = AnimeService::new(Arc::new(repo));
        let err = service
            .patch(99, None, AnimePatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn invalid_sort_token_is_rejected_before_the_repository() {
        let mut repo = MockAnimeRepository::new();
        repo.expect_list().times(0);

        let service = AnimeService::new(Arc::new(repo));
        let query = ListAnimeQuery {
            sort: Some("-rating".to_string()),
            ..Default::default()
        };

        let err = service.list(&query).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.http_status(), 422);
    }

    #[tokio::test]
    async fn list_passes_typed_filters() {
        let mut repo = MockAnimeRepository::new();
        repo.expect_list()
            .withf(|filters: &AnimeFilters, sort: &SortOrder, page: &PaginationParams| {
                filters.status == Some(AnimeStatus::Ongoing)
                    && filters.season == Some(Season::Spring)
                    && filters.anime_type.is_none()
                    && filters.tags == vec!["Action".to_string()]
                    && *sort == SortOrder::new(SortColumn::Year, SortDirection::Desc)
                    && page.page == 2
                    && page.page_size == 5
            })
            .times(1)
            .returning(|_, _, _| Ok(PaginatedResult::empty()));

        let service = AnimeService::new(Arc::new(repo));
        let query = ListAnimeQuery {
            status: Some("ongoing".to_string()),
            season: Some("spring".to_string()),
            anime_type: Some("".to_string()),
            tags: vec!["Action".to_string()],
            sort: Some("-year".to_string()),
            page: Some(2),
            page_size: Some(5),
            ..Default::default()
        };

        let result = service.list(&query).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.metadata.total_records, 0);
    }

    #[test]
    fn list_query_rejects_bad_paging_and_enums() {
        let query = ListAnimeQuery {
            page_size: Some(500),
            ..Default::default()
        };
        assert!(query.parse().is_err());

        let query = ListAnimeQuery {
            status: Some("cancelled".to_string()),
            ..Default::default()
        };
        assert!(query.parse().is_err());

        let (filters, sort, page) = ListAnimeQuery::default().parse().unwrap();
        assert_eq!(filters, AnimeFilters::default());
        assert_eq!(sort, SortOrder::default());
        assert_eq!(page, PaginationParams::default());
    }
}
