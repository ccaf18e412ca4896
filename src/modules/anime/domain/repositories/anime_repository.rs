use async_trait::async_trait;

use crate::modules::anime::domain::entities::{Anime, NewAnime};
use crate::modules::anime::domain::value_objects::{AnimeFilters, SortOrder};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::AppResult;

/// Persistence port for the anime catalog.
///
/// Every operation runs in its own transaction. Missing rows surface as
/// `AppError::NotFound` and a stale `version` on update as
/// `AppError::EditConflict`; anything else is a classified
/// `AppError::Database`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeRepository: Send + Sync {
    /// Insert an anime with its tags. The stored entity comes back with
    /// `version == 1`.
    async fn create(&self, anime: &NewAnime) -> AppResult<Anime>;
    async fn read(&self, id: i64) -> AppResult<Anime>;
    /// Full replace guarded by `anime.version`. A missing id and a stale
    /// version both report `EditConflict`.
    async fn update(&self, anime: &Anime) -> AppResult<Anime>;
    async fn delete(&self, id: i64) -> AppResult<()>;
    async fn list(
        &self,
        filters: &AnimeFilters,
        sort: SortOrder,
        page: PaginationParams,
    ) -> AppResult<PaginatedResult<Anime>>;
}
