pub mod modules;
mod schema;
pub mod shared;

pub use modules::anime::{
    Anime, AnimeFilters, AnimePatch, AnimeRepository, AnimeRepositoryImpl, AnimeService,
    AnimeStatus, AnimeType, ListAnimeQuery, NewAnime, Season, SortColumn, SortDirection,
    SortOrder,
};
pub use shared::application::{PaginatedResult, PaginationMetadata, PaginationParams};
pub use shared::config::{CatalogConfig, TagCase};
pub use shared::errors::{AppError, AppResult, ErrorKind};
pub use shared::Database;
