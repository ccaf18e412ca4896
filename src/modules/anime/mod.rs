pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{AnimeService, ListAnimeQuery};
pub use domain::{Anime, AnimePatch, AnimeRepository, NewAnime};
pub use infrastructure::AnimeRepositoryImpl;

// Re-export common value objects for shorter imports
pub use domain::value_objects::{
    AnimeFilters, AnimeStatus, AnimeType, Season, SortColumn, SortDirection, SortOrder,
};
