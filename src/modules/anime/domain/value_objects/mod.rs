//! Anime-specific value objects

pub mod anime_filters;
pub mod anime_status;
pub mod anime_type;
pub mod season;
pub mod sort_order;

pub use anime_filters::AnimeFilters;
pub use anime_status::AnimeStatus;
pub use anime_type::AnimeType;
pub use season::Season;
pub use sort_order::{SortColumn, SortDirection, SortOrder};
