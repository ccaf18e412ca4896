pub mod entities;
pub mod repositories;
pub mod value_objects;

// Re-exports for easy access
pub use entities::{Anime, AnimePatch, NewAnime};
pub use repositories::AnimeRepository;
