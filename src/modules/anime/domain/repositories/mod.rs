pub mod anime_repository;

pub use anime_repository::AnimeRepository;
