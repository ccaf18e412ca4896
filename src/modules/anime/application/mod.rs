pub mod service;

pub use service::{AnimeService, ListAnimeQuery};
