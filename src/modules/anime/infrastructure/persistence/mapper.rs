//! Conversions between diesel rows and anime entities

use crate::modules::anime::domain::entities::{Anime, NewAnime};
use crate::modules::anime::infrastructure::models::{
    AnimeChangeset, AnimeRecord, AnimeRow, NewAnimeRow,
};

/// Entity from a bare anime row plus the tags it was linked to
pub fn row_to_entity(row: AnimeRow, tags: Vec<String>) -> Anime {
    Anime {
        id: row.id,
        title: row.title,
        anime_type: row.anime_type,
        episodes: row.episodes,
        status: row.status,
        season: row.season,
        year: row.year,
        duration: row.duration,
        tags,
        created_at: row.created_at,
        version: row.version,
    }
}

pub fn record_to_entity(record: AnimeRecord) -> Anime {
    Anime {
        id: record.id,
        title: record.title,
        anime_type: record.anime_type,
        episodes: record.episodes,
        status: record.status,
        season: record.season,
        year: record.year,
        duration: record.duration,
        tags: record.tags,
        created_at: record.created_at,
        version: record.version,
    }
}

pub fn entity_to_new_row(anime: &NewAnime) -> NewAnimeRow<'_> {
    NewAnimeRow {
        title: &anime.title,
        anime_type: anime.anime_type,
        episodes: anime.episodes,
        status: anime.status,
        season: anime.season,
        year: anime.year,
        duration: anime.duration,
    }
}

pub fn entity_to_changeset(anime: &Anime) -> AnimeChangeset<'_> {
    AnimeChangeset {
        title: &anime.title,
        anime_type: anime.anime_type,
        episodes: anime.episodes,
        status: anime.status,
        season: anime.season,
        year: anime.year,
        duration: anime.duration,
    }
}
