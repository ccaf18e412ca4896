use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Array, BigInt, Integer, Nullable, Text, Timestamptz};

use crate::modules::anime::domain::value_objects::{AnimeStatus, AnimeType, Season};
use crate::schema::{anime, anime_tags, sql_types, tags};

// ================== ANIME MODELS ==================

/// Anime row without its tags
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = anime)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AnimeRow {
    pub id: i64,
    pub title: String,
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

/// New anime for insertion; id, created_at and version use column defaults
#[derive(Insertable, Debug)]
#[diesel(table_name = anime)]
pub struct NewAnimeRow<'a> {
    pub title: &'a str,
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub duration: Option<i32>,
}

/// Full replacement of the writable columns. `None` writes NULL.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = anime, treat_none_as_null = true)]
pub struct AnimeChangeset<'a> {
    pub title: &'a str,
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub duration: Option<i32>,
}

// ================== TAG MODELS ==================

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TagRow {
    pub id: i64,
    pub name: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
}

#[derive(Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = anime_tags)]
pub struct NewAnimeTag {
    pub anime_id: i64,
    pub tag_id: i64,
}

// ================== RAW QUERY RECORDS ==================

/// Anime row plus its aggregated tag names, as produced by the hand-built
/// SELECTs in `query_builder`
#[derive(QueryableByName, Debug, Clone)]
pub struct AnimeRecord {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = sql_types::AnimeType)]
    pub anime_type: AnimeType,
    #[diesel(sql_type = Nullable<Integer>)]
    pub episodes: Option<i32>,
    #[diesel(sql_type = sql_types::AnimeStatus)]
    pub status: AnimeStatus,
    #[diesel(sql_type = Nullable<sql_types::AnimeSeason>)]
    pub season: Option<Season>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub year: Option<i32>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub duration: Option<i32>,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Integer)]
    pub version: i32,
    #[diesel(sql_type = Array<Text>)]
    pub tags: Vec<String>,
}

/// One page row of the listing with the window count of all matches
#[derive(QueryableByName, Debug, Clone)]
pub struct ListedAnimeRecord {
    #[diesel(sql_type = BigInt)]
    pub total_records: i64,
    #[diesel(embed)]
    pub record: AnimeRecord,
}

#[derive(QueryableByName, Debug, Clone, Copy)]
pub struct CountRecord {
    #[diesel(sql_type = BigInt)]
    pub total_records: i64,
}
