use std::collections::BTreeSet;

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::modules::anime::infrastructure::models::NewAnimeTag;
use crate::schema::anime_tags;
use crate::shared::infrastructure::{PersistenceError, PersistenceResult};

/// Owns the `anime_tags` rows of an anime.
///
/// Links are never edited one by one: a new tag set replaces the old one
/// wholesale inside the caller's transaction.
pub struct AnimeTagLinker;

impl AnimeTagLinker {
    /// Insert links for a freshly created anime. Returns rows inserted.
    pub fn link(
        conn: &mut PgConnection,
        anime_id: i64,
        tag_ids: &[i64],
    ) -> PersistenceResult<usize> {
        let rows = Self::rows(anime_id, tag_ids)?;
        Ok(diesel::insert_into(anime_tags::table)
            .values(&rows)
            .execute(conn)?)
    }

    /// Drop every existing link of `anime_id`, then link `tag_ids`.
    pub fn relink(
        conn: &mut PgConnection,
        anime_id: i64,
        tag_ids: &[i64],
    ) -> PersistenceResult<usize> {
        let rows = Self::rows(anime_id, tag_ids)?;
        diesel::delete(anime_tags::table.filter(anime_tags::anime_id.eq(anime_id)))
            .execute(conn)?;
        Ok(diesel::insert_into(anime_tags::table)
            .values(&rows)
            .execute(conn)?)
    }

    /// One row per distinct tag id; an anime without tags is refused here.
    fn rows(anime_id: i64, tag_ids: &[i64]) -> PersistenceResult<Vec<NewAnimeTag>> {
        let distinct: BTreeSet<i64> = tag_ids.iter().copied().collect();
        if distinct.is_empty() {
            return Err(PersistenceError::EmptyTagSet);
        }
        Ok(distinct
            .into_iter()
            .map(|tag_id| NewAnimeTag { anime_id, tag_id })
            .collect())
    }
}
