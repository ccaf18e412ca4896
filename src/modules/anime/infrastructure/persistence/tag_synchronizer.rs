use std::collections::BTreeMap;

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::modules::anime::infrastructure::models::{NewTag, TagRow};
use crate::schema::tags;
use crate::shared::config::TagCase;
use crate::log_debug;
use crate::shared::infrastructure::{PersistenceError, PersistenceResult};

/// Turns tag names into tag ids, creating missing tags.
///
/// Runs on the caller's connection so it joins the caller's transaction.
/// Known names are only read, never rewritten. Two transactions inserting the
/// same new name converge on one row: the second insert waits on the unique
/// index and then skips, and the follow-up select sees the committed row.
#[derive(Debug, Clone, Copy)]
pub struct TagSynchronizer {
    case: TagCase,
}

impl TagSynchronizer {
    pub fn new(case: TagCase) -> Self {
        Self { case }
    }

    /// Normalized, de-duplicated, sorted names
    pub fn normalize(&self, names: &[String]) -> Vec<String> {
        self.case.normalize_all(names)
    }

    /// Insert missing names, then return `name -> id` for all of them.
    pub fn sync(
        &self,
        conn: &mut PgConnection,
        names: &[String],
    ) -> PersistenceResult<BTreeMap<String, i64>> {
        let names = self.normalize(names);
        if names.is_empty() {
            return Ok(BTreeMap::new());
        }

        let rows: Vec<NewTag> = names
            .iter()
            .map(|name| NewTag {
                name: name.as_str(),
            })
            .collect();
        let inserted = diesel::insert_into(tags::table)
            .values(&rows)
            .on_conflict(tags::name)
            .do_nothing()
            .execute(conn)?;
        log_debug!("Synced {} tags, {} new", names.len(), inserted);

        let synced: Vec<TagRow> = tags::table
            .filter(tags::name.eq_any(&names))
            .select(TagRow::as_select())
            .load(conn)?;

        if synced.len() != names.len() {
            return Err(PersistenceError::MissingTags {
                expected: names.len(),
                found: synced.len(),
            });
        }

        Ok(synced.into_iter().map(|tag| (tag.name, tag.id)).collect())
    }
}
