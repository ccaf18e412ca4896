use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tokio::task;

use super::anime_tag_linker::AnimeTagLinker;
use super::mapper;
use super::query_builder::AnimeQueryBuilder;
use super::tag_synchronizer::TagSynchronizer;
use crate::modules::anime::domain::{
    entities::{Anime, NewAnime},
    repositories::AnimeRepository,
    value_objects::{AnimeFilters, SortOrder},
};
use crate::modules::anime::infrastructure::models::{
    AnimeRecord, AnimeRow, CountRecord, ListedAnimeRecord,
};
use crate::schema::anime;
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::config::{CatalogConfig, OperationTimeouts, TagCase};
use crate::shared::errors::{AppError, AppResult, ErrorClassifier, TraceSite};
use crate::shared::infrastructure::{
    run_in_transaction, Database, Deadline, PersistenceError, PersistenceResult, TxMode,
};
use crate::shared::utils::{LogContext, TimedOperation, Validator};
use crate::{log_debug, log_info, trace_site};

pub struct AnimeRepositoryImpl {
    db: Arc<Database>,
    timeouts: OperationTimeouts,
    tag_case: TagCase,
    tags: TagSynchronizer,
    queries: AnimeQueryBuilder,
}

impl AnimeRepositoryImpl {
    pub fn new(db: Arc<Database>, config: &CatalogConfig) -> Self {
        Self {
            db,
            timeouts: config.timeouts.clone(),
            tag_case: config.tag_case,
            tags: TagSynchronizer::new(config.tag_case),
            queries: AnimeQueryBuilder::new(config.tag_case),
        }
    }

    /// Run `work` in one transaction on a blocking thread, bounded by `budget`.
    ///
    /// The budget is enforced inside the transaction, so a reported timeout
    /// always means nothing was committed. Every failure is classified and
    /// logged here and nowhere else.
    async fn execute<T, F>(
        &self,
        site: TraceSite,
        mode: TxMode,
        budget: Duration,
        work: F,
    ) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> PersistenceResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let deadline = Deadline::after(budget);

        let outcome = task::spawn_blocking(move || -> PersistenceResult<T> {
            let mut conn = db.get_connection()?;
            run_in_transaction(&mut conn, mode, deadline, work)
        })
        .await
        .map_err(PersistenceError::from)
        .and_then(|result| result);

        outcome.map_err(|err| ErrorClassifier::report(err, site))
    }
}

#[async_trait]
impl AnimeRepository for AnimeRepositoryImpl {
    async fn create(&self, anime: &NewAnime) -> AppResult<Anime> {
        let tags = anime.validate(self.tag_case)?;
        let timer = TimedOperation::new("create", "anime");

        let draft = anime.clone();
        let synchronizer = self.tags;
        let created = self
            .execute(
                trace_site!("anime.create"),
                TxMode::Write,
                self.timeouts.create,
                move |conn| {
                    let row: AnimeRow = diesel::insert_into(anime::table)
                        .values(&mapper::entity_to_new_row(&draft))
                        .returning(AnimeRow::as_returning())
                        .get_result(conn)?;

                    let tag_ids = synchronizer.sync(conn, &tags)?;
                    let ids: Vec<i64> = tag_ids.values().copied().collect();
                    AnimeTagLinker::link(conn, row.id, &ids)?;

                    Ok(mapper::row_to_entity(row, tag_ids.into_keys().collect()))
                },
            )
            .await?;

        timer.finish();
        log_info!(
            "Created anime '{}' (ID: {}) with {} tags",
            created.title,
            created.id,
            created.tags.len()
        );
        Ok(created)
    }

    async fn read(&self, id: i64) -> AppResult<Anime> {
        Validator::validate_id(id)?;
        let timer = TimedOperation::new("read", "anime");

        let query = self.queries.select_by_id(id);
        let record = self
            .execute(
                trace_site!("anime.read"),
                TxMode::Read,
                self.timeouts.read,
                move |conn| {
                    let mut records: Vec<AnimeRecord> = query.into_query().load(conn)?;
                    match records.len() {
                        0 | 1 => Ok(records.pop()),
                        n => Err(PersistenceError::TooManyRows(n)),
                    }
                },
            )
            .await?;

        timer.finish();
        record
            .map(mapper::record_to_entity)
            .ok_or_else(|| AppError::NotFound(format!("anime {}", id)))
    }

    async fn update(&self, anime: &Anime) -> AppResult<Anime> {
        Validator::validate_id(anime.id)?;
        let tags = anime.validate(self.tag_case)?;
        let timer = TimedOperation::new("update", "anime");

        let (id, expected_version) = (anime.id, anime.version);
        let entity = anime.clone();
        let synchronizer = self.tags;
        let updated = self
            .execute(
                trace_site!("anime.update"),
                TxMode::Write,
                self.timeouts.update,
                move |conn| {
                    let row: Option<AnimeRow> = diesel::update(
                        anime::table
                            .filter(anime::id.eq(entity.id))
                            .filter(anime::version.eq(entity.version)),
                    )
                    .set((
                        mapper::entity_to_changeset(&entity),
                        anime::version.eq(anime::version + 1),
                    ))
                    .returning(AnimeRow::as_returning())
                    .get_result(conn)
                    .optional()?;

                    // Missing id or stale version; nothing was written.
                    let Some(row) = row else {
                        return Ok(None);
                    };

                    let tag_ids = synchronizer.sync(conn, &tags)?;
                    let ids: Vec<i64> = tag_ids.values().copied().collect();
                    AnimeTagLinker::relink(conn, row.id, &ids)?;

                    Ok(Some(mapper::row_to_entity(row, tag_ids.into_keys().collect())))
                },
            )
            .await?;

        let Some(updated) = updated else {
            log_debug!("Update of anime {} lost on version {}", id, expected_version);
            return Err(AppError::EditConflict(format!(
                "anime {} was modified or removed since version {}",
                id, expected_version
            )));
        };

        timer.finish();
        log_info!("Updated anime {} to version {}", updated.id, updated.version);
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        Validator::validate_id(id)?;
        let timer = TimedOperation::new("delete", "anime");

        let deleted = self
            .execute(
                trace_site!("anime.delete"),
                TxMode::Write,
                self.timeouts.delete,
                move |conn| Ok(diesel::delete(anime::table.find(id)).execute(conn)?),
            )
            .await?;

        timer.finish();
        if deleted == 0 {
            return Err(AppError::NotFound(format!("anime {}", id)));
        }

        log_info!("Deleted anime {}", id);
        Ok(())
    }

    async fn list(
        &self,
        filters: &AnimeFilters,
        sort: SortOrder,
        page: PaginationParams,
    ) -> AppResult<PaginatedResult<Anime>> {
        Validator::validate_tag_filter(&filters.tags)?;
        let timer = TimedOperation::new("list", "anime");

        let page_query = self.queries.list(filters, sort, page);
        let count_query = self.queries.count(filters);
        let past_first_page = page.offset() > 0;

        let (records, total_records) = self
            .execute(
                trace_site!("anime.list"),
                TxMode::Read,
                self.timeouts.list,
                move |conn| {
                    let rows: Vec<ListedAnimeRecord> = page_query.into_query().load(conn)?;
                    let total = match rows.first() {
                        Some(row) => row.total_records,
                        // Past the last page the window count is unavailable.
                        None if past_first_page => {
                            count_query
                                .into_query()
                                .get_result::<CountRecord>(conn)?
                                .total_records
                        }
                        None => 0,
                    };
                    Ok((rows, total))
                },
            )
            .await?;

        LogContext::list_operation(records.len(), total_records, timer.elapsed_ms());
        timer.finish();

        let items = records
            .into_iter()
            .map(|row| mapper::record_to_entity(row.record))
            .collect();
        Ok(PaginatedResult::new(items, total_records.max(0) as u64, &page))
    }
}
