//! SQL assembly for anime reads
//!
//! The listing is one parameterized SELECT whose WHERE clause grows with the
//! filters present. Every value travels as a bind parameter and placeholders
//! are numbered from the argument list itself, so `$n` always matches the
//! n-th bound value no matter which clauses were appended. Column names and
//! sort direction only ever come from `SortOrder`.
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{Array, BigInt, Text};

use crate::modules::anime::domain::value_objects::{
    AnimeFilters, AnimeStatus, AnimeType, Season, SortOrder,
};
use crate::schema::sql_types;
use crate::shared::application::PaginationParams;
use crate::shared::config::TagCase;

/// Projection shared by every anime read. Tags come back sorted and an
/// untagged anime yields an empty array, never NULL.
const ANIME_COLUMNS: &str = "a.id, a.title, a.anime_type, a.episodes, a.status, a.season, \
     a.year, a.duration, a.created_at, a.version, \
     ARRAY(SELECT t.name::text FROM anime_tags l JOIN tags t ON t.id = l.tag_id \
     WHERE l.anime_id = a.id ORDER BY t.name) AS tags";

/// A value bound to one positional parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    TextArray(Vec<String>),
    BigInt(i64),
    Status(AnimeStatus),
    Season(Season),
    Type(AnimeType),
}

/// SQL text plus the values for `$1..$n`, in order
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

impl BuiltQuery {
    /// Bind every argument onto a raw diesel query
    pub fn into_query(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Pg>();
        for arg in self.args {
            query = match arg {
                QueryArg::Text(value) => query.bind::<Text, _>(value),
                QueryArg::TextArray(values) => query.bind::<Array<Text>, _>(values),
                QueryArg::BigInt(value) => query.bind::<BigInt, _>(value),
                QueryArg::Status(value) => query.bind::<sql_types::AnimeStatus, _>(value),
                QueryArg::Season(value) => query.bind::<sql_types::AnimeSeason, _>(value),
                QueryArg::Type(value) => query.bind::<sql_types::AnimeType, _>(value),
            };
        }
        query
    }

    /// Number of the highest placeholder in use
    pub fn placeholder_count(&self) -> usize {
        self.args.len()
    }
}

/// Collects arguments and hands out the placeholder for each
#[derive(Debug, Default)]
struct Placeholders {
    args: Vec<QueryArg>,
}

impl Placeholders {
    fn push(&mut self, arg: QueryArg) -> String {
        self.args.push(arg);
        format!("${}", self.args.len())
    }
}

/// WHERE clause and optional tag CTE for a set of filters
struct FilterClause {
    cte: Option<String>,
    conditions: Vec<String>,
}

impl FilterClause {
    fn render(self) -> (String, String) {
        (self.cte.unwrap_or_default(), self.conditions.join(" AND "))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnimeQueryBuilder {
    tag_case: TagCase,
}

impl AnimeQueryBuilder {
    pub fn new(tag_case: TagCase) -> Self {
        Self { tag_case }
    }

    /// Single anime by id
    pub fn select_by_id(&self, id: i64) -> BuiltQuery {
        let mut params = Placeholders::default();
        let id_param = params.push(QueryArg::BigInt(id));
        BuiltQuery {
            sql: format!("SELECT {} FROM anime a WHERE a.id = {}", ANIME_COLUMNS, id_param),
            args: params.args,
        }
    }

    /// One page of filtered anime, each row carrying `count(*) OVER()` as
    /// `total_records`.
    ///
    /// The title is always `$1`. LIMIT and OFFSET are always the last two
    /// parameters. Ties on the sort column are broken by id in the same
    /// direction so paging is stable.
    pub fn list(
        &self,
        filters: &AnimeFilters,
        sort: SortOrder,
        page: PaginationParams,
    ) -> BuiltQuery {
        let mut params = Placeholders::default();
        let (cte, conditions) = self.filter_clause(filters, &mut params).render();

        let limit = params.push(QueryArg::BigInt(page.limit()));
        let offset = params.push(QueryArg::BigInt(page.offset()));

        let direction = sort.direction.keyword();
        let sql = format!(
            "{cte}SELECT count(*) OVER() AS total_records, {columns} \
             FROM anime a \
             WHERE {conditions} \
             ORDER BY {column} {direction}, a.id {direction} \
             LIMIT {limit} OFFSET {offset}",
            cte = cte,
            columns = ANIME_COLUMNS,
            conditions = conditions,
            column = sort.column.column_sql(),
            direction = direction,
            limit = limit,
            offset = offset,
        );

        BuiltQuery {
            sql,
            args: params.args,
        }
    }

    /// Count of rows matching the same filters as `list`, used when the
    /// requested page lies past the last match and carries no window count.
    pub fn count(&self, filters: &AnimeFilters) -> BuiltQuery {
        let mut params = Placeholders::default();
        let (cte, conditions) = self.filter_clause(filters, &mut params).render();
        BuiltQuery {
            sql: format!(
                "{}SELECT count(*) AS total_records FROM anime a WHERE {}",
                cte, conditions
            ),
            args: params.args,
        }
    }

    /// Tag names as they are stored: case-normalized, blank names dropped,
    /// duplicates collapsed.
    pub fn normalize_tag_filter(&self, tags: &[String]) -> Vec<String> {
        self.tag_case.normalize_all(tags)
    }

    fn filter_clause(&self, filters: &AnimeFilters, params: &mut Placeholders) -> FilterClause {
        let title = params.push(QueryArg::Text(
            filters.title_query().unwrap_or_default().to_string(),
        ));
        let mut conditions = vec![format!(
            "(to_tsvector('simple', a.title) @@ plainto_tsquery('simple', {0}) OR {0} = '')",
            title
        )];

        if let Some(status) = filters.status {
            let param = params.push(QueryArg::Status(status));
            conditions.push(format!("a.status = {}", param));
        }
        if let Some(season) = filters.season {
            let param = params.push(QueryArg::Season(season));
            conditions.push(format!("a.season = {}", param));
        }
        if let Some(anime_type) = filters.anime_type {
            let param = params.push(QueryArg::Type(anime_type));
            conditions.push(format!("a.anime_type = {}", param));
        }

        let tags = self.normalize_tag_filter(&filters.tags);
        let cte = if tags.is_empty() {
            None
        } else {
            let wanted = tags.len() as i64;
            let names = params.push(QueryArg::TextArray(tags));
            let count = params.push(QueryArg::BigInt(wanted));
            conditions.push("a.id IN (SELECT anime_id FROM tagged)".to_string());
            Some(format!(
                "WITH tagged AS (\
                 SELECT l.anime_id FROM anime_tags l JOIN tags t ON t.id = l.tag_id \
                 WHERE t.name = ANY({}) \
                 GROUP BY l.anime_id \
                 HAVING COUNT(DISTINCT t.name) = {}) ",
                names, count
            ))
        };

        FilterClause { cte, conditions }
    }
}
